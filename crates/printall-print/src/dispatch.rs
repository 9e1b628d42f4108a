// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print dispatch: one converter invocation per queue item. Failures are
// returned as values so the batch loop can move on.

use printall_core::types::{DispatchResult, PrintItem};
use tracing::{debug, instrument};

use crate::converter::OfficeConverter;

pub struct PrintDispatcher {
    converter: OfficeConverter,
    /// Used verbatim; the host must know the printer by exactly this name.
    printer: String,
}

impl PrintDispatcher {
    pub fn new(converter: OfficeConverter, printer: impl Into<String>) -> Self {
        Self {
            converter,
            printer: printer.into(),
        }
    }

    /// Send one item to the printer. No retries.
    #[instrument(skip(self), fields(file = %item.file_name(), printer = %self.printer))]
    pub async fn dispatch(&self, item: &PrintItem) -> DispatchResult {
        match self.converter.print(&self.printer, &item.path).await {
            Ok(output) if output.success() => {
                debug!("Sent to printer");
                DispatchResult::Printed
            }
            Ok(output) => {
                let reason = output.failure_reason();
                debug!(%reason, "Print failed");
                DispatchResult::Failed { reason }
            }
            Err(err) => {
                debug!(error = %err, "Print failed");
                DispatchResult::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
