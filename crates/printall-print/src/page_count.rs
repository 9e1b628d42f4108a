// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page counting. PDFs are counted by reading their page tree; Word documents
// are converted to PDF in a private scratch directory first. Every failure
// resolves to `PageCount::Unknown` with a reason; nothing here returns an
// error.

use std::path::{Path, PathBuf};

use printall_core::types::{FormatFamily, PageCount};
use printall_document::pdf::reader::count_pages;
use tracing::{debug, instrument};

use crate::converter::OfficeConverter;

/// Result of one page-count probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCountReport {
    pub pages: PageCount,
    /// Why the count is unknown, when it is.
    pub reason: Option<String>,
}

impl PageCountReport {
    fn known(pages: u32) -> Self {
        Self {
            pages: PageCount::Known(pages),
            reason: None,
        }
    }

    fn unknown(reason: impl Into<String>) -> Self {
        Self {
            pages: PageCount::Unknown,
            reason: Some(reason.into()),
        }
    }

    /// Not countable by design; no diagnostic.
    fn not_applicable() -> Self {
        Self {
            pages: PageCount::Unknown,
            reason: None,
        }
    }
}

/// Determines page counts for queue items.
pub struct PageCounter {
    converter: OfficeConverter,
    /// Parent for per-probe scratch directories.
    scratch_root: PathBuf,
}

impl PageCounter {
    pub fn new(converter: OfficeConverter, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            converter,
            scratch_root: scratch_root.into(),
        }
    }

    /// Count the pages of `path`, dispatching on its format family.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn count(&self, path: &Path) -> PageCountReport {
        let report = match FormatFamily::of(path) {
            FormatFamily::NativePaginated => count_pdf(path.to_path_buf()).await,
            FormatFamily::FlowLayout => self.count_via_conversion(path).await,
            FormatFamily::Raster | FormatFamily::Other => PageCountReport::not_applicable(),
        };
        match (&report.pages, &report.reason) {
            (PageCount::Known(pages), _) => debug!(pages, "Page count determined"),
            (PageCount::Unknown, Some(reason)) => debug!(%reason, "Page count unknown"),
            (PageCount::Unknown, None) => {}
        }
        report
    }

    async fn count_via_conversion(&self, path: &Path) -> PageCountReport {
        // Removed when `scratch` drops, on every return below.
        let scratch = match tempfile::Builder::new()
            .prefix("page_count_")
            .tempdir_in(&self.scratch_root)
        {
            Ok(dir) => dir,
            Err(err) => {
                return PageCountReport::unknown(format!("cannot create scratch directory: {err}"));
            }
        };

        let output = match self.converter.convert_to_pdf(path, scratch.path()).await {
            Ok(output) => output,
            Err(err) => return PageCountReport::unknown(err.to_string()),
        };
        if !output.success() {
            return PageCountReport::unknown(format!("conversion {}", output.failure_reason()));
        }

        let artifact = OfficeConverter::expected_pdf(path, scratch.path());
        if !artifact.is_file() {
            return PageCountReport::unknown(format!(
                "conversion produced no {}",
                artifact
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            ));
        }

        count_pdf(artifact).await
    }
}

/// lopdf parsing is blocking; keep it off the async worker.
async fn count_pdf(path: PathBuf) -> PageCountReport {
    match tokio::task::spawn_blocking(move || count_pages(&path)).await {
        Ok(Ok(pages)) => PageCountReport::known(pages),
        Ok(Err(err)) => PageCountReport::unknown(err.to_string()),
        Err(err) => PageCountReport::unknown(format!("page count task failed: {err}")),
    }
}
