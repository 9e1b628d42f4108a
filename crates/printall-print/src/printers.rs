// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host printer lookup via the system spooler's command-line tools: CUPS
// `lpstat` on Unix, PowerShell on Windows. Used to suggest a printer name;
// the pipeline itself always takes the configured name verbatim.

use std::time::Duration;

use printall_core::error::Result;
use tracing::{debug, instrument};

use crate::process::BoundedCommand;

const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg(windows)]
fn default_printer_command() -> BoundedCommand {
    BoundedCommand::new("powershell").args([
        "-NoProfile",
        "-NonInteractive",
        "-Command",
        "Get-CimInstance -ClassName Win32_Printer -Filter 'Default=TRUE' | \
         Select-Object -ExpandProperty Name",
    ])
}

#[cfg(not(windows))]
fn default_printer_command() -> BoundedCommand {
    BoundedCommand::new("lpstat").arg("-d")
}

#[cfg(windows)]
fn list_printers_command() -> BoundedCommand {
    BoundedCommand::new("powershell").args([
        "-NoProfile",
        "-NonInteractive",
        "-Command",
        "Get-Printer | Select-Object -ExpandProperty Name",
    ])
}

#[cfg(not(windows))]
fn list_printers_command() -> BoundedCommand {
    BoundedCommand::new("lpstat").arg("-e")
}

/// The host's default printer, if one is set.
#[instrument]
pub async fn default_printer() -> Result<Option<String>> {
    let output = default_printer_command().timeout(QUERY_TIMEOUT).run().await?;
    if !output.success() {
        debug!(reason = %output.failure_reason(), "Default printer query failed");
        return Ok(None);
    }
    Ok(parse_default_printer(&output.stdout))
}

/// All printers registered on the host, in spooler order.
#[instrument]
pub async fn list_printers() -> Result<Vec<String>> {
    let output = list_printers_command().timeout(QUERY_TIMEOUT).run().await?;
    if !output.success() {
        debug!(reason = %output.failure_reason(), "Printer list query failed");
        return Ok(Vec::new());
    }
    Ok(parse_printer_list(&output.stdout))
}

/// Accepts both `lpstat -d` output ("system default destination: NAME") and
/// a bare name on the first line.
fn parse_default_printer(stdout: &str) -> Option<String> {
    let line = stdout.lines().map(str::trim).find(|line| !line.is_empty())?;
    if line.starts_with("no system default") {
        return None;
    }
    let name = match line.split_once("default destination:") {
        Some((_, name)) => name.trim(),
        None => line,
    };
    (!name.is_empty()).then(|| name.to_string())
}

fn parse_printer_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
