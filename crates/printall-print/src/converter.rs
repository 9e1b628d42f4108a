// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Office converter (LibreOffice `soffice`) invocation contract.
//
//   convert:  <exe> --headless --convert-to pdf --outdir <dir> <file>
//   print:    <exe> --headless --pt <printer> <file>

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use printall_core::PrintConfig;
use printall_core::error::{PrintAllError, Result};
use tracing::instrument;

use crate::process::{BoundedCommand, ProcessOutput};

/// Headless office converter used for page counting and printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeConverter {
    executable: PathBuf,
    conversion_timeout: Duration,
}

impl OfficeConverter {
    pub fn new(executable: impl Into<PathBuf>, conversion_timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            conversion_timeout,
        }
    }

    pub fn from_config(config: &PrintConfig) -> Self {
        Self::new(config.converter_path.clone(), config.conversion_timeout())
    }

    pub fn exists(&self) -> bool {
        self.executable.is_file()
    }

    /// Fails with `ConverterMissing` when the executable is not on disk.
    pub fn ensure_present(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(PrintAllError::ConverterMissing(self.executable.clone()))
        }
    }

    pub fn convert_args(input: &Path, outdir: &Path) -> Vec<OsString> {
        vec![
            "--headless".into(),
            "--convert-to".into(),
            "pdf".into(),
            "--outdir".into(),
            outdir.as_os_str().to_os_string(),
            input.as_os_str().to_os_string(),
        ]
    }

    pub fn print_args(printer: &str, input: &Path) -> Vec<OsString> {
        vec![
            "--headless".into(),
            "--pt".into(),
            printer.into(),
            input.as_os_str().to_os_string(),
        ]
    }

    /// Where a conversion of `input` into `outdir` leaves its PDF.
    pub fn expected_pdf(input: &Path, outdir: &Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or(input.as_os_str());
        let mut name = stem.to_os_string();
        name.push(".pdf");
        outdir.join(name)
    }

    /// Convert `input` to PDF inside `outdir`, bounded by the conversion
    /// timeout.
    #[instrument(skip(self))]
    pub async fn convert_to_pdf(&self, input: &Path, outdir: &Path) -> Result<ProcessOutput> {
        BoundedCommand::new(&self.executable)
            .args(Self::convert_args(input, outdir))
            .timeout(self.conversion_timeout)
            .run()
            .await
    }

    /// Send `input` to `printer`. Waits for as long as the converter runs.
    #[instrument(skip(self))]
    pub async fn print(&self, printer: &str, input: &Path) -> Result<ProcessOutput> {
        BoundedCommand::new(&self.executable)
            .args(Self::print_args(printer, input))
            .run()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_command_line() {
        let args = OfficeConverter::convert_args(Path::new("/in/report.docx"), Path::new("/tmp/x"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            ["--headless", "--convert-to", "pdf", "--outdir", "/tmp/x", "/in/report.docx"]
        );
    }

    #[test]
    fn print_command_line_keeps_printer_verbatim() {
        let args = OfficeConverter::print_args("HP LaserJet (Floor 2)", Path::new("a.pdf"));
        assert_eq!(args[2], OsString::from("HP LaserJet (Floor 2)"));
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn expected_pdf_replaces_extension() {
        assert_eq!(
            OfficeConverter::expected_pdf(Path::new("/in/notes.v2.doc"), Path::new("/out")),
            PathBuf::from("/out/notes.v2.pdf")
        );
    }

    #[test]
    fn missing_executable_is_a_precondition_failure() {
        let converter = OfficeConverter::new("/no/such/soffice", Duration::from_secs(1));
        let err = converter.ensure_present().unwrap_err();
        assert!(err.is_precondition());
    }
}
