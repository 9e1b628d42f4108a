// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the end of a batch run.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the front end presents it.

use crate::error::PrintAllError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run could not start; a setting must be fixed first.
    ActionRequired,
    /// One file was affected; the rest of the batch carried on.
    PerFile,
    /// Something outside the user's control went wrong.
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `PrintAllError` into something a non-technical user can act on.
pub fn humanize_error(err: &PrintAllError) -> HumanError {
    match err {
        PrintAllError::ConverterMissing(path) => HumanError {
            message: "LibreOffice could not be found.".into(),
            suggestion: format!(
                "Word documents need LibreOffice to print. Install it, or point the converter \
                 setting at soffice (currently {}).",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        PrintAllError::InvalidConfig(detail) => HumanError {
            message: "Some settings need attention before printing.".into(),
            suggestion: format!("Check the folder, printer name and page range. ({detail})"),
            severity: Severity::ActionRequired,
        },

        PrintAllError::DirectoryUnreadable { path, .. } => HumanError {
            message: "The folder couldn't be read.".into(),
            suggestion: format!(
                "Make sure {} exists and you have permission to open it.",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        PrintAllError::PdfError(_) => HumanError {
            message: "There's a problem with a PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it in a PDF viewer first.".into(),
            severity: Severity::PerFile,
        },

        PrintAllError::ImageError(_) => HumanError {
            message: "An image couldn't be read.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a \
                         JPEG or PNG first."
                .into(),
            severity: Severity::PerFile,
        },

        PrintAllError::ProcessLaunch { program, .. } => HumanError {
            message: "A helper program couldn't be started.".into(),
            suggestion: format!("Check that {program} is installed and can be run, then try again."),
            severity: Severity::ActionRequired,
        },

        PrintAllError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted while printing.".into(),
                    severity: Severity::PerFile,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "PrintALL doesn't have permission to use a file.".into(),
                    suggestion: "Check the file permissions, or copy the folder somewhere you \
                                 own."
                        .into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full."
                        .into(),
                    severity: Severity::Internal,
                }
            }
        }

        PrintAllError::Serialization(_) => HumanError {
            message: "The settings file couldn't be understood.".into(),
            suggestion: "Recreate it with `printall config --init <file>`.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_converter_needs_action() {
        let err = PrintAllError::ConverterMissing("/opt/soffice".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("/opt/soffice"));
    }

    #[test]
    fn bad_image_is_per_file() {
        let human = humanize_error(&PrintAllError::ImageError("zero width".into()));
        assert_eq!(human.severity, Severity::PerFile);
    }

    #[test]
    fn missing_file_is_per_file() {
        let err = PrintAllError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::PerFile);
    }
}
