// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory scanner. Classifies the files of one folder into images and
// documents by extension, keeping only the formats the user enabled.

use std::path::{Path, PathBuf};

use printall_core::error::{PrintAllError, Result};
use printall_core::natord;
use printall_core::types::{CandidateFile, DocumentFormat, FormatFamily};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Files found by one scan, each bucket in natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub images: Vec<CandidateFile>,
    pub documents: Vec<CandidateFile>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.documents.len()
    }
}

pub struct DirectoryScanner {
    directory: PathBuf,
    recursive: bool,
}

impl DirectoryScanner {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            recursive: false,
        }
    }

    /// Descend into subdirectories. Printing scans the top level only.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Scan for files whose format is in `enabled`.
    ///
    /// An unreadable root is an error; unreadable entries below it are
    /// logged and skipped.
    #[instrument(skip(self, enabled), fields(directory = %self.directory.display()))]
    pub fn scan(&self, enabled: &[DocumentFormat]) -> Result<ScanResult> {
        std::fs::read_dir(&self.directory).map_err(|err| PrintAllError::DirectoryUnreadable {
            path: self.directory.clone(),
            reason: err.to_string(),
        })?;

        let mut walker = WalkDir::new(&self.directory).min_depth(1);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut result = ScanResult::default();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || is_reserved_name(entry.file_name()) {
                continue;
            }

            let path = entry.path();
            let format = match DocumentFormat::from_path(path) {
                Some(format) if enabled.contains(&format) => format,
                _ => continue,
            };

            debug!(path = %path.display(), ?format, "Found candidate");
            let candidate = CandidateFile::new(path, format);
            match candidate.family() {
                FormatFamily::Raster => result.images.push(candidate),
                FormatFamily::NativePaginated | FormatFamily::FlowLayout => {
                    result.documents.push(candidate)
                }
                FormatFamily::Other => {}
            }
        }

        natord::sort_by_file_name(&mut result.images, |c| c.path.as_path());
        natord::sort_by_file_name(&mut result.documents, |c| c.path.as_path());

        info!(
            images = result.images.len(),
            documents = result.documents.len(),
            "Scan complete"
        );
        Ok(result)
    }
}

/// Editor lock files (`~$report.docx`) and hidden files (`.~lock.report.docx#`).
fn is_reserved_name(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('~') || name.starts_with('.')
}
