// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents and inspect their page tree using
// the `lopdf` crate.

use std::path::Path;

use lopdf::Document;
use printall_core::error::PrintAllError;
use tracing::{debug, instrument};

/// Read-only view of an existing PDF file.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrintAllError> {
        let path_ref = path.as_ref();

        let document = Document::load(path_ref).map_err(|err| {
            PrintAllError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[cfg(test)]
    pub(crate) fn from_bytes(data: &[u8]) -> Result<Self, PrintAllError> {
        let document = Document::load_mem(data).map_err(|err| {
            PrintAllError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of entries in the document's page tree.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Give up the read-only view, e.g. to splice the pages elsewhere.
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Open `path` and count its pages in one step.
pub fn count_pages(path: impl AsRef<Path>) -> Result<u32, PrintAllError> {
    PdfReader::open(path).map(|reader| reader.page_count())
}
