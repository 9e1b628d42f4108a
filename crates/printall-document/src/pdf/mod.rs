// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — page counting on existing files, generation of raster PDFs,
// and merging.

pub mod merge;
pub mod reader;
pub mod writer;

pub use merge::merge_files;
pub use reader::PdfReader;
pub use writer::{PdfWriter, RasterPdfBuilder};
