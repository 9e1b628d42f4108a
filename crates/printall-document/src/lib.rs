// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printall-document — Document handling for the PrintALL batch printer.
//
// Provides PDF inspection (page counts), raster page layout (fit-and-centre
// images on a fixed-size page), PDF generation from rendered pages, and the
// image consolidator that turns a folder's images into one printable PDF.

pub mod consolidate;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `printall_document::PdfReader` etc.
pub use consolidate::{ConsolidatedDocument, ImageConsolidator, SkippedImage};
pub use self::image::layout::Placement;
pub use self::image::processor::ImageProcessor;
pub use pdf::merge::merge_files;
pub use pdf::reader::PdfReader;
pub use pdf::writer::{PdfWriter, RasterPdfBuilder};
