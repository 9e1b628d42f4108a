// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image consolidation — lay a folder's images out one per page and write a
// single PDF the print queue can treat like any other document.

use std::path::{Path, PathBuf};

use printall_core::PaperSize;
use printall_core::error::PrintAllError;
use tracing::{info, instrument, warn};

use crate::image::processor::ImageProcessor;
use crate::pdf::merge::merge_files;
use crate::pdf::writer::PdfWriter;

/// File name of the consolidated document inside the run workspace.
pub const CONSOLIDATED_FILE_NAME: &str = "_merged_images.pdf";

/// An image left out of the consolidated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// The written consolidated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedDocument {
    pub path: PathBuf,
    /// One page per image that made it in.
    pub pages: usize,
    pub skipped: Vec<SkippedImage>,
}

/// Renders images onto fixed-size pages and collects them in one PDF.
#[derive(Debug, Clone, Copy)]
pub struct ImageConsolidator {
    paper_size: PaperSize,
    dpi: u32,
    margin: u32,
}

impl ImageConsolidator {
    pub fn new(paper_size: PaperSize, dpi: u32, margin: u32) -> Self {
        Self {
            paper_size,
            dpi,
            margin,
        }
    }

    /// Page raster size in pixels.
    pub fn page_pixels(&self) -> (u32, u32) {
        self.paper_size.pixel_dimensions(self.dpi)
    }

    /// Lay out `images` in the order given, page N holding image N, and write
    /// the result to `output_dir`.
    ///
    /// Each page is written as its own PDF in a scratch directory under
    /// `output_dir` and the pages are merged at the end, so at most one page
    /// raster is held in memory. Images that cannot be decoded or placed are
    /// skipped and reported in [`ConsolidatedDocument::skipped`]. Returns
    /// `Ok(None)` when no image produced a page; nothing is left behind in
    /// that case. Inputs are never modified.
    #[instrument(skip_all, fields(images = images.len(), output_dir = %output_dir.display()))]
    pub fn consolidate(
        &self,
        images: &[PathBuf],
        output_dir: &Path,
    ) -> Result<Option<ConsolidatedDocument>, PrintAllError> {
        let page = self.page_pixels();
        let mut writer = PdfWriter::new(self.paper_size, self.dpi);
        writer.set_title("PrintALL consolidated images");
        let scratch = tempfile::Builder::new()
            .prefix("image_pages_")
            .tempdir_in(output_dir)?;
        let mut page_files = Vec::new();
        let mut skipped = Vec::new();

        for path in images {
            let page_file = scratch
                .path()
                .join(format!("page_{:05}.pdf", page_files.len() + 1));
            let rendered = ImageProcessor::open(path)
                .and_then(|processor| processor.render_on_page(page, self.margin))
                .and_then(|raster| writer.write_page_to_file(raster, &page_file));
            match rendered {
                Ok(()) => page_files.push(page_file),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Image skipped");
                    skipped.push(SkippedImage {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if page_files.is_empty() {
            warn!(skipped = skipped.len(), "No image produced a page");
            scratch.close()?;
            return Ok(None);
        }

        let path = output_dir.join(CONSOLIDATED_FILE_NAME);
        let pages = merge_files(&page_files, &path)? as usize;
        scratch.close()?;
        info!(path = %path.display(), pages, skipped = skipped.len(), "Images consolidated");

        Ok(Some(ConsolidatedDocument {
            path,
            pages,
            skipped,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::count_pages;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([30, 60, 90]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn one_page_per_image() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let images = vec![
            write_png(src.path(), "img1.png", 100, 100),
            write_png(src.path(), "img2.png", 200, 50),
        ];

        let consolidator = ImageConsolidator::new(PaperSize::A5, 50, 10);
        let doc = consolidator
            .consolidate(&images, out.path())
            .unwrap()
            .unwrap();

        assert_eq!(doc.pages, 2);
        assert!(doc.skipped.is_empty());
        assert_eq!(doc.path, out.path().join(CONSOLIDATED_FILE_NAME));
        assert_eq!(count_pages(&doc.path).unwrap(), 2);
        // Inputs are left alone.
        assert!(images.iter().all(|p| p.exists()));
        // Per-page scratch files are gone; only the merged document remains.
        let left: Vec<_> = std::fs::read_dir(out.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(left, [CONSOLIDATED_FILE_NAME]);
    }

    #[test]
    fn unreadable_images_are_skipped() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let broken = src.path().join("broken.jpg");
        std::fs::write(&broken, b"definitely not a jpeg").unwrap();
        let images = vec![broken.clone(), write_png(src.path(), "ok.png", 8, 8)];

        let doc = ImageConsolidator::new(PaperSize::A5, 50, 5)
            .consolidate(&images, out.path())
            .unwrap()
            .unwrap();

        assert_eq!(doc.pages, 1);
        assert_eq!(doc.skipped.len(), 1);
        assert_eq!(doc.skipped[0].path, broken);
    }

    #[test]
    fn nothing_usable_means_no_document() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let broken = src.path().join("empty.png");
        std::fs::write(&broken, b"").unwrap();

        let result = ImageConsolidator::new(PaperSize::A5, 50, 5)
            .consolidate(&[broken], out.path())
            .unwrap();

        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
