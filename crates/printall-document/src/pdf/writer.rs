// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — create paginated PDF documents from full-page raster images
// using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::RgbImage;
use printall_core::PaperSize;
use printall_core::error::PrintAllError;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Creates PDF documents whose pages are pre-rendered raster images.
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
    /// Resolution the page rasters were rendered at.
    dpi: u32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer for pages of `paper_size` rendered at `dpi`.
    pub fn new(paper_size: PaperSize, dpi: u32) -> Self {
        Self {
            paper_size,
            dpi,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Start a document assembled page by page.
    ///
    /// Every page raster stays in memory until [`RasterPdfBuilder::finish`].
    /// Long runs of pages go through [`PdfWriter::write_page_to_file`] and
    /// [`merge_files`](super::merge::merge_files) instead.
    pub fn builder(&self) -> RasterPdfBuilder {
        let title = self.title.as_deref().unwrap_or("PrintALL Document");
        RasterPdfBuilder::new(self.paper_size, self.dpi, title)
    }

    /// Write `raster` as a single-page PDF at `path`. The raster is released
    /// once the file is written.
    #[instrument(skip(self, raster), fields(path = %path.as_ref().display()))]
    pub fn write_page_to_file(
        &self,
        raster: RgbImage,
        path: impl AsRef<Path>,
    ) -> Result<(), PrintAllError> {
        let mut builder = self.builder();
        builder.push_page(raster)?;
        let bytes = builder.finish()?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!(bytes = bytes.len(), "Page PDF written");
        Ok(())
    }

    /// Create a PDF of `pages` empty pages.
    pub fn create_blank(&self, pages: usize) -> Result<Vec<u8>, PrintAllError> {
        let mut builder = self.builder();
        for _ in 0..pages {
            builder.push_blank_page();
        }
        builder.finish()
    }

    /// Create a blank PDF and write it directly to a file.
    pub fn write_blank_to_file(
        &self,
        pages: usize,
        path: impl AsRef<Path>,
    ) -> Result<(), PrintAllError> {
        let bytes = self.create_blank(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote blank PDF to {}", path.as_ref().display());
        Ok(())
    }
}

/// Incrementally assembled raster PDF.
pub struct RasterPdfBuilder {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
    page_w: Mm,
    page_h: Mm,
    dpi: u32,
}

impl RasterPdfBuilder {
    fn new(paper_size: PaperSize, dpi: u32, title: &str) -> Self {
        let (w_mm, h_mm) = paper_size.dimensions_mm();
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
            page_w: Mm(w_mm as f32),
            page_h: Mm(h_mm as f32),
            dpi,
        }
    }

    /// Append a page showing `raster` anchored at the bottom-left corner at
    /// the builder's resolution. A raster rendered from
    /// `PaperSize::pixel_dimensions(dpi)` covers the whole page.
    pub fn push_page(&mut self, raster: RgbImage) -> Result<(), PrintAllError> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(PrintAllError::ImageError(
                "cannot place an empty raster on a page".into(),
            ));
        }

        let raw = RawImage {
            pixels: RawImageData::U8(raster.into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.doc.add_image(&raw);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(self.dpi as f32),
                rotate: None,
            },
        }];

        self.pages.push(PdfPage::new(self.page_w, self.page_h, ops));
        debug!(page = self.pages.len(), width, height, "Raster page added");
        Ok(())
    }

    pub fn push_blank_page(&mut self) {
        self.pages
            .push(PdfPage::new(self.page_w, self.page_h, Vec::new()));
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialise the document.
    pub fn finish(mut self) -> Result<Vec<u8>, PrintAllError> {
        if self.pages.is_empty() {
            return Err(PrintAllError::PdfError(
                "refusing to write a PDF without pages".into(),
            ));
        }
        let page_count = self.pages.len();
        self.doc.with_pages(self.pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(
            pages = page_count,
            bytes = output.len(),
            warnings = warnings.len(),
            "Raster PDF serialised"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::{PdfReader, count_pages};
    use image::Rgb;

    #[test]
    fn one_page_per_raster() {
        let writer = PdfWriter::new(PaperSize::A5, 36);
        let (w, h) = PaperSize::A5.pixel_dimensions(36);
        let mut builder = writer.builder();
        builder
            .push_page(RgbImage::from_pixel(w, h, Rgb([255, 255, 255])))
            .unwrap();
        builder
            .push_page(RgbImage::from_pixel(w, h, Rgb([10, 20, 30])))
            .unwrap();
        let bytes = builder.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(PdfReader::from_bytes(&bytes).unwrap().page_count(), 2);
    }

    #[test]
    fn single_page_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.pdf");
        let (w, h) = PaperSize::A5.pixel_dimensions(36);
        PdfWriter::new(PaperSize::A5, 36)
            .write_page_to_file(RgbImage::from_pixel(w, h, Rgb([0, 0, 0])), &path)
            .unwrap();
        assert_eq!(count_pages(&path).unwrap(), 1);
    }

    #[test]
    fn empty_document_is_refused() {
        let writer = PdfWriter::new(PaperSize::A4, 72);
        assert!(writer.builder().finish().is_err());
    }

    #[test]
    fn empty_raster_is_refused() {
        let writer = PdfWriter::new(PaperSize::A4, 72);
        let mut builder = writer.builder();
        assert!(builder.push_page(RgbImage::new(0, 0)).is_err());
        assert_eq!(builder.page_count(), 0);
    }
}
