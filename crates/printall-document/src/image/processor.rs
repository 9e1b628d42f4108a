// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode an image and render it onto a white page canvas
// using the `image` crate.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};
use printall_core::error::PrintAllError;
use tracing::{debug, info, instrument};

use super::layout::Placement;

/// A single decoded image, ready to be laid out on a page.
///
/// ```ignore
/// let page = ImageProcessor::open("scan-01.jpg")?
///     .render_on_page((2480, 3507), 100)?;
/// ```
pub struct ImageProcessor {
    /// The decoded image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, PrintAllError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            PrintAllError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(
            width = img.width(),
            height = img.height(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, BMP, etc.).
    #[cfg(test)]
    pub(crate) fn from_bytes(data: &[u8]) -> Result<Self, PrintAllError> {
        let img = image::load_from_memory(data).map_err(|err| {
            PrintAllError::ImageError(format!("failed to decode image: {}", err))
        })?;
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Rendering ------------------------------------------------------------

    /// Render the image onto an opaque white page of `page` (width, height)
    /// pixels, scaled to fit inside `margin` and centred.
    ///
    /// Transparent regions are composited over white. Fails with
    /// `ImageError` when the image has a zero dimension or the margin leaves
    /// no room to draw.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn render_on_page(&self, page: (u32, u32), margin: u32) -> Result<RgbImage, PrintAllError> {
        let placement = Placement::fit_centered((self.width(), self.height()), page, margin)
            .ok_or_else(|| {
                PrintAllError::ImageError(format!(
                    "cannot place a {}x{} image on a {}x{} page with a {}px margin",
                    self.width(),
                    self.height(),
                    page.0,
                    page.1,
                    margin
                ))
            })?;

        let resized = self
            .image
            .resize_exact(placement.width, placement.height, FilterType::Lanczos3)
            .to_rgba8();

        let mut canvas = RgbaImage::from_pixel(page.0, page.1, Rgba([255, 255, 255, 255]));
        imageops::overlay(&mut canvas, &resized, placement.x as i64, placement.y as i64);

        debug!(?placement, "Image rendered on page");
        Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }
}
