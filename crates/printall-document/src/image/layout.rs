// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page placement — where an image lands on a fixed-size page.
//
// The image is scaled by min(drawable_w / w, drawable_h / h), where the
// drawable area is the page minus the margin on every edge, and the scaled
// image is centred on the full page. Integer arithmetic keeps the result
// exact: the constrained axis fills the drawable area and the other axis is
// truncated.

/// Position and size of a scaled image on a page, in pixels from the
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Fit an `image` of (width, height) on a `page` of (width, height) with
    /// `margin` pixels on each edge.
    ///
    /// Returns `None` if the image has a zero dimension or the margins leave
    /// no drawable area.
    pub fn fit_centered(image: (u32, u32), page: (u32, u32), margin: u32) -> Option<Self> {
        let (img_w, img_h) = (image.0 as u64, image.1 as u64);
        let (page_w, page_h) = (page.0 as u64, page.1 as u64);
        let margins = 2 * margin as u64;
        if img_w == 0 || img_h == 0 || margins >= page_w || margins >= page_h {
            return None;
        }
        let draw_w = page_w - margins;
        let draw_h = page_h - margins;

        // draw_w / img_w <= draw_h / img_h, cross-multiplied.
        let (width, height) = if draw_w * img_h <= draw_h * img_w {
            (draw_w, (img_h * draw_w / img_w).max(1))
        } else {
            ((img_w * draw_h / img_h).max(1), draw_h)
        };

        Some(Self {
            x: ((page_w - width) / 2) as u32,
            y: ((page_h - height) / 2) as u32,
            width: width as u32,
            height: height as u32,
        })
    }
}
