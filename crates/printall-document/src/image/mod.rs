// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — page placement maths and rendering of images onto pages.

pub mod layout;
pub mod processor;

pub use layout::Placement;
pub use processor::ImageProcessor;
