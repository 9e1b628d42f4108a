// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the PrintALL batch print pipeline.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PrintAllError, Result};

/// Unique identifier for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// File formats the batch printer knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
    Jpg,
    Png,
    Bmp,
}

/// How a format is paginated, which decides how it is counted, consolidated
/// and dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatFamily {
    /// Carries its own page table (PDF); counted by direct inspection.
    NativePaginated,
    /// Flow-layout word processing formats; counted via conversion.
    FlowLayout,
    /// Raster images; consolidated into one paginated document.
    Raster,
    /// Anything else; never counted.
    Other,
}

impl DocumentFormat {
    /// All formats, in the order they appear in the configuration.
    pub const ALL: [DocumentFormat; 6] = [
        Self::Doc,
        Self::Docx,
        Self::Pdf,
        Self::Jpg,
        Self::Png,
        Self::Bmp,
    ];

    /// Infer the format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical lowercase extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }

    pub fn family(&self) -> FormatFamily {
        match self {
            Self::Pdf => FormatFamily::NativePaginated,
            Self::Doc | Self::Docx => FormatFamily::FlowLayout,
            Self::Jpg | Self::Png | Self::Bmp => FormatFamily::Raster,
        }
    }
}

impl FormatFamily {
    /// Family of an arbitrary path; unknown extensions map to `Other`.
    pub fn of(path: &Path) -> Self {
        DocumentFormat::from_path(path)
            .map(|format| format.family())
            .unwrap_or(FormatFamily::Other)
    }

    /// Whether a page count can be determined for this family.
    pub fn is_page_countable(&self) -> bool {
        matches!(self, Self::NativePaginated | Self::FlowLayout)
    }
}

/// A file found during the directory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, format: DocumentFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn family(&self) -> FormatFamily {
        self.format.family()
    }
}

/// A file ready to be dispatched to the printer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrintItem {
    pub path: PathBuf,
}

impl PrintItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Base file name, lossily converted for display and sorting.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn family(&self) -> FormatFamily {
        FormatFamily::of(&self.path)
    }
}

impl From<CandidateFile> for PrintItem {
    fn from(candidate: CandidateFile) -> Self {
        Self::new(candidate.path)
    }
}

/// Result of a page-count probe. `Unknown` is a soft signal, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageCount {
    Known(u32),
    Unknown,
}

impl PageCount {
    pub fn known(&self) -> Option<u32> {
        match self {
            Self::Known(pages) => Some(*pages),
            Self::Unknown => None,
        }
    }
}

impl From<Option<u32>> for PageCount {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

/// Inclusive page-count bounds used by the page filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    min: u32,
    max: u32,
}

impl PageRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(PrintAllError::InvalidConfig(format!(
                "page range minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, pages: u32) -> bool {
        self.min <= pages && pages <= self.max
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.min, self.max)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Page size in pixels when rendered at `dpi` (truncated).
    pub fn pixel_dimensions(&self, dpi: u32) -> (u32, u32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        let to_px = |mm: u32| (mm as f64 / 25.4 * dpi as f64) as u32;
        (to_px(w_mm), to_px(h_mm))
    }
}

/// How a run ended when it was allowed to proceed past its preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// At least one item was sent to the printer (successfully or not).
    Completed,
    /// The scan found nothing printable.
    NothingFound,
    /// Files were found but the page filter rejected all of them.
    AllFilteredOut,
}

/// Outcome of dispatching one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchResult {
    Printed,
    Failed { reason: String },
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Printed)
    }
}

/// Per-item record in the run outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub path: PathBuf,
    pub result: DispatchResult,
}

/// Summary of one pipeline run, produced once and handed to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Attempted items in print order.
    pub items: Vec<ItemOutcome>,
}

impl RunOutcome {
    /// An outcome for a run that never reached the printing stage.
    pub fn empty(run_id: RunId, status: RunStatus, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            status,
            started_at,
            finished_at: Utc::now(),
            attempted: 0,
            succeeded: 0,
            failed: 0,
            items: Vec::new(),
        }
    }

    /// Build a completed outcome from per-item results, in print order.
    pub fn completed(run_id: RunId, started_at: DateTime<Utc>, items: Vec<ItemOutcome>) -> Self {
        let succeeded = items.iter().filter(|item| item.result.is_success()).count();
        Self {
            run_id,
            status: RunStatus::Completed,
            started_at,
            finished_at: Utc::now(),
            attempted: items.len(),
            succeeded,
            failed: items.len() - succeeded,
            items,
        }
    }

    pub fn attempted_paths(&self) -> Vec<&Path> {
        self.items.iter().map(|item| item.path.as_path()).collect()
    }
}
