// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print queue assembly and page-count filtering.
//
// The queue is the scanned documents plus at most one consolidated image
// document, in natural file-name order. The filter is pure: page counts are
// determined beforehand and passed in, so the keep/drop policy can be tested
// without touching the filesystem.

use std::fmt;
use std::path::PathBuf;

use printall_core::natord;
use printall_core::types::{CandidateFile, PageCount, PageRange, PrintItem};
use tracing::debug;

/// Merge documents and the optional consolidated image document into one
/// naturally ordered queue.
pub fn build_queue(documents: Vec<CandidateFile>, consolidated: Option<PathBuf>) -> Vec<PrintItem> {
    let mut queue: Vec<PrintItem> = documents.into_iter().map(PrintItem::from).collect();
    queue.extend(consolidated.map(PrintItem::new));
    natord::sort_by_file_name(&mut queue, |item| item.path.as_path());
    queue
}

/// Why an item was kept or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Counted and within range.
    Included { pages: u32 },
    /// Countable kind whose count could not be determined; kept.
    IncludedUnknown,
    Excluded { pages: u32, range: PageRange },
    /// Not a page-countable kind; kept unconditionally.
    NotCountable,
}

impl FilterDecision {
    pub fn keeps(&self) -> bool {
        !matches!(self, Self::Excluded { .. })
    }
}

impl fmt::Display for FilterDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Included { pages } => write!(f, "{pages} pages"),
            Self::IncludedUnknown => write!(f, "page count unknown, kept"),
            Self::Excluded { pages, range } => write!(f, "{pages} pages not in {range}"),
            Self::NotCountable => write!(f, "not page-countable, kept"),
        }
    }
}

/// Filter output: survivors in input order plus a decision for every input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredQueue {
    pub kept: Vec<PrintItem>,
    pub decisions: Vec<(PrintItem, FilterDecision)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFilter {
    range: PageRange,
}

impl PageFilter {
    pub fn new(range: PageRange) -> Self {
        Self { range }
    }

    pub fn decide(&self, item: &PrintItem, count: PageCount) -> FilterDecision {
        if !item.family().is_page_countable() {
            return FilterDecision::NotCountable;
        }
        match count {
            PageCount::Unknown => FilterDecision::IncludedUnknown,
            PageCount::Known(pages) if self.range.contains(pages) => {
                FilterDecision::Included { pages }
            }
            PageCount::Known(pages) => FilterDecision::Excluded {
                pages,
                range: self.range,
            },
        }
    }

    /// Decide every `(item, count)` pair, preserving order.
    pub fn apply<I>(&self, entries: I) -> FilteredQueue
    where
        I: IntoIterator<Item = (PrintItem, PageCount)>,
    {
        let mut filtered = FilteredQueue::default();
        for (item, count) in entries {
            let decision = self.decide(&item, count);
            if decision.keeps() {
                debug!(file = %item.file_name(), %decision, "Kept by page filter");
                filtered.kept.push(item.clone());
            } else {
                debug!(file = %item.file_name(), %decision, "Skipped by page filter");
            }
            filtered.decisions.push((item, decision));
        }
        filtered
    }
}
