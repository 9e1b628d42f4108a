// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PrintALL Print — the batch print pipeline. Scans a folder, consolidates its
// images, orders and filters the queue, and hands each file to the office
// converter for printing. Types shared with the front end live in
// `printall-core`; page layout and PDF handling live in `printall-document`.

pub mod converter;
pub mod dispatch;
pub mod page_count;
pub mod pipeline;
pub mod printers;
pub mod process;
pub mod progress;
pub mod queue;
pub mod scanner;

pub use converter::OfficeConverter;
pub use dispatch::PrintDispatcher;
pub use page_count::{PageCountReport, PageCounter};
pub use pipeline::{PipelineHandle, PipelineStage, PrintPipeline, spawn_pipeline};
pub use process::{BoundedCommand, ProcessOutput};
pub use progress::{Progress, ProgressEvent};
pub use queue::{FilterDecision, FilteredQueue, PageFilter, build_queue};
pub use scanner::{DirectoryScanner, ScanResult};
