// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch print pipeline.
//
//   Idle -> Scanning -> Consolidating? -> Merging -> Filtering? -> Printing -> Done
//     \-> FailedPrecondition
//
// One run is one sequential unit of work. Files are handled one at a time so
// that log lines and print order match the queue order. The run owns a
// temporary workspace for the consolidated image document and page-count
// scratch directories; it is created after the preconditions pass and is
// removed on every exit path, including unwinding.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use printall_core::PrintConfig;
use printall_core::error::{PrintAllError, Result};
use printall_core::types::{
    CandidateFile, DispatchResult, ItemOutcome, PageCount, PageRange, PrintItem, RunId,
    RunOutcome, RunStatus,
};
use printall_document::ImageConsolidator;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

use crate::converter::OfficeConverter;
use crate::dispatch::PrintDispatcher;
use crate::page_count::PageCounter;
use crate::progress::{Progress, ProgressEvent};
use crate::queue::{FilterDecision, PageFilter, build_queue};
use crate::scanner::DirectoryScanner;

/// Prefix of the per-run workspace directory.
pub const WORKSPACE_PREFIX: &str = "batch_print_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Scanning,
    Consolidating,
    Merging,
    Filtering,
    Printing,
    Done,
    FailedPrecondition,
}

/// One configured batch print run.
pub struct PrintPipeline {
    run_id: RunId,
    config: PrintConfig,
    converter: OfficeConverter,
}

impl PrintPipeline {
    pub fn new(config: PrintConfig) -> Self {
        Self {
            run_id: RunId::new(),
            converter: OfficeConverter::from_config(&config),
            config,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    /// Checks that need nothing but the configuration and the converter path.
    pub fn check_preconditions(&self) -> Result<()> {
        self.config.validate()?;
        if self.config.requires_converter() {
            self.converter.ensure_present()?;
        }
        Ok(())
    }

    /// Execute the run to completion.
    ///
    /// Only precondition and scan failures are returned as errors; every
    /// per-file problem is reported through `progress` and the outcome's
    /// counts.
    #[instrument(skip_all, fields(run_id = %self.run_id))]
    pub async fn run(&self, progress: &Progress) -> Result<RunOutcome> {
        let started_at = Utc::now();
        progress.stage(PipelineStage::Idle);

        if let Err(err) = self.check_preconditions() {
            progress.stage(PipelineStage::FailedPrecondition);
            progress.warn(format!("Cannot start printing: {err}"));
            return Err(err);
        }

        progress.line("-".repeat(20));
        progress.line(format!(
            "Starting print run: folder {}, printer \"{}\"",
            self.config.directory.display(),
            self.config.printer_name
        ));
        let range = self.config.page_range()?;
        if let Some(range) = range {
            progress.line(format!(
                "Page filter enabled: >= {} and <= {}",
                range.min(),
                range.max()
            ));
        }

        let workspace = self.create_workspace()?;
        info!(workspace = %workspace.path().display(), "Workspace created");

        let result = self
            .run_in_workspace(workspace.path(), range, started_at, progress)
            .await;

        match workspace.close() {
            Ok(()) => progress.line("Temporary files removed."),
            Err(err) => progress.warn(format!("Could not remove temporary files: {err}")),
        }
        progress.stage(PipelineStage::Done);
        result
    }

    fn create_workspace(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match &self.config.workspace_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    async fn run_in_workspace(
        &self,
        workspace: &Path,
        range: Option<PageRange>,
        started_at: DateTime<Utc>,
        progress: &Progress,
    ) -> Result<RunOutcome> {
        // -- Scanning ---------------------------------------------------------
        progress.stage(PipelineStage::Scanning);
        let scan = DirectoryScanner::new(&self.config.directory)
            .scan(&self.config.enabled_formats())?;
        progress.line(format!(
            "Found {} image(s) and {} document(s).",
            scan.images.len(),
            scan.documents.len()
        ));

        // -- Consolidating ----------------------------------------------------
        let consolidated = if scan.images.is_empty() {
            None
        } else {
            progress.stage(PipelineStage::Consolidating);
            self.consolidate_images(&scan.images, workspace, progress).await
        };

        // -- Merging ----------------------------------------------------------
        progress.stage(PipelineStage::Merging);
        let queue = build_queue(scan.documents, consolidated);
        if queue.is_empty() {
            progress.line("No files to print were found.");
            return Ok(RunOutcome::empty(self.run_id, RunStatus::NothingFound, started_at));
        }

        // -- Filtering --------------------------------------------------------
        let queue = match range {
            Some(range) => {
                progress.stage(PipelineStage::Filtering);
                self.filter_by_pages(queue, range, workspace, progress).await
            }
            None => queue,
        };

        progress.line("-".repeat(20));
        progress.line("Final print queue:");
        if queue.is_empty() {
            progress.line("  (no files passed the filter)");
        }
        for (index, item) in queue.iter().enumerate() {
            progress.line(format!("  {}. {}", index + 1, item.file_name()));
        }
        progress.line("-".repeat(20));
        if queue.is_empty() {
            progress.line("Nothing to print.");
            return Ok(RunOutcome::empty(self.run_id, RunStatus::AllFilteredOut, started_at));
        }

        // -- Printing ---------------------------------------------------------
        progress.stage(PipelineStage::Printing);
        let dispatcher =
            PrintDispatcher::new(self.converter.clone(), self.config.printer_name.clone());
        let total = queue.len();
        let mut items = Vec::with_capacity(total);
        for (index, item) in queue.into_iter().enumerate() {
            progress.line(format!("Printing {}/{}: {}", index + 1, total, item.file_name()));
            let result = dispatcher.dispatch(&item).await;
            match &result {
                DispatchResult::Printed => progress.line("  sent to printer"),
                DispatchResult::Failed { reason } => {
                    progress.warn(format!("  print failed: {reason}"))
                }
            }
            items.push(ItemOutcome {
                path: item.path,
                result,
            });
        }

        let outcome = RunOutcome::completed(self.run_id, started_at, items);
        progress.line(format!(
            "Printing finished. Attempted: {}, succeeded: {}, failed: {}",
            outcome.attempted, outcome.succeeded, outcome.failed
        ));
        Ok(outcome)
    }

    /// Lay the images out into one document in the workspace. Failures here
    /// only cost the images; the documents still print.
    async fn consolidate_images(
        &self,
        images: &[CandidateFile],
        workspace: &Path,
        progress: &Progress,
    ) -> Option<PathBuf> {
        progress.line(format!("Merging {} image(s)...", images.len()));
        let consolidator = ImageConsolidator::new(
            self.config.paper_size,
            self.config.dpi,
            self.config.margin_px,
        );
        let paths: Vec<PathBuf> = images.iter().map(|image| image.path.clone()).collect();
        let output_dir = workspace.to_path_buf();

        // Decoding and resampling are CPU-bound.
        let joined =
            tokio::task::spawn_blocking(move || consolidator.consolidate(&paths, &output_dir)).await;

        let consolidated = match joined {
            Ok(result) => result,
            Err(err) => Err(PrintAllError::ImageError(format!("merge task failed: {err}"))),
        };
        match consolidated {
            Ok(Some(document)) => {
                for skipped in &document.skipped {
                    progress.warn(format!(
                        "  Image skipped: {} ({})",
                        file_name(&skipped.path),
                        skipped.reason
                    ));
                }
                progress.line(format!(
                    "  Images merged into: {} ({} page(s))",
                    file_name(&document.path),
                    document.pages
                ));
                Some(document.path)
            }
            Ok(None) => {
                progress.warn("  None of the images could be placed on a page.");
                None
            }
            Err(err) => {
                progress.warn(format!("  Image merge failed: {err}"));
                None
            }
        }
    }

    async fn filter_by_pages(
        &self,
        queue: Vec<PrintItem>,
        range: PageRange,
        workspace: &Path,
        progress: &Progress,
    ) -> Vec<PrintItem> {
        progress.line("Checking page counts...");
        let counter = PageCounter::new(self.converter.clone(), workspace);

        let mut entries = Vec::with_capacity(queue.len());
        for item in queue {
            let pages = if item.family().is_page_countable() {
                let report = counter.count(&item.path).await;
                if let Some(reason) = &report.reason {
                    progress.warn(format!(
                        "  [page count] {}: {reason}",
                        item.file_name()
                    ));
                }
                report.pages
            } else {
                PageCount::Unknown
            };
            entries.push((item, pages));
        }

        let filtered = PageFilter::new(range).apply(entries);
        for (item, decision) in &filtered.decisions {
            match decision {
                FilterDecision::NotCountable => {}
                FilterDecision::Excluded { .. } => progress.line(format!(
                    "  -> '{}' skipped: {decision}",
                    item.file_name()
                )),
                FilterDecision::Included { .. } | FilterDecision::IncludedUnknown => progress
                    .line(format!("  -> '{}' included: {decision}", item.file_name())),
            }
        }
        filtered.kept
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A run executing on its own task.
pub struct PipelineHandle {
    pub run_id: RunId,
    /// Progress events; closes when the run ends.
    pub events: mpsc::UnboundedReceiver<ProgressEvent>,
    /// Resolves once with the run's outcome.
    pub outcome: JoinHandle<Result<RunOutcome>>,
}

/// Start a run on the tokio runtime and hand back its event stream.
pub fn spawn_pipeline(config: PrintConfig) -> PipelineHandle {
    let (progress, events) = Progress::channel();
    let pipeline = PrintPipeline::new(config);
    let run_id = pipeline.run_id();
    let outcome = tokio::spawn(async move { pipeline.run(&progress).await });
    PipelineHandle {
        run_id,
        events,
        outcome,
    }
}
