// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end pipeline runs against a stand-in `soffice` shell script.
//
// The script appends one line per invocation to `calls.log`. Conversions copy
// `<fixtures>/<stem>.pdf` into the output directory when it exists (and do
// nothing otherwise); a file stemmed `slow` sleeps past the timeout. Print
// calls copy the printed file into `printed/` and fail for the configured
// file name.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use printall_core::config::{DocumentToggles, PageFilterConfig};
use printall_core::types::{DispatchResult, PaperSize, RunStatus};
use printall_core::PrintConfig;
use printall_document::pdf::reader::count_pages;
use printall_document::PdfWriter;
use printall_print::{PipelineStage, PrintPipeline, Progress, ProgressEvent, spawn_pipeline};
use tempfile::TempDir;

struct Harness {
    /// Folder being printed.
    folder: TempDir,
    /// Parent of the run workspace; must be empty after every run.
    workspace_root: TempDir,
    /// Script, fixtures, call log and printed copies.
    tools: TempDir,
    converter: PathBuf,
}

impl Harness {
    fn new(fail_on: &str) -> Self {
        let folder = tempfile::tempdir().unwrap();
        let workspace_root = tempfile::tempdir().unwrap();
        let tools = tempfile::tempdir().unwrap();
        std::fs::create_dir(tools.path().join("fixtures")).unwrap();
        std::fs::create_dir(tools.path().join("printed")).unwrap();

        let converter = tools.path().join("soffice");
        let script = format!(
            r#"#!/bin/sh
tools='{tools}'
echo "$@" >> "$tools/calls.log"
case "$2" in
  --convert-to)
    name=${{6##*/}}
    stem=${{name%.*}}
    if [ "$stem" = "slow" ]; then sleep 5; fi
    if [ -f "$tools/fixtures/$stem.pdf" ]; then
      cp "$tools/fixtures/$stem.pdf" "$5/$stem.pdf"
    fi
    ;;
  --pt)
    name=${{4##*/}}
    if [ "$name" = '{fail_on}' ]; then
      echo "printer $3 jammed" >&2
      exit 1
    fi
    cp "$4" "$tools/printed/$name"
    ;;
esac
exit 0
"#,
            tools = tools.path().display(),
            fail_on = fail_on,
        );
        std::fs::write(&converter, script).unwrap();
        std::fs::set_permissions(&converter, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            folder,
            workspace_root,
            tools,
            converter,
        }
    }

    fn config(&self) -> PrintConfig {
        PrintConfig {
            directory: self.folder.path().to_path_buf(),
            printer_name: "Office-1".into(),
            converter_path: self.converter.clone(),
            workspace_root: Some(self.workspace_root.path().to_path_buf()),
            margin_px: 10,
            dpi: 100,
            ..Default::default()
        }
    }

    fn pdf(&self, name: &str, pages: usize) {
        write_pdf(&self.folder.path().join(name), pages);
    }

    fn file(&self, name: &str) {
        std::fs::write(self.folder.path().join(name), b"word document").unwrap();
    }

    fn image(&self, name: &str, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([200, 40, 40]))
            .save(self.folder.path().join(name))
            .unwrap();
    }

    /// What converting `<stem>.docx` should produce.
    fn conversion_fixture(&self, stem: &str, pages: usize) {
        write_pdf(&self.tools.path().join("fixtures").join(format!("{stem}.pdf")), pages);
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.tools.path().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn printed(&self, name: &str) -> PathBuf {
        self.tools.path().join("printed").join(name)
    }

    fn workspace_is_gone(&self) -> bool {
        std::fs::read_dir(self.workspace_root.path()).unwrap().count() == 0
    }
}

fn write_pdf(path: &Path, pages: usize) {
    PdfWriter::new(PaperSize::A4, 72)
        .write_blank_to_file(pages, path)
        .unwrap();
}

fn names(paths: &[&Path]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

async fn run_collecting_lines(config: PrintConfig) -> (printall_core::RunOutcome, Vec<String>) {
    let mut handle = spawn_pipeline(config);
    let mut lines = Vec::new();
    while let Some(event) = handle.events.recv().await {
        if let ProgressEvent::Line(line) = event {
            lines.push(line);
        }
    }
    (handle.outcome.await.unwrap().unwrap(), lines)
}

#[tokio::test]
async fn basic_batch_prints_in_natural_order_and_counts_failures() {
    let harness = Harness::new("a.pdf");
    harness.pdf("b.pdf", 1);
    harness.pdf("a.pdf", 1);
    harness.file("c.docx");

    let outcome = PrintPipeline::new(harness.config())
        .run(&Progress::silent())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(
        (outcome.attempted, outcome.succeeded, outcome.failed),
        (3, 2, 1)
    );
    assert_eq!(names(&outcome.attempted_paths()), ["a.pdf", "b.pdf", "c.docx"]);
    assert_eq!(
        outcome.items[0].result,
        DispatchResult::Failed {
            reason: "exit code 1: printer Office-1 jammed".into()
        }
    );

    let calls = harness.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|call| call.starts_with("--headless --pt Office-1 ")));
    assert!(calls[2].ends_with("/c.docx"));
    assert!(harness.workspace_is_gone());
}

#[tokio::test]
async fn images_are_consolidated_into_one_leading_item() {
    let harness = Harness::new("");
    harness.image("img1.jpg", 100, 100);
    harness.image("img2.jpg", 200, 50);
    harness.pdf("annex.pdf", 1);

    let outcome = PrintPipeline::new(harness.config())
        .run(&Progress::silent())
        .await
        .unwrap();

    assert_eq!(
        names(&outcome.attempted_paths()),
        ["_merged_images.pdf", "annex.pdf"]
    );
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(count_pages(harness.printed("_merged_images.pdf")).unwrap(), 2);
    // Generated in the workspace, never in the folder being printed.
    assert!(!harness.folder.path().join("_merged_images.pdf").exists());
    assert!(harness.workspace_is_gone());
}

#[tokio::test]
async fn page_filter_excludes_out_of_range_documents() {
    let harness = Harness::new("");
    harness.file("long.docx");
    harness.conversion_fixture("long", 5);
    harness.file("memo.docx");
    harness.conversion_fixture("memo", 2);
    harness.file("mystery.docx");
    harness.pdf("short.pdf", 1);
    harness.image("photo.png", 10, 10);

    let config = PrintConfig {
        page_filter: PageFilterConfig {
            enabled: true,
            min: 1,
            max: 2,
        },
        ..harness.config()
    };
    let (outcome, lines) = run_collecting_lines(config).await;

    // `mystery.docx` has no conversion output: unknown, so it stays.
    assert_eq!(
        names(&outcome.attempted_paths()),
        ["_merged_images.pdf", "memo.docx", "mystery.docx", "short.pdf"]
    );
    assert!(lines.contains(&"  -> 'long.docx' skipped: 5 pages not in [1,2]".to_string()));
    assert!(lines.contains(&"  -> 'memo.docx' included: 2 pages".to_string()));
    assert!(lines.contains(&"  -> 'mystery.docx' included: page count unknown, kept".to_string()));
    assert!(lines.iter().any(|line| line == "  3. mystery.docx"));
    assert!(harness.workspace_is_gone());
}

#[tokio::test]
async fn conversion_timeout_counts_as_unknown() {
    let harness = Harness::new("");
    harness.file("slow.docx");
    harness.conversion_fixture("slow", 9);

    let config = PrintConfig {
        page_filter: PageFilterConfig {
            enabled: true,
            min: 1,
            max: 1,
        },
        conversion_timeout_secs: 1,
        ..harness.config()
    };
    let (outcome, lines) = run_collecting_lines(config).await;

    assert_eq!(names(&outcome.attempted_paths()), ["slow.docx"]);
    assert!(lines.iter().any(|line| line.contains("slow.docx: conversion timed out")));
    assert!(harness.workspace_is_gone());
}

#[tokio::test]
async fn everything_filtered_out_is_a_distinct_outcome() {
    let harness = Harness::new("");
    harness.pdf("thick.pdf", 4);

    let config = PrintConfig {
        page_filter: PageFilterConfig {
            enabled: true,
            min: 1,
            max: 2,
        },
        ..harness.config()
    };
    let (outcome, lines) = run_collecting_lines(config).await;

    assert_eq!(outcome.status, RunStatus::AllFilteredOut);
    assert_eq!(outcome.attempted, 0);
    assert!(lines.contains(&"  (no files passed the filter)".to_string()));
    assert!(harness.calls().is_empty());
    assert!(harness.workspace_is_gone());
}

#[tokio::test]
async fn missing_converter_aborts_without_side_effects() {
    let harness = Harness::new("");
    harness.pdf("a.pdf", 1);
    harness.file("b.docx");

    let config = PrintConfig {
        converter_path: harness.tools.path().join("not-installed"),
        documents: DocumentToggles::default(),
        ..harness.config()
    };
    let mut handle = spawn_pipeline(config);
    let mut stages = Vec::new();
    while let Some(event) = handle.events.recv().await {
        if let ProgressEvent::Stage(stage) = event {
            stages.push(stage);
        }
    }
    let err = handle.outcome.await.unwrap().unwrap_err();

    assert!(err.is_precondition());
    assert_eq!(stages, [PipelineStage::Idle, PipelineStage::FailedPrecondition]);
    assert!(harness.calls().is_empty());
    assert!(harness.workspace_is_gone());
}

#[tokio::test]
async fn oversized_margin_does_not_stop_documents() {
    let harness = Harness::new("");
    harness.pdf("a.pdf", 1);
    harness.pdf("b.pdf", 2);

    let config = PrintConfig {
        margin_px: 5000,
        ..harness.config()
    };
    let outcome = PrintPipeline::new(config)
        .run(&Progress::silent())
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(names(&outcome.attempted_paths()), ["a.pdf", "b.pdf"]);
    assert_eq!(outcome.succeeded, 2);
    assert!(harness.workspace_is_gone());
}

#[tokio::test]
async fn oversized_margin_only_costs_the_images() {
    let harness = Harness::new("");
    harness.image("photo.png", 40, 40);
    harness.pdf("annex.pdf", 1);

    let config = PrintConfig {
        margin_px: 5000,
        ..harness.config()
    };
    let (outcome, lines) = run_collecting_lines(config).await;

    assert_eq!(names(&outcome.attempted_paths()), ["annex.pdf"]);
    assert_eq!(outcome.succeeded, 1);
    assert!(lines.contains(&"  None of the images could be placed on a page.".to_string()));
    assert!(harness.workspace_is_gone());
}
