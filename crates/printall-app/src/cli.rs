// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface. Flags override individual fields of the loaded
// configuration; anything not given on the command line keeps its configured
// (or default) value.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use printall_core::PaperSize;
use printall_core::PrintConfig;

#[derive(Parser)]
#[command(
    name = "printall",
    about = "Batch print every document and image in a folder",
    author,
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the folder.
    Run(RunArgs),
    /// List the printers registered on this machine.
    Printers,
    /// Show the effective configuration, or write a default one.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Configuration file (JSON). Defaults to the per-user config if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder to print.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Printer name exactly as the system knows it. Defaults to the system
    /// default printer.
    #[arg(long, value_name = "NAME")]
    pub printer: Option<String>,

    /// Path to LibreOffice `soffice`.
    #[arg(long, value_name = "PATH")]
    pub converter: Option<PathBuf>,

    #[arg(long)]
    pub no_doc: bool,
    #[arg(long)]
    pub no_docx: bool,
    #[arg(long)]
    pub no_pdf: bool,
    #[arg(long)]
    pub no_jpg: bool,
    #[arg(long)]
    pub no_png: bool,
    #[arg(long)]
    pub no_bmp: bool,

    /// Only print documents with at least this many pages. Enables the page
    /// filter.
    #[arg(long, value_name = "N")]
    pub min_pages: Option<u32>,

    /// Only print documents with at most this many pages. Enables the page
    /// filter.
    #[arg(long, value_name = "N")]
    pub max_pages: Option<u32>,

    /// Blank border around each image page, in pixels.
    #[arg(long, value_name = "PX")]
    pub margin: Option<u32>,

    /// Paper for image pages.
    #[arg(long, value_name = "SIZE")]
    pub paper: Option<PaperChoice>,

    /// Print the run outcome as JSON on stdout; progress goes to stderr.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write a default configuration to FILE.
    #[arg(long, value_name = "FILE")]
    pub init: Option<PathBuf>,

    /// Configuration file to show instead of the per-user one.
    #[arg(long, value_name = "FILE", conflicts_with = "init")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaperChoice {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PaperChoice> for PaperSize {
    fn from(choice: PaperChoice) -> Self {
        match choice {
            PaperChoice::A3 => PaperSize::A3,
            PaperChoice::A4 => PaperSize::A4,
            PaperChoice::A5 => PaperSize::A5,
            PaperChoice::Letter => PaperSize::Letter,
            PaperChoice::Legal => PaperSize::Legal,
        }
    }
}

impl RunArgs {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut PrintConfig) {
        if let Some(dir) = &self.dir {
            config.directory = dir.clone();
        }
        if let Some(printer) = &self.printer {
            config.printer_name = printer.clone();
        }
        if let Some(converter) = &self.converter {
            config.converter_path = converter.clone();
        }

        config.documents.doc &= !self.no_doc;
        config.documents.docx &= !self.no_docx;
        config.documents.pdf &= !self.no_pdf;
        config.images.jpg &= !self.no_jpg;
        config.images.png &= !self.no_png;
        config.images.bmp &= !self.no_bmp;

        if self.min_pages.is_some() || self.max_pages.is_some() {
            config.page_filter.enabled = true;
        }
        if let Some(min) = self.min_pages {
            config.page_filter.min = min;
        }
        if let Some(max) = self.max_pages {
            config.page_filter.max = max;
        }

        if let Some(margin) = self.margin {
            config.margin_px = margin;
        }
        if let Some(paper) = self.paper {
            config.paper_size = paper.into();
        }
    }
}
