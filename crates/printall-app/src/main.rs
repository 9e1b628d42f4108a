// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PrintALL — batch print a folder of documents and images.
//
// Entry point. Initialises logging, parses the command line, and runs the
// print pipeline on its own task while this task renders its progress.

mod cli;
mod services;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use printall_core::error::{PrintAllError, Result};
use printall_core::human_errors::{Severity, humanize_error};
use printall_core::{PrintConfig, RunOutcome, RunStatus};
use printall_print::{OfficeConverter, ProgressEvent, printers, spawn_pipeline};

use cli::{Cli, Command, ConfigArgs, RunArgs};
use services::config_store;

/// Every item printed, or nothing to do.
const EXIT_OK: u8 = 0;
/// At least one item failed to print.
const EXIT_ITEM_FAILED: u8 = 1;
/// The run could not start.
const EXIT_CANNOT_START: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args).await,
        Command::Printers => show_printers().await,
        Command::Config(args) => config(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            if err.is_precondition() || human.severity == Severity::ActionRequired {
                ExitCode::from(EXIT_CANNOT_START)
            } else {
                ExitCode::from(EXIT_ITEM_FAILED)
            }
        }
    }
}

async fn run(args: RunArgs) -> Result<u8> {
    let mut config = config_store::load_config(args.config.as_deref())?;
    args.apply(&mut config);

    if config.printer_name.trim().is_empty() {
        match printers::default_printer().await {
            Ok(Some(name)) => {
                eprintln!("Using the default printer \"{name}\".");
                config.printer_name = name;
            }
            Ok(None) => {}
            Err(err) => tracing::debug!(error = %err, "Default printer lookup failed"),
        }
    }
    warn_if_converter_missing(&config);

    let json = args.json;
    let mut handle = spawn_pipeline(config);
    tracing::info!(run_id = %handle.run_id, "Run started");

    while let Some(event) = handle.events.recv().await {
        if let ProgressEvent::Line(line) = event {
            if json {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
    }

    let outcome = handle
        .outcome
        .await
        .map_err(|err| PrintAllError::Io(std::io::Error::other(err)))??;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome);
    }

    Ok(if outcome.failed > 0 {
        EXIT_ITEM_FAILED
    } else {
        EXIT_OK
    })
}

/// The converter both counts Word pages and prints every file, so a missing
/// one is reported before the run starts.
fn warn_if_converter_missing(config: &PrintConfig) {
    if !OfficeConverter::from_config(config).exists() {
        eprintln!(
            "warning: LibreOffice was not found at {}. Use --converter to point at soffice.",
            config.converter_path.display()
        );
    }
}

fn print_summary(outcome: &RunOutcome) {
    match outcome.status {
        RunStatus::NothingFound => println!("Nothing to print: no matching files in the folder."),
        RunStatus::AllFilteredOut => println!("Nothing to print: no file passed the page filter."),
        RunStatus::Completed => {
            println!(
                "Done. Succeeded: {}, failed: {}.",
                outcome.succeeded, outcome.failed
            );
        }
    }
}

async fn show_printers() -> Result<u8> {
    let default = printers::default_printer().await.unwrap_or(None);
    let names = printers::list_printers().await?;
    if names.is_empty() {
        println!("No printers found.");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for name in names {
        let marker = if default.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "{name}{marker}")?;
    }
    Ok(EXIT_OK)
}

fn config(args: ConfigArgs) -> Result<u8> {
    if let Some(path) = args.init {
        config_store::init_config(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(EXIT_OK);
    }

    let config = config_store::load_config(args.config.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    if args.config.is_none() {
        if let Some(path) = config_store::default_config_path() {
            eprintln!("(per-user configuration file: {})", path.display());
        }
    }
    Ok(EXIT_OK)
}
