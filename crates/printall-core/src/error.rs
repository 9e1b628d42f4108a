// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PrintALL.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all PrintALL operations.
#[derive(Debug, Error)]
pub enum PrintAllError {
    // -- Preconditions --
    #[error("office converter not found at {}", .0.display())]
    ConverterMissing(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Scanning --
    #[error("cannot read directory {}: {reason}", path.display())]
    DirectoryUnreadable { path: PathBuf, reason: String },

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- External processes --
    #[error("failed to launch {program}: {reason}")]
    ProcessLaunch { program: String, reason: String },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrintAllError {
    /// Errors detected before a run touches the filesystem.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::ConverterMissing(_) | Self::InvalidConfig(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintAllError>;
