// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration file location and loading.

use std::path::{Path, PathBuf};

use printall_core::PrintConfig;
use printall_core::error::Result;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

/// Per-user configuration file, whether or not it exists yet.
pub fn default_config_path() -> Option<PathBuf> {
    config_base().map(|base| base.join("printall").join(CONFIG_FILE))
}

#[cfg(windows)]
fn config_base() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(windows))]
fn config_base() -> Option<PathBuf> {
    // XDG config dir, then ~/.config
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
}

/// Load `explicit` if given (it must exist), else the per-user file if it
/// exists, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<PrintConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "Loading configuration");
        return PrintConfig::load(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => {
            info!(path = %path.display(), "Loading per-user configuration");
            PrintConfig::load(&path)
        }
        _ => {
            debug!("No configuration file; using defaults");
            Ok(PrintConfig::default())
        }
    }
}

/// Write a default configuration to `path`, creating parent directories.
pub fn init_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    PrintConfig::default().save(path)?;
    info!(path = %path.display(), "Default configuration written");
    Ok(())
}
