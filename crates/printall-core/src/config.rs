// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration. Read once at the start of a pipeline run and treated as
// immutable for its duration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PrintAllError, Result};
use crate::types::{DocumentFormat, PageRange, PaperSize};

/// Default location of the LibreOffice `soffice` executable.
#[cfg(windows)]
pub const DEFAULT_CONVERTER_PATH: &str = r"C:\Program Files\LibreOffice\program\soffice.exe";
#[cfg(not(windows))]
pub const DEFAULT_CONVERTER_PATH: &str = "/usr/bin/soffice";

/// Default render resolution for consolidated image pages.
pub const DEFAULT_DPI: u32 = 300;

/// Default wall-clock bound on a single page-count conversion.
pub const DEFAULT_CONVERSION_TIMEOUT_SECS: u64 = 60;

/// Document kinds selected for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentToggles {
    pub doc: bool,
    pub docx: bool,
    pub pdf: bool,
}

impl Default for DocumentToggles {
    fn default() -> Self {
        Self {
            doc: true,
            docx: true,
            pdf: true,
        }
    }
}

/// Image kinds selected for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageToggles {
    pub jpg: bool,
    pub png: bool,
    pub bmp: bool,
}

impl Default for ImageToggles {
    fn default() -> Self {
        Self {
            jpg: true,
            png: true,
            bmp: true,
        }
    }
}

/// Page-count filter settings, enabled or disabled as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFilterConfig {
    pub enabled: bool,
    pub min: u32,
    pub max: u32,
}

impl Default for PageFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min: 1,
            max: 2,
        }
    }
}

/// Everything one batch print run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Folder whose files are printed (not recursed).
    pub directory: PathBuf,
    /// Printer name exactly as registered on the host.
    pub printer_name: String,
    pub documents: DocumentToggles,
    pub images: ImageToggles,
    pub page_filter: PageFilterConfig,
    /// Blank border, in pixels, on every edge of a consolidated image page.
    pub margin_px: u32,
    /// Path to the office conversion executable (`soffice`).
    pub converter_path: PathBuf,
    /// Paper the consolidated image pages are laid out on.
    pub paper_size: PaperSize,
    /// Render resolution for consolidated image pages.
    pub dpi: u32,
    pub conversion_timeout_secs: u64,
    /// Parent directory for the per-run workspace; system temp dir if unset.
    pub workspace_root: Option<PathBuf>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            printer_name: String::new(),
            documents: DocumentToggles::default(),
            images: ImageToggles::default(),
            page_filter: PageFilterConfig::default(),
            margin_px: 100,
            converter_path: PathBuf::from(DEFAULT_CONVERTER_PATH),
            paper_size: PaperSize::A4,
            dpi: DEFAULT_DPI,
            conversion_timeout_secs: DEFAULT_CONVERSION_TIMEOUT_SECS,
            workspace_root: None,
        }
    }
}

impl PrintConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Formats the user has enabled, in configuration order.
    pub fn enabled_formats(&self) -> Vec<DocumentFormat> {
        DocumentFormat::ALL
            .into_iter()
            .filter(|format| self.is_enabled(*format))
            .collect()
    }

    pub fn is_enabled(&self, format: DocumentFormat) -> bool {
        match format {
            DocumentFormat::Doc => self.documents.doc,
            DocumentFormat::Docx => self.documents.docx,
            DocumentFormat::Pdf => self.documents.pdf,
            DocumentFormat::Jpg => self.images.jpg,
            DocumentFormat::Png => self.images.png,
            DocumentFormat::Bmp => self.images.bmp,
        }
    }

    /// Whether the selected kinds can only be handled through the converter.
    pub fn requires_converter(&self) -> bool {
        self.documents.doc || self.documents.docx
    }

    /// The active filter range, or `None` when filtering is disabled.
    pub fn page_range(&self) -> Result<Option<PageRange>> {
        if !self.page_filter.enabled {
            return Ok(None);
        }
        PageRange::new(self.page_filter.min, self.page_filter.max).map(Some)
    }

    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_secs(self.conversion_timeout_secs)
    }

    /// Check the settings that do not depend on the host filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(PrintAllError::InvalidConfig(
                "no folder selected".into(),
            ));
        }
        if self.printer_name.trim().is_empty() {
            return Err(PrintAllError::InvalidConfig(
                "no printer name given".into(),
            ));
        }
        if self.dpi == 0 {
            return Err(PrintAllError::InvalidConfig("dpi must be positive".into()));
        }
        self.page_range()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PrintConfig {
        PrintConfig {
            directory: "/tmp/docs".into(),
            printer_name: "Office-1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_enable_everything() {
        let config = PrintConfig::default();
        assert_eq!(config.enabled_formats().len(), 6);
        assert!(config.requires_converter());
        assert_eq!(config.margin_px, 100);
        assert_eq!(config.conversion_timeout(), Duration::from_secs(60));
        assert_eq!(config.page_range().unwrap(), None);
    }

    #[test]
    fn pdf_only_does_not_need_converter() {
        let config = PrintConfig {
            documents: DocumentToggles {
                doc: false,
                docx: false,
                pdf: true,
            },
            ..valid()
        };
        assert!(!config.requires_converter());
    }

    #[test]
    fn missing_printer_is_rejected() {
        let config = PrintConfig {
            printer_name: "  ".into(),
            ..valid()
        };
        assert!(config.validate().unwrap_err().is_precondition());
    }

    #[test]
    fn inverted_filter_is_rejected_only_when_enabled() {
        let mut config = valid();
        config.page_filter = PageFilterConfig {
            enabled: false,
            min: 5,
            max: 1,
        };
        assert!(config.validate().is_ok());
        config.page_filter.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_margin_is_not_a_config_error() {
        let config = PrintConfig {
            margin_px: 5000,
            ..valid()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config: PrintConfig =
            serde_json::from_str(r#"{"printer_name":"Office-1","images":{"bmp":false}}"#).unwrap();
        assert_eq!(config.printer_name, "Office-1");
        assert!(config.images.jpg);
        assert!(!config.images.bmp);
        assert_eq!(config.dpi, DEFAULT_DPI);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("printall.json");
        let config = valid();
        config.save(&path).unwrap();
        assert_eq!(PrintConfig::load(&path).unwrap(), config);
    }
}
