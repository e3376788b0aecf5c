//! Extraction options and configuration.

use serde::{Deserialize, Serialize};

use super::TableDetectorConfig;

/// Options for the content extraction pipeline.
///
/// Page text and combined text are always produced; the other artifact
/// kinds can be switched off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Emit formula-like lines per page
    pub formulas: bool,

    /// Emit embedded images and their `.npy` dumps
    pub images: bool,

    /// Run the table detection pass
    pub tables: bool,

    /// Table detector thresholds
    pub table_config: TableDetectorConfig,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable formula detection.
    pub fn with_formulas(mut self, enabled: bool) -> Self {
        self.formulas = enabled;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.images = enabled;
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, enabled: bool) -> Self {
        self.tables = enabled;
        self
    }

    /// Set table detector thresholds.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Extract text only (no formulas, images or tables).
    pub fn text_only(self) -> Self {
        self.with_formulas(false).with_images(false).with_tables(false)
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            formulas: true,
            images: true,
            tables: true,
            table_config: TableDetectorConfig::default(),
        }
    }
}
