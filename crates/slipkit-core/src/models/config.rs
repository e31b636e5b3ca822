//! Configuration structures for extraction and label layout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlipError};

/// Main configuration for the slipkit pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipConfig {
    /// Packing slip extraction configuration.
    pub extraction: ExtractionConfig,

    /// Label layout configuration.
    pub labels: LabelConfig,
}

/// Packing slip extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Split a bulk-printed PDF into one slip per "Order ID" anchor.
    pub split_orders: bool,

    /// Merge identical line items of the same order before rendering.
    pub group_duplicates: bool,

    /// How many lines above a SKU line may hold the item's quantity/title.
    pub title_lookback_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            split_orders: true,
            group_duplicates: false,
            title_lookback_lines: 8,
        }
    }
}

/// Label layout configuration. All lengths are in PDF points (1/72 in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,

    /// Order number / date line.
    pub header_font_size: f32,

    /// "SKU × qty" headline.
    pub product_font_size: f32,

    /// Title, colors, customization and gift text.
    pub body_font_size: f32,

    /// Footer text.
    pub footer_font_size: f32,

    /// Baseline distance for body text.
    pub line_leading: f32,

    /// Upper bound on customization lines; the region height may allow fewer.
    pub customization_lines: usize,

    /// Static footer boilerplate printed on every label.
    pub footer_text: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            margin_left: 25.2,   // 0.35 in
            margin_right: 25.2,  // 0.35 in
            margin_top: 36.0,    // 0.5 in
            margin_bottom: 18.0, // 0.25 in
            header_font_size: 12.0,
            product_font_size: 16.0,
            body_font_size: 11.0,
            footer_font_size: 8.0,
            line_leading: 14.0,
            customization_lines: 6,
            footer_text: "Check personalization before production".to_string(),
        }
    }
}

impl SlipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SlipError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| SlipError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SlipConfig =
            serde_json::from_str(r#"{"labels": {"body_font_size": 10.0}}"#).unwrap();
        assert_eq!(config.labels.body_font_size, 10.0);
        assert_eq!(config.labels.margin_top, 36.0);
        assert!(config.extraction.split_orders);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SlipConfig::default();
        config.labels.customization_lines = 4;
        config.save(&path).unwrap();

        assert_eq!(SlipConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = SlipConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, SlipError::Io(_)));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"labels": {"body_font_size": "large"}}"#).unwrap();
        let bad = SlipConfig::from_file(&path).unwrap_err();
        assert!(matches!(bad, SlipError::Config(ref msg) if msg.contains("bad.json")));
    }
}
