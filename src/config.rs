use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::CostFallback;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "BIZBOARD_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Dashboard settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows shown in each table preview.
    pub preview_rows: usize,
    /// Bins of the purchase-price histogram.
    pub histogram_bins: usize,
    /// Initial window size `[width, height]`.
    pub window_size: [f32; 2],
    /// Unit cost used when sales data has no `Cost price` column.
    pub cost_fallback: CostFallback,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: 30,
            window_size: [1200.0, 800.0],
            cost_fallback: CostFallback::Zero,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Read the file named by `BIZBOARD_CONFIG`, or fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("Reading config from {}", Path::new(&path).display());
                Self::from_file(Path::new(&path))
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"histogram_bins": 10, "cost_fallback": "price_each"}}"#).unwrap();
        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.cost_fallback, CostFallback::PriceEach);
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "preview_rows = 3").unwrap();
        assert!(matches!(
            DashboardConfig::from_file(file.path()),
            Err(ConfigError::JsonParse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            DashboardConfig::from_file(Path::new("/nonexistent/bizboard.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
