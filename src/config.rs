//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/winsnap/config.json` or the path given with
//! `--config <path>`.  Every section is optional.
//!
//! # Example
//!
//! ```json
//! {
//!   "grid": {
//!     "columns": 6,
//!     "rows": 2,
//!     "margin_x": 5.0,
//!     "margin_y": 5.0
//!   },
//!   "placement": {
//!     "margin": 0.0,
//!     "increment": 0.1
//!   }
//! }
//! ```

use crate::grid::GridConfig;
use crate::sizing::DEFAULT_INCREMENT;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// A minimal `{}` file is valid and all sections fall back to their
/// compiled-in defaults.  Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Initial grid granularity and cell margins.
    #[serde(default)]
    pub grid: GridConfig,

    /// Anchor and resize settings.
    #[serde(default)]
    pub placement: PlacementConfig,
}

/// Settings for anchor moves, fractional fills and step resizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Inset, in pixels, applied to corner anchors and fractional fills.
    pub margin: f64,
    /// Fraction of the screen added or removed by one resize step.
    pub increment: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            increment: DEFAULT_INCREMENT,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    ///
    /// The result is already [`validated`](Config::validated).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Copy with out-of-range values pulled back into range: at least one
    /// column and row, no negative margins or increment.
    pub fn validated(self) -> Self {
        Self {
            grid: self.grid.validated(),
            placement: PlacementConfig {
                margin: self.placement.margin.max(0.0),
                increment: self.placement.increment.max(0.0),
            },
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{DEFAULT_COLUMNS, DEFAULT_MARGIN, DEFAULT_ROWS};

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "grid": {
                "columns": 8,
                "rows": 3,
                "margin_x": 4.0,
                "margin_y": 6.0
            },
            "placement": {
                "margin": 12.0,
                "increment": 0.05
            }
        }"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.grid.columns, 8);
        assert_eq!(cfg.grid.rows, 3);
        assert_eq!(cfg.grid.margin_x, 4.0);
        assert_eq!(cfg.grid.margin_y, 6.0);
        assert_eq!(cfg.placement.margin, 12.0);
        assert_eq!(cfg.placement.increment, 0.05);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.grid.columns, DEFAULT_COLUMNS);
        assert_eq!(cfg.grid.rows, DEFAULT_ROWS);
        assert_eq!(cfg.grid.margin_x, DEFAULT_MARGIN);
        assert_eq!(cfg.grid.margin_y, DEFAULT_MARGIN);
        assert_eq!(cfg.placement, PlacementConfig::default());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn deserialize_partial_grid() {
        let cfg = Config::from_json(r#"{ "grid": { "columns": 4 } }"#).unwrap();
        assert_eq!(cfg.grid.columns, 4);
        assert_eq!(cfg.grid.rows, DEFAULT_ROWS);
        assert_eq!(cfg.placement.increment, DEFAULT_INCREMENT);
    }

    #[test]
    fn zero_columns_are_raised_to_one() {
        let cfg = Config::from_json(r#"{ "grid": { "columns": 0, "rows": 0 } }"#).unwrap();
        assert_eq!(cfg.grid.columns, 1);
        assert_eq!(cfg.grid.rows, 1);
    }

    #[test]
    fn negative_values_are_floored() {
        let cfg = Config::from_json(
            r#"{ "grid": { "margin_x": -3 }, "placement": { "margin": -1, "increment": -0.2 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.grid.margin_x, 0.0);
        assert_eq!(cfg.placement.margin, 0.0);
        assert_eq!(cfg.placement.increment, 0.0);
    }

    #[test]
    fn negative_columns_are_rejected() {
        assert!(Config::from_json(r#"{ "grid": { "columns": -2 } }"#).is_err());
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "grid": {}, "future_section": { "key": 42 } }"#;
        // Unknown keys are silently ignored.
        let _cfg = Config::from_json(json).unwrap();
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "winsnap-missing-{}/config.json",
            std::process::id()
        ));
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error: failed to read"));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("winsnap-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "placement": { "margin": 8 } }"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.placement.margin, 8.0);
        assert_eq!(cfg.grid, crate::grid::GridConfig::default());
    }
}
