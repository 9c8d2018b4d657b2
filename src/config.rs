use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// Substring that marks a file as a workload profile.
pub const DEFAULT_MARKER: &str = ".workload";

/// Minimum length of every dataset's first axis.
pub const DEFAULT_MIN_LEADING_DIM: usize = 256;

/// Tunable constants of the check.
///
/// JSON config files may set either field; missing fields keep the defaults:
///
/// ```json
/// { "marker": ".workload", "min_leading_dim": 256 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub marker: String,
    pub min_leading_dim: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            min_leading_dim: DEFAULT_MIN_LEADING_DIM,
        }
    }
}

impl CheckConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: CheckConfig = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(
        mut self,
        marker: Option<String>,
        min_leading_dim: Option<usize>,
    ) -> Result<Self> {
        if let Some(marker) = marker {
            self.marker = marker;
        }
        if let Some(min) = min_leading_dim {
            self.min_leading_dim = min;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        // An empty marker matches every entry.
        ensure!(!self.marker.is_empty(), "marker must not be empty");
        Ok(())
    }
}
