use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Pacing and timeout knobs for a fetch run.
///
/// All fields have defaults, so a config file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upper bound on a single page navigation or download, in milliseconds.
    pub nav_timeout_ms: u64,
    /// Lower bound of the inter-entry politeness delay, in milliseconds.
    pub delay_min_ms: u64,
    /// Upper (exclusive) bound of the inter-entry politeness delay.
    pub delay_max_ms: u64,
    /// Image-search results declaring a smaller width or height are ignored.
    pub min_image_dimension: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            nav_timeout_ms: 30_000,
            delay_min_ms: 3_000,
            delay_max_ms: 5_000,
            min_image_dimension: 60,
        }
    }
}

impl FetchConfig {
    /// Load overrides from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }
}
