use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::Result;

/// Tunables for a batch run. Loaded from a JSON file when one is given,
/// otherwise defaulted; individual fields can be overridden from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Worker threads for the per-image scan
    pub concurrency: usize,

    /// Per-request timeout for image downloads, in seconds
    pub fetch_timeout_secs: u64,

    /// Decoded images above this many megapixels are rejected
    pub max_megapixels: u64,

    /// User-Agent header sent with image downloads
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: num_cpus::get().max(1),
            fetch_timeout_secs: 30,
            max_megapixels: 100,
            user_agent: format!("rPalette/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
