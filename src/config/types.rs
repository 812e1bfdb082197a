use serde::{Deserialize, Serialize};

use crate::pipeline::{DEFAULT_GAP, DEFAULT_OUTPUT_DIR};

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Split configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths or glob patterns
    pub input: Vec<String>,
    /// Output directory for sprite files
    pub output_dir: String,
    /// Max distance between opaque pixels of the same sprite
    pub gap: u32,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Write a JSON manifest per atlas
    pub manifest: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            gap: DEFAULT_GAP,
            compress: None,
            manifest: false,
        }
    }
}
