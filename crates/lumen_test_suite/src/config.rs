//! `lumen.toml` handling
//!
//! Every key is optional:
//!
//! ```toml
//! output_dir = "test_output"
//! reference_dir = "test_output/references"
//! threshold = 0.001
//! frame_ms = 16
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = "lumen.toml";

/// Visual suite settings as read from disk
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Where rendered frames and diff images go
    pub output_dir: PathBuf,
    /// Where reference images live
    pub reference_dir: PathBuf,
    /// Allowed average per-channel difference (0.0-1.0)
    pub threshold: f32,
    /// Simulated frame interval used when advancing animations
    pub frame_ms: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("test_output"),
            reference_dir: PathBuf::from("test_output/references"),
            threshold: 0.001,
            frame_ms: 16,
        }
    }
}

impl SuiteConfig {
    /// Load from an explicit file, which must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: SuiteConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !(0.0..=1.0).contains(&config.threshold) {
            anyhow::bail!(
                "threshold in {} must be between 0.0 and 1.0, got {}",
                path.display(),
                config.threshold
            );
        }
        if config.frame_ms == 0 {
            anyhow::bail!("frame_ms in {} must be at least 1", path.display());
        }

        Ok(config)
    }

    /// Load `lumen.toml` from `dir` if present, defaults otherwise
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            tracing::debug!("Loading suite config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
