//! `.pagewise.toml` configuration files
//!
//! Looked up in the home directory (user config) and the working directory
//! (project config). Precedence: command line > project (or `--config`) >
//! user > built-in defaults.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name used for both user and project configs
pub const CONFIG_FILE_NAME: &str = ".pagewise.toml";

/// Output directory when neither the command line nor a config sets one
pub const DEFAULT_OUT_DIR: &str = "out_txt";

/// Top-level config file layout
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[ingest]` table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingest: Option<IngestConfig>,
}

/// Defaults for an ingest run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,

    /// Hide GPUs from the conversion engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_only: Option<bool>,

    /// Also write `combined.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,

    /// Page/slide limit per PDF or PPTX
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
}

impl IngestConfig {
    /// Overlay `other` on top of `self`; set fields in `other` win
    fn overlay(self, other: Self) -> Self {
        Self {
            out: other.out.or(self.out),
            cpu_only: other.cpu_only.or(self.cpu_only),
            json: other.json.or(self.json),
            max_pages: other.max_pages.or(self.max_pages),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this layout.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file {}: {e}", path.display())
        })
    }

    /// Find and load configuration files
    /// Returns (`user_config`, `project_config`)
    #[must_use = "returns the discovered configs"]
    pub fn discover_configs() -> (Option<Self>, Option<Self>) {
        let user_config = Self::load_user_config();
        let project_config = Self::load_project_config();
        (user_config, project_config)
    }

    /// Load user config from ~/.pagewise.toml
    #[must_use = "returns the user config if present"]
    pub fn load_user_config() -> Option<Self> {
        let home_dir = dirs::home_dir()?;
        Self::load_optional(&home_dir.join(CONFIG_FILE_NAME), "user")
    }

    /// Load project config from ./.pagewise.toml
    fn load_project_config() -> Option<Self> {
        Self::load_optional(&PathBuf::from(CONFIG_FILE_NAME), "project")
    }

    /// Load a config that may be absent; a broken one is a warning, not an error
    fn load_optional(config_path: &Path, kind: &str) -> Option<Self> {
        if !config_path.exists() {
            return None;
        }
        match Self::load_from_file(config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!(
                    "{} Failed to load {kind} config from {}: {e}",
                    "Warning:".yellow().bold(),
                    config_path.display(),
                );
                None
            }
        }
    }

    /// Merge multiple configs with precedence
    /// project config > user config > defaults
    #[must_use = "returns the merged config"]
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let ingest = [user_config, project_config]
            .into_iter()
            .flatten()
            .filter_map(|config| config.ingest)
            .reduce(IngestConfig::overlay);
        Self { ingest }
    }

    /// The `[ingest]` table, or an empty one
    #[must_use = "returns the ingest settings"]
    pub fn ingest(&self) -> IngestConfig {
        self.ingest.clone().unwrap_or_default()
    }
}
