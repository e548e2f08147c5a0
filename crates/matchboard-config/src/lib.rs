//! Configuration system for the Matchboard engine.
//!
//! Load engine configuration from TOML or YAML files to control undo depth,
//! conflict thresholds and journal persistence without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use matchboard_config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     undo_depth = 50
//!     institution_overlap_threshold = 3
//!     default_author = "coordinator"
//! "#).unwrap();
//!
//! assert_eq!(config.undo_depth, 50);
//! assert_eq!(config.institution_overlap_threshold, 3);
//! ```
//!
//! Use the defaults when no file is present:
//!
//! ```
//! use matchboard_config::EngineConfig;
//!
//! let config = EngineConfig::load("engine.toml").unwrap_or_default();
//! assert_eq!(config.undo_depth, 100);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default number of undo frames kept per session.
const DEFAULT_UNDO_DEPTH: usize = 100;

/// Default institution-overlap threshold: strictly more occurrences than
/// this in one slot raises a warning.
const DEFAULT_INSTITUTION_THRESHOLD: usize = 2;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Maximum number of undo frames kept; the oldest frame is dropped
    /// beyond this.
    #[serde(default = "default_undo_depth")]
    pub undo_depth: usize,

    /// A slot warns when one institution appears strictly more often than
    /// this.
    #[serde(default = "default_institution_threshold")]
    pub institution_overlap_threshold: usize,

    /// Author recorded on modifications when the caller does not name one.
    #[serde(default = "default_author")]
    pub default_author: String,

    /// Where the journal is persisted between sessions. `None` disables
    /// durable persistence.
    #[serde(default)]
    pub journal_path: Option<PathBuf>,
}

fn default_undo_depth() -> usize {
    DEFAULT_UNDO_DEPTH
}

fn default_institution_threshold() -> usize {
    DEFAULT_INSTITUTION_THRESHOLD
}

fn default_author() -> String {
    "operator".to_owned()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            undo_depth: default_undo_depth(),
            institution_overlap_threshold: default_institution_threshold(),
            default_author: default_author(),
            journal_path: None,
        }
    }
}

impl EngineConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, dispatching on the extension
    /// (`.yaml`/`.yml` parse as YAML, everything else as TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&input),
            _ => Self::from_toml_str(&input),
        }
    }

    /// Checks invariants the serde layer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undo_depth == 0 {
            return Err(ConfigError::Invalid(
                "undo_depth must be at least 1".to_owned(),
            ));
        }
        if self.institution_overlap_threshold == 0 {
            return Err(ConfigError::Invalid(
                "institution_overlap_threshold must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
