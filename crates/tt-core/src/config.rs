//! Startup configuration
//!
//! Read once when the background starts. Every field is optional in the JSON
//! form; missing fields take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::heuristic::{AdHeuristic, DEFAULT_AD_PATTERNS};
use crate::types::{BadgeColor, Capability};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("adPatterns must contain at least one non-empty pattern")]
    EmptyPatterns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Whether the observer may cancel requests itself.
    pub capability: Capability,
    /// URL substrings the heuristic treats as ads.
    pub ad_patterns: Vec<String>,
    pub badge_color: BadgeColor,
    /// Broadcast the new count after every increment.
    pub push_updates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capability: Capability::default(),
            ad_patterns: DEFAULT_AD_PATTERNS.iter().map(|p| p.to_string()).collect(),
            badge_color: BadgeColor::RED,
            push_updates: true,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ad_patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPatterns);
        }
        Ok(())
    }

    pub fn heuristic(&self) -> AdHeuristic {
        AdHeuristic::new(&self.ad_patterns)
    }
}
