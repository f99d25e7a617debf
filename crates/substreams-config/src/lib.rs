//! Tier-1 runtime configuration, loaded from TOML.
//!
//! Every field has a default so an empty document is a valid configuration.
//! Unknown keys are rejected to surface typos early.

use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Default width, in blocks, of a back-processing segment.
pub const DEFAULT_STATE_BUNDLE_SIZE: u64 = 1_000;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io { path: String, source: io::Error },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

///
/// Tier1Config
///
/// Process-wide settings consumed when planning tier-1 requests.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tier1Config {
    /// Segment interval used for store snapshots and execution output files.
    pub state_bundle_size: u64,

    /// Lowest block the chain can stream. Start block 0 resolves to it.
    pub first_streamable_block: u64,
}

impl Default for Tier1Config {
    fn default() -> Self {
        Self {
            state_bundle_size: DEFAULT_STATE_BUNDLE_SIZE,
            first_streamable_block: 0,
        }
    }
}

impl Tier1Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_bundle_size == 0 {
            return Err(ConfigError::Invalid {
                field: "state_bundle_size",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

///
/// TESTS
///
