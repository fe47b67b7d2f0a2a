//! Runtime configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Knobs for catalogs and contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Write node visits and taken edges to the history store.
    pub record_history: bool,

    /// Reject assets that fail structural validation while loading.
    pub validate_on_load: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            record_history: true,
            validate_on_load: true,
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
