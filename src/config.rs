//! Configuration loading and management
//!
//! Handles parsing of `todod.toml` configuration files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Socket address the server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory holding the JSON collections and uploads
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Page size used when a listing request does not specify `limit`
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Identity configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: default_data_dir(),
            default_limit: default_limit(),
            auth: AuthConfig::default(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_limit() -> usize {
    10
}

/// Identity-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token -> owner id table. Tokens are issued out of band by the
    /// identity provider; an empty table means every request is rejected.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
