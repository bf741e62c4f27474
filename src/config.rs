// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration for edgeadm
//!
//! Optional defaults are read from ~/.edgeadm/config.json. Command-line flags
//! always win over the file, and the file wins over built-in defaults.
//! All edgeadm data is stored under ~/.edgeadm/:
//! - ~/.edgeadm/config.json - user configuration
//! - ~/.edgeadm/log/ - log files

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::DEFAULT_DB_PATH;

/// Namespace used when neither `-n` nor the config file names one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Get the base edgeadm directory (~/.edgeadm/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".edgeadm"))
        .context("Could not determine home directory")
}

/// edgeadm configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path of the edge node database
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Namespace queried when `-n` is not given
    #[serde(default)]
    pub default_namespace: Option<String>,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the config file path (~/.edgeadm/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }

    /// Database path: flag first, then config, then the well-known location
    pub fn resolve_database_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.database_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    /// Namespace: flag first, then config, then `default`
    pub fn resolve_namespace(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.default_namespace.clone())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
    }
}
