//! CLI configuration
//!
//! Config directory: ~/.sirius/ (cross-platform)
//!
//! Config file format (~/.sirius/config.toml):
//! ```toml
//! [client]
//! region = "us-west1"
//! group_id = "my-group"
//! api_url = "https://api.athera.io/api/v1"
//! chunk_size = 524288
//!
//! [regions]
//! local = "localhost:50051"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sirius_core::{RegionTable, DEFAULT_CHUNK_SIZE};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Structure of ~/.sirius/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SiriusConfig {
    #[serde(default)]
    pub client: ClientSettings,

    /// Extra region label -> `host:port` entries
    #[serde(default)]
    pub regions: BTreeMap<String, String>,
}

/// Connection defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSettings {
    #[serde(default = "default_region")]
    pub region: String,

    /// Group the commands act for
    #[serde(default = "default_group_id")]
    pub group_id: Option<String>,

    /// Base URL of the REST API (drivers)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Transfer chunk size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            group_id: default_group_id(),
            api_url: default_api_url(),
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_region() -> String {
    std::env::var("SIRIUS_REGION").unwrap_or_else(|_| "us-west1".to_string())
}

fn default_group_id() -> Option<String> {
    std::env::var("SIRIUS_GROUP_ID").ok()
}

fn default_api_url() -> String {
    std::env::var("SIRIUS_API_URL")
        .unwrap_or_else(|_| "https://api.athera.io/api/v1".to_string())
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl SiriusConfig {
    /// Built-in regions extended with the `[regions]` table
    pub fn region_table(&self) -> RegionTable {
        self.regions
            .iter()
            .fold(RegionTable::builtin(), |table, (label, address)| {
                table.with_region(label.clone(), address.clone())
            })
    }

    /// Update one `section.key` value
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "client.region" => self.client.region = value,
            "client.group_id" => self.client.group_id = Some(value),
            "client.api_url" => self.client.api_url = value,
            "client.chunk_size" => {
                self.client.chunk_size = value
                    .parse()
                    .with_context(|| format!("Invalid chunk size: {}", value))?;
            }
            _ => match key.strip_prefix("regions.") {
                Some(label) if !label.is_empty() => {
                    self.regions.insert(label.to_string(), value);
                }
                _ => anyhow::bail!(
                    "Unknown config key: {}. Valid keys: client.region, client.group_id, client.api_url, client.chunk_size, regions.<label>",
                    key
                ),
            },
        }
        Ok(())
    }
}

/// Get the config directory path (~/.sirius/)
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".sirius"))
}

/// Get the config file path
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load configuration, falling back to defaults if the file doesn't exist
pub fn load_config() -> SiriusConfig {
    match config_file_path() {
        Ok(path) if path.exists() => match load_config_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}", e);
                SiriusConfig::default()
            }
        },
        _ => SiriusConfig::default(),
    }
}

pub fn load_config_from(path: &Path) -> Result<SiriusConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to ~/.sirius/config.toml
pub fn save_config(config: &SiriusConfig) -> Result<()> {
    save_config_to(config, &config_file_path()?)
}

pub fn save_config_to(config: &SiriusConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config directory")?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, content).context("Failed to write config file")?;
    Ok(())
}
