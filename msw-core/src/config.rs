use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::ConfigError,
    model::{SpotId, Units},
};

/// Construction input for a client.
///
/// Example TOML:
/// ```toml
/// apikey = "..."
/// spot_id = 1449
/// units = "us"
/// fields = ["timestamp", "wind"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_id: Option<SpotId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Overrides the API base, e.g. to target a local mock server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Keys present in the source document that the client does not know.
    #[serde(skip)]
    pub unknown_keys: Vec<String>,
}

/// Loosely typed mirror of [`ClientConfig`] so that a bad `spot_id` or
/// `units` surfaces as the matching [`ConfigError`] instead of a serde message.
#[derive(Debug, Deserialize)]
struct RawClientConfig {
    apikey: Option<String>,
    spot_id: Option<toml::Value>,
    units: Option<String>,
    #[serde(default)]
    fields: Vec<String>,
    base_url: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

impl TryFrom<RawClientConfig> for ClientConfig {
    type Error = ConfigError;

    fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
        let spot_id = match raw.spot_id {
            None => None,
            Some(toml::Value::Integer(i)) => Some(SpotId::try_from(i)?),
            Some(toml::Value::Float(f)) => Some(SpotId::try_from(f)?),
            Some(other) => return Err(ConfigError::InvalidSpotId(other.to_string())),
        };

        let units = raw.units.map(Units::try_from).transpose()?;

        Ok(Self {
            apikey: raw.apikey,
            spot_id,
            units,
            fields: raw.fields,
            base_url: raw.base_url,
            unknown_keys: raw.unknown.into_keys().collect(),
        })
    }
}

impl ClientConfig {
    /// Config with the two required settings.
    pub fn new<I>(apikey: impl Into<String>, spot_id: I) -> Result<Self, ConfigError>
    where
        I: TryInto<SpotId>,
        ConfigError: From<I::Error>,
    {
        Ok(Self {
            apikey: Some(apikey.into()),
            spot_id: Some(spot_id.try_into()?),
            ..Self::default()
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawClientConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Malformed(e.message().to_string()))?;

        Self::try_from(raw)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "magicseaweed", "msw-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
