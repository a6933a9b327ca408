use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::Token;
use crate::error::AdoError;

const CONFIG_STEM: &str = "adolens";

/// Configuration file structure for adolens.
///
/// Holds the server endpoint and credential plus presentation defaults.
/// Nothing here is ever written back; the token is read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerSection {
    /// Collection URL, e.g. `http://tfs.local/DefaultCollection`
    pub url: Option<String>,

    /// Personal access token
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefaultsConfig {
    /// Number of work items / builds fetched when no limit is given
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

pub fn default_limit() -> usize {
    30
}

/// The immutable endpoint + credential pair every request is made with.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub token: Token,
}

impl ServerConfig {
    pub fn new(base_url: impl Into<String>, token: Token) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./adolens.toml, ./adolens.json, ./adolens.yaml, ./adolens.yml
    /// 3. `<user config dir>/adolens/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                warn!("Config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            return Self::load_from_path(path);
        }

        let mut search_dirs = vec![PathBuf::from(".")];
        if let Some(dir) = dirs::config_dir() {
            search_dirs.push(dir.join(CONFIG_STEM));
        }
        Self::load_from_dirs(&search_dirs)
    }

    fn load_from_dirs(search_dirs: &[PathBuf]) -> Result<Self> {
        let candidates = [
            format!("{CONFIG_STEM}.toml"),
            format!("{CONFIG_STEM}.json"),
            format!("{CONFIG_STEM}.yaml"),
            format!("{CONFIG_STEM}.yml"),
            "config.toml".to_string(),
        ];

        for dir in search_dirs {
            for candidate in &candidates {
                let path = dir.join(candidate);
                if path.is_file() {
                    return Self::load_from_path(&path);
                }
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Resolve the server endpoint and credential.
    ///
    /// Explicit values (flags or environment, already merged by clap) win over
    /// the file.
    pub fn server_config(
        &self,
        url: Option<&str>,
        token: Option<&str>,
    ) -> crate::error::Result<ServerConfig> {
        let base_url = url
            .or(self.server.url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                AdoError::Config(
                    "server URL missing (use --url, ADO_SERVER_URL or [server] url)".to_string(),
                )
            })?;

        let token = token
            .or(self.server.token.as_deref())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AdoError::Config(
                    "access token missing (use --token, ADO_PAT or [server] token)".to_string(),
                )
            })?;

        Ok(ServerConfig::new(base_url, Token::from(token)))
    }
}
