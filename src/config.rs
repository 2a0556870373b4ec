// src/config.rs
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "ordersheet.yaml";
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/";
/// Fetched sheets are reused for five minutes.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

const ENV_CONFIG: &str = "ORDERSHEET_CONFIG";
const ENV_SHEET_ID: &str = "ORDERSHEET_SHEET_ID";
const ENV_SHEET_NAME: &str = "ORDERSHEET_SHEET_NAME";
const ENV_API_KEY: &str = "ORDERSHEET_API_KEY";
const ENV_ACCESS_TOKEN: &str = "ORDERSHEET_ACCESS_TOKEN";
const ENV_CACHE_TTL: &str = "ORDERSHEET_CACHE_TTL_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("no config file at {} and ORDERSHEET_SHEET_ID is not set", .0.display())]
    Missing(PathBuf),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the binary needs; the cleaning pipeline itself takes none of it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Where to write `orders.parquet` and `summary.json`, if anywhere.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Re-run every N seconds instead of once.
    #[serde(default)]
    pub refresh_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Sheets(SheetsConfig),
    Csv { path: PathBuf },
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("access_token", &self.access_token.as_ref().map(|_| ".."))
            .finish()
    }
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Config {
    /// Load from `$ORDERSHEET_CONFIG` (or `ordersheet.yaml`) plus env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(ENV_CONFIG).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path), |k| env::var(k).ok())
    }

    /// Like [`Config::load`] with an explicit path and variable lookup.
    /// Without a file, a Sheets source is built from the environment alone.
    pub fn load_from(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let id = lookup(ENV_SHEET_ID).ok_or_else(|| ConfigError::Missing(path.into()))?;
                Config {
                    source: SourceConfig::Sheets(SheetsConfig {
                        spreadsheet_id: id,
                        sheet_name: String::new(),
                        api_base: default_api_base(),
                        api_key: None,
                        access_token: None,
                    }),
                    cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
                    output_dir: None,
                    refresh_secs: None,
                }
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.into(),
                    source,
                })
            }
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(ttl) = lookup(ENV_CACHE_TTL) {
            self.cache_ttl_secs = ttl
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_CACHE_TTL}={ttl}")))?;
        }
        if let SourceConfig::Sheets(sheets) = &mut self.source {
            if let Some(v) = lookup(ENV_SHEET_ID) {
                sheets.spreadsheet_id = v;
            }
            if let Some(v) = lookup(ENV_SHEET_NAME) {
                sheets.sheet_name = v;
            }
            if let Some(v) = lookup(ENV_API_KEY) {
                sheets.api_key = Some(v);
            }
            if let Some(v) = lookup(ENV_ACCESS_TOKEN) {
                sheets.access_token = Some(v);
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.source {
            SourceConfig::Sheets(s) => {
                if s.spreadsheet_id.trim().is_empty() {
                    return Err(ConfigError::Invalid("spreadsheet_id is empty".into()));
                }
                if s.sheet_name.trim().is_empty() {
                    return Err(ConfigError::Invalid("sheet_name is empty".into()));
                }
                if s.api_key.is_none() && s.access_token.is_none() {
                    return Err(ConfigError::Invalid(
                        "sheets source needs api_key or access_token".into(),
                    ));
                }
            }
            SourceConfig::Csv { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid("csv path is empty".into()));
                }
            }
        }
        if self.refresh_secs == Some(0) {
            return Err(ConfigError::Invalid("refresh_secs must be positive".into()));
        }
        Ok(())
    }
}
