// src/fetch/mod.rs
//! Getting the raw order grid out of a spreadsheet.

pub mod csv_file;
pub mod sheets;

use crate::{config::SourceConfig, process::RawTable};
use reqwest::Client;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

pub use sheets::SheetsClient;

/// Why a table could not be fetched. The pipeline never sees these: a failed
/// fetch means there is no table to clean.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not authorized to read {source_id} (HTTP {status})")]
    Unauthorized { source_id: String, status: u16 },

    #[error("sheet not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode sheet values: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid URL: {0}")]
    Url(String),
}

impl FetchError {
    /// Short stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Unauthorized { .. } => "unauthorized",
            FetchError::NotFound(_) => "not_found",
            FetchError::Status { .. } => "http_status",
            FetchError::Transport(_) => "transport",
            FetchError::Decode(_) => "decode",
            FetchError::Io(_) => "io",
            FetchError::Csv(_) => "csv",
            FetchError::Url(_) => "url",
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::Url(e.to_string())
    }
}

/// Where the order table comes from.
#[derive(Debug, Clone)]
pub enum Source {
    Sheets(SheetsClient),
    Csv(PathBuf),
}

impl Source {
    pub fn from_config(client: Client, cfg: &SourceConfig) -> Result<Self, FetchError> {
        Ok(match cfg {
            SourceConfig::Sheets(sheets) => Source::Sheets(SheetsClient::new(client, sheets)?),
            SourceConfig::Csv { path } => Source::Csv(path.clone()),
        })
    }

    /// Identifies the source; used as the cache key.
    pub fn id(&self) -> String {
        match self {
            Source::Sheets(c) => c.source_id(),
            Source::Csv(path) => format!("csv:{}", path.display()),
        }
    }

    /// Fetch the whole table, header split off.
    pub async fn fetch(&self) -> Result<RawTable, FetchError> {
        let table = match self {
            Source::Sheets(c) => c.fetch_table().await?,
            Source::Csv(path) => {
                let bytes = tokio::fs::read(path).await?;
                csv_file::parse_table(bytes.as_slice())?
            }
        };
        info!(source = %self.id(), rows = table.rows.len(), "fetched table");
        Ok(table)
    }
}
