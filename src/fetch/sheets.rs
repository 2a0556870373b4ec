// src/fetch/sheets.rs
use crate::{config::SheetsConfig, fetch::FetchError, process::RawTable};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// How requests to the Sheets API are authorized. Obtaining the token is the
/// caller's business.
#[derive(Clone)]
pub enum Credentials {
    ApiKey(String),
    AccessToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(..)"),
            Credentials::AccessToken(_) => f.write_str("AccessToken(..)"),
        }
    }
}

/// Reads one tab of a Google spreadsheet through the v4 `values` endpoint.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    api_base: Url,
    spreadsheet_id: String,
    sheet_name: String,
    credentials: Option<Credentials>,
}

/// Response body of `GET .../values/{range}`. Trailing empty cells and rows
/// are omitted by the API, hence `default`.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsClient {
    pub fn new(client: Client, cfg: &SheetsConfig) -> Result<Self, FetchError> {
        // a token wins over a key when both are configured
        let credentials = match (&cfg.access_token, &cfg.api_key) {
            (Some(token), _) => Some(Credentials::AccessToken(token.clone())),
            (None, Some(key)) => Some(Credentials::ApiKey(key.clone())),
            (None, None) => None,
        };
        Ok(Self {
            client,
            api_base: Url::parse(&cfg.api_base)?,
            spreadsheet_id: cfg.spreadsheet_id.clone(),
            sheet_name: cfg.sheet_name.clone(),
            credentials,
        })
    }

    pub fn source_id(&self) -> String {
        format!("sheets:{}/{}", self.spreadsheet_id, self.sheet_name)
    }

    /// `{api_base}/v4/spreadsheets/{id}/values/{sheet}`, segments percent-encoded.
    pub fn values_url(&self) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(format!("{} cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.sheet_name.as_str(),
            ]);
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("majorDimension", "ROWS");
            if let Some(Credentials::ApiKey(key)) = &self.credentials {
                q.append_pair("key", key);
            }
        }
        Ok(url)
    }

    /// Fetch every populated row of the sheet.
    pub async fn fetch_table(&self) -> Result<RawTable, FetchError> {
        let url = self.values_url()?;
        let mut req = self.client.get(url.clone());
        if let Some(Credentials::AccessToken(token)) = &self.credentials {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized {
                source_id: self.source_id(),
                status: status.as_u16(),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(self.source_id()));
        }
        if !status.is_success() {
            // never log the key
            let mut shown = url;
            shown.set_query(None);
            return Err(FetchError::Status {
                url: shown.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(RawTable::from_values(decode_values(&body)?))
    }
}

/// Decode a `values` response into rows of cell text.
pub fn decode_values(body: &str) -> Result<Vec<Vec<String>>, FetchError> {
    let range: ValueRange = serde_json::from_str(body)?;
    Ok(range
        .values
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Formatted values arrive as strings; anything else is rendered as text.
fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn cfg(api_key: Option<&str>, token: Option<&str>) -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: "abc123".into(),
            sheet_name: "Form Responses 1".into(),
            api_base: "https://sheets.googleapis.com/".into(),
            api_key: api_key.map(String::from),
            access_token: token.map(String::from),
        }
    }

    #[test]
    fn values_url_with_key() -> Result<()> {
        let c = SheetsClient::new(Client::new(), &cfg(Some("k3y"), None))?;
        assert_eq!(
            c.values_url()?.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Form%20Responses%201?majorDimension=ROWS&key=k3y"
        );
        Ok(())
    }

    #[test]
    fn token_is_not_in_url() -> Result<()> {
        let c = SheetsClient::new(Client::new(), &cfg(Some("k3y"), Some("t0ken")))?;
        let url = c.values_url()?;
        assert!(!url.as_str().contains("t0ken"));
        assert!(!url.as_str().contains("k3y"));
        assert!(format!("{:?}", c).contains("AccessToken(..)"));
        Ok(())
    }

    #[test]
    fn no_credentials_means_bare_url() -> Result<()> {
        let c = SheetsClient::new(Client::new(), &cfg(None, None))?;
        assert_eq!(c.values_url()?.query(), Some("majorDimension=ROWS"));
        assert_eq!(c.source_id(), "sheets:abc123/Form Responses 1");
        Ok(())
    }

    #[test]
    fn bad_base_url() {
        let mut bad = cfg(None, None);
        bad.api_base = "not a url".into();
        let err = SheetsClient::new(Client::new(), &bad).unwrap_err();
        assert_eq!(err.kind(), "url");
    }

    #[test]
    fn decodes_mixed_cells_and_short_rows() -> Result<()> {
        let body = r#"{
            "range": "'Form Responses 1'!A1:S3",
            "majorDimension": "ROWS",
            "values": [
                ["Timestamp", "Inquiry No"],
                ["15/03/2024", 42, true, null],
                []
            ]
        }"#;
        let rows = decode_values(body)?;
        assert_eq!(rows[0], vec!["Timestamp", "Inquiry No"]);
        assert_eq!(rows[1], vec!["15/03/2024", "42", "true", ""]);
        assert!(rows[2].is_empty());
        Ok(())
    }

    #[test]
    fn empty_sheet_has_no_values_key() -> Result<()> {
        let rows = decode_values(r#"{"range": "Sheet1!A1:Z1000", "majorDimension": "ROWS"}"#)?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn garbage_body_is_decode_error() {
        let err = decode_values("<html>").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
