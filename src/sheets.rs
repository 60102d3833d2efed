//! Google Sheets API v4 client for the outdoor station spreadsheet.

use crate::aemet::types::Text;
use crate::config::SheetConfig;
use crate::error::FetchError;
use crate::workers::SourceStats;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

/// How requests are authorised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// `key=` query parameter; works for link-shared spreadsheets.
    ApiKey(String),
    /// Pre-issued OAuth access token.
    Bearer(String),
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Text>>,
}

pub struct SheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    auth: SheetsAuth,
    stats: Option<SourceStats>,
}

impl SheetsClient {
    pub fn new(config: &SheetConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        // A bearer token takes precedence when both are configured.
        let auth = if config.access_token.is_empty() {
            SheetsAuth::ApiKey(config.api_key.clone())
        } else {
            SheetsAuth::Bearer(config.access_token.clone())
        };

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.range.clone(),
            auth,
            stats: None,
        })
    }

    pub fn with_stats(mut self, stats: SourceStats) -> Self {
        self.stats = Some(stats);
        self
    }

    fn values_url(&self) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        Ok(url)
    }

    /// Fetches the configured range column by column.
    pub fn fetch_columns(&self) -> Result<Vec<Vec<String>>, FetchError> {
        let url = self.values_url()?;
        let request = self
            .http
            .get(url.clone())
            .query(&[("majorDimension", "COLUMNS")]);
        let request = match &self.auth {
            SheetsAuth::ApiKey(key) => request.query(&[("key", key.as_str())]),
            SheetsAuth::Bearer(token) => request.bearer_auth(token),
        };

        let response = request.send()?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes()?;
        if let Some(stats) = &self.stats {
            stats.record_bytes(bytes.len());
        }

        let range: ValueRange = serde_json::from_slice(&bytes)?;
        Ok(range
            .values
            .into_iter()
            .map(|column| column.into_iter().map(|cell| cell.0).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer) -> SheetConfig {
        SheetConfig {
            base_url: server.base_url(),
            spreadsheet_id: "sheet-id".to_string(),
            api_key: "sheet-key".to_string(),
            ..SheetConfig::default()
        }
    }

    #[test]
    fn test_fetch_columns_with_api_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v4/spreadsheets/sheet-id/values/Procesamiento!A2:D")
                .query_param("majorDimension", "COLUMNS")
                .query_param("key", "sheet-key");
            then.status(200).json_body(json!({
                "range": "Procesamiento!A2:D673",
                "majorDimension": "COLUMNS",
                "values": [
                    ["5/1/2024 12:00:00", "5/1/2024 11:45:00"],
                    ["21.5", 21],
                    ["55", "56.5"],
                    ["101325", "101300"]
                ]
            }));
        });

        let stats = SourceStats::new();
        let columns = SheetsClient::new(&config_for(&server))
            .unwrap()
            .with_stats(stats.clone())
            .fetch_columns()
            .unwrap();

        mock.assert();
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[1], vec!["21.5".to_string(), "21".to_string()]);
        assert!(stats.snapshot().bytes_received > 0);
    }

    #[test]
    fn test_bearer_token_preferred() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.path("/v4/spreadsheets/sheet-id/values/Procesamiento!A2:D")
                .header("authorization", "Bearer token-123");
            then.status(200).json_body(json!({ "values": [] }));
        });

        let mut config = config_for(&server);
        config.access_token = "token-123".to_string();
        let columns = SheetsClient::new(&config).unwrap().fetch_columns().unwrap();

        mock.assert();
        assert!(columns.is_empty());
    }

    #[test]
    fn test_forbidden_is_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.path_contains("/values/");
            then.status(403);
        });

        let err = SheetsClient::new(&config_for(&server))
            .unwrap()
            .fetch_columns()
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 403, .. }));
    }
}
