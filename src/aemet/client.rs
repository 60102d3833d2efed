//! Blocking HTTP client for AEMET OpenData.
//!
//! Every AEMET endpoint answers in two steps: the first response carries a
//! `datos` URL, and the payload itself is fetched from there with the same
//! credentials.

use super::types::{DailyForecast, DataLink, HourlyForecast};
use crate::config::AemetConfig;
use crate::error::FetchError;
use crate::workers::SourceStats;
use reqwest::blocking::{Client, Response};
use reqwest::header::CACHE_CONTROL;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Client for the AEMET endpoints used by the hub.
///
/// Cheap to clone; clones share the connection pool. Use [`with_stats`]
/// to attribute received bytes to a particular source.
///
/// [`with_stats`]: AemetClient::with_stats
#[derive(Clone)]
pub struct AemetClient {
    http: Client,
    base_url: String,
    api_key: String,
    municipality_id: String,
    radar_id: String,
    stats: Option<SourceStats>,
}

impl AemetClient {
    pub fn new(config: &AemetConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            municipality_id: config.municipality_id.clone(),
            radar_id: config.radar_id.clone(),
            stats: None,
        })
    }

    /// Returns a clone that records received bytes into `stats`.
    pub fn with_stats(&self, stats: SourceStats) -> Self {
        Self {
            stats: Some(stats),
            ..self.clone()
        }
    }

    pub fn daily_forecast(&self) -> Result<DailyForecast, FetchError> {
        let path = format!(
            "/prediccion/especifica/municipio/diaria/{}",
            self.municipality_id
        );
        first_document(&self.request(&path)?)
    }

    pub fn hourly_forecast(&self) -> Result<HourlyForecast, FetchError> {
        let path = format!(
            "/prediccion/especifica/municipio/horaria/{}",
            self.municipality_id
        );
        first_document(&self.request(&path)?)
    }

    /// Latest regional radar composite (GIF bytes).
    pub fn regional_radar(&self) -> Result<Vec<u8>, FetchError> {
        self.request(&format!("/red/radar/regional/{}", self.radar_id))
    }

    /// Latest national radar composite (GIF bytes).
    pub fn national_radar(&self) -> Result<Vec<u8>, FetchError> {
        self.request("/red/radar/nacional")
    }

    /// Performs the two-step request and returns the payload bytes.
    fn request(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("AEMET request: {}", url);

        let link_bytes = self.get_bytes(&url)?;
        let link: DataLink = serde_json::from_str(&decode_text(&link_bytes))?;

        let data_url = match link.datos {
            Some(datos) => datos,
            None => {
                let reason = link
                    .descripcion
                    .unwrap_or_else(|| "no description".to_string());
                return Err(FetchError::MissingDataUrl(match link.estado {
                    Some(estado) => format!("{} {}", estado, reason),
                    None => reason,
                }));
            }
        };

        self.get_bytes(&data_url)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url)?;
        let bytes = response.bytes()?.to_vec();
        if let Some(stats) = &self.stats {
            stats.record_bytes(bytes.len());
        }
        Ok(bytes)
    }

    fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .header(CACHE_CONTROL, "no-cache")
            .send()?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

/// Forecast payloads are single-element JSON arrays.
fn first_document<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
    let mut documents: Vec<T> = serde_json::from_str(&decode_text(bytes))?;
    if documents.is_empty() {
        return Err(FetchError::payload("empty forecast array"));
    }
    Ok(documents.swap_remove(0))
}

/// AEMET serves JSON as ISO-8859-15. Valid UTF-8 is used as is; anything
/// else is decoded byte-per-char, which matches ISO-8859-15 for every
/// character AEMET actually emits.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}
