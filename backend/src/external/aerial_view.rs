//! Google Aerial View API client

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

/// Aerial video lookup client
#[derive(Clone)]
pub struct AerialViewClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// A rendered aerial video for an address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerialVideo {
    /// Render state, e.g. "ACTIVE" or "PROCESSING"
    pub state: String,
    /// Playback URIs keyed by format (MP4_HIGH, HLS, ...)
    #[serde(default)]
    pub uris: HashMap<String, VideoUris>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUris {
    #[serde(rename = "landscapeUri")]
    pub landscape_uri: Option<String>,
    #[serde(rename = "portraitUri")]
    pub portrait_uri: Option<String>,
}

impl AerialViewClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: "https://aerialview.googleapis.com/v1".to_string(),
            api_key,
        }
    }

    /// Client with a custom base URL (for testing)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Look up the aerial video for an address. `Ok(None)` when no video
    /// has been rendered for it.
    pub async fn lookup_video(&self, address: &str) -> AppResult<Option<AerialVideo>> {
        let url = format!("{}/videos:lookupVideo", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("address", address)])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("aerial view request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "aerial view API error: {} - {}",
                status, body
            )));
        }

        let video: AerialVideo = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("malformed aerial view response: {}", e))
        })?;

        Ok(Some(video))
    }
}
