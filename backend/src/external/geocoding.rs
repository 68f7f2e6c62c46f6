//! OpenStreetMap Nominatim reverse geocoding client

use reqwest::Client;
use serde::Deserialize;

use crate::config::GeocodingConfig;
use crate::error::{AppError, AppResult};

/// Reverse geocoding client
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

impl GeocodingClient {
    pub fn new(config: &GeocodingConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_endpoint.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Client with a custom base URL (for testing)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Resolve coordinates to a human-readable place name.
    ///
    /// Returns `None` when nothing is known about the location; callers
    /// fall back to raw coordinates. Transport failures are errors so the
    /// caller decides whether to degrade.
    pub async fn reverse(&self, lat: f64, lng: f64) -> AppResult<Option<String>> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}",
            self.base_url, lat, lng
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalService(format!(
                "geocoding error: {}",
                status
            )));
        }

        let data: ReverseResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("malformed geocoding response: {}", e)))?;

        Ok(data.display_name)
    }
}
