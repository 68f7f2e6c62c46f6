//! Google Solar API client

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Solar building-insights client
#[derive(Clone)]
pub struct SolarClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Rooftop solar potential for the closest building
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SolarPotential {
    #[serde(rename = "maxArrayPanelsCount", default)]
    pub max_array_panels_count: i64,
    #[serde(rename = "yearlyEnergyDcKwh", default)]
    pub yearly_energy_dc_kwh: f64,
    #[serde(rename = "panelCapacityWatts", default = "default_panel_watts")]
    pub panel_capacity_watts: i64,
}

fn default_panel_watts() -> i64 {
    400
}

#[derive(Debug, Deserialize)]
struct BuildingInsightsResponse {
    #[serde(rename = "solarPotential")]
    solar_potential: Option<SolarPotential>,
}

impl SolarClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: "https://solar.googleapis.com/v1".to_string(),
            api_key,
        }
    }

    /// Client with a custom base URL (for testing)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Find the solar potential of the building closest to a point.
    ///
    /// Regions Google has not yet covered come back as `Ok(None)` so the
    /// caller can decide on simulation rather than have the gap
    /// disappear into an error path.
    pub async fn building_insights(&self, lat: f64, lng: f64) -> AppResult<Option<SolarPotential>> {
        let url = format!("{}/buildingInsights:findClosest", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location.latitude", lat.to_string().as_str()),
                ("location.longitude", lng.to_string().as_str()),
                ("requiredQuality", "HIGH"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("solar request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "solar API error: {} - {}",
                status, body
            )));
        }

        let data: BuildingInsightsResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("malformed solar response: {}", e)))?;

        Ok(data.solar_potential)
    }
}
