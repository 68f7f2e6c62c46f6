//! Google Pollen API client
//!
//! Fetches the one-day forecast and extracts the grass Universal Pollen
//! Index (UPI, 0-5) used by the planting safety check.

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Pollen forecast client
#[derive(Clone)]
pub struct PollenClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Grass pollen severity at a location
#[derive(Debug, Clone, PartialEq)]
pub struct GrassPollen {
    /// Universal Pollen Index, 0-5
    pub upi: i32,
    /// Provider category label, e.g. "Low", "High"
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(rename = "dailyInfo", default)]
    daily_info: Vec<DailyInfo>,
}

#[derive(Debug, Deserialize)]
struct DailyInfo {
    #[serde(rename = "pollenTypeInfo", default)]
    pollen_type_info: Vec<PollenTypeInfo>,
}

#[derive(Debug, Deserialize)]
struct PollenTypeInfo {
    code: String,
    #[serde(rename = "indexInfo")]
    index_info: Option<IndexInfo>,
}

#[derive(Debug, Deserialize)]
struct IndexInfo {
    value: Option<i32>,
    category: Option<String>,
}

impl PollenClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: "https://pollen.googleapis.com/v1".to_string(),
            api_key,
        }
    }

    /// Client with a custom base URL (for testing)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Look up today's grass pollen index at a location.
    ///
    /// `None` means the provider has no grass forecast there, which
    /// callers treat as safe.
    pub async fn grass_pollen(&self, lat: f64, lng: f64) -> AppResult<Option<GrassPollen>> {
        let url = format!("{}/forecast:lookup", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("location.latitude", &lat.to_string()),
                ("location.longitude", &lng.to_string()),
                ("days", "1"),
                ("plantsDescription", "true"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("pollen request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "pollen API error: {} - {}",
                status, body
            )));
        }

        let data: ForecastResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("malformed pollen response: {}", e)))?;

        Ok(extract_grass_index(data))
    }
}

fn extract_grass_index(data: ForecastResponse) -> Option<GrassPollen> {
    let day = data.daily_info.into_iter().next()?;
    let grass = day
        .pollen_type_info
        .into_iter()
        .find(|p| p.code == "GRASS")?;
    let index = grass.index_info?;
    Some(GrassPollen {
        upi: index.value?,
        category: index.category.unwrap_or_else(|| "Unknown".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_grass_entry() {
        let data: ForecastResponse = serde_json::from_value(serde_json::json!({
            "dailyInfo": [{
                "pollenTypeInfo": [
                    { "code": "TREE", "indexInfo": { "value": 2, "category": "Low" } },
                    { "code": "GRASS", "indexInfo": { "value": 4, "category": "High" } },
                ]
            }]
        }))
        .unwrap();

        let grass = extract_grass_index(data).unwrap();
        assert_eq!(grass.upi, 4);
        assert_eq!(grass.category, "High");
    }

    #[test]
    fn missing_grass_forecast_is_none() {
        let data: ForecastResponse = serde_json::from_value(serde_json::json!({
            "dailyInfo": [{ "pollenTypeInfo": [{ "code": "WEED" }] }]
        }))
        .unwrap();
        assert!(extract_grass_index(data).is_none());

        let empty: ForecastResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(extract_grass_index(empty).is_none());
    }
}
