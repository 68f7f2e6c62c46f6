//! Location heat analysis service
//!
//! Combines the imagery provider, the zone classifier, reverse geocoding
//! and the LLM into the structured analysis served by /api/analyze and
//! the conversational replies served by /api/chatbot.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use shared::{classify, plausible_temperature, validate_coordinates, GpsCoordinates, HeatZone};

use crate::error::{AppError, AppResult};
use crate::external::{CompletionProvider, GeocodingClient, TemperatureProvider};

/// Location analysis service
#[derive(Clone)]
pub struct AnalysisService {
    temperature: Arc<dyn TemperatureProvider>,
    llm: Arc<dyn CompletionProvider>,
    geocoder: GeocodingClient,
    year: i32,
}

/// Structured analysis of a single location
#[derive(Debug, Serialize)]
pub struct LocationAnalysis {
    pub location: AnalyzedLocation,
    pub temperature: TemperatureSummary,
    pub zone: Option<&'static HeatZone>,
    /// LLM analysis document; schema validation of the completion is the
    /// consumer's concern, so unparsable completions are wrapped verbatim
    /// under a `summary` key
    pub analysis: Value,
}

#[derive(Debug, Serialize)]
pub struct AnalyzedLocation {
    pub name: String,
    pub coordinates: GpsCoordinates,
}

#[derive(Debug, Serialize)]
pub struct TemperatureSummary {
    pub value: Option<f64>,
    pub unit: &'static str,
    pub classification: String,
}

impl AnalysisService {
    pub fn new(
        temperature: Arc<dyn TemperatureProvider>,
        llm: Arc<dyn CompletionProvider>,
        geocoder: GeocodingClient,
        year: i32,
    ) -> Self {
        Self {
            temperature,
            llm,
            geocoder,
            year,
        }
    }

    /// Analyze the heat situation at a point
    pub async fn analyze_point(&self, lat: f64, lng: f64) -> AppResult<LocationAnalysis> {
        let coords = GpsCoordinates::new(lat, lng);
        validate_coordinates(&coords).map_err(|message| AppError::Validation {
            field: "coordinates",
            message: message.to_string(),
        })?;

        let reading =
            plausible_temperature(self.temperature.point_temperature(lat, lng, self.year).await?);
        let zone = classify(reading);

        // Geocoding is decorative: degrade to raw coordinates on failure.
        let place_name = match self.geocoder.reverse(lat, lng).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("reverse geocoding unavailable: {}", e);
                None
            }
        };
        let name = place_name.unwrap_or_else(|| format!("{:.4}, {:.4}", lat, lng));

        let prompt = analysis_prompt(&name, &coords, reading, zone);
        let analysis = match self.llm.complete(&prompt).await {
            Ok(raw) => parse_completion_json(&raw),
            Err(e) => {
                tracing::warn!("LLM analysis unavailable: {}", e);
                json!({ "summary": "AI analysis is temporarily unavailable." })
            }
        };

        Ok(LocationAnalysis {
            location: AnalyzedLocation {
                name,
                coordinates: coords,
            },
            temperature: TemperatureSummary {
                value: reading,
                unit: "celsius",
                classification: zone.map_or_else(|| "N/A".to_string(), |z| z.name.to_string()),
            },
            zone,
            analysis,
        })
    }

    /// Answer a free-form consultant question, grounded in the zone
    /// context when coordinates are supplied.
    pub async fn chat(&self, message: &str, location: Option<GpsCoordinates>) -> AppResult<String> {
        if message.trim().is_empty() {
            return Err(AppError::Validation {
                field: "message",
                message: "Message cannot be empty".to_string(),
            });
        }

        let context = match location {
            Some(coords) => {
                validate_coordinates(&coords).map_err(|message| AppError::Validation {
                    field: "coordinates",
                    message: message.to_string(),
                })?;
                let reading = plausible_temperature(
                    self.temperature
                        .point_temperature(coords.latitude, coords.longitude, self.year)
                        .await?,
                );
                Some((coords, reading, classify(reading)))
            }
            None => None,
        };

        let prompt = chat_prompt(message, context);
        self.llm.complete(&prompt).await
    }
}

/// Build the structured-analysis prompt. The LLM is asked for a JSON
/// document; zone and temperature are computed locally and embedded so the
/// model never invents them.
pub fn analysis_prompt(
    name: &str,
    coords: &GpsCoordinates,
    reading: Option<f64>,
    zone: Option<&HeatZone>,
) -> String {
    let temp_text = reading.map_or_else(|| "N/A".to_string(), |t| format!("{:.1} C", t));
    let zone_text = zone.map_or_else(
        || "N/A".to_string(),
        |z| format!("{} ({})", z.name, z.status_label),
    );
    let suggestions = zone
        .map(|z| z.suggestions.join("; "))
        .unwrap_or_else(|| "none".to_string());

    format!(
        "Act as a civil engineer specializing in urban heat islands.\n\
         Location: {name} ({lat}, {lng})\n\
         Yearly median land surface temperature: {temp}\n\
         Heat zone: {zone}\n\
         Suggested mitigations for this zone: {suggestions}\n\n\
         Respond with a single JSON object, no prose around it, with this shape:\n\
         {{\"title\": string, \"location\": {{\"name\": string, \"coordinates\": string}},\n\
          \"temperature\": {{\"value\": number|null, \"unit\": \"celsius\", \"classification\": string}},\n\
          \"zone\": string, \"status\": string,\n\
          \"analysis\": {{\"summary\": string, \"causes\": [string], \"actions\": [string]}}}}\n\
         Base the analysis on the data above and suggest 3 distinct mitigation strategies.",
        name = name,
        lat = coords.latitude,
        lng = coords.longitude,
        temp = temp_text,
        zone = zone_text,
        suggestions = suggestions,
    )
}

/// Build the conversational prompt for the chatbot endpoint
pub fn chat_prompt(
    message: &str,
    context: Option<(GpsCoordinates, Option<f64>, Option<&HeatZone>)>,
) -> String {
    match context {
        Some((coords, reading, zone)) => {
            let temp_text = reading.map_or_else(|| "N/A".to_string(), |t| format!("{:.1} C", t));
            let zone_text = zone.map_or("N/A", |z| z.name);
            format!(
                "You are an urban heat mitigation consultant.\n\
                 The user is looking at {lat}, {lng} where the yearly median land surface \
                 temperature is {temp} ({zone}).\n\
                 Answer briefly and practically.\n\nUser: {message}",
                lat = coords.latitude,
                lng = coords.longitude,
                temp = temp_text,
                zone = zone_text,
                message = message,
            )
        }
        None => format!(
            "You are an urban heat mitigation consultant. Answer briefly and \
             practically.\n\nUser: {}",
            message
        ),
    }
}

/// Lenient parse of a completion that should be JSON: code fences are
/// stripped, and anything that still fails to parse is wrapped under a
/// `summary` key instead of being dropped.
pub fn parse_completion_json(raw: &str) -> Value {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body).unwrap_or_else(|_| json!({ "summary": raw }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_surfaces_missing_reading_as_na() {
        let prompt = analysis_prompt("Test", &GpsCoordinates::new(12.9, 77.6), None, None);
        assert!(prompt.contains("temperature: N/A"));
        assert!(prompt.contains("Heat zone: N/A"));
    }

    #[test]
    fn prompt_embeds_zone_and_reading() {
        let zone = classify(Some(31.0)).unwrap();
        let prompt =
            analysis_prompt("Bengaluru", &GpsCoordinates::new(12.9, 77.6), Some(31.0), Some(zone));
        assert!(prompt.contains("31.0 C"));
        assert!(prompt.contains("Critical Heat Zone"));
    }

    #[test]
    fn parses_fenced_completion() {
        let raw = "```json\n{\"title\": \"ok\"}\n```";
        assert_eq!(parse_completion_json(raw)["title"], "ok");
    }

    #[test]
    fn wraps_non_json_completion() {
        let parsed = parse_completion_json("The area is quite hot.");
        assert_eq!(parsed["summary"], "The area is quite hot.");
    }
}
