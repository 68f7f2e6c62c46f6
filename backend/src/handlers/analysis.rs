//! Location analysis and chatbot handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use shared::GpsCoordinates;

use crate::error::AppResult;
use crate::services::analysis::{AnalysisService, LocationAnalysis};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Analyze the urban heat situation at a point
pub async fn analyze_location(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeRequest>,
) -> AppResult<Json<LocationAnalysis>> {
    let service = analysis_service(&state);
    let analysis = service.analyze_point(input.lat, input.lng).await?;
    Ok(Json(analysis))
}

#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    pub message: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ChatbotResponse {
    pub reply: String,
}

/// Conversational consultant endpoint; grounds replies in the zone
/// context when the client supplies coordinates.
pub async fn chatbot(
    State(state): State<AppState>,
    Json(input): Json<ChatbotRequest>,
) -> AppResult<Json<ChatbotResponse>> {
    let location = match (input.lat, input.lng) {
        (Some(lat), Some(lng)) => Some(GpsCoordinates::new(lat, lng)),
        _ => None,
    };

    let service = analysis_service(&state);
    let reply = service.chat(&input.message, location).await?;
    Ok(Json(ChatbotResponse { reply }))
}

fn analysis_service(state: &AppState) -> AnalysisService {
    AnalysisService::new(
        state.temperature.clone(),
        state.llm.clone(),
        state.geocoder.clone(),
        state.config.earth_engine.default_year,
    )
}
