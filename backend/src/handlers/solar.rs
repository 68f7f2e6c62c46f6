//! Solar analysis handler

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::solar::{AreaBounds, SolarAnalysis, SolarAnalysisService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SolarAnalyzeRequest {
    pub lat: f64,
    pub lng: f64,
    pub bounds: AreaBounds,
}

/// Analyze rooftop solar potential for a selected area
pub async fn analyze_solar(
    State(state): State<AppState>,
    Json(input): Json<SolarAnalyzeRequest>,
) -> AppResult<Json<SolarAnalysis>> {
    let client = state
        .solar
        .clone()
        .ok_or(AppError::FeatureDisabled("Solar analysis"))?;

    let service = SolarAnalysisService::new(client, state.llm.clone());
    let analysis = service.analyze(input.lat, input.lng, input.bounds).await?;
    Ok(Json(analysis))
}
