//! Pollen safety check handler

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::pollen::{self, PollenCheck, PollenService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PollenCheckRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Check whether tree planting is pollen-safe at a location.
///
/// Provider outages fail open: planting is never blocked because the
/// forecast could not be fetched.
pub async fn check_pollen(
    State(state): State<AppState>,
    Json(input): Json<PollenCheckRequest>,
) -> AppResult<Json<PollenCheck>> {
    let client = state
        .pollen
        .clone()
        .ok_or(AppError::FeatureDisabled("Pollen forecast"))?;

    let service = PollenService::new(client);
    match service.check(input.lat, input.lng).await {
        Ok(check) => Ok(Json(check)),
        Err(e @ AppError::Validation { .. }) => Err(e),
        Err(e) => {
            tracing::warn!("pollen check failed open: {}", e);
            Ok(Json(pollen::unavailable()))
        }
    }
}
