//! Aerial view video handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::external::aerial_view::AerialVideo;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AerialViewQuery {
    pub address: String,
}

/// Look up the cinematic aerial video for an address
pub async fn aerial_view(
    State(state): State<AppState>,
    Query(query): Query<AerialViewQuery>,
) -> AppResult<Json<AerialVideo>> {
    if query.address.trim().is_empty() {
        return Err(AppError::Validation {
            field: "address",
            message: "Address cannot be empty".to_string(),
        });
    }

    let client = state
        .aerial
        .clone()
        .ok_or(AppError::FeatureDisabled("Aerial view"))?;

    let video = client
        .lookup_video(&query.address)
        .await?
        .ok_or_else(|| AppError::NotFound("Aerial video".to_string()))?;

    Ok(Json(video))
}
