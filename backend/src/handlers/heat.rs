//! Heat layer tile handler

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Landsat 9 went live in 2022; reject years with no data.
const MIN_YEAR: i32 = 2022;
const MAX_YEAR: i32 = 2100;

#[derive(Serialize)]
pub struct HeatLayerResponse {
    #[serde(rename = "tileUrl")]
    pub tile_url: String,
}

/// Publish the yearly land-surface-temperature layer and return its tile
/// URL template for the map client.
pub async fn get_heat_layer(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> AppResult<Json<HeatLayerResponse>> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::Validation {
            field: "year",
            message: format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR),
        });
    }

    let tile_url = state.earth_engine.heat_layer_tiles(year).await?;
    Ok(Json(HeatLayerResponse { tile_url }))
}
