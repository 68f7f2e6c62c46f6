//! Planning mode analysis handler

use axum::{extract::State, Json};
use serde::Deserialize;

use shared::PlantingItem;

use crate::error::AppResult;
use crate::services::planning::{PlanningAnalysis, PlanningService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanningRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub items: Vec<PlacementInput>,
}

/// One placed asset. The map client sends each placement individually
/// with its coordinates; only the label matters for the estimate, and
/// `count` lets API callers batch identical assets.
#[derive(Debug, Deserialize)]
pub struct PlacementInput {
    pub label: String,
    #[serde(default = "default_count")]
    pub count: u32,
    /// Placement position from the map client; not needed for the
    /// regional estimate
    #[allow(dead_code)]
    pub coordinates: Option<serde_json::Value>,
}

fn default_count() -> u32 {
    1
}

/// Estimate the temperature impact of proposed placements and return the
/// projection with AI insights.
pub async fn analyze_planning(
    State(state): State<AppState>,
    Json(input): Json<PlanningRequest>,
) -> AppResult<Json<PlanningAnalysis>> {
    let items: Vec<PlantingItem> = input
        .items
        .into_iter()
        .map(|p| PlantingItem {
            label: p.label,
            count: p.count,
        })
        .collect();

    let service = PlanningService::new(
        state.temperature.clone(),
        state.llm.clone(),
        state.config.earth_engine.default_year,
    );
    let analysis = service.analyze(input.lat, input.lng, items).await?;
    Ok(Json(analysis))
}
