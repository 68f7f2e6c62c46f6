//! Route definitions for the HeatLens backend

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Heat layer tiles for the map client
        .route("/heat/:year", get(handlers::get_heat_layer))
        // Point analysis and conversational consultant
        .route("/analyze", post(handlers::analyze_location))
        .route("/chatbot", post(handlers::chatbot))
        // Planning mode impact estimation
        .route("/planning/analyze", post(handlers::analyze_planning))
        // Environment checks (optional features)
        .route("/check_pollen", post(handlers::check_pollen))
        .route("/solar/analyze", post(handlers::analyze_solar))
        .route("/aerial_view", get(handlers::aerial_view))
}
