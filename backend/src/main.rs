//! HeatLens - Urban Heat Analysis Backend
//!
//! Proxies satellite imagery, LLM, geocoding and environment APIs behind
//! a small HTTP surface for the map front end, and runs the heat-zone
//! classification and planting impact models on top of them.

use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::{
    AerialViewClient, CompletionProvider, EarthEngineClient, GeocodingClient, GroqClient,
    PollenClient, SolarClient, TemperatureProvider,
};

/// Application state shared across handlers.
///
/// Provider clients are constructed once at process start; the imagery
/// and LLM providers sit behind traits so services can be tested against
/// stubs.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub earth_engine: EarthEngineClient,
    pub temperature: Arc<dyn TemperatureProvider>,
    pub llm: Arc<dyn CompletionProvider>,
    pub geocoder: GeocodingClient,
    pub pollen: Option<PollenClient>,
    pub solar: Option<SolarClient>,
    pub aerial: Option<AerialViewClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatlens_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting HeatLens server");
    tracing::info!("Environment: {}", config.environment);

    // Required providers: failures here are fatal configuration errors.
    tracing::info!("Verifying Earth Engine credentials...");
    let earth_engine = EarthEngineClient::connect(&config.earth_engine).await?;
    let llm = GroqClient::new(&config.llm);
    let geocoder = GeocodingClient::new(&config.geocoding);

    // Optional environment features, enabled per configured key
    let pollen = config.google.pollen_api_key.clone().map(PollenClient::new);
    let solar = config.google.solar_api_key.clone().map(SolarClient::new);
    let aerial = config
        .google
        .aerial_view_api_key
        .clone()
        .map(AerialViewClient::new);

    for (name, enabled) in [
        ("pollen", pollen.is_some()),
        ("solar", solar.is_some()),
        ("aerial view", aerial.is_some()),
    ] {
        if !enabled {
            tracing::warn!("{} API key not configured, feature disabled", name);
        }
    }

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        temperature: Arc::new(earth_engine.clone()),
        earth_engine,
        llm: Arc::new(llm),
        geocoder,
        pollen,
        solar,
        aerial,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "HeatLens Urban Heat Analysis API v1.0"
}
