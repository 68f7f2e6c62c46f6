//! External API integrations
//!
//! Each provider the platform proxies gets its own client. The two
//! providers the analysis core depends on sit behind traits so services
//! can be exercised against stubs.

pub mod aerial_view;
pub mod earth_engine;
pub mod geocoding;
pub mod groq;
pub mod pollen;
pub mod solar;

pub use aerial_view::AerialViewClient;
pub use earth_engine::EarthEngineClient;
pub use geocoding::GeocodingClient;
pub use groq::GroqClient;
pub use pollen::PollenClient;
pub use solar::SolarClient;

use async_trait::async_trait;
use shared::LandCoverClass;

use crate::error::AppResult;

/// Source of land-surface temperature statistics.
///
/// A missing reading (no cloud-free pixel over the requested geometry)
/// is `Ok(None)`, not an error.
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    /// Yearly median land-surface temperature at a point, in Celsius
    async fn point_temperature(&self, lat: f64, lng: f64, year: i32)
        -> AppResult<Option<f64>>;

    /// Mean land-surface temperature over a disc around a point, in
    /// Celsius, optionally masked to a single land-cover class
    async fn regional_mean(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: f64,
        class: Option<LandCoverClass>,
        year: i32,
    ) -> AppResult<Option<f64>>;
}

/// Natural-language completion provider
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Submit a prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}
