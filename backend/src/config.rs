//! Configuration management for the HeatLens backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with HEATLENS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Earth Engine imagery provider configuration
    pub earth_engine: EarthEngineConfig,

    /// LLM completion provider configuration
    pub llm: LlmConfig,

    /// Reverse geocoding configuration
    pub geocoding: GeocodingConfig,

    /// Optional Google environment APIs
    pub google: GoogleApisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EarthEngineConfig {
    /// Path to the Google service-account key file (JSON).
    /// Required: startup fails without it.
    pub service_account_file: String,

    /// Cloud project used for Earth Engine requests
    pub project: String,

    /// Acquisition year used when a request does not specify one
    pub default_year: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Chat completions endpoint (OpenAI-compatible)
    pub api_endpoint: String,

    /// API key. Required: startup fails without it.
    pub api_key: String,

    /// Model identifier
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Nominatim endpoint
    pub api_endpoint: String,

    /// User-Agent sent with reverse geocoding requests, per the
    /// Nominatim usage policy
    pub user_agent: String,
}

/// API keys for the optional environment features. Any absent key
/// disables the corresponding endpoint rather than failing startup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GoogleApisConfig {
    pub pollen_api_key: Option<String>,
    pub solar_api_key: Option<String>,
    pub aerial_view_api_key: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("HEATLENS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("earth_engine.service_account_file", "credentials.json")?
            .set_default("earth_engine.default_year", 2024)?
            .set_default(
                "llm.api_endpoint",
                "https://api.groq.com/openai/v1/chat/completions",
            )?
            .set_default("llm.model", "llama-3.3-70b-versatile")?
            .set_default(
                "geocoding.api_endpoint",
                "https://nominatim.openstreetmap.org",
            )?
            .set_default("geocoding.user_agent", "heatlens-backend/0.1")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (HEATLENS_ prefix)
            .add_source(
                Environment::with_prefix("HEATLENS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}
