//! Earth Engine REST client for land-surface temperature statistics
//!
//! Authenticates with a Google service account (RS256 JWT exchanged for an
//! OAuth access token) and evaluates server-side expressions over the
//! Landsat 9 Level-2 thermal band. LST conversion: ST_B10 * 0.00341802
//! + 149.0 Kelvin, minus 273.15 for Celsius.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use shared::LandCoverClass;

use crate::config::EarthEngineConfig;
use crate::error::{AppError, AppResult};
use crate::external::TemperatureProvider;

const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const OAUTH_SCOPE: &str =
    "https://www.googleapis.com/auth/earthengine https://www.googleapis.com/auth/cloud-platform";

const LANDSAT_COLLECTION: &str = "LANDSAT/LC09/C02/T1_L2";
const WORLDCOVER_IMAGE: &str = "ESA/WorldCover/v200/2021";
const THERMAL_BAND: &str = "ST_B10";
const THERMAL_SCALE: f64 = 0.003_418_02;
const THERMAL_OFFSET: f64 = 149.0;
const KELVIN_OFFSET: f64 = 273.15;
const MAX_CLOUD_PERCENT: f64 = 10.0;

/// Native resolution of the thermal product, meters per pixel
const REDUCE_SCALE_M: f64 = 30.0;

/// Earth Engine API client
#[derive(Clone)]
pub struct EarthEngineClient {
    client: Client,
    base_url: String,
    project: String,
    credentials: Arc<ServiceAccountKey>,
    token: Arc<RwLock<Option<CachedToken>>>,
}

/// Google service-account key file contents (the fields we use)
#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct ComputeResponse {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct CreateMapResponse {
    name: String,
}

impl EarthEngineClient {
    /// Load the service-account key and verify credentials by fetching an
    /// initial access token. Called once at process start; a failure here
    /// is a fatal configuration error, not something to swallow.
    pub async fn connect(config: &EarthEngineConfig) -> AppResult<Self> {
        let raw = std::fs::read_to_string(&config.service_account_file).map_err(|e| {
            AppError::Configuration(format!(
                "cannot read service account file {}: {}",
                config.service_account_file, e
            ))
        })?;
        let credentials: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
            AppError::Configuration(format!("malformed service account file: {}", e))
        })?;

        let client = Self {
            client: Client::new(),
            base_url: "https://earthengine.googleapis.com/v1".to_string(),
            project: config.project.clone(),
            credentials: Arc::new(credentials),
            token: Arc::new(RwLock::new(None)),
        };

        client.access_token().await?;
        tracing::info!(
            account = %client.credentials.client_email,
            project = %client.project,
            "Earth Engine credentials verified"
        );
        Ok(client)
    }

    /// Client with a custom base URL (for testing)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Return a valid access token, refreshing through the OAuth
    /// JWT-bearer flow when the cached one is near expiry.
    async fn access_token(&self) -> AppResult<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() + Duration::from_secs(60) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let now = chrono::Utc::now().timestamp() as u64;

        let claims = JwtClaims {
            iss: &self.credentials.client_email,
            scope: OAUTH_SCOPE,
            aud: OAUTH_TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };

        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| AppError::Configuration(format!("invalid service account key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| AppError::Configuration(format!("JWT signing failed: {}", e)))?;

        let response = self
            .client
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ImageryProvider(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ImageryProvider(format!(
                "token exchange error: {} - {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ImageryProvider(format!("malformed token response: {}", e)))?;

        let cached = CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        };
        *self.token.write().await = Some(cached);

        Ok(token.access_token)
    }

    /// Evaluate an expression through `value:compute`
    async fn compute(&self, expression: Value) -> AppResult<Value> {
        let token = self.access_token().await?;
        let url = format!("{}/projects/{}/value:compute", self.base_url, self.project);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "expression": expression }))
            .send()
            .await
            .map_err(|e| AppError::ImageryProvider(format!("compute request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ImageryProvider(format!(
                "compute error: {} - {}",
                status, body
            )));
        }

        let data: ComputeResponse = response
            .json()
            .await
            .map_err(|e| AppError::ImageryProvider(format!("malformed compute response: {}", e)))?;
        Ok(data.result)
    }

    /// Publish the yearly heat layer and return its XYZ tile URL template
    pub async fn heat_layer_tiles(&self, year: i32) -> AppResult<String> {
        let token = self.access_token().await?;
        let url = format!("{}/projects/{}/maps", self.base_url, self.project);

        let body = json!({
            "expression": expression(scaled_lst_image(year)),
            "visualizationOptions": {
                "ranges": [{ "min": 20.0, "max": 50.0 }],
                "paletteColors": ["blue", "yellow", "orange", "red"],
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ImageryProvider(format!("map request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ImageryProvider(format!(
                "map creation error: {} - {}",
                status, text
            )));
        }

        let map: CreateMapResponse = response
            .json()
            .await
            .map_err(|e| AppError::ImageryProvider(format!("malformed map response: {}", e)))?;

        Ok(format!(
            "{}/{}/tiles/{{z}}/{{x}}/{{y}}",
            self.base_url, map.name
        ))
    }

    /// Extract the thermal band mean from a reduceRegion result. A null
    /// band value means no unmasked pixel fell inside the geometry.
    fn band_mean(result: &Value) -> Option<f64> {
        result.get(THERMAL_BAND).and_then(Value::as_f64)
    }
}

#[async_trait]
impl TemperatureProvider for EarthEngineClient {
    async fn point_temperature(
        &self,
        lat: f64,
        lng: f64,
        year: i32,
    ) -> AppResult<Option<f64>> {
        let geometry = point_geometry(lat, lng);
        let expr = expression(reduce_region(scaled_lst_image(year), geometry));
        let result = self.compute(expr).await?;
        Ok(Self::band_mean(&result))
    }

    async fn regional_mean(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: f64,
        class: Option<LandCoverClass>,
        year: i32,
    ) -> AppResult<Option<f64>> {
        let geometry = buffered_point(lat, lng, radius_meters);
        let mut image = scaled_lst_image(year);
        if let Some(class) = class {
            image = mask_to_class(image, class);
        }
        let result = self.compute(expression(reduce_region(image, geometry))).await?;
        Ok(Self::band_mean(&result))
    }
}

// ---------------------------------------------------------------------------
// Expression graph construction
//
// The REST API evaluates a serialized function graph. Nodes nest directly
// inside argument values, so the builders below compose one inline tree
// and wrap it in the single-result envelope `expression` expects.

fn invoke(function_name: &str, arguments: Value) -> Value {
    json!({
        "functionInvocationValue": {
            "functionName": function_name,
            "arguments": arguments,
        }
    })
}

fn constant(value: Value) -> Value {
    json!({ "constantValue": value })
}

/// Wrap a node tree in the Expression envelope
fn expression(root: Value) -> Value {
    json!({ "values": { "0": root }, "result": "0" })
}

/// Yearly median Landsat 9 surface temperature, scaled to Celsius
fn scaled_lst_image(year: i32) -> Value {
    let collection = invoke(
        "ImageCollection.load",
        json!({ "id": constant(json!(LANDSAT_COLLECTION)) }),
    );
    let dated = invoke(
        "Collection.filter",
        json!({
            "collection": collection,
            "filter": invoke(
                "Filter.date",
                json!({
                    "start": constant(json!(format!("{year}-01-01"))),
                    "end": constant(json!(format!("{year}-12-31"))),
                }),
            ),
        }),
    );
    let clear = invoke(
        "Collection.filter",
        json!({
            "collection": dated,
            "filter": invoke(
                "Filter.lessThan",
                json!({
                    "leftField": constant(json!("CLOUD_COVER")),
                    "rightValue": constant(json!(MAX_CLOUD_PERCENT)),
                }),
            ),
        }),
    );
    let median = invoke("reduce.median", json!({ "collection": clear }));
    let thermal = invoke(
        "Image.select",
        json!({
            "input": median,
            "bandSelectors": constant(json!([THERMAL_BAND])),
        }),
    );
    let scaled = invoke(
        "Image.multiply",
        json!({
            "image1": thermal,
            "image2": invoke("Image.constant", json!({ "value": constant(json!(THERMAL_SCALE)) })),
        }),
    );
    let kelvin = invoke(
        "Image.add",
        json!({
            "image1": scaled,
            "image2": invoke("Image.constant", json!({ "value": constant(json!(THERMAL_OFFSET)) })),
        }),
    );
    invoke(
        "Image.subtract",
        json!({
            "image1": kelvin,
            "image2": invoke("Image.constant", json!({ "value": constant(json!(KELVIN_OFFSET)) })),
        }),
    )
}

/// Restrict an image to pixels of one ESA WorldCover class
fn mask_to_class(image: Value, class: LandCoverClass) -> Value {
    let cover = invoke(
        "Image.select",
        json!({
            "input": invoke("Image.load", json!({ "id": constant(json!(WORLDCOVER_IMAGE)) })),
            "bandSelectors": constant(json!(["Map"])),
        }),
    );
    let mask = invoke(
        "Image.eq",
        json!({
            "image1": cover,
            "image2": invoke("Image.constant", json!({ "value": constant(json!(class.code())) })),
        }),
    );
    invoke(
        "Image.updateMask",
        json!({ "image": image, "mask": mask }),
    )
}

fn point_geometry(lat: f64, lng: f64) -> Value {
    invoke(
        "GeometryConstructors.Point",
        json!({ "coordinates": constant(json!([lng, lat])) }),
    )
}

fn buffered_point(lat: f64, lng: f64, radius_meters: f64) -> Value {
    invoke(
        "Geometry.buffer",
        json!({
            "geometry": point_geometry(lat, lng),
            "distance": constant(json!(radius_meters)),
        }),
    )
}

fn reduce_region(image: Value, geometry: Value) -> Value {
    invoke(
        "Image.reduceRegion",
        json!({
            "image": image,
            "reducer": invoke("Reducer.mean", json!({})),
            "geometry": geometry,
            "scale": constant(json!(REDUCE_SCALE_M)),
            "bestEffort": constant(json!(true)),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_mean_reads_present_value() {
        let result = json!({ "ST_B10": 31.25 });
        assert_eq!(EarthEngineClient::band_mean(&result), Some(31.25));
    }

    #[test]
    fn band_mean_is_none_for_masked_region() {
        let result = json!({ "ST_B10": null });
        assert_eq!(EarthEngineClient::band_mean(&result), None);
        assert_eq!(EarthEngineClient::band_mean(&json!({})), None);
    }

    #[test]
    fn expression_envelope_has_single_result() {
        let expr = expression(scaled_lst_image(2024));
        assert_eq!(expr["result"], "0");
        assert!(expr["values"]["0"]["functionInvocationValue"].is_object());
    }

    #[test]
    fn masked_image_references_worldcover_class() {
        let expr = mask_to_class(scaled_lst_image(2024), LandCoverClass::Water);
        let text = expr.to_string();
        assert!(text.contains(WORLDCOVER_IMAGE));
        assert!(text.contains("Image.updateMask"));
    }
}
