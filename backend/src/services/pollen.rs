//! Planting safety check against grass pollen levels
//!
//! Tree planting is discouraged where grass pollen is already high, to
//! protect asthmatic residents. The decision rule is pure; the service
//! wires it to the pollen forecast provider.

use serde::Serialize;

use shared::{validate_coordinates, GpsCoordinates};

use crate::error::{AppError, AppResult};
use crate::external::pollen::{GrassPollen, PollenClient};

/// Grass UPI at or above this blocks planting ("High" on the 0-5 scale)
pub const GRASS_BLOCK_UPI: i32 = 4;

/// Outcome of a planting safety check
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PollenCheck {
    pub safe: bool,
    /// Grass UPI when the provider had a forecast
    pub level: Option<i32>,
    pub category: Option<String>,
    pub message: String,
}

/// Pollen safety service
#[derive(Clone)]
pub struct PollenService {
    pollen: PollenClient,
}

impl PollenService {
    pub fn new(pollen: PollenClient) -> Self {
        Self { pollen }
    }

    /// Check whether planting at a location is pollen-safe
    pub async fn check(&self, lat: f64, lng: f64) -> AppResult<PollenCheck> {
        let coords = GpsCoordinates::new(lat, lng);
        validate_coordinates(&coords).map_err(|message| AppError::Validation {
            field: "coordinates",
            message: message.to_string(),
        })?;

        let grass = self.pollen.grass_pollen(lat, lng).await?;
        Ok(evaluate(grass))
    }
}

/// Decide planting safety from a grass pollen reading
pub fn evaluate(grass: Option<GrassPollen>) -> PollenCheck {
    match grass {
        Some(g) if g.upi >= GRASS_BLOCK_UPI => PollenCheck {
            safe: false,
            level: Some(g.upi),
            message: format!(
                "Grass pollen is {} (UPI {}). Avoid planting trees here to protect \
                 asthmatic residents.",
                g.category, g.upi
            ),
            category: Some(g.category),
        },
        Some(g) => PollenCheck {
            safe: true,
            level: Some(g.upi),
            message: format!("Grass pollen is {} (UPI {}). Safe to plant.", g.category, g.upi),
            category: Some(g.category),
        },
        None => PollenCheck {
            safe: true,
            level: None,
            category: None,
            message: "No grass pollen forecast for this area. Safe to plant.".to_string(),
        },
    }
}

/// Response substituted when the provider is unreachable: the check fails
/// open so planting is never blocked by an outage.
pub fn unavailable() -> PollenCheck {
    PollenCheck {
        safe: true,
        level: None,
        category: None,
        message: "Pollen check unavailable. Planting allowed.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grass(upi: i32, category: &str) -> GrassPollen {
        GrassPollen {
            upi,
            category: category.to_string(),
        }
    }

    #[test]
    fn high_grass_pollen_blocks_planting() {
        let check = evaluate(Some(grass(4, "High")));
        assert!(!check.safe);
        assert_eq!(check.level, Some(4));

        let very_high = evaluate(Some(grass(5, "Very High")));
        assert!(!very_high.safe);
    }

    #[test]
    fn moderate_grass_pollen_allows_planting() {
        let check = evaluate(Some(grass(3, "Moderate")));
        assert!(check.safe);
        assert_eq!(check.level, Some(3));
    }

    #[test]
    fn missing_forecast_fails_open() {
        let check = evaluate(None);
        assert!(check.safe);
        assert!(check.level.is_none());
    }
}
