//! Validation utilities for the HeatLens platform

use crate::models::PlantingItem;
use crate::types::GpsCoordinates;

/// Sanity range for land-surface temperatures in Celsius.
/// Readings outside this range indicate a scaling or provider fault.
pub const TEMPERATURE_MIN_C: f64 = -90.0;
pub const TEMPERATURE_MAX_C: f64 = 60.0;

/// Largest number of distinct placements accepted in one planning request
pub const MAX_PLANTING_ITEMS: usize = 500;

/// Validate GPS coordinates are on the globe
pub fn validate_coordinates(coords: &GpsCoordinates) -> Result<(), &'static str> {
    if !coords.latitude.is_finite() || !(-90.0..=90.0).contains(&coords.latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !coords.longitude.is_finite() || !(-180.0..=180.0).contains(&coords.longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a temperature reading is physically plausible
pub fn validate_temperature(celsius: f64) -> Result<(), &'static str> {
    if !celsius.is_finite() {
        return Err("Temperature must be a finite number");
    }
    if !(TEMPERATURE_MIN_C..=TEMPERATURE_MAX_C).contains(&celsius) {
        return Err("Temperature outside plausible range (-90 to 60 C)");
    }
    Ok(())
}

/// Filter an optional reading through the plausibility check. Providers
/// occasionally return mis-scaled values; those are treated as missing
/// rather than classified.
pub fn plausible_temperature(reading: Option<f64>) -> Option<f64> {
    reading.filter(|t| validate_temperature(*t).is_ok())
}

/// Validate a planning item list before estimation
pub fn validate_planting_items(items: &[PlantingItem]) -> Result<(), &'static str> {
    if items.len() > MAX_PLANTING_ITEMS {
        return Err("Too many placements in one request");
    }
    for item in items {
        if item.label.trim().is_empty() {
            return Err("Placement labels cannot be empty");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_bounds() {
        assert!(validate_coordinates(&GpsCoordinates::new(12.97, 77.59)).is_ok());
        assert!(validate_coordinates(&GpsCoordinates::new(90.1, 0.0)).is_err());
        assert!(validate_coordinates(&GpsCoordinates::new(0.0, -180.5)).is_err());
        assert!(validate_coordinates(&GpsCoordinates::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn temperature_sanity_range() {
        assert!(validate_temperature(31.2).is_ok());
        assert!(validate_temperature(-90.0).is_ok());
        assert!(validate_temperature(60.0).is_ok());
        assert!(validate_temperature(61.0).is_err());
        assert!(validate_temperature(f64::INFINITY).is_err());
    }

    #[test]
    fn implausible_readings_become_missing() {
        assert_eq!(plausible_temperature(Some(31.2)), Some(31.2));
        assert_eq!(plausible_temperature(Some(312.0)), None);
        assert_eq!(plausible_temperature(Some(f64::NAN)), None);
        assert_eq!(plausible_temperature(None), None);
    }

    #[test]
    fn planting_item_limits() {
        let ok = vec![PlantingItem {
            label: "Tree".into(),
            count: 3,
        }];
        assert!(validate_planting_items(&ok).is_ok());

        let empty_label = vec![PlantingItem {
            label: "  ".into(),
            count: 1,
        }];
        assert!(validate_planting_items(&empty_label).is_err());
    }
}
