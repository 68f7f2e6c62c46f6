//! Heat-zone classification
//!
//! Maps a land-surface-temperature reading onto one of five discrete
//! heat-severity tiers, each carrying the display metadata and mitigation
//! suggestions the front end and LLM prompts are built from.

use serde::Serialize;

/// A heat-severity tier
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeatZone {
    /// Tier number, 1 (coolest) through 5 (hottest)
    pub id: u8,
    pub name: &'static str,
    pub status_label: &'static str,
    /// Map overlay color, hex
    pub color: &'static str,
    pub suggestions: &'static [&'static str],
}

/// Upper bounds of tiers 1-4 in degrees Celsius; tier 5 is open-ended.
///
/// Earlier revisions of the product shipped an 18/24/28/34 table, but its
/// lower tiers sit well below any urban heat signal. This table matches
/// the 20-50 degree range the heat layer visualizes.
pub const ZONE_UPPER_BOUNDS: [f64; 4] = [26.0, 27.5, 28.7, 29.5];

/// The five heat zones, ordered coolest to hottest.
pub const HEAT_ZONES: [HeatZone; 5] = [
    HeatZone {
        id: 1,
        name: "Cool Zone",
        status_label: "Safe",
        color: "#2e7d32",
        suggestions: &[
            "Maintain existing tree canopy",
            "Protect permeable surfaces from paving",
            "Monitor seasonal temperature trends",
        ],
    },
    HeatZone {
        id: 2,
        name: "Comfort Zone",
        status_label: "Low Risk",
        color: "#9acd32",
        suggestions: &[
            "Expand street tree planting",
            "Encourage green roofs on new construction",
            "Preserve open water bodies",
        ],
    },
    HeatZone {
        id: 3,
        name: "Warm Zone",
        status_label: "Moderate Risk",
        color: "#ffb300",
        suggestions: &[
            "Add shade structures over pedestrian corridors",
            "Convert paved lots to pocket parks",
            "Apply cool-roof coatings on large buildings",
        ],
    },
    HeatZone {
        id: 4,
        name: "Hot Zone",
        status_label: "High Risk",
        color: "#f4511e",
        suggestions: &[
            "Prioritize dense tree planting along roads",
            "Replace asphalt with high-albedo pavement",
            "Introduce misting or water features in public spaces",
        ],
    },
    HeatZone {
        id: 5,
        name: "Critical Heat Zone",
        status_label: "Severe",
        color: "#c62828",
        suggestions: &[
            "Declare a priority heat mitigation area",
            "Mandate reflective surfaces and shading in planning approvals",
            "Establish cooling shelters for vulnerable residents",
        ],
    },
];

/// Classify a land-surface temperature into a heat zone.
///
/// Returns `None` when no reading is available (for example when no
/// cloud-free pixel exists for the requested location); callers surface
/// this as an unknown zone. Comparisons are strict, so a temperature
/// exactly on a boundary falls into the hotter tier: `classify(Some(26.0))`
/// is tier 2, not tier 1.
pub fn classify(temperature_celsius: Option<f64>) -> Option<&'static HeatZone> {
    let t = temperature_celsius?;
    for (zone, bound) in HEAT_ZONES.iter().zip(ZONE_UPPER_BOUNDS.iter()) {
        if t < *bound {
            return Some(zone);
        }
    }
    Some(&HEAT_ZONES[4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reading_has_no_zone() {
        assert!(classify(None).is_none());
    }

    #[test]
    fn boundary_values_fall_to_hotter_tier() {
        assert_eq!(classify(Some(26.0)).unwrap().id, 2);
        assert_eq!(classify(Some(27.5)).unwrap().id, 3);
        assert_eq!(classify(Some(28.7)).unwrap().id, 4);
        assert_eq!(classify(Some(29.5)).unwrap().id, 5);
    }

    #[test]
    fn extremes_map_to_outer_tiers() {
        assert_eq!(classify(Some(-40.0)).unwrap().id, 1);
        assert_eq!(classify(Some(55.0)).unwrap().id, 5);
    }

    #[test]
    fn zones_are_ordered_and_complete() {
        for (i, zone) in HEAT_ZONES.iter().enumerate() {
            assert_eq!(zone.id as usize, i + 1);
            assert!(!zone.suggestions.is_empty());
        }
    }
}
