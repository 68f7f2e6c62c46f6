//! Tests for heat-zone classification
//!
//! Verifies the threshold table, the strict-boundary rule and totality of
//! the classifier over finite temperatures.

use proptest::prelude::*;
use shared::{classify, HEAT_ZONES, ZONE_UPPER_BOUNDS};

// =============================================================================
// Unit Tests
// =============================================================================

mod unit_tests {
    use super::*;

    #[test]
    fn missing_reading_yields_no_zone() {
        assert!(classify(None).is_none());
    }

    #[test]
    fn canonical_thresholds() {
        assert_eq!(ZONE_UPPER_BOUNDS, [26.0, 27.5, 28.7, 29.5]);
    }

    /// A value exactly on a boundary is not `< bound`, so it belongs to
    /// the hotter tier: 26.0 classifies as tier 2.
    #[test]
    fn boundary_26_is_second_tier() {
        let zone = classify(Some(26.0)).unwrap();
        assert_eq!(zone.id, 2);
        assert_eq!(zone.name, "Comfort Zone");
    }

    #[test]
    fn just_below_boundary_stays_in_cooler_tier() {
        assert_eq!(classify(Some(25.999)).unwrap().id, 1);
        assert_eq!(classify(Some(27.499)).unwrap().id, 2);
        assert_eq!(classify(Some(28.699)).unwrap().id, 3);
        assert_eq!(classify(Some(29.499)).unwrap().id, 4);
    }

    #[test]
    fn open_ended_upper_tier() {
        assert_eq!(classify(Some(29.5)).unwrap().id, 5);
        assert_eq!(classify(Some(48.0)).unwrap().id, 5);
    }

    #[test]
    fn every_zone_has_display_metadata() {
        for zone in &HEAT_ZONES {
            assert!(!zone.name.is_empty());
            assert!(!zone.status_label.is_empty());
            assert!(zone.color.starts_with('#'));
            assert!(!zone.suggestions.is_empty());
        }
    }
}

// =============================================================================
// Property Tests
// =============================================================================

mod property_tests {
    use super::*;

    proptest! {
        /// Every finite temperature maps to exactly one zone whose
        /// interval contains it under the strict-< rule.
        #[test]
        fn classification_is_total_and_consistent(t in -90.0f64..60.0) {
            let zone = classify(Some(t)).expect("finite input always classifies");

            let lower = if zone.id == 1 {
                f64::NEG_INFINITY
            } else {
                ZONE_UPPER_BOUNDS[(zone.id - 2) as usize]
            };
            let upper = if zone.id == 5 {
                f64::INFINITY
            } else {
                ZONE_UPPER_BOUNDS[(zone.id - 1) as usize]
            };

            prop_assert!(t >= lower, "temperature {} below zone {} lower bound {}", t, zone.id, lower);
            prop_assert!(t < upper, "temperature {} not below zone {} upper bound {}", t, zone.id, upper);
        }

        /// Classification is monotonic: hotter readings never map to a
        /// cooler tier.
        #[test]
        fn classification_is_monotonic(a in -90.0f64..60.0, b in -90.0f64..60.0) {
            let (cool, hot) = if a <= b { (a, b) } else { (b, a) };
            let cool_zone = classify(Some(cool)).unwrap();
            let hot_zone = classify(Some(hot)).unwrap();
            prop_assert!(cool_zone.id <= hot_zone.id);
        }
    }
}
