//! Tests for planting impact estimation
//!
//! Verifies factor derivation fallbacks, the contribution model, clamping
//! and order independence.

use proptest::prelude::*;
use shared::{estimate, AssetKind, LandCoverFactors, PlantingItem};

fn item(label: &str, count: u32) -> PlantingItem {
    PlantingItem {
        label: label.to_string(),
        count,
    }
}

fn reference_factors() -> LandCoverFactors {
    LandCoverFactors {
        tree: -2.0,
        water: -3.0,
        built: 2.0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

mod unit_tests {
    use super::*;

    /// Fallback class means at base 30.0 derive the documented factors.
    #[test]
    fn fallback_factor_derivation() {
        let factors = LandCoverFactors::from_means(30.0, None, None, None);
        assert_eq!(factors.tree, -2.0);
        assert_eq!(factors.water, -3.0);
        assert_eq!(factors.built, 2.0);
    }

    /// End-to-end scenario: 5 trees and 2 roads at base 30.0.
    /// Tree: -2.0 * 0.1 * 5 = -1.0; Road: 2.0 * 1.2 * 0.1 * 2 = 0.48.
    #[test]
    fn trees_and_roads_end_to_end() {
        let result = estimate(30.0, reference_factors(), &[item("Tree", 5), item("Road", 2)]);
        assert!((result.net_change - (-0.52)).abs() < 1e-9);
        assert!((result.projected_temp - 29.48).abs() < 1e-9);
    }

    #[test]
    fn plants_weigh_half_a_tree() {
        let trees = estimate(30.0, reference_factors(), &[item("Tree", 2)]);
        let plants = estimate(30.0, reference_factors(), &[item("Plant", 4)]);
        assert!((trees.net_change - plants.net_change).abs() < 1e-12);
    }

    #[test]
    fn warming_clamps_at_plus_five() {
        let factors = LandCoverFactors {
            tree: 3.0,
            water: -3.0,
            built: 2.0,
        };
        let result = estimate(30.0, factors, &[item("Tree", 200)]);
        assert_eq!(result.net_change, 5.0);
        assert_eq!(result.projected_temp, 35.0);
    }

    #[test]
    fn cooling_clamps_at_minus_five() {
        let result = estimate(30.0, reference_factors(), &[item("Pond", 500)]);
        assert_eq!(result.net_change, -5.0);
        assert_eq!(result.projected_temp, 25.0);
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let result = estimate(
            28.0,
            reference_factors(),
            &[item("Gazebo", 10), item("Tree", 1)],
        );
        let tree_only = estimate(28.0, reference_factors(), &[item("Tree", 1)]);
        assert_eq!(result.net_change, tree_only.net_change);
        assert_eq!(result.item_summary["Gazebo"], 10);
    }

    #[test]
    fn empty_proposal_changes_nothing() {
        let result = estimate(31.5, reference_factors(), &[]);
        assert_eq!(result.net_change, 0.0);
        assert_eq!(result.projected_temp, 31.5);
        assert!(result.item_summary.is_empty());
    }

    #[test]
    fn label_parsing_covers_all_kinds() {
        for (label, kind) in [
            ("Tree", AssetKind::Tree),
            ("plant", AssetKind::Plant),
            ("POND", AssetKind::Pond),
            ("Building", AssetKind::Building),
            ("road", AssetKind::Road),
        ] {
            assert_eq!(AssetKind::from_label(label), Some(kind));
        }
    }
}

// =============================================================================
// Property Tests
// =============================================================================

mod property_tests {
    use super::*;

    fn arb_items() -> impl Strategy<Value = Vec<PlantingItem>> {
        proptest::collection::vec(
            (
                prop_oneof![
                    Just("Tree"),
                    Just("Plant"),
                    Just("Pond"),
                    Just("Building"),
                    Just("Road"),
                    Just("Statue"),
                ],
                0u32..50,
            )
                .prop_map(|(label, count)| item(label, count)),
            0..20,
        )
    }

    proptest! {
        /// Shuffling the item sequence never changes the estimate.
        #[test]
        fn estimate_is_order_independent(items in arb_items().prop_shuffle()) {
            let mut sorted = items.clone();
            sorted.sort_by(|a, b| a.label.cmp(&b.label));

            let shuffled = estimate(30.0, reference_factors(), &items);
            let ordered = estimate(30.0, reference_factors(), &sorted);

            prop_assert_eq!(shuffled.net_change, ordered.net_change);
            prop_assert_eq!(shuffled.projected_temp, ordered.projected_temp);
            prop_assert_eq!(shuffled.item_summary, ordered.item_summary);
        }

        /// The projection identity holds exactly for all inputs.
        #[test]
        fn projected_equals_base_plus_net(
            base in -20.0f64..55.0,
            items in arb_items(),
        ) {
            let result = estimate(base, reference_factors(), &items);
            prop_assert_eq!(result.projected_temp, result.base_temp + result.net_change);
            prop_assert_eq!(result.base_temp, base);
        }

        /// Net change never escapes the clamp interval.
        #[test]
        fn net_change_is_bounded(
            base in -20.0f64..55.0,
            tree in -10.0f64..10.0,
            water in -10.0f64..10.0,
            built in -10.0f64..10.0,
            items in arb_items(),
        ) {
            let factors = LandCoverFactors { tree, water, built };
            let result = estimate(base, factors, &items);
            prop_assert!(result.net_change >= -5.0);
            prop_assert!(result.net_change <= 5.0);
        }

        /// Factor derivation subtracts the regional mean from whichever
        /// class mean is available.
        #[test]
        fn factor_derivation_is_differential(
            base in 0.0f64..50.0,
            tree_mean in proptest::option::of(0.0f64..50.0),
        ) {
            let factors = LandCoverFactors::from_means(base, tree_mean, None, None);
            match tree_mean {
                Some(mean) => prop_assert_eq!(factors.tree, mean - base),
                None => prop_assert_eq!(factors.tree, -2.0),
            }
        }
    }
}
