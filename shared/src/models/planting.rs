//! Planting impact estimation
//!
//! Projects the net land-surface-temperature change of a set of proposed
//! land-cover assets from regional class-mean temperature differentials.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single asset only partially realizes a full land-cover pixel's
/// thermal signature, so each placed item counts for a tenth of its
/// class differential.
pub const ASSET_SCALE: f64 = 0.1;

/// Projected net change is clamped to this magnitude in degrees Celsius.
pub const NET_CHANGE_LIMIT: f64 = 5.0;

/// Fallback offsets applied when a land-cover class has no observed pixels
/// in the sampling region: class mean = regional mean + offset.
pub const TREE_FALLBACK_OFFSET: f64 = -2.0;
pub const WATER_FALLBACK_OFFSET: f64 = -3.0;
pub const BUILT_FALLBACK_OFFSET: f64 = 2.0;

/// Asset types that can be placed in planning mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetKind {
    Tree,
    Plant,
    Pond,
    Building,
    Road,
}

impl AssetKind {
    /// Parse a placement label, case-insensitively. Unknown labels return
    /// `None` and contribute nothing to the estimate.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "tree" => Some(AssetKind::Tree),
            "plant" => Some(AssetKind::Plant),
            "pond" => Some(AssetKind::Pond),
            "building" => Some(AssetKind::Building),
            "road" => Some(AssetKind::Road),
            _ => None,
        }
    }
}

/// A proposed asset placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantingItem {
    pub label: String,
    pub count: u32,
}

/// Per-class temperature differentials against the regional mean.
///
/// Each field is `(class-masked regional mean) - (regional mean)`;
/// negative values cool, positive values heat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LandCoverFactors {
    pub tree: f64,
    pub water: f64,
    pub built: f64,
}

impl LandCoverFactors {
    /// Derive factors from observed class means, substituting fixed
    /// fallback offsets for classes with no matching pixels.
    pub fn from_means(
        base_temp: f64,
        tree_mean: Option<f64>,
        water_mean: Option<f64>,
        built_mean: Option<f64>,
    ) -> Self {
        Self {
            tree: tree_mean.map_or(TREE_FALLBACK_OFFSET, |m| m - base_temp),
            water: water_mean.map_or(WATER_FALLBACK_OFFSET, |m| m - base_temp),
            built: built_mean.map_or(BUILT_FALLBACK_OFFSET, |m| m - base_temp),
        }
    }

    /// Weight applied per unit of the given asset kind
    pub fn weight_for(&self, kind: AssetKind) -> f64 {
        match kind {
            AssetKind::Tree => self.tree,
            AssetKind::Plant => self.tree * 0.5,
            AssetKind::Pond => self.water,
            AssetKind::Building => self.built,
            AssetKind::Road => self.built * 1.2,
        }
    }
}

/// Outcome of a planting impact estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningResult {
    pub base_temp: f64,
    pub projected_temp: f64,
    pub net_change: f64,
    pub factors: LandCoverFactors,
    /// Item counts keyed by label, in stable order
    pub item_summary: BTreeMap<String, u32>,
}

/// Estimate the projected temperature change of a set of placements.
///
/// Pure and order-independent: contributions are summed, so shuffling
/// `items` never changes the result. Items with unrecognized labels are
/// counted in the summary but contribute zero.
pub fn estimate(
    base_temp: f64,
    factors: LandCoverFactors,
    items: &[PlantingItem],
) -> PlanningResult {
    // Aggregate counts per label first, then sum contributions in the
    // summary's stable order: the result is bit-identical however the
    // input sequence is shuffled.
    let mut item_summary: BTreeMap<String, u32> = BTreeMap::new();
    for item in items {
        let total = item_summary.entry(item.label.clone()).or_insert(0);
        *total = total.saturating_add(item.count);
    }

    let mut raw_net_change = 0.0;
    for (label, count) in &item_summary {
        if let Some(kind) = AssetKind::from_label(label) {
            raw_net_change += factors.weight_for(kind) * ASSET_SCALE * *count as f64;
        }
    }

    let net_change = raw_net_change.clamp(-NET_CHANGE_LIMIT, NET_CHANGE_LIMIT);

    PlanningResult {
        base_temp,
        projected_temp: base_temp + net_change,
        net_change,
        factors,
        item_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str, count: u32) -> PlantingItem {
        PlantingItem {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn fallback_factors_from_empty_region() {
        let factors = LandCoverFactors::from_means(30.0, None, None, None);
        assert_eq!(
            factors,
            LandCoverFactors {
                tree: -2.0,
                water: -3.0,
                built: 2.0,
            }
        );
    }

    #[test]
    fn observed_means_override_fallbacks() {
        let factors = LandCoverFactors::from_means(30.0, Some(27.5), None, Some(33.0));
        assert_eq!(factors.tree, -2.5);
        assert_eq!(factors.water, -3.0);
        assert_eq!(factors.built, 3.0);
    }

    #[test]
    fn trees_and_roads_scenario() {
        let factors = LandCoverFactors {
            tree: -2.0,
            water: -3.0,
            built: 2.0,
        };
        let result = estimate(30.0, factors, &[item("Tree", 5), item("Road", 2)]);
        // Tree: -2.0 * 0.1 * 5 = -1.0; Road: 2.0 * 1.2 * 0.1 * 2 = 0.48
        assert!((result.net_change - (-0.52)).abs() < 1e-9);
        assert!((result.projected_temp - 29.48).abs() < 1e-9);
        assert_eq!(result.item_summary["Tree"], 5);
        assert_eq!(result.item_summary["Road"], 2);
    }

    #[test]
    fn net_change_clamps_at_limits() {
        let factors = LandCoverFactors {
            tree: 3.0,
            water: -3.0,
            built: 2.0,
        };
        let warming = estimate(30.0, factors, &[item("Tree", 200)]);
        assert_eq!(warming.net_change, 5.0);
        assert_eq!(warming.projected_temp, 35.0);

        let cooling = estimate(30.0, factors, &[item("Pond", 400)]);
        assert_eq!(cooling.net_change, -5.0);
        assert_eq!(cooling.projected_temp, 25.0);
    }

    #[test]
    fn duplicate_labels_saturate_instead_of_overflowing() {
        let factors = LandCoverFactors {
            tree: -2.0,
            water: -3.0,
            built: 2.0,
        };
        let result = estimate(
            30.0,
            factors,
            &[item("Tree", u32::MAX), item("Tree", 2)],
        );
        assert_eq!(result.item_summary["Tree"], u32::MAX);
        assert_eq!(result.net_change, -5.0);
        assert_eq!(result.projected_temp, 25.0);
    }

    #[test]
    fn unknown_labels_contribute_zero_but_are_summarized() {
        let factors = LandCoverFactors {
            tree: -2.0,
            water: -3.0,
            built: 2.0,
        };
        let result = estimate(28.0, factors, &[item("Fountain", 3)]);
        assert_eq!(result.net_change, 0.0);
        assert_eq!(result.projected_temp, 28.0);
        assert_eq!(result.item_summary["Fountain"], 3);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(AssetKind::from_label("TREE"), Some(AssetKind::Tree));
        assert_eq!(AssetKind::from_label(" pond "), Some(AssetKind::Pond));
        assert_eq!(AssetKind::from_label("fountain"), None);
    }
}
