//! Planning impact analysis service
//!
//! Samples regional land-cover temperature statistics around a planning
//! area, derives cooling/heating factors and runs the planting impact
//! estimator, then asks the LLM for a narrative over the numbers.

use std::sync::Arc;

use serde::Serialize;

use shared::{
    estimate, plausible_temperature, validate_coordinates, validate_planting_items,
    GpsCoordinates, LandCoverClass, LandCoverFactors, PlanningResult, PlantingItem,
};

use crate::error::{AppError, AppResult};
use crate::external::{CompletionProvider, TemperatureProvider};

/// Radius of the sampling disc around the planning area center
pub const SAMPLING_RADIUS_M: f64 = 1000.0;

/// Base temperature assumed when no cloud-free reading exists
pub const FALLBACK_BASE_TEMP_C: f64 = 30.0;

/// Planning analysis service
#[derive(Clone)]
pub struct PlanningService {
    temperature: Arc<dyn TemperatureProvider>,
    llm: Arc<dyn CompletionProvider>,
    year: i32,
}

/// Full planning analysis: the deterministic estimate plus AI narrative
#[derive(Debug, Serialize)]
pub struct PlanningAnalysis {
    #[serde(flatten)]
    pub result: PlanningResult,
    /// Whether the base temperature came from imagery or the fallback
    pub base_temp_observed: bool,
    pub insights: String,
}

impl PlanningService {
    pub fn new(
        temperature: Arc<dyn TemperatureProvider>,
        llm: Arc<dyn CompletionProvider>,
        year: i32,
    ) -> Self {
        Self {
            temperature,
            llm,
            year,
        }
    }

    /// Analyze a set of proposed placements around a center point
    pub async fn analyze(
        &self,
        lat: f64,
        lng: f64,
        items: Vec<PlantingItem>,
    ) -> AppResult<PlanningAnalysis> {
        let coords = GpsCoordinates::new(lat, lng);
        validate_coordinates(&coords).map_err(|message| AppError::Validation {
            field: "coordinates",
            message: message.to_string(),
        })?;
        validate_planting_items(&items).map_err(|message| AppError::Validation {
            field: "items",
            message: message.to_string(),
        })?;

        let regional = plausible_temperature(
            self.temperature
                .regional_mean(lat, lng, SAMPLING_RADIUS_M, None, self.year)
                .await?,
        );
        let tree_mean = self.class_mean(lat, lng, LandCoverClass::TreeCover).await?;
        let water_mean = self.class_mean(lat, lng, LandCoverClass::Water).await?;
        let built_mean = self.class_mean(lat, lng, LandCoverClass::BuiltUp).await?;

        let base_temp = regional.unwrap_or(FALLBACK_BASE_TEMP_C);
        let factors = LandCoverFactors::from_means(base_temp, tree_mean, water_mean, built_mean);
        let result = estimate(base_temp, factors, &items);

        tracing::debug!(
            base_temp,
            net_change = result.net_change,
            items = items.len(),
            "planning estimate computed"
        );

        let prompt = insights_prompt(&coords, &result);
        let insights = match self.llm.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("LLM insights unavailable: {}", e);
                "AI insights are temporarily unavailable.".to_string()
            }
        };

        Ok(PlanningAnalysis {
            result,
            base_temp_observed: regional.is_some(),
            insights,
        })
    }

    async fn class_mean(
        &self,
        lat: f64,
        lng: f64,
        class: LandCoverClass,
    ) -> AppResult<Option<f64>> {
        let mean = self
            .temperature
            .regional_mean(lat, lng, SAMPLING_RADIUS_M, Some(class), self.year)
            .await?;
        Ok(plausible_temperature(mean))
    }
}

/// Build the narrative prompt from the deterministic estimate
pub fn insights_prompt(coords: &GpsCoordinates, result: &PlanningResult) -> String {
    let items = result
        .item_summary
        .iter()
        .map(|(label, count)| format!("{} x{}", label, count))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Act as an urban planner reviewing a heat mitigation proposal.\n\
         Area center: {lat}, {lng}\n\
         Current mean surface temperature: {base:.2} C\n\
         Proposed placements: {items}\n\
         Projected temperature after changes: {projected:.2} C (net {net:+.2} C)\n\
         Land cover differentials: trees {tree:+.2} C, water {water:+.2} C, built-up {built:+.2} C\n\n\
         In under 150 words: assess whether this proposal meaningfully cools the area, \
         note the strongest and weakest choices, and suggest one improvement.",
        lat = coords.latitude,
        lng = coords.longitude,
        base = result.base_temp,
        items = if items.is_empty() { "none".to_string() } else { items },
        projected = result.projected_temp,
        net = result.net_change,
        tree = result.factors.tree,
        water = result.factors.water,
        built = result.factors.built,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::estimate;

    #[test]
    fn insights_prompt_embeds_estimate() {
        let factors = LandCoverFactors {
            tree: -2.0,
            water: -3.0,
            built: 2.0,
        };
        let items = vec![
            PlantingItem {
                label: "Tree".into(),
                count: 5,
            },
            PlantingItem {
                label: "Road".into(),
                count: 2,
            },
        ];
        let result = estimate(30.0, factors, &items);
        let prompt = insights_prompt(&GpsCoordinates::new(12.9, 77.6), &result);

        assert!(prompt.contains("30.00 C"));
        assert!(prompt.contains("29.48 C"));
        assert!(prompt.contains("Tree x5"));
        assert!(prompt.contains("Road x2"));
        assert!(prompt.contains("trees -2.00 C"));
    }
}
