//! Rooftop solar analysis service
//!
//! Combines Google Solar building insights with a financial model and an
//! LLM investment narrative. Regions without Solar API coverage fall back
//! to clearly-flagged simulated data instead of failing the request.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use shared::{validate_coordinates, GpsCoordinates};

use crate::error::{AppError, AppResult};
use crate::external::solar::{SolarClient, SolarPotential};
use crate::external::CompletionProvider;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Financial model constants (Indian market)
const INSTALL_COST_PER_PANEL_INR: f64 = 25_000.0;
const SAVINGS_PER_KWH_INR: f64 = 8.0;
const CO2_KG_PER_KWH: f64 = 0.4;

/// Solar analysis service
#[derive(Clone)]
pub struct SolarAnalysisService {
    solar: SolarClient,
    llm: Arc<dyn CompletionProvider>,
}

/// Bounding box of the selected area
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AreaBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Financial projection for an installation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SolarFinancials {
    pub install_cost_inr: f64,
    pub annual_savings_inr: f64,
    pub breakeven_years: f64,
    pub co2_offset_kg_per_year: f64,
}

/// Full solar analysis payload
#[derive(Debug, Serialize)]
pub struct SolarAnalysis {
    pub location: GpsCoordinates,
    pub area_sqm: f64,
    pub area_sqft: f64,
    pub max_panels: i64,
    pub panel_capacity_watts: i64,
    pub yearly_energy_kwh: f64,
    pub financials: SolarFinancials,
    /// True when the Solar API has no coverage and the potential figures
    /// are simulated for demonstration
    pub simulated: bool,
    pub ai_analysis: String,
}

impl SolarAnalysisService {
    pub fn new(solar: SolarClient, llm: Arc<dyn CompletionProvider>) -> Self {
        Self { solar, llm }
    }

    /// Analyze the solar potential of a selected area
    pub async fn analyze(
        &self,
        lat: f64,
        lng: f64,
        bounds: AreaBounds,
    ) -> AppResult<SolarAnalysis> {
        let coords = GpsCoordinates::new(lat, lng);
        validate_coordinates(&coords).map_err(|message| AppError::Validation {
            field: "coordinates",
            message: message.to_string(),
        })?;

        let (potential, simulated) = match self.solar.building_insights(lat, lng).await? {
            Some(p) => (p, false),
            None => {
                tracing::info!(lat, lng, "solar coverage unavailable, using simulated data");
                (simulate_potential(), true)
            }
        };

        let area_sqm = area_from_bounds(&bounds);
        let area_sqft = round2(area_sqm * 10.764);
        let financials = SolarFinancials::from_potential(&potential);

        let prompt = investment_prompt(&coords, area_sqm, &potential, &financials);
        let ai_analysis = match self.llm.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("LLM investment analysis unavailable: {}", e);
                "AI investment analysis is temporarily unavailable.".to_string()
            }
        };

        Ok(SolarAnalysis {
            location: coords,
            area_sqm,
            area_sqft,
            max_panels: potential.max_array_panels_count,
            panel_capacity_watts: potential.panel_capacity_watts,
            yearly_energy_kwh: potential.yearly_energy_dc_kwh,
            financials,
            simulated,
            ai_analysis,
        })
    }
}

impl SolarFinancials {
    pub fn from_potential(potential: &SolarPotential) -> Self {
        let install_cost = potential.max_array_panels_count as f64 * INSTALL_COST_PER_PANEL_INR;
        let annual_savings = potential.yearly_energy_dc_kwh * SAVINGS_PER_KWH_INR;
        let breakeven_years = if annual_savings > 0.0 {
            round1(install_cost / annual_savings)
        } else {
            0.0
        };
        Self {
            install_cost_inr: install_cost,
            annual_savings_inr: annual_savings,
            breakeven_years,
            co2_offset_kg_per_year: round1(potential.yearly_energy_dc_kwh * CO2_KG_PER_KWH),
        }
    }
}

/// Approximate area of a lat/lng bounding box in square meters.
///
/// Treats the box as planar at the mid-latitude, which is accurate enough
/// at rooftop scale.
pub fn area_from_bounds(bounds: &AreaBounds) -> f64 {
    let lat1 = bounds.south.to_radians();
    let lat2 = bounds.north.to_radians();
    let lng_diff = (bounds.east - bounds.west).to_radians();

    let width = EARTH_RADIUS_M * lng_diff * ((lat1 + lat2) / 2.0).cos();
    let height = EARTH_RADIUS_M * (lat2 - lat1);
    round2((width * height).abs())
}

/// Plausible potential figures for regions the Solar API does not cover
pub fn simulate_potential() -> SolarPotential {
    let mut rng = rand::thread_rng();
    let panels = rng.gen_range(15..=40);
    let kwh_per_panel = rng.gen_range(420..=480);
    SolarPotential {
        max_array_panels_count: panels,
        yearly_energy_dc_kwh: (panels * kwh_per_panel) as f64,
        panel_capacity_watts: 400,
    }
}

fn investment_prompt(
    coords: &GpsCoordinates,
    area_sqm: f64,
    potential: &SolarPotential,
    financials: &SolarFinancials,
) -> String {
    format!(
        "Analyze this rooftop solar installation opportunity in India:\n\n\
         Location: {lat}, {lng}\n\
         Selected Area: {area} m2\n\
         Max Solar Panels: {panels} panels\n\
         Panel Capacity: {watts}W each\n\
         Yearly Energy Generation: {kwh} kWh\n\
         Installation Cost: Rs {cost:.0}\n\
         Annual Savings: Rs {savings:.0}\n\
         Break-even: {breakeven} years\n\
         CO2 Offset: {co2} kg/year\n\n\
         Provide a concise analysis with:\n\
         1. Is this a good investment? (Yes/No and why)\n\
         2. Key benefits for this specific installation\n\
         3. Three actionable next steps for the property owner\n\n\
         Keep it brief, practical, and India-focused.",
        lat = coords.latitude,
        lng = coords.longitude,
        area = area_sqm,
        panels = potential.max_array_panels_count,
        watts = potential.panel_capacity_watts,
        kwh = potential.yearly_energy_dc_kwh,
        cost = financials.install_cost_inr,
        savings = financials.annual_savings_inr,
        breakeven = financials.breakeven_years,
        co2 = financials.co2_offset_kg_per_year,
    )
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn financials_follow_model() {
        let potential = SolarPotential {
            max_array_panels_count: 20,
            yearly_energy_dc_kwh: 9000.0,
            panel_capacity_watts: 400,
        };
        let financials = SolarFinancials::from_potential(&potential);
        assert_eq!(financials.install_cost_inr, 500_000.0);
        assert_eq!(financials.annual_savings_inr, 72_000.0);
        assert_eq!(financials.breakeven_years, 6.9);
        assert_eq!(financials.co2_offset_kg_per_year, 3600.0);
    }

    #[test]
    fn zero_savings_has_zero_breakeven() {
        let potential = SolarPotential {
            max_array_panels_count: 10,
            yearly_energy_dc_kwh: 0.0,
            panel_capacity_watts: 400,
        };
        let financials = SolarFinancials::from_potential(&potential);
        assert_eq!(financials.breakeven_years, 0.0);
    }

    #[test]
    fn bounding_box_area_is_positive_and_plausible() {
        // Roughly 111m x 111m at the equator
        let bounds = AreaBounds {
            north: 0.001,
            south: 0.0,
            east: 0.001,
            west: 0.0,
        };
        let area = area_from_bounds(&bounds);
        assert!(area > 11_000.0 && area < 13_500.0, "area was {}", area);
    }

    #[test]
    fn simulated_potential_stays_in_range() {
        for _ in 0..50 {
            let p = simulate_potential();
            assert!((15..=40).contains(&p.max_array_panels_count));
            let per_panel = p.yearly_energy_dc_kwh / p.max_array_panels_count as f64;
            assert!((420.0..=480.0).contains(&per_panel));
            assert_eq!(p.panel_capacity_watts, 400);
        }
    }
}
