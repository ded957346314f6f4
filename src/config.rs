//! Tunable estimation constants.
//!
//! Every field has a default, so a TOML document only needs the values it overrides:
//!
//! ```
//! let assumptions: solar_estimator::Assumptions = "discount_rate = 0.05".parse().unwrap();
//! assert_eq!(assumptions.discount_rate, 0.05);
//! assert_eq!(assumptions.system_losses, 0.14);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub term_years: u32,
    /// Annual percentage rate as a fraction.
    pub annual_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Wiring, inverter, soiling and mismatch losses as a fraction.
    pub system_losses: f64,
    /// Used when no climate profile is available.
    pub default_peak_sun_hours: f64,
    pub federal_tax_credit_rate: f64,
    pub rate_escalation: f64,
    pub discount_rate: f64,
    pub horizon_years: u32,

    pub ev_annual_kwh: f64,
    pub pool_annual_kwh: f64,
    pub hot_tub_annual_kwh: f64,

    /// Square feet taken by one mounted panel including spacing.
    pub panel_footprint_sqft: f64,
    /// Share of the roof area that can carry panels after setbacks.
    pub usable_roof_fraction: f64,
    /// Roof area as a share of the living area, for the basic calculator.
    pub roof_to_floor_ratio: f64,

    pub battery_usable_days: f64,
    pub demand_charge_reduction: f64,
    /// Share of production landing in peak hours when the tariff does not say.
    pub peak_production_fraction: f64,

    /// Metric tonnes of CO₂ per kWh of grid electricity.
    pub grid_emission_factor: f64,
    /// kg of CO₂ a tree absorbs per year.
    pub tree_absorption_kg: f64,
    /// kg of CO₂ per passenger car mile.
    pub car_emission_kg_per_mile: f64,

    pub loan_offers: Vec<LoanOffer>,
    /// Lease payment as a share of first-year savings.
    pub lease_savings_share: f64,
    pub lease_term_years: u32,
    /// PPA price as a share of the retail rate.
    pub ppa_rate_discount: f64,
    pub ppa_escalation: f64,
    pub ppa_term_years: u32,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            system_losses: 0.14,
            default_peak_sun_hours: 4.5,
            federal_tax_credit_rate: 0.30,
            rate_escalation: 0.03,
            discount_rate: 0.06,
            horizon_years: 25,
            ev_annual_kwh: 3_000.0,
            pool_annual_kwh: 2_500.0,
            hot_tub_annual_kwh: 1_500.0,
            panel_footprint_sqft: 17.5,
            usable_roof_fraction: 0.75,
            roof_to_floor_ratio: 0.6,
            battery_usable_days: 300.0,
            demand_charge_reduction: 0.70,
            peak_production_fraction: 0.4,
            grid_emission_factor: 0.000_709,
            tree_absorption_kg: 21.77,
            car_emission_kg_per_mile: 0.404,
            loan_offers: vec![
                LoanOffer {
                    term_years: 10,
                    annual_rate: 0.0599,
                },
                LoanOffer {
                    term_years: 15,
                    annual_rate: 0.0649,
                },
                LoanOffer {
                    term_years: 20,
                    annual_rate: 0.0699,
                },
            ],
            lease_savings_share: 0.8,
            lease_term_years: 20,
            ppa_rate_discount: 0.8,
            ppa_escalation: 0.029,
            ppa_term_years: 25,
        }
    }
}

impl FromStr for Assumptions {
    type Err = EstimateError;

    fn from_str(document: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let assumptions: Assumptions = r"
            horizon_years = 20
            rate_escalation = 0.025

            [[loan_offers]]
            term_years = 12
            annual_rate = 0.05
        "
        .parse()
        .unwrap();
        assert_eq!(assumptions.horizon_years, 20);
        assert_eq!(assumptions.rate_escalation, 0.025);
        let offer = LoanOffer {
            term_years: 12,
            annual_rate: 0.05,
        };
        assert_eq!(assumptions.loan_offers, vec![offer]);
        assert_eq!(assumptions.federal_tax_credit_rate, 0.30);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let result = "horizon_years = \"many\"".parse::<Assumptions>();
        assert!(matches!(result, Err(EstimateError::Assumptions(_))));
    }
}
