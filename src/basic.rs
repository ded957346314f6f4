//! Quick estimate from a short household form.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Assumptions;
use crate::equipment::{state_profile, CatalogKey, FinancingKind, PanelType};
use crate::error::{EstimateError, Result};
use crate::financial::{
    calculate_financials, financing_options, CostInputs, FinancialResult, FinancingOption,
};
use crate::shading::ShadingLevel;
use crate::sizing::{calculate_system_size, SystemSizingInputs, SystemSizingResult};
use crate::types::{non_negative, ClimateProfile, EnergyProfile};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicFormData {
    /// Two-letter US state code.
    pub state: String,
    pub house_square_feet: f64,
    pub monthly_electric_bill: f64,
    pub monthly_kwh_usage: f64,
    /// $/kWh, or ¢/kWh when above 1.
    pub electricity_rate: String,
    pub shading_level: String,
    pub panel_type: String,
    pub financing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub state: String,
    pub electricity_rate: f64,
    pub shading_level: ShadingLevel,
    pub panel_type: PanelType,
    pub sizing: SystemSizingResult,
    pub financials: FinancialResult,
    /// The option matching the requested financing.
    pub financing: FinancingOption,
    pub warnings: Vec<String>,
}

impl CalculationResult {
    pub fn system_size_kw(&self) -> f64 {
        self.sizing.system_size_kw
    }

    pub fn annual_production_kwh(&self) -> f64 {
        self.sizing.annual_production_kwh
    }

    pub fn payback_period(&self) -> Option<f64> {
        self.financials.payback_period
    }

    pub fn roi(&self) -> Option<f64> {
        self.financials.roi
    }
}

/// Parses a rate typed as dollars or cents per kWh.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches('$').trim_end_matches(['¢', 'c']).trim();
    let rate: f64 = cleaned.parse().ok()?;
    if !rate.is_finite() || rate <= 0.0 {
        return None;
    }
    Some(if rate > 1.0 { rate / 100.0 } else { rate })
}

pub fn calculate_solar_savings(form: &BasicFormData) -> Result<CalculationResult> {
    calculate_solar_savings_with(form, &Assumptions::default())
}

/// Basic estimate: state resource, seasonal production, optimal roof orientation.
///
/// Fails only for an unknown state code.
pub fn calculate_solar_savings_with(
    form: &BasicFormData,
    assumptions: &Assumptions,
) -> Result<CalculationResult> {
    let state = state_profile(&form.state)
        .ok_or_else(|| EstimateError::UnrecognizedLocation(form.state.clone()))?;
    let mut warnings = Vec::new();

    let electricity_rate = parse_rate(&form.electricity_rate).unwrap_or_else(|| {
        warn!(
            rate = %form.electricity_rate,
            state = state.code,
            "unreadable rate, using state average"
        );
        warnings.push(format!(
            "Electricity rate not recognized; using the {} average of ${:.2}/kWh.",
            state.code, state.average_rate
        ));
        state.average_rate
    });
    let shading_level = ShadingLevel::from_key(&form.shading_level);
    let panel_type = PanelType::from_key(&form.panel_type);
    let financing_kind = FinancingKind::from_key(&form.financing);

    let house_square_feet = non_negative(form.house_square_feet);
    let max_panels = (house_square_feet > 0.0).then(|| {
        let usable_sqft =
            house_square_feet * assumptions.roof_to_floor_ratio * assumptions.usable_roof_fraction;
        (usable_sqft / assumptions.panel_footprint_sqft).floor() as u32
    });

    let sizing = calculate_system_size(
        &SystemSizingInputs::builder()
            .energy(EnergyProfile {
                monthly_kwh_usage: form.monthly_kwh_usage,
                monthly_bill: form.monthly_electric_bill,
                electricity_rate,
                ..EnergyProfile::default()
            })
            .panel_type(panel_type)
            .climate(ClimateProfile::from_peak_sun_hours(state.peak_sun_hours))
            .shading_factor(shading_level.factor())
            .maybe_max_panels(max_panels)
            .assumptions(assumptions.clone())
            .build(),
    );
    warnings.extend(sizing.warnings.iter().cloned());

    let panel = panel_type.spec();
    let cost_inputs = CostInputs::builder()
        .cost_per_watt(panel.cost_per_watt * state.cost_index)
        .electricity_rate(electricity_rate)
        .degradation_rate(panel.degradation_rate)
        .assumptions(assumptions.clone())
        .build();
    let financials = calculate_financials(
        sizing.system_size_kw,
        sizing.annual_production_kwh,
        &cost_inputs,
    );
    if financials.payback_period.is_none() {
        warnings.push(String::from(
            "The system does not pay for itself at current usage.",
        ));
    }

    let options = financing_options(
        &financials,
        sizing.annual_production_kwh,
        electricity_rate,
        assumptions,
    );
    // cash always comes first, the longest loan last
    let financing = options
        .iter()
        .rev()
        .find(|option| option.kind == financing_kind)
        .unwrap_or(&options[0])
        .clone();

    debug!(
        state = state.code,
        system_size_kw = sizing.system_size_kw,
        net_cost = financials.net_cost,
        "basic estimate"
    );

    Ok(CalculationResult {
        state: state.code.to_owned(),
        electricity_rate,
        shading_level,
        panel_type,
        sizing,
        financials,
        financing,
        warnings,
    })
}
