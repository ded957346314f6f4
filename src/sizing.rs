//! System sizing from household usage.

use bon::Builder;
use serde::Serialize;
use tracing::debug;

use crate::config::Assumptions;
use crate::equipment::PanelType;
use crate::production::{capacity_factor, seasonal_production, specific_yield};
use crate::types::{non_negative, ClimateProfile, EnergyProfile, MonthlyValues, SolarPotential};

/// Panel counts within this distance below a whole number are not rounded up.
const PANEL_COUNT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Builder)]
pub struct SystemSizingInputs {
    pub energy: EnergyProfile,
    /// Share of the annual usage to cover, in percent.
    #[builder(default = 100.0)]
    pub offset_goal_percent: f64,
    #[builder(default)]
    pub panel_type: PanelType,
    pub climate: Option<ClimateProfile>,
    #[builder(default = 1.0)]
    pub shading_factor: f64,
    #[builder(default = 1.0)]
    pub tilt_orientation_factor: f64,
    /// Upper bound from the usable roof area.
    pub max_panels: Option<u32>,
    #[builder(default)]
    pub assumptions: Assumptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceFactors {
    pub irradiance: f64,
    pub shading: f64,
    pub tilt_orientation: f64,
    pub system_losses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSizingResult {
    pub annual_usage_kwh: f64,
    pub target_annual_production_kwh: f64,
    /// Before rounding to whole panels.
    pub required_system_size_kw: f64,
    pub system_size_kw: f64,
    pub panel_count: u32,
    pub panel_wattage: f64,
    pub peak_sun_hours: f64,
    pub annual_production_kwh: f64,
    pub monthly_production_kwh: MonthlyValues,
    pub performance_ratio: f64,
    pub capacity_factor: f64,
    pub specific_yield: f64,
    /// Achieved share of the annual usage, in percent.
    pub offset_percent: f64,
    pub factors: PerformanceFactors,
    pub roof_limited: bool,
    pub warnings: Vec<String>,
}

/// Yearly consumption including the lifestyle loads.
pub fn annual_usage_kwh(energy: &EnergyProfile, assumptions: &Assumptions) -> f64 {
    let monthly_kwh = non_negative(energy.monthly_kwh_usage);
    let rate = non_negative(energy.electricity_rate);
    let baseline_monthly = if monthly_kwh > 0.0 {
        monthly_kwh
    } else if rate > 0.0 {
        non_negative(energy.monthly_bill) / rate
    } else {
        0.0
    };

    let mut annual = baseline_monthly * 12.0;
    if energy.has_electric_vehicle {
        annual += assumptions.ev_annual_kwh;
    }
    if energy.has_pool {
        annual += assumptions.pool_annual_kwh;
    }
    if energy.has_hot_tub {
        annual += assumptions.hot_tub_annual_kwh;
    }
    annual
}

/// Whole panels needed to reach `system_size_kw`.
pub fn panels_for(system_size_kw: f64, panel_wattage: f64) -> u32 {
    if panel_wattage <= 0.0 {
        return 0;
    }
    let exact = non_negative(system_size_kw) * 1_000.0 / panel_wattage;
    (exact - PANEL_COUNT_TOLERANCE).ceil().max(0.0) as u32
}

/// Sizes an array to cover the offset goal and estimates its seasonal production.
pub fn calculate_system_size(inputs: &SystemSizingInputs) -> SystemSizingResult {
    let assumptions = &inputs.assumptions;
    let mut warnings = Vec::new();

    let annual_usage = annual_usage_kwh(&inputs.energy, assumptions);
    let target_production = annual_usage * non_negative(inputs.offset_goal_percent) / 100.0;

    let (peak_sun_hours, irradiance_factor) = match &inputs.climate {
        Some(climate) => {
            if climate.solar_potential == SolarPotential::Poor {
                warnings.push(String::from(
                    "Low solar potential at this location limits production.",
                ));
            }
            (non_negative(climate.peak_sun_hours), non_negative(climate.irradiance_factor()))
        }
        None => (assumptions.default_peak_sun_hours, 1.0),
    };

    let shading = non_negative(inputs.shading_factor);
    let tilt_orientation = non_negative(inputs.tilt_orientation_factor);
    let performance_ratio = shading * tilt_orientation * (1.0 - assumptions.system_losses);
    if shading < 0.85 {
        warnings.push(format!(
            "High shading impact reduces production by {:.0}%.",
            (1.0 - shading) * 100.0
        ));
    }

    // annual kWh per installed kW
    let yield_per_kw = peak_sun_hours * irradiance_factor * 365.0 * performance_ratio;
    let required_size = if yield_per_kw > 0.0 {
        target_production / yield_per_kw
    } else {
        if target_production > 0.0 {
            warnings.push(String::from(
                "No usable sunlight at this site; the system cannot be sized.",
            ));
        }
        0.0
    };

    let panel = inputs.panel_type.spec();
    let mut panel_count = panels_for(required_size, panel.wattage);
    let mut roof_limited = false;
    if let Some(max_panels) = inputs.max_panels {
        if panel_count > max_panels {
            warnings.push(format!(
                "Roof area limits the system to {max_panels} panels instead of {panel_count}."
            ));
            panel_count = max_panels;
            roof_limited = true;
        }
    }

    let system_size = f64::from(panel_count) * panel.wattage / 1_000.0;
    let annual_production = system_size * yield_per_kw;
    let offset_percent = if annual_usage > 0.0 {
        annual_production / annual_usage * 100.0
    } else {
        0.0
    };

    debug!(
        annual_usage,
        target_production,
        required_size,
        system_size,
        panel_count,
        annual_production,
        "sized system"
    );

    SystemSizingResult {
        annual_usage_kwh: annual_usage,
        target_annual_production_kwh: target_production,
        required_system_size_kw: required_size,
        system_size_kw: system_size,
        panel_count,
        panel_wattage: panel.wattage,
        peak_sun_hours,
        annual_production_kwh: annual_production,
        monthly_production_kwh: seasonal_production(annual_production),
        performance_ratio,
        capacity_factor: capacity_factor(annual_production, system_size),
        specific_yield: specific_yield(annual_production, system_size),
        offset_percent,
        factors: PerformanceFactors {
            irradiance: irradiance_factor,
            shading,
            tilt_orientation,
            system_losses: assumptions.system_losses,
        },
        roof_limited,
        warnings,
    }
}
