//! Detailed estimate with roof geometry, equipment choices and tariff structure.

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::angles::optimal_fixed_tilt;
use crate::config::Assumptions;
use crate::equipment::{
    region_profile, BatterySpec, CatalogKey, InverterSpec, InverterType, PanelSpec, PanelType,
    RoofCondition, RoofType,
};
use crate::financial::{
    calculate_financials, financing_options, CostInputs, FinancialResult, FinancingOption,
    TimeOfUseRates,
};
use crate::production::{capacity_factor, monthly_production, ProductionModel};
use crate::shading::{parse_obstructions, RoofDerates, RoofSpec};
use crate::sizing::{calculate_system_size, SystemSizingInputs, SystemSizingResult};
use crate::terrain::{
    analyze_terrain_effects, ElevationGrid, TerrainAnalysis, DEFAULT_RESOLUTION_M,
};
use crate::types::{non_negative, ClimateProfile, EnergyProfile, MonthlyValues, SiteLocation};

const fn default_offset_goal() -> f64 {
    100.0
}

#[derive(Debug, Clone, Builder, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProSolarInput {
    pub monthly_bill: f64,
    /// Roof area in square feet.
    pub roof_size: f64,
    /// Region name such as `arizona` or `new york`.
    #[builder(into)]
    pub location: String,
    #[builder(into)]
    pub panel_type: String,
    pub battery_storage: bool,

    #[builder(into)]
    #[serde(default)]
    pub roof_type: Option<String>,
    #[builder(into)]
    #[serde(default)]
    pub roof_condition: Option<String>,
    /// Degrees clockwise from north.
    #[serde(default)]
    pub roof_azimuth: Option<f64>,
    #[serde(default)]
    pub roof_tilt: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub obstructions: Vec<String>,
    #[serde(default)]
    pub elevation_grid: Option<ElevationGrid>,
    /// Meters per grid pixel.
    #[serde(default)]
    pub grid_resolution: Option<f64>,
    /// Replaces the regional climate; its degradation rate overrides the panel's.
    #[serde(default)]
    pub climate: Option<ClimateProfile>,
    /// $/kWh, the regional average when absent.
    #[serde(default)]
    pub electricity_rate: Option<f64>,
    #[serde(default)]
    pub net_metering_rate: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub has_electric_vehicle: bool,
    #[builder(default)]
    #[serde(default)]
    pub has_pool: bool,
    #[builder(default)]
    #[serde(default)]
    pub has_hot_tub: bool,
    #[builder(default = default_offset_goal())]
    #[serde(default = "default_offset_goal")]
    pub offset_goal_percent: f64,
    #[builder(into)]
    #[serde(default)]
    pub inverter_type: Option<String>,
    #[serde(default)]
    pub battery_capacity_kwh: Option<f64>,
    #[serde(default)]
    pub time_of_use: Option<TimeOfUseRates>,
    #[serde(default)]
    pub monthly_demand_charge: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub production_model: ProductionModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquipmentSummary {
    pub panel_type: PanelType,
    pub panel: PanelSpec,
    pub inverter_type: InverterType,
    pub inverter: InverterSpec,
    pub battery: Option<BatterySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProSolarResult {
    pub location: String,
    /// Regional coordinates, with the grid centre elevation when terrain was analyzed.
    pub site: SiteLocation,
    pub electricity_rate: f64,
    pub system_size_kw: f64,
    pub panel_count: u32,
    pub annual_production_kwh: f64,
    pub monthly_production_kwh: MonthlyValues,
    pub production_model: ProductionModel,
    pub capacity_factor: f64,
    pub total_system_cost: f64,
    pub net_cost: f64,
    pub annual_savings: f64,
    pub payback_period: Option<f64>,
    pub roi: Option<f64>,
    pub recommended_tilt: f64,
    pub equipment: EquipmentSummary,
    pub roof: RoofSpec,
    pub derates: RoofDerates,
    pub terrain: Option<TerrainAnalysis>,
    pub sizing: SystemSizingResult,
    pub financials: FinancialResult,
    pub financing_options: Vec<FinancingOption>,
    pub warnings: Vec<String>,
}

fn battery_for(input: &ProSolarInput) -> Option<BatterySpec> {
    if !input.battery_storage {
        return None;
    }
    let standard = BatterySpec::default();
    Some(match input.battery_capacity_kwh.map(non_negative) {
        Some(capacity) if capacity > 0.0 => BatterySpec {
            capacity_kwh: capacity,
            installed_cost: standard.installed_cost * capacity / standard.capacity_kwh,
        },
        _ => standard,
    })
}

pub fn calculate_pro_solar_system(input: &ProSolarInput) -> ProSolarResult {
    calculate_pro_solar_system_with(input, &Assumptions::default())
}

/// Pro estimate. Unknown categorical inputs fall back to their defaults, so this never fails.
pub fn calculate_pro_solar_system_with(
    input: &ProSolarInput,
    assumptions: &Assumptions,
) -> ProSolarResult {
    let region = region_profile(&input.location);
    let mut site = SiteLocation::new(region.latitude, region.longitude);
    let mut warnings = Vec::new();

    let electricity_rate = input
        .electricity_rate
        .map(non_negative)
        .filter(|rate| *rate > 0.0)
        .unwrap_or(region.average_rate);
    let energy = EnergyProfile {
        monthly_kwh_usage: 0.0,
        monthly_bill: input.monthly_bill,
        electricity_rate,
        net_metering_rate: input.net_metering_rate,
        has_electric_vehicle: input.has_electric_vehicle,
        has_pool: input.has_pool,
        has_hot_tub: input.has_hot_tub,
    };

    let recommended_tilt = optimal_fixed_tilt(site.latitude);
    let roof = RoofSpec {
        azimuth: input.roof_azimuth.filter(|azimuth| azimuth.is_finite()).unwrap_or(180.0),
        tilt: input.roof_tilt.filter(|tilt| tilt.is_finite()).unwrap_or(recommended_tilt),
        roof_type: input.roof_type.as_deref().map(RoofType::from_key).unwrap_or_default(),
        condition: input
            .roof_condition
            .as_deref()
            .map(RoofCondition::from_key)
            .unwrap_or_default(),
        obstructions: parse_obstructions(input.obstructions.iter().map(String::as_str)),
    };
    if let Some(warning) = roof.condition.warning() {
        warnings.push(warning.to_owned());
    }

    let terrain = input.elevation_grid.as_ref().map(|grid| {
        analyze_terrain_effects(
            grid,
            site.latitude,
            site.longitude,
            input.grid_resolution.unwrap_or(DEFAULT_RESOLUTION_M),
        )
    });
    if let Some(analysis) = &terrain {
        site = site.with_elevation(analysis.center_elevation);
    }
    let derates = roof.derates(site.latitude, terrain.as_ref());
    if derates.directional_loss >= 0.15 {
        warnings.push(format!(
            "Roof orientation costs {:.0}% of production.",
            derates.directional_loss * 100.0
        ));
    }

    let climate = input.climate.clone().unwrap_or_else(|| ClimateProfile {
        climate_zone: region.climate_zone.to_owned(),
        ..ClimateProfile::from_peak_sun_hours(region.peak_sun_hours)
    });

    let roof_size = non_negative(input.roof_size);
    let max_panels = (roof_size > 0.0).then(|| {
        (roof_size * assumptions.usable_roof_fraction / assumptions.panel_footprint_sqft).floor()
            as u32
    });

    let panel_type = PanelType::from_key(&input.panel_type);
    let panel = panel_type.spec();
    let sizing = calculate_system_size(
        &SystemSizingInputs::builder()
            .energy(energy)
            .offset_goal_percent(input.offset_goal_percent)
            .panel_type(panel_type)
            .climate(climate)
            .shading_factor(derates.shading_factor)
            .tilt_orientation_factor(derates.tilt_orientation_factor)
            .maybe_max_panels(max_panels)
            .assumptions(assumptions.clone())
            .build(),
    );
    warnings.extend(sizing.warnings.iter().cloned());

    let (monthly_production_kwh, annual_production_kwh) = match input.production_model {
        ProductionModel::Seasonal => (sizing.monthly_production_kwh, sizing.annual_production_kwh),
        ProductionModel::Hourly => {
            // panel geometry is simulated, so only shading and system losses derate
            let efficiency = derates.shading_factor * (1.0 - assumptions.system_losses);
            let monthly = monthly_production(
                site.latitude,
                site.longitude,
                sizing.system_size_kw,
                roof.tilt,
                roof.azimuth,
                efficiency,
            );
            (monthly, monthly.iter().sum())
        }
    };

    let inverter_type =
        input.inverter_type.as_deref().map(InverterType::from_key).unwrap_or_default();
    let inverter = inverter_type.spec();
    let battery = battery_for(input);
    let degradation_rate = input
        .climate
        .as_ref()
        .map(|climate| climate.degradation_rate)
        .filter(|rate| rate.is_finite() && *rate >= 0.0)
        .unwrap_or(panel.degradation_rate);
    let cost_per_watt = (panel.cost_per_watt * region.cost_index + inverter.cost_per_watt)
        * roof.roof_type.installation_multiplier();

    let cost_inputs = CostInputs::builder()
        .cost_per_watt(cost_per_watt)
        .electricity_rate(electricity_rate)
        .maybe_battery(battery)
        .degradation_rate(degradation_rate)
        .annual_usage_kwh(sizing.annual_usage_kwh)
        .maybe_net_metering_rate(input.net_metering_rate)
        .maybe_time_of_use(input.time_of_use)
        .maybe_monthly_demand_charge(input.monthly_demand_charge)
        .assumptions(assumptions.clone())
        .build();
    let financials = calculate_financials(
        sizing.system_size_kw,
        annual_production_kwh,
        &cost_inputs,
    );
    let financing_options = financing_options(
        &financials,
        annual_production_kwh,
        electricity_rate,
        assumptions,
    );

    debug!(
        region = region.name,
        model = ?input.production_model,
        system_size_kw = sizing.system_size_kw,
        annual_production_kwh,
        total_system_cost = financials.system_cost,
        "pro estimate"
    );

    ProSolarResult {
        location: region.name.to_owned(),
        site,
        electricity_rate,
        system_size_kw: sizing.system_size_kw,
        panel_count: sizing.panel_count,
        annual_production_kwh,
        monthly_production_kwh,
        production_model: input.production_model,
        capacity_factor: capacity_factor(annual_production_kwh, sizing.system_size_kw),
        total_system_cost: financials.system_cost,
        net_cost: financials.net_cost,
        annual_savings: financials.annual_savings,
        payback_period: financials.payback_period,
        roi: financials.roi,
        recommended_tilt,
        equipment: EquipmentSummary {
            panel_type,
            panel,
            inverter_type,
            inverter,
            battery,
        },
        roof,
        derates,
        terrain,
        sizing,
        financials,
        financing_options,
        warnings,
    }
}
