use approx::{assert_abs_diff_eq, assert_relative_eq};

use solar_estimator::equipment::{FinancingKind, InverterType, PanelType};
use solar_estimator::pro::*;
use solar_estimator::production::ProductionModel;
use solar_estimator::shading::ShadingModel;
use solar_estimator::terrain::ElevationGrid;
use solar_estimator::types::ClimateProfile;

fn arizona() -> ProSolarInput {
    ProSolarInput::builder()
        .monthly_bill(150.0)
        .roof_size(1_500.0)
        .location("arizona")
        .panel_type("premium")
        .battery_storage(false)
        .build()
}

fn has_warning(warnings: &[String], text: &str) -> bool {
    warnings.iter().any(|warning| warning.contains(text))
}

// ── Scenarios ──

#[test]
fn test_arizona_premium_without_battery() {
    let result = calculate_pro_solar_system(&arizona());
    assert_eq!(result.location, "arizona");
    assert_eq!(
        (result.site.latitude, result.site.longitude),
        (33.4, -112.1)
    );
    assert_eq!(result.site.elevation, 0.0);
    assert_eq!(result.electricity_rate, 0.14);
    assert_abs_diff_eq!(result.recommended_tilt, 0.76 * 33.4 + 3.1, epsilon = 1e-12);
    assert_eq!(result.equipment.panel_type, PanelType::Premium);
    assert_eq!(result.equipment.inverter_type, InverterType::String);
    assert_eq!(result.equipment.battery, None);
    assert_eq!(result.derates.shading_model, ShadingModel::Obstructions);
    assert_eq!(result.derates.shading_factor, 1.0);

    assert_eq!(result.panel_count, 15);
    assert_abs_diff_eq!(result.system_size_kw, 6.45, epsilon = 1e-12);
    assert!(result.annual_production_kwh > 12_000.0);
    assert_relative_eq!(
        result.total_system_cost,
        6_450.0 * 3.20 * 0.95,
        max_relative = 1e-12
    );
    assert_eq!(result.net_cost, result.financials.net_cost);

    let cash = &result.financing_options[0];
    assert_eq!(cash.kind, FinancingKind::Cash);
    assert_eq!(cash.label, "Cash Purchase");
    assert_eq!(cash.monthly_payment, 0.0);
    assert!(result.payback_period.unwrap() > 0.0);
}

#[test]
fn test_battery_adds_cost_and_equipment() {
    let input = ProSolarInput {
        battery_storage: true,
        ..arizona()
    };
    let with_battery = calculate_pro_solar_system(&input);
    let without = calculate_pro_solar_system(&arizona());
    assert_relative_eq!(
        with_battery.total_system_cost,
        without.total_system_cost + 12_000.0,
        max_relative = 1e-12
    );
    assert_eq!(with_battery.equipment.battery.unwrap().capacity_kwh, 13.5);
}

#[test]
fn test_custom_battery_capacity_scales_cost() {
    let input = ProSolarInput {
        battery_storage: true,
        battery_capacity_kwh: Some(27.0),
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.financials.battery_cost, 24_000.0);
}

#[test]
fn test_unknown_location_uses_national_average() {
    let input = ProSolarInput {
        location: String::from("Atlantis"),
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.location, "national_average");
    assert_eq!(result.electricity_rate, 0.16);
    assert_eq!(result.sizing.peak_sun_hours, 4.5);
}

#[test]
fn test_explicit_rate_overrides_region() {
    let input = ProSolarInput {
        electricity_rate: Some(0.25),
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.electricity_rate, 0.25);
    assert_abs_diff_eq!(
        result.sizing.annual_usage_kwh,
        150.0 / 0.25 * 12.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_climate_degradation_overrides_panel() {
    let baseline = calculate_pro_solar_system(&arizona());
    assert_eq!(
        baseline.financials.degradation_rate,
        baseline.equipment.panel.degradation_rate
    );

    let climate = ClimateProfile {
        degradation_rate: 0.01,
        ..ClimateProfile::from_peak_sun_hours(6.5)
    };
    let input = ProSolarInput {
        climate: Some(climate),
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.financials.degradation_rate, 0.01);
    assert_eq!(result.annual_production_kwh, baseline.annual_production_kwh);
    let lifetime = result.financials.lifetime_production_kwh;
    assert!(lifetime < baseline.financials.lifetime_production_kwh);
}

#[test]
fn test_obstructions_reduce_shading_factor() {
    let input = ProSolarInput {
        obstructions: vec![
            String::from("trees"),
            String::from("chimney"),
            String::from("kite"),
        ],
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_abs_diff_eq!(result.derates.shading_factor, 0.87, epsilon = 1e-12);
    let baseline = calculate_pro_solar_system(&arizona());
    assert!(result.panel_count > baseline.panel_count);
}

#[test]
fn test_elevation_grid_switches_to_terrain_shading() {
    let grid = ElevationGrid::new(3, 3, vec![400.0; 9]).unwrap();
    let input = ProSolarInput {
        elevation_grid: Some(grid),
        obstructions: vec![String::from("trees")],
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.derates.shading_model, ShadingModel::Terrain);
    assert_eq!(result.derates.shading_factor, 1.0);
    let terrain = result.terrain.unwrap();
    assert_eq!(terrain.center_elevation, 400.0);
    assert_eq!(terrain.latitude, 33.4);
    assert_eq!(result.site.elevation, 400.0);
}

#[test]
fn test_west_facing_roof_warns() {
    let input = ProSolarInput {
        roof_azimuth: Some(270.0),
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.derates.directional_loss, 0.15);
    assert!(has_warning(&result.warnings, "Roof orientation"));
}

#[test]
fn test_poor_roof_warns() {
    let input = ProSolarInput {
        roof_condition: Some(String::from("Needs Replacement")),
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert!(result
        .warnings
        .iter()
        .any(|w| w == "Roof needs replacement before installing panels."));
}

#[test]
fn test_small_roof_caps_system() {
    let input = ProSolarInput {
        roof_size: 100.0,
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.panel_count, 4);
    assert!(result.sizing.roof_limited);
}

#[test]
fn test_equipment_and_roof_type_change_price() {
    let input = ProSolarInput {
        inverter_type: Some(String::from("microinverters")),
        roof_type: Some(String::from("tile")),
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_relative_eq!(
        result.financials.cost_per_watt,
        (3.20 * 0.95 + 0.25) * 1.15,
        max_relative = 1e-12
    );
    assert_eq!(result.equipment.inverter_type, InverterType::Micro);
}

#[test]
fn test_hourly_model_replaces_seasonal_production() {
    let seasonal = calculate_pro_solar_system(&arizona());
    let hourly = calculate_pro_solar_system(&ProSolarInput {
        production_model: ProductionModel::Hourly,
        ..arizona()
    });
    assert_eq!(hourly.production_model, ProductionModel::Hourly);
    assert_eq!(hourly.system_size_kw, seasonal.system_size_kw);
    assert_relative_eq!(
        hourly.monthly_production_kwh.iter().sum::<f64>(),
        hourly.annual_production_kwh,
        max_relative = 1e-12
    );
    assert_ne!(hourly.annual_production_kwh, seasonal.annual_production_kwh);
    let ratio = hourly.annual_production_kwh / seasonal.annual_production_kwh;
    assert!(ratio > 0.6 && ratio < 1.4, "ratio {ratio}");
}

#[test]
fn test_zero_bill_is_degenerate_not_error() {
    let input = ProSolarInput {
        monthly_bill: 0.0,
        ..arizona()
    };
    let result = calculate_pro_solar_system(&input);
    assert_eq!(result.system_size_kw, 0.0);
    assert_eq!(result.payback_period, None);
    assert_eq!(result.financing_options[0].label, "Cash Purchase");
}

// ── Serde ──

#[test]
fn test_input_from_camel_case_json() {
    let json = r#"{
        "monthlyBill": 150,
        "roofSize": 1500,
        "location": "arizona",
        "panelType": "premium",
        "batteryStorage": false
    }"#;
    let input: ProSolarInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.offset_goal_percent, 100.0);
    assert_eq!(input.production_model, ProductionModel::Seasonal);
    assert_eq!(
        calculate_pro_solar_system(&input),
        calculate_pro_solar_system(&arizona())
    );
}

#[test]
fn test_result_serializes() {
    let value = serde_json::to_value(calculate_pro_solar_system(&arizona())).unwrap();
    assert_eq!(value["financing_options"][0]["label"], "Cash Purchase");
    assert_eq!(value["production_model"], "seasonal");
    assert!(value["terrain"].is_null());
}
