use chrono::TimeZone;
use chrono_tz::America::Phoenix;
use tracing_subscriber::EnvFilter;

use solar_estimator::{
    calculate_pro_solar_system, calculate_solar_savings, clear_sky, solar_position,
    BasicFormData, ProSolarInput, ProductionModel, MONTH_NAMES,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .compact()
        .init();

    let latitude = 33.45;
    let longitude = -112.07;
    let dt = Phoenix.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
    let pos = solar_position(latitude, longitude, &dt);
    let irr = clear_sky(&pos);

    println!("=== Solar Position ===");
    println!("Location: Phoenix, AZ ({:.2}°N, {:.2}°W)", latitude, -longitude);
    println!("Date/Time: {}", dt);
    println!("Declination: {:.2}°", pos.declination);
    println!("Hour Angle: {:.2}°", pos.hour_angle);
    println!("Elevation: {:.2}°", pos.elevation);
    println!("Azimuth: {:.2}° (0°=N, 90°=E, 180°=S)", pos.azimuth);
    println!("Clear-sky global: {:.0} W/m²", irr.global);
    println!();

    let form = BasicFormData {
        state: String::from("CA"),
        house_square_feet: 2_000.0,
        monthly_electric_bill: 270.0,
        monthly_kwh_usage: 900.0,
        electricity_rate: String::from("30"),
        shading_level: String::from("light"),
        panel_type: String::from("monocrystalline"),
        financing: String::from("loan"),
    };
    let basic = calculate_solar_savings(&form).unwrap();

    println!("=== Basic Estimate ({}) ===", basic.state);
    println!(
        "System: {:.2} kW ({} panels)",
        basic.system_size_kw(),
        basic.sizing.panel_count
    );
    println!("Annual production: {:.0} kWh", basic.annual_production_kwh());
    println!("Net cost: ${:.0}", basic.financials.net_cost);
    match basic.payback_period() {
        Some(years) => println!("Payback: {:.1} years", years),
        None => println!("Payback: never"),
    }
    println!(
        "{}: ${:.0}/month",
        basic.financing.label, basic.financing.monthly_payment
    );
    println!();

    let input = ProSolarInput::builder()
        .monthly_bill(150.0)
        .roof_size(1_500.0)
        .location("arizona")
        .panel_type("premium")
        .battery_storage(false)
        .obstructions(vec![String::from("chimney")])
        .production_model(ProductionModel::Hourly)
        .build();
    let pro = calculate_pro_solar_system(&input);

    println!("=== Pro Estimate ({}) ===", pro.location);
    println!(
        "System: {:.2} kW of {} at {:.1}° tilt",
        pro.system_size_kw, pro.equipment.panel.name, pro.roof.tilt
    );
    for (month, kwh) in MONTH_NAMES.iter().zip(pro.monthly_production_kwh) {
        println!("  {month}: {kwh:>6.0} kWh");
    }
    println!("Annual production: {:.0} kWh", pro.annual_production_kwh);
    println!("Total cost: ${:.0}", pro.total_system_cost);
    for option in &pro.financing_options {
        println!(
            "  {:<32} ${:>8.0} upfront  ${:>6.0}/month",
            option.label, option.upfront_cost, option.monthly_payment
        );
    }
    for warning in &pro.warnings {
        println!("Warning: {warning}");
    }
}
