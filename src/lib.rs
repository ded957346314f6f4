pub mod angles;
pub mod basic;
pub mod config;
pub mod equipment;
pub mod error;
pub mod financial;
pub mod irradiance;
pub mod pro;
pub mod production;
pub mod shading;
pub mod sizing;
pub mod terrain;
pub mod types;

pub use angles::{
    days_in_months, deg_to_rad, julian_day, leap_year, normalize_angle, optimal_fixed_tilt,
    rad_to_deg, solar_azimuth, solar_elevation, solar_position, DEGREES_PER_HOUR, EARTH_AXIAL_TILT,
};

pub use basic::{
    calculate_solar_savings, calculate_solar_savings_with, parse_rate, BasicFormData,
    CalculationResult,
};

pub use config::{Assumptions, LoanOffer};

pub use equipment::{
    region_profile, state_profile, BatterySpec, CatalogKey, FinancingKind, InverterSpec,
    InverterType, PanelSpec, PanelType, RegionProfile, RoofCondition, RoofType, StateProfile,
};

pub use error::{EstimateError, Result};

pub use financial::{
    calculate_financials, environmental_impact, financing_options, loan_payment, project_savings,
    CostInputs, EnvironmentalImpact, FinancialResult, FinancingOption, SavingsBreakdown,
    TimeOfUseRates, YearProjection,
};

pub use irradiance::{clear_sky, incidence_cosine, irradiance, plane_of_array, SOLAR_CONSTANT};

pub use pro::{
    calculate_pro_solar_system, calculate_pro_solar_system_with, EquipmentSummary, ProSolarInput,
    ProSolarResult,
};

pub use production::{
    capacity_factor, monthly_production, monthly_production_default, seasonal_production,
    specific_yield, ProductionModel, SEASONAL_CURVE,
};

pub use shading::{
    directional_loss, parse_obstructions, select_shading, shading_loss, tilt_factor, Obstruction,
    RoofDerates, RoofSpec, ShadingLevel, ShadingModel,
};

pub use sizing::{
    annual_usage_kwh, calculate_system_size, panels_for, PerformanceFactors, SystemSizingInputs,
    SystemSizingResult,
};

pub use terrain::{analyze_terrain_effects, ElevationGrid, TerrainAnalysis};

pub use types::{
    ClimateProfile, EnergyProfile, MonthlyValues, SiteLocation, SolarIrradiance, SolarPosition,
    SolarPotential, MONTH_NAMES,
};
