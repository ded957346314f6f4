use serde::{Deserialize, Serialize};

/// Twelve values ordered January to December.
pub type MonthlyValues = [f64; 12];

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level.
    pub elevation: f64,
}

impl SiteLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
            elevation: 0.0,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }
}

/// Sun position in degrees. Azimuth is clockwise from true north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    pub julian_day: f64,
    pub declination: f64,
    pub right_ascension: f64,
    pub hour_angle: f64,
    pub zenith: f64,
    pub elevation: f64,
    pub azimuth: f64,
}

impl SolarPosition {
    pub fn is_daylight(&self) -> bool {
        self.elevation > 0.0
    }
}

/// Irradiance components in W/m².
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SolarIrradiance {
    pub direct: f64,
    pub diffuse: f64,
    pub global: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarPotential {
    Excellent,
    Good,
    #[default]
    Fair,
    Poor,
}

impl SolarPotential {
    /// Rating by daily peak sun hours.
    pub fn from_peak_sun_hours(peak_sun_hours: f64) -> Self {
        match peak_sun_hours {
            h if h >= 6.0 => Self::Excellent,
            h if h >= 5.0 => Self::Good,
            h if h >= 4.0 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

/// Weather-derived site climate, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateProfile {
    /// kWh/m²/day.
    pub average_irradiance: f64,
    pub monthly_irradiance: MonthlyValues,
    pub peak_sun_hours: f64,
    pub temperature_correction: f64,
    pub weather_adjustment: f64,
    /// Fraction per year.
    pub degradation_rate: f64,
    pub seasonal_variation: MonthlyValues,
    pub climate_zone: String,
    pub solar_potential: SolarPotential,
}

impl ClimateProfile {
    /// A neutral profile around the given peak sun hours.
    pub fn from_peak_sun_hours(peak_sun_hours: f64) -> Self {
        Self {
            average_irradiance: peak_sun_hours,
            monthly_irradiance: [peak_sun_hours; 12],
            peak_sun_hours,
            solar_potential: SolarPotential::from_peak_sun_hours(peak_sun_hours),
            ..Self::default()
        }
    }

    pub fn irradiance_factor(&self) -> f64 {
        self.temperature_correction * self.weather_adjustment
    }
}

impl Default for ClimateProfile {
    fn default() -> Self {
        Self {
            average_irradiance: 4.5,
            monthly_irradiance: [4.5; 12],
            peak_sun_hours: 4.5,
            temperature_correction: 1.0,
            weather_adjustment: 1.0,
            degradation_rate: 0.005,
            seasonal_variation: [1.0; 12],
            climate_zone: String::from("temperate"),
            solar_potential: SolarPotential::Fair,
        }
    }
}

/// Household consumption and tariff.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyProfile {
    pub monthly_kwh_usage: f64,
    pub monthly_bill: f64,
    /// $/kWh.
    pub electricity_rate: f64,
    pub net_metering_rate: Option<f64>,
    pub has_electric_vehicle: bool,
    pub has_pool: bool,
    pub has_hot_tub: bool,
}

/// Replaces NaN, infinities and negatives with zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
