//! Energy production estimates.
//!
//! Two models coexist and are deliberately kept apart, as they give different numbers for the
//! same system:
//!
//! - [`ProductionModel::Seasonal`] spreads an annual figure derived from peak sun hours over a
//!   fixed reference curve. The sizing engine and both calculators use it by default.
//! - [`ProductionModel::Hourly`] integrates the clear-sky irradiance on the panel plane hour by
//!   hour over a reference year. The pro calculator switches to it on request.

use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::angles::{days_in_months, normalize_angle, solar_position, DEGREES_PER_HOUR};
use crate::irradiance::{clear_sky, plane_of_array};
use crate::types::{non_negative, MonthlyValues, MONTH_NAMES};

/// Monthly production multipliers relative to the monthly average. Sums to 12.
pub const SEASONAL_CURVE: MonthlyValues =
    [0.75, 0.85, 0.98, 1.08, 1.17, 1.22, 1.22, 1.17, 1.07, 0.95, 0.80, 0.74];

/// Non-leap year the hourly simulation walks through.
pub const REFERENCE_YEAR: i32 = 2025;
pub const FIRST_SIMULATED_HOUR: u32 = 6;
pub const LAST_SIMULATED_HOUR: u32 = 18;

pub const DEFAULT_PANEL_TILT: f64 = 30.0;
pub const DEFAULT_PANEL_AZIMUTH: f64 = 180.0;
pub const DEFAULT_SYSTEM_EFFICIENCY: f64 = 0.85;

const HOURS_PER_YEAR: f64 = 8_760.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionModel {
    #[default]
    Seasonal,
    Hourly,
}

/// Distributes annual production over [`SEASONAL_CURVE`]; the months add up to `annual_kwh`.
pub fn seasonal_production(annual_kwh: f64) -> MonthlyValues {
    let monthly_average = non_negative(annual_kwh) / 12.0;
    SEASONAL_CURVE.map(|multiplier| monthly_average * multiplier)
}

/// Hour-by-hour production of a fixed array in kWh per month.
///
/// Walks every day of [`REFERENCE_YEAR`] over local solar hours 6 to 18, skipping hours when
/// the sun is below the horizon. Non-finite coordinates produce nothing; longitudes outside
/// `[-180, 180)` are wrapped.
pub fn monthly_production(
    latitude: f64,
    longitude: f64,
    system_size_kw: f64,
    panel_tilt: f64,
    panel_azimuth: f64,
    system_efficiency: f64,
) -> MonthlyValues {
    let system_size_kw = non_negative(system_size_kw);
    let system_efficiency = non_negative(system_efficiency);
    let mut production = [0.0; 12];
    if system_size_kw == 0.0 || !latitude.is_finite() || !longitude.is_finite() {
        return production;
    }
    let longitude = normalize_angle(longitude + 180.0) - 180.0;
    let finite_or = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
    let panel_tilt = finite_or(panel_tilt, DEFAULT_PANEL_TILT);
    let panel_azimuth = finite_or(panel_azimuth, DEFAULT_PANEL_AZIMUTH);

    // local solar time runs ahead of UTC by longitude / 15 hours, at most half a day
    let utc_offset_seconds = (longitude / DEGREES_PER_HOUR * 3_600.0).round() as i64;

    for (month_index, days) in days_in_months(REFERENCE_YEAR).into_iter().enumerate() {
        let month = month_index as u32 + 1;
        let mut month_kwh = 0.0;
        for day in 1..=days {
            let Some(midnight) = NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
            else {
                continue;
            };
            let midnight = Utc.from_utc_datetime(&midnight);
            for hour in FIRST_SIMULATED_HOUR..=LAST_SIMULATED_HOUR {
                let instant = midnight
                    + TimeDelta::seconds(i64::from(hour) * 3_600 - utc_offset_seconds);
                let position = solar_position(latitude, longitude, &instant);
                if !position.is_daylight() {
                    continue;
                }
                let irradiance = clear_sky(&position);
                let poa = plane_of_array(&position, &irradiance, panel_tilt, panel_azimuth);
                // one-hour step: kW equals kWh
                month_kwh += system_size_kw * (poa / 1_000.0) * system_efficiency;
            }
        }
        trace!(month = MONTH_NAMES[month_index], month_kwh, "simulated month");
        production[month_index] = month_kwh;
    }
    production
}

/// [`monthly_production`] with a 30° south-facing array at 85% efficiency.
pub fn monthly_production_default(
    latitude: f64,
    longitude: f64,
    system_size_kw: f64,
) -> MonthlyValues {
    monthly_production(
        latitude,
        longitude,
        system_size_kw,
        DEFAULT_PANEL_TILT,
        DEFAULT_PANEL_AZIMUTH,
        DEFAULT_SYSTEM_EFFICIENCY,
    )
}

/// Share of the nameplate energy the system delivers over a year.
pub fn capacity_factor(annual_kwh: f64, system_size_kw: f64) -> f64 {
    if system_size_kw > 0.0 {
        non_negative(annual_kwh) / (system_size_kw * HOURS_PER_YEAR)
    } else {
        0.0
    }
}

/// kWh per installed kW per year.
pub fn specific_yield(annual_kwh: f64, system_size_kw: f64) -> f64 {
    if system_size_kw > 0.0 {
        non_negative(annual_kwh) / system_size_kw
    } else {
        0.0
    }
}
