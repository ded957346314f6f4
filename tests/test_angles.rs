use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};
use chrono_tz::America::{Chicago, Phoenix};

use solar_estimator::angles::*;

// ── Calendar ──

#[test]
fn test_days_in_months_sum_to_year_length() {
    assert_eq!(days_in_months(2025).iter().sum::<u32>(), 365);
    assert_eq!(days_in_months(2024).iter().sum::<u32>(), 366);
}

// ── NormalizeAngle ──

#[test]
fn test_normalize_angle_basic() {
    let cases: &[(f64, f64)] = &[
        (0.0, 0.0),
        (360.0, 0.0),
        (-90.0, 270.0),
        (725.0, 5.0),
        (-1e-15, 0.0),
    ];
    for &(input, expected) in cases {
        assert_abs_diff_eq!(normalize_angle(input), expected, epsilon = 1e-9);
    }
}

#[test]
fn test_optimal_fixed_tilt_symmetric() {
    assert_abs_diff_eq!(optimal_fixed_tilt(40.0), 33.5, epsilon = 1e-9);
    assert_eq!(optimal_fixed_tilt(-40.0), optimal_fixed_tilt(40.0));
}

// ── JulianDay ──

#[test]
fn test_julian_day_at_j2000() {
    let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    assert_abs_diff_eq!(julian_day(&epoch), J2000, epsilon = 1e-9);
}

#[test]
fn test_julian_day_ignores_time_zone() {
    let utc = Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
    let chicago = Chicago.with_ymd_and_hms(2025, 6, 21, 7, 0, 0).unwrap();
    assert_eq!(julian_day(&utc), julian_day(&chicago));
    assert_eq!(
        solar_position(41.9, -87.6, &utc),
        solar_position(41.9, -87.6, &chicago)
    );
}

// ── Declination ──

#[test]
fn test_declination_at_solstices() {
    let june = Utc.with_ymd_and_hms(2025, 6, 21, 3, 0, 0).unwrap();
    let december = Utc.with_ymd_and_hms(2025, 12, 21, 15, 0, 0).unwrap();
    assert_abs_diff_eq!(
        solar_position(0.0, 0.0, &june).declination,
        23.44,
        epsilon = 0.1
    );
    assert_abs_diff_eq!(
        solar_position(0.0, 0.0, &december).declination,
        -23.44,
        epsilon = 0.1
    );
}

#[test]
fn test_declination_near_zero_at_equinox() {
    let equinox = Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap();
    assert_abs_diff_eq!(
        solar_position(0.0, 0.0, &equinox).declination,
        0.0,
        epsilon = 0.1
    );
}

// ── SolarPosition ──

#[test]
fn test_equator_noon_at_equinox_is_overhead() {
    let noon = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
    let pos = solar_position(0.0, 0.0, &noon);
    assert!(pos.elevation > 87.0, "elevation {}", pos.elevation);
    assert_abs_diff_eq!(pos.zenith, 90.0 - pos.elevation, epsilon = 1e-12);
    assert!(pos.hour_angle.abs() < 3.0, "hour angle {}", pos.hour_angle);
}

#[test]
fn test_phoenix_summer_late_morning() {
    let dt = Phoenix.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
    let pos = solar_position(33.45, -112.07, &dt);
    assert!(
        pos.elevation > 75.0 && pos.elevation < 81.0,
        "elevation {}",
        pos.elevation
    );
    // before solar noon the sun is east of the meridian
    assert!(pos.hour_angle < 0.0);
    assert!(
        pos.azimuth > 90.0 && pos.azimuth < 180.0,
        "azimuth {}",
        pos.azimuth
    );
}

#[test]
fn test_afternoon_sun_is_west() {
    let dt = Phoenix.with_ymd_and_hms(2025, 9, 1, 16, 0, 0).unwrap();
    let pos = solar_position(33.45, -112.07, &dt);
    assert!(pos.is_daylight());
    assert!(
        pos.azimuth > 180.0 && pos.azimuth < 360.0,
        "azimuth {}",
        pos.azimuth
    );
}

#[test]
fn test_midnight_is_below_horizon() {
    let dt = Phoenix.with_ymd_and_hms(2025, 6, 21, 0, 0, 0).unwrap();
    let pos = solar_position(33.45, -112.07, &dt);
    assert!(!pos.is_daylight());
    assert!(pos.elevation < 0.0);
}

#[test]
fn test_position_ranges_over_latitudes_and_hours() {
    for &(month, day) in &[(3, 1), (6, 21), (12, 21)] {
        for hour in 0..24 {
            let dt = Utc.with_ymd_and_hms(2025, month, day, hour, 0, 0).unwrap();
            for lat in (-60..=60).step_by(10) {
                for &lon in &[-120.0, 0.0, 120.0] {
                    let pos = solar_position(f64::from(lat), lon, &dt);
                    assert!((-90.0..=90.0).contains(&pos.elevation), "{pos:?}");
                    assert!((0.0..360.0).contains(&pos.azimuth), "{pos:?}");
                    assert!((-180.0..180.0).contains(&pos.hour_angle), "{pos:?}");
                    assert!((-23.5..=23.5).contains(&pos.declination), "{pos:?}");
                }
            }
        }
    }
}

#[test]
fn test_poles_stay_finite() {
    let dt = Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
    for lat in [90.0, -90.0] {
        let pos = solar_position(lat, 0.0, &dt);
        assert!(
            pos.elevation.is_finite() && pos.azimuth.is_finite(),
            "{pos:?}"
        );
    }
    // midnight sun at the north pole in June
    assert!(solar_position(90.0, 0.0, &dt).is_daylight());
    assert!(!solar_position(-90.0, 0.0, &dt).is_daylight());
}

#[test]
fn test_elevation_and_azimuth_helpers() {
    assert_abs_diff_eq!(solar_elevation(0.0, 0.0, 0.0), 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(solar_elevation(40.0, 0.0, 0.0), 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(solar_azimuth(40.0, 0.0, 0.0), 180.0, epsilon = 1e-9);
    assert_abs_diff_eq!(solar_azimuth(-40.0, 0.0, 0.0), 0.0, epsilon = 1e-9);
}
