use chrono::{DateTime, TimeZone, Utc};

use crate::types::SolarPosition;

pub const EARTH_AXIAL_TILT: f64 = 23.439;
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// Julian day of the J2000.0 epoch.
pub const J2000: f64 = 2_451_545.0;
/// Julian day of the Unix epoch.
pub const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

/// Wraps into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Smallest absolute difference between two compass bearings, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_angle(a - b);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

pub fn leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_months(year: i32) -> [u32; 12] {
    [
        31,
        if leap_year(year) { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ]
}

pub fn optimal_fixed_tilt(latitude: f64) -> f64 {
    0.76 * latitude.abs() + 3.1
}

pub fn julian_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> f64 {
    let utc = dt.with_timezone(&Utc);
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
    seconds / 86_400.0 + UNIX_EPOCH_JULIAN_DAY
}

/// Greenwich mean sidereal time in hours for days since J2000.0.
pub fn greenwich_mean_sidereal_time(days_since_j2000: f64) -> f64 {
    (18.697_374_558 + 24.065_709_824_419_08 * days_since_j2000).rem_euclid(24.0)
}

/// Declination and right ascension (degrees) for days since J2000.0.
pub fn equatorial_coordinates(days_since_j2000: f64) -> (f64, f64) {
    let n = days_since_j2000;
    let mean_longitude = normalize_angle(280.460 + 0.985_647_4 * n);
    let mean_anomaly = deg_to_rad(normalize_angle(357.528 + 0.985_600_3 * n));
    // equation of center
    let ecliptic_longitude = deg_to_rad(
        mean_longitude + 1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin(),
    );
    let obliquity = deg_to_rad(EARTH_AXIAL_TILT - 0.000_000_4 * n);

    let declination = (obliquity.sin() * ecliptic_longitude.sin()).clamp(-1.0, 1.0).asin();
    let right_ascension =
        (obliquity.cos() * ecliptic_longitude.sin()).atan2(ecliptic_longitude.cos());
    (rad_to_deg(declination), normalize_angle(rad_to_deg(right_ascension)))
}

pub fn solar_elevation(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);
    let sin_elevation =
        lat_rad.sin() * dec_rad.sin() + lat_rad.cos() * dec_rad.cos() * ha_rad.cos();
    rad_to_deg(sin_elevation.clamp(-1.0, 1.0).asin())
}

pub fn solar_azimuth(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);
    let sin_az = -ha_rad.sin() * dec_rad.cos();
    let cos_az = dec_rad.sin() * lat_rad.cos() - dec_rad.cos() * lat_rad.sin() * ha_rad.cos();
    normalize_angle(rad_to_deg(sin_az.atan2(cos_az)))
}

/// Sun position for a site and instant, from the low-precision Julian-day almanac.
///
/// Never fails: positions are returned for any coordinates, and night is signalled by a
/// non-positive elevation.
pub fn solar_position<Tz: TimeZone>(
    latitude: f64,
    longitude: f64,
    dt: &DateTime<Tz>,
) -> SolarPosition {
    let jd = julian_day(dt);
    let n = jd - J2000;
    let (declination, right_ascension) = equatorial_coordinates(n);

    let local_sidereal_degrees = greenwich_mean_sidereal_time(n) * DEGREES_PER_HOUR + longitude;
    let hour_angle = normalize_angle(local_sidereal_degrees - right_ascension + 180.0) - 180.0;

    let elevation = solar_elevation(latitude, declination, hour_angle);
    SolarPosition {
        julian_day: jd,
        declination,
        right_ascension,
        hour_angle,
        zenith: 90.0 - elevation,
        elevation,
        azimuth: solar_azimuth(latitude, declination, hour_angle),
    }
}
