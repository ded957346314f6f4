//! Clear-sky irradiance from a sun position and plane-of-array projection.

use crate::angles::deg_to_rad;
use crate::types::{SolarIrradiance, SolarPosition};

/// W/m² at the top of the atmosphere.
pub const SOLAR_CONSTANT: f64 = 1367.0;
pub const DEFAULT_TRANSMITTANCE: f64 = 0.75;
pub const DEFAULT_CLOUD_COVER: f64 = 0.2;

/// Share of the attenuated beam that reaches the ground as sky diffuse.
const DIFFUSE_SCATTER_FRACTION: f64 = 0.3;

/// Irradiance for a sun position.
///
/// The beam is the solar constant attenuated by `transmittance` raised to the air mass
/// (`1 / sin(elevation)`) and by the cloud fraction. Diffuse light ignores air mass. At or below
/// the horizon all components are zero.
pub fn irradiance(
    position: &SolarPosition,
    transmittance: f64,
    cloud_cover: f64,
) -> SolarIrradiance {
    if !position.is_daylight() {
        return SolarIrradiance::default();
    }
    let transmittance = transmittance.clamp(0.0, 1.0);
    let cloud_cover = cloud_cover.clamp(0.0, 1.0);
    let sin_elevation = deg_to_rad(position.elevation).sin();

    let air_mass = 1.0 / sin_elevation;
    let direct = (SOLAR_CONSTANT * transmittance.powf(air_mass) * (1.0 - cloud_cover)).max(0.0);
    let scattered = SOLAR_CONSTANT * DIFFUSE_SCATTER_FRACTION * (1.0 - transmittance);
    let diffuse = (scattered * sin_elevation).max(0.0);

    SolarIrradiance {
        direct,
        diffuse,
        global: direct + diffuse,
    }
}

pub fn clear_sky(position: &SolarPosition) -> SolarIrradiance {
    irradiance(position, DEFAULT_TRANSMITTANCE, DEFAULT_CLOUD_COVER)
}

/// Cosine of the angle between the sun and the normal of a tilted plane, floored at zero.
pub fn incidence_cosine(position: &SolarPosition, tilt: f64, azimuth: f64) -> f64 {
    let elevation = deg_to_rad(position.elevation);
    let tilt = deg_to_rad(tilt);
    let relative_azimuth = deg_to_rad(position.azimuth - azimuth);
    (elevation.sin() * tilt.cos() + elevation.cos() * tilt.sin() * relative_azimuth.cos()).max(0.0)
}

/// Irradiance landing on a plane with the given tilt and azimuth, in W/m².
pub fn plane_of_array(
    position: &SolarPosition,
    irradiance: &SolarIrradiance,
    tilt: f64,
    azimuth: f64,
) -> f64 {
    let sky_view = (1.0 + deg_to_rad(tilt).cos()) / 2.0;
    irradiance.direct * incidence_cosine(position, tilt, azimuth) + irradiance.diffuse * sky_view
}
