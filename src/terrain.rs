//! Terrain analysis on an elevation raster around the site.

use serde::{Deserialize, Serialize};

use crate::angles::{angular_distance, normalize_angle, rad_to_deg};
use crate::error::{EstimateError, Result};

/// Meters per pixel when the caller does not know the raster resolution.
pub const DEFAULT_RESOLUTION_M: f64 = 30.0;
/// Horizon rays stop after this distance.
pub const MAX_HORIZON_DISTANCE_M: f64 = 1_000.0;
pub const MIN_SHADING_FACTOR: f64 = 0.1;

/// Compass directions as (row step, column step, bearing). Row 0 is the northern edge.
const HORIZON_DIRECTIONS: [(isize, isize, f64); 8] = [
    (-1, 0, 0.0),
    (-1, 1, 45.0),
    (0, 1, 90.0),
    (1, 1, 135.0),
    (1, 0, 180.0),
    (1, -1, 225.0),
    (0, -1, 270.0),
    (-1, -1, 315.0),
];

/// Row-major elevation samples in meters. Every sample is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    samples: Vec<f64>,
}

#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    samples: Vec<f64>,
}

impl TryFrom<RawGrid> for ElevationGrid {
    type Error = EstimateError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        Self::new(raw.rows, raw.cols, raw.samples)
    }
}

impl ElevationGrid {
    pub fn new(rows: usize, cols: usize, samples: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 || samples.len() != rows * cols {
            return Err(EstimateError::InvalidElevationGrid {
                rows,
                cols,
                len: samples.len(),
            });
        }
        if let Some(index) = samples.iter().position(|sample| !sample.is_finite()) {
            return Err(EstimateError::NonFiniteElevation { index });
        }
        Ok(Self {
            rows,
            cols,
            samples,
        })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != n_cols) {
            let len = rows.iter().map(Vec::len).sum();
            return Err(EstimateError::InvalidElevationGrid {
                rows: n_rows,
                cols: n_cols,
                len,
            });
        }
        Self::new(n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.samples[row * self.cols + col])
    }

    fn center(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    fn offset(&self, row: usize, col: usize, d_row: isize, d_col: isize) -> Option<f64> {
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        self.get(row, col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainAnalysis {
    pub latitude: f64,
    pub longitude: f64,
    pub center_elevation: f64,
    /// Degrees from horizontal.
    pub slope: f64,
    /// Downhill bearing in degrees clockwise from north, 0 on flat ground.
    pub aspect: f64,
    /// Distance between the aspect and the equator-facing bearing, `[0, 180]`.
    pub aspect_deviation: f64,
    /// Highest obstruction angle per compass direction, starting north, clockwise.
    pub horizon_angles: [f64; 8],
    pub sky_view_factor: f64,
    pub shading_factor: f64,
}

/// Slope, aspect, horizon and sky view at the centre cell of the raster.
pub fn analyze_terrain_effects(
    grid: &ElevationGrid,
    latitude: f64,
    longitude: f64,
    resolution: f64,
) -> TerrainAnalysis {
    let resolution = if resolution.is_finite() && resolution > 0.0 {
        resolution
    } else {
        DEFAULT_RESOLUTION_M
    };
    let (row, col) = grid.center();
    let center_elevation = grid.samples[row * grid.cols + col];

    let (slope, aspect) = slope_and_aspect(grid, resolution);
    let equator_bearing = if latitude >= 0.0 { 180.0 } else { 0.0 };

    let horizon_angles = HORIZON_DIRECTIONS.map(|(d_row, d_col, _)| {
        horizon_angle(grid, d_row, d_col, resolution)
    });
    let sky_view_factor = horizon_angles
        .iter()
        .map(|angle| angle.to_radians().cos().powi(2))
        .sum::<f64>()
        / horizon_angles.len() as f64;
    let shading_factor = (sky_view_factor * (1.0 - slope / 90.0)).max(MIN_SHADING_FACTOR);

    TerrainAnalysis {
        latitude,
        longitude,
        center_elevation,
        slope,
        aspect,
        aspect_deviation: angular_distance(aspect, equator_bearing),
        horizon_angles,
        sky_view_factor,
        shading_factor,
    }
}

/// Central differences at the centre cell. Grids smaller than 3x3 are treated as flat.
fn slope_and_aspect(grid: &ElevationGrid, resolution: f64) -> (f64, f64) {
    let (row, col) = grid.center();
    let neighbours = (
        grid.offset(row, col, 0, 1),
        grid.offset(row, col, 0, -1),
        grid.offset(row, col, -1, 0),
        grid.offset(row, col, 1, 0),
    );
    let (Some(east), Some(west), Some(north), Some(south)) = neighbours else {
        return (0.0, 0.0);
    };

    let dz_east = (east - west) / (2.0 * resolution);
    let dz_north = (north - south) / (2.0 * resolution);
    let gradient = dz_east.hypot(dz_north);
    if gradient < f64::EPSILON {
        return (0.0, 0.0);
    }
    let slope = rad_to_deg(gradient.atan());
    let aspect = normalize_angle(rad_to_deg((-dz_east).atan2(-dz_north)));
    (slope, aspect)
}

fn horizon_angle(grid: &ElevationGrid, d_row: isize, d_col: isize, resolution: f64) -> f64 {
    let (row, col) = grid.center();
    let origin = grid.samples[row * grid.cols + col];
    let step_length = resolution * ((d_row * d_row + d_col * d_col) as f64).sqrt();
    let max_steps = (MAX_HORIZON_DISTANCE_M / step_length).floor().max(1.0) as isize;

    let mut highest: f64 = 0.0;
    for step in 1..=max_steps {
        let Some(elevation) = grid.offset(row, col, d_row * step, d_col * step) else {
            break;
        };
        let distance = step_length * step as f64;
        highest = highest.max(rad_to_deg(((elevation - origin) / distance).atan()));
    }
    highest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_inside_grid() {
        let grid = ElevationGrid::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.offset(0, 0, -1, 0), None);
        assert_eq!(grid.offset(0, 0, 1, 1), Some(4.0));
        assert_eq!(grid.offset(1, 1, 0, 1), None);
    }

    #[test]
    fn tiny_grid_is_flat() {
        let grid = ElevationGrid::new(1, 1, vec![120.0]).unwrap();
        assert_eq!(slope_and_aspect(&grid, 30.0), (0.0, 0.0));
    }
}
