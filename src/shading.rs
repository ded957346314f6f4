//! Roof-level derates: tag-based shading, orientation and tilt.

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::angles::{angular_distance, deg_to_rad};
use crate::equipment::{CatalogKey, RoofCondition, RoofType};
use crate::terrain::TerrainAnalysis;

pub const MAX_OBSTRUCTION_LOSS: f64 = 0.30;
pub const MIN_TILT_FACTOR: f64 = 0.8;

#[derive(Debug, Hash, EnumSetType, Serialize, Deserialize)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "snake_case")]
pub enum Obstruction {
    Trees,
    Chimneys,
    Dormers,
    NearbyBuildings,
}

impl Obstruction {
    pub const fn penalty(self) -> f64 {
        match self {
            Self::Trees => 0.10,
            Self::Chimneys => 0.03,
            Self::Dormers => 0.05,
            Self::NearbyBuildings => 0.12,
        }
    }

    pub fn parse_tag(tag: &str) -> Option<Self> {
        match crate::equipment::normalize_key(tag).as_str() {
            "trees" | "tree" => Some(Self::Trees),
            "chimneys" | "chimney" => Some(Self::Chimneys),
            "dormers" | "dormer" => Some(Self::Dormers),
            "nearby_buildings" | "buildings" | "nearby_building" => Some(Self::NearbyBuildings),
            _ => None,
        }
    }
}

/// Collects known tags, ignoring the rest.
pub fn parse_obstructions<'a>(tags: impl IntoIterator<Item = &'a str>) -> EnumSet<Obstruction> {
    tags.into_iter()
        .filter_map(|tag| {
            let parsed = Obstruction::parse_tag(tag);
            if parsed.is_none() {
                warn!(tag, "ignoring unknown obstruction tag");
            }
            parsed
        })
        .collect()
}

pub fn shading_loss(obstructions: EnumSet<Obstruction>) -> f64 {
    obstructions.iter().map(Obstruction::penalty).sum::<f64>().min(MAX_OBSTRUCTION_LOSS)
}

/// Step loss by deviation of the roof azimuth from true south.
pub fn directional_loss(azimuth: f64) -> f64 {
    match angular_distance(azimuth, 180.0) {
        d if d <= 20.0 => 0.0,
        d if d <= 45.0 => 0.05,
        d if d <= 90.0 => 0.15,
        _ => 0.30,
    }
}

/// Production share kept by a tilt that differs from the latitude.
pub fn tilt_factor(tilt: f64, latitude: f64) -> f64 {
    deg_to_rad(tilt - latitude.abs()).cos().max(MIN_TILT_FACTOR)
}

/// Household shading estimate used by the basic calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingLevel {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
}

impl ShadingLevel {
    pub const fn factor(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Light => 0.95,
            Self::Moderate => 0.85,
            Self::Heavy => 0.70,
        }
    }
}

impl CatalogKey for ShadingLevel {
    const KIND: &'static str = "shading level";

    fn parse_key(key: &str) -> Option<Self> {
        match key {
            "none" | "no" => Some(Self::None),
            "light" | "minimal" | "low" => Some(Self::Light),
            "moderate" | "partial" | "medium" => Some(Self::Moderate),
            "heavy" | "high" | "significant" => Some(Self::Heavy),
            _ => None,
        }
    }
}

/// Which of the two shading strategies produced the shading factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingModel {
    /// Sky view and slope from an elevation grid.
    Terrain,
    /// Fixed penalties per obstruction tag.
    Obstructions,
}

/// Picks the terrain analysis when one exists, the obstruction tags otherwise.
pub fn select_shading(
    obstructions: EnumSet<Obstruction>,
    terrain: Option<&TerrainAnalysis>,
) -> (ShadingModel, f64) {
    match terrain {
        Some(analysis) => (ShadingModel::Terrain, analysis.shading_factor),
        None => (ShadingModel::Obstructions, 1.0 - shading_loss(obstructions)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoofSpec {
    /// Degrees clockwise from north, 180 is south.
    pub azimuth: f64,
    pub tilt: f64,
    pub roof_type: RoofType,
    pub condition: RoofCondition,
    pub obstructions: EnumSet<Obstruction>,
}

impl Default for RoofSpec {
    fn default() -> Self {
        Self {
            azimuth: 180.0,
            tilt: 30.0,
            roof_type: RoofType::default(),
            condition: RoofCondition::default(),
            obstructions: EnumSet::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoofDerates {
    pub shading_model: ShadingModel,
    pub shading_factor: f64,
    pub directional_loss: f64,
    pub tilt_factor: f64,
    pub tilt_orientation_factor: f64,
}

impl RoofSpec {
    pub fn derates(&self, latitude: f64, terrain: Option<&TerrainAnalysis>) -> RoofDerates {
        let (shading_model, shading_factor) = select_shading(self.obstructions, terrain);
        let directional_loss = directional_loss(self.azimuth);
        let tilt_factor = tilt_factor(self.tilt, latitude);
        RoofDerates {
            shading_model,
            shading_factor,
            directional_loss,
            tilt_factor,
            tilt_orientation_factor: (1.0 - directional_loss) * tilt_factor,
        }
    }
}
