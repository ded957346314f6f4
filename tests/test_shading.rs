use approx::assert_abs_diff_eq;
use enumset::EnumSet;

use solar_estimator::equipment::{CatalogKey, RoofCondition, RoofType};
use solar_estimator::shading::*;
use solar_estimator::terrain::{analyze_terrain_effects, ElevationGrid};

// ── Obstructions ──

#[test]
fn test_parse_obstructions_skips_unknown_tags() {
    let parsed = parse_obstructions(["Trees", "nearby buildings", "antenna", "tree"]);
    assert_eq!(parsed, Obstruction::Trees | Obstruction::NearbyBuildings);
}

#[test]
fn test_shading_loss_adds_penalties() {
    assert_eq!(shading_loss(EnumSet::empty()), 0.0);
    assert_abs_diff_eq!(
        shading_loss(Obstruction::Trees | Obstruction::Chimneys),
        0.13,
        epsilon = 1e-12
    );
}

#[test]
fn test_shading_loss_is_capped() {
    assert!(shading_loss(EnumSet::all()) <= MAX_OBSTRUCTION_LOSS);
    assert_abs_diff_eq!(
        shading_loss(EnumSet::all()),
        MAX_OBSTRUCTION_LOSS,
        epsilon = 1e-12
    );
}

#[test]
fn test_obstructions_serialize_as_list() {
    let set = Obstruction::Dormers | Obstruction::Trees;
    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"["trees","dormers"]"#);
    let back: EnumSet<Obstruction> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
}

// ── Orientation ──

#[test]
fn test_directional_loss_steps() {
    let cases: &[(f64, f64)] = &[
        (180.0, 0.0),
        (160.0, 0.0),
        (200.0, 0.0),
        (225.0, 0.05),
        (135.0, 0.05),
        (270.0, 0.15),
        (90.0, 0.15),
        (0.0, 0.30),
        (-10.0, 0.30),
    ];
    for &(azimuth, expected) in cases {
        assert_eq!(directional_loss(azimuth), expected, "azimuth {azimuth}");
    }
}

#[test]
fn test_tilt_factor_bounds() {
    assert_abs_diff_eq!(tilt_factor(35.0, 35.0), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(tilt_factor(35.0, -35.0), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        tilt_factor(25.0, 35.0),
        10f64.to_radians().cos(),
        epsilon = 1e-12
    );
    assert_eq!(tilt_factor(90.0, 10.0), MIN_TILT_FACTOR);
}

// ── ShadingLevel ──

#[test]
fn test_shading_level_keys() {
    assert_eq!(ShadingLevel::from_key("Moderate"), ShadingLevel::Moderate);
    assert_eq!(ShadingLevel::from_key(" heavy "), ShadingLevel::Heavy);
    assert_eq!(ShadingLevel::from_key("partly cloudy"), ShadingLevel::None);
    assert_eq!(ShadingLevel::Heavy.factor(), 0.70);
}

// ── Selection ──

#[test]
fn test_terrain_takes_precedence() {
    let grid = ElevationGrid::new(3, 3, vec![10.0; 9]).unwrap();
    let terrain = analyze_terrain_effects(&grid, 40.0, -105.0, 30.0);
    let (model, factor) = select_shading(EnumSet::all(), Some(&terrain));
    assert_eq!(model, ShadingModel::Terrain);
    assert_eq!(factor, terrain.shading_factor);

    let (model, factor) = select_shading(Obstruction::Trees.into(), None);
    assert_eq!(model, ShadingModel::Obstructions);
    assert_abs_diff_eq!(factor, 0.9, epsilon = 1e-12);
}

#[test]
fn test_roof_derates_combine() {
    let roof = RoofSpec {
        azimuth: 240.0,
        tilt: 30.0,
        roof_type: RoofType::from_key("tile"),
        condition: RoofCondition::Good,
        obstructions: Obstruction::Chimneys.into(),
    };
    let derates = roof.derates(30.0, None);
    assert_eq!(derates.shading_model, ShadingModel::Obstructions);
    assert_abs_diff_eq!(derates.shading_factor, 0.97, epsilon = 1e-12);
    assert_eq!(derates.directional_loss, 0.15);
    assert_abs_diff_eq!(derates.tilt_factor, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(derates.tilt_orientation_factor, 0.85, epsilon = 1e-12);
}

#[test]
fn test_default_roof_faces_south() {
    let roof = RoofSpec::default();
    assert_eq!(roof.azimuth, 180.0);
    assert!(roof.obstructions.is_empty());
    assert_eq!(roof.derates(30.0, None).tilt_orientation_factor, 1.0);
}
