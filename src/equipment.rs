//! Static equipment, roof and location catalogs.
//!
//! Categorical keys coming from forms are parsed leniently: an unknown key resolves to the
//! documented default entry of its catalog and logs a warning. Only the US state table of the
//! basic calculator refuses unknown keys, see [`state_profile`].

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Lowercases and maps spaces and dashes to underscores.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            _ => c.to_ascii_lowercase(),
        })
        .collect()
}

/// A catalog enum keyed by form strings.
pub trait CatalogKey: Default + Copy {
    const KIND: &'static str;

    /// Matches an already normalized key.
    fn parse_key(key: &str) -> Option<Self>;

    /// Resolves a raw key, falling back to the default entry.
    fn from_key(key: &str) -> Self {
        Self::parse_key(&normalize_key(key)).unwrap_or_else(|| {
            warn!(kind = Self::KIND, key, "unknown key, using the default entry");
            Self::default()
        })
    }
}

// ── Panels ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    Monocrystalline,
    Polycrystalline,
    ThinFilm,
    Premium,
    #[default]
    Standard,
    Economy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelSpec {
    pub name: &'static str,
    pub wattage: f64,
    pub efficiency: f64,
    /// Installed $/W before regional adjustment.
    pub cost_per_watt: f64,
    /// Fraction per year.
    pub degradation_rate: f64,
    pub warranty_years: u32,
}

impl PanelType {
    pub const fn spec(self) -> PanelSpec {
        match self {
            Self::Monocrystalline => PanelSpec {
                name: "Monocrystalline",
                wattage: 400.0,
                efficiency: 0.21,
                cost_per_watt: 2.85,
                degradation_rate: 0.005,
                warranty_years: 25,
            },
            Self::Polycrystalline => PanelSpec {
                name: "Polycrystalline",
                wattage: 350.0,
                efficiency: 0.17,
                cost_per_watt: 2.55,
                degradation_rate: 0.006,
                warranty_years: 25,
            },
            Self::ThinFilm => PanelSpec {
                name: "Thin Film",
                wattage: 300.0,
                efficiency: 0.13,
                cost_per_watt: 2.30,
                degradation_rate: 0.006,
                warranty_years: 20,
            },
            Self::Premium => PanelSpec {
                name: "Premium High-Efficiency",
                wattage: 430.0,
                efficiency: 0.225,
                cost_per_watt: 3.20,
                degradation_rate: 0.003,
                warranty_years: 30,
            },
            Self::Standard => PanelSpec {
                name: "Standard",
                wattage: 400.0,
                efficiency: 0.20,
                cost_per_watt: 2.75,
                degradation_rate: 0.005,
                warranty_years: 25,
            },
            Self::Economy => PanelSpec {
                name: "Economy",
                wattage: 370.0,
                efficiency: 0.18,
                cost_per_watt: 2.45,
                degradation_rate: 0.006,
                warranty_years: 20,
            },
        }
    }
}

impl CatalogKey for PanelType {
    const KIND: &'static str = "panel type";

    fn parse_key(key: &str) -> Option<Self> {
        match key {
            "monocrystalline" | "mono" => Some(Self::Monocrystalline),
            "polycrystalline" | "poly" => Some(Self::Polycrystalline),
            "thin_film" | "thinfilm" => Some(Self::ThinFilm),
            "premium" | "high_efficiency" => Some(Self::Premium),
            "standard" => Some(Self::Standard),
            "economy" | "budget" => Some(Self::Economy),
            _ => None,
        }
    }
}

// ── Inverters ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InverterType {
    #[default]
    String,
    Micro,
    PowerOptimizer,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InverterSpec {
    pub name: &'static str,
    pub efficiency: f64,
    pub reliability: f64,
    /// Added to the installed $/W.
    pub cost_per_watt: f64,
    pub warranty_years: u32,
}

impl InverterType {
    pub const fn spec(self) -> InverterSpec {
        match self {
            Self::String => InverterSpec {
                name: "String Inverter",
                efficiency: 0.965,
                reliability: 0.95,
                cost_per_watt: 0.0,
                warranty_years: 12,
            },
            Self::Micro => InverterSpec {
                name: "Microinverters",
                efficiency: 0.965,
                reliability: 0.98,
                cost_per_watt: 0.25,
                warranty_years: 25,
            },
            Self::PowerOptimizer => InverterSpec {
                name: "Power Optimizers",
                efficiency: 0.975,
                reliability: 0.97,
                cost_per_watt: 0.15,
                warranty_years: 25,
            },
        }
    }
}

impl CatalogKey for InverterType {
    const KIND: &'static str = "inverter type";

    fn parse_key(key: &str) -> Option<Self> {
        match key {
            "string" | "string_inverter" | "central" => Some(Self::String),
            "micro" | "microinverter" | "microinverters" => Some(Self::Micro),
            "power_optimizer" | "optimizer" | "optimizers" | "power_optimizers" => {
                Some(Self::PowerOptimizer)
            }
            _ => None,
        }
    }
}

// ── Batteries ──

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatterySpec {
    pub capacity_kwh: f64,
    /// Flat installed price.
    pub installed_cost: f64,
}

impl Default for BatterySpec {
    fn default() -> Self {
        Self {
            capacity_kwh: 13.5,
            installed_cost: 12_000.0,
        }
    }
}

// ── Roofs ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofType {
    #[default]
    AsphaltShingle,
    Tile,
    Metal,
    Flat,
    Slate,
}

impl RoofType {
    /// Multiplier on the installed price for mounting on this roof.
    pub const fn installation_multiplier(self) -> f64 {
        match self {
            Self::AsphaltShingle | Self::Metal => 1.0,
            Self::Flat => 1.10,
            Self::Tile => 1.15,
            Self::Slate => 1.25,
        }
    }
}

impl CatalogKey for RoofType {
    const KIND: &'static str = "roof type";

    fn parse_key(key: &str) -> Option<Self> {
        match key {
            "asphalt" | "asphalt_shingle" | "shingle" | "composition" => Some(Self::AsphaltShingle),
            "tile" | "clay_tile" | "concrete_tile" => Some(Self::Tile),
            "metal" | "standing_seam" => Some(Self::Metal),
            "flat" | "membrane" => Some(Self::Flat),
            "slate" => Some(Self::Slate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofCondition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
    NeedsReplacement,
}

impl RoofCondition {
    pub const fn warning(self) -> Option<&'static str> {
        match self {
            Self::Excellent | Self::Good => None,
            Self::Fair => Some("Roof is in fair condition; inspect it before installation."),
            Self::Poor | Self::NeedsReplacement => {
                Some("Roof needs replacement before installing panels.")
            }
        }
    }
}

impl CatalogKey for RoofCondition {
    const KIND: &'static str = "roof condition";

    fn parse_key(key: &str) -> Option<Self> {
        match key {
            "excellent" | "new" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            "needs_replacement" | "replace" => Some(Self::NeedsReplacement),
            _ => None,
        }
    }
}

// ── Financing ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingKind {
    #[default]
    Cash,
    Loan,
    Lease,
    Ppa,
}

impl CatalogKey for FinancingKind {
    const KIND: &'static str = "financing";

    fn parse_key(key: &str) -> Option<Self> {
        match key {
            "cash" | "purchase" => Some(Self::Cash),
            "loan" | "solar_loan" => Some(Self::Loan),
            "lease" => Some(Self::Lease),
            "ppa" | "power_purchase_agreement" => Some(Self::Ppa),
            _ => None,
        }
    }
}

// ── Locations ──

/// Solar resource and tariff for a US state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateProfile {
    pub code: &'static str,
    pub peak_sun_hours: f64,
    /// Average retail $/kWh.
    pub average_rate: f64,
    /// Regional multiplier on the installed price.
    pub cost_index: f64,
    pub latitude: f64,
    pub longitude: f64,
}

const fn state(
    code: &'static str,
    peak_sun_hours: f64,
    average_rate: f64,
    cost_index: f64,
    latitude: f64,
    longitude: f64,
) -> StateProfile {
    StateProfile {
        code,
        peak_sun_hours,
        average_rate,
        cost_index,
        latitude,
        longitude,
    }
}

pub static STATES: [StateProfile; 51] = [
    state("AL", 4.9, 0.15, 0.95, 32.8, -86.8),
    state("AK", 2.8, 0.24, 1.15, 61.4, -150.0),
    state("AZ", 6.5, 0.14, 0.95, 33.4, -112.1),
    state("AR", 4.9, 0.12, 0.95, 34.8, -92.3),
    state("CA", 5.8, 0.30, 1.10, 36.8, -119.4),
    state("CO", 5.6, 0.15, 1.00, 39.7, -105.0),
    state("CT", 4.1, 0.28, 1.10, 41.6, -72.7),
    state("DE", 4.4, 0.16, 1.00, 39.2, -75.5),
    state("DC", 4.3, 0.17, 1.10, 38.9, -77.0),
    state("FL", 5.4, 0.15, 0.95, 27.8, -81.7),
    state("GA", 5.0, 0.14, 0.95, 33.0, -83.6),
    state("HI", 6.0, 0.43, 1.20, 21.3, -157.8),
    state("ID", 4.9, 0.11, 0.98, 43.6, -116.2),
    state("IL", 4.3, 0.16, 1.00, 40.0, -89.0),
    state("IN", 4.3, 0.15, 0.97, 39.8, -86.2),
    state("IA", 4.5, 0.14, 0.97, 42.0, -93.2),
    state("KS", 5.1, 0.14, 0.97, 38.5, -98.4),
    state("KY", 4.4, 0.13, 0.96, 37.8, -84.9),
    state("LA", 5.0, 0.13, 0.95, 31.1, -92.0),
    state("ME", 4.2, 0.26, 1.05, 45.3, -69.2),
    state("MD", 4.5, 0.17, 1.02, 39.0, -76.6),
    state("MA", 4.2, 0.29, 1.12, 42.2, -71.5),
    state("MI", 4.0, 0.19, 1.00, 43.3, -84.5),
    state("MN", 4.5, 0.15, 1.00, 45.7, -93.9),
    state("MS", 5.0, 0.13, 0.94, 32.7, -89.7),
    state("MO", 4.7, 0.13, 0.97, 38.5, -92.3),
    state("MT", 4.6, 0.13, 1.00, 46.9, -110.5),
    state("NE", 5.0, 0.12, 0.97, 41.1, -98.3),
    state("NV", 6.4, 0.14, 0.97, 38.3, -117.1),
    state("NH", 4.2, 0.25, 1.06, 43.5, -71.6),
    state("NJ", 4.4, 0.19, 1.05, 40.3, -74.5),
    state("NM", 6.4, 0.15, 0.96, 34.8, -106.2),
    state("NY", 4.2, 0.23, 1.10, 42.2, -74.9),
    state("NC", 5.0, 0.13, 0.95, 35.6, -79.8),
    state("ND", 4.6, 0.12, 1.00, 47.5, -99.8),
    state("OH", 4.2, 0.16, 0.98, 40.4, -82.8),
    state("OK", 5.3, 0.13, 0.95, 35.6, -96.9),
    state("OR", 4.3, 0.13, 1.02, 44.6, -122.1),
    state("PA", 4.2, 0.18, 1.02, 40.6, -77.2),
    state("RI", 4.3, 0.29, 1.10, 41.7, -71.5),
    state("SC", 5.1, 0.14, 0.95, 33.9, -80.9),
    state("SD", 4.9, 0.13, 0.98, 44.3, -99.4),
    state("TN", 4.7, 0.12, 0.95, 35.7, -86.7),
    state("TX", 5.3, 0.14, 0.95, 31.1, -97.6),
    state("UT", 5.9, 0.11, 0.98, 40.2, -111.9),
    state("VT", 4.0, 0.21, 1.06, 44.0, -72.7),
    state("VA", 4.7, 0.14, 1.00, 37.8, -78.2),
    state("WA", 3.6, 0.11, 1.02, 47.4, -121.5),
    state("WV", 4.2, 0.14, 0.98, 38.5, -80.9),
    state("WI", 4.3, 0.17, 1.00, 44.3, -89.6),
    state("WY", 5.2, 0.12, 1.00, 42.8, -107.3),
];

/// Looks up a two-letter state code. Unknown codes yield `None`.
pub fn state_profile(code: &str) -> Option<&'static StateProfile> {
    let code = code.trim();
    STATES.iter().find(|profile| profile.code.eq_ignore_ascii_case(code))
}

/// Regional defaults for the pro calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionProfile {
    pub name: &'static str,
    pub peak_sun_hours: f64,
    pub average_rate: f64,
    pub cost_index: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub climate_zone: &'static str,
}

const fn region(
    name: &'static str,
    peak_sun_hours: f64,
    average_rate: f64,
    cost_index: f64,
    latitude: f64,
    longitude: f64,
    climate_zone: &'static str,
) -> RegionProfile {
    RegionProfile {
        name,
        peak_sun_hours,
        average_rate,
        cost_index,
        latitude,
        longitude,
        climate_zone,
    }
}

/// Used for regions missing from [`REGIONS`].
pub static DEFAULT_REGION: RegionProfile =
    region("national_average", 4.5, 0.16, 1.0, 39.8, -98.6, "mixed");

#[rustfmt::skip]
pub static REGIONS: [RegionProfile; 16] = [
    region("arizona", 6.5, 0.14, 0.95, 33.4, -112.1, "hot_dry"),
    region("california", 5.8, 0.30, 1.10, 36.8, -119.4, "warm_marine"),
    region("colorado", 5.6, 0.15, 1.00, 39.7, -105.0, "cold_dry"),
    region("florida", 5.4, 0.15, 0.95, 27.8, -81.7, "hot_humid"),
    region("georgia", 5.0, 0.14, 0.95, 33.0, -83.6, "hot_humid"),
    region("hawaii", 6.0, 0.43, 1.20, 21.3, -157.8, "tropical"),
    region("illinois", 4.3, 0.16, 1.00, 40.0, -89.0, "cold_humid"),
    region("massachusetts", 4.2, 0.29, 1.12, 42.2, -71.5, "cold_humid"),
    region("nevada", 6.4, 0.14, 0.97, 38.3, -117.1, "hot_dry"),
    region("new_jersey", 4.4, 0.19, 1.05, 40.3, -74.5, "mixed_humid"),
    region("new_mexico", 6.4, 0.15, 0.96, 34.8, -106.2, "hot_dry"),
    region("new_york", 4.2, 0.23, 1.10, 42.2, -74.9, "cold_humid"),
    region("north_carolina", 5.0, 0.13, 0.95, 35.6, -79.8, "mixed_humid"),
    region("texas", 5.3, 0.14, 0.95, 31.1, -97.6, "hot_humid"),
    region("utah", 5.9, 0.11, 0.98, 40.2, -111.9, "cold_dry"),
    region("washington", 3.6, 0.11, 1.02, 47.4, -121.5, "marine"),
];

/// Looks up a region by name, falling back to [`DEFAULT_REGION`].
pub fn region_profile(name: &str) -> &'static RegionProfile {
    let key = normalize_key(name);
    REGIONS.iter().find(|profile| profile.name == key).unwrap_or_else(|| {
        warn!(region = name, "unknown region, using national averages");
        &DEFAULT_REGION
    })
}
