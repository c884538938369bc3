use std::{fmt, str::FromStr};

use anyhow::{bail, Error, Result};
use geo::{Coord, Rect};
use serde::Serialize;

/// Fill color used for features whose class is not in the configured grades.
pub const UNCLASSIFIED_COLOR: &str = "#808080";

/// Key identifying one thematic zone layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKey {
    Heat,      // Land-surface temperature
    Green,     // Vegetation cover (NDVI)
    Air,       // NO2 column density
    Pop,       // Population density; also the scoring base grid
    LandUse,   // Dominant land-use class
    Activity,  // Nighttime lights
    Flood,     // Flood risk (enriched with derived rings)
}

impl LayerKey {
    /// All layer keys, in the fixed order used for classification and
    /// scoring. Scoring accumulates in this order, so it is part of the
    /// determinism contract.
    pub const ALL: [LayerKey; 7] = [
        LayerKey::Heat,
        LayerKey::Green,
        LayerKey::Air,
        LayerKey::Pop,
        LayerKey::LandUse,
        LayerKey::Activity,
        LayerKey::Flood,
    ];

    /// Short key used in source names, CLI arguments, and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKey::Heat => "heat",
            LayerKey::Green => "green",
            LayerKey::Air => "air",
            LayerKey::Pop => "pop",
            LayerKey::LandUse => "landuse",
            LayerKey::Activity => "activity",
            LayerKey::Flood => "flood",
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "heat" => Ok(LayerKey::Heat),
            "green" => Ok(LayerKey::Green),
            "air" => Ok(LayerKey::Air),
            "pop" => Ok(LayerKey::Pop),
            "landuse" => Ok(LayerKey::LandUse),
            "activity" => Ok(LayerKey::Activity),
            "flood" => Ok(LayerKey::Flood),
            _ => bail!("unknown layer key: {s}"),
        }
    }
}

/// Static configuration for one thematic layer.
#[derive(Debug, Clone)]
pub struct LayerConfig {
    pub key: LayerKey,
    pub title: &'static str,
    /// Discrete class labels, lowest-to-highest (or categorical).
    pub grades: &'static [&'static str],
    /// Display colors, same length and order as `grades`.
    pub colors: &'static [&'static str],
    /// Scoring weight. Negative means a higher grade index is desirable,
    /// so the scorer inverts the index before weighting.
    pub weight: f64,
    /// Name of the GeoJSON resource this layer is loaded from.
    pub source: &'static str,
}

impl LayerConfig {
    /// Position of `class` in the grade list, if configured.
    pub fn grade_index(&self, class: &str) -> Option<usize> {
        self.grades.iter().position(|g| *g == class)
    }
}

/// Layer configurations for the dashboard, in scoring order.
pub fn default_configs() -> Vec<LayerConfig> {
    vec![
        LayerConfig {
            key: LayerKey::Heat,
            title: "Urban Heat",
            grades: &["Cool", "Warm", "Hot"],
            colors: &["#ffeda0", "#feb24c", "#f03b20"],
            weight: 1.5,
            source: "heat_zones.geojson",
        },
        LayerConfig {
            key: LayerKey::Green,
            title: "Green Cover",
            grades: &["Low", "Medium", "High"],
            colors: &["#edf8e9", "#74c476", "#006d2c"],
            weight: -1.5,
            source: "ndvi_zones.geojson",
        },
        LayerConfig {
            key: LayerKey::Air,
            title: "Air Quality (NO2)",
            grades: &["Low", "Medium", "High"],
            colors: &["#efedf5", "#bcbddc", "#756bb1"],
            weight: 1.0,
            source: "no2_zones.geojson",
        },
        LayerConfig {
            key: LayerKey::Pop,
            title: "Population Density",
            grades: &["Low", "Medium", "High"],
            colors: &["#eff3ff", "#6baed6", "#08519c"],
            weight: 1.2,
            source: "pop_zones.geojson",
        },
        LayerConfig {
            key: LayerKey::LandUse,
            title: "Land Use",
            grades: &["Trees", "Crops", "Built-up"],
            colors: &["#33a02c", "#b2df8a", "#d6616b"],
            weight: 0.8,
            source: "landuse_zones.geojson",
        },
        LayerConfig {
            key: LayerKey::Activity,
            title: "Nighttime Activity",
            grades: &["Low", "Medium", "High"],
            colors: &["#ffffd4", "#fed98e", "#d95f0e"],
            weight: 1.0,
            source: "activity_zones.geojson",
        },
        LayerConfig {
            key: LayerKey::Flood,
            title: "Flood Risk",
            grades: &["Low Risk", "Medium Risk", "High Risk"],
            colors: &["#a6bddb", "#74a9cf", "#0570b0"],
            weight: 1.8,
            source: "flood_zones.geojson",
        },
    ]
}

/// Fixed bounding rectangle of the analysis area (lon/lat).
pub fn area_of_interest() -> Rect<f64> {
    Rect::new(Coord { x: 36.65, y: -1.45 }, Coord { x: 37.1, y: -1.15 })
}
