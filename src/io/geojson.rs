use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Value, json};

use crate::config::LayerConfig;
use crate::zone::{ZoneCollection, ZoneFeature};

/// Read zone features from GeoJSON bytes.
///
/// Accepts `Polygon` and `MultiPolygon` geometries; features with other
/// geometry types or a null geometry are skipped (the thematic layers are
/// choropleths, everything else is a rendering concern). The `class_name`
/// property becomes the feature's class label; remaining properties are
/// carried through untouched.
pub fn read_feature_collection(bytes: &[u8]) -> Result<Vec<ZoneFeature>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("Not a FeatureCollection: missing 'features' array"))?;

    let mut zones = Vec::new();
    for feature in features {
        let Some(geometry) = feature["geometry"].as_object() else { continue };
        let multipolygon = match geometry["type"].as_str() {
            Some("Polygon") => {
                let coords = geometry["coordinates"].as_array()
                    .ok_or_else(|| anyhow!("Polygon geometry without coordinates"))?;
                MultiPolygon::new(vec![parse_polygon_coords(coords)?])
            }
            Some("MultiPolygon") => {
                let coords = geometry["coordinates"].as_array()
                    .ok_or_else(|| anyhow!("MultiPolygon geometry without coordinates"))?;
                parse_multipolygon_coords(coords)?
            }
            _ => continue,
        };

        let mut properties = feature["properties"].as_object().cloned().unwrap_or_default();
        let class_name = match properties.remove("class_name") {
            Some(Value::String(class)) => Some(class),
            _ => None,
        };

        zones.push(ZoneFeature { geometry: multipolygon, class_name, properties });
    }
    Ok(zones)
}

/// Write zone features to GeoJSON bytes (one MultiPolygon feature per zone).
pub fn write_feature_collection(features: &[ZoneFeature]) -> Result<Vec<u8>> {
    let features: Vec<Value> = features.iter().map(|feature| {
        let polygons: Vec<Value> = feature.geometry.0.iter()
            .map(polygon_to_rings)
            .collect();

        let mut properties = feature.properties.clone();
        if let Some(class) = &feature.class_name {
            properties.insert("class_name".into(), Value::String(class.clone()));
        }

        json!({
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": polygons,
            },
            "properties": Value::Object(properties),
        })
    }).collect();

    let feature_collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });

    serde_json::to_vec(&feature_collection).context("Failed to serialize GeoJSON to bytes")
}

/// Load one layer's dataset from disk, degrading to an empty collection on
/// failure so a missing or malformed file never takes the dashboard down.
/// Data-quality gaps (zones whose class is not a configured grade) are
/// logged here rather than silently skipped downstream.
pub fn load_layer(path: &Path, config: &LayerConfig, verbose: u8) -> ZoneCollection {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("[load] {}: {err}; substituting empty collection", path.display());
            return ZoneCollection::default();
        }
    };
    let features = match read_feature_collection(&bytes) {
        Ok(features) => features,
        Err(err) => {
            eprintln!("[load] {}: {err:#}; substituting empty collection", path.display());
            return ZoneCollection::default();
        }
    };

    if verbose > 0 {
        eprintln!("[load] {} <- {} ({} zones)", config.key, path.display(), features.len());
    }

    let unclassified = features.iter()
        .filter(|f| f.class_name.as_deref().is_none_or(|c| config.grade_index(c).is_none()))
        .count();
    if unclassified > 0 {
        eprintln!(
            "[load] {}: {unclassified} zone(s) with a missing or unconfigured class_name \
             (classified as no-match, rendered with the fallback color)",
            config.key,
        );
    }

    ZoneCollection::new(features)
}

/// Serialize one polygon as GeoJSON rings: exterior first, then interiors.
fn polygon_to_rings(polygon: &Polygon<f64>) -> Value {
    let ring = |ls: &LineString<f64>| -> Vec<Vec<f64>> {
        ls.coords().map(|c| vec![c.x, c.y]).collect()
    };
    let mut rings = vec![ring(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring));
    json!(rings)
}

/// Parse GeoJSON Polygon coordinates: first ring exterior, rest interiors.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let exterior = rings.first()
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))?;
    let exterior = parse_ring_coords(exterior)?;

    let mut interiors = Vec::new();
    for ring in &rings[1..] {
        let ring = ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: interior ring is not an array"))?;
        interiors.push(parse_ring_coords(ring)?);
    }

    Ok(Polygon::new(exterior, interiors))
}

/// Parse GeoJSON MultiPolygon coordinates into a geo::MultiPolygon.
fn parse_multipolygon_coords(coords: &[Value]) -> Result<MultiPolygon<f64>> {
    let mut polygons = Vec::new();
    for polygon_coords in coords {
        let rings = polygon_coords.as_array()
            .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))?;
        polygons.push(parse_polygon_coords(rings)?);
    }
    Ok(MultiPolygon::new(polygons))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...]
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for coord_pair in coords {
        let coord_array = coord_pair.as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid coordinate: expected an [x, y] pair"))?;
        let x = coord_array[0].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
        let y = coord_array[1].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Close the ring when the source left it open (GeoJSON wants first == last).
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString::new(points))
}
