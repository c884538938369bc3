use std::collections::HashMap;

use serde_json::{Number, Value};

use crate::classify::classify;
use crate::config::{LayerConfig, LayerKey};
use crate::zone::{ZoneCollection, ZoneFeature};

/// A population-grid cell annotated with its composite opportunity score.
#[derive(Debug, Clone)]
pub struct ScoredCell {
    pub feature: ZoneFeature,
    /// Raw weighted sum of grade indices across the other layers.
    pub opportunity_score: f64,
    /// `(raw - min) / (max - min)` across all cells; 0.5 when the
    /// distribution is degenerate (all raw scores equal).
    pub normalized_score: f64,
}

impl ScoredCell {
    /// Annotate the underlying feature's properties with both scores,
    /// for export to the rendering collaborator.
    pub fn into_feature(self) -> ZoneFeature {
        let mut feature = self.feature;
        feature.properties.insert(
            "opportunity_score".into(),
            Number::from_f64(self.opportunity_score).map_or(Value::Null, Value::Number),
        );
        feature.properties.insert(
            "normalized_score".into(),
            Number::from_f64(self.normalized_score).map_or(Value::Null, Value::Number),
        );
        feature
    }
}

/// Score every cell of the base grid against the other configured layers.
///
/// Per cell: classify its centroid against each non-base layer (in `configs`
/// order, which fixes the floating-point summation order and makes the output
/// reproducible); look the class up in that layer's grade list; invert the
/// grade index when the layer weight is negative, so a higher contribution
/// always means more need; multiply by |weight| and accumulate. Layers with
/// no containing zone, unlabeled zones, and classes outside the configured
/// grades all contribute zero.
pub fn score_opportunity(
    base: &ZoneCollection,
    configs: &[LayerConfig],
    collections: &HashMap<LayerKey, ZoneCollection>,
) -> Vec<ScoredCell> {
    let mut cells: Vec<ScoredCell> = base.features().iter()
        .map(|feature| ScoredCell {
            opportunity_score: raw_score(feature, configs, collections),
            normalized_score: 0.0,
            feature: feature.clone(),
        })
        .collect();

    if cells.is_empty() {
        return cells;
    }

    let min = cells.iter().map(|c| c.opportunity_score).fold(f64::INFINITY, f64::min);
    let max = cells.iter().map(|c| c.opportunity_score).fold(f64::NEG_INFINITY, f64::max);
    for cell in &mut cells {
        cell.normalized_score = if max > min {
            (cell.opportunity_score - min) / (max - min)
        } else {
            0.5
        };
    }

    cells
}

fn raw_score(
    feature: &ZoneFeature,
    configs: &[LayerConfig],
    collections: &HashMap<LayerKey, ZoneCollection>,
) -> f64 {
    let Some(center) = feature.centroid() else { return 0.0 };

    let mut score = 0.0;
    for config in configs {
        if config.key == LayerKey::Pop {
            continue;
        }
        let Some(collection) = collections.get(&config.key) else { continue };
        let Some(class) = classify(center, collection) else { continue };
        let Some(index) = config.grade_index(class) else { continue };

        let graded = if config.weight < 0.0 { config.grades.len() - 1 - index } else { index };
        score += graded as f64 * config.weight.abs();
    }
    score
}
