use std::collections::HashMap;

use geo::{Point, Rect};
use serde::Serialize;

use crate::classify::{Classification, classify};
use crate::config::{LayerConfig, LayerKey, area_of_interest, default_configs};
use crate::recommend::PointReport;
use crate::rings::derive_rings;
use crate::score::{ScoredCell, score_opportunity};
use crate::zone::ZoneCollection;

/// Legend metadata for one layer, for the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub grade: &'static str,
    pub color: &'static str,
}

/// Owns all loaded zone datasets and the derived layers built from them.
///
/// The caller owns the store and passes it into each query; there is no
/// global state. Collections are replaced wholesale (initial load, reload),
/// never mutated feature-by-feature, and every query runs to completion
/// synchronously, so no collection changes mid-query.
#[derive(Debug)]
pub struct ZoneStore {
    configs: Vec<LayerConfig>,
    bounds: Rect<f64>,
    collections: HashMap<LayerKey, ZoneCollection>,
    opportunity: Vec<ScoredCell>,
    active: LayerKey,
}

impl ZoneStore {
    pub fn new(configs: Vec<LayerConfig>, bounds: Rect<f64>) -> Self {
        let active = configs.first().map_or(LayerKey::Heat, |c| c.key);
        Self {
            configs,
            bounds,
            collections: HashMap::new(),
            opportunity: Vec::new(),
            active,
        }
    }

    /// A store with the dashboard's layer configuration and analysis area.
    pub fn with_defaults() -> Self {
        Self::new(default_configs(), area_of_interest())
    }

    /// Replace a layer's collection wholesale. Call [`rebuild_derived`]
    /// after the last insert of a load cycle.
    ///
    /// [`rebuild_derived`]: ZoneStore::rebuild_derived
    pub fn insert(&mut self, key: LayerKey, collection: ZoneCollection) {
        self.collections.insert(key, collection);
    }

    #[inline] pub fn configs(&self) -> &[LayerConfig] { &self.configs }

    pub fn config(&self, key: LayerKey) -> Option<&LayerConfig> {
        self.configs.iter().find(|c| c.key == key)
    }

    pub fn collection(&self, key: LayerKey) -> Option<&ZoneCollection> {
        self.collections.get(&key)
    }

    /// Scored population cells from the last [`rebuild_derived`] run.
    ///
    /// [`rebuild_derived`]: ZoneStore::rebuild_derived
    #[inline] pub fn opportunity(&self) -> &[ScoredCell] { &self.opportunity }

    /// Key of the layer currently shown by the UI collaborator.
    #[inline] pub fn active(&self) -> LayerKey { self.active }

    pub fn set_active(&mut self, key: LayerKey) {
        self.active = key;
    }

    /// Legend data (title plus grade/color pairs) for a configured layer.
    pub fn legend(&self, key: LayerKey) -> Option<Legend> {
        let config = self.config(key)?;
        let entries = config.grades.iter().zip(config.colors)
            .map(|(&grade, &color)| LegendEntry { grade, color })
            .collect();
        Some(Legend { title: config.title, entries })
    }

    /// Recompute all derived data from the loaded collections.
    ///
    /// Substitutes the derived risk-ring set for the flood collection and
    /// rescores the opportunity layer. A loaded flood collection with no
    /// high-risk zone is replaced with an empty one: without the anchor
    /// zone there is nothing to grow rings from, and stray pre-labeled
    /// rings must not classify or score. Deterministic in its inputs, so
    /// it is safe to run again after a reload that reuses the same data.
    pub fn rebuild_derived(&mut self) {
        let derived = self.collections.get(&LayerKey::Flood)
            .filter(|flood| !flood.is_empty())
            .map(|flood| match derive_rings(flood, self.bounds) {
                Some(rings) => rings.into_collection(),
                None => ZoneCollection::default(),
            });
        if let Some(derived) = derived {
            self.collections.insert(LayerKey::Flood, derived);
        }

        self.opportunity = match self.collections.get(&LayerKey::Pop) {
            Some(base) => score_opportunity(base, &self.configs, &self.collections),
            None => Vec::new(),
        };
    }

    /// Classify `point` against every configured layer, in config order.
    pub fn classify_point(&self, point: Point<f64>) -> Classification {
        let mut classification = Classification::new();
        for config in &self.configs {
            if let Some(collection) = self.collections.get(&config.key)
                && let Some(class) = classify(point, collection)
            {
                classification.insert(config.key, class);
            }
        }
        classification
    }

    /// Classification plus recommendation for one clicked point.
    pub fn inspect(&self, point: Point<f64>) -> PointReport {
        PointReport::new(self.classify_point(point))
    }
}

#[cfg(test)]
mod tests {
    use crate::rings::{HIGH_RISK, MEDIUM_RISK};
    use crate::zone::{ZoneFeature, tests::square};

    use super::*;

    /// Store with heat/pop/green squares all covering the point (0.5, 0.5).
    fn loaded_store() -> ZoneStore {
        let mut store = ZoneStore::with_defaults();
        store.insert(LayerKey::Heat, ZoneCollection::new(vec![
            ZoneFeature::new(square(0.0, 0.0, 1.0, 1.0), "Hot"),
        ]));
        store.insert(LayerKey::Pop, ZoneCollection::new(vec![
            ZoneFeature::new(square(0.0, 0.0, 1.0, 1.0), "High"),
        ]));
        store.insert(LayerKey::Green, ZoneCollection::new(vec![
            ZoneFeature::new(square(0.0, 0.0, 1.0, 1.0), "Low"),
        ]));
        store
    }

    #[test]
    fn inspect_reports_all_classes_and_the_first_matching_rule() {
        let store = loaded_store();
        let report = store.inspect(Point::new(0.5, 0.5));

        // heat=Hot + pop=High fires rule 1 even though green=Low + pop=High
        // would fire rule 4.
        assert!(report.recommendation.contains("heat mitigation"));
        assert_eq!(report.classification.get(LayerKey::Heat), Some("Hot"));
        assert_eq!(report.classification.get(LayerKey::Pop), Some("High"));
        assert_eq!(report.classification.get(LayerKey::Green), Some("Low"));
        // Unloaded layers are absent, not an error.
        assert_eq!(report.classification.get(LayerKey::Flood), None);
    }

    #[test]
    fn rebuild_derived_enriches_flood_and_scores_opportunity() {
        let mut store = loaded_store();
        store.insert(LayerKey::Flood, ZoneCollection::new(vec![
            ZoneFeature::new(square(36.80, -1.30, 36.90, -1.25), HIGH_RISK),
        ]));
        store.rebuild_derived();

        // One high-risk zone became three rings.
        assert_eq!(store.collection(LayerKey::Flood).unwrap().len(), 3);
        // One pop cell, scored; degenerate distribution normalizes to 0.5.
        assert_eq!(store.opportunity().len(), 1);
        assert_eq!(store.opportunity()[0].normalized_score, 0.5);
        // heat Hot: 2 * 1.5; green Low inverted under negative weight: 2 * 1.5.
        assert_eq!(store.opportunity()[0].opportunity_score, 6.0);
    }

    #[test]
    fn flood_without_a_high_risk_zone_empties_on_rebuild() {
        let mut store = loaded_store();
        store.insert(LayerKey::Pop, ZoneCollection::new(vec![
            ZoneFeature::new(square(36.80, -1.30, 36.90, -1.25), "High"),
        ]));
        store.insert(LayerKey::Flood, ZoneCollection::new(vec![
            ZoneFeature::new(square(36.80, -1.30, 36.90, -1.25), MEDIUM_RISK),
        ]));
        store.rebuild_derived();

        // No anchor zone to grow rings from: the layer is replaced outright,
        // so the stray pre-labeled ring neither classifies nor scores.
        assert!(store.collection(LayerKey::Flood).unwrap().is_empty());
        let point = Point::new(36.85, -1.275);
        assert_eq!(store.classify_point(point).get(LayerKey::Flood), None);
        assert_eq!(store.opportunity()[0].opportunity_score, 0.0);
    }

    #[test]
    fn insert_replaces_a_collection_wholesale() {
        let mut store = loaded_store();
        assert_eq!(store.collection(LayerKey::Heat).unwrap().len(), 1);

        store.insert(LayerKey::Heat, ZoneCollection::default());
        assert!(store.collection(LayerKey::Heat).unwrap().is_empty());
        assert_eq!(store.classify_point(Point::new(0.5, 0.5)).get(LayerKey::Heat), None);
    }

    #[test]
    fn legend_pairs_grades_with_colors() {
        let store = ZoneStore::with_defaults();
        let legend = store.legend(LayerKey::Flood).unwrap();

        assert_eq!(legend.title, "Flood Risk");
        assert_eq!(legend.entries.len(), 3);
        assert_eq!(legend.entries[2].grade, "High Risk");
        assert_eq!(legend.entries[2].color, "#0570b0");
    }

    #[test]
    fn active_layer_tracks_switch_commands() {
        let mut store = ZoneStore::with_defaults();
        assert_eq!(store.active(), LayerKey::Heat);
        store.set_active(LayerKey::Flood);
        assert_eq!(store.active(), LayerKey::Flood);
    }
}
