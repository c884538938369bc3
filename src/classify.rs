use std::collections::BTreeMap;

use geo::Point;
use serde::Serialize;

use crate::config::LayerKey;
use crate::zone::ZoneCollection;

/// Class label of the first zone containing `point`, in collection order.
///
/// Returns `None` when no zone contains the point, or when the containing
/// zone carries no class label (unlabeled zones classify as "no match").
/// Edge inclusion follows `geo::Contains`: boundary points are not contained,
/// and ties between adjacent zones resolve to whichever is tested first.
pub fn classify(point: Point<f64>, collection: &ZoneCollection) -> Option<&str> {
    collection.find_containing(point)?.class_name.as_deref()
}

/// Per-layer class labels found at one queried point.
///
/// Layers with no containing zone are absent. Transient: built per query,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Classification {
    classes: BTreeMap<LayerKey, String>,
}

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: LayerKey, class: impl Into<String>) {
        self.classes.insert(key, class.into());
    }

    /// Class found for `key`, or `None` when no zone of that layer
    /// contained the point.
    pub fn get(&self, key: LayerKey) -> Option<&str> {
        self.classes.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerKey, &str)> {
        self.classes.iter().map(|(key, class)| (*key, class.as_str()))
    }
}

impl FromIterator<(LayerKey, String)> for Classification {
    fn from_iter<I: IntoIterator<Item = (LayerKey, String)>>(iter: I) -> Self {
        Self { classes: iter.into_iter().collect() }
    }
}
