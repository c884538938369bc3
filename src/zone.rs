use geo::{BoundingRect, Centroid, Contains, MultiPolygon, Point, Rect};
use rstar::{AABB, RTree, RTreeObject};
use serde_json::{Map, Value};

/// One zone: a (multi-)polygon tagged with a discrete class label.
///
/// Immutable after load; derived layers (risk rings, scored cells) are built
/// as new features rather than by mutating loaded ones.
#[derive(Debug, Clone)]
pub struct ZoneFeature {
    pub geometry: MultiPolygon<f64>,
    /// The layer grade this zone belongs to, from the `class_name` property.
    /// `None` when the source feature carried no label.
    pub class_name: Option<String>,
    /// Remaining source properties, preserved verbatim for rendering.
    pub properties: Map<String, Value>,
}

impl ZoneFeature {
    pub fn new(geometry: MultiPolygon<f64>, class_name: impl Into<String>) -> Self {
        Self { geometry, class_name: Some(class_name.into()), properties: Map::new() }
    }

    /// Centroid of the zone's geometry, if the geometry is non-degenerate.
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.geometry.centroid()
    }
}

/// A bounding box in an R-tree, associated with a ZoneFeature by index.
#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// An ordered collection of zones for one layer.
///
/// Iteration order is the source order, which decides ties when a point sits
/// on a shared boundary (first containing feature wins). The R-tree is a
/// bounding-box prefilter only; candidates are still tested in source order.
#[derive(Debug, Clone, Default)]
pub struct ZoneCollection {
    features: Vec<ZoneFeature>,
    rtree: RTree<BoundingBox>,
}

impl ZoneCollection {
    pub fn new(features: Vec<ZoneFeature>) -> Self {
        let boxes = features.iter().enumerate()
            .filter_map(|(idx, feature)| {
                feature.geometry.bounding_rect().map(|bbox| BoundingBox { idx, bbox })
            })
            .collect();
        Self { features, rtree: RTree::bulk_load(boxes) }
    }

    /// Number of zones.
    #[inline] pub fn len(&self) -> usize { self.features.len() }

    /// Check if the collection has no zones.
    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// Get a reference to the list of zones, in source order.
    #[inline] pub fn features(&self) -> &[ZoneFeature] { &self.features }

    /// First zone in source order whose geometry contains `point`.
    ///
    /// Linear in the number of candidate zones; collections here are tens of
    /// polygons, so no finer spatial index is warranted.
    pub fn find_containing(&self, point: Point<f64>) -> Option<&ZoneFeature> {
        let envelope = AABB::from_point([point.x(), point.y()]);
        let mut candidates: Vec<usize> = self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|b| b.idx)
            .collect();
        candidates.sort_unstable();

        candidates.into_iter()
            .map(|idx| &self.features[idx])
            .find(|feature| feature.geometry.contains(&point))
    }
}
