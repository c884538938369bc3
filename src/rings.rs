use std::panic::{AssertUnwindSafe, catch_unwind};

use geo::{Area, BooleanOps, Buffer, MultiPolygon, Polygon, Rect, RemoveRepeatedPoints};

use crate::zone::{ZoneCollection, ZoneFeature};

pub const HIGH_RISK: &str = "High Risk";
pub const MEDIUM_RISK: &str = "Medium Risk";
pub const LOW_RISK: &str = "Low Risk";

/// Buffer distance around the high-risk zone, in kilometers.
const BUFFER_KM: f64 = 0.5;
/// The area of interest straddles the equator, where one degree of longitude
/// and latitude are both ~111.32 km, so a single scalar conversion holds.
const KM_PER_DEGREE: f64 = 111.32;

/// Slivers below this area (square degrees) count as empty.
const MIN_RING_AREA: f64 = 1e-12;

/// The three flood-risk zones derived from a single high-risk polygon.
///
/// Pairwise disjoint by construction: medium is the buffer minus the
/// high-risk zone, low is the bounding area minus the buffer. Either derived
/// ring may be absent when the geometry degenerates.
#[derive(Debug, Clone)]
pub struct RiskRingSet {
    pub high: ZoneFeature,
    pub medium: Option<ZoneFeature>,
    pub low: Option<ZoneFeature>,
}

impl RiskRingSet {
    /// Flatten into a collection in draw order (low under medium under high).
    pub fn into_collection(self) -> ZoneCollection {
        let mut features = Vec::with_capacity(3);
        if let Some(low) = self.low { features.push(low) }
        if let Some(medium) = self.medium { features.push(medium) }
        features.push(self.high);
        ZoneCollection::new(features)
    }
}

/// Derive medium- and low-risk rings around the first "High Risk" zone.
///
/// Returns `None` when the collection has no labeled high-risk zone with
/// non-empty geometry; that is a defined degraded mode (the store replaces
/// the flood layer with an empty collection), not an error. Geometric
/// failures on degenerate input omit the affected ring and keep whatever
/// else succeeded.
pub fn derive_rings(collection: &ZoneCollection, bounds: Rect<f64>) -> Option<RiskRingSet> {
    let high = collection.features().iter()
        .find(|f| f.class_name.as_deref() == Some(HIGH_RISK) && !f.geometry.0.is_empty())?;

    let (medium, low) = match clean(&high.geometry) {
        Some(cleaned) => {
            let buffered = try_geom(|| cleaned.buffer(BUFFER_KM / KM_PER_DEGREE));
            let medium = buffered.as_ref()
                .and_then(|expanded| try_geom(|| expanded.difference(&cleaned)))
                .and_then(non_empty);
            let area = MultiPolygon::new(vec![bounds.to_polygon()]);
            let low = buffered.as_ref()
                .and_then(|expanded| try_geom(|| area.difference(expanded)))
                .and_then(non_empty);
            (medium, low)
        }
        None => (None, None),
    };

    Some(RiskRingSet {
        high: high.clone(),
        medium: medium.map(|geometry| ZoneFeature::new(geometry, MEDIUM_RISK)),
        low: low.map(|geometry| ZoneFeature::new(geometry, LOW_RISK)),
    })
}

/// Normalize a geometry before buffering: drop repeated vertices, then drop
/// rings too degenerate to buffer (under four coordinates or zero area).
fn clean(geometry: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    let polygons: Vec<Polygon<f64>> = geometry.remove_repeated_points().0
        .into_iter()
        .filter(|polygon| polygon.exterior().0.len() >= 4 && polygon.unsigned_area() > 0.0)
        .collect();

    if polygons.is_empty() { None } else { Some(MultiPolygon::new(polygons)) }
}

/// Run a geometric operation, treating a panic on degenerate input as an
/// absent result so derivation can omit the ring instead of aborting.
fn try_geom<T>(op: impl FnOnce() -> T) -> Option<T> {
    catch_unwind(AssertUnwindSafe(op)).ok()
}

fn non_empty(geometry: MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    (geometry.unsigned_area() > MIN_RING_AREA).then_some(geometry)
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use crate::config::area_of_interest;
    use crate::zone::tests::square;

    use super::*;

    fn flood_collection() -> ZoneCollection {
        ZoneCollection::new(vec![
            ZoneFeature::new(square(36.80, -1.30, 36.90, -1.25), HIGH_RISK),
        ])
    }

    fn intersection_area(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> f64 {
        a.intersection(b).unsigned_area()
    }

    #[test]
    fn missing_high_risk_zone_yields_no_rings() {
        let collection = ZoneCollection::new(vec![
            ZoneFeature::new(square(36.80, -1.30, 36.90, -1.25), MEDIUM_RISK),
        ]);
        assert!(derive_rings(&collection, area_of_interest()).is_none());
        assert!(derive_rings(&ZoneCollection::default(), area_of_interest()).is_none());
    }

    #[test]
    fn rings_are_pairwise_disjoint() {
        let rings = derive_rings(&flood_collection(), area_of_interest()).unwrap();
        let high = &rings.high.geometry;
        let medium = &rings.medium.as_ref().unwrap().geometry;
        let low = &rings.low.as_ref().unwrap().geometry;

        let tolerance = 1e-9;
        assert!(intersection_area(high, medium) < tolerance);
        assert!(intersection_area(high, low) < tolerance);
        assert!(intersection_area(medium, low) < tolerance);
    }

    #[test]
    fn medium_ring_surrounds_the_high_risk_zone() {
        let rings = derive_rings(&flood_collection(), area_of_interest()).unwrap();
        let medium = rings.medium.unwrap();
        assert_eq!(medium.class_name.as_deref(), Some(MEDIUM_RISK));

        // A donut: positive area, strictly outside the high-risk square.
        assert!(medium.geometry.unsigned_area() > 0.0);
        let just_outside = geo::Point::new(36.90 + 0.001, -1.275);
        assert!(geo::Contains::contains(&medium.geometry, &just_outside));
    }

    #[test]
    fn high_risk_feature_passes_through_unchanged() {
        let collection = flood_collection();
        let rings = derive_rings(&collection, area_of_interest()).unwrap();
        assert_eq!(rings.high.class_name.as_deref(), Some(HIGH_RISK));
        assert_eq!(
            rings.high.geometry.unsigned_area(),
            collection.features()[0].geometry.unsigned_area(),
        );
    }

    #[test]
    fn collection_order_is_low_medium_high() {
        let rings = derive_rings(&flood_collection(), area_of_interest()).unwrap();
        let collection = rings.into_collection();
        let labels: Vec<_> = collection.features().iter()
            .map(|f| f.class_name.as_deref().unwrap())
            .collect();
        assert_eq!(labels, vec![LOW_RISK, MEDIUM_RISK, HIGH_RISK]);
    }

    #[test]
    fn rederiving_from_an_enriched_collection_is_stable() {
        let bounds = area_of_interest();
        let first = derive_rings(&flood_collection(), bounds).unwrap().into_collection();
        let second = derive_rings(&first, bounds).unwrap().into_collection();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.features().iter().zip(second.features()) {
            assert_eq!(a.class_name, b.class_name);
            assert!((a.geometry.unsigned_area() - b.geometry.unsigned_area()).abs() < 1e-9);
        }
    }

    #[test]
    fn degenerate_geometry_omits_derived_rings() {
        // A two-point "polygon" has no area and cannot be buffered.
        let degenerate = MultiPolygon::new(vec![Polygon::new(
            geo::LineString::from(vec![
                Coord { x: 36.8, y: -1.3 },
                Coord { x: 36.9, y: -1.3 },
                Coord { x: 36.8, y: -1.3 },
            ]),
            vec![],
        )]);
        let collection = ZoneCollection::new(vec![
            ZoneFeature::new(degenerate, HIGH_RISK),
        ]);

        let rings = derive_rings(&collection, area_of_interest()).unwrap();
        assert!(rings.medium.is_none());
        assert!(rings.low.is_none());
        assert_eq!(rings.into_collection().len(), 1);
    }
}
