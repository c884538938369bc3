//! Dataset IO: GeoJSON reading/writing and resilient layer loading.

pub mod geojson;
