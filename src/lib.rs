#![doc = "Zoneatlas public API"]
pub mod cli;
pub mod commands;
mod classify;
mod config;
mod io;
mod recommend;
mod rings;
mod score;
mod store;
mod zone;

#[doc(inline)]
pub use config::{LayerConfig, LayerKey, UNCLASSIFIED_COLOR, area_of_interest, default_configs};

#[doc(inline)]
pub use zone::{ZoneCollection, ZoneFeature};

#[doc(inline)]
pub use classify::{Classification, classify};

#[doc(inline)]
pub use rings::{RiskRingSet, derive_rings};

#[doc(inline)]
pub use score::{ScoredCell, score_opportunity};

#[doc(inline)]
pub use recommend::{DEFAULT_RULES, NO_RECOMMENDATION, PointReport, Rule, recommend};

#[doc(inline)]
pub use store::{Legend, LegendEntry, ZoneStore};

#[doc(inline)]
pub use io::geojson::{load_layer, read_feature_collection, write_feature_collection};
