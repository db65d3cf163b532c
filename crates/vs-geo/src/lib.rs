//! # vs-geo
//!
//! Geospatial side of vanstat: GeoJSON boundaries, crime-count tables, the
//! left join between them, and quantile colour classes.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Quantile classification of crime counts.
pub mod binning;
/// Crime-count tables (pre-aggregated or built from incident records).
pub mod crime;
/// Minimal GeoJSON model (Polygon / MultiPolygon features).
pub mod geojson;
/// Left join of crime counts onto boundaries.
pub mod join;

pub use binning::{CountClass, DEFAULT_QUANTILES, QuantileBins};
pub use crime::{CrimeTable, IncidentFilter};
pub use geojson::{Bounds, Feature, FeatureCollection};
pub use join::{CrimeValue, JoinReport, JoinedLayer, JoinedUnit, left_join};
