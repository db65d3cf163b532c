//! # vs-core
//!
//! Core types for vanstat: the error taxonomy shared by every crate, the
//! column-oriented [`ObservationTable`], and readers that turn CSV/TSV or
//! GeoJSON property tables into it.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types.
pub mod error;
/// Tabular file readers (CSV, TSV, GeoJSON feature properties).
pub mod reader;
/// Column-oriented observation table.
pub mod table;

pub use error::{Error, Result};
pub use table::{Cell, Column, ObservationTable};

/// Crate version, reported by `vanstat version` and embedded in artifacts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
