//! # vs-viz
//!
//! Visualization data artifacts for vanstat.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly structures (flat arrays instead of nested objects) that the
//! renderer consumes and that can be dumped as JSON for inspection.

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};

/// Notched boxplot artifact.
pub mod boxplot;
/// Choropleth map artifact.
pub mod choropleth;
/// Correlation matrix artifact.
pub mod corr;
/// Histogram artifact.
pub mod histogram;
/// Scatter plot with fitted regression line.
pub mod scatter;

pub use boxplot::BoxplotArtifact;
pub use choropleth::{ChoroplethArtifact, ChoroplethUnit};
pub use corr::CorrArtifact;
pub use histogram::HistogramArtifact;
pub use scatter::{FitLine, ScatterFitArtifact};

/// Provenance stamped on every artifact. Deliberately time-free so that
/// identical inputs produce identical outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Producing tool.
    pub tool: String,
    /// Tool version.
    pub tool_version: String,
}

impl Default for ArtifactMeta {
    fn default() -> Self {
        Self { tool: "vanstat".to_string(), tool_version: vs_core::VERSION.to_string() }
    }
}
