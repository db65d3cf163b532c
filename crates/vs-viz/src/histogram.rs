use serde::{Deserialize, Serialize};
use vs_inference::histogram;

use crate::ArtifactMeta;

/// Equal-width histogram of a single variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramArtifact {
    /// Schema tag.
    pub schema_version: String,
    /// Provenance.
    pub meta: ArtifactMeta,
    /// Plot title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// `counts.len() + 1` bin edges.
    pub bin_edges: Vec<f64>,
    /// Count per bin.
    pub counts: Vec<usize>,
}

impl HistogramArtifact {
    /// Bin `values`; `None` when there is nothing finite to bin.
    pub fn from_values(values: &[f64], bins: usize, x_label: &str, title: String) -> Option<Self> {
        let h = histogram(values, bins)?;
        Some(Self {
            schema_version: "vanstat_histogram_v1".to_string(),
            meta: ArtifactMeta::default(),
            title,
            x_label: x_label.to_string(),
            bin_edges: h.edges,
            counts: h.counts,
        })
    }
}
