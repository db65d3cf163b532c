use serde::{Deserialize, Serialize};
use vs_inference::BoxStats;

use crate::ArtifactMeta;

/// Horizontal boxplot of a single variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxplotArtifact {
    /// Schema tag.
    pub schema_version: String,
    /// Provenance.
    pub meta: ArtifactMeta,
    /// Plot title.
    pub title: String,
    /// Value-axis label.
    pub label: String,
    /// Draw median notches.
    pub notch: bool,
    /// Summary statistics.
    pub stats: BoxStats,
}

impl BoxplotArtifact {
    /// Summarise `values`; `None` when there are no finite values.
    pub fn from_values(values: &[f64], label: &str, title: String, notch: bool) -> Option<Self> {
        Some(Self {
            schema_version: "vanstat_boxplot_v1".to_string(),
            meta: ArtifactMeta::default(),
            title,
            label: label.to_string(),
            notch,
            stats: BoxStats::compute(values)?,
        })
    }
}
