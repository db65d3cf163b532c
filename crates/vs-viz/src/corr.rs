//! Correlation matrix artifact (numbers-first).

use serde::{Deserialize, Serialize};
use vs_core::ObservationTable;
use vs_inference::{LogTarget, correlation_matrix};

use crate::ArtifactMeta;

/// Pairwise-complete Pearson correlations of the log target and features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrArtifact {
    /// Schema tag.
    pub schema_version: String,
    /// Provenance.
    pub meta: ArtifactMeta,
    /// Plot title.
    pub title: String,
    /// Variable names; row/column order of `corr`.
    pub names: Vec<String>,
    /// Correlations; `None` where undefined (constant column, < 2 pairs).
    pub corr: Vec<Vec<Option<f64>>>,
    /// Show only the strict lower triangle.
    pub lower_triangle: bool,
}

impl CorrArtifact {
    /// Correlate `target` with every named feature column present in `table`.
    pub fn from_table(
        table: &ObservationTable,
        target: &LogTarget,
        features: &[String],
        title: String,
    ) -> Self {
        let mut names = vec![target.name.clone()];
        let mut cols: Vec<&[Option<f64>]> = vec![&target.values];
        for f in features {
            if let Some(c) = table.column(f) {
                names.push(f.clone());
                cols.push(&c.values);
            }
        }
        Self {
            schema_version: "vanstat_corr_v1".to_string(),
            meta: ArtifactMeta::default(),
            title,
            names,
            corr: correlation_matrix(&cols),
            lower_triangle: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_core::Column;

    #[test]
    fn target_first_then_features() {
        let table = ObservationTable::from_columns(vec![
            Column::from_values("crime_rate", &[10.0, 20.0, 40.0]),
            Column::from_values("income", &[1.0, 2.0, 4.0]),
        ])
        .unwrap();
        let target = LogTarget::from_column(table.column("crime_rate").unwrap());
        let art = CorrArtifact::from_table(
            &table,
            &target,
            &["income".to_string(), "absent".to_string()],
            "c".into(),
        );
        assert_eq!(art.names, vec!["log_crime_rate", "income"]);
        assert_eq!(art.corr.len(), 2);
        assert!(art.corr[1][0].unwrap() > 0.9);
    }
}
