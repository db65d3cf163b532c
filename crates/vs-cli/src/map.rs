//! `vanstat map`: crime counts joined onto boundaries, rendered as a Leaflet page.

use std::path::PathBuf;

use anyhow::{Context, Result};
use vs_geo::{CrimeTable, FeatureCollection, IncidentFilter, left_join};
use vs_viz::ChoroplethArtifact;
use vs_viz_render::config::VizConfig;
use vs_viz_render::write_choropleth;

pub const DEFAULT_OUTPUT: &str = "vancouver_crime_map.html";
pub const DEFAULT_ID_PROPERTY: &str = "name";
pub const DEFAULT_UNIT_COLUMN: &str = "unit_id";
pub const DEFAULT_COUNT_COLUMN: &str = "crime_count";
pub const DEFAULT_TITLE: &str = "Vancouver Crime Map";

/// Where the per-unit counts come from.
#[derive(Debug, Clone)]
pub enum CrimeSource {
    /// Pre-aggregated `unit,count` CSV.
    Counts { path: PathBuf, unit_column: String, count_column: String },
    /// Raw incident rows, counted per unit.
    Incidents { path: PathBuf, filter: IncidentFilter },
}

impl CrimeSource {
    fn load(&self) -> Result<CrimeTable> {
        match self {
            CrimeSource::Counts { path, unit_column, count_column } => {
                CrimeTable::from_counts_csv(path, unit_column, count_column)
                    .with_context(|| format!("failed to load counts {}", path.display()))
            }
            CrimeSource::Incidents { path, filter } => CrimeTable::from_incidents_csv(path, filter)
                .with_context(|| format!("failed to load incidents {}", path.display())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapPlan {
    pub boundaries: PathBuf,
    pub source: CrimeSource,
    pub id_property: String,
    pub output: PathBuf,
    pub title: String,
    /// Quantile probabilities for the class breaks.
    pub quantiles: Vec<f64>,
}

/// Load, join, classify, and write the page. Returns the artifact that was rendered.
pub fn run_map(plan: &MapPlan, viz: &VizConfig) -> Result<ChoroplethArtifact> {
    let boundaries = FeatureCollection::from_path(&plan.boundaries)
        .with_context(|| format!("failed to load boundaries {}", plan.boundaries.display()))?;
    let crimes = plan.source.load()?;
    if crimes.is_empty() {
        tracing::warn!("crime table is empty; every unit will show as no data");
    }

    let layer = left_join(&boundaries, &plan.id_property, &crimes)
        .with_context(|| format!("failed to join on '{}'", plan.id_property))?;
    let artifact = ChoroplethArtifact::from_layer(&layer, &plan.quantiles, plan.title.clone());

    if let Some(parent) = plan.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_choropleth(&artifact, &plan.output, viz)
        .with_context(|| format!("failed to write {}", plan.output.display()))?;

    tracing::info!(
        output = %plan.output.display(),
        units = artifact.units.len(),
        bins = artifact.bins.n_bins(),
        unmatched = artifact.unmatched.len(),
        "wrote crime map"
    );
    Ok(artifact)
}
