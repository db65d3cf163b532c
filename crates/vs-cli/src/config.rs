//! Optional YAML pipeline config (`--config FILE`).
//!
//! Every field is optional: command-line flags win over the file, the file
//! wins over built-in defaults. The `viz:` section is handed to
//! [`VizConfig::from_yaml_value`] untouched.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use vs_viz_render::config::VizConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub diagnostics: DiagnosticsConfig,
    pub map: MapConfig,
    pub viz: Option<serde_yaml_ng::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    pub target: Option<String>,
    pub features: Option<Vec<String>>,
    pub name: Option<String>,
    pub format: Option<String>,
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Boundary property holding the unit id.
    pub id_property: Option<String>,
    /// Counts CSV columns.
    pub unit_column: Option<String>,
    pub count_column: Option<String>,
    /// Incident CSV columns and filters.
    pub incident_unit_column: Option<String>,
    pub year_column: Option<String>,
    pub year: Option<i64>,
    pub all_years: Option<bool>,
    pub aliases: Option<BTreeMap<String, String>>,
    pub exclude: Option<Vec<String>>,
    pub title: Option<String>,
    pub quantiles: Option<Vec<f64>>,
}

impl PipelineConfig {
    /// Read the file at `path`, or return defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = serde_yaml_ng::from_slice(&bytes)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded pipeline config");
        Ok(cfg)
    }

    /// Rendering config from the `viz:` section (theme preset plus overrides).
    pub fn viz_config(&self) -> Result<VizConfig> {
        match &self.viz {
            Some(v) => Ok(VizConfig::from_yaml_value(v.clone())?),
            None => Ok(VizConfig::default()),
        }
    }
}
