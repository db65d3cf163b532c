//! Choropleth artifact: joined units, their classes, and legend breaks.
//!
//! Units stay in boundary-file order and carry their raw geometry, so the
//! HTML renderer can embed them as a GeoJSON layer without further lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use vs_geo::{Bounds, CountClass, JoinedLayer, QuantileBins};

use crate::ArtifactMeta;

/// One mapped unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoroplethUnit {
    /// Unit id (neighbourhood name).
    pub unit_id: String,
    /// Crime count; `None` means no data.
    pub count: Option<u64>,
    /// Colour class.
    pub class: CountClass,
    /// Raw GeoJSON geometry.
    pub geometry: Value,
}

/// Everything needed to draw the map and its legend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoroplethArtifact {
    /// Schema tag.
    pub schema_version: String,
    /// Provenance.
    pub meta: ArtifactMeta,
    /// Page title.
    pub title: String,
    /// Legend caption.
    pub legend_name: String,
    /// Tooltip label for the unit id.
    pub id_alias: String,
    /// Tooltip label for the count.
    pub count_alias: String,
    /// Extent of all boundaries.
    pub bounds: Option<Bounds>,
    /// Class breaks in `ln(count)` space.
    pub bins: QuantileBins,
    /// Mapped units in boundary order.
    pub units: Vec<ChoroplethUnit>,
    /// Crime units with no boundary.
    pub unmatched: Vec<String>,
}

impl ChoroplethArtifact {
    /// Classify every joined unit. Breaks are computed over matched counts only.
    pub fn from_layer(layer: &JoinedLayer, probs: &[f64], title: String) -> Self {
        let bins =
            QuantileBins::from_counts(layer.units.iter().filter_map(|u| u.value.count()), probs);
        let units = layer
            .units
            .iter()
            .map(|u| ChoroplethUnit {
                unit_id: u.unit_id.clone(),
                count: u.value.count(),
                class: bins.classify(u.value),
                geometry: u.geometry.clone(),
            })
            .collect();
        Self {
            schema_version: "vanstat_choropleth_v1".to_string(),
            meta: ArtifactMeta::default(),
            title,
            legend_name: "Log Scaled Crime Count".to_string(),
            id_alias: "Neighbourhood".to_string(),
            count_alias: "Crime Count".to_string(),
            bounds: layer.bounds,
            bins,
            units,
            unmatched: layer.report.unmatched.clone(),
        }
    }

    /// Units with no crime count.
    pub fn no_data(&self) -> impl Iterator<Item = &ChoroplethUnit> {
        self.units.iter().filter(|u| u.class == CountClass::NoData)
    }

    /// Human-readable label per positive bin, in count space.
    pub fn bin_labels(&self) -> Vec<String> {
        let b = self.bins.count_breaks();
        match b.len() {
            0 => Vec::new(),
            1 => vec![format!("{:.0}", b[0])],
            _ => b.windows(2).map(|w| format!("{:.0} – {:.0}", w[0], w[1])).collect(),
        }
    }

    /// GeoJSON FeatureCollection with `unit_id`, `count`, and `class` properties.
    /// `count` is the string `"no data"` for unmatched boundary units.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .units
            .iter()
            .map(|u| {
                let mut props = Map::new();
                props.insert("unit_id".into(), Value::String(u.unit_id.clone()));
                props.insert(
                    "count".into(),
                    match u.count {
                        Some(c) => json!(c),
                        None => Value::String("no data".into()),
                    },
                );
                props.insert("class".into(), Value::String(class_key(u.class)));
                json!({"type": "Feature", "properties": props, "geometry": u.geometry})
            })
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }
}

/// Stable string key for a class (`"no_data"`, `"zero"`, `"bin_3"`).
pub fn class_key(class: CountClass) -> String {
    match class {
        CountClass::NoData => "no_data".to_string(),
        CountClass::Zero => "zero".to_string(),
        CountClass::Bin(i) => format!("bin_{i}"),
    }
}
