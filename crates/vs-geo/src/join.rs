use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vs_core::{Error, Result};

use crate::crime::CrimeTable;
use crate::geojson::{Bounds, FeatureCollection};

/// Crime value attached to a boundary unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrimeValue {
    /// The crime table has a count for this unit (possibly zero).
    Count(u64),
    /// The unit has a boundary but no row in the crime table.
    NoData,
}

impl CrimeValue {
    /// The count, if any.
    pub fn count(self) -> Option<u64> {
        match self {
            CrimeValue::Count(c) => Some(c),
            CrimeValue::NoData => None,
        }
    }
}

/// One boundary unit after the join.
#[derive(Debug, Clone)]
pub struct JoinedUnit {
    /// Unit id taken from the boundary feature.
    pub unit_id: String,
    /// Raw GeoJSON geometry.
    pub geometry: Value,
    /// Joined crime value.
    pub value: CrimeValue,
}

/// What the join matched and what it could not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinReport {
    /// Boundary units that found a count.
    pub matched: usize,
    /// Boundary units with no count (rendered as "no data").
    pub no_data: Vec<String>,
    /// Crime-table units with no boundary (cannot be mapped).
    pub unmatched: Vec<String>,
}

/// Result of [`left_join`].
#[derive(Debug, Clone)]
pub struct JoinedLayer {
    /// Every boundary unit, in boundary file order.
    pub units: Vec<JoinedUnit>,
    /// Match summary.
    pub report: JoinReport,
    /// Extent of all boundaries.
    pub bounds: Option<Bounds>,
}

/// Left-join crime counts onto boundaries by `id_property`.
///
/// Every boundary unit is kept: units without a count get
/// [`CrimeValue::NoData`]. Crime units without a boundary are listed in
/// [`JoinReport::unmatched`] and logged.
pub fn left_join(
    boundaries: &FeatureCollection,
    id_property: &str,
    crimes: &CrimeTable,
) -> Result<JoinedLayer> {
    if !boundaries.features.is_empty()
        && boundaries.features.iter().all(|f| f.property_string(id_property).is_none())
    {
        return Err(Error::MissingColumns {
            input: "boundaries".to_string(),
            columns: vec![id_property.to_string()],
        });
    }

    let mut units = Vec::with_capacity(boundaries.features.len());
    let mut report = JoinReport::default();
    let mut seen = BTreeSet::new();

    for (i, f) in boundaries.features.iter().enumerate() {
        let unit_id = f.property_string(id_property).ok_or_else(|| {
            Error::Validation(format!("boundary feature {i} has no '{id_property}' property"))
        })?;
        let value = match crimes.get(&unit_id) {
            Some(c) => {
                report.matched += 1;
                CrimeValue::Count(c)
            }
            None => {
                report.no_data.push(unit_id.clone());
                CrimeValue::NoData
            }
        };
        seen.insert(unit_id.clone());
        units.push(JoinedUnit {
            unit_id,
            geometry: f.geometry.clone().unwrap_or(Value::Null),
            value,
        });
    }

    report.unmatched =
        crimes.iter().filter(|(u, _)| !seen.contains(*u)).map(|(u, _)| u.to_string()).collect();

    for u in &report.no_data {
        tracing::warn!(unit = %u, "boundary unit has no crime count; rendering as no data");
    }
    for u in &report.unmatched {
        tracing::warn!(unit = %u, "crime unit has no boundary; cannot be mapped");
    }
    tracing::info!(
        matched = report.matched,
        no_data = report.no_data.len(),
        unmatched = report.unmatched.len(),
        "joined crime counts onto boundaries"
    );

    Ok(JoinedLayer { units, report, bounds: boundaries.bounds() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundaries(names: &[&str]) -> FeatureCollection {
        let features: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let x = i as f64;
                serde_json::json!({
                    "type": "Feature",
                    "properties": {"name": n},
                    "geometry": {"type": "Polygon", "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 0.0]]]}
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({"type": "FeatureCollection", "features": features}))
            .unwrap()
    }

    #[test]
    fn absent_units_become_no_data_not_zero() {
        let fc = boundaries(&["A", "B", "C"]);
        let crimes = CrimeTable::from_pairs([("A", 5), ("B", 0)]);
        let layer = left_join(&fc, "name", &crimes).unwrap();
        let values: Vec<CrimeValue> = layer.units.iter().map(|u| u.value).collect();
        assert_eq!(values, vec![CrimeValue::Count(5), CrimeValue::Count(0), CrimeValue::NoData]);
        assert_eq!(layer.report.matched, 2);
        assert_eq!(layer.report.no_data, vec!["C"]);
        assert!(layer.report.unmatched.is_empty());
    }

    #[test]
    fn crime_only_units_are_reported() {
        let fc = boundaries(&["A"]);
        let crimes = CrimeTable::from_pairs([("A", 1), ("Stanley Park", 9)]);
        let layer = left_join(&fc, "name", &crimes).unwrap();
        assert_eq!(layer.units.len(), 1);
        assert_eq!(layer.report.unmatched, vec!["Stanley Park"]);
    }

    #[test]
    fn missing_id_property_is_fatal() {
        let fc = boundaries(&["A", "B"]);
        let crimes = CrimeTable::from_pairs([("A", 1)]);
        match left_join(&fc, "NEIGHBOURHOOD", &crimes) {
            Err(Error::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["NEIGHBOURHOOD"])
            }
            other => panic!("unexpected: {:?}", other.map(|l| l.report)),
        }
    }
}
