use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::table::{Cell, Column, ObservationTable};
use crate::{Error, Result};

/// Read a CSV/TSV file or a GeoJSON FeatureCollection into an [`ObservationTable`].
///
/// The format is inferred from the extension: `.csv`/`.txt` (comma), `.tsv`
/// (tab), `.geojson`/`.json` (feature properties become columns).
pub fn read_table(path: &Path) -> Result<ObservationTable> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
    match ext.as_str() {
        "csv" | "txt" => read_delimited(path, b','),
        "tsv" => read_delimited(path, b'\t'),
        "geojson" | "json" => {
            let text = std::fs::read_to_string(path)?;
            properties_table(&serde_json::from_str(&text)?)
        }
        _ => Err(Error::Validation(format!(
            "{}: unsupported file extension '.{ext}' (expected .csv, .tsv, or .geojson)",
            path.display()
        ))),
    }
}

/// Read a delimited text file with a header row.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<ObservationTable> {
    let rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let (headers, rows) = read_records(rdr)?;
    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read table"
    );
    ObservationTable::from_records(headers, rows)
}

/// Headers and raw string rows from any CSV reader.
pub fn read_records<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.is_empty() {
        return Err(Error::Validation("CSV file has no columns".to_string()));
    }
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

/// Turn the `properties` objects of a GeoJSON FeatureCollection into a table.
///
/// Columns are the union of property keys, in sorted order.
pub fn properties_table(doc: &Value) -> Result<ObservationTable> {
    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Validation("GeoJSON document has no 'features' array".into()))?;

    let keys: BTreeSet<&str> = features
        .iter()
        .filter_map(|f| f.get("properties").and_then(Value::as_object))
        .flat_map(|p| p.keys().map(String::as_str))
        .collect();
    if keys.is_empty() {
        return Err(Error::Validation("GeoJSON features carry no properties".into()));
    }

    let columns = keys
        .into_iter()
        .map(|key| {
            let cells = features.iter().map(|f| {
                match f.get("properties").and_then(|p| p.get(key)) {
                    None | Some(Value::Null) => Cell::Missing,
                    Some(Value::Number(n)) => match n.as_f64() {
                        Some(v) if v.is_finite() => Cell::Value(v),
                        _ => Cell::Missing,
                    },
                    Some(Value::String(s)) => Cell::parse(s),
                    Some(_) => Cell::Text,
                }
            });
            Column::from_cells(key, cells)
        })
        .collect();
    ObservationTable::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_csv_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("census.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "crime_rate,income").unwrap();
        writeln!(f, "10,1").unwrap();
        writeln!(f, "20,2").unwrap();
        drop(f);

        let t = read_table(&path).unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.column("income").unwrap().values, vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = read_table(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }

    #[test]
    fn geojson_properties_become_columns() {
        let doc = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"crime_rate": 10.0, "name": "A"}, "geometry": null},
                {"type": "Feature", "properties": {"crime_rate": null, "pop_density": "3.5"}, "geometry": null}
            ]
        });
        let t = properties_table(&doc).unwrap();
        let names: Vec<&str> = t.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["crime_rate", "name", "pop_density"]);
        assert_eq!(t.column("crime_rate").unwrap().values, vec![Some(10.0), None]);
        assert_eq!(t.column("pop_density").unwrap().values, vec![None, Some(3.5)]);
        assert_eq!(t.column("name").unwrap().non_numeric, 1);
    }
}
