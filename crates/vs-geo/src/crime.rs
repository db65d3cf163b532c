use std::collections::BTreeMap;
use std::path::Path;

use vs_core::reader::read_records;
use vs_core::{Cell, Error, Result};

/// Crime counts keyed by unit id (neighbourhood name). Ordered for determinism.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeTable {
    counts: BTreeMap<String, u64>,
}

/// How raw incident records are reduced to per-unit counts.
#[derive(Debug, Clone)]
pub struct IncidentFilter {
    /// Column holding the unit id.
    pub unit_column: String,
    /// Column holding the incident year.
    pub year_column: String,
    /// Keep only this year; `None` keeps every year.
    pub year: Option<i64>,
    /// Unit renames applied before counting (source name → boundary name).
    pub aliases: BTreeMap<String, String>,
    /// Units dropped after renaming.
    pub exclude: Vec<String>,
}

impl Default for IncidentFilter {
    fn default() -> Self {
        Self {
            unit_column: "NEIGHBOURHOOD".into(),
            year_column: "YEAR".into(),
            year: Some(2021),
            aliases: BTreeMap::from([
                ("Central Business District".to_string(), "Downtown".to_string()),
                ("Musqueam".to_string(), "Dunbar Southlands".to_string()),
            ]),
            exclude: vec!["Stanley Park".into()],
        }
    }
}

fn column_index(headers: &[String], input: &Path, required: &[&str]) -> Result<Vec<usize>> {
    let missing: Vec<String> = required
        .iter()
        .filter(|r| !headers.iter().any(|h| h == *r))
        .map(|r| r.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns { input: input.display().to_string(), columns: missing });
    }
    Ok(required
        .iter()
        .filter_map(|r| headers.iter().position(|h| h == r))
        .collect())
}

impl CrimeTable {
    /// Build from `(unit, count)` pairs; repeated units are summed.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut counts = BTreeMap::new();
        for (k, v) in pairs {
            *counts.entry(k.into()).or_insert(0) += v;
        }
        Self { counts }
    }

    /// Read a pre-aggregated `unit,count` CSV.
    ///
    /// Counts must be non-negative whole numbers. Repeated units are summed.
    pub fn from_counts_csv(path: &Path, unit_column: &str, count_column: &str) -> Result<Self> {
        let rdr = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let (headers, rows) = read_records(rdr)?;
        let idx = column_index(&headers, path, &[unit_column, count_column])?;
        let (ui, ci) = (idx[0], idx[1]);

        let mut pairs = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let unit = row.get(ui).map(|s| s.trim()).unwrap_or("");
            if unit.is_empty() {
                tracing::warn!(row = line + 1, "skipping count row with empty unit id");
                continue;
            }
            let raw = row.get(ci).map(String::as_str).unwrap_or("");
            let count = match Cell::parse(raw) {
                Cell::Value(v) if v >= 0.0 && v.fract() == 0.0 => v as u64,
                _ => {
                    return Err(Error::Validation(format!(
                        "{}: row {}: '{}' is not a non-negative whole count",
                        path.display(),
                        line + 1,
                        raw
                    )));
                }
            };
            pairs.push((unit.to_string(), count));
        }
        let table = Self::from_pairs(pairs);
        tracing::info!(path = %path.display(), units = table.len(), "loaded crime counts");
        Ok(table)
    }

    /// Count raw incident rows per unit after year filtering, renaming, and exclusion.
    pub fn from_incidents_csv(path: &Path, filter: &IncidentFilter) -> Result<Self> {
        let rdr = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let (headers, rows) = read_records(rdr)?;
        let mut required = vec![filter.unit_column.as_str()];
        if filter.year.is_some() {
            required.push(filter.year_column.as_str());
        }
        let idx = column_index(&headers, path, &required)?;
        let table = Self::from_incident_rows(&rows, idx[0], idx.get(1).copied(), filter);
        tracing::info!(
            path = %path.display(),
            incidents = rows.len(),
            units = table.len(),
            year = ?filter.year,
            "aggregated incidents"
        );
        Ok(table)
    }

    fn from_incident_rows(
        rows: &[Vec<String>],
        unit_idx: usize,
        year_idx: Option<usize>,
        filter: &IncidentFilter,
    ) -> Self {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for row in rows {
            if let (Some(want), Some(yi)) = (filter.year, year_idx) {
                let year = row.get(yi).and_then(|s| s.trim().parse::<f64>().ok());
                if year != Some(want as f64) {
                    continue;
                }
            }
            let Some(raw) = row.get(unit_idx).map(|s| s.trim()).filter(|s| !s.is_empty()) else {
                continue;
            };
            let unit = filter.aliases.get(raw).map(String::as_str).unwrap_or(raw);
            if filter.exclude.iter().any(|e| e == unit) {
                continue;
            }
            *counts.entry(unit.to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Count for a unit, if present.
    pub fn get(&self, unit: &str) -> Option<u64> {
        self.counts.get(unit).copied()
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// `true` when no unit has a count.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Units and counts in ascending unit order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let p = dir.join(name);
        std::fs::File::create(&p).unwrap().write_all(body.as_bytes()).unwrap();
        p
    }

    #[test]
    fn counts_csv_sums_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(dir.path(), "c.csv", "unit_id,crime_count\nA,5\nB,0\nA,2\n");
        let t = CrimeTable::from_counts_csv(&p, "unit_id", "crime_count").unwrap();
        assert_eq!(t.get("A"), Some(7));
        assert_eq!(t.get("B"), Some(0));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn counts_csv_missing_column_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(dir.path(), "c.csv", "unit_id,total\nA,5\n");
        match CrimeTable::from_counts_csv(&p, "unit_id", "crime_count") {
            Err(Error::MissingColumns { columns, .. }) => assert_eq!(columns, vec!["crime_count"]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn counts_csv_rejects_fractional_counts() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(dir.path(), "c.csv", "unit_id,crime_count\nA,2.5\n");
        assert!(CrimeTable::from_counts_csv(&p, "unit_id", "crime_count").is_err());
    }

    #[test]
    fn incidents_are_filtered_renamed_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            dir.path(),
            "crimedata.csv",
            "TYPE,YEAR,NEIGHBOURHOOD\n\
             Theft,2021,Central Business District\n\
             Theft,2021,Downtown\n\
             Theft,2020,Downtown\n\
             Mischief,2021,Stanley Park\n\
             Mischief,2021,Musqueam\n\
             Mischief,2021,\n",
        );
        let t = CrimeTable::from_incidents_csv(&p, &IncidentFilter::default()).unwrap();
        assert_eq!(t.get("Downtown"), Some(2));
        assert_eq!(t.get("Dunbar Southlands"), Some(1));
        assert_eq!(t.get("Stanley Park"), None);
        assert_eq!(t.get("Central Business District"), None);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn incidents_without_year_filter_keep_everything() {
        let rows = vec![
            vec!["A".to_string(), "2020".to_string()],
            vec!["A".to_string(), "2021".to_string()],
        ];
        let filter = IncidentFilter { year: None, ..IncidentFilter::default() };
        let t = CrimeTable::from_incident_rows(&rows, 0, None, &filter);
        assert_eq!(t.get("A"), Some(2));
    }
}
