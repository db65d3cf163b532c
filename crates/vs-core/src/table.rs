//! Column-oriented observation table.
//!
//! One row per geographic unit, one [`Column`] per variable. Cells are kept as
//! `Option<f64>` so that per-comparison (pairwise) deletion can be done by the
//! consumer instead of dropping whole rows up front.

use std::collections::HashSet;

use crate::{Error, Result};

/// A single parsed cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Finite numeric value.
    Value(f64),
    /// Empty, `NA`, `NaN`, `null`, or non-finite.
    Missing,
    /// Text that does not parse as a number.
    Text,
}

impl Cell {
    /// Parse a raw string cell.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Missing;
        }
        match s.to_ascii_lowercase().as_str() {
            "na" | "n/a" | "nan" | "null" | "none" => return Cell::Missing,
            _ => {}
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Value(v),
            Ok(_) => Cell::Missing,
            Err(_) => Cell::Text,
        }
    }
}

/// A named numeric column.
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header.
    pub name: String,
    /// Row-aligned values; `None` marks a missing cell.
    pub values: Vec<Option<f64>>,
    /// Number of cells that held non-numeric text (stored as `None`).
    pub non_numeric: usize,
}

impl Column {
    /// Build a column from already-parsed cells.
    pub fn from_cells(name: impl Into<String>, cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut non_numeric = 0;
        let values = cells
            .into_iter()
            .map(|c| match c {
                Cell::Value(v) => Some(v),
                Cell::Missing => None,
                Cell::Text => {
                    non_numeric += 1;
                    None
                }
            })
            .collect();
        Self { name: name.into(), values, non_numeric }
    }

    /// Build a fully numeric column (non-finite values become missing).
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|&v| v.is_finite().then_some(v)).collect(),
            non_numeric: 0,
        }
    }

    /// `true` when no cell held text.
    pub fn is_numeric(&self) -> bool {
        self.non_numeric == 0
    }
}

/// Observation table: equal-length named columns.
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl ObservationTable {
    /// Assemble a table from columns. All columns must have the same length
    /// and unique names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        let mut seen = HashSet::new();
        for c in &columns {
            if c.values.len() != n_rows {
                return Err(Error::Validation(format!(
                    "column '{}' has {} rows, expected {}",
                    c.name,
                    c.values.len(),
                    n_rows
                )));
            }
            if !seen.insert(c.name.as_str()) {
                return Err(Error::Validation(format!("duplicate column '{}'", c.name)));
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Build a table from string records (header + rows), parsing every cell.
    ///
    /// Short rows are padded with missing cells; extra trailing cells are ignored.
    pub fn from_records(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(Error::Validation("table has no columns".to_string()));
        }
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(j, name)| {
                let cells = rows
                    .iter()
                    .map(|r| r.get(j).map(|s| Cell::parse(s)).unwrap_or(Cell::Missing));
                Column::from_cells(name.trim(), cells)
            })
            .collect();
        Self::from_columns(columns)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// All columns in input order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Fail with [`Error::MissingColumns`] naming every absent column.
    pub fn require_columns<S: AsRef<str>>(&self, input: &str, required: &[S]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .map(|s| s.as_ref())
            .filter(|name| self.column(name).is_none())
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns { input: input.to_string(), columns: missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn cell_parsing() {
        assert_eq!(Cell::parse(" 1.5 "), Cell::Value(1.5));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("NaN"), Cell::Missing);
        assert_eq!(Cell::parse("NA"), Cell::Missing);
        assert_eq!(Cell::parse("inf"), Cell::Missing);
        assert_eq!(Cell::parse("Kitsilano"), Cell::Text);
    }

    #[test]
    fn from_records_parses_and_pads() {
        let t = ObservationTable::from_records(
            s(&["crime_rate", "income", "name"]),
            vec![s(&["10", "1", "A"]), s(&["20", ""]), s(&["40", "4", "C"])],
        )
        .unwrap();
        assert_eq!(t.n_rows(), 3);
        let income = t.column("income").unwrap();
        assert_eq!(income.values, vec![Some(1.0), None, Some(4.0)]);
        assert!(income.is_numeric());
        let name = t.column("name").unwrap();
        assert_eq!(name.non_numeric, 2);
        assert!(!name.is_numeric());
    }

    #[test]
    fn require_columns_reports_all_missing() {
        let t = ObservationTable::from_columns(vec![Column::from_values("crime_rate", &[1.0])])
            .unwrap();
        assert!(t.require_columns("t.csv", &["crime_rate"]).is_ok());
        match t.require_columns("t.csv", &["crime_rate", "a", "b"]) {
            Err(Error::MissingColumns { columns, .. }) => assert_eq!(columns, vec!["a", "b"]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_ragged_and_duplicate_columns() {
        let ragged = ObservationTable::from_columns(vec![
            Column::from_values("a", &[1.0, 2.0]),
            Column::from_values("b", &[1.0]),
        ]);
        assert!(ragged.is_err());
        let dup = ObservationTable::from_columns(vec![
            Column::from_values("a", &[1.0]),
            Column::from_values("a", &[2.0]),
        ]);
        assert!(dup.is_err());
    }
}
