//! Log transform of a strictly positive target.

use vs_core::Column;

/// `ln(target)` aligned with the source rows.
///
/// Rows whose target is missing or `<= 0` carry `None`; they are counted
/// separately so the report can say why they were dropped.
#[derive(Debug, Clone)]
pub struct LogTarget {
    /// Name of the derived column, e.g. `log_crime_rate`.
    pub name: String,
    /// Row-aligned transformed values.
    pub values: Vec<Option<f64>>,
    /// Rows excluded because the target was `<= 0`.
    pub excluded_nonpositive: usize,
    /// Rows whose target was missing to begin with.
    pub missing: usize,
}

impl LogTarget {
    /// Transform `column`, naming the result `log_<column name>`.
    pub fn from_column(column: &Column) -> Self {
        let mut excluded_nonpositive = 0;
        let mut missing = 0;
        let values = column
            .values
            .iter()
            .map(|v| match *v {
                None => {
                    missing += 1;
                    None
                }
                Some(x) if x <= 0.0 => {
                    excluded_nonpositive += 1;
                    None
                }
                Some(x) => Some(x.ln()),
            })
            .collect();
        Self { name: format!("log_{}", column.name), values, excluded_nonpositive, missing }
    }

    /// Number of rows with a defined log value.
    pub fn n_valid(&self) -> usize {
        self.values.len() - self.excluded_nonpositive - self.missing
    }

    /// Defined values only, in row order.
    pub fn valid_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn log_of_positive_rows() {
        let col = Column::from_values("crime_rate", &[10.0, 20.0, 40.0]);
        let t = LogTarget::from_column(&col);
        assert_eq!(t.name, "log_crime_rate");
        let v = t.valid_values();
        assert_relative_eq!(v[0], 2.302585, epsilon = 1e-5);
        assert_relative_eq!(v[1], 2.995732, epsilon = 1e-5);
        assert_relative_eq!(v[2], 3.688879, epsilon = 1e-5);
        assert_eq!(t.n_valid(), 3);
    }

    #[test]
    fn nonpositive_and_missing_rows_are_counted() {
        let col = Column {
            name: "crime_rate".into(),
            values: vec![Some(0.0), Some(-1.0), None, Some(1.0)],
            non_numeric: 0,
        };
        let t = LogTarget::from_column(&col);
        assert_eq!(t.excluded_nonpositive, 2);
        assert_eq!(t.missing, 1);
        assert_eq!(t.n_valid(), 1);
        assert_eq!(t.values, vec![None, None, None, Some(0.0)]);
        assert!(t.valid_values().iter().all(|v| v.is_finite()));
    }
}
