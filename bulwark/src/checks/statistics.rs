//! Outlier detection based on column statistics.

use super::locations::BadLocations;
use crate::core::{Check, Table};
use crate::prelude::*;
use arrow::array::AsArray;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fails if any numeric value lies more than `n` sample standard deviations
/// from its column's mean.
///
/// The bound is inclusive (`|x - mean| <= n * std`) and uses the sample
/// standard deviation (`n - 1` degrees of freedom). Non-numeric columns and
/// columns with fewer than two non-missing values are skipped.
///
/// A constant column has a standard deviation of zero and every value sits on
/// the mean, so it passes for any `n`, including `n = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WithinNStd {
    pub n: f64,
}

impl Default for WithinNStd {
    fn default() -> Self {
        Self { n: 3.0 }
    }
}

impl WithinNStd {
    pub fn new(n: f64) -> Self {
        Self { n }
    }
}

/// Mean and sample standard deviation, or `None` below two values.
fn mean_and_std(values: &[(usize, f64)]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().map(|(_, v)| v).sum::<f64>() / count;
    let variance = values.iter().map(|(_, v)| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);
    Some((mean, variance.sqrt()))
}

impl Check for WithinNStd {
    fn name(&self) -> &str {
        "within_n_std"
    }

    #[instrument(skip(self, table), fields(n = self.n))]
    fn validate(&self, table: &Table) -> Result<()> {
        if !self.n.is_finite() || self.n < 0.0 {
            return Err(BulwarkError::invalid_parameters(
                self.name(),
                format!("n must be a finite, non-negative number, got {}", self.n),
            ));
        }

        let schema = table.schema();
        let mut bad = BadLocations::new();
        for (field, array) in schema.fields().iter().zip(table.batch().columns()) {
            if !field.data_type().is_numeric() {
                debug!(column = %field.name(), "skipping non-numeric column");
                continue;
            }
            let floats = cast(array, &DataType::Float64)?;
            let values: Vec<(usize, f64)> = floats
                .as_primitive::<Float64Type>()
                .iter()
                .enumerate()
                .filter_map(|(row, v)| v.filter(|v| !v.is_nan()).map(|v| (row, v)))
                .collect();
            let Some((mean, std)) = mean_and_std(&values) else {
                debug!(column = %field.name(), "too few values for a standard deviation");
                continue;
            };
            let limit = self.n * std;
            for (row, value) in values {
                // NaN distances (from infinite values) are outliers too.
                let within = (value - mean).abs() <= limit;
                if !within {
                    bad.push(table, row, field.name());
                }
            }
        }

        if bad.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(
                self.name(),
                bad.describe(&format!("values outside {} standard deviations", self.n)),
            ))
        }
    }
}

/// Fails if any numeric value is more than `n` standard deviations from its
/// column's mean.
pub fn within_n_std(table: &Table, n: f64) -> Result<&Table> {
    WithinNStd::new(n).check(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{float_table, int_table};
    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use std::sync::Arc;

    fn with_outlier() -> Table {
        let mut values = vec![1.0; 20];
        values.push(100.0);
        Table::try_from_columns(vec![
            ("x", Arc::new(Float64Array::from(values)) as ArrayRef),
            (
                "label",
                Arc::new(StringArray::from(vec!["a"; 21])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_within_n_std_passes_on_regular_data() {
        let table = float_table(50, 3);
        assert!(std::ptr::eq(within_n_std(&table, 3.0).unwrap(), &table));
    }

    #[test]
    fn test_within_n_std_flags_outlier() {
        let table = with_outlier();
        let err = within_n_std(&table, 3.0).unwrap_err();
        assert!(err.is_violation());
        assert!(err.to_string().contains("(20, 'x')"), "{err}");
        assert!(within_n_std(&table, 5.0).is_ok());
    }

    #[test]
    fn test_bound_is_inclusive() {
        // mean 0, sample std 1
        let table = int_table(&[("x", vec![-1, 0, 1])]);
        assert!(within_n_std(&table, 1.0).is_ok());
        assert!(within_n_std(&table, 0.99).is_err());
    }

    #[test]
    fn test_constant_column_passes() {
        let table = int_table(&[("a", vec![4, 4, 4])]);
        assert!(within_n_std(&table, 0.0).is_ok());
        assert!(within_n_std(&table, 3.0).is_ok());
    }

    #[test]
    fn test_too_few_values_are_skipped() {
        let table = Table::try_from_columns(vec![(
            "x",
            Arc::new(Float64Array::from(vec![Some(1.0e9), None, Some(f64::NAN)])) as ArrayRef,
        )])
        .unwrap();
        assert!(within_n_std(&table, 0.0).is_ok());
        assert!(within_n_std(&table, 3.0).is_ok());
    }

    #[test]
    fn test_invalid_n_is_usage_error() {
        let table = int_table(&[("a", vec![1, 2])]);
        assert!(within_n_std(&table, -1.0).unwrap_err().is_usage_error());
        assert!(within_n_std(&table, f64::NAN).unwrap_err().is_usage_error());
    }
}
