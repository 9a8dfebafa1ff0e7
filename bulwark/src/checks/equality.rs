//! Whole-table comparison against a reference table.

use super::locations::BadLocations;
use crate::core::{Check, Scalar, Table};
use crate::prelude::*;
use tracing::instrument;

/// How [`IsSameAs`] compares a table with its reference.
///
/// Column names, dtypes and the row index are compared unless switched off.
/// Numbers are compared with `|a - b| <= atol + rtol * |b|` unless
/// `check_exact` is set, so an integer column and a float column holding the
/// same numbers are equal once `check_dtype` is off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub check_dtype: bool,
    pub check_names: bool,
    pub check_index: bool,
    pub check_exact: bool,
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Comparison {
    fn default() -> Self {
        Self {
            check_dtype: true,
            check_names: true,
            check_index: true,
            check_exact: false,
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Comparison {
    pub fn check_dtype(mut self, check_dtype: bool) -> Self {
        self.check_dtype = check_dtype;
        self
    }

    pub fn check_names(mut self, check_names: bool) -> Self {
        self.check_names = check_names;
        self
    }

    pub fn check_index(mut self, check_index: bool) -> Self {
        self.check_index = check_index;
        self
    }

    pub fn check_exact(mut self, check_exact: bool) -> Self {
        self.check_exact = check_exact;
        self
    }

    pub fn tolerance(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    fn cells_equal(&self, actual: &Scalar, expected: &Scalar) -> bool {
        if self.check_exact {
            return actual == expected;
        }
        match (actual, expected) {
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            _ => match (actual.as_f64(), expected.as_f64()) {
                (Some(a), Some(b)) if a.is_finite() && b.is_finite() => {
                    (a - b).abs() <= self.atol + self.rtol * b.abs()
                }
                _ => actual == expected,
            },
        }
    }
}

/// Fails unless the table equals a reference table under a [`Comparison`].
///
/// Shape must always match. Holding a table, this check cannot be built from
/// parameters and is not serializable.
#[derive(Debug, Clone, PartialEq)]
pub struct IsSameAs {
    pub reference: Table,
    pub comparison: Comparison,
}

impl IsSameAs {
    pub fn new(reference: Table) -> Self {
        Self {
            reference,
            comparison: Comparison::default(),
        }
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn check_dtype(mut self, check_dtype: bool) -> Self {
        self.comparison = self.comparison.check_dtype(check_dtype);
        self
    }

    pub fn check_names(mut self, check_names: bool) -> Self {
        self.comparison = self.comparison.check_names(check_names);
        self
    }

    pub fn check_index(mut self, check_index: bool) -> Self {
        self.comparison = self.comparison.check_index(check_index);
        self
    }

    pub fn check_exact(mut self, check_exact: bool) -> Self {
        self.comparison = self.comparison.check_exact(check_exact);
        self
    }

    pub fn tolerance(mut self, rtol: f64, atol: f64) -> Self {
        self.comparison = self.comparison.tolerance(rtol, atol);
        self
    }
}

impl Check for IsSameAs {
    fn name(&self) -> &str {
        "is_same_as"
    }

    #[instrument(skip(self, table), fields(check_exact = self.comparison.check_exact))]
    fn validate(&self, table: &Table) -> Result<()> {
        let reference = &self.reference;
        let comparison = &self.comparison;
        if table.shape() != reference.shape() {
            let (rows, cols) = table.shape();
            let (ref_rows, ref_cols) = reference.shape();
            return Err(BulwarkError::violation(
                self.name(),
                format!("shape ({rows}, {cols}) differs from reference shape ({ref_rows}, {ref_cols})"),
            ));
        }

        let mut problems = Vec::new();
        let names = table.column_names();
        let ref_names = reference.column_names();
        if comparison.check_names && names != ref_names {
            problems.push(format!("columns {names:?} differ from reference columns {ref_names:?}"));
        }

        if comparison.check_dtype {
            for (position, (name, ref_name)) in names.iter().zip(&ref_names).enumerate() {
                let actual = table.batch().column(position).data_type();
                let expected = reference.batch().column(position).data_type();
                if actual != expected {
                    problems.push(format!(
                        "column '{name}' has type {actual}, reference column '{ref_name}' has {expected}"
                    ));
                }
            }
        }

        if comparison.check_index {
            let index = Scalar::from_array(&table.index())?;
            let ref_index = Scalar::from_array(&reference.index())?;
            if index != ref_index {
                problems.push("index differs from reference index".to_string());
            }
        }

        let mut bad = BadLocations::new();
        for (position, name) in names.iter().enumerate() {
            let actual = Scalar::from_array(table.batch().column(position))?;
            let expected = Scalar::from_array(reference.batch().column(position))?;
            for (row, (a, e)) in actual.iter().zip(&expected).enumerate() {
                if !comparison.cells_equal(a, e) {
                    bad.push(table, row, name);
                }
            }
        }
        if !bad.is_empty() {
            problems.push(bad.describe("values differ from reference"));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(self.name(), problems.join("; ")))
        }
    }
}

/// Fails unless the table equals `reference` under `comparison`.
pub fn is_same_as<'a>(
    table: &'a Table,
    reference: &Table,
    comparison: Comparison,
) -> Result<&'a Table> {
    IsSameAs::new(reference.clone())
        .with_comparison(comparison)
        .check(table)
}
