//! Structural checks: column presence and table shape.

use crate::core::{Check, Table};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Checks that a table has the expected columns.
///
/// - by default the table's columns must be a superset of `columns`
/// - `exact_cols` requires the same set of columns, no extras
/// - `exact_order` requires `columns` to appear as a contiguous run in the
///   table's column order (the whole column list when `exact_cols` is also set)
///
/// ```rust
/// use bulwark::checks::HasColumns;
/// use bulwark::core::Check;
///
/// let check = HasColumns::new(["a", "b"]).exact_order(true);
/// assert_eq!(check.name(), "has_columns");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HasColumns {
    pub columns: Vec<String>,
    #[serde(default)]
    pub exact_cols: bool,
    #[serde(default)]
    pub exact_order: bool,
}

impl HasColumns {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            exact_cols: false,
            exact_order: false,
        }
    }

    pub fn exact_cols(mut self, exact_cols: bool) -> Self {
        self.exact_cols = exact_cols;
        self
    }

    pub fn exact_order(mut self, exact_order: bool) -> Self {
        self.exact_order = exact_order;
        self
    }
}

impl Check for HasColumns {
    fn name(&self) -> &str {
        "has_columns"
    }

    #[instrument(skip_all, fields(columns = ?self.columns, exact_cols = self.exact_cols, exact_order = self.exact_order))]
    fn validate(&self, table: &Table) -> Result<()> {
        let actual = table.column_names();
        let mut problems = Vec::new();

        let missing: Vec<&str> = self
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| !actual.contains(c))
            .collect();
        if !missing.is_empty() {
            problems.push(format!("missing columns {missing:?}"));
        }

        if self.exact_cols {
            let extra: Vec<&str> = actual
                .iter()
                .copied()
                .filter(|c| !self.columns.iter().any(|expected| expected == c))
                .collect();
            if !extra.is_empty() {
                problems.push(format!("unexpected extra columns {extra:?}"));
            }
        }

        if self.exact_order {
            if !missing.is_empty() {
                problems.push("cannot check column order while columns are missing".to_string());
            } else if !self.in_order(&actual) {
                problems.push(format!(
                    "columns {:?} are not in the expected order, table has {actual:?}",
                    self.columns
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(self.name(), problems.join("; ")))
        }
    }
}

impl HasColumns {
    fn in_order(&self, actual: &[&str]) -> bool {
        if self.exact_cols {
            return actual.len() == self.columns.len()
                && actual.iter().zip(&self.columns).all(|(a, e)| *a == e.as_str());
        }
        if self.columns.is_empty() {
            return true;
        }
        actual.windows(self.columns.len()).any(|window| {
            window
                .iter()
                .zip(&self.columns)
                .all(|(a, e)| *a == e.as_str())
        })
    }
}

/// Checks the table's column presence.
pub fn has_columns<'a, I, S>(
    table: &'a Table,
    columns: I,
    exact_cols: bool,
    exact_order: bool,
) -> Result<&'a Table>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    HasColumns::new(columns)
        .exact_cols(exact_cols)
        .exact_order(exact_order)
        .check(table)
}

/// An expected `(rows, columns)` pair. A dimension that is `None` or negative
/// is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Option<i64>, Option<i64>)", into = "(Option<i64>, Option<i64>)")]
pub struct Shape {
    pub rows: Option<i64>,
    pub cols: Option<i64>,
}

impl Shape {
    pub fn new(rows: Option<i64>, cols: Option<i64>) -> Self {
        Self { rows, cols }
    }

    /// Both dimensions constrained.
    pub fn exact(rows: i64, cols: i64) -> Self {
        Self::new(Some(rows), Some(cols))
    }

    /// Only the row count constrained.
    pub fn rows(rows: i64) -> Self {
        Self::new(Some(rows), None)
    }

    /// Only the column count constrained.
    pub fn cols(cols: i64) -> Self {
        Self::new(None, Some(cols))
    }

    fn mismatch(expected: Option<i64>, actual: usize) -> bool {
        matches!(expected, Some(e) if e >= 0 && e as usize != actual)
    }
}

impl From<(i64, i64)> for Shape {
    fn from((rows, cols): (i64, i64)) -> Self {
        Self::exact(rows, cols)
    }
}

impl From<(Option<i64>, Option<i64>)> for Shape {
    fn from((rows, cols): (Option<i64>, Option<i64>)) -> Self {
        Self::new(rows, cols)
    }
}

impl From<Shape> for (Option<i64>, Option<i64>) {
    fn from(shape: Shape) -> Self {
        (shape.rows, shape.cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim = |d: Option<i64>| match d {
            Some(v) if v >= 0 => v.to_string(),
            _ => "*".to_string(),
        };
        write!(f, "({}, {})", dim(self.rows), dim(self.cols))
    }
}

/// Checks the table's `(rows, columns)` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsShape {
    pub shape: Shape,
}

impl IsShape {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
        }
    }
}

impl Check for IsShape {
    fn name(&self) -> &str {
        "is_shape"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        let (rows, cols) = table.shape();
        if Shape::mismatch(self.shape.rows, rows) || Shape::mismatch(self.shape.cols, cols) {
            return Err(BulwarkError::violation(
                self.name(),
                format!("expected shape {} but table has shape ({rows}, {cols})", self.shape),
            ));
        }
        Ok(())
    }
}

/// Checks the table's shape.
pub fn is_shape(table: &Table, shape: impl Into<Shape>) -> Result<&Table> {
    IsShape::new(shape).check(table)
}
