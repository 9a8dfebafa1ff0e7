//! Duplicate detection: unique rows, unique index and one-to-many mappings.

use crate::core::scalar::format_scalars;
use crate::core::{Check, Table};
use crate::logging::truncate_field;
use crate::prelude::*;
use arrow::array::ArrayRef;
use arrow::row::{OwnedRow, RowConverter, SortField};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

const MAX_REPORTED: usize = 10;
const MAX_MESSAGE_LENGTH: usize = 1024;

/// Positions of rows whose encoded value occurs more than once.
fn duplicated_rows(arrays: &[ArrayRef]) -> Result<Vec<usize>> {
    if arrays.is_empty() {
        return Ok(Vec::new());
    }
    let converter = RowConverter::new(
        arrays
            .iter()
            .map(|a| SortField::new(a.data_type().clone()))
            .collect(),
    )?;
    let rows = converter.convert_columns(arrays)?;

    let mut counts: HashMap<_, usize> = HashMap::with_capacity(rows.num_rows());
    for row in rows.iter() {
        *counts.entry(row).or_default() += 1;
    }
    Ok(rows
        .iter()
        .enumerate()
        .filter(|(_, row)| counts.get(row).copied().unwrap_or_default() > 1)
        .map(|(position, _)| position)
        .collect())
}

fn describe_rows(table: &Table, rows: &[usize]) -> String {
    let labels: Vec<String> = rows
        .iter()
        .take(MAX_REPORTED)
        .map(|&row| table.row_label(row))
        .collect();
    let mut message = labels.join(", ");
    if rows.len() > MAX_REPORTED {
        message.push_str(&format!(" and {} more", rows.len() - MAX_REPORTED));
    }
    message
}

/// Fails if the table contains duplicate rows.
///
/// By default rows are compared across all columns (or the `columns` subset).
/// With `per_column` every governed column must instead be unique on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Unique {
    pub columns: Option<Vec<String>>,
    pub per_column: bool,
}

impl Unique {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn per_column(mut self, per_column: bool) -> Self {
        self.per_column = per_column;
        self
    }
}

impl Check for Unique {
    fn name(&self) -> &str {
        "unique"
    }

    #[instrument(skip_all, fields(per_column = self.per_column))]
    fn validate(&self, table: &Table) -> Result<()> {
        let columns = table.resolve_columns(self.columns.as_deref())?;

        if self.per_column {
            let mut problems = Vec::new();
            for column in &columns {
                let rows = duplicated_rows(&[table.column(column)?.clone()])?;
                if !rows.is_empty() {
                    let values = table.values(column)?;
                    let mut seen = Vec::new();
                    for &row in &rows {
                        if !seen.contains(&values[row]) {
                            seen.push(values[row].clone());
                        }
                    }
                    problems.push(format!(
                        "column '{column}' has duplicated values {}",
                        format_scalars(&seen)
                    ));
                }
            }
            if problems.is_empty() {
                return Ok(());
            }
            return Err(BulwarkError::violation(
                self.name(),
                truncate_field(&problems.join("; "), MAX_MESSAGE_LENGTH),
            ));
        }

        let arrays = columns
            .iter()
            .map(|c| table.column(c).cloned())
            .collect::<Result<Vec<_>>>()?;
        let rows = duplicated_rows(&arrays)?;
        if rows.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(
                self.name(),
                format!(
                    "{} duplicated row(s) over columns {columns:?} at index: {}",
                    rows.len(),
                    describe_rows(table, &rows)
                ),
            ))
        }
    }
}

/// Fails if the table contains duplicate rows over `columns` (all when
/// `None`). With `per_column` each governed column must be unique on its own.
pub fn unique<'a>(
    table: &'a Table,
    columns: Option<&[&str]>,
    per_column: bool,
) -> Result<&'a Table> {
    let mut check = Unique::new().per_column(per_column);
    if let Some(columns) = columns {
        check = check.columns(columns.iter().copied());
    }
    check.check(table)
}

/// Fails if the row index contains duplicate labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HasUniqueIndex {}

impl HasUniqueIndex {
    pub fn new() -> Self {
        Self {}
    }
}

impl Check for HasUniqueIndex {
    fn name(&self) -> &str {
        "has_unique_index"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        if table.has_default_index() {
            return Ok(());
        }
        let rows = duplicated_rows(&[table.index()])?;
        if rows.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(
                self.name(),
                format!("index has duplicated labels: {}", describe_rows(table, &rows)),
            ))
        }
    }
}

/// Fails if the table's index is not unique.
pub fn has_unique_index(table: &Table) -> Result<&Table> {
    HasUniqueIndex::new().check(table)
}

/// Fails unless every value of `many_col` maps to exactly one `unit_col`
/// value. A single `unit_col` value may map to many `many_col` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OneToMany {
    pub unit_col: String,
    pub many_col: String,
}

impl OneToMany {
    pub fn new(unit_col: impl Into<String>, many_col: impl Into<String>) -> Self {
        Self {
            unit_col: unit_col.into(),
            many_col: many_col.into(),
        }
    }
}

impl Check for OneToMany {
    fn name(&self) -> &str {
        "one_to_many"
    }

    #[instrument(skip_all, fields(unit_col = %self.unit_col, many_col = %self.many_col))]
    fn validate(&self, table: &Table) -> Result<()> {
        let unit = table.column(&self.unit_col)?.clone();
        let many = table.column(&self.many_col)?.clone();

        let encode = |array: &ArrayRef| -> Result<Vec<OwnedRow>> {
            let converter = RowConverter::new(vec![SortField::new(array.data_type().clone())])?;
            let rows = converter.convert_columns(&[array.clone()])?;
            Ok(rows.iter().map(|row| row.owned()).collect())
        };
        let unit_rows = encode(&unit)?;
        let many_rows = encode(&many)?;

        // many value -> (first row it was seen at, its unit value)
        let mut first_seen: HashMap<&OwnedRow, (usize, &OwnedRow)> = HashMap::new();
        let mut offending_rows = Vec::new();
        let mut reported: HashSet<&OwnedRow> = HashSet::new();
        for (row, (many_value, unit_value)) in many_rows.iter().zip(&unit_rows).enumerate() {
            match first_seen.entry(many_value) {
                Entry::Vacant(entry) => {
                    entry.insert((row, unit_value));
                }
                Entry::Occupied(entry) => {
                    let (first_row, first_unit) = *entry.get();
                    if first_unit != unit_value && reported.insert(many_value) {
                        offending_rows.push(first_row);
                    }
                }
            }
        }

        if offending_rows.is_empty() {
            return Ok(());
        }
        let many_values = table.values(&self.many_col)?;
        let problems: Vec<String> = offending_rows
            .iter()
            .take(MAX_REPORTED)
            .map(|&row| {
                format!(
                    "{} in '{}' has multiple values for '{}'",
                    many_values[row], self.many_col, self.unit_col
                )
            })
            .collect();
        let mut message = problems.join("; ");
        if offending_rows.len() > MAX_REPORTED {
            message.push_str(&format!(
                " and {} more",
                offending_rows.len() - MAX_REPORTED
            ));
        }
        Err(BulwarkError::violation(self.name(), message))
    }
}

/// Fails unless each `many_col` value maps to a single `unit_col` value.
pub fn one_to_many<'a>(table: &'a Table, unit_col: &str, many_col: &str) -> Result<&'a Table> {
    OneToMany::new(unit_col, many_col).check(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{int_table, measurements};
    use arrow::array::{Float64Array, StringArray};
    use std::sync::Arc;

    #[test]
    fn test_unique_rows() {
        let table = int_table(&[("a", vec![1, 1, 2]), ("b", vec![1, 2, 2])]);
        assert!(std::ptr::eq(unique(&table, None, false).unwrap(), &table));

        let err = unique(&table, Some(&["a"]), false).unwrap_err();
        assert!(err.is_violation());
        assert!(err.to_string().contains("2 duplicated row(s)"), "{err}");
        assert!(err.to_string().contains("at index: 0, 1"));
    }

    #[test]
    fn test_unique_per_column() {
        let table = int_table(&[("a", vec![1, 2, 3]), ("b", vec![1, 1, 2])]);
        assert!(unique(&table, Some(&["a"]), true).is_ok());
        // rows are distinct, so only the per-column mode fails
        assert!(unique(&table, None, false).is_ok());

        let err = unique(&table, None, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Check 'unique' failed: column 'b' has duplicated values [1]"
        );
    }

    #[test]
    fn test_unique_treats_nan_rows_as_equal() {
        let table = Table::try_from_columns(vec![(
            "x",
            Arc::new(Float64Array::from(vec![Some(f64::NAN), Some(f64::NAN)])) as ArrayRef,
        )])
        .unwrap();
        assert!(unique(&table, None, false).is_err());
    }

    #[test]
    fn test_unique_empty_table() {
        let table = int_table(&[("a", vec![])]);
        assert!(unique(&table, None, false).is_ok());
    }

    #[test]
    fn test_has_unique_index() {
        let table = int_table(&[("a", vec![1, 1])]);
        assert!(has_unique_index(&table).is_ok());

        let labelled = table
            .clone()
            .with_index(Arc::new(StringArray::from(vec!["x", "y"])))
            .unwrap();
        assert!(has_unique_index(&labelled).is_ok());

        let duplicated = table
            .with_index(Arc::new(StringArray::from(vec!["x", "x"])))
            .unwrap();
        let err = has_unique_index(&duplicated).unwrap_err();
        assert!(err.to_string().contains("index has duplicated labels: x, x"));
    }

    #[test]
    fn test_one_to_many() {
        let table = measurements();
        let err = one_to_many(&table, "units", "parameter").unwrap_err();
        assert!(err.is_violation());
        assert_eq!(
            err.to_string(),
            "Check 'one_to_many' failed: 'Pb' in 'parameter' has multiple values for 'units'"
        );

        let consistent = table.batch().slice(0, 3);
        let consistent = Table::new(consistent);
        assert!(one_to_many(&consistent, "units", "parameter").is_ok());
    }

    #[test]
    fn test_one_to_many_unit_may_repeat() {
        let table = Table::try_from_columns(vec![
            (
                "unit",
                Arc::new(StringArray::from(vec!["mg", "mg", "ug"])) as ArrayRef,
            ),
            (
                "many",
                Arc::new(StringArray::from(vec!["Pb", "Cu", "Zn"])) as ArrayRef,
            ),
        ])
        .unwrap();
        assert!(one_to_many(&table, "unit", "many").is_ok());
        assert!(one_to_many(&table, "unit", "absent").unwrap_err().is_usage_error());
    }
}
