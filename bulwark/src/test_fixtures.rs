//! Common test fixtures: small tables and transforms for exercising checks
//! and guards.

use crate::core::Table;
use crate::error::Result;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::kernels::numeric::add;
use arrow::datatypes::DataType;
use std::sync::Arc;

/// A table of `Int64` columns.
pub fn int_table(columns: &[(&str, Vec<i64>)]) -> Table {
    Table::try_from_columns(
        columns
            .iter()
            .map(|(name, values)| (*name, Arc::new(Int64Array::from(values.clone())) as ArrayRef)),
    )
    .expect("int columns must have equal lengths")
}

/// A table of nullable `Utf8` columns.
pub fn string_table(columns: &[(&str, Vec<Option<&str>>)]) -> Table {
    Table::try_from_columns(
        columns
            .iter()
            .map(|(name, values)| (*name, Arc::new(StringArray::from(values.clone())) as ArrayRef)),
    )
    .expect("string columns must have equal lengths")
}

/// A deterministic `rows x cols` table of bounded floats, with columns named
/// `c0`, `c1`, ...
pub fn float_table(rows: usize, cols: usize) -> Table {
    Table::try_from_columns((0..cols).map(|col| {
        let values: Vec<f64> = (0..rows)
            .map(|row| ((row * 7 + col * 3) % 11) as f64 * 0.5 + col as f64)
            .collect();
        (format!("c{col}"), Arc::new(Float64Array::from(values)) as ArrayRef)
    }))
    .expect("float columns are built with equal lengths")
}

/// One row with columns `a`, `b`, `c`.
pub fn abc_table() -> Table {
    int_table(&[("a", vec![1]), ("b", vec![2]), ("c", vec![3])])
}

/// Integer column `A` = `[1, 2, 3]` and string column `B` = `['a', 'b', 'c']`.
pub fn mixed_table() -> Table {
    Table::try_from_columns(vec![
        ("A", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
        ("B", Arc::new(StringArray::from(vec!["a", "b", "c"])) as ArrayRef),
    ])
    .expect("fixture columns have equal lengths")
}

/// Columns `0` and `1` indexed by the labels `a`, `b`, `c`.
pub fn labelled_table() -> Table {
    int_table(&[("0", vec![1, 2, 3]), ("1", vec![4, 5, 6])])
        .with_index(Arc::new(StringArray::from(vec!["a", "b", "c"])))
        .expect("index length matches")
}

/// Laboratory results where `Pb` is reported in two different units.
pub fn measurements() -> Table {
    Table::try_from_columns(vec![
        (
            "parameter",
            Arc::new(StringArray::from(vec!["Cu", "Zn", "Pb", "Pb"])) as ArrayRef,
        ),
        (
            "units",
            Arc::new(StringArray::from(vec!["mg/L", "ug/L", "ug/L", "mg/L"])) as ArrayRef,
        ),
        (
            "res",
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0])) as ArrayRef,
        ),
    ])
    .expect("fixture columns have equal lengths")
}

/// Transform adding `n` to every integer and float column.
pub fn add_n(table: &Table, n: i64) -> Result<Table> {
    table.map_columns(|_, column| {
        let shifted = match column.data_type() {
            DataType::Int64 => add(column, &Int64Array::new_scalar(n))?,
            DataType::Float64 => add(column, &Float64Array::new_scalar(n as f64))?,
            _ => column.clone(),
        };
        Ok(shifted)
    })
}

/// Transform returning its input unchanged.
pub fn noop(table: &Table, _: ()) -> Result<Table> {
    Ok(table.clone())
}
