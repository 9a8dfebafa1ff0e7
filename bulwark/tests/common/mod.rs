//! Shared table builders for integration tests.

#![allow(dead_code)]

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::kernels::numeric::mul;
use bulwark::prelude::*;
use std::sync::Arc;

pub fn ints(values: Vec<i64>) -> ArrayRef {
    Arc::new(Int64Array::from(values))
}

pub fn floats(values: Vec<Option<f64>>) -> ArrayRef {
    Arc::new(Float64Array::from(values))
}

pub fn strings(values: Vec<Option<&str>>) -> ArrayRef {
    Arc::new(StringArray::from(values))
}

pub fn bools(values: Vec<bool>) -> ArrayRef {
    Arc::new(BooleanArray::from(values))
}

pub fn table(columns: Vec<(&str, ArrayRef)>) -> Table {
    Table::try_from_columns(columns).unwrap()
}

/// A small orders table: unique ids, sorted timestamps, a status code, a
/// non-negative amount and a nullable coupon code.
pub fn orders() -> Table {
    table(vec![
        ("order_id", ints(vec![101, 102, 103, 104, 105, 106])),
        ("ts", ints(vec![10, 20, 20, 35, 40, 41])),
        (
            "status",
            strings(vec![
                Some("new"),
                Some("paid"),
                Some("paid"),
                Some("shipped"),
                Some("new"),
                Some("paid"),
            ]),
        ),
        (
            "amount",
            floats(vec![
                Some(12.5),
                Some(3.0),
                Some(99.0),
                Some(45.25),
                Some(18.0),
                Some(7.75),
            ]),
        ),
        (
            "coupon",
            strings(vec![Some("AB10"), None, None, Some("CD25"), None, Some("ZZ05")]),
        ),
        ("gift", bools(vec![false, false, true, false, false, true])),
    ])
}

/// Transform doubling every float column.
pub fn double_amounts(table: &Table, _: ()) -> Result<Table> {
    table.map_columns(|field, column| {
        if field.data_type() == &arrow::datatypes::DataType::Float64 {
            Ok(mul(column, &Float64Array::new_scalar(2.0))?)
        } else {
            Ok(column.clone())
        }
    })
}

/// Transform keeping the first `n` rows.
pub fn head(table: &Table, n: usize) -> Result<Table> {
    Ok(Table::new(table.batch().slice(0, n.min(table.num_rows()))))
}
