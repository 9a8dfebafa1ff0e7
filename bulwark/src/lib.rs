//! # Bulwark - Defensive checks for tabular data pipelines
//!
//! Bulwark validates Arrow tables as they flow through a data pipeline. A
//! check inspects a table and either hands the very same table back or fails
//! with an error naming the offending rows, columns or values. Checks never
//! modify data.
//!
//! ## Overview
//!
//! There are two ways to use a check:
//!
//! - **imperatively**, by calling a free function such as
//!   [`checks::has_no_nans`] inside a pipeline step
//! - **as a guard**, by attaching it to a transform with
//!   [`Check::guard`](core::Check::guard) so that every call of the transform
//!   validates its output (or its input)
//!
//! ## Quick Start
//!
//! ```rust
//! use arrow::array::{ArrayRef, Float64Array};
//! use arrow::compute::kernels::numeric::add;
//! use bulwark::checks::{HasNoNans, IsShape, Shape};
//! use bulwark::prelude::*;
//! use std::sync::Arc;
//!
//! fn shift(table: &Table, by: f64) -> Result<Table> {
//!     let by = Float64Array::new_scalar(by);
//!     table.map_columns(|_, column| Ok(add(column, &by)?))
//! }
//!
//! let table = Table::try_from_columns(vec![
//!     ("x", Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])) as ArrayRef),
//!     ("y", Arc::new(Float64Array::from(vec![4.0, 5.0, 6.0])) as ArrayRef),
//! ])?;
//!
//! // Imperative use: the table comes back untouched.
//! let checked = bulwark::checks::has_no_nans(&table, None)?;
//! assert!(std::ptr::eq(checked, &table));
//!
//! // Guards nest: the outer guard validates whatever the inner one returns.
//! let step = IsShape::new(Shape::cols(2))
//!     .guard()
//!     .wrap(HasNoNans::new().guard().wrap(shift));
//! let shifted = step(&table, 1.0)?;
//! assert_eq!(shifted.shape(), (3, 2));
//!
//! // Guards can also be configured by name, e.g. from a config file.
//! let guard = Guard::from_params("within_n_std", serde_json::json!({"n": 2.0, "stage": "input"}))?;
//! let _ = guard.wrap(shift)(&table, 0.5)?;
//! # Ok::<(), BulwarkError>(())
//! ```
//!
//! ## Errors
//!
//! Failing data produces [`BulwarkError::CheckViolation`](error::BulwarkError::CheckViolation).
//! Misusing a check (an unknown parameter, a missing column, a bad regex)
//! produces one of the other variants; see [`error`].
//!
//! ## Architecture
//!
//! - **`core`**: [`Table`](core::Table), [`Scalar`](core::Scalar), the
//!   [`Check`](core::Check) trait, [`Guard`](core::Guard) and the
//!   [`CheckSpec`](core::CheckSpec) registry
//! - **`checks`**: every built-in check, the custom-predicate adapter and the
//!   [`MultiCheck`](checks::MultiCheck) aggregator
//! - **`logging`**: helpers for installing a `tracing` subscriber

pub mod checks;
pub mod core;
pub mod error;
pub mod logging;
pub mod prelude;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
