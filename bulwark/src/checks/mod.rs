//! Built-in checks.
//!
//! Every check comes in two forms:
//!
//! - a struct implementing [`Check`](crate::core::Check), configurable from
//!   parameters, reusable, and attachable to transforms with
//!   [`Check::guard`](crate::core::Check::guard)
//! - a free function of the same name that runs the check once and returns
//!   the table it was given, taking the same parameters as the struct
//!
//! ## Catalogue
//!
//! | Check | Fails when |
//! |-------|------------|
//! | [`has_columns`] | required columns are missing (or extra / out of order) |
//! | [`is_shape`] | `(rows, cols)` differs from the expected shape |
//! | [`has_no_x`] | a cell holds a forbidden value (`null`, `inf`, `-inf` by default) |
//! | [`has_no_nans`], [`has_no_nones`] | a cell is missing |
//! | [`has_no_infs`], [`has_no_neg_infs`] | a cell is `inf` / `-inf` |
//! | [`has_set_within_vals`] | a required value never occurs in its column |
//! | [`unique`] | two rows are identical (or, per column, two values) |
//! | [`has_unique_index`] | two index labels are identical |
//! | [`is_monotonic`] | a column is not sorted as required |
//! | [`within_set`] | a value is outside its column's allowed set |
//! | [`within_range`] | a value is outside its column's `(min, max)` |
//! | [`within_n_std`] | a value is more than `n` standard deviations from the mean |
//! | [`has_dtypes`] | a column has the wrong type |
//! | [`one_to_many`] | a value maps to several values of another column |
//! | [`is_same_as`] | the table differs from a reference table under a [`Comparison`] |
//! | [`matches_regex`] | a string does not fully match a pattern (with `case`, `flags`, `na`) |
//! | [`custom_check`] | a user predicate fails |
//! | [`multi_check`] | any of several checks fails |
//!
//! ```rust
//! use arrow::array::{ArrayRef, Int64Array};
//! use bulwark::checks::{has_no_nans, is_shape, Shape};
//! use bulwark::core::Table;
//! use std::sync::Arc;
//!
//! let table = Table::try_from_columns(vec![
//!     ("a", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! let checked = has_no_nans(is_shape(&table, Shape::cols(1)).unwrap(), None).unwrap();
//! assert!(std::ptr::eq(checked, &table));
//! ```

mod columns;
mod custom;
mod datatype;
mod equality;
mod locations;
mod monotonic;
mod multi;
mod pattern;
mod statistics;
mod uniqueness;
mod values;

pub use columns::{has_columns, is_shape, HasColumns, IsShape, Shape};
pub use custom::{custom_check, CheckFn, CustomCheck};
pub use datatype::{has_dtypes, DType, HasDtypes};
pub use equality::{is_same_as, Comparison, IsSameAs};
pub use monotonic::{is_monotonic, IsMonotonic, Monotonicity};
pub use multi::{multi_check, MultiCheck, MultiCheckReport, Notice};
pub use pattern::{matches_regex, MatchesRegex, RegexFlags};
pub use statistics::{within_n_std, WithinNStd};
pub use uniqueness::{
    has_unique_index, one_to_many, unique, HasUniqueIndex, OneToMany, Unique,
};
pub use values::{
    has_no_infs, has_no_nans, has_no_neg_infs, has_no_nones, has_no_x, has_set_within_vals,
    within_range, within_set, HasNoInfs, HasNoNans, HasNoNegInfs, HasNoNones, HasNoX,
    HasSetWithinVals, WithinRange, WithinSet,
};
