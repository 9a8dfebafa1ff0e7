//! Value-based checks: forbidden values, set membership and ranges.

use super::locations::BadLocations;
use crate::core::scalar::format_scalars;
use crate::core::{Check, Scalar, Table};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Fails if any cell in the governed columns equals a forbidden value.
///
/// `values` defaults to `[null, inf, -inf]`; `columns` defaults to every
/// column. Null and `NaN` are both missing values and match each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HasNoX {
    pub values: Option<Vec<Scalar>>,
    pub columns: Option<Vec<String>>,
}

impl HasNoX {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    fn default_values() -> Vec<Scalar> {
        vec![Scalar::Null, Scalar::INFINITY, Scalar::NEG_INFINITY]
    }
}

/// Shared scan behind `has_no_x` and its fixed-value variants.
fn scan_forbidden(
    check: &str,
    table: &Table,
    forbidden: &[Scalar],
    columns: Option<&[String]>,
) -> Result<()> {
    let mut bad = BadLocations::new();
    for column in table.resolve_columns(columns)? {
        for (row, value) in table.values(&column)?.iter().enumerate() {
            if forbidden.contains(value) {
                bad.push(table, row, &column);
            }
        }
    }
    if bad.is_empty() {
        Ok(())
    } else {
        Err(BulwarkError::violation(
            check,
            bad.describe(&format!("found forbidden values {}", format_scalars(forbidden))),
        ))
    }
}

impl Check for HasNoX {
    fn name(&self) -> &str {
        "has_no_x"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        let forbidden = self.values.clone().unwrap_or_else(Self::default_values);
        scan_forbidden(self.name(), table, &forbidden, self.columns.as_deref())
    }
}

/// Fails if any governed cell equals one of `values`.
pub fn has_no_x<'a>(
    table: &'a Table,
    values: Option<Vec<Scalar>>,
    columns: Option<&[&str]>,
) -> Result<&'a Table> {
    HasNoX {
        values,
        columns: columns.map(owned),
    }
    .check(table)
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Declares a `has_no_x` variant with a single fixed forbidden value.
macro_rules! fixed_value_check {
    ($(#[$doc:meta])* $ty:ident, $func:ident, $name:literal, $value:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct $ty {
            pub columns: Option<Vec<String>>,
        }

        impl $ty {
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
        }

        impl Check for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn validate(&self, table: &Table) -> Result<()> {
                scan_forbidden(self.name(), table, &[$value], self.columns.as_deref())
            }
        }

        $(#[$doc])*
        pub fn $func<'a>(table: &'a Table, columns: Option<&[&str]>) -> Result<&'a Table> {
            $ty {
                columns: columns.map(owned),
            }
            .check(table)
        }
    };
}

fixed_value_check!(
    /// Fails on missing values (`NaN` or null).
    HasNoNans,
    has_no_nans,
    "has_no_nans",
    Scalar::NAN
);
fixed_value_check!(
    /// Fails on positive infinity.
    HasNoInfs,
    has_no_infs,
    "has_no_infs",
    Scalar::INFINITY
);
fixed_value_check!(
    /// Fails on negative infinity.
    HasNoNegInfs,
    has_no_neg_infs,
    "has_no_neg_infs",
    Scalar::NEG_INFINITY
);
fixed_value_check!(
    /// Fails on missing values (null or `NaN`).
    HasNoNones,
    has_no_nones,
    "has_no_nones",
    Scalar::Null
);

/// Fails unless every required value occurs in its column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HasSetWithinVals {
    pub items: BTreeMap<String, Vec<Scalar>>,
}

impl HasSetWithinVals {
    pub fn new(items: BTreeMap<String, Vec<Scalar>>) -> Self {
        Self { items }
    }
}

impl Check for HasSetWithinVals {
    fn name(&self) -> &str {
        "has_set_within_vals"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        let mut problems = Vec::new();
        for (column, required) in &self.items {
            let observed = table.values(column)?;
            let absent: Vec<Scalar> = required
                .iter()
                .filter(|value| !observed.contains(value))
                .cloned()
                .collect();
            if !absent.is_empty() {
                problems.push(format!(
                    "the following values are not in column '{column}': {}",
                    format_scalars(&absent)
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

/// Fails unless each listed value set is a subset of its column's values.
pub fn has_set_within_vals<'a>(
    table: &'a Table,
    items: BTreeMap<String, Vec<Scalar>>,
) -> Result<&'a Table> {
    HasSetWithinVals::new(items).check(table)
}

/// Fails unless every value of each listed column is in its allowed set.
/// Columns not listed are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithinSet {
    pub items: BTreeMap<String, Vec<Scalar>>,
}

impl WithinSet {
    pub fn new(items: BTreeMap<String, Vec<Scalar>>) -> Self {
        Self { items }
    }
}

impl Check for WithinSet {
    fn name(&self) -> &str {
        "within_set"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        let mut bad = BadLocations::new();
        for (column, allowed) in &self.items {
            for (row, value) in table.values(column)?.iter().enumerate() {
                if !allowed.contains(value) {
                    bad.push(table, row, column);
                }
            }
        }
        if bad.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(
                self.name(),
                bad.describe("values not in the allowed set"),
            ))
        }
    }
}

/// Fails unless every value of each listed column is allowed.
pub fn within_set<'a>(
    table: &'a Table,
    items: BTreeMap<String, Vec<Scalar>>,
) -> Result<&'a Table> {
    WithinSet::new(items).check(table)
}

/// Fails unless every non-missing value of each listed column lies in the
/// inclusive `(min, max)` range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithinRange {
    pub items: BTreeMap<String, (Scalar, Scalar)>,
}

impl WithinRange {
    pub fn new(items: BTreeMap<String, (Scalar, Scalar)>) -> Self {
        Self { items }
    }
}

impl Check for WithinRange {
    fn name(&self) -> &str {
        "within_range"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        let mut bad = BadLocations::new();
        for (column, (lower, upper)) in &self.items {
            for (row, value) in table.values(column)?.iter().enumerate() {
                if value.is_missing() {
                    continue;
                }
                let in_range = matches!(
                    value.compare(lower),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(value.compare(upper), Some(Ordering::Less | Ordering::Equal));
                if !in_range {
                    bad.push(table, row, column);
                }
            }
        }
        if bad.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(
                self.name(),
                bad.describe("values outside the allowed range"),
            ))
        }
    }
}

/// Fails unless every listed column's values lie in its range.
pub fn within_range<'a>(
    table: &'a Table,
    items: BTreeMap<String, (Scalar, Scalar)>,
) -> Result<&'a Table> {
    WithinRange::new(items).check(table)
}
