//! Monotonicity checks.

use crate::core::{Check, Scalar, Table};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Direction and strictness required of one column.
///
/// `increasing = None` accepts either direction.
pub type Monotonicity = (Option<bool>, bool);

/// Fails unless the governed columns are monotonic.
///
/// Without `items` every column must satisfy the global `increasing` and
/// `strict` settings. With `items` only the listed columns are checked, each
/// with its own `(increasing, strict)` pair. A missing value breaks
/// monotonicity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IsMonotonic {
    pub items: Option<BTreeMap<String, Monotonicity>>,
    pub increasing: Option<bool>,
    pub strict: bool,
}

impl IsMonotonic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increasing(mut self, increasing: Option<bool>) -> Self {
        self.increasing = increasing;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Adds a per-column requirement. Once any item is set, columns without
    /// one are no longer checked.
    pub fn with_item(
        mut self,
        column: impl Into<String>,
        increasing: Option<bool>,
        strict: bool,
    ) -> Self {
        self.items
            .get_or_insert_with(BTreeMap::new)
            .insert(column.into(), (increasing, strict));
        self
    }

    fn requirements(&self, table: &Table) -> Result<Vec<(String, Monotonicity)>> {
        match &self.items {
            Some(items) => items
                .iter()
                .map(|(column, req)| {
                    table.column(column)?;
                    Ok((column.clone(), *req))
                })
                .collect(),
            None => Ok(table
                .column_names()
                .into_iter()
                .map(|c| (c.to_string(), (self.increasing, self.strict)))
                .collect()),
        }
    }
}

fn satisfies(values: &[Scalar], increasing: bool, strict: bool) -> bool {
    values.windows(2).all(|pair| {
        let ordering = match pair[0].compare(&pair[1]) {
            Some(ordering) => ordering,
            None => return false,
        };
        match (increasing, strict) {
            (true, false) => ordering != Ordering::Greater,
            (true, true) => ordering == Ordering::Less,
            (false, false) => ordering != Ordering::Less,
            (false, true) => ordering == Ordering::Greater,
        }
    })
}

fn is_monotonic_values(values: &[Scalar], (increasing, strict): Monotonicity) -> bool {
    if values.iter().any(Scalar::is_missing) {
        return false;
    }
    match increasing {
        Some(direction) => satisfies(values, direction, strict),
        None => satisfies(values, true, strict) || satisfies(values, false, strict),
    }
}

fn describe((increasing, strict): Monotonicity) -> String {
    let direction = match increasing {
        Some(true) => "increasing",
        Some(false) => "decreasing",
        None => "monotonic",
    };
    if strict {
        format!("strictly {direction}")
    } else {
        direction.to_string()
    }
}

impl Check for IsMonotonic {
    fn name(&self) -> &str {
        "is_monotonic"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        let mut problems = Vec::new();
        for (column, requirement) in self.requirements(table)? {
            if !is_monotonic_values(&table.values(&column)?, requirement) {
                problems.push(format!("column '{column}' is not {}", describe(requirement)));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(self.name(), problems.join("; ")))
        }
    }
}

/// Fails unless the governed columns are monotonic.
pub fn is_monotonic<'a>(
    table: &'a Table,
    items: Option<BTreeMap<String, Monotonicity>>,
    increasing: Option<bool>,
    strict: bool,
) -> Result<&'a Table> {
    IsMonotonic {
        items,
        increasing,
        strict,
    }
    .check(table)
}
