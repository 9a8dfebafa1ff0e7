//! Adapter for user-supplied predicates.

use crate::core::{Check, Table};
use crate::prelude::*;
use std::fmt;
use std::sync::Arc;

/// A user predicate. It signals failure by returning an error, usually
/// [`BulwarkError::violation`].
pub type CheckFn = Arc<dyn Fn(&Table) -> Result<()> + Send + Sync>;

/// Runs a user-supplied predicate as a check.
///
/// The predicate's error is propagated unchanged.
///
/// ```rust
/// use bulwark::checks::CustomCheck;
/// use bulwark::core::{Check, Table};
/// use bulwark::prelude::*;
///
/// fn at_least(table: &Table, rows: usize) -> Result<()> {
///     if table.num_rows() < rows {
///         return Err(BulwarkError::violation("at_least", "too few rows"));
///     }
///     Ok(())
/// }
///
/// let check = CustomCheck::with_args(at_least, 10).named("at_least_10");
/// assert_eq!(check.name(), "at_least_10");
/// ```
#[derive(Clone)]
pub struct CustomCheck {
    name: String,
    predicate: CheckFn,
}

impl CustomCheck {
    /// Wraps a predicate that needs no extra arguments.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Table) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: "custom_check".to_string(),
            predicate: Arc::new(predicate),
        }
    }

    /// Binds extra arguments to a predicate for reuse in guards and
    /// aggregators. The predicate's own return value is discarded.
    pub fn with_args<F, A, R>(predicate: F, args: A) -> Self
    where
        F: Fn(&Table, A) -> Result<R> + Send + Sync + 'static,
        A: Clone + Send + Sync + 'static,
    {
        Self::new(move |table: &Table| predicate(table, args.clone()).map(|_| ()))
    }

    /// Overrides the name used in logs and reports.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCheck")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Check for CustomCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, table: &Table) -> Result<()> {
        (self.predicate)(table)
    }
}

/// Calls `predicate(table, args)` and returns the table if it succeeds.
pub fn custom_check<A, R, F>(table: &Table, predicate: F, args: A) -> Result<&Table>
where
    F: FnOnce(&Table, A) -> Result<R>,
{
    predicate(table, args)?;
    Ok(table)
}
