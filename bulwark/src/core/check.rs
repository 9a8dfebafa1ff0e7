//! The `Check` trait implemented by every validation rule.

use super::{Guard, Table};
use crate::prelude::*;
use std::fmt::Debug;

/// A validation rule that can be evaluated against a table.
///
/// A check is a pure guard: it inspects the table and either succeeds or
/// returns [`BulwarkError::CheckViolation`]. It never modifies the table.
/// Implementations are plain configuration values and are reusable across any
/// number of evaluations.
///
/// # Examples
///
/// ```rust
/// use bulwark::core::{Check, Table};
/// use bulwark::prelude::*;
///
/// #[derive(Debug)]
/// struct NotEmpty;
///
/// impl Check for NotEmpty {
///     fn name(&self) -> &str {
///         "not_empty"
///     }
///
///     fn validate(&self, table: &Table) -> Result<()> {
///         if table.num_rows() == 0 {
///             return Err(BulwarkError::violation(self.name(), "table has no rows"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Check: Debug {
    /// The registered name of the check, used in error messages.
    fn name(&self) -> &str;

    /// Evaluates the check.
    fn validate(&self, table: &Table) -> Result<()>;

    /// Evaluates the check and hands back the very same table on success.
    fn check<'a>(&self, table: &'a Table) -> Result<&'a Table> {
        self.validate(table)?;
        Ok(table)
    }

    /// Wraps the check in a [`Guard`] so it can be attached to a transform.
    fn guard(self) -> Guard<Self>
    where
        Self: Sized,
    {
        Guard::new(self)
    }
}
