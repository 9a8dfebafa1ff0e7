//! Running several checks as one.

use crate::core::{Check, CheckSpec, Table};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

/// A check failure recorded instead of raised in warn mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Name of the check that failed
    pub check: String,
    /// The violation message
    pub message: String,
}

/// Outcome of [`MultiCheck::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiCheckReport {
    /// Number of checks that were evaluated
    pub evaluated: usize,
    /// Violations collected in warn mode, in check order
    pub notices: Vec<Notice>,
}

impl MultiCheckReport {
    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }
}

/// Runs a sequence of checks in order.
///
/// By default the first failing check aborts the run and its error is
/// returned. In warn mode every check runs: violations are logged as
/// warnings and collected in the report, while usage errors still abort.
///
/// ```rust
/// use bulwark::checks::{HasNoNans, MultiCheck, Unique};
///
/// let checks = MultiCheck::new()
///     .with_check(HasNoNans::new())
///     .with_check(Unique::new())
///     .warn(true);
/// assert_eq!(checks.checks.len(), 2);
///
/// let loaded = MultiCheck::from_json(
///     r#"{"checks": [{"check": "is_shape", "params": {"shape": [null, 2]}}], "warn": true}"#,
/// )
/// .unwrap();
/// assert!(loaded.warn);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiCheck {
    pub checks: Vec<CheckSpec>,
    #[serde(default)]
    pub warn: bool,
}

impl MultiCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    pub fn with_check(mut self, check: impl Into<CheckSpec>) -> Self {
        self.checks.push(check.into());
        self
    }

    /// Loads a check list from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BulwarkError::invalid_parameters("multi_check", e.to_string()))
    }

    /// Runs every check and reports what was found.
    pub fn run(&self, table: &Table) -> Result<MultiCheckReport> {
        let mut report = MultiCheckReport::default();
        for spec in &self.checks {
            let _span = info_span!("multi_check", check = spec.name()).entered();
            report.evaluated += 1;
            match spec.validate(table) {
                Ok(()) => debug!(check = spec.name(), "check passed"),
                Err(BulwarkError::CheckViolation { check, message }) if self.warn => {
                    warn!(check = %check, message = %message, "check failed");
                    report.notices.push(Notice { check, message });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }
}

impl Check for MultiCheck {
    fn name(&self) -> &str {
        "multi_check"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        self.run(table).map(|_| ())
    }
}

/// Runs `checks` in order. With `warn`, violations are logged instead of
/// returned.
pub fn multi_check<'a>(table: &'a Table, checks: &[CheckSpec], warn: bool) -> Result<&'a Table> {
    MultiCheck {
        checks: checks.to_vec(),
        warn,
    }
    .check(table)
}
