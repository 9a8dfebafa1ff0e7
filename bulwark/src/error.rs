//! Error types for the bulwark validation library.
//!
//! All errors are represented by [`BulwarkError`]. The enum separates two
//! families that callers usually need to handle differently:
//!
//! - [`BulwarkError::CheckViolation`]: the data failed a check.
//! - everything else: the check was used incorrectly (unknown parameter,
//!   missing column, bad regex, ...) or an Arrow kernel failed.
//!
//! Use [`BulwarkError::is_violation`] to tell them apart.

use thiserror::Error;

/// The main error type for the bulwark library.
#[derive(Error, Debug)]
pub enum BulwarkError {
    /// The table did not satisfy a check.
    #[error("Check '{check}' failed: {message}")]
    CheckViolation {
        /// Name of the check that failed
        check: String,
        /// Human-readable description of the offending rows/columns/values
        message: String,
    },

    /// A check or guard was configured with parameters it does not accept.
    #[error("Invalid parameters for '{check}': {message}")]
    InvalidParameters {
        /// Name of the check being configured
        check: String,
        /// Detailed error message
        message: String,
    },

    /// No check is registered under the requested name.
    #[error("Unknown check '{name}' (registered checks: {known})")]
    UnknownCheck {
        /// The requested name
        name: String,
        /// Comma separated list of registered names
        known: String,
    },

    /// A check referenced a column the table does not have.
    #[error("Column '{column}' not found in table")]
    ColumnNotFound { column: String },

    /// A column has a type the check cannot operate on.
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// The table itself could not be assembled.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A regular expression failed to compile.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A type alias for `Result<T, BulwarkError>`.
pub type Result<T> = std::result::Result<T, BulwarkError>;

impl BulwarkError {
    /// Creates a check violation for the given check name.
    pub fn violation(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckViolation {
            check: check.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid parameters error for the given check name.
    pub fn invalid_parameters(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            check: check.into(),
            message: message.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Returns true if the data failed validation.
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::CheckViolation { .. })
    }

    /// Returns true if a check was misused rather than the data being invalid.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameters { .. }
                | Self::UnknownCheck { .. }
                | Self::ColumnNotFound { .. }
                | Self::TypeMismatch { .. }
                | Self::InvalidTable(_)
                | Self::Regex(_)
                | Self::Configuration(_)
        )
    }

    /// Name of the failing check, for violations and parameter errors.
    pub fn check_name(&self) -> Option<&str> {
        match self {
            Self::CheckViolation { check, .. } | Self::InvalidParameters { check, .. } => {
                Some(check)
            }
            _ => None,
        }
    }
}
