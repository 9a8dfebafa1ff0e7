//! Prelude for commonly used types and traits in bulwark.

pub use crate::core::{Check, CheckSpec, Guard, GuardConfig, Scalar, Stage, Table};
pub use crate::error::{BulwarkError, Result};
pub use crate::logging::setup::LoggingConfig;
