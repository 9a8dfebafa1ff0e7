//! Core types: tables, cell values, the `Check` trait, guards and the check
//! registry.
//!
//! ```text
//! Guard<C: Check>
//!     ├── GuardConfig (enabled, stage)
//!     └── C: any check, or a CheckSpec built by name
//!             └── validate(&Table) -> Result<()>
//! ```

mod check;
mod guard;
mod registry;
pub(crate) mod scalar;
mod table;

pub use check::Check;
pub use guard::{Guard, GuardConfig, Stage};
pub use registry::{registered_checks, CheckSpec};
pub use scalar::Scalar;
pub use table::Table;
