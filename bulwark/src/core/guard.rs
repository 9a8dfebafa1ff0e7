//! Attaching checks to data-transforming functions.
//!
//! A transform is any `Fn(&Table, A) -> Result<Table>`, where `A` carries the
//! transform's extra arguments (`()` when it has none). [`Guard::wrap`] turns a
//! transform into a new transform with the same calling convention that also
//! runs a check:
//!
//! ```text
//! disabled          -> transform(table, args)
//! Stage::Input      -> check(table); transform(table, args)
//! Stage::Output     -> output = transform(table, args); check(output)
//! ```
//!
//! Guards nest, because a wrapped transform is itself a transform.
//!
//! ```rust
//! use bulwark::checks::{HasNoNans, IsShape, Shape};
//! use bulwark::core::{Check, Table};
//! use bulwark::prelude::*;
//!
//! fn identity(table: &Table, _: ()) -> Result<Table> {
//!     Ok(table.clone())
//! }
//!
//! let step = IsShape::new(Shape::cols(2))
//!     .guard()
//!     .wrap(HasNoNans::default().guard().wrap(identity));
//! # let _ = step;
//! ```

use super::{Check, CheckSpec, Table};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Which table a guard validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Validate the table passed to the transform, before it runs
    Input,
    /// Validate the table returned by the transform
    #[default]
    Output,
}

/// Options shared by every guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// When false the guard calls the transform directly and never runs the check
    pub enabled: bool,
    /// Which table the check runs against
    pub stage: Stage,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stage: Stage::Output,
        }
    }
}

impl GuardConfig {
    /// A configuration whose guards are no-ops.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// A check bound to a [`GuardConfig`], ready to wrap transforms.
#[derive(Debug, Clone)]
pub struct Guard<C> {
    check: C,
    config: GuardConfig,
}

impl<C: Check> Guard<C> {
    /// Creates an enabled guard validating transform output.
    pub fn new(check: C) -> Self {
        Self {
            check,
            config: GuardConfig::default(),
        }
    }

    /// Enables or disables the guard.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Selects which table the check runs against.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.config.stage = stage;
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> GuardConfig {
        self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// The wrapped check.
    pub fn inner(&self) -> &C {
        &self.check
    }

    /// Wraps a transform. The returned closure accepts exactly the arguments
    /// the transform accepts and returns its output unchanged on success.
    pub fn wrap<A, F>(self, transform: F) -> impl Fn(&Table, A) -> Result<Table>
    where
        F: Fn(&Table, A) -> Result<Table>,
    {
        move |table: &Table, args: A| {
            if !self.config.enabled {
                debug!(check = self.check.name(), "guard disabled, skipping check");
                return transform(table, args);
            }
            if self.config.stage == Stage::Input {
                self.check.validate(table)?;
            }
            let output = transform(table, args)?;
            if self.config.stage == Stage::Output {
                self.check.validate(&output)?;
            }
            Ok(output)
        }
    }
}

impl Guard<CheckSpec> {
    /// Builds a guard from a registered check name and a keyword-style
    /// parameter object.
    ///
    /// `enabled` and `stage` configure the guard; every other key must be a
    /// parameter of the named check. Unknown keys are rejected here, before
    /// the guard is ever applied.
    ///
    /// ```rust
    /// use bulwark::core::Guard;
    /// use serde_json::json;
    ///
    /// let guard = Guard::from_params("is_shape", json!({"shape": [10, 2], "enabled": false})).unwrap();
    /// assert!(!guard.is_enabled());
    ///
    /// let err = Guard::from_params("is_shape", json!({"shape": [9, 2], "cheese": true})).unwrap_err();
    /// assert!(err.is_usage_error());
    /// ```
    pub fn from_params(name: &str, params: Value) -> Result<Self> {
        let mut params = match params {
            Value::Null => serde_json::Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(BulwarkError::invalid_parameters(
                    name,
                    format!("expected a parameter object, found {other}"),
                ))
            }
        };

        let mut config = GuardConfig::default();
        if let Some(enabled) = params.remove("enabled") {
            config.enabled = serde_json::from_value(enabled)
                .map_err(|e| BulwarkError::invalid_parameters(name, format!("enabled: {e}")))?;
        }
        if let Some(stage) = params.remove("stage") {
            config.stage = serde_json::from_value(stage)
                .map_err(|e| BulwarkError::invalid_parameters(name, format!("stage: {e}")))?;
        }

        let spec = CheckSpec::from_params(name, Value::Object(params))?;
        Ok(Guard::new(spec).with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{CustomCheck, IsShape, Shape};
    use crate::test_fixtures::{add_n, int_table, noop};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_check(calls: Arc<AtomicUsize>) -> CustomCheck {
        CustomCheck::new(move |_table: &Table| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_wrap_passes_arguments_through() {
        let table = int_table(&[("a", vec![1, 2, 3])]);
        let wrapped = IsShape::new(Shape::exact(3, 1)).guard().wrap(add_n);
        let result = wrapped(&table, 2).unwrap();
        assert_eq!(result, add_n(&table, 2).unwrap());
    }

    #[test]
    fn test_wrap_raises_check_error() {
        let table = int_table(&[("a", vec![1, 2, 3])]);
        let wrapped = IsShape::new(Shape::exact(9, 1)).guard().wrap(add_n);
        let err = wrapped(&table, 1).unwrap_err();
        assert!(err.is_violation());
    }

    #[test]
    fn test_disabled_guard_never_runs_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let table = int_table(&[("a", vec![1])]);

        let wrapped = counting_check(calls.clone())
            .guard()
            .enabled(false)
            .wrap(noop);
        wrapped(&table, ()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let failing = IsShape::new(Shape::exact(100, 100))
            .guard()
            .enabled(false)
            .wrap(noop);
        assert!(failing(&table, ()).is_ok());
    }

    #[test]
    fn test_stage_selects_validated_table() {
        let table = int_table(&[("a", vec![1, 2])]);
        let drop_rows = |t: &Table, _: ()| -> Result<Table> { Ok(Table::new(t.batch().slice(0, 1))) };

        let on_output = IsShape::new(Shape::rows(2)).guard().wrap(drop_rows);
        assert!(on_output(&table, ()).is_err());

        let on_input = IsShape::new(Shape::rows(2))
            .guard()
            .stage(Stage::Input)
            .wrap(drop_rows);
        assert_eq!(on_input(&table, ()).unwrap().num_rows(), 1);
    }

    #[test]
    fn test_input_failure_skips_transform() {
        let calls = Arc::new(AtomicUsize::new(0));
        let table = int_table(&[("a", vec![1, 2])]);
        let counter = calls.clone();
        let transform = move |t: &Table, _: ()| -> Result<Table> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(t.clone())
        };

        let wrapped = IsShape::new(Shape::rows(5))
            .guard()
            .stage(Stage::Input)
            .wrap(transform);
        assert!(wrapped(&table, ()).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_params() {
        let guard = Guard::from_params("is_shape", json!({"shape": [2, null]})).unwrap();
        assert!(guard.is_enabled());
        assert_eq!(guard.config().stage, Stage::Output);

        let guard =
            Guard::from_params("has_no_nans", json!({"enabled": false, "stage": "input"})).unwrap();
        assert_eq!(
            guard.config(),
            GuardConfig {
                enabled: false,
                stage: Stage::Input
            }
        );
    }

    #[test]
    fn test_from_params_rejects_unknown_keys() {
        let err = Guard::from_params("is_shape", json!({"shape": [9, 2], "cheese": true}))
            .unwrap_err();
        assert!(matches!(err, BulwarkError::InvalidParameters { .. }));
        assert!(err.to_string().contains("cheese"));

        let err = Guard::from_params("is_shap", json!({})).unwrap_err();
        assert!(matches!(err, BulwarkError::UnknownCheck { .. }));

        let err = Guard::from_params("unique", json!({"enabled": "yes"})).unwrap_err();
        assert!(err.is_usage_error());

        let err = Guard::from_params("unique", json!([1, 2])).unwrap_err();
        assert!(err.is_usage_error());
    }
}
