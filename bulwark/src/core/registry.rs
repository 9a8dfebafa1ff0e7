//! Named check specifications and the registry that builds them.
//!
//! A [`CheckSpec`] is any check as a value. Built-in checks can be created by
//! name from a keyword-style JSON parameter object, which is how guards and
//! aggregators are configured from files:
//!
//! ```json
//! {"check": "within_range", "params": {"items": {"age": [0, 130]}}}
//! ```

use super::{Check, Table};
use crate::checks::{
    CustomCheck, HasColumns, HasDtypes, HasNoInfs, HasNoNans, HasNoNegInfs, HasNoNones, HasNoX,
    HasSetWithinVals, HasUniqueIndex, IsMonotonic, IsSameAs, IsShape, MatchesRegex, MultiCheck,
    OneToMany, Unique, WithinNStd, WithinRange, WithinSet,
};
use crate::prelude::*;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Any check, built-in or user supplied, as a single value.
///
/// Serializes as `{"check": <name>, "params": {...}}`. The `is_same_as` and
/// `custom_check` variants hold a table and a closure respectively, so they
/// can only be built in code.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "check", content = "params", rename_all = "snake_case")]
pub enum CheckSpec {
    HasColumns(HasColumns),
    IsShape(IsShape),
    HasNoX(HasNoX),
    HasNoNans(HasNoNans),
    HasNoInfs(HasNoInfs),
    HasNoNegInfs(HasNoNegInfs),
    HasNoNones(HasNoNones),
    HasSetWithinVals(HasSetWithinVals),
    Unique(Unique),
    HasUniqueIndex(HasUniqueIndex),
    IsMonotonic(IsMonotonic),
    WithinSet(WithinSet),
    WithinRange(WithinRange),
    WithinNStd(WithinNStd),
    HasDtypes(HasDtypes),
    OneToMany(OneToMany),
    #[serde(skip_serializing)]
    IsSameAs(IsSameAs),
    MatchesRegex(MatchesRegex),
    #[serde(rename = "custom_check", skip_serializing)]
    Custom(CustomCheck),
    MultiCheck(MultiCheck),
}

macro_rules! dispatch {
    ($spec:expr, $check:ident => $body:expr) => {
        match $spec {
            CheckSpec::HasColumns($check) => $body,
            CheckSpec::IsShape($check) => $body,
            CheckSpec::HasNoX($check) => $body,
            CheckSpec::HasNoNans($check) => $body,
            CheckSpec::HasNoInfs($check) => $body,
            CheckSpec::HasNoNegInfs($check) => $body,
            CheckSpec::HasNoNones($check) => $body,
            CheckSpec::HasSetWithinVals($check) => $body,
            CheckSpec::Unique($check) => $body,
            CheckSpec::HasUniqueIndex($check) => $body,
            CheckSpec::IsMonotonic($check) => $body,
            CheckSpec::WithinSet($check) => $body,
            CheckSpec::WithinRange($check) => $body,
            CheckSpec::WithinNStd($check) => $body,
            CheckSpec::HasDtypes($check) => $body,
            CheckSpec::OneToMany($check) => $body,
            CheckSpec::IsSameAs($check) => $body,
            CheckSpec::MatchesRegex($check) => $body,
            CheckSpec::Custom($check) => $body,
            CheckSpec::MultiCheck($check) => $body,
        }
    };
}

impl Check for CheckSpec {
    fn name(&self) -> &str {
        dispatch!(self, check => check.name())
    }

    fn validate(&self, table: &Table) -> Result<()> {
        dispatch!(self, check => check.validate(table))
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for CheckSpec {
                fn from(check: $variant) -> Self {
                    CheckSpec::$variant(check)
                }
            }
        )*
    };
}

impl_from!(
    HasColumns,
    IsShape,
    HasNoX,
    HasNoNans,
    HasNoInfs,
    HasNoNegInfs,
    HasNoNones,
    HasSetWithinVals,
    Unique,
    HasUniqueIndex,
    IsMonotonic,
    WithinSet,
    WithinRange,
    WithinNStd,
    HasDtypes,
    OneToMany,
    IsSameAs,
    MatchesRegex,
    MultiCheck,
);

impl From<CustomCheck> for CheckSpec {
    fn from(check: CustomCheck) -> Self {
        CheckSpec::Custom(check)
    }
}

type Builder = fn(&str, Value) -> Result<CheckSpec>;

fn build<C>(name: &str, params: Value) -> Result<CheckSpec>
where
    C: DeserializeOwned + Into<CheckSpec>,
{
    serde_json::from_value::<C>(params)
        .map(Into::into)
        .map_err(|e| BulwarkError::invalid_parameters(name, e.to_string()))
}

static REGISTRY: Lazy<BTreeMap<&'static str, Builder>> = Lazy::new(|| {
    let mut registry: BTreeMap<&'static str, Builder> = BTreeMap::new();
    registry.insert("has_columns", build::<HasColumns>);
    registry.insert("is_shape", build::<IsShape>);
    registry.insert("has_no_x", build::<HasNoX>);
    registry.insert("has_no_nans", build::<HasNoNans>);
    registry.insert("has_no_infs", build::<HasNoInfs>);
    registry.insert("has_no_neg_infs", build::<HasNoNegInfs>);
    registry.insert("has_no_nones", build::<HasNoNones>);
    registry.insert("has_set_within_vals", build::<HasSetWithinVals>);
    registry.insert("unique", build::<Unique>);
    registry.insert("has_unique_index", build::<HasUniqueIndex>);
    registry.insert("is_monotonic", build::<IsMonotonic>);
    registry.insert("within_set", build::<WithinSet>);
    registry.insert("within_range", build::<WithinRange>);
    registry.insert("within_n_std", build::<WithinNStd>);
    registry.insert("has_dtypes", build::<HasDtypes>);
    registry.insert("one_to_many", build::<OneToMany>);
    registry.insert("matches_regex", build::<MatchesRegex>);
    registry.insert("multi_check", build::<MultiCheck>);
    debug!(checks = registry.len(), "check registry initialised");
    registry
});

/// Names of every check that can be built from parameters, sorted.
pub fn registered_checks() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

impl CheckSpec {
    /// Builds a registered check from its name and a parameter object.
    ///
    /// `Null` stands for "no parameters". Unknown or ill-typed parameters
    /// fail with [`BulwarkError::InvalidParameters`].
    ///
    /// ```rust
    /// use bulwark::core::{Check, CheckSpec};
    /// use serde_json::json;
    ///
    /// let spec = CheckSpec::from_params("within_n_std", json!({"n": 2.5})).unwrap();
    /// assert_eq!(spec.name(), "within_n_std");
    /// ```
    pub fn from_params(name: &str, params: Value) -> Result<Self> {
        let builder = REGISTRY.get(name).ok_or_else(|| BulwarkError::UnknownCheck {
            name: name.to_string(),
            known: registered_checks().join(", "),
        })?;
        let params = match params {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };
        builder(name, params)
    }
}

impl<'de> Deserialize<'de> for CheckSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct RawSpec {
            check: String,
            #[serde(default)]
            params: Value,
        }

        let raw = RawSpec::deserialize(deserializer)?;
        CheckSpec::from_params(&raw.check, raw.params).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Shape;
    use crate::test_fixtures::{int_table, noop};
    use serde_json::json;

    #[test]
    fn test_registry_names() {
        let names = registered_checks();
        assert_eq!(names.len(), 18);
        for name in &names {
            let params = match *name {
                "has_columns" => json!({"columns": []}),
                "is_shape" => json!({"shape": [null, null]}),
                "has_set_within_vals" | "within_set" | "within_range" | "has_dtypes" => {
                    json!({"items": {}})
                }
                "one_to_many" => json!({"unit_col": "a", "many_col": "b"}),
                "matches_regex" => json!({"pattern": ".*"}),
                "multi_check" => json!({"checks": []}),
                _ => Value::Null,
            };
            let spec = CheckSpec::from_params(name, params).unwrap();
            assert_eq!(spec.name(), *name);
        }
        assert!(!names.contains(&"is_same_as"));
        assert!(!names.contains(&"custom_check"));
    }

    #[test]
    fn test_unknown_check() {
        let err = CheckSpec::from_params("has_no_cheese", Value::Null).unwrap_err();
        assert!(err.is_usage_error());
        assert!(err.to_string().contains("has_no_nans"));
    }

    #[test]
    fn test_invalid_parameters() {
        let err = CheckSpec::from_params("within_n_std", json!({"n": "three"})).unwrap_err();
        assert!(matches!(err, BulwarkError::InvalidParameters { ref check, .. } if check == "within_n_std"));

        let err = CheckSpec::from_params("has_columns", json!({})).unwrap_err();
        assert!(err.to_string().contains("columns"));
    }

    #[test]
    fn test_serde_round_trip_of_nested_specs() {
        let spec = CheckSpec::from(
            MultiCheck::new()
                .with_check(IsShape::new(Shape::cols(1)))
                .with_check(HasNoX::new().values([1, 2]).columns(["a"]))
                .warn(true),
        );
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["check"], "multi_check");
        assert_eq!(json["params"]["checks"][0]["check"], "is_shape");

        let back: CheckSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back.name(), "multi_check");
        let table = int_table(&[("a", vec![3])]);
        assert!(back.check(&table).is_ok());
    }

    #[test]
    fn test_code_only_variants_do_not_serialize() {
        let spec = CheckSpec::from(CustomCheck::new(|_| Ok(())));
        assert_eq!(spec.name(), "custom_check");
        assert!(serde_json::to_string(&spec).is_err());
    }

    #[test]
    fn test_spec_guards_transforms() {
        let table = int_table(&[("a", vec![1, 2])]);
        let spec = CheckSpec::from_params("is_shape", json!({"shape": [3, null]})).unwrap();
        let wrapped = spec.guard().wrap(noop);
        assert!(wrapped(&table, ()).unwrap_err().is_violation());
    }
}
