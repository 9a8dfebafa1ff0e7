//! Column data type checks.

use crate::core::{Check, Table};
use crate::prelude::*;
use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An expected column type: either a family of Arrow types or one exact type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DType {
    /// Any signed or unsigned integer type
    Integer,
    /// Any floating point type
    Float,
    /// Any integer, float or decimal type
    Numeric,
    Boolean,
    /// `Utf8`, `LargeUtf8` or `Utf8View`
    String,
    /// Dictionary encoded columns
    Categorical,
    /// Dates, times, timestamps, durations and intervals
    Temporal,
    /// An Arrow type by its display name, e.g. `Int64` or `Date32`,
    /// compared case-insensitively
    Exact(String),
}

impl DType {
    /// Returns true if the Arrow type belongs to this family.
    pub fn matches(&self, data_type: &DataType) -> bool {
        match self {
            DType::Integer => data_type.is_integer(),
            DType::Float => data_type.is_floating(),
            DType::Numeric => data_type.is_numeric(),
            DType::Boolean => matches!(data_type, DataType::Boolean),
            DType::String => matches!(
                data_type,
                DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
            ),
            DType::Categorical => matches!(data_type, DataType::Dictionary(..)),
            DType::Temporal => data_type.is_temporal(),
            DType::Exact(name) => data_type.to_string().eq_ignore_ascii_case(name),
        }
    }
}

impl FromStr for DType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let dtype = match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => DType::Integer,
            "float" => DType::Float,
            "numeric" | "number" => DType::Numeric,
            "bool" | "boolean" => DType::Boolean,
            "str" | "string" | "object" => DType::String,
            "category" | "categorical" => DType::Categorical,
            "datetime" | "temporal" => DType::Temporal,
            _ => DType::Exact(s.to_string()),
        };
        Ok(dtype)
    }
}

impl From<String> for DType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(dtype) => dtype,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for DType {
    fn from(value: &str) -> Self {
        DType::from(value.to_string())
    }
}

impl From<DataType> for DType {
    fn from(value: DataType) -> Self {
        DType::Exact(value.to_string())
    }
}

impl From<DType> for String {
    fn from(value: DType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Integer => "integer",
            DType::Float => "float",
            DType::Numeric => "numeric",
            DType::Boolean => "boolean",
            DType::String => "string",
            DType::Categorical => "categorical",
            DType::Temporal => "temporal",
            DType::Exact(name) => name,
        };
        f.write_str(name)
    }
}

/// Fails unless every listed column has the expected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HasDtypes {
    pub items: BTreeMap<String, DType>,
}

impl HasDtypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dtype(mut self, column: impl Into<String>, dtype: impl Into<DType>) -> Self {
        self.items.insert(column.into(), dtype.into());
        self
    }
}

impl Check for HasDtypes {
    fn name(&self) -> &str {
        "has_dtypes"
    }

    fn validate(&self, table: &Table) -> Result<()> {
        let mut problems = Vec::new();
        for (column, expected) in &self.items {
            let actual = table.dtype(column)?;
            if !expected.matches(actual) {
                problems.push(format!("column '{column}' has type {actual}, expected {expected}"));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(self.name(), problems.join("; ")))
        }
    }
}

/// Fails unless each listed column has the expected type.
pub fn has_dtypes<'a>(table: &'a Table, items: BTreeMap<String, DType>) -> Result<&'a Table> {
    HasDtypes { items }.check(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::mixed_table;
    use arrow::array::{ArrayRef, Date32Array, DictionaryArray, Float32Array};
    use arrow::datatypes::Int32Type;
    use std::sync::Arc;

    #[test]
    fn test_aliases() {
        assert_eq!(DType::from("int"), DType::Integer);
        assert_eq!(DType::from("OBJECT"), DType::String);
        assert_eq!(DType::from("category"), DType::Categorical);
        assert_eq!(DType::from("datetime"), DType::Temporal);
        assert_eq!(DType::from("Int64"), DType::Exact("Int64".to_string()));
        assert_eq!(DType::from(DataType::Float64).to_string(), "Float64");
    }

    #[test]
    fn test_matches() {
        assert!(DType::Integer.matches(&DataType::UInt8));
        assert!(!DType::Integer.matches(&DataType::Float32));
        assert!(DType::Numeric.matches(&DataType::Float32));
        assert!(DType::Exact("int64".to_string()).matches(&DataType::Int64));
        assert!(!DType::Exact("Int32".to_string()).matches(&DataType::Int64));
        assert!(DType::Temporal.matches(&DataType::Date32));
    }

    #[test]
    fn test_has_dtypes() {
        let table = mixed_table();
        let check = HasDtypes::new()
            .with_dtype("A", "int")
            .with_dtype("B", "str");
        assert!(check.check(&table).is_ok());

        let err = HasDtypes::new()
            .with_dtype("A", "float")
            .check(&table)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Check 'has_dtypes' failed: column 'A' has type Int64, expected float"
        );

        let err = HasDtypes::new().with_dtype("Z", "int").check(&table).unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_other_families() {
        let dict: DictionaryArray<Int32Type> = vec!["x", "y"].into_iter().collect();
        let table = Table::try_from_columns(vec![
            ("cat", Arc::new(dict) as ArrayRef),
            ("day", Arc::new(Date32Array::from(vec![1, 2])) as ArrayRef),
            ("f", Arc::new(Float32Array::from(vec![1.0, 2.0])) as ArrayRef),
        ])
        .unwrap();
        let mut items = BTreeMap::new();
        items.insert("cat".to_string(), DType::Categorical);
        items.insert("day".to_string(), DType::Temporal);
        items.insert("f".to_string(), DType::from("Float32"));
        assert!(has_dtypes(&table, items).is_ok());
    }

    #[test]
    fn test_serde() {
        let check: HasDtypes =
            serde_json::from_str(r#"{"items": {"a": "integer", "b": "Utf8"}}"#).unwrap();
        assert_eq!(check.items["a"], DType::Integer);
        assert_eq!(check.items["b"], DType::Exact("Utf8".to_string()));
        assert_eq!(
            serde_json::to_string(&check).unwrap(),
            r#"{"items":{"a":"integer","b":"Utf8"}}"#
        );
    }
}
