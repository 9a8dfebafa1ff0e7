//! Dynamically typed cell values.

use crate::prelude::*;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A single cell value, used both for reading table cells and for check
/// parameters such as forbidden values, allowed sets and range bounds.
///
/// Equality follows dataframe conventions rather than Rust's:
///
/// - integers and floats compare numerically (`Int(1) == Float(1.0)`)
/// - a missing value (`Null` or a float `NaN`) equals any other missing value
/// - values of different kinds are never equal
///
/// ```rust
/// use bulwark::core::Scalar;
///
/// assert_eq!(Scalar::from(1), Scalar::from(1.0));
/// assert_eq!(Scalar::Null, Scalar::from(f64::NAN));
/// assert_ne!(Scalar::from("1"), Scalar::from(1));
/// ```
///
/// In JSON a scalar is `null`, a boolean, a number or a string. JSON has no
/// literal for non-finite floats, so the strings `"inf"`, `"-inf"` and
/// `"nan"` (any case) read as the corresponding floats, and non-finite floats
/// are written back the same way:
///
/// ```rust
/// use bulwark::core::Scalar;
///
/// let values: Vec<Scalar> = serde_json::from_str(r#"[null, "inf", "-inf", 1]"#).unwrap();
/// assert_eq!(values[1], Scalar::INFINITY);
/// assert_eq!(serde_json::to_string(&Scalar::NEG_INFINITY).unwrap(), r#""-inf""#);
/// ```
#[derive(Debug, Clone, Default)]
pub enum Scalar {
    /// A missing value
    #[default]
    Null,
    /// A boolean value
    Bool(bool),
    /// Any integer value that fits in an `i64`
    Int(i64),
    /// A floating point value, including `inf`, `-inf` and `NaN`
    Float(f64),
    /// A string value; also used for types read through their display form
    Utf8(String),
}

impl Scalar {
    /// Positive infinity.
    pub const INFINITY: Scalar = Scalar::Float(f64::INFINITY);
    /// Negative infinity.
    pub const NEG_INFINITY: Scalar = Scalar::Float(f64::NEG_INFINITY);
    /// Not-a-number, treated as missing.
    pub const NAN: Scalar = Scalar::Float(f64::NAN);

    /// Returns true for `Null` and float `NaN`.
    pub fn is_missing(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Orders two values of the same kind. Missing values and values of
    /// different kinds are unordered.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        if self.is_missing() || other.is_missing() {
            return None;
        }
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
            (Scalar::Utf8(a), Scalar::Utf8(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Reads every cell of an Arrow array.
    ///
    /// Integers are widened to `i64` (`u64` values that do not fit become
    /// floats), floats and decimals become `f64`, and every other type is read
    /// through Arrow's string cast (dictionaries, dates, timestamps, ...).
    pub fn from_array(array: &ArrayRef) -> Result<Vec<Scalar>> {
        let values = match array.data_type() {
            DataType::Null => vec![Scalar::Null; array.len()],
            DataType::Boolean => array
                .as_boolean()
                .iter()
                .map(|v| v.map_or(Scalar::Null, Scalar::Bool))
                .collect(),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => cast(array, &DataType::Int64)?
                .as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map_or(Scalar::Null, Scalar::Int))
                .collect(),
            DataType::UInt64 => array
                .as_primitive::<UInt64Type>()
                .iter()
                .map(|v| match v {
                    None => Scalar::Null,
                    Some(v) => i64::try_from(v)
                        .map(Scalar::Int)
                        .unwrap_or(Scalar::Float(v as f64)),
                })
                .collect(),
            DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(..)
            | DataType::Decimal256(..) => cast(array, &DataType::Float64)?
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(Scalar::Null, Scalar::Float))
                .collect(),
            _ => cast(array, &DataType::Utf8)?
                .as_string::<i32>()
                .iter()
                .map(|v| v.map_or(Scalar::Null, |s| Scalar::Utf8(s.to_string())))
                .collect(),
        };
        Ok(values)
    }
}

/// The JSON forms a [`Scalar`] is read from.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Utf8(String),
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawScalar::deserialize(deserializer)? {
            RawScalar::Null => Scalar::Null,
            RawScalar::Bool(v) => Scalar::Bool(v),
            RawScalar::Int(v) => Scalar::Int(v),
            RawScalar::Float(v) => Scalar::Float(v),
            RawScalar::Utf8(v) => match v.to_ascii_lowercase().as_str() {
                "inf" | "+inf" | "infinity" => Scalar::INFINITY,
                "-inf" | "-infinity" => Scalar::NEG_INFINITY,
                "nan" => Scalar::NAN,
                _ => Scalar::Utf8(v),
            },
        })
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(v) => serializer.serialize_bool(*v),
            Scalar::Int(v) => serializer.serialize_i64(*v),
            Scalar::Float(v) if v.is_nan() => serializer.serialize_str("nan"),
            Scalar::Float(v) if v.is_infinite() => {
                serializer.serialize_str(if *v > 0.0 { "inf" } else { "-inf" })
            }
            Scalar::Float(v) => serializer.serialize_f64(*v),
            Scalar::Utf8(v) => serializer.serialize_str(v),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        if self.is_missing() || other.is_missing() {
            return self.is_missing() && other.is_missing();
        }
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Utf8(a), Scalar::Utf8(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Utf8(v) => write!(f, "'{v}'"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Utf8(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Utf8(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

/// Formats a list of scalars as `[a, b, c]`.
pub(crate) fn format_scalars(values: &[Scalar]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
