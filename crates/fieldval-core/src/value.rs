//! # Field Values
//!
//! `FieldValue` is the dynamic value read out of an instance when its rules
//! are evaluated. `ValueType` is the static counterpart: what a typed getter
//! is known to produce, used to reject incompatible rules when a schema is
//! built rather than when it is evaluated.
//!
//! ## Display
//!
//! Violation messages embed the offending value (`"... (value is 11)"`), so
//! `Display` follows the way a dynamic runtime interpolates values: `undefined`
//! for an absent member, integral numbers without a fractional part, text
//! verbatim, and compound JSON compactly.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value read from an instance member.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The instance has no such member.
    Undefined,
    /// The member is explicitly null / `None`.
    Null,
    /// A boolean.
    Bool(bool),
    /// Any number. Integers are widened to `f64`.
    Number(f64),
    /// A string.
    Text(String),
    /// An array or object.
    Json(Value),
}

impl FieldValue {
    /// Convert a JSON value. Scalars map to their dedicated variants;
    /// arrays and objects are kept as `Json`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Null),
            Value::String(s) => Self::Text(s.clone()),
            compound => Self::Json(compound.clone()),
        }
    }

    /// JSON form for structured reports. `Undefined` has no JSON form.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Undefined => None,
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Number(n) => Some(
                serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            ),
            Self::Text(s) => Some(Value::String(s.clone())),
            Self::Json(v) => Some(v.clone()),
        }
    }

    /// True for `Undefined`, `Null`, and empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The text content, if this is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric content, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The dynamic type of the value. `Undefined`, `Null` and compound
    /// JSON report `Any`.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::Text(_) => ValueType::Text,
            _ => ValueType::Any,
        }
    }
}

/// Format a number the way it reads in a message: `11`, `0.5`, `Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        // Covers -0.0.
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        Self::from_json(&v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

// ─── Static Value Types ─────────────────────────────────────────────

/// The statically known type of a field, used to check rule compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// String-valued field.
    Text,
    /// Numeric field.
    Number,
    /// Boolean field.
    Bool,
    /// Unknown or mixed; any rule may apply.
    Any,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Any => "untyped",
        })
    }
}

/// A Rust type that a typed getter can return.
///
/// Implementations declare the static [`ValueType`] and convert the owned
/// value into a [`FieldValue`] for evaluation.
pub trait FieldType {
    /// The static type reported to rule compatibility checks.
    const VALUE_TYPE: ValueType;

    /// Convert into the dynamic value seen by rule predicates.
    fn into_field_value(self) -> FieldValue;
}

impl FieldType for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn into_field_value(self) -> FieldValue {
        FieldValue::Text(self)
    }
}

impl FieldType for &'static str {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn into_field_value(self) -> FieldValue {
        FieldValue::Text(self.to_string())
    }
}

impl FieldType for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn into_field_value(self) -> FieldValue {
        FieldValue::Bool(self)
    }
}

impl FieldType for Value {
    const VALUE_TYPE: ValueType = ValueType::Any;

    fn into_field_value(self) -> FieldValue {
        FieldValue::from_json(&self)
    }
}

impl FieldType for FieldValue {
    const VALUE_TYPE: ValueType = ValueType::Any;

    fn into_field_value(self) -> FieldValue {
        self
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;

    fn into_field_value(self) -> FieldValue {
        match self {
            Some(v) => v.into_field_value(),
            None => FieldValue::Null,
        }
    }
}

macro_rules! number_field_type {
    ($($t:ty),*) => {
        $(
            impl FieldType for $t {
                const VALUE_TYPE: ValueType = ValueType::Number;

                fn into_field_value(self) -> FieldValue {
                    FieldValue::Number(self as f64)
                }
            }
        )*
    };
}

number_field_type!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Integral numbers never render with a fractional part.
        #[test]
        fn integral_numbers_render_without_fraction(n in -1_000_000_000i64..1_000_000_000i64) {
            prop_assert_eq!(FieldValue::from(n).to_string(), n.to_string());
        }

        /// Only empty text is blank among strings.
        #[test]
        fn text_blank_iff_empty(s in "[a-zA-Z0-9 ]{0,12}") {
            prop_assert_eq!(FieldValue::from(s.as_str()).is_blank(), s.is_empty());
        }
    }
}
