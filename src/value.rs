//! Dynamic values shared between untrusted input and validated output.
//!
//! [`Value`] is the common currency of the crate: callers hand untrusted
//! values to a model for validation, and validated instances hand plain
//! values back when dumped.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Instance;

mod attributes;
pub use attributes::AttributeSource;

/// Conversions between [`Value`] and `serde_json` types.
pub mod json;

/// A dynamically typed value.
///
/// Inputs to validation arrive as values (directly, parsed from JSON text,
/// or pulled from an [`AttributeSource`]), and every field of a validated
/// [`Instance`] stores one. Numbers are kept in two distinct domains:
/// [`Value::Int`] for integers and [`Value::Float`] for floating point.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An RFC 4122 UUID.
    Uuid(Uuid),
    /// A timezone-aware point in time.
    DateTime(DateTime<Utc>),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, Value>),
    /// A validated instance of a nested model.
    Instance(Instance),
}

impl Value {
    /// The lowercase noun used to describe this value's kind in error
    /// messages, e.g. `"integer"` or `"string"`.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Uuid(_) => "uuid",
            Self::DateTime(_) => "datetime",
            Self::List(_) => "list",
            Self::Map(_) => "mapping",
            Self::Instance(_) => "instance",
        }
    }

    /// Returns `true` if this value is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean if this value is a [`Value::Bool`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if this value is a [`Value::Int`].
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float if this value is a [`Value::Float`].
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string slice if this value is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the UUID if this value is a [`Value::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the datetime if this value is a [`Value::DateTime`].
    #[must_use]
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the elements if this value is a [`Value::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the entries if this value is a [`Value::Map`].
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the instance if this value is a [`Value::Instance`].
    #[must_use]
    pub const fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the JSON form of the value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::from(self))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self::Map(entries)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversions_widen_losslessly() {
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(7u32), Value::Int(7));
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::Int(1).kind_name(), "integer");
        assert_eq!(Value::Float(1.5).kind_name(), "float");
        assert_eq!(Value::from("x").kind_name(), "string");
        assert_eq!(Value::List(vec![]).kind_name(), "list");
        assert_eq!(Value::Map(BTreeMap::new()).kind_name(), "mapping");
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert!(Value::Null.is_null());

        // Accessors are strict about the variant.
        assert_eq!(Value::Int(7).as_float(), None);
        assert_eq!(Value::Float(2.5).as_int(), None);
        assert_eq!(Value::Bool(true).as_int(), None);
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3i64)), Value::Int(3));
    }

    #[test]
    fn display_renders_json() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1,2]"
        );
    }
}
