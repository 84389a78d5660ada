//! The JSON boundary for [`Value`].
//!
//! Conversions in both directions are total: any JSON document maps onto a
//! [`Value`], and any [`Value`] renders as JSON. Scalars that JSON cannot
//! represent natively render as strings (UUIDs, RFC 3339 datetimes), and a
//! validated instance renders as the object of its fields.

use serde::{Serialize, Serializer};

use super::Value;

impl From<serde_json::Value> for Value {
    /// JSON numbers become [`Value::Int`] when exactly representable as an
    /// `i64`, and [`Value::Float`] otherwise (including unsigned values
    /// above `i64::MAX`).
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            serde_json::Value::String(value) => Self::String(value),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    /// Non-finite floats have no JSON representation and render as `null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(*value),
            Value::Int(value) => Self::Number((*value).into()),
            Value::Float(value) => {
                serde_json::Number::from_f64(*value).map_or(Self::Null, Self::Number)
            }
            Value::String(value) => Self::String(value.clone()),
            Value::Uuid(uuid) => Self::String(uuid.to_string()),
            Value::DateTime(datetime) => Self::String(format_datetime(*datetime)),
            Value::List(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Map(entries) => Self::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::from(value)))
                    .collect(),
            ),
            Value::Instance(instance) => Self::from(&instance.to_value()),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Uuid(uuid) => serializer.collect_str(uuid),
            Self::DateTime(datetime) => serializer.serialize_str(&format_datetime(*datetime)),
            Self::List(items) => serializer.collect_seq(items),
            Self::Map(entries) => serializer.collect_map(entries),
            Self::Instance(instance) => instance.serialize(serializer),
        }
    }
}

/// Formats a datetime in RFC 3339 form with a `Z` suffix, keeping
/// fractional seconds only when present.
pub(crate) fn format_datetime(datetime: chrono::DateTime<chrono::Utc>) -> String {
    datetime.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}
