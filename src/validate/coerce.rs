//! Scalar coercion.
//!
//! Lax mode performs the documented widenings (string parsing, int-to-float,
//! epoch seconds to datetime); strict mode accepts only the exact value
//! kind. Containers and nested models are handled by the engine itself, not
//! here.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ErrorKind;
use crate::{FieldType, Value};

/// Strings accepted as `true` in lax boolean coercion.
const TRUTHY: &[&str] = &["true", "t", "yes", "y", "on", "1"];

/// Strings accepted as `false` in lax boolean coercion.
const FALSEY: &[&str] = &["false", "f", "no", "n", "off", "0"];

/// Coerces `input` to the scalar type `ty`.
///
/// `ty` must be one of the six scalar types; the engine never calls this
/// with a container or model type.
pub(crate) fn coerce_scalar(
    ty: &FieldType,
    input: &Value,
    strict: bool,
) -> Result<Value, ErrorKind> {
    match ty {
        FieldType::Bool => coerce_bool(input, strict),
        FieldType::Int => coerce_int(input, strict),
        FieldType::Float => coerce_float(input, strict),
        FieldType::String => coerce_string(input),
        FieldType::Uuid => coerce_uuid(input, strict),
        FieldType::DateTime => coerce_datetime(input, strict),
        FieldType::Optional(_) | FieldType::List(_) | FieldType::Map(_) | FieldType::Model(_) => {
            unreachable!("the engine resolves composite types before scalar coercion")
        }
    }
}

fn coerce_bool(input: &Value, strict: bool) -> Result<Value, ErrorKind> {
    match input {
        Value::Bool(value) => Ok(Value::Bool(*value)),
        Value::Int(value) if !strict => match value {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            _ => Err(ErrorKind::BoolParsing),
        },
        Value::String(text) if !strict => {
            if TRUTHY.iter().any(|t| text.eq_ignore_ascii_case(t)) {
                Ok(Value::Bool(true))
            } else if FALSEY.iter().any(|t| text.eq_ignore_ascii_case(t)) {
                Ok(Value::Bool(false))
            } else {
                Err(ErrorKind::BoolParsing)
            }
        }
        _ => Err(ErrorKind::BoolType),
    }
}

fn coerce_int(input: &Value, strict: bool) -> Result<Value, ErrorKind> {
    match input {
        Value::Int(value) => Ok(Value::Int(*value)),
        Value::Float(value) if !strict => float_to_int(*value).map(Value::Int),
        Value::String(text) if !strict => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ErrorKind::IntParsing),
        _ => Err(ErrorKind::IntType),
    }
}

/// Accepts only floats that are mathematically integers within `i64` range.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "range and fractional part are checked before the cast"
)]
fn float_to_int(value: f64) -> Result<i64, ErrorKind> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value <= i64::MAX as f64
    {
        Ok(value as i64)
    } else {
        Err(ErrorKind::IntFromFloat)
    }
}

fn coerce_float(input: &Value, strict: bool) -> Result<Value, ErrorKind> {
    match input {
        Value::Float(value) => Ok(Value::Float(*value)),
        #[expect(clippy::cast_precision_loss, reason = "documented lax widening")]
        Value::Int(value) if !strict => Ok(Value::Float(*value as f64)),
        Value::String(text) if !strict => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ErrorKind::FloatParsing),
        _ => Err(ErrorKind::FloatType),
    }
}

/// Strings only: numbers never silently stringify, in either mode.
fn coerce_string(input: &Value) -> Result<Value, ErrorKind> {
    match input {
        Value::String(text) => Ok(Value::String(text.clone())),
        _ => Err(ErrorKind::StringType),
    }
}

fn coerce_uuid(input: &Value, strict: bool) -> Result<Value, ErrorKind> {
    match input {
        Value::Uuid(uuid) => Ok(Value::Uuid(*uuid)),
        Value::String(text) if !strict => Uuid::parse_str(text)
            .map(Value::Uuid)
            .map_err(|_| ErrorKind::UuidParsing),
        _ => Err(ErrorKind::UuidType),
    }
}

fn coerce_datetime(input: &Value, strict: bool) -> Result<Value, ErrorKind> {
    match input {
        Value::DateTime(datetime) => Ok(Value::DateTime(*datetime)),
        Value::String(text) if !strict => DateTime::parse_from_rfc3339(text)
            .map(|datetime| Value::DateTime(datetime.with_timezone(&Utc)))
            .map_err(|_| ErrorKind::DateTimeParsing),
        Value::Int(seconds) if !strict => DateTime::<Utc>::from_timestamp(*seconds, 0)
            .map(Value::DateTime)
            .ok_or(ErrorKind::DateTimeParsing),
        _ => Err(ErrorKind::DateTimeType),
    }
}
