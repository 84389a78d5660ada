//! JSON Schema descriptions of models.
//!
//! Output-only: a [`Model`] renders as a standard JSON Schema (draft
//! 2020-12 vocabulary) describing the external form of its input, with
//! nested models collected into `$defs`.

use std::collections::BTreeMap;

use serde_json::json;

use crate::{
    Model,
    schema::{Extra, Field, FieldType, Number},
};

impl Model {
    /// The JSON Schema describing this model.
    ///
    /// Property keys follow the external form: aliases where declared.
    /// Nested models are collected once into `$defs` keyed by model name
    /// and referenced with `$ref`; `additionalProperties: false` is emitted
    /// when the model forbids extras.
    #[must_use]
    pub fn json_schema(&self) -> serde_json::Value {
        json_schema(self)
    }
}

/// See [`Model::json_schema`].
#[must_use]
pub fn json_schema(model: &Model) -> serde_json::Value {
    let mut defs = BTreeMap::new();
    for field in model.fields() {
        collect_defs(field.field_type(), &mut defs);
    }

    let mut schema = model_schema(model);
    if !defs.is_empty() {
        let defs: serde_json::Map<String, serde_json::Value> = defs.into_iter().collect();
        schema["$defs"] = serde_json::Value::Object(defs);
    }
    schema
}

/// The schema object for one model, without `$defs`.
fn model_schema(model: &Model) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for field in model.fields() {
        let key = field.lookup_key().to_string();
        properties.insert(key.clone(), field_schema(field));
        if field.is_required() {
            required.push(serde_json::Value::String(key));
        }
    }

    let mut schema = json!({
        "title": model.name().as_str(),
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = serde_json::Value::Array(required);
    }
    if model.config().extra() == Extra::Forbid {
        schema["additionalProperties"] = serde_json::Value::Bool(false);
    }
    schema
}

/// The schema for one field: its type schema with constraints and default
/// merged in.
fn field_schema(field: &Field) -> serde_json::Value {
    let mut schema = type_schema(field.field_type());

    // Constraints describe the non-null core; when the type is optional
    // they land on the non-null branch of the `anyOf`.
    if field.field_type().is_optional() {
        if let Some(serde_json::Value::Array(branches)) = schema.get_mut("anyOf") {
            if let Some(core) = branches.first_mut() {
                apply_constraints(field, core);
            }
        }
    } else {
        apply_constraints(field, &mut schema);
    }

    if let Some(default) = field.default() {
        schema["default"] = serde_json::Value::from(default);
    }
    schema
}

fn type_schema(ty: &FieldType) -> serde_json::Value {
    match ty {
        FieldType::Bool => json!({"type": "boolean"}),
        FieldType::Int => json!({"type": "integer"}),
        FieldType::Float => json!({"type": "number"}),
        FieldType::String => json!({"type": "string"}),
        FieldType::Uuid => json!({"type": "string", "format": "uuid"}),
        FieldType::DateTime => json!({"type": "string", "format": "date-time"}),
        FieldType::Optional(inner) => json!({
            "anyOf": [type_schema(inner), {"type": "null"}],
        }),
        FieldType::List(element) => json!({
            "type": "array",
            "items": type_schema(element),
        }),
        FieldType::Map(value) => json!({
            "type": "object",
            "additionalProperties": type_schema(value),
        }),
        FieldType::Model(model) => json!({
            "$ref": format!("#/$defs/{}", model.name()),
        }),
    }
}

fn apply_constraints(field: &Field, schema: &mut serde_json::Value) {
    let constraints = field.constraints();
    let number = |limit: Number| match limit {
        Number::Int(value) => json!(value),
        Number::Float(value) => json!(value),
    };

    if let Some(limit) = constraints.gt() {
        schema["exclusiveMinimum"] = number(limit);
    }
    if let Some(limit) = constraints.ge() {
        schema["minimum"] = number(limit);
    }
    if let Some(limit) = constraints.lt() {
        schema["exclusiveMaximum"] = number(limit);
    }
    if let Some(limit) = constraints.le() {
        schema["maximum"] = number(limit);
    }

    let (min_key, max_key) = match field.field_type().unwrap_optional() {
        FieldType::List(_) => ("minItems", "maxItems"),
        FieldType::Map(_) => ("minProperties", "maxProperties"),
        _ => ("minLength", "maxLength"),
    };
    if let Some(min) = constraints.min_length() {
        schema[min_key] = json!(min);
    }
    if let Some(max) = constraints.max_length() {
        schema[max_key] = json!(max);
    }

    if let Some(pattern) = constraints.pattern() {
        schema["pattern"] = json!(pattern.as_str());
    }
}

/// Collects every nested model reachable from `ty` into `defs`, keyed by
/// model name.
fn collect_defs(ty: &FieldType, defs: &mut BTreeMap<String, serde_json::Value>) {
    match ty {
        FieldType::Optional(inner) | FieldType::List(inner) | FieldType::Map(inner) => {
            collect_defs(inner, defs);
        }
        FieldType::Model(model) => {
            if !defs.contains_key(model.name().as_str()) {
                defs.insert(model.name().to_string(), model_schema(model));
                for field in model.fields() {
                    collect_defs(field.field_type(), defs);
                }
            }
        }
        _ => {}
    }
}
