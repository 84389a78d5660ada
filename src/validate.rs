//! The validation engine.
//!
//! Given untrusted input, a [`Model`] either produces a fully populated
//! [`Instance`] or a [`ValidationError`] listing every failure found in a
//! single pass. Validation never fails fast: each declared field is checked
//! and every offending location is reported at once.

use std::collections::BTreeMap;

use nonempty::{NonEmpty, nonempty};

use crate::{
    AttributeSource, Instance, Model, Value,
    schema::{Extra, Field, FieldType},
};

mod coerce;
mod error;

pub use error::{ErrorKind, FieldError, Loc, Segment, ValidationError};

impl Model {
    /// Validates untrusted input against this model.
    ///
    /// The input must be a [`Value::Map`] or a [`Value::Instance`]. An
    /// instance of this exact schema (by fingerprint) passes through
    /// unchanged; an instance of any other schema is re-validated from its
    /// field data.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every field that failed
    /// lookup, coercion, or a constraint, plus any extra keys the model
    /// forbids.
    pub fn validate(&self, input: &Value) -> Result<Instance, ValidationError> {
        tracing::debug!(model = %self.name(), "validating input");
        let mut errors = Vec::new();
        let instance = match input {
            Value::Map(entries) => validate_entries(self, entries, &Loc::root(), &mut errors),
            Value::Instance(instance) => {
                if instance.model().fingerprint() == self.fingerprint() {
                    Some(instance.clone())
                } else {
                    validate_entries(self, &instance.raw_map(), &Loc::root(), &mut errors)
                }
            }
            other => {
                errors.push(FieldError::new(
                    Loc::root(),
                    ErrorKind::ModelType,
                    other.clone(),
                ));
                None
            }
        };
        finish(self, instance, errors)
    }

    /// Parses `text` as JSON and validates the result.
    ///
    /// # Errors
    ///
    /// Malformed JSON yields a single `json_syntax` error; a root that is
    /// not a JSON object yields `model_type`. Otherwise the error behaviour
    /// matches [`Model::validate`].
    pub fn validate_json(&self, text: &str) -> Result<Instance, ValidationError> {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(json) => self.validate(&Value::from(json)),
            Err(error) => {
                tracing::debug!(model = %self.name(), %error, "input is not valid JSON");
                Err(ValidationError::new(
                    self.name().to_string(),
                    nonempty![FieldError::new(
                        Loc::root(),
                        ErrorKind::JsonSyntax {
                            message: error.to_string(),
                        },
                        Value::Null,
                    )],
                ))
            }
        }
    }

    /// Validates an object that exposes named attributes.
    ///
    /// Each declared field is looked up through the [`AttributeSource`] by
    /// alias and, where configured, by name. The trait cannot enumerate
    /// attributes, so undeclared attributes are invisible here and the
    /// model's extra-data policy has no effect on this path.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] exactly as [`Model::validate`] does,
    /// except that `extra_forbidden` can never occur.
    pub fn validate_attributes(
        &self,
        source: &impl AttributeSource,
    ) -> Result<Instance, ValidationError> {
        tracing::debug!(model = %self.name(), "validating attribute source");
        let mut entries = BTreeMap::new();
        for field in self.fields() {
            let (key, value) = if let Some(alias) = field.alias() {
                match source.attribute(alias) {
                    Some(value) => (alias, value),
                    None if self.config().populate_by_name() => {
                        match source.attribute(field.name()) {
                            Some(value) => (field.name().as_str(), value),
                            None => continue,
                        }
                    }
                    None => continue,
                }
            } else {
                match source.attribute(field.name()) {
                    Some(value) => (field.name().as_str(), value),
                    None => continue,
                }
            };
            entries.insert(key.to_string(), value);
        }

        let mut errors = Vec::new();
        let instance = validate_entries(self, &entries, &Loc::root(), &mut errors);
        finish(self, instance, errors)
    }
}

fn finish(
    model: &Model,
    instance: Option<Instance>,
    errors: Vec<FieldError>,
) -> Result<Instance, ValidationError> {
    match NonEmpty::from_vec(errors) {
        None => Ok(instance.expect("validation without errors always produces an instance")),
        Some(errors) => {
            tracing::debug!(
                model = %model.name(),
                count = errors.len(),
                "validation failed"
            );
            Err(ValidationError::new(model.name().to_string(), errors))
        }
    }
}

/// Validates one mapping against a model, recording errors under `loc`.
///
/// Returns `None` when any field fails; the caller reads the verdict from
/// `errors`.
pub(crate) fn validate_entries(
    model: &Model,
    entries: &BTreeMap<String, Value>,
    loc: &Loc,
    errors: &mut Vec<FieldError>,
) -> Option<Instance> {
    let mut values = Vec::with_capacity(model.fields().len());
    let mut ok = true;

    for field in model.fields() {
        let strict = field.strict().unwrap_or(model.config().strict());
        let field_loc = loc.key(field.name().as_str());

        if let Some(input) = lookup(field, model, entries) {
            match check_field(field, strict, input, &field_loc, errors) {
                Some(coerced) => values.push(coerced),
                None => {
                    ok = false;
                    values.push(Value::Null);
                }
            }
        } else if let Some(default) = field.default() {
            // Defaults were validated when the model was built.
            values.push(default.clone());
        } else if field.field_type().is_optional() {
            values.push(Value::Null);
        } else {
            errors.push(FieldError::new(field_loc, ErrorKind::Missing, Value::Null));
            ok = false;
            values.push(Value::Null);
        }
    }

    let mut extras = BTreeMap::new();
    match model.config().extra() {
        Extra::Ignore => {}
        Extra::Forbid => {
            for (key, value) in entries {
                if !model.claims_key(key) {
                    errors.push(FieldError::new(
                        loc.key(key),
                        ErrorKind::ExtraForbidden,
                        value.clone(),
                    ));
                    ok = false;
                }
            }
        }
        Extra::Allow => {
            for (key, value) in entries {
                // An unclaimed key that matches a declared field name (an
                // aliased field's own name) is dropped rather than stored:
                // dumps key declared fields by name, and a stored copy
                // would shadow the validated value.
                if !model.claims_key(key) && model.index_of(key).is_none() {
                    extras.insert(key.clone(), value.clone());
                }
            }
        }
    }

    ok.then(|| Instance::from_parts(model.clone(), values, extras))
}

/// Finds the input value for a field: the alias when one is declared (plus
/// the name under `populate_by_name`), the name otherwise.
fn lookup<'a>(
    field: &Field,
    model: &Model,
    entries: &'a BTreeMap<String, Value>,
) -> Option<&'a Value> {
    if let Some(alias) = field.alias() {
        entries.get(alias).or_else(|| {
            model
                .config()
                .populate_by_name()
                .then(|| entries.get(field.name().as_str()))
                .flatten()
        })
    } else {
        entries.get(field.name().as_str())
    }
}

/// Coerces one value to a field's type and checks its constraints.
///
/// Every failure is pushed to `errors`; `None` means at least one was.
/// Shared by input validation, build-time default validation, and
/// validated assignment.
pub(crate) fn check_field(
    field: &Field,
    strict: bool,
    input: &Value,
    loc: &Loc,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    let value = check_type(field.field_type(), strict, input, loc, errors)?;
    let before = errors.len();
    check_constraints(field, &value, loc, errors);
    (errors.len() == before).then_some(value)
}

fn check_type(
    ty: &FieldType,
    strict: bool,
    input: &Value,
    loc: &Loc,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    match ty {
        FieldType::Optional(inner) => {
            if input.is_null() {
                Some(Value::Null)
            } else {
                check_type(inner, strict, input, loc, errors)
            }
        }
        FieldType::List(element) => {
            let Value::List(items) = input else {
                errors.push(FieldError::new(
                    loc.clone(),
                    ErrorKind::ListType,
                    input.clone(),
                ));
                return None;
            };
            let mut coerced = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                if let Some(value) = check_type(element, strict, item, &loc.index(index), errors) {
                    coerced.push(value);
                }
            }
            (coerced.len() == items.len()).then(|| Value::List(coerced))
        }
        FieldType::Map(value_ty) => {
            let Value::Map(entries) = input else {
                errors.push(FieldError::new(
                    loc.clone(),
                    ErrorKind::MapType,
                    input.clone(),
                ));
                return None;
            };
            let mut coerced = BTreeMap::new();
            for (key, item) in entries {
                if let Some(value) = check_type(value_ty, strict, item, &loc.key(key), errors) {
                    coerced.insert(key.clone(), value);
                }
            }
            (coerced.len() == entries.len()).then(|| Value::Map(coerced))
        }
        FieldType::Model(model) => match input {
            Value::Instance(instance) => {
                if instance.model().fingerprint() == model.fingerprint() {
                    Some(input.clone())
                } else {
                    validate_entries(model, &instance.raw_map(), loc, errors)
                        .map(Value::Instance)
                }
            }
            Value::Map(entries) => {
                validate_entries(model, entries, loc, errors).map(Value::Instance)
            }
            other => {
                errors.push(FieldError::new(
                    loc.clone(),
                    ErrorKind::ModelType,
                    other.clone(),
                ));
                None
            }
        },
        scalar => match coerce::coerce_scalar(scalar, input, strict) {
            Ok(value) => Some(value),
            Err(kind) => {
                errors.push(FieldError::new(loc.clone(), kind, input.clone()));
                None
            }
        },
    }
}

fn check_constraints(field: &Field, value: &Value, loc: &Loc, errors: &mut Vec<FieldError>) {
    use std::cmp::Ordering;

    use crate::schema::Number;

    let constraints = field.constraints();
    if constraints.is_empty() || value.is_null() {
        return;
    }

    let mut fail = |kind: ErrorKind| {
        errors.push(FieldError::new(loc.clone(), kind, value.clone()));
    };

    let number = match value {
        Value::Int(value) => Some(Number::Int(*value)),
        Value::Float(value) => Some(Number::Float(*value)),
        _ => None,
    };
    if let Some(number) = number {
        if let Some(limit) = constraints.gt() {
            if limit.compare(number) != Some(Ordering::Greater) {
                fail(ErrorKind::GreaterThan { limit });
            }
        }
        if let Some(limit) = constraints.ge() {
            if !matches!(
                limit.compare(number),
                Some(Ordering::Greater | Ordering::Equal)
            ) {
                fail(ErrorKind::GreaterThanEqual { limit });
            }
        }
        if let Some(limit) = constraints.lt() {
            if limit.compare(number) != Some(Ordering::Less) {
                fail(ErrorKind::LessThan { limit });
            }
        }
        if let Some(limit) = constraints.le() {
            if !matches!(limit.compare(number), Some(Ordering::Less | Ordering::Equal)) {
                fail(ErrorKind::LessThanEqual { limit });
            }
        }
    }

    let length = match value {
        Value::String(text) => Some(text.chars().count()),
        Value::List(items) => Some(items.len()),
        Value::Map(entries) => Some(entries.len()),
        _ => None,
    };
    if let Some(length) = length {
        if let Some(min) = constraints.min_length() {
            if length < min {
                fail(ErrorKind::TooShort { min });
            }
        }
        if let Some(max) = constraints.max_length() {
            if length > max {
                fail(ErrorKind::TooLong { max });
            }
        }
    }

    if let (Some(pattern), Value::String(text)) = (constraints.pattern(), value) {
        if !pattern.is_match(text) {
            fail(ErrorKind::PatternMismatch {
                pattern: pattern.as_str().to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        DumpOptions,
        schema::{Constraints, FieldName, ModelConfig},
    };

    fn name(s: &str) -> FieldName {
        s.parse().unwrap()
    }

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
        )
    }

    fn user_model() -> Model {
        Model::builder(name("User"))
            .field(Field::new(name("id"), FieldType::Int))
            .field(Field::new(name("name"), FieldType::String).with_default("John Doe"))
            .field(Field::new(
                name("signup_ts"),
                FieldType::optional(FieldType::DateTime),
            ))
            .field(Field::new(
                name("friends"),
                FieldType::list(FieldType::Int),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn coerces_and_applies_defaults() {
        let model = user_model();
        let input = map(&[
            ("id", Value::from("123")),
            ("signup_ts", Value::from("2019-06-01T12:22:00Z")),
            (
                "friends",
                Value::List(vec![Value::Int(1), Value::from("2"), Value::Float(3.0)]),
            ),
        ]);

        let instance = model.validate(&input).unwrap();
        assert_eq!(instance.get("id"), Some(&Value::Int(123)));
        assert_eq!(instance.get("name"), Some(&Value::from("John Doe")));
        assert_eq!(
            instance.get("signup_ts"),
            Some(&Value::DateTime(
                Utc.with_ymd_and_hms(2019, 6, 1, 12, 22, 0).unwrap()
            ))
        );
        assert_eq!(
            instance.get("friends"),
            Some(&Value::List(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3)
            ]))
        );
    }

    #[test]
    fn missing_optional_field_is_null() {
        let model = user_model();
        let instance = model
            .validate(&map(&[
                ("id", Value::Int(1)),
                ("friends", Value::List(vec![])),
            ]))
            .unwrap();
        assert_eq!(instance.get("signup_ts"), Some(&Value::Null));
    }

    #[test]
    fn accumulates_all_errors_with_paths() {
        let model = user_model();
        let input = map(&[
            ("id", Value::from("not an int")),
            (
                "friends",
                Value::List(vec![Value::Int(1), Value::from("x"), Value::Bool(true)]),
            ),
        ]);

        let error = model.validate(&input).unwrap_err();
        assert_eq!(error.model(), "User");
        assert_eq!(error.error_count(), 3);

        let summary: Vec<(String, &str)> = error
            .errors()
            .map(|e| (e.loc().to_string(), e.kind().code()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id".to_string(), "int_parsing"),
                ("friends.1".to_string(), "int_parsing"),
                ("friends.2".to_string(), "int_type"),
            ]
        );
    }

    #[test]
    fn non_mapping_input_is_model_type() {
        let model = user_model();
        let error = model.validate(&Value::Int(7)).unwrap_err();
        assert_eq!(error.error_count(), 1);
        let first = error.errors().next().unwrap();
        assert_eq!(first.kind().code(), "model_type");
        assert!(first.loc().is_root());
    }

    #[test]
    fn validate_json_happy_path() {
        let model = user_model();
        let instance = model
            .validate_json(r#"{"id": "123", "friends": [1, 2]}"#)
            .unwrap();
        assert_eq!(instance.get("id"), Some(&Value::Int(123)));
    }

    #[test]
    fn validate_json_syntax_error() {
        let model = user_model();
        let error = model.validate_json("{not json").unwrap_err();
        assert_eq!(error.errors().next().unwrap().kind().code(), "json_syntax");
    }

    #[test]
    fn validate_json_non_object_root() {
        let model = user_model();
        let error = model.validate_json("[1, 2, 3]").unwrap_err();
        assert_eq!(error.errors().next().unwrap().kind().code(), "model_type");
    }

    #[test]
    fn extra_ignore_drops_undeclared_keys() {
        let model = user_model();
        let instance = model
            .validate(&map(&[
                ("id", Value::Int(1)),
                ("friends", Value::List(vec![])),
                ("unexpected", Value::from("dropped")),
            ]))
            .unwrap();
        assert_eq!(instance.extras().count(), 0);
    }

    #[test]
    fn extra_forbid_errors_per_key() {
        let model = Model::builder(name("M"))
            .field(Field::new(name("x"), FieldType::Int))
            .config(ModelConfig::new().with_extra(Extra::Forbid))
            .build()
            .unwrap();

        let error = model
            .validate(&map(&[
                ("x", Value::Int(1)),
                ("a", Value::Int(2)),
                ("b", Value::Int(3)),
            ]))
            .unwrap_err();
        assert_eq!(error.error_count(), 2);
        assert!(
            error
                .errors()
                .all(|e| e.kind().code() == "extra_forbidden")
        );
    }

    #[test]
    fn extra_allow_stores_undeclared_keys() {
        let model = Model::builder(name("M"))
            .field(Field::new(name("x"), FieldType::Int))
            .config(ModelConfig::new().with_extra(Extra::Allow))
            .build()
            .unwrap();

        let instance = model
            .validate(&map(&[("x", Value::Int(1)), ("note", Value::from("kept"))]))
            .unwrap();
        assert_eq!(instance.extra("note"), Some(&Value::from("kept")));

        // Stored extras survive a dump round trip.
        let dumped = instance.dump(&DumpOptions::default());
        let again = model.validate(&dumped).unwrap();
        assert_eq!(again.extra("note"), Some(&Value::from("kept")));
    }

    #[test]
    fn extra_allow_drops_keys_colliding_with_field_names() {
        let model = Model::builder(name("M"))
            .field(Field::new(name("user_name"), FieldType::String).with_alias("userName"))
            .config(ModelConfig::new().with_extra(Extra::Allow))
            .build()
            .unwrap();

        let instance = model
            .validate(&map(&[
                ("userName", Value::from("alice")),
                ("user_name", Value::from("bob")),
            ]))
            .unwrap();
        assert_eq!(instance.get("user_name"), Some(&Value::from("alice")));
        assert_eq!(instance.extras().count(), 0);
    }

    #[test]
    fn revalidated_instance_keeps_field_values_over_collisions() {
        let source = Model::builder(name("Source"))
            .field(Field::new(name("user_name"), FieldType::String).with_alias("userName"))
            .config(ModelConfig::new().with_extra(Extra::Allow))
            .build()
            .unwrap();
        let inner = source
            .validate(&map(&[
                ("userName", Value::from("alice")),
                ("user_name", Value::from("bob")),
            ]))
            .unwrap();

        let target = Model::builder(name("Target"))
            .field(Field::new(name("user_name"), FieldType::String))
            .build()
            .unwrap();
        let outer = Model::builder(name("Outer"))
            .field(Field::new(name("data"), FieldType::Model(target)))
            .build()
            .unwrap();

        let validated = outer
            .validate(&map(&[("data", Value::from(inner))]))
            .unwrap();
        let nested = validated.get("data").unwrap().as_instance().unwrap();
        assert_eq!(nested.get("user_name"), Some(&Value::from("alice")));
    }

    #[test]
    fn alias_lookup_and_populate_by_name() {
        let aliased = |populate| {
            Model::builder(name("M"))
                .field(Field::new(name("user_name"), FieldType::String).with_alias("userName"))
                .config(ModelConfig::new().with_populate_by_name(populate))
                .build()
                .unwrap()
        };

        let by_alias = map(&[("userName", Value::from("alice"))]);
        let by_name = map(&[("user_name", Value::from("alice"))]);

        let model = aliased(false);
        assert!(model.validate(&by_alias).is_ok());
        let error = model.validate(&by_name).unwrap_err();
        assert_eq!(error.errors().next().unwrap().kind().code(), "missing");

        let model = aliased(true);
        assert!(model.validate(&by_alias).is_ok());
        assert!(model.validate(&by_name).is_ok());
    }

    #[test]
    fn strict_model_rejects_widenings() {
        let model = Model::builder(name("M"))
            .field(Field::new(name("x"), FieldType::Int))
            .config(ModelConfig::new().with_strict(true))
            .build()
            .unwrap();

        assert!(model.validate(&map(&[("x", Value::Int(1))])).is_ok());
        let error = model.validate(&map(&[("x", Value::from("1"))])).unwrap_err();
        assert_eq!(error.errors().next().unwrap().kind().code(), "int_type");
    }

    #[test]
    fn per_field_strict_override() {
        let model = Model::builder(name("M"))
            .field(Field::new(name("lax"), FieldType::Int))
            .field(Field::new(name("exact"), FieldType::Int).with_strict(true))
            .build()
            .unwrap();

        let error = model
            .validate(&map(&[
                ("lax", Value::from("1")),
                ("exact", Value::from("2")),
            ]))
            .unwrap_err();
        let summary: Vec<(String, &str)> = error
            .errors()
            .map(|e| (e.loc().to_string(), e.kind().code()))
            .collect();
        assert_eq!(summary, vec![("exact".to_string(), "int_type")]);
    }

    #[test]
    fn strict_mode_recurses_into_containers() {
        let model = Model::builder(name("M"))
            .field(Field::new(name("xs"), FieldType::list(FieldType::Int)))
            .config(ModelConfig::new().with_strict(true))
            .build()
            .unwrap();

        let error = model
            .validate(&map(&[("xs", Value::List(vec![Value::from("1")]))]))
            .unwrap_err();
        assert_eq!(error.errors().next().unwrap().loc().to_string(), "xs.0");
    }

    #[test]
    fn constraints_checked_after_coercion() {
        let model = Model::builder(name("M"))
            .field(
                Field::new(name("count"), FieldType::Int)
                    .with_constraints(Constraints::new().with_gt(0i64).with_le(100i64)),
            )
            .field(
                Field::new(name("code"), FieldType::String).with_constraints(
                    Constraints::new()
                        .with_min_length(2)
                        .with_pattern("^[a-z]+$")
                        .unwrap(),
                ),
            )
            .build()
            .unwrap();

        // The string "50" coerces first, then passes the bounds.
        assert!(
            model
                .validate(&map(&[
                    ("count", Value::from("50")),
                    ("code", Value::from("ab"))
                ]))
                .is_ok()
        );

        let error = model
            .validate(&map(&[
                ("count", Value::Int(0)),
                ("code", Value::from("A")),
            ]))
            .unwrap_err();
        let codes: Vec<&str> = error.errors().map(|e| e.kind().code()).collect();
        assert_eq!(codes, vec!["greater_than", "too_short", "pattern_mismatch"]);
    }

    #[test]
    fn mixed_domain_bound_comparison() {
        let model = Model::builder(name("M"))
            .field(
                Field::new(name("ratio"), FieldType::Float)
                    .with_constraints(Constraints::new().with_ge(0i64).with_lt(1i64)),
            )
            .build()
            .unwrap();

        assert!(model.validate(&map(&[("ratio", Value::Float(0.5))])).is_ok());
        assert!(
            model
                .validate(&map(&[("ratio", Value::Float(1.0))]))
                .is_err()
        );
    }

    #[test]
    fn nested_model_validates_recursively() {
        let address = Model::builder(name("Address"))
            .field(Field::new(name("city"), FieldType::String))
            .field(Field::new(name("zip"), FieldType::String))
            .build()
            .unwrap();
        let person = Model::builder(name("Person"))
            .field(Field::new(name("name"), FieldType::String))
            .field(Field::new(name("addr"), FieldType::Model(address.clone())))
            .build()
            .unwrap();

        let instance = person
            .validate(&map(&[
                ("name", Value::from("anna")),
                (
                    "addr",
                    map(&[("city", Value::from("Berlin")), ("zip", Value::from("10115"))]),
                ),
            ]))
            .unwrap();
        let addr = instance.get("addr").unwrap().as_instance().unwrap();
        assert_eq!(addr.get("city"), Some(&Value::from("Berlin")));

        // Nested errors carry the full path.
        let error = person
            .validate(&map(&[
                ("name", Value::from("anna")),
                ("addr", map(&[("city", Value::Int(1))])),
            ]))
            .unwrap_err();
        let summary: Vec<(String, &str)> = error
            .errors()
            .map(|e| (e.loc().to_string(), e.kind().code()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("addr.city".to_string(), "string_type"),
                ("addr.zip".to_string(), "missing"),
            ]
        );
    }

    #[test]
    fn matching_instance_passes_through() {
        let address = |city: &str| {
            let model = Model::builder(name("Address"))
                .field(Field::new(name("city"), FieldType::String))
                .build()
                .unwrap();
            model
                .validate(&map(&[("city", Value::from(city))]))
                .unwrap()
        };

        // Two independently built but identical schemas interoperate.
        let person = Model::builder(name("Person"))
            .field(Field::new(
                name("addr"),
                FieldType::Model(
                    Model::builder(name("Address"))
                        .field(Field::new(name("city"), FieldType::String))
                        .build()
                        .unwrap(),
                ),
            ))
            .build()
            .unwrap();

        let instance = person
            .validate(&map(&[("addr", Value::Instance(address("Oslo")))]))
            .unwrap();
        let addr = instance.get("addr").unwrap().as_instance().unwrap();
        assert_eq!(addr.get("city"), Some(&Value::from("Oslo")));
    }

    #[test]
    fn foreign_instance_is_revalidated() {
        let loose = Model::builder(name("Loose"))
            .field(Field::new(name("x"), FieldType::String))
            .build()
            .unwrap();
        let strict_int = Model::builder(name("Target"))
            .field(Field::new(name("x"), FieldType::Int))
            .build()
            .unwrap();

        let source = loose.validate(&map(&[("x", Value::from("12"))])).unwrap();
        let instance = strict_int
            .validate(&Value::Instance(source))
            .unwrap();
        assert_eq!(instance.get("x"), Some(&Value::Int(12)));

        let source = loose.validate(&map(&[("x", Value::from("abc"))])).unwrap();
        assert!(strict_int.validate(&Value::Instance(source)).is_err());
    }

    #[test]
    fn validate_attributes_by_alias_and_name() {
        let model = Model::builder(name("M"))
            .field(Field::new(name("user_name"), FieldType::String).with_alias("userName"))
            .field(Field::new(name("age"), FieldType::Int))
            .config(
                ModelConfig::new()
                    .with_populate_by_name(true)
                    .with_extra(Extra::Forbid),
            )
            .build()
            .unwrap();

        let source = BTreeMap::from([
            ("user_name".to_string(), Value::from("bob")),
            ("age".to_string(), Value::from("44")),
            // Invisible through the trait: the extra policy cannot apply.
            ("undeclared".to_string(), Value::from("ignored")),
        ]);

        let instance = model.validate_attributes(&source).unwrap();
        assert_eq!(instance.get("user_name"), Some(&Value::from("bob")));
        assert_eq!(instance.get("age"), Some(&Value::Int(44)));
    }

    #[test]
    fn validate_attributes_from_instance() {
        let source_model = Model::builder(name("Source"))
            .field(Field::new(name("id"), FieldType::Int))
            .field(Field::new(name("note"), FieldType::String))
            .build()
            .unwrap();
        let target = Model::builder(name("Target"))
            .field(Field::new(name("id"), FieldType::Int))
            .build()
            .unwrap();

        let source = source_model
            .validate(&map(&[
                ("id", Value::Int(9)),
                ("note", Value::from("kept elsewhere")),
            ]))
            .unwrap();

        let instance = target.validate_attributes(&source).unwrap();
        assert_eq!(instance.get("id"), Some(&Value::Int(9)));
        assert_eq!(instance.get("note"), None);
    }

    #[test]
    fn map_typed_field_validates_entries() {
        let model = Model::builder(name("M"))
            .field(Field::new(
                name("scores"),
                FieldType::map(FieldType::Int),
            ))
            .build()
            .unwrap();

        let instance = model
            .validate(&map(&[(
                "scores",
                map(&[("a", Value::from("1")), ("b", Value::Int(2))]),
            )]))
            .unwrap();
        assert_eq!(
            instance.get("scores"),
            Some(&Value::Map(BTreeMap::from([
                ("a".to_string(), Value::Int(1)),
                ("b".to_string(), Value::Int(2)),
            ])))
        );

        let error = model
            .validate(&map(&[("scores", map(&[("a", Value::from("x"))]))]))
            .unwrap_err();
        assert_eq!(
            error.errors().next().unwrap().loc().to_string(),
            "scores.a"
        );
    }
}
