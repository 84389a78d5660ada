//! Materialized validation results.

use std::collections::BTreeMap;

use nonempty::nonempty;
use serde::{Serialize, Serializer};

use crate::{
    Model, Value,
    schema::{Extra, FieldName},
    validate::{self, ErrorKind, FieldError, Loc, ValidationError},
};

/// A validated instance of a [`Model`].
///
/// Every declared field holds exactly one value satisfying its declared
/// type and constraints; defaulted and assigned values are held to the same
/// rules as validated input, so the guarantee survives mutation. Extras are
/// stored only when the model's policy is [`Extra::Allow`], and are
/// untyped.
#[derive(Debug, Clone)]
pub struct Instance {
    model: Model,
    /// One value per declared field, in declaration order.
    values: Vec<Value>,
    extras: BTreeMap<String, Value>,
}

impl Instance {
    pub(crate) const fn from_parts(
        model: Model,
        values: Vec<Value>,
        extras: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            model,
            values,
            extras,
        }
    }

    /// The model this instance was validated against.
    #[must_use]
    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// The value of the declared field `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.model
            .index_of(name)
            .map(|index| &self.values[index])
    }

    /// The stored extra value under `name`, if the model allows extras and
    /// the input carried one.
    #[must_use]
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extras.get(name)
    }

    /// Iterates over declared fields and their values, in declaration
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.model
            .fields()
            .iter()
            .map(crate::Field::name)
            .zip(self.values.iter())
    }

    /// Iterates over stored extras, in key order.
    pub fn extras(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extras.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// The number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the model declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Validated assignment.
    ///
    /// The value is coerced and checked against the field's declared type
    /// and constraints exactly as input is, so assignment cannot break the
    /// instance's guarantees. Assigning an undeclared name stores an
    /// untyped extra when the model's policy is [`Extra::Allow`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with the field as the location when
    /// the instance is frozen (`frozen_instance`), the name is undeclared
    /// and extras are not allowed (`unknown_field`), or the value fails
    /// coercion or a constraint.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ValidationError> {
        let value = value.into();
        let loc = Loc::field(name);
        let fail = |kind: ErrorKind, input: Value| {
            ValidationError::new(
                self.model.name().to_string(),
                nonempty![FieldError::new(loc.clone(), kind, input)],
            )
        };

        if self.model.config().frozen() {
            return Err(fail(ErrorKind::FrozenInstance, value));
        }

        let Some(index) = self.model.index_of(name) else {
            if self.model.config().extra() == Extra::Allow {
                self.extras.insert(name.to_string(), value);
                return Ok(());
            }
            return Err(fail(ErrorKind::UnknownField, value));
        };

        let field = &self.model.fields()[index];
        let strict = field.strict().unwrap_or(self.model.config().strict());
        let mut errors = Vec::new();
        let coerced = validate::check_field(field, strict, &value, &loc, &mut errors);
        match (coerced, nonempty::NonEmpty::from_vec(errors)) {
            (Some(coerced), None) => {
                self.values[index] = coerced;
                Ok(())
            }
            (_, Some(errors)) => Err(ValidationError::new(
                self.model.name().to_string(),
                errors,
            )),
            (None, None) => unreachable!("a rejected assignment always records an error"),
        }
    }

    /// The stored values keyed by field name, plus extras, with nested
    /// instances preserved as instances. Used to re-validate an instance
    /// against another schema. Extras never hold a declared field name,
    /// so no key appears twice.
    pub(crate) fn raw_map(&self) -> BTreeMap<String, Value> {
        let mut entries: BTreeMap<String, Value> = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        for (key, value) in &self.extras {
            entries.insert(key.clone(), value.clone());
        }
        entries
    }
}

impl PartialEq for Instance {
    /// Instances are equal when their schemas share a fingerprint and all
    /// field values and extras match.
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.values == other.values && self.extras == other.extras
    }
}

impl Serialize for Instance {
    /// Serializes as the object of declared fields followed by extras.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.iter()
                .map(|(name, value)| (name.as_str(), value))
                .chain(self.extras()),
        )
    }
}
