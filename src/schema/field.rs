use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

use crate::{
    Value,
    schema::{Constraints, FieldType},
};

/// A validated field identifier.
///
/// Names are non-empty, start with an ASCII letter or underscore, and
/// continue with ASCII letters, digits, or underscores. Model names follow
/// the same rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldName(NonEmptyString);

impl FieldName {
    /// Creates a new `FieldName` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNameError`] if the string is empty, starts with a
    /// digit, or contains characters other than ASCII letters, digits, and
    /// underscores.
    pub fn new(s: String) -> Result<Self, InvalidNameError> {
        let mut chars = s.chars();
        let leading_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !leading_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(InvalidNameError(s));
        }

        let non_empty = NonEmptyString::new(s).map_err(|_| InvalidNameError(String::new()))?;
        Ok(Self(non_empty))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FieldName {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FieldName {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for FieldName {
    type Err = InvalidNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for FieldName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid field or model name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid name '{0}': must be non-empty, start with a letter or underscore, and contain only letters, digits, and underscores"
)]
pub struct InvalidNameError(String);

/// The declaration of a single model field.
///
/// A field pairs a [`FieldName`] with a declared [`FieldType`] and,
/// optionally, a default value, an alias (the external key used to look the
/// field up in input), a strictness override, and [`Constraints`].
///
/// Declarations are assembled fluently and checked when the owning model is
/// built; see [`ModelBuilder::build`](crate::ModelBuilder::build).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: FieldName,
    ty: FieldType,
    default: Option<Value>,
    alias: Option<String>,
    strict: Option<bool>,
    constraints: Constraints,
}

impl Field {
    /// Creates a required field of the given type.
    #[must_use]
    pub const fn new(name: FieldName, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            default: None,
            alias: None,
            strict: None,
            constraints: Constraints::new(),
        }
    }

    /// Declares a default value, making the field optional in input.
    ///
    /// The default is validated against the field's type and constraints
    /// when the model is built.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Declares an alias: the external key used to find this field in
    /// input, and emitted when dumping
    /// [`by_alias`](crate::DumpOptions::by_alias).
    ///
    /// When an alias is declared the field's own name is only accepted in
    /// input if the model sets
    /// [`populate_by_name`](crate::ModelConfig::with_populate_by_name).
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Overrides the model's strictness for this field alone.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Attaches constraints, checked after coercion.
    #[must_use]
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// The field's name.
    #[must_use]
    pub const fn name(&self) -> &FieldName {
        &self.name
    }

    /// The field's declared type.
    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.ty
    }

    /// The declared default value, if any.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The declared alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The per-field strictness override, if any.
    #[must_use]
    pub const fn strict(&self) -> Option<bool> {
        self.strict
    }

    /// The field's constraints.
    #[must_use]
    pub const fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Whether input must supply this field.
    ///
    /// A field is required when it has no default and its type is not
    /// optional.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none() && !self.ty.is_optional()
    }

    /// The external key used to look this field up in input: the alias
    /// when one is declared, the name otherwise.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.name.as_str())
    }

    /// Replaces the declared default with an already-validated value.
    pub(crate) fn set_validated_default(&mut self, default: Value) {
        self.default = Some(default);
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("id"; "plain")]
    #[test_case("_private"; "leading underscore")]
    #[test_case("snake_case_2"; "digits after first")]
    #[test_case("CamelCase"; "uppercase")]
    fn valid_names(name: &str) {
        assert!(FieldName::new(name.to_string()).is_ok());
    }

    #[test_case(""; "empty")]
    #[test_case("1st"; "leading digit")]
    #[test_case("has space"; "space")]
    #[test_case("dash-ed"; "dash")]
    #[test_case("dotted.name"; "dot")]
    fn invalid_names(name: &str) {
        assert!(FieldName::new(name.to_string()).is_err());
    }

    #[test]
    fn name_display_and_deref() {
        let name: FieldName = "signup_ts".parse().unwrap();
        assert_eq!(name.to_string(), "signup_ts");
        assert_eq!(&*name, "signup_ts");
        assert_eq!(name.as_str(), "signup_ts");
    }

    #[test]
    fn required_depends_on_default_and_type() {
        let name: FieldName = "id".parse().unwrap();
        let field = Field::new(name.clone(), FieldType::Int);
        assert!(field.is_required());

        let field = Field::new(name.clone(), FieldType::Int).with_default(0i64);
        assert!(!field.is_required());

        let field = Field::new(name, FieldType::optional(FieldType::Int));
        assert!(!field.is_required());
    }

    #[test]
    fn lookup_key_prefers_alias() {
        let name: FieldName = "user_name".parse().unwrap();
        let field = Field::new(name.clone(), FieldType::String);
        assert_eq!(field.lookup_key(), "user_name");

        let field = Field::new(name, FieldType::String).with_alias("userName");
        assert_eq!(field.lookup_key(), "userName");
    }
}
