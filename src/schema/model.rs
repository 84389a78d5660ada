use std::{collections::HashMap, fmt, sync::Arc};

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

use crate::{
    schema::{Constraints, Extra, Field, FieldName, FieldType, ModelConfig, Number},
    validate::{self, Loc, ValidationError},
};

/// A declarative model: a named collection of typed fields plus a
/// validation policy.
///
/// Models are built once via [`Model::builder`] and validated at build
/// time; a successfully built model can never produce an instance that
/// violates its own declarations. The handle is cheap to clone and shares
/// its internals, so models nest by value.
#[derive(Debug, Clone)]
pub struct Model {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    name: FieldName,
    fields: Vec<Field>,
    /// Field index by declared name.
    by_name: HashMap<String, usize>,
    /// Field index by every key accepted in input (alias, or name, or both
    /// under `populate_by_name`).
    by_input_key: HashMap<String, usize>,
    config: ModelConfig,
    fingerprint: String,
}

impl Model {
    /// Starts building a model with the given name.
    #[must_use]
    pub const fn builder(name: FieldName) -> ModelBuilder {
        ModelBuilder {
            name,
            fields: Vec::new(),
            config: ModelConfig::new(),
        }
    }

    /// The model's name.
    #[must_use]
    pub fn name(&self) -> &FieldName {
        &self.inner.name
    }

    /// The declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.inner.fields
    }

    /// Looks a field up by its declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|index| &self.inner.fields[index])
    }

    /// The model's validation policy.
    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.inner.config
    }

    /// A stable SHA-256 fingerprint of the logical schema.
    ///
    /// Two models with the same name, fields (in order), constraints,
    /// defaults, and configuration share a fingerprint even when built
    /// independently. Any logical change to the schema changes it. The
    /// fingerprint decides whether an already-validated instance passes
    /// through nested-model validation untouched.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.inner.fingerprint
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.inner.by_name.get(name).copied()
    }

    /// Whether some declared field accepts `key` in input.
    pub(crate) fn claims_key(&self, key: &str) -> bool {
        self.inner.by_input_key.contains_key(key)
    }
}

impl PartialEq for Model {
    /// Models compare by schema fingerprint: two independently built but
    /// logically identical schemas are equal.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || self.inner.fingerprint == other.inner.fingerprint
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.name)
    }
}

/// Fluent construction of a [`Model`].
///
/// Obtained from [`Model::builder`]; [`ModelBuilder::build`] performs all
/// schema-time validation.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: FieldName,
    fields: Vec<Field>,
    config: ModelConfig,
}

impl ModelBuilder {
    /// Adds a field declaration.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the model's validation policy.
    #[must_use]
    pub const fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the schema and builds the model.
    ///
    /// Declared defaults are coerced and checked here, against the same
    /// rules input is held to, so instances can never carry a value that
    /// violates its field's declaration.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] when a field name or alias collides with
    /// another field's name or alias, an alias is empty, a constraint
    /// cannot apply to the declared type, a bound pair is contradictory,
    /// or a declared default does not validate.
    pub fn build(self) -> Result<Model, BuildError> {
        let Self {
            name,
            mut fields,
            config,
        } = self;

        let mut by_name = HashMap::with_capacity(fields.len());
        let mut by_input_key = HashMap::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            if by_name.contains_key(field.name().as_str())
                || by_input_key.contains_key(field.name().as_str())
            {
                return Err(BuildError::DuplicateKey {
                    key: field.name().to_string(),
                });
            }
            by_name.insert(field.name().to_string(), index);

            if let Some(alias) = field.alias() {
                if alias.is_empty() {
                    return Err(BuildError::EmptyAlias {
                        field: field.name().clone(),
                    });
                }
                if by_input_key.contains_key(alias) || by_name.contains_key(alias) {
                    return Err(BuildError::DuplicateKey {
                        key: alias.to_string(),
                    });
                }
                by_input_key.insert(alias.to_string(), index);
                if config.populate_by_name() {
                    by_input_key.insert(field.name().to_string(), index);
                }
            } else {
                by_input_key.insert(field.name().to_string(), index);
            }

            check_constraint_compatibility(field)?;
        }

        for field in &mut fields {
            let Some(default) = field.default().cloned() else {
                continue;
            };
            let strict = field.strict().unwrap_or(config.strict());
            let loc = Loc::field(field.name().as_str());

            let mut errors = Vec::new();
            let coerced = validate::check_field(field, strict, &default, &loc, &mut errors);
            match (coerced, nonempty::NonEmpty::from_vec(errors)) {
                (Some(value), None) => field.set_validated_default(value),
                (_, Some(errors)) => {
                    return Err(BuildError::InvalidDefault {
                        field: field.name().clone(),
                        source: ValidationError::new(name.to_string(), errors),
                    });
                }
                (None, None) => unreachable!("a rejected default always records an error"),
            }
        }

        let fingerprint = fingerprint(&name, &fields, &config);

        Ok(Model {
            inner: Arc::new(Inner {
                name,
                fields,
                by_name,
                by_input_key,
                config,
                fingerprint,
            }),
        })
    }
}

fn check_constraint_compatibility(field: &Field) -> Result<(), BuildError> {
    let constraints = field.constraints();
    let ty = field.field_type();

    let mismatch = |constraint: &'static str| BuildError::ConstraintMismatch {
        field: field.name().clone(),
        constraint,
        ty: ty.to_string(),
    };

    if constraints.has_bounds() && !ty.supports_bounds() {
        return Err(mismatch("numeric bounds"));
    }
    if constraints.has_length() && !ty.supports_length() {
        return Err(mismatch("length bounds"));
    }
    if constraints.has_pattern() && !ty.supports_pattern() {
        return Err(mismatch("pattern"));
    }
    if constraints.is_contradictory() {
        return Err(BuildError::ContradictoryBounds {
            field: field.name().clone(),
        });
    }
    Ok(())
}

/// Computes the schema fingerprint: a SHA-256 hash of the Borsh-serialized
/// logical schema.
///
/// # Panics
///
/// Panics if borsh serialization fails (which should never happen for this
/// data structure).
fn fingerprint(name: &FieldName, fields: &[Field], config: &ModelConfig) -> String {
    #[derive(BorshSerialize)]
    enum TypeData {
        Bool,
        Int,
        Float,
        String,
        Uuid,
        DateTime,
        Optional(Box<TypeData>),
        List(Box<TypeData>),
        Map(Box<TypeData>),
        /// A nested model, identified by its own fingerprint.
        Model(String),
    }

    impl From<&FieldType> for TypeData {
        fn from(ty: &FieldType) -> Self {
            match ty {
                FieldType::Bool => Self::Bool,
                FieldType::Int => Self::Int,
                FieldType::Float => Self::Float,
                FieldType::String => Self::String,
                FieldType::Uuid => Self::Uuid,
                FieldType::DateTime => Self::DateTime,
                FieldType::Optional(inner) => Self::Optional(Box::new(inner.as_ref().into())),
                FieldType::List(element) => Self::List(Box::new(element.as_ref().into())),
                FieldType::Map(value) => Self::Map(Box::new(value.as_ref().into())),
                FieldType::Model(model) => Self::Model(model.fingerprint().to_string()),
            }
        }
    }

    #[derive(BorshSerialize)]
    enum NumberData {
        Int(i64),
        /// Float limits hash by bit pattern.
        Float(u64),
    }

    impl From<Number> for NumberData {
        fn from(number: Number) -> Self {
            match number {
                Number::Int(value) => Self::Int(value),
                Number::Float(value) => Self::Float(value.to_bits()),
            }
        }
    }

    #[derive(BorshSerialize)]
    struct ConstraintsData<'a> {
        gt: Option<NumberData>,
        ge: Option<NumberData>,
        lt: Option<NumberData>,
        le: Option<NumberData>,
        min_length: Option<u64>,
        max_length: Option<u64>,
        pattern: Option<&'a str>,
    }

    impl<'a> From<&'a Constraints> for ConstraintsData<'a> {
        fn from(constraints: &'a Constraints) -> Self {
            Self {
                gt: constraints.gt().map(Into::into),
                ge: constraints.ge().map(Into::into),
                lt: constraints.lt().map(Into::into),
                le: constraints.le().map(Into::into),
                min_length: constraints
                    .min_length()
                    .map(|min| u64::try_from(min).unwrap_or(u64::MAX)),
                max_length: constraints
                    .max_length()
                    .map(|max| u64::try_from(max).unwrap_or(u64::MAX)),
                pattern: constraints.pattern().map(regex::Regex::as_str),
            }
        }
    }

    #[derive(BorshSerialize)]
    struct FieldData<'a> {
        name: &'a str,
        ty: TypeData,
        /// Defaults hash by value kind plus canonical JSON rendering.
        default: Option<(&'static str, String)>,
        alias: Option<&'a str>,
        strict: Option<bool>,
        constraints: ConstraintsData<'a>,
    }

    #[derive(BorshSerialize)]
    struct SchemaData<'a> {
        name: &'a str,
        fields: Vec<FieldData<'a>>,
        extra: u8,
        strict: bool,
        populate_by_name: bool,
        frozen: bool,
    }

    let data = SchemaData {
        name: name.as_str(),
        fields: fields
            .iter()
            .map(|field| FieldData {
                name: field.name().as_str(),
                ty: field.field_type().into(),
                default: field.default().map(|default| {
                    (
                        default.kind_name(),
                        serde_json::Value::from(default).to_string(),
                    )
                }),
                alias: field.alias(),
                strict: field.strict(),
                constraints: field.constraints().into(),
            })
            .collect(),
        extra: match config.extra() {
            Extra::Ignore => 0,
            Extra::Forbid => 1,
            Extra::Allow => 2,
        },
        strict: config.strict(),
        populate_by_name: config.populate_by_name(),
        frozen: config.frozen(),
    };

    let encoded = borsh::to_vec(&data).expect("this should never fail");
    let hash = Sha256::digest(encoded);
    format!("{hash:x}")
}

/// Error returned when a model declaration is inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A field name or alias collides with another field's name or alias.
    #[error("duplicate field name or alias '{key}'")]
    DuplicateKey {
        /// The colliding key.
        key: String,
    },
    /// A field declares an empty alias.
    #[error("field '{field}' declares an empty alias")]
    EmptyAlias {
        /// The offending field.
        field: FieldName,
    },
    /// A constraint cannot apply to the field's declared type.
    #[error("{constraint} cannot apply to field '{field}' of type {ty}")]
    ConstraintMismatch {
        /// The offending field.
        field: FieldName,
        /// The constraint family that does not apply.
        constraint: &'static str,
        /// The declared type.
        ty: String,
    },
    /// A declared bound pair can never both hold.
    #[error("contradictory bounds on field '{field}'")]
    ContradictoryBounds {
        /// The offending field.
        field: FieldName,
    },
    /// A declared default does not validate against its own field.
    #[error("invalid default for field '{field}': {source}")]
    InvalidDefault {
        /// The offending field.
        field: FieldName,
        /// The validation failure for the default value.
        source: ValidationError,
    },
}
