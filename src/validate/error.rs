use std::fmt;

use nonempty::NonEmpty;

use crate::{Value, schema::Number};

/// One step in the path from a model root to an offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A field name or mapping key.
    Key(String),
    /// A list index.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The location of an offending value, as a path of field names, mapping
/// keys, and list indices from the model root.
///
/// Displays with dot separators, e.g. `addr.tags.2`. The empty path is the
/// model root itself (a non-mapping input, or malformed JSON text).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Loc(Vec<Segment>);

impl Loc {
    /// The model root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// A path holding a single field name.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![Segment::Key(name.into())])
    }

    /// This path extended with a field name or mapping key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.into()));
        Self(segments)
    }

    /// This path extended with a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// Returns `true` if this is the model root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path's segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        let mut segments = self.0.iter();
        if let Some(first) = segments.next() {
            write!(f, "{first}")?;
        }
        for segment in segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

/// The kind of a single validation failure.
///
/// Each kind carries a stable machine-readable code ([`ErrorKind::code`])
/// and renders a human message via [`fmt::Display`]. Bound and length kinds
/// embed the violated limit.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required field was absent from the input.
    Missing,
    /// An undeclared key was present and the model forbids extras.
    ExtraForbidden,
    /// The input is not a boolean.
    BoolType,
    /// The input could not be interpreted as a boolean.
    BoolParsing,
    /// The input is not an integer.
    IntType,
    /// The input string could not be parsed as an integer.
    IntParsing,
    /// The input float has a fractional part or is out of integer range.
    IntFromFloat,
    /// The input is not a float.
    FloatType,
    /// The input string could not be parsed as a float.
    FloatParsing,
    /// The input is not a string.
    StringType,
    /// The input is not a UUID.
    UuidType,
    /// The input string could not be parsed as a UUID.
    UuidParsing,
    /// The input is not a datetime.
    DateTimeType,
    /// The input could not be parsed as a datetime.
    DateTimeParsing,
    /// The input is not a list.
    ListType,
    /// The input is not a mapping.
    MapType,
    /// The input is not a mapping or model instance.
    ModelType,
    /// The input text is not valid JSON.
    JsonSyntax {
        /// The parser's description of the syntax error.
        message: String,
    },
    /// The value is not greater than the declared bound.
    GreaterThan {
        /// The violated bound.
        limit: Number,
    },
    /// The value is not greater than or equal to the declared bound.
    GreaterThanEqual {
        /// The violated bound.
        limit: Number,
    },
    /// The value is not less than the declared bound.
    LessThan {
        /// The violated bound.
        limit: Number,
    },
    /// The value is not less than or equal to the declared bound.
    LessThanEqual {
        /// The violated bound.
        limit: Number,
    },
    /// The value is shorter than the declared minimum length.
    TooShort {
        /// The violated minimum length.
        min: usize,
    },
    /// The value is longer than the declared maximum length.
    TooLong {
        /// The violated maximum length.
        max: usize,
    },
    /// The string does not match the declared pattern.
    PatternMismatch {
        /// The pattern source text.
        pattern: String,
    },
    /// Assignment to a field the model does not declare.
    UnknownField,
    /// Assignment to a frozen instance.
    FrozenInstance,
}

impl ErrorKind {
    /// The stable snake_case code for this kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::ExtraForbidden => "extra_forbidden",
            Self::BoolType => "bool_type",
            Self::BoolParsing => "bool_parsing",
            Self::IntType => "int_type",
            Self::IntParsing => "int_parsing",
            Self::IntFromFloat => "int_from_float",
            Self::FloatType => "float_type",
            Self::FloatParsing => "float_parsing",
            Self::StringType => "string_type",
            Self::UuidType => "uuid_type",
            Self::UuidParsing => "uuid_parsing",
            Self::DateTimeType => "datetime_type",
            Self::DateTimeParsing => "datetime_parsing",
            Self::ListType => "list_type",
            Self::MapType => "map_type",
            Self::ModelType => "model_type",
            Self::JsonSyntax { .. } => "json_syntax",
            Self::GreaterThan { .. } => "greater_than",
            Self::GreaterThanEqual { .. } => "greater_than_equal",
            Self::LessThan { .. } => "less_than",
            Self::LessThanEqual { .. } => "less_than_equal",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::PatternMismatch { .. } => "pattern_mismatch",
            Self::UnknownField => "unknown_field",
            Self::FrozenInstance => "frozen_instance",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Field required"),
            Self::ExtraForbidden => write!(f, "Extra inputs are not permitted"),
            Self::BoolType => write!(f, "Input should be a valid boolean"),
            Self::BoolParsing => write!(
                f,
                "Input should be a valid boolean, unable to interpret input"
            ),
            Self::IntType => write!(f, "Input should be a valid integer"),
            Self::IntParsing => write!(
                f,
                "Input should be a valid integer, unable to parse string as an integer"
            ),
            Self::IntFromFloat => write!(
                f,
                "Input should be a valid integer, got a number with a fractional part"
            ),
            Self::FloatType => write!(f, "Input should be a valid number"),
            Self::FloatParsing => write!(
                f,
                "Input should be a valid number, unable to parse string as a number"
            ),
            Self::StringType => write!(f, "Input should be a valid string"),
            Self::UuidType => write!(f, "Input should be a valid UUID"),
            Self::UuidParsing => write!(
                f,
                "Input should be a valid UUID, unable to parse string as a UUID"
            ),
            Self::DateTimeType => write!(f, "Input should be a valid datetime"),
            Self::DateTimeParsing => write!(
                f,
                "Input should be a valid datetime, unable to parse input as an RFC 3339 datetime"
            ),
            Self::ListType => write!(f, "Input should be a valid list"),
            Self::MapType => write!(f, "Input should be a valid mapping"),
            Self::ModelType => write!(f, "Input should be a valid mapping or model instance"),
            Self::JsonSyntax { message } => write!(f, "Invalid JSON: {message}"),
            Self::GreaterThan { limit } => write!(f, "Input should be greater than {limit}"),
            Self::GreaterThanEqual { limit } => {
                write!(f, "Input should be greater than or equal to {limit}")
            }
            Self::LessThan { limit } => write!(f, "Input should be less than {limit}"),
            Self::LessThanEqual { limit } => {
                write!(f, "Input should be less than or equal to {limit}")
            }
            Self::TooShort { min } => {
                write!(f, "Input should have a length of at least {min}")
            }
            Self::TooLong { max } => {
                write!(f, "Input should have a length of at most {max}")
            }
            Self::PatternMismatch { pattern } => {
                write!(f, "Input should match the pattern '{pattern}'")
            }
            Self::UnknownField => write!(f, "Model has no field with this name"),
            Self::FrozenInstance => write!(f, "Instance is frozen and rejects assignment"),
        }
    }
}

/// A single validation failure: where it happened, what went wrong, and the
/// offending input.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    loc: Loc,
    kind: ErrorKind,
    input: Value,
}

impl FieldError {
    pub(crate) const fn new(loc: Loc, kind: ErrorKind, input: Value) -> Self {
        Self { loc, kind, input }
    }

    /// Where the failure occurred.
    #[must_use]
    pub const fn loc(&self) -> &Loc {
        &self.loc
    }

    /// What went wrong.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The offending input value ([`Value::Null`] where no input exists,
    /// e.g. for a missing required field).
    #[must_use]
    pub const fn input(&self) -> &Value {
        &self.input
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.loc, self.kind, self.kind.code())?;
        if !self.input.is_null() {
            write!(f, " (input: {})", self.input)?;
        }
        Ok(())
    }
}

/// The structured result of failed validation.
///
/// Validation never fails fast: every field error found in a single pass is
/// collected here, and the list is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    model: String,
    errors: NonEmpty<FieldError>,
}

impl ValidationError {
    pub(crate) const fn new(model: String, errors: NonEmpty<FieldError>) -> Self {
        Self { model, errors }
    }

    /// The name of the model that rejected the input.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The individual failures, in the order they were found.
    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// The number of individual failures (always at least one).
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Renders the failures as a JSON array of
    /// `{loc, kind, message, input}` objects for machine consumption.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let errors: Vec<serde_json::Value> = self
            .errors
            .iter()
            .map(|error| {
                let loc: Vec<serde_json::Value> = error
                    .loc()
                    .segments()
                    .iter()
                    .map(|segment| match segment {
                        Segment::Key(key) => serde_json::Value::String(key.clone()),
                        Segment::Index(index) => serde_json::json!(index),
                    })
                    .collect();
                serde_json::json!({
                    "loc": loc,
                    "kind": error.kind().code(),
                    "message": error.kind().to_string(),
                    "input": serde_json::Value::from(error.input()),
                })
            })
            .collect();
        serde_json::Value::Array(errors)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "{count} validation {noun} for {}", self.model)?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
