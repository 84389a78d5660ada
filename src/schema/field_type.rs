use std::fmt;

use crate::Model;

/// The declared type of a model field.
///
/// Types compose: a field can be an optional list of nested models, for
/// example. Maps are always string-keyed; only the value type is declared.
/// Nested models are composed by value, so a schema can never refer to
/// itself and cycles are unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A boolean.
    Bool,
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit floating point number.
    Float,
    /// A UTF-8 string.
    String,
    /// An RFC 4122 UUID.
    Uuid,
    /// A timezone-aware point in time.
    DateTime,
    /// An optional value: `Null` is accepted alongside the inner type.
    Optional(Box<FieldType>),
    /// An ordered sequence of values of the inner type.
    List(Box<FieldType>),
    /// A string-keyed mapping of values of the inner type.
    Map(Box<FieldType>),
    /// A nested model, validated recursively.
    Model(Model),
}

impl FieldType {
    /// An optional value of the given inner type.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// A list of values of the given element type.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// A string-keyed map of values of the given value type.
    #[must_use]
    pub fn map(value: Self) -> Self {
        Self::Map(Box::new(value))
    }

    /// Returns `true` if this type accepts `Null`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// The type with any outer [`FieldType::Optional`] layers removed.
    ///
    /// Constraints are checked against this core type, since `Null` is
    /// never subject to them.
    #[must_use]
    pub fn unwrap_optional(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    /// Whether numeric bound constraints (`gt`/`ge`/`lt`/`le`) are
    /// meaningful for this type.
    #[must_use]
    pub fn supports_bounds(&self) -> bool {
        matches!(self.unwrap_optional(), Self::Int | Self::Float)
    }

    /// Whether length constraints (`min_length`/`max_length`) are
    /// meaningful for this type.
    #[must_use]
    pub fn supports_length(&self) -> bool {
        matches!(
            self.unwrap_optional(),
            Self::String | Self::List(_) | Self::Map(_)
        )
    }

    /// Whether a `pattern` constraint is meaningful for this type.
    #[must_use]
    pub fn supports_pattern(&self) -> bool {
        matches!(self.unwrap_optional(), Self::String)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::Int => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Uuid => write!(f, "uuid"),
            Self::DateTime => write!(f, "datetime"),
            Self::Optional(inner) => write!(f, "optional[{inner}]"),
            Self::List(element) => write!(f, "list[{element}]"),
            Self::Map(value) => write!(f, "map[{value}]"),
            Self::Model(model) => write!(f, "{}", model.name()),
        }
    }
}
