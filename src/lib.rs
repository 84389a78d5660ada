//! Declarative data models with validation, coercion, and serialization.
//!
//! A [`Model`] declares named, typed fields with optional defaults,
//! aliases, and constraints. Untrusted input (a mapping, JSON text, or any
//! object exposing named attributes) validates into an [`Instance`], with
//! every failure reported at once in a structured [`ValidationError`];
//! instances dump back to plain mappings or JSON.
//!
//! ```
//! use credo::{Field, FieldType, Model, Value};
//!
//! let model = Model::builder("User".parse()?)
//!     .field(Field::new("id".parse()?, FieldType::Int))
//!     .field(Field::new("name".parse()?, FieldType::String).with_default("John Doe"))
//!     .build()?;
//!
//! let user = model.validate_json(r#"{"id": "123"}"#)?;
//! assert_eq!(user.get("id"), Some(&Value::Int(123)));
//! assert_eq!(user.get("name"), Some(&Value::from("John Doe")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod value;
pub use value::{AttributeSource, Value};

pub mod schema;
pub use schema::{
    BuildError, Constraints, Extra, Field, FieldName, FieldType, InvalidNameError, Model,
    ModelBuilder, ModelConfig, Number,
};

pub mod validate;
pub use validate::{ErrorKind, FieldError, Loc, ValidationError};

pub mod instance;
pub use instance::Instance;

pub mod dump;
pub use dump::DumpOptions;

pub mod json_schema;
pub use json_schema::json_schema;
