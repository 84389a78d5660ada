//! Declarative model schemas.
//!
//! A schema is declared as a [`Model`]: named, typed [`Field`]s with
//! optional defaults, aliases, and [`Constraints`], plus a per-model
//! [`ModelConfig`] validation policy. Building a model validates the whole
//! declaration up front, so validation itself never meets an inconsistent
//! schema.

mod config;
mod constraints;
mod field;
mod field_type;
mod model;

pub use config::{Extra, ModelConfig};
pub use constraints::{Constraints, Number};
pub use field::{Field, FieldName, InvalidNameError};
pub use field_type::FieldType;
pub use model::{BuildError, Model, ModelBuilder};
