//! This bench test simulates validating a large batch of untrusted
//! mappings against a moderately sized model, exercising lax coercion.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use credo::{Constraints, Field, FieldType, Model, Value};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

fn user_model() -> Model {
    Model::builder("User".parse().unwrap())
        .field(Field::new("id".parse().unwrap(), FieldType::Int))
        .field(
            Field::new("email".parse().unwrap(), FieldType::String).with_constraints(
                Constraints::new().with_pattern("^[^@]+@[^@]+$").unwrap(),
            ),
        )
        .field(Field::new(
            "friends".parse().unwrap(),
            FieldType::list(FieldType::Int),
        ))
        .field(Field::new(
            "signup_ts".parse().unwrap(),
            FieldType::optional(FieldType::DateTime),
        ))
        .build()
        .unwrap()
}

/// Generates inputs that all need coercion work (stringy numbers, RFC 3339
/// timestamps).
fn inputs(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            Value::Map(BTreeMap::from([
                ("id".to_string(), Value::from(i.to_string())),
                ("email".to_string(), Value::from(format!("user{i}@example.com"))),
                (
                    "friends".to_string(),
                    Value::List(vec![
                        Value::from("1"),
                        Value::Int(2),
                        Value::Float(3.0),
                    ]),
                ),
                (
                    "signup_ts".to_string(),
                    Value::from("2019-06-01T12:22:00Z"),
                ),
            ]))
        })
        .collect()
}

fn validate_many(c: &mut Criterion) {
    let model = user_model();
    c.bench_function("validate 1000 mappings", |b| {
        b.iter_batched(
            || inputs(1000),
            |inputs| {
                for input in &inputs {
                    model.validate(input).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, validate_many);
criterion_main!(benches);
