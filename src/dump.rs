//! Serialization of instances back into plain data.
//!
//! A validated [`Instance`] dumps to a plain [`Value::Map`] or to JSON
//! text. Validating a dumped instance reproduces it whenever the dumped
//! keys are ones the model accepts: with default options for models
//! without aliases, and with `by_alias` (or `populate_by_name` on the
//! model) otherwise.

use std::collections::BTreeMap;

use crate::{Instance, Value};

/// Options controlling how an instance is dumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpOptions {
    by_alias: bool,
    exclude_none: bool,
    exclude_defaults: bool,
}

impl DumpOptions {
    /// The default options: field names as keys, everything emitted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_alias: false,
            exclude_none: false,
            exclude_defaults: false,
        }
    }

    /// Emits aliases as keys where fields declare one.
    #[must_use]
    pub const fn with_by_alias(mut self, by_alias: bool) -> Self {
        self.by_alias = by_alias;
        self
    }

    /// Skips fields whose value is `Null`.
    #[must_use]
    pub const fn with_exclude_none(mut self, exclude_none: bool) -> Self {
        self.exclude_none = exclude_none;
        self
    }

    /// Skips fields whose value equals their declared default.
    #[must_use]
    pub const fn with_exclude_defaults(mut self, exclude_defaults: bool) -> Self {
        self.exclude_defaults = exclude_defaults;
        self
    }

    /// Whether aliases are emitted as keys.
    #[must_use]
    pub const fn by_alias(&self) -> bool {
        self.by_alias
    }

    /// Whether `Null` values are skipped.
    #[must_use]
    pub const fn exclude_none(&self) -> bool {
        self.exclude_none
    }

    /// Whether default-valued fields are skipped.
    #[must_use]
    pub const fn exclude_defaults(&self) -> bool {
        self.exclude_defaults
    }
}

impl Instance {
    /// The plain-mapping form with declared field names as keys.
    ///
    /// Equivalent to [`Instance::dump`] with default options: nested
    /// instances become mappings recursively and extras are included.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.dump(&DumpOptions::new())
    }

    /// Converts the instance into a plain [`Value::Map`].
    ///
    /// Nested instances are dumped recursively with the same options.
    /// Extras are always emitted, whatever the options say.
    #[must_use]
    pub fn dump(&self, options: &DumpOptions) -> Value {
        let mut entries = BTreeMap::new();
        for (field, value) in self.model().fields().iter().zip(self.field_values()) {
            if options.exclude_none() && value.is_null() {
                continue;
            }
            if options.exclude_defaults() && field.default() == Some(value) {
                continue;
            }
            let key = if options.by_alias() {
                field.lookup_key()
            } else {
                field.name().as_str()
            };
            entries.insert(key.to_string(), dump_value(value, options));
        }
        for (key, value) in self.extras() {
            entries.insert(key.to_string(), dump_value(value, options));
        }
        Value::Map(entries)
    }

    /// The dumped form as a `serde_json` value.
    #[must_use]
    pub fn to_json_value(&self, options: &DumpOptions) -> serde_json::Value {
        serde_json::Value::from(self.dump(options))
    }

    /// The dumped form as JSON text.
    #[must_use]
    pub fn dump_json(&self, options: &DumpOptions) -> String {
        self.to_json_value(options).to_string()
    }

    fn field_values(&self) -> impl Iterator<Item = &Value> {
        self.iter().map(|(_, value)| value)
    }
}

/// Dumps one stored value: instances become mappings, containers recurse,
/// scalars pass through.
fn dump_value(value: &Value, options: &DumpOptions) -> Value {
    match value {
        Value::Instance(instance) => instance.dump(options),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| dump_value(item, options))
                .collect(),
        ),
        Value::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), dump_value(item, options)))
                .collect(),
        ),
        other => other.clone(),
    }
}
