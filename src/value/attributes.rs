use std::collections::{BTreeMap, HashMap};

use crate::Instance;

use super::Value;

/// A source of named attributes for validation.
///
/// This is the seam through which arbitrary objects are validated: any type
/// that can answer "what is the value of the attribute called `name`?" can
/// be handed to [`Model::validate_attributes`](crate::Model::validate_attributes).
///
/// The trait deliberately cannot enumerate attributes, so undeclared
/// attributes are invisible to validation and the model's extra-data policy
/// does not apply on this path.
pub trait AttributeSource {
    /// Returns the value of the attribute called `name`, if the source has
    /// one.
    fn attribute(&self, name: &str) -> Option<Value>;
}

impl AttributeSource for BTreeMap<String, Value> {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl AttributeSource for HashMap<String, Value> {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl AttributeSource for Instance {
    /// Declared fields take precedence over stored extras.
    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).or_else(|| self.extra(name)).cloned()
    }
}
