/// Policy for input keys that no declared field claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extra {
    /// Undeclared keys are silently dropped.
    #[default]
    Ignore,
    /// Undeclared keys fail validation, one error per key.
    Forbid,
    /// Undeclared keys are stored on the instance as extras.
    Allow,
}

/// Per-model validation policy.
///
/// This is the model's own behaviour under validation, declared alongside
/// its fields; it is not application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelConfig {
    extra: Extra,
    strict: bool,
    populate_by_name: bool,
    frozen: bool,
}

impl ModelConfig {
    /// The default policy: extras ignored, lax coercion, aliases only,
    /// mutable instances.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            extra: Extra::Ignore,
            strict: false,
            populate_by_name: false,
            frozen: false,
        }
    }

    /// Sets the policy for undeclared input keys.
    #[must_use]
    pub const fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }

    /// Enables strict validation: values must already have the declared
    /// kind, with no string parsing or numeric widening. Individual fields
    /// can override this with [`Field::with_strict`](crate::Field::with_strict).
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Accepts an aliased field's declared name in input alongside its
    /// alias.
    #[must_use]
    pub const fn with_populate_by_name(mut self, populate_by_name: bool) -> Self {
        self.populate_by_name = populate_by_name;
        self
    }

    /// Makes validated instances reject assignment.
    #[must_use]
    pub const fn with_frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    /// The policy for undeclared input keys.
    #[must_use]
    pub const fn extra(&self) -> Extra {
        self.extra
    }

    /// Whether strict validation is the model-wide default.
    #[must_use]
    pub const fn strict(&self) -> bool {
        self.strict
    }

    /// Whether aliased fields also accept their declared name.
    #[must_use]
    pub const fn populate_by_name(&self) -> bool {
        self.populate_by_name
    }

    /// Whether instances reject assignment.
    #[must_use]
    pub const fn frozen(&self) -> bool {
        self.frozen
    }
}
