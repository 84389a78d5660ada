use std::{cmp::Ordering, fmt};

use regex::Regex;

/// A numeric constraint limit, kept in its own domain.
///
/// Bounds declared as integers compare with integer values exactly; only
/// mixed integer/float comparisons go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// An integer limit.
    Int(i64),
    /// A floating point limit.
    Float(f64),
}

impl Number {
    /// Compares a value against this limit.
    ///
    /// Same-domain pairs compare exactly; mixed pairs compare as `f64`.
    /// Returns `None` only when a float operand is NaN.
    #[must_use]
    pub fn compare(self, value: Self) -> Option<Ordering> {
        match (value, self) {
            (Self::Int(value), Self::Int(limit)) => Some(value.cmp(&limit)),
            (Self::Float(value), Self::Float(limit)) => value.partial_cmp(&limit),
            #[expect(clippy::cast_precision_loss, reason = "mixed-domain comparison")]
            (value, limit) => {
                let value = match value {
                    Self::Int(value) => value as f64,
                    Self::Float(value) => value,
                };
                let limit = match limit {
                    Self::Int(limit) => limit as f64,
                    Self::Float(limit) => limit,
                };
                value.partial_cmp(&limit)
            }
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Constraints checked against a field's value after coercion.
///
/// Numeric bounds apply to integer and float fields; length bounds apply to
/// strings (in characters), lists, and maps (in entries); the pattern
/// applies to strings as an unanchored search. Attaching a constraint to a
/// type it cannot apply to is rejected when the model is built.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    gt: Option<Number>,
    ge: Option<Number>,
    lt: Option<Number>,
    le: Option<Number>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
}

impl Constraints {
    /// No constraints.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gt: None,
            ge: None,
            lt: None,
            le: None,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Returns `true` if no constraint is declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.gt.is_none()
            && self.ge.is_none()
            && self.lt.is_none()
            && self.le.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
    }

    /// Requires the value to be strictly greater than `limit`.
    #[must_use]
    pub fn with_gt(mut self, limit: impl Into<Number>) -> Self {
        self.gt = Some(limit.into());
        self
    }

    /// Requires the value to be greater than or equal to `limit`.
    #[must_use]
    pub fn with_ge(mut self, limit: impl Into<Number>) -> Self {
        self.ge = Some(limit.into());
        self
    }

    /// Requires the value to be strictly less than `limit`.
    #[must_use]
    pub fn with_lt(mut self, limit: impl Into<Number>) -> Self {
        self.lt = Some(limit.into());
        self
    }

    /// Requires the value to be less than or equal to `limit`.
    #[must_use]
    pub fn with_le(mut self, limit: impl Into<Number>) -> Self {
        self.le = Some(limit.into());
        self
    }

    /// Requires the value's length to be at least `min`.
    #[must_use]
    pub const fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Requires the value's length to be at most `max`.
    #[must_use]
    pub const fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Requires string values to match `pattern` (unanchored search).
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] if `pattern` is not a valid regular
    /// expression.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// The strict lower bound, if declared.
    #[must_use]
    pub const fn gt(&self) -> Option<Number> {
        self.gt
    }

    /// The inclusive lower bound, if declared.
    #[must_use]
    pub const fn ge(&self) -> Option<Number> {
        self.ge
    }

    /// The strict upper bound, if declared.
    #[must_use]
    pub const fn lt(&self) -> Option<Number> {
        self.lt
    }

    /// The inclusive upper bound, if declared.
    #[must_use]
    pub const fn le(&self) -> Option<Number> {
        self.le
    }

    /// The minimum length, if declared.
    #[must_use]
    pub const fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// The maximum length, if declared.
    #[must_use]
    pub const fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// The string pattern, if declared.
    #[must_use]
    pub const fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Whether any numeric bound is declared.
    #[must_use]
    pub const fn has_bounds(&self) -> bool {
        self.gt.is_some() || self.ge.is_some() || self.lt.is_some() || self.le.is_some()
    }

    /// Whether any length bound is declared.
    #[must_use]
    pub const fn has_length(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    /// Whether a pattern is declared.
    #[must_use]
    pub const fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// Returns `true` if the declared bounds cannot all hold at once.
    ///
    /// Only same-kind pairs are checked (`ge`/`le`, `gt`/`lt`,
    /// `min_length`/`max_length`); mixed strict/inclusive pairs are left to
    /// validation.
    #[must_use]
    pub fn is_contradictory(&self) -> bool {
        let ge_above_le = match (self.ge, self.le) {
            (Some(ge), Some(le)) => le.compare(ge) == Some(Ordering::Greater),
            _ => false,
        };
        let gt_above_lt = match (self.gt, self.lt) {
            (Some(gt), Some(lt)) => lt.compare(gt) != Some(Ordering::Less),
            _ => false,
        };
        let min_above_max = match (self.min_length, self.max_length) {
            (Some(min), Some(max)) => min > max,
            _ => false,
        };
        ge_above_le || gt_above_lt || min_above_max
    }
}

impl PartialEq for Constraints {
    /// Patterns compare by their source text; `regex::Regex` itself has no
    /// equality.
    fn eq(&self, other: &Self) -> bool {
        self.gt == other.gt
            && self.ge == other.ge
            && self.lt == other.lt
            && self.le == other.le
            && self.min_length == other.min_length
            && self.max_length == other.max_length
            && self.pattern.as_ref().map(Regex::as_str) == other.pattern.as_ref().map(Regex::as_str)
    }
}
