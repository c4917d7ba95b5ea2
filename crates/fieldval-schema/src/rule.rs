//! # Validation Rules
//!
//! A [`Constraint`] is a predicate plus a message template that does not yet
//! know which field it guards. Binding it to a field yields a [`Rule`], whose
//! message is final (`"city must be at least 3 characters"`). Rules are
//! immutable once created.
//!
//! ## Predicates
//!
//! | Helper | Passes when | Applies to |
//! |--------|-------------|------------|
//! | `required` | value is not `undefined`, `null` or `""` | any field |
//! | `min_length(n)` | value is text with at least `n` characters | text fields |
//! | `range(min, max)` | value is a number with `min <= v <= max` | numeric fields |
//! | `regex(pattern)` | pattern matches somewhere in the value | text fields |
//!
//! Patterns and ranges are checked when the constraint is built, so a bad
//! pattern is a definition-time [`UsageError`], never a validation result.

use std::fmt;
use std::sync::Arc;

use fieldval_core::value::format_number;
use fieldval_core::{FieldName, FieldValue, UsageError, ValueType};
use regex::Regex;

/// Placeholder replaced by the field name when a constraint is bound.
const FIELD_PLACEHOLDER: &str = "{field}";

/// A shareable custom predicate.
pub type Predicate = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

#[derive(Clone)]
enum Check {
    Required,
    MinLength(usize),
    Range { min: f64, max: f64 },
    Pattern(Regex),
    Custom(Predicate),
}

impl Check {
    fn passes(&self, value: &FieldValue) -> bool {
        match self {
            Self::Required => !value.is_blank(),
            Self::MinLength(len) => value
                .as_text()
                .is_some_and(|s| s.chars().count() >= *len),
            Self::Range { min, max } => value
                .as_number()
                .is_some_and(|n| *min <= n && n <= *max),
            Self::Pattern(re) => match value {
                FieldValue::Text(s) => re.is_match(s),
                FieldValue::Number(_) | FieldValue::Bool(_) => re.is_match(&value.to_string()),
                _ => false,
            },
            Self::Custom(predicate) => predicate(value),
        }
    }

    fn applies_to(&self, value_type: ValueType) -> bool {
        match self {
            Self::Required | Self::Custom(_) => true,
            Self::MinLength(_) | Self::Pattern(_) => {
                matches!(value_type, ValueType::Text | ValueType::Any)
            }
            Self::Range { .. } => matches!(value_type, ValueType::Number | ValueType::Any),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::MinLength(len) => f.debug_tuple("MinLength").field(len).finish(),
            Self::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ─── Constraints ────────────────────────────────────────────────────

/// An unbound rule: predicate, rule name, and a message template containing
/// `{field}`.
#[derive(Debug, Clone)]
pub struct Constraint {
    name: String,
    check: Check,
    template: String,
}

/// The field must not be `undefined`, `null` or empty text.
pub fn required() -> Constraint {
    Constraint {
        name: "required".to_string(),
        check: Check::Required,
        template: format!("{FIELD_PLACEHOLDER} is required"),
    }
}

/// The field must be text of at least `len` characters.
pub fn min_length(len: usize) -> Constraint {
    Constraint {
        name: "min_length".to_string(),
        check: Check::MinLength(len),
        template: format!("{FIELD_PLACEHOLDER} must be at least {len} characters"),
    }
}

/// The field must be a number within `min..=max`.
///
/// # Errors
///
/// Returns `UsageError::InvalidRange` if either bound is not finite or
/// `min > max`; such a rule could never pass.
pub fn range(min: f64, max: f64) -> Result<Constraint, UsageError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(UsageError::InvalidRange { min, max });
    }
    Ok(checked_range(min, max))
}

/// `range` for bounds the caller has already validated.
pub(crate) fn checked_range(min: f64, max: f64) -> Constraint {
    Constraint {
        name: "range".to_string(),
        check: Check::Range { min, max },
        template: format!(
            "{FIELD_PLACEHOLDER} must be between {} and {}",
            format_number(min),
            format_number(max)
        ),
    }
}

/// The field must match `pattern` (unanchored search).
///
/// # Errors
///
/// Returns `UsageError::InvalidPattern` if the pattern does not compile.
pub fn regex(pattern: &str) -> Result<Constraint, UsageError> {
    let re = Regex::new(pattern).map_err(|e| UsageError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Constraint {
        name: "regex".to_string(),
        check: Check::Pattern(re),
        template: format!("{FIELD_PLACEHOLDER} must match pattern {pattern}"),
    })
}

impl Constraint {
    /// A rule with an arbitrary predicate. `template` may contain `{field}`.
    pub fn custom<F>(name: impl Into<String>, template: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Check::Custom(Arc::new(predicate)),
            template: template.into(),
        }
    }

    /// Rule name, e.g. `"min_length"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this constraint can validate a field of the given static type.
    pub fn applies_to(&self, value_type: ValueType) -> bool {
        self.check.applies_to(value_type)
    }

    /// Bind to a field, producing a rule with its final message.
    pub fn bind(&self, field: &FieldName) -> Rule {
        Rule {
            name: self.name.clone(),
            check: self.check.clone(),
            message: self.template.replace(FIELD_PLACEHOLDER, field.as_str()),
        }
    }
}

// ─── Rules ──────────────────────────────────────────────────────────

/// A predicate with its failure message, bound to one field.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    check: Check,
    message: String,
}

impl Rule {
    /// Rule name, e.g. `"range"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Failure message, without the trailing value.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Evaluate the predicate.
    pub fn check(&self, value: &FieldValue) -> bool {
        self.check.passes(value)
    }
}
