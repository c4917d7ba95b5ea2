//! # On-Demand Validation
//!
//! Evaluates a class's rules against the current values of one instance.
//! Every rule of every field is evaluated: nothing short-circuits, so a single
//! call reports all violations. Each failure yields
//! `"<rule message> (value is <value>)"`.
//!
//! Evaluation is a pure read. It never touches the constraints it walks or
//! the instance it reads, so it can be repeated freely.

use std::fmt;

use fieldval_core::{FieldName, FieldValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constraints::ClassConstraints;

/// A single rule failure with structured context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field whose value failed.
    pub field: String,
    /// Name of the failed rule.
    pub rule: String,
    /// Full message, including the offending value.
    pub message: String,
    /// The offending value; absent when the field was undefined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no rule failed.
    pub valid: bool,
    /// One message per failed rule, in declaration order.
    pub errors: Vec<String>,
    /// Structured form of `errors`, same order.
    pub violations: Vec<FieldViolation>,
}

impl ValidationResult {
    /// A result with no violations.
    pub fn passed() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            violations: Vec::new(),
        }
    }

    fn from_violations(violations: Vec<FieldViolation>) -> Self {
        Self {
            valid: violations.is_empty(),
            errors: violations.iter().map(|v| v.message.clone()).collect(),
            violations,
        }
    }

    /// Violations for one field.
    pub fn violations_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldViolation> {
        self.violations.iter().filter(move |v| v.field == field)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return f.write_str("valid");
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {error}")?;
        }
        Ok(())
    }
}

/// Evaluate every rule in `constraints`, reading field values through `read`.
pub fn evaluate<F>(constraints: &ClassConstraints, read: F) -> ValidationResult
where
    F: Fn(&FieldName) -> FieldValue,
{
    let mut violations = Vec::new();

    for (field, rules) in constraints.fields() {
        let value = read(field);
        for rule in rules {
            let ok = rule.check(&value);
            tracing::trace!(
                class = %constraints.class(),
                field = %field,
                rule = rule.name(),
                ok,
                "evaluated rule"
            );
            if !ok {
                violations.push(FieldViolation {
                    field: field.to_string(),
                    rule: rule.name().to_string(),
                    message: format!("{} (value is {value})", rule.message()),
                    value: value.to_json(),
                });
            }
        }
    }

    tracing::debug!(
        class = %constraints.class(),
        violations = violations.len(),
        "validated instance"
    );

    ValidationResult::from_violations(violations)
}
