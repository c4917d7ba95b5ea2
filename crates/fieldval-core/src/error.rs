//! # Error Types — Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Usage errors are definition-time failures: a rule was attached to the
//!   wrong kind of member, to an undeclared field, or was built from an
//!   invalid pattern or range. They carry the class and member involved.
//! - Validation failures are NOT errors. They are reported as data in a
//!   validation result and never appear here.
//! - Guard errors come from on-write range checks and carry the rejected value.

use thiserror::Error;

use crate::member::MemberKind;
use crate::value::ValueType;

/// A rule-attaching operation was misapplied at definition time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    /// Rules may only be attached to plain fields and accessors.
    #[error("rule cannot be applied to {kind} '{member}' of class '{class}': only fields and accessors can be validated")]
    UnsupportedMember {
        /// Class being defined.
        class: String,
        /// Name of the member the rule targeted.
        member: String,
        /// Kind of that member.
        kind: MemberKind,
    },

    /// The rule names a member that the class never declared.
    #[error("class '{class}' has no declared field '{field}'")]
    UnknownField {
        /// Class being defined.
        class: String,
        /// Undeclared field name.
        field: String,
    },

    /// The same member name was declared twice.
    #[error("class '{class}' declares member '{field}' more than once")]
    DuplicateMember {
        /// Class being defined.
        class: String,
        /// Duplicated member name.
        field: String,
    },

    /// The rule cannot apply to the field's static value type.
    #[error("rule '{rule}' cannot validate {value_type} field '{field}' of class '{class}'")]
    IncompatibleRule {
        /// Class being defined.
        class: String,
        /// Field the rule targeted.
        field: String,
        /// Rule name (`range`, `min_length`, ...).
        rule: String,
        /// Static type of the field.
        value_type: ValueType,
    },

    /// A `regex` rule was built from a pattern that does not compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A `range` rule has an empty or non-finite interval.
    #[error("invalid range {min} to {max}")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A class or field identifier is malformed.
    #[error("invalid identifier '{value}': {reason}")]
    InvalidIdentifier {
        /// The rejected identifier.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// An on-write guard refused a new value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuardError {
    /// The value falls outside the guard's inclusive range.
    #[error("{field} {value} is outside range {min} to {max}")]
    OutOfRange {
        /// Guarded field name.
        field: String,
        /// Rejected value, already formatted for display.
        value: String,
        /// Lower bound, formatted.
        min: String,
        /// Upper bound, formatted.
        max: String,
    },
}
