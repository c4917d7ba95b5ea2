//! # fieldval-schema — Field Validation Rules & Registry
//!
//! Attaches validation rules to the fields and accessors of a class at
//! definition time, and evaluates them on demand against live instances.
//!
//! ## Rules (`rule`)
//!
//! The helpers [`required`], [`min_length`], [`range`] and [`regex`] build
//! unbound [`Constraint`]s. Binding a constraint to a field produces a
//! [`Rule`] whose message names that field.
//!
//! ## Registry (`registry`)
//!
//! - [`Registry::attach_rule`] — appends a rule to a class's field, creating
//!   the class entry on first use.
//! - [`Registry::decorate`] — the checked form: rejects methods, getters,
//!   setters and whole classes with a [`UsageError`].
//! - [`Registry::validate`] — evaluates every rule of the instance's class and
//!   reports all violations in one [`ValidationResult`].
//!
//! ## Typed Schemas (`schema`)
//!
//! [`ClassSchema`] is a builder over typed getters. Unknown fields, misapplied
//! member kinds and rules that cannot apply to a field's static type are all
//! rejected by [`ClassSchemaBuilder::build`], before any instance exists.
//!
//! ## Rule Documents (`document`)
//!
//! [`RuleDocument`] loads the same declarations from YAML or JSON.
//!
//! ## Crate Policy
//!
//! - Depends only on `fieldval-core` internally.
//! - Definition-time mistakes are `UsageError`s, raised immediately.
//! - Validation never fails: violations are data, never errors.
//! - Evaluation never mutates the registry or the instance.

pub mod constraints;
pub mod document;
pub mod guard;
pub mod instance;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod validate;

pub use constraints::ClassConstraints;
pub use document::{load_records, ClassSpec, DocumentError, FieldSpec, RuleDocument, RuleSpec};
pub use guard::{Guarded, RangeGuard};
pub use instance::{Instance, JsonRecord};
pub use registry::Registry;
pub use rule::{min_length, range, regex, required, Constraint, Predicate, Rule};
pub use schema::{ClassSchema, ClassSchemaBuilder, SchemaInstance};
pub use validate::{evaluate, FieldViolation, ValidationResult};

pub use fieldval_core::UsageError;
