//! # fieldval-core — Foundational Types for Field Validation
//!
//! This crate is the leaf of the fieldval workspace. It defines the type-system
//! primitives every other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `ClassId` and `FieldName` have
//!    validated constructors. A rule can never be attached under a field name
//!    that is not a legal member identifier.
//!
//! 2. **Single `MemberKind` enum.** Every attachment target carries its kind,
//!    so rejecting methods, getters and whole classes is an exhaustive `match`,
//!    not a string comparison.
//!
//! 3. **Dynamic values are explicit.** `FieldValue` distinguishes `Undefined`
//!    (the member is absent) from `Null` and from empty text. `ValueType`
//!    records what a typed getter statically produces.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fieldval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod member;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{GuardError, UsageError};
pub use identity::{ClassId, FieldName};
pub use member::{Member, MemberKind};
pub use value::{FieldType, FieldValue, ValueType};
