//! # On-Write Range Guards
//!
//! The counterpart of on-demand validation: a [`Guarded`] accessor checks
//! every write against a [`RangeGuard`] and refuses out-of-range values
//! immediately, leaving the stored value untouched.

use fieldval_core::value::format_number;
use fieldval_core::{FieldName, GuardError, UsageError};

use crate::rule::{checked_range, Constraint};

/// An inclusive numeric range enforced on write.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeGuard {
    field: FieldName,
    min: f64,
    max: f64,
}

impl RangeGuard {
    /// Guard `field` to `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::InvalidRange` for an empty or non-finite range.
    pub fn new(field: FieldName, min: f64, max: f64) -> Result<Self, UsageError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(UsageError::InvalidRange { min, max });
        }
        Ok(Self { field, min, max })
    }

    /// The guarded field.
    pub fn field(&self) -> &FieldName {
        &self.field
    }

    /// Check a candidate value.
    pub fn check(&self, value: f64) -> Result<(), GuardError> {
        if self.min <= value && value <= self.max {
            Ok(())
        } else {
            Err(GuardError::OutOfRange {
                field: self.field.to_string(),
                value: format_number(value),
                min: format_number(self.min),
                max: format_number(self.max),
            })
        }
    }

    /// The equivalent on-demand rule, for reporting through a registry.
    pub fn constraint(&self) -> Constraint {
        checked_range(self.min, self.max)
    }
}

/// An accessor-style cell whose writes are range-checked.
#[derive(Debug, Clone)]
pub struct Guarded<N> {
    guard: RangeGuard,
    value: N,
}

impl<N: Copy + Into<f64>> Guarded<N> {
    /// Create the cell. The initial value must already be in range.
    pub fn new(guard: RangeGuard, initial: N) -> Result<Self, GuardError> {
        guard.check(initial.into())?;
        Ok(Self {
            guard,
            value: initial,
        })
    }

    /// Current value.
    pub fn get(&self) -> N {
        self.value
    }

    /// Replace the value if it is in range.
    pub fn set(&mut self, value: N) -> Result<(), GuardError> {
        if let Err(e) = self.guard.check(value.into()) {
            tracing::debug!(field = %self.guard.field, error = %e, "rejected guarded write");
            return Err(e);
        }
        self.value = value;
        Ok(())
    }

    /// The guard in force.
    pub fn guard(&self) -> &RangeGuard {
        &self.guard
    }
}
