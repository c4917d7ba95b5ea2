//! # Identity Newtypes
//!
//! `ClassId` names a class whose members carry rules; `FieldName` names one
//! of its members. Both are validated at construction, so a registry keyed by
//! them never holds an empty or malformed key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UsageError;

/// Stable identifier of a class (type) whose instances are validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassId(String);

/// Identifier of a class member: an ASCII letter, `_` or `$`, followed by
/// ASCII alphanumerics, `_` or `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl ClassId {
    /// Create a class identifier. Any non-blank string is accepted, so
    /// module-qualified names such as `shop::Address` work.
    pub fn new(name: impl Into<String>) -> Result<Self, UsageError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UsageError::InvalidIdentifier {
                value: name,
                reason: "class identifier must not be blank".to_string(),
            });
        }
        Ok(Self(name))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FieldName {
    /// Create a field name, rejecting anything that is not a member identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, UsageError> {
        let name = name.into();
        let mut chars = name.chars();
        let first_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
        if !first_ok {
            return Err(UsageError::InvalidIdentifier {
                value: name,
                reason: "field name must start with a letter, '_' or '$'".to_string(),
            });
        }
        if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$')) {
            return Err(UsageError::InvalidIdentifier {
                reason: format!("field name contains invalid character {bad:?}"),
                value: name,
            });
        }
        Ok(Self(name))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClassId {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for FieldName {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClassId {
    type Error = UsageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for FieldName {
    type Error = UsageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClassId> for String {
    fn from(id: ClassId) -> Self {
        id.0
    }
}

impl From<FieldName> for String {
    fn from(name: FieldName) -> Self {
        name.0
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
