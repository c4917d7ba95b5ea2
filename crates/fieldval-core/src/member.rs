//! # Class Members
//!
//! Every rule attachment targets a member of a class. Only two kinds of
//! member expose a gettable/settable value and can therefore be validated:
//! plain fields and auto-accessors. Everything else is a usage error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::FieldName;

/// The kind of class element a rule is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// The class itself.
    Class,
    /// A method.
    Method,
    /// A getter without a backing auto-accessor.
    Getter,
    /// A setter without a backing auto-accessor.
    Setter,
    /// A plain field.
    Field,
    /// An auto-accessor property.
    Accessor,
}

impl MemberKind {
    /// Whether a member of this kind holds a value that rules can check.
    pub fn holds_value(&self) -> bool {
        matches!(self, Self::Field | Self::Accessor)
    }

    /// Lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Method => "method",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Field => "field",
            Self::Accessor => "accessor",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named class member together with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Member name.
    pub name: FieldName,
    /// What kind of member it is.
    pub kind: MemberKind,
}

impl Member {
    /// A plain field.
    pub fn field(name: FieldName) -> Self {
        Self {
            name,
            kind: MemberKind::Field,
        }
    }

    /// An auto-accessor.
    pub fn accessor(name: FieldName) -> Self {
        Self {
            name,
            kind: MemberKind::Accessor,
        }
    }

    /// A method.
    pub fn method(name: FieldName) -> Self {
        Self {
            name,
            kind: MemberKind::Method,
        }
    }
}
