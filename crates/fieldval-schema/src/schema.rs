//! # Typed Class Schemas
//!
//! A builder that declares the members of a Rust type together with typed
//! getters, attaches rules to them, and checks every attachment when the
//! schema is built.
//!
//! ```text
//! ClassSchema::<Address>::builder("Address")
//!     .field("city", |a: &Address| a.city.clone())
//!     .field("zip", |a: &Address| a.zip.clone())
//!     .rule("city", min_length(3))
//!     .rule("zip", regex("^[0-9]{5}$")?)
//!     .build()?
//! ```
//!
//! ## Definition-Time Checks
//!
//! `build()` fails with the first problem found, in declaration order:
//!
//! - an invalid class or member identifier, or a member declared twice;
//! - a rule on the class itself, or on a method, getter or setter;
//! - a rule on a member that was never declared;
//! - a rule that cannot apply to the getter's static type (e.g. `range` on a
//!   `String` field).
//!
//! A schema that builds is immutable. Its rule set is shared through an
//! `Arc`, so registering it in a [`Registry`](crate::Registry) does not copy.

use std::fmt;
use std::sync::Arc;

use fieldval_core::{
    ClassId, FieldName, FieldType, FieldValue, Member, MemberKind, UsageError, ValueType,
};

use crate::constraints::ClassConstraints;
use crate::instance::Instance;
use crate::rule::Constraint;
use crate::validate::{evaluate, ValidationResult};

type Getter<T> = Box<dyn Fn(&T) -> FieldValue + Send + Sync>;

struct Declared<T> {
    member: Member,
    value_type: ValueType,
    getter: Option<Getter<T>>,
}

enum Target {
    Class,
    Member(String),
}

/// Collects member declarations and rules for a [`ClassSchema`].
pub struct ClassSchemaBuilder<T> {
    class: Result<ClassId, UsageError>,
    members: Vec<Declared<T>>,
    pending: Vec<(Target, Constraint)>,
    error: Option<UsageError>,
}

/// An immutable set of typed getters plus the rules declared on them.
pub struct ClassSchema<T> {
    class: ClassId,
    constraints: Arc<ClassConstraints>,
    getters: Vec<(FieldName, Getter<T>)>,
}

impl<T: 'static> ClassSchema<T> {
    /// Start declaring the schema of class `class`.
    pub fn builder(class: impl Into<String>) -> ClassSchemaBuilder<T> {
        ClassSchemaBuilder {
            class: ClassId::new(class),
            members: Vec::new(),
            pending: Vec::new(),
            error: None,
        }
    }
}

impl<T> ClassSchema<T> {
    /// The class this schema describes.
    pub fn class_id(&self) -> &ClassId {
        &self.class
    }

    /// The shared rule set.
    pub fn constraints(&self) -> &Arc<ClassConstraints> {
        &self.constraints
    }

    /// Names of the value-holding members, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.getters.iter().map(|(name, _)| name)
    }

    /// Read one field of `instance` through its getter.
    pub fn read(&self, instance: &T, field: &FieldName) -> FieldValue {
        self.getters
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, getter)| getter(instance))
            .unwrap_or(FieldValue::Undefined)
    }

    /// Check `instance` against every rule of this schema.
    pub fn validate(&self, instance: &T) -> ValidationResult {
        evaluate(&self.constraints, |field| self.read(instance, field))
    }

    /// View `instance` as an [`Instance`] of this class, for use with a
    /// [`Registry`](crate::Registry).
    pub fn bind<'a>(&'a self, instance: &'a T) -> SchemaInstance<'a, T> {
        SchemaInstance {
            schema: self,
            instance,
        }
    }
}

impl<T> fmt::Debug for ClassSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSchema")
            .field("class", &self.class)
            .field("fields", &self.fields().collect::<Vec<_>>())
            .field("constraints", &self.constraints)
            .finish()
    }
}

/// A typed value paired with the schema that knows how to read it.
pub struct SchemaInstance<'a, T> {
    schema: &'a ClassSchema<T>,
    instance: &'a T,
}

impl<T> Instance for SchemaInstance<'_, T> {
    fn class_id(&self) -> ClassId {
        self.schema.class.clone()
    }

    fn field_value(&self, field: &FieldName) -> FieldValue {
        self.schema.read(self.instance, field)
    }
}

impl<T: 'static> ClassSchemaBuilder<T> {
    /// Declare a plain field read through `getter`.
    pub fn field<V, F>(self, name: &str, getter: F) -> Self
    where
        V: FieldType + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.value_member(name, MemberKind::Field, getter)
    }

    /// Declare an auto-accessor read through `getter`.
    pub fn accessor<V, F>(self, name: &str, getter: F) -> Self
    where
        V: FieldType + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.value_member(name, MemberKind::Accessor, getter)
    }

    /// Declare a member that holds no value (method, getter, setter).
    /// Rules attached to it are rejected by [`build`](Self::build).
    pub fn member(mut self, name: &str, kind: MemberKind) -> Self {
        if let Some(member) = self.declare(name, kind) {
            self.members.push(Declared {
                member,
                value_type: ValueType::Any,
                getter: None,
            });
        }
        self
    }

    /// Attach `constraint` to the member named `name`.
    pub fn rule(mut self, name: &str, constraint: Constraint) -> Self {
        self.pending.push((Target::Member(name.to_string()), constraint));
        self
    }

    /// Attach `constraint` to the class itself. Always a usage error once
    /// built; exists so class-level misuse is reported like any other.
    pub fn class_rule(mut self, constraint: Constraint) -> Self {
        self.pending.push((Target::Class, constraint));
        self
    }

    fn value_member<V, F>(mut self, name: &str, kind: MemberKind, getter: F) -> Self
    where
        V: FieldType + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        if let Some(member) = self.declare(name, kind) {
            self.members.push(Declared {
                member,
                value_type: V::VALUE_TYPE,
                getter: Some(Box::new(move |t: &T| getter(t).into_field_value())),
            });
        }
        self
    }

    /// Validate a member declaration, remembering the first error.
    fn declare(&mut self, name: &str, kind: MemberKind) -> Option<Member> {
        if self.error.is_some() {
            return None;
        }
        let name = match FieldName::new(name) {
            Ok(name) => name,
            Err(e) => {
                self.error = Some(e);
                return None;
            }
        };
        if self.members.iter().any(|d| d.member.name == name) {
            self.error = Some(UsageError::DuplicateMember {
                class: self.class_name(),
                field: name.to_string(),
            });
            return None;
        }
        Some(Member { name, kind })
    }

    fn class_name(&self) -> String {
        match &self.class {
            Ok(class) => class.to_string(),
            Err(_) => String::new(),
        }
    }

    /// Check every attachment and produce the immutable schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`UsageError`] found; see the module docs.
    pub fn build(self) -> Result<ClassSchema<T>, UsageError> {
        let class = self.class?;
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut constraints = ClassConstraints::new(class.clone());
        for (target, constraint) in &self.pending {
            let name = match target {
                Target::Class => {
                    return Err(UsageError::UnsupportedMember {
                        class: class.to_string(),
                        member: class.to_string(),
                        kind: MemberKind::Class,
                    });
                }
                Target::Member(name) => name,
            };
            let declared = self
                .members
                .iter()
                .find(|d| d.member.name.as_str() == name)
                .ok_or_else(|| UsageError::UnknownField {
                    class: class.to_string(),
                    field: name.clone(),
                })?;
            if !declared.member.kind.holds_value() {
                return Err(UsageError::UnsupportedMember {
                    class: class.to_string(),
                    member: name.clone(),
                    kind: declared.member.kind,
                });
            }
            if !constraint.applies_to(declared.value_type) {
                return Err(UsageError::IncompatibleRule {
                    class: class.to_string(),
                    field: name.clone(),
                    rule: constraint.name().to_string(),
                    value_type: declared.value_type,
                });
            }
            let field = declared.member.name.clone();
            let rule = constraint.bind(&field);
            constraints.push(field, rule);
        }

        let getters = self
            .members
            .into_iter()
            .filter_map(|d| d.getter.map(|g| (d.member.name, g)))
            .collect();

        tracing::debug!(
            class = %class,
            rules = constraints.rule_count(),
            "built class schema"
        );

        Ok(ClassSchema {
            class,
            constraints: Arc::new(constraints),
            getters,
        })
    }
}
