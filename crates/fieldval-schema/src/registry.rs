//! # Validation Registry
//!
//! Associates each class with the rules declared on its fields and checks
//! live instances against them on request.
//!
//! ## Lifecycle
//!
//! A class entry is created the first time a rule is attached to one of its
//! fields (or when a built [`ClassSchema`] is registered) and lives as long as
//! the registry. There is no global registry: whoever defines classes owns
//! one and passes it to whatever validates.
//!
//! ## Sharing
//!
//! Entries are `Arc<ClassConstraints>`: registering a schema shares its rule
//! set rather than copying it. Entries are written while classes are defined
//! and only read afterwards. Attaching to an entry that is already shared
//! copies it first (`Arc::make_mut`), so existing holders keep the rules they
//! were built with.

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldval_core::{ClassId, FieldName, Member, UsageError};

use crate::constraints::ClassConstraints;
use crate::instance::Instance;
use crate::rule::{Constraint, Rule};
use crate::schema::ClassSchema;
use crate::validate::{evaluate, ValidationResult};

/// Class identity → declared rules.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    classes: BTreeMap<ClassId, Arc<ClassConstraints>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rule` to `field` of `class`, creating the class entry if needed.
    ///
    /// Performs no checks: the caller guarantees that `field` is a validated
    /// member of `class`. Use [`Registry::decorate`] for the checked form.
    pub fn attach_rule(&mut self, class: ClassId, field: FieldName, rule: Rule) {
        tracing::debug!(class = %class, field = %field, rule = rule.name(), "attaching rule");
        let entry = self
            .classes
            .entry(class)
            .or_insert_with_key(|class| Arc::new(ClassConstraints::new(class.clone())));
        Arc::make_mut(entry).push(field, rule);
    }

    /// Attach `constraint` to `member` of `class`.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::UnsupportedMember` unless `member` is a plain field
    /// or an accessor. Nothing is attached in that case.
    pub fn decorate(
        &mut self,
        class: &ClassId,
        member: &Member,
        constraint: &Constraint,
    ) -> Result<(), UsageError> {
        if !member.kind.holds_value() {
            return Err(UsageError::UnsupportedMember {
                class: class.to_string(),
                member: member.name.to_string(),
                kind: member.kind,
            });
        }
        self.attach_rule(class.clone(), member.name.clone(), constraint.bind(&member.name));
        Ok(())
    }

    /// Make `class` known without attaching any rule. Instances of a declared
    /// class with no rules are always valid.
    pub fn declare_class(&mut self, class: ClassId) {
        self.classes
            .entry(class)
            .or_insert_with_key(|class| Arc::new(ClassConstraints::new(class.clone())));
    }

    /// Install the rule set of a built schema, replacing any existing entry
    /// for the same class.
    pub fn register<T>(&mut self, schema: &ClassSchema<T>) {
        let constraints = Arc::clone(schema.constraints());
        tracing::debug!(
            class = %schema.class_id(),
            rules = constraints.rule_count(),
            "registering class schema"
        );
        if self
            .classes
            .insert(schema.class_id().clone(), constraints)
            .is_some()
        {
            tracing::warn!(class = %schema.class_id(), "replaced existing class entry");
        }
    }

    /// Rules declared for `class`, if the class is known.
    pub fn constraints(&self, class: &ClassId) -> Option<&ClassConstraints> {
        self.classes.get(class).map(Arc::as_ref)
    }

    /// Whether `class` has an entry.
    pub fn contains(&self, class: &ClassId) -> bool {
        self.classes.contains_key(class)
    }

    /// Known classes and their rules, ordered by class identifier.
    pub fn classes(&self) -> impl Iterator<Item = (&ClassId, &ClassConstraints)> {
        self.classes.iter().map(|(id, c)| (id, c.as_ref()))
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if no class is known.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Check `instance` against every rule of its class.
    ///
    /// A class without an entry has no rules, so its instances are valid.
    pub fn validate<I: Instance + ?Sized>(&self, instance: &I) -> ValidationResult {
        let class = instance.class_id();
        match self.classes.get(&class) {
            Some(constraints) => evaluate(constraints, |field| instance.field_value(field)),
            None => {
                tracing::trace!(class = %class, "no rules registered; instance is valid");
                ValidationResult::passed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::JsonRecord;
    use crate::rule::{min_length, range, regex, required};
    use fieldval_core::MemberKind;
    use serde_json::json;

    fn class(s: &str) -> ClassId {
        ClassId::new(s).unwrap()
    }

    fn name(s: &str) -> FieldName {
        FieldName::new(s).unwrap()
    }

    fn record(class_name: &str, value: serde_json::Value) -> JsonRecord {
        JsonRecord::from_value(class(class_name), value).unwrap()
    }

    #[test]
    fn attach_creates_entry_lazily() {
        let mut registry = Registry::new();
        assert!(!registry.contains(&class("Address")));
        registry.attach_rule(class("Address"), name("city"), required().bind(&name("city")));
        assert!(registry.contains(&class("Address")));
        assert_eq!(registry.constraints(&class("Address")).unwrap().rule_count(), 1);
    }

    #[test]
    fn unknown_class_is_valid() {
        let registry = Registry::new();
        let result = registry.validate(&record("Ghost", json!({"anything": null})));
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn decorate_rejects_methods_and_classes() {
        let mut registry = Registry::new();
        for kind in [
            MemberKind::Method,
            MemberKind::Class,
            MemberKind::Getter,
            MemberKind::Setter,
        ] {
            let member = Member {
                name: name("target"),
                kind,
            };
            let err = registry
                .decorate(&class("Dog"), &member, &required())
                .unwrap_err();
            assert!(
                matches!(err, UsageError::UnsupportedMember { kind: k, .. } if k == kind),
                "expected UnsupportedMember for {kind}, got {err}"
            );
        }
        assert!(registry.is_empty(), "rejected rules must not create entries");
    }

    #[test]
    fn decorate_accepts_fields_and_accessors() {
        let mut registry = Registry::new();
        registry
            .decorate(&class("Dog"), &Member::field(name("name")), &required())
            .unwrap();
        registry
            .decorate(
                &class("Dog"),
                &Member::accessor(name("age")),
                &range(0.0, 20.0).unwrap(),
            )
            .unwrap();
        let result = registry.validate(&record("Dog", json!({"name": "", "age": 50})));
        assert_eq!(
            result.errors,
            [
                "name is required (value is )",
                "age must be between 0 and 20 (value is 50)",
            ]
        );
    }

    #[test]
    fn reports_all_violations_in_one_call() {
        let mut registry = Registry::new();
        let address = class("Address");
        registry
            .decorate(&address, &Member::field(name("city")), &min_length(3))
            .unwrap();
        registry
            .decorate(&address, &Member::field(name("zip")), &regex("^[0-9]{5}$").unwrap())
            .unwrap();
        registry
            .decorate(&address, &Member::field(name("zip")), &required())
            .unwrap();

        let result = registry.validate(&record("Address", json!({"city": "St"})));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.violations_for("city").count(), 1);
        assert_eq!(result.violations_for("zip").count(), 2);
    }

    #[test]
    fn validation_does_not_mutate_registry() {
        let mut registry = Registry::new();
        registry.attach_rule(class("C"), name("x"), required().bind(&name("x")));
        let before = registry.constraints(&class("C")).unwrap().rule_count();
        for _ in 0..3 {
            let _ = registry.validate(&record("C", json!({})));
        }
        assert_eq!(registry.constraints(&class("C")).unwrap().rule_count(), before);
    }

    #[test]
    fn declared_class_without_rules_is_valid() {
        let mut registry = Registry::new();
        registry.declare_class(class("Plain"));
        assert!(registry.contains(&class("Plain")));
        assert!(registry.validate(&record("Plain", json!({}))).valid);
    }
}
