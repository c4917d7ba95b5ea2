//! # Class Constraints
//!
//! The rules declared for one class, grouped by field. Fields keep their
//! declaration order and each field's rules keep theirs; order only affects
//! the order of reported messages.

use fieldval_core::{ClassId, FieldName};

use crate::rule::Rule;

/// Rules declared for one class, indexed by field name.
#[derive(Debug, Clone)]
pub struct ClassConstraints {
    class: ClassId,
    fields: Vec<(FieldName, Vec<Rule>)>,
}

impl ClassConstraints {
    /// An empty rule set for `class`.
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            fields: Vec::new(),
        }
    }

    /// The class these constraints belong to.
    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Append `rule` to `field`, adding the field after all existing ones if
    /// this is its first rule.
    pub fn push(&mut self, field: FieldName, rule: Rule) {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, rules)) => rules.push(rule),
            None => self.fields.push((field, vec![rule])),
        }
    }

    /// Rules attached to `field`, empty if none.
    pub fn rules_for(&self, field: &FieldName) -> &[Rule] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Fields with their rules, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldName, &[Rule])> {
        self.fields.iter().map(|(name, rules)| (name, rules.as_slice()))
    }

    /// Number of fields that carry at least one rule.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total number of rules across all fields.
    pub fn rule_count(&self) -> usize {
        self.fields.iter().map(|(_, rules)| rules.len()).sum()
    }

    /// True if no rule has been attached.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{min_length, required};

    fn name(s: &str) -> FieldName {
        FieldName::new(s).unwrap()
    }

    #[test]
    fn preserves_field_and_rule_order() {
        let mut c = ClassConstraints::new(ClassId::new("Address").unwrap());
        c.push(name("zip"), required().bind(&name("zip")));
        c.push(name("city"), required().bind(&name("city")));
        c.push(name("zip"), min_length(5).bind(&name("zip")));

        let order: Vec<&str> = c.fields().map(|(f, _)| f.as_str()).collect();
        assert_eq!(order, ["zip", "city"]);

        let zip_rules: Vec<&str> = c.rules_for(&name("zip")).iter().map(|r| r.name()).collect();
        assert_eq!(zip_rules, ["required", "min_length"]);
        assert_eq!(c.field_count(), 2);
        assert_eq!(c.rule_count(), 3);
    }

    #[test]
    fn unknown_field_has_no_rules() {
        let c = ClassConstraints::new(ClassId::new("Empty").unwrap());
        assert!(c.is_empty());
        assert!(c.rules_for(&name("missing")).is_empty());
    }
}
