//! # Rule Documents
//!
//! Declarative YAML or JSON descriptions of classes, their members and the
//! rules on each member. Loading a document replays every declaration through
//! [`Registry::decorate`], so a document gets the same definition-time checks
//! as code does.
//!
//! ```yaml
//! classes:
//!   - name: Address
//!     fields:
//!       - name: city
//!         rules: [required, { min_length: 3 }]
//!       - name: zip
//!         kind: accessor
//!         rules: [{ regex: "^[0-9]{5}$" }]
//! ```
//!
//! Unknown keys are rejected, so a misspelled `rules:` or rule name fails the
//! load instead of silently validating nothing.
//!
//! Records to validate are JSON/YAML objects, or arrays of objects. YAML,
//! for documents and records alike, is converted to the JSON value tree
//! before it is read, so both formats share one deserializer. The tag form
//! `!min_length 3` reads the same as `{ min_length: 3 }`.

use std::collections::BTreeSet;
use std::path::Path;

use fieldval_core::{ClassId, FieldName, Member, MemberKind, UsageError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::registry::Registry;
use crate::rule::{min_length, range, regex, required, Constraint};

/// Error loading a rule document or a records file.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read '{path}': {reason}")]
    Load {
        /// Path that failed.
        path: String,
        /// Underlying reason.
        reason: String,
    },

    /// The content is not valid YAML/JSON or has the wrong shape.
    #[error("cannot parse '{path}': {reason}")]
    Parse {
        /// Path (or `<inline>`) that failed.
        path: String,
        /// Underlying reason.
        reason: String,
    },

    /// A declaration in the document is misapplied.
    #[error("invalid rule declaration: {0}")]
    Usage(#[from] UsageError),
}

/// A set of class declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDocument {
    /// Classes in declaration order.
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

/// One class and its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSpec {
    /// Class identifier.
    pub name: String,
    /// Members in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One member and the rules attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Member name.
    pub name: String,
    /// Member kind; defaults to a plain field.
    #[serde(default = "default_kind")]
    pub kind: MemberKind,
    /// Rules in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

fn default_kind() -> MemberKind {
    MemberKind::Field
}

/// A rule as written in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSpec {
    /// `required`
    Required,
    /// `{ min_length: n }`
    MinLength(usize),
    /// `{ range: { min, max } }`
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// `{ regex: "pattern" }`
    Regex(String),
}

impl RuleSpec {
    /// Build the constraint this entry describes.
    pub fn to_constraint(&self) -> Result<Constraint, UsageError> {
        match self {
            Self::Required => Ok(required()),
            Self::MinLength(len) => Ok(min_length(*len)),
            Self::Range { min, max } => range(*min, *max),
            Self::Regex(pattern) => regex(pattern),
        }
    }
}

impl RuleDocument {
    /// Load a document, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let content = read_file(path)?;
        let display = path.display().to_string();
        if is_yaml(path) {
            parse_yaml(&content, &display)
        } else {
            parse_json(&content, &display)
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, DocumentError> {
        parse_yaml(content, "<inline>")
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        parse_json(content, "<inline>")
    }

    /// Replay every declaration into a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns the first misapplied declaration: an invalid identifier, a
    /// member declared twice, a bad pattern or range, or a rule on a member
    /// kind that holds no value.
    pub fn to_registry(&self) -> Result<Registry, DocumentError> {
        let mut registry = Registry::new();
        // A class may be split over several entries; members are unique per class.
        let mut seen: BTreeSet<(ClassId, FieldName)> = BTreeSet::new();
        for class_spec in &self.classes {
            let class = ClassId::new(class_spec.name.as_str())?;
            registry.declare_class(class.clone());

            for field_spec in &class_spec.fields {
                let member = Member {
                    name: FieldName::new(field_spec.name.as_str())?,
                    kind: field_spec.kind,
                };
                if !seen.insert((class.clone(), member.name.clone())) {
                    return Err(UsageError::DuplicateMember {
                        class: class.to_string(),
                        field: field_spec.name.clone(),
                    }
                    .into());
                }

                for rule_spec in &field_spec.rules {
                    registry.decorate(&class, &member, &rule_spec.to_constraint()?)?;
                }
            }
        }
        tracing::info!(classes = registry.len(), "loaded rule document");
        Ok(registry)
    }
}

/// Load records from a JSON or YAML file: a single object or an array of
/// objects.
pub fn load_records(path: &Path) -> Result<Vec<serde_json::Map<String, Value>>, DocumentError> {
    let content = read_file(path)?;
    let display = path.display().to_string();

    let value = if is_yaml(path) {
        yaml_tree(&content, &display)?
    } else {
        serde_json::from_str(&content).map_err(|e| DocumentError::Parse {
            path: display.clone(),
            reason: format!("invalid JSON: {e}"),
        })?
    };

    let not_object = |index: Option<usize>| DocumentError::Parse {
        path: display.clone(),
        reason: match index {
            Some(i) => format!("record #{i} is not an object"),
            None => "expected an object or an array of objects".to_string(),
        },
    };

    match value {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                _ => Err(not_object(Some(i))),
            })
            .collect(),
        _ => Err(not_object(None)),
    }
}

fn read_file(path: &Path) -> Result<String, DocumentError> {
    std::fs::read_to_string(path).map_err(|e| DocumentError::Load {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

fn parse_yaml(content: &str, path: &str) -> Result<RuleDocument, DocumentError> {
    let tree = yaml_tree(content, path)?;
    serde_json::from_value(tree).map_err(|e| DocumentError::Parse {
        path: path.to_string(),
        reason: format!("invalid rule document: {e}"),
    })
}

/// Parse YAML into the JSON value tree documents and records are read from.
fn yaml_tree(content: &str, path: &str) -> Result<Value, DocumentError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| DocumentError::Parse {
        path: path.to_string(),
        reason: format!("invalid YAML: {e}"),
    })?;
    yaml_to_json_value(&yaml).map_err(|reason| DocumentError::Parse {
        path: path.to_string(),
        reason: format!("YAML-to-JSON conversion failed: {reason}"),
    })
}

fn parse_json(content: &str, path: &str) -> Result<RuleDocument, DocumentError> {
    serde_json::from_str(content).map_err(|e| DocumentError::Parse {
        path: path.to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// A tagged node such as `!min_length 3` becomes the single-key map
/// `{ "min_length": 3 }`, so the tag spelling and the map spelling of a rule
/// load the same. Map keys must be scalars.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => yaml_number(n)?,
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(
            items
                .iter()
                .map(yaml_to_json_value)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                object.insert(yaml_key(key)?, yaml_to_json_value(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let mut object = serde_json::Map::with_capacity(1);
            object.insert(
                tag.trim_start_matches('!').to_string(),
                yaml_to_json_value(&tagged.value)?,
            );
            Value::Object(object)
        }
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("number {n} has no JSON form"))
}

fn yaml_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("map key must be a scalar, got {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::JsonRecord;
    use serde_json::json;

    const ADDRESS_YAML: &str = r#"
classes:
  - name: Address
    fields:
      - name: city
        rules: [required, { min_length: 3 }]
      - name: zip
        kind: accessor
        rules:
          - regex: "^[0-9]{5}$"
      - name: count
        rules:
          - range: { min: 0, max: 10 }
"#;

    fn record(value: Value) -> JsonRecord {
        JsonRecord::from_value(ClassId::new("Address").unwrap(), value).unwrap()
    }

    #[test]
    fn parses_yaml_rule_specs() {
        let doc = RuleDocument::from_yaml_str(ADDRESS_YAML).unwrap();
        let fields = &doc.classes[0].fields;
        assert_eq!(fields[0].kind, MemberKind::Field);
        assert_eq!(fields[0].rules, [RuleSpec::Required, RuleSpec::MinLength(3)]);
        assert_eq!(fields[1].kind, MemberKind::Accessor);
        assert_eq!(fields[1].rules, [RuleSpec::Regex("^[0-9]{5}$".to_string())]);
        assert_eq!(fields[2].rules, [RuleSpec::Range { min: 0.0, max: 10.0 }]);
    }

    #[test]
    fn yaml_registry_validates_records() {
        let registry = RuleDocument::from_yaml_str(ADDRESS_YAML)
            .unwrap()
            .to_registry()
            .unwrap();

        let ok = registry.validate(&record(json!({"city": "StL", "zip": "12345", "count": 7})));
        assert!(ok.valid, "unexpected errors: {:?}", ok.errors);

        let bad = registry.validate(&record(json!({"city": "St", "zip": "foo", "count": 11})));
        assert_eq!(
            bad.errors,
            [
                "city must be at least 3 characters (value is St)",
                "zip must match pattern ^[0-9]{5}$ (value is foo)",
                "count must be between 0 and 10 (value is 11)",
            ]
        );
    }

    #[test]
    fn json_document_is_equivalent() {
        let doc = RuleDocument::from_json_str(
            r#"{"classes": [{"name": "Counter", "fields": [
                {"name": "count", "rules": ["required", {"range": {"min": 0, "max": 10}}]}
            ]}]}"#,
        )
        .unwrap();
        let registry = doc.to_registry().unwrap();
        let counter = JsonRecord::from_value(ClassId::new("Counter").unwrap(), json!({})).unwrap();
        assert_eq!(registry.validate(&counter).errors.len(), 2);
    }

    #[test]
    fn rule_on_method_fails_load() {
        let doc = RuleDocument::from_yaml_str(
            r#"
classes:
  - name: Dog
    fields:
      - name: bark
        kind: method
        rules: [required]
"#,
        )
        .unwrap();
        let err = doc.to_registry().unwrap_err();
        assert!(
            matches!(err, DocumentError::Usage(UsageError::UnsupportedMember { .. })),
            "got {err}"
        );
    }

    #[test]
    fn bad_pattern_fails_load() {
        let doc = RuleDocument::from_yaml_str(
            "classes:\n  - name: A\n    fields:\n      - name: z\n        rules: [{ regex: \"(\" }]\n",
        )
        .unwrap();
        assert!(matches!(
            doc.to_registry(),
            Err(DocumentError::Usage(UsageError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn duplicate_field_fails_load() {
        let doc = RuleDocument::from_yaml_str(
            "classes:\n  - name: A\n    fields:\n      - name: x\n      - name: x\n",
        )
        .unwrap();
        assert!(matches!(
            doc.to_registry(),
            Err(DocumentError::Usage(UsageError::DuplicateMember { .. }))
        ));
    }

    #[test]
    fn duplicate_field_across_repeated_class_entries_fails_load() {
        let doc = RuleDocument::from_yaml_str(
            r#"
classes:
  - name: A
    fields:
      - name: x
        rules: [required]
  - name: A
    fields:
      - name: y
      - name: x
        rules: [{ min_length: 2 }]
"#,
        )
        .unwrap();
        let err = doc.to_registry().unwrap_err();
        assert!(
            matches!(&err, DocumentError::Usage(UsageError::DuplicateMember { field, .. }) if field == "x"),
            "got {err}"
        );
    }

    #[test]
    fn repeated_class_entries_with_distinct_fields_merge() {
        let registry = RuleDocument::from_yaml_str(
            "classes:\n  - name: A\n    fields: [{ name: x, rules: [required] }]\n  - name: A\n    fields: [{ name: y, rules: [required] }]\n",
        )
        .unwrap()
        .to_registry()
        .unwrap();
        let class = ClassId::new("A").unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.constraints(&class).unwrap().rule_count(), 2);
    }

    #[test]
    fn yaml_file_with_parameterized_rules_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldval.yaml");
        std::fs::write(&path, ADDRESS_YAML).unwrap();
        let registry = RuleDocument::from_path(&path).unwrap().to_registry().unwrap();
        let class = ClassId::new("Address").unwrap();
        assert_eq!(registry.constraints(&class).unwrap().rule_count(), 4);
    }

    #[test]
    fn tagged_rules_load_like_map_rules() {
        let tagged = RuleDocument::from_yaml_str(
            "classes:\n  - name: A\n    fields:\n      - name: x\n        rules: [required, !min_length 3]\n",
        )
        .unwrap();
        let mapped = RuleDocument::from_yaml_str(
            "classes:\n  - name: A\n    fields:\n      - name: x\n        rules: [required, { min_length: 3 }]\n",
        )
        .unwrap();
        assert_eq!(tagged, mapped);
    }

    #[test]
    fn unknown_rule_name_is_rejected() {
        let err = RuleDocument::from_yaml_str(
            "classes:\n  - name: A\n    fields:\n      - name: x\n        rules: [{ max_length: 3 }]\n",
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let err = RuleDocument::from_yaml_str(
            "classes:\n  - name: A\n    fields:\n      - name: x\n        rulez: [required]\n",
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn class_without_rules_is_declared() {
        let registry = RuleDocument::from_yaml_str("classes:\n  - name: Plain\n")
            .unwrap()
            .to_registry()
            .unwrap();
        assert!(registry.contains(&ClassId::new("Plain").unwrap()));
    }

    #[test]
    fn yaml_to_json_conversion() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("city: StL\ncount: 42\nok: true\ntags: [a, b]\n").unwrap();
        let json = yaml_to_json_value(&yaml).unwrap();
        assert_eq!(json["city"], "StL");
        assert_eq!(json["count"], 42);
        assert_eq!(json["ok"], true);
        assert_eq!(json["tags"][1], "b");
    }

    #[test]
    fn yaml_tag_becomes_single_key_map() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("!range { min: 0, max: 1.5 }").unwrap();
        assert_eq!(
            yaml_to_json_value(&yaml).unwrap(),
            json!({"range": {"min": 0, "max": 1.5}})
        );
    }

    #[test]
    fn load_records_accepts_object_or_array() {
        let dir = tempfile::tempdir().unwrap();
        let single = dir.path().join("one.json");
        std::fs::write(&single, r#"{"city": "StL"}"#).unwrap();
        assert_eq!(load_records(&single).unwrap().len(), 1);

        let many = dir.path().join("many.yaml");
        std::fs::write(&many, "- city: StL\n- city: St\n").unwrap();
        let records = load_records(&many).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["city"], "St");

        let scalar = dir.path().join("bad.json");
        std::fs::write(&scalar, "[1]").unwrap();
        assert!(matches!(load_records(&scalar), Err(DocumentError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = RuleDocument::from_path(Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(matches!(err, DocumentError::Load { .. }));
    }
}
