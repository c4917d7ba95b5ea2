//! # Instances
//!
//! Anything whose fields can be read by name can be validated. Typed structs
//! go through [`ClassSchema`](crate::ClassSchema) getters; dynamic records
//! loaded from JSON or YAML use [`JsonRecord`].

use fieldval_core::{ClassId, FieldName, FieldValue};
use serde_json::{Map, Value};

/// A live object whose current field values can be checked.
pub trait Instance {
    /// The class this instance belongs to.
    fn class_id(&self) -> ClassId;

    /// Current value of `field`; `FieldValue::Undefined` if there is none.
    fn field_value(&self, field: &FieldName) -> FieldValue;
}

/// A dynamic record: a class identity plus a JSON object of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    class: ClassId,
    fields: Map<String, Value>,
}

impl JsonRecord {
    /// Wrap a JSON object as an instance of `class`.
    pub fn new(class: ClassId, fields: Map<String, Value>) -> Self {
        Self { class, fields }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(class: ClassId, value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(class, fields)),
            _ => None,
        }
    }

    /// Overwrite one field.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Remove one field, making it read as `undefined`.
    pub fn remove(&mut self, field: &str) {
        self.fields.remove(field);
    }

    /// The underlying JSON object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Instance for JsonRecord {
    fn class_id(&self) -> ClassId {
        self.class.clone()
    }

    fn field_value(&self, field: &FieldName) -> FieldValue {
        self.fields
            .get(field.as_str())
            .map(FieldValue::from_json)
            .unwrap_or(FieldValue::Undefined)
    }
}
