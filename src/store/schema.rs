//! Collection schemas
//!
//! A schema is enforced by the store on every write:
//! - Inserts must not carry undeclared fields
//! - Required fields must be present and non-null after defaults apply
//! - Field types must match exactly (no coercion)
//! - Updates are checked field by field against the declared types
//!
//! Unique fields are declared here but checked by the store, since the
//! check needs the other documents in the collection.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::document::{Payload, ID_FIELD};

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Any JSON number
    Float,
    /// Boolean
    Bool,
    /// RFC 3339 timestamp string
    DateTime,
    /// String restricted to a fixed set of values
    Enum(Vec<String>),
    /// Homogeneous array
    Array(Box<FieldType>),
}

impl FieldType {
    fn check(&self, value: &Value, path: &str) -> Result<(), ValidationDetails> {
        match self {
            FieldType::String => expect(value.is_string(), path, "string", value),
            FieldType::Int => expect(value.is_i64() || value.is_u64(), path, "int", value),
            FieldType::Float => expect(value.is_number(), path, "float", value),
            FieldType::Bool => expect(value.is_boolean(), path, "bool", value),
            FieldType::DateTime => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| ValidationDetails::type_mismatch(path, "datetime", json_type_name(value)))?;
                DateTime::parse_from_rfc3339(raw)
                    .map(|_| ())
                    .map_err(|_| ValidationDetails::new(path, "RFC 3339 timestamp", format!("'{}'", raw)))
            }
            FieldType::Enum(allowed) => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| ValidationDetails::type_mismatch(path, "string", json_type_name(value)))?;
                if allowed.iter().any(|v| v == raw) {
                    Ok(())
                } else {
                    Err(ValidationDetails::new(
                        path,
                        format!("one of [{}]", allowed.join(", ")),
                        format!("'{}'", raw),
                    ))
                }
            }
            FieldType::Array(element_type) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| ValidationDetails::type_mismatch(path, "array", json_type_name(value)))?;
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    if item.is_null() {
                        return Err(ValidationDetails::null_value(item_path));
                    }
                    element_type.check(item, &item_path)?;
                }
                Ok(())
            }
        }
    }
}

/// Value filled in when a field is missing on insert
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// Fixed JSON value
    Value(Value),
    /// Current UTC time as an RFC 3339 string
    Now,
}

impl FieldDefault {
    fn resolve(&self) -> Value {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Now => {
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<FieldDefault>,
    /// Strip surrounding whitespace from string values before checks
    pub trim: bool,
}

impl FieldDef {
    /// Optional field of the given type
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
            trim: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(FieldDefault::Value(value));
        self
    }

    pub fn default_now(mut self) -> Self {
        self.default = Some(FieldDefault::Now);
        self
    }

    pub fn trimmed(mut self) -> Self {
        self.trim = true;
        self
    }

    fn normalize(&self, value: Value) -> Value {
        match value {
            Value::String(s) if self.trim => Value::String(s.trim().to_string()),
            other => other,
        }
    }

    fn check(&self, name: &str, value: &Value) -> Result<(), ValidationDetails> {
        if value.is_null() {
            if self.required {
                return Err(ValidationDetails::null_value(name));
            }
            return Ok(());
        }
        if self.required && self.trim && value.as_str().is_some_and(str::is_empty) {
            return Err(ValidationDetails::new(name, "non-empty string", "empty string"));
        }
        self.field_type.check(value, name)
    }
}

/// Schema for one collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSchema {
    fields: BTreeMap<String, FieldDef>,
    unique: Vec<String>,
}

impl CollectionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Declare a unique field. The field must also be declared.
    pub fn unique(mut self, name: impl Into<String>) -> Self {
        self.unique.push(name.into());
        self
    }

    pub fn unique_fields(&self) -> &[String] {
        &self.unique
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Validate an insert payload and fill in defaults.
    ///
    /// `_id` is ignored here; the store handles identifiers.
    pub fn prepare_insert(&self, payload: Payload) -> Result<Payload, ValidationDetails> {
        let mut prepared = Payload::new();

        for (key, value) in payload {
            if key == ID_FIELD {
                continue;
            }
            let def = self
                .fields
                .get(&key)
                .ok_or_else(|| ValidationDetails::extra_field(&key))?;
            let value = def.normalize(value);
            def.check(&key, &value)?;
            prepared.insert(key, value);
        }

        for (name, def) in &self.fields {
            if prepared.contains_key(name) {
                continue;
            }
            match &def.default {
                Some(default) => {
                    prepared.insert(name.clone(), default.resolve());
                }
                None if def.required => return Err(ValidationDetails::missing_field(name)),
                None => {}
            }
        }

        Ok(prepared)
    }

    /// Validate an update patch. Only the patched fields are checked.
    pub fn prepare_update(&self, patch: Payload) -> Result<Payload, ValidationDetails> {
        let mut prepared = Payload::new();

        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            let def = self
                .fields
                .get(&key)
                .ok_or_else(|| ValidationDetails::extra_field(&key))?;
            let value = def.normalize(value);
            def.check(&key, &value)?;
            prepared.insert(key, value);
        }

        Ok(prepared)
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "toppings[2]")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

fn expect(ok: bool, path: &str, expected: &str, value: &Value) -> Result<(), ValidationDetails> {
    if ok {
        Ok(())
    } else {
        Err(ValidationDetails::type_mismatch(path, expected, json_type_name(value)))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
