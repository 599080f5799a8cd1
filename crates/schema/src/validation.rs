//! Type checks for resolved field values.

use serde_json::Value;

use crate::error::SchemaError;
use crate::field::{FieldDef, FieldType};

/// Get the type name of a Value for error messages
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a single (non-array) value matches a field type.
pub fn matches_type(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::String | FieldType::Text | FieldType::Password | FieldType::Datetime => {
            value.is_string()
        }
        FieldType::Number => value.is_number(),
        FieldType::Integer => match value {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        },
        FieldType::Boolean => value.is_boolean(),
        FieldType::Object => value.is_object(),
        FieldType::Hidden => true,
    }
}

/// Validate a resolved value against its field definition.
///
/// `key` is the dotted path used in error messages (`user_keys.user_id`).
/// Declared child properties of object fields are checked recursively;
/// a required child that is absent is a [`SchemaError::MissingValue`].
pub fn validate_value(key: &str, field: &FieldDef, value: &Value) -> Result<(), SchemaError> {
    if value.is_null() {
        return if field.allow_null {
            Ok(())
        } else {
            Err(type_error(key, field, value))
        };
    }

    if field.multiple {
        let items = value.as_array().ok_or_else(|| SchemaError::InvalidType {
            key: key.to_owned(),
            expected_type: format!("array of {}", field.field_type.as_str()),
            actual_details: value_type_name(value).to_owned(),
        })?;
        for (idx, item) in items.iter().enumerate() {
            validate_single(&format!("{key}[{idx}]"), field, item)?;
        }
        return Ok(());
    }

    validate_single(key, field, value)
}

fn validate_single(key: &str, field: &FieldDef, value: &Value) -> Result<(), SchemaError> {
    if !matches_type(field.field_type, value) {
        return Err(type_error(key, field, value));
    }

    if let Value::Object(obj) = value {
        for (child_key, child) in &field.properties {
            let path = format!("{key}.{child_key}");
            match obj.get(child_key) {
                Some(child_value) => validate_value(&path, child, child_value)?,
                None if child.required => return Err(SchemaError::MissingValue { key: path }),
                None => {}
            }
        }
    }

    Ok(())
}

fn type_error(key: &str, field: &FieldDef, value: &Value) -> SchemaError {
    SchemaError::InvalidType {
        key: key.to_owned(),
        expected_type: field.field_type.as_str().to_owned(),
        actual_details: value_type_name(value).to_owned(),
    }
}
