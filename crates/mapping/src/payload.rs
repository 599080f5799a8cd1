use conduit_core::Event;
use conduit_schema::{FieldCollection, FieldDef, validate_value};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::MappingError;
use crate::mapping::Mapping;

/// A resolved, validated action payload.
///
/// Only declared fields appear, in declaration order. Actions read it
/// through [`Payload::deserialize`] into their own typed struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Deserialize into an action's typed payload.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(Value::Object(self.fields.clone()))
    }
}

/// Resolve `mapping` against `event` and validate the result.
///
/// Steps, per declared field:
///
/// 1. take the resolved value, if any;
/// 2. fail with [`MappingError::MissingRequired`] when a required field
///    resolved to nothing;
/// 3. drop undeclared keys from closed objects;
/// 4. check the value against the field type.
///
/// Mapped keys that no field declares are discarded.
pub fn build_payload(
    fields: &FieldCollection,
    mapping: &Mapping,
    event: &Event,
) -> Result<Payload, MappingError> {
    let mut resolved = mapping.resolve(event.as_value());
    let mut payload = Map::new();

    for (key, field) in fields {
        let Some(mut value) = resolved.remove(key.as_str()) else {
            if field.required {
                return Err(MappingError::MissingRequired { field: key.clone() });
            }
            continue;
        };

        prune_undeclared(field, &mut value);
        validate_value(key, field, &value)?;
        payload.insert(key.clone(), value);
    }

    if !resolved.is_empty() {
        tracing::debug!(
            dropped = ?resolved.keys().collect::<Vec<_>>(),
            "mapping produced undeclared fields"
        );
    }
    tracing::debug!(
        event_type = %event.event_type(),
        fields = payload.len(),
        "resolved payload"
    );

    Ok(Payload { fields: payload })
}

fn prune_undeclared(field: &FieldDef, value: &mut Value) {
    let Value::Object(obj) = value else {
        return;
    };
    if field.is_closed_object() {
        obj.retain(|k, _| field.properties.contains_key(k));
    }
    for (key, child) in &field.properties {
        if let Some(child_value) = obj.get_mut(key) {
            prune_undeclared(child, child_value);
        }
    }
}
