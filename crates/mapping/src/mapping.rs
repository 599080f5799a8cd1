use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::directive::Directive;
use crate::error::MappingError;

/// Field name → compiled directive.
///
/// A mapping is either the preset default (built from field definitions
/// by [`default_values`](crate::default_values)) or a customer-supplied
/// override. Directives are compiled on construction, so resolving a
/// mapping cannot fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    fields: IndexMap<String, Directive>,
}

impl Mapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a mapping from its JSON form (an object of directives).
    pub fn from_value(value: &Value) -> Result<Self, MappingError> {
        let obj = value
            .as_object()
            .ok_or_else(|| MappingError::InvalidDirective {
                field: "$".into(),
                reason: "mapping must be a JSON object".into(),
            })?;

        let mut mapping = Self::new();
        for (field, directive) in obj {
            mapping.set(field.clone(), directive)?;
        }
        Ok(mapping)
    }

    /// Compile and set the directive for one field.
    pub fn set(&mut self, field: impl Into<String>, directive: &Value) -> Result<(), MappingError> {
        let field = field.into();
        let compiled = Directive::parse(&field, directive)?;
        self.fields.insert(field, compiled);
        Ok(())
    }

    /// Set an already compiled directive (builder-style).
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, directive: Directive) -> Self {
        self.fields.insert(field.into(), directive);
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Directive> {
        self.fields.get(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Directive)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Layer customer overrides over defaults.
    ///
    /// Overrides replace defaults per top-level field; nested objects are
    /// not merged. Field order follows `defaults`, then new override keys.
    #[must_use]
    pub fn merge_overrides(defaults: &Self, overrides: &Self) -> Self {
        let mut merged = defaults.clone();
        for (field, directive) in &overrides.fields {
            merged.fields.insert(field.clone(), directive.clone());
        }
        merged
    }

    /// Evaluate every directive against `event`.
    ///
    /// Fields whose directive is undefined are omitted. Pure: the same
    /// inputs always produce the same object.
    #[must_use]
    pub fn resolve(&self, event: &Value) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|(field, d)| d.evaluate(event).map(|v| (field.clone(), v)))
            .collect()
    }

    /// Back to the JSON form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, d)| (k.clone(), d.to_value()))
                .collect(),
        )
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Evaluate `mapping` against `event`. See [`Mapping::resolve`].
#[must_use]
pub fn resolve(mapping: &Mapping, event: &Value) -> Value {
    Value::Object(mapping.resolve(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn defaults() -> Mapping {
        Mapping::from_value(&json!({
            "company_name": {"@path": "$.traits.company_name"},
            "user_keys": {"user_id": {"@path": "$.userId"}},
            "user_name": {"@path": "$.traits.name"}
        }))
        .unwrap()
    }

    #[test]
    fn from_value_requires_object() {
        let err = Mapping::from_value(&json!(["x"])).unwrap_err();
        assert_eq!(err.code(), "MAPPING_INVALID_DIRECTIVE");
    }

    #[test]
    fn resolve_omits_missing_paths() {
        let event = json!({"type": "identify", "userId": "u-1", "traits": {"name": "Ada"}});
        assert_eq!(
            resolve(&defaults(), &event),
            json!({"user_keys": {"user_id": "u-1"}, "user_name": "Ada"})
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let event = json!({
            "type": "identify",
            "userId": "u-1",
            "traits": {"name": "Ada", "company_name": "Acme"}
        });
        let mapping = defaults();
        assert_eq!(resolve(&mapping, &event), resolve(&mapping, &event));
    }

    #[test]
    fn overrides_replace_whole_fields() {
        let overrides = Mapping::from_value(&json!({
            "user_keys": {"email": {"@path": "$.traits.email"}},
            "company_traits": {"plan": "pro"}
        }))
        .unwrap();

        let merged = Mapping::merge_overrides(&defaults(), &overrides);
        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(
            keys,
            vec!["company_name", "user_keys", "user_name", "company_traits"]
        );

        let event = json!({"userId": "u-1", "traits": {"email": "ada@example.com"}});
        assert_eq!(
            resolve(&merged, &event),
            json!({
                "user_keys": {"email": "ada@example.com"},
                "company_traits": {"plan": "pro"}
            })
        );
    }

    #[test]
    fn serde_uses_directive_json() {
        let json = serde_json::to_value(defaults()).unwrap();
        assert_eq!(json["user_keys"], json!({"user_id": {"@path": "$.userId"}}));

        let back: Mapping = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), 3);

        let bad: Result<Mapping, _> = serde_json::from_value(json!({"x": {"@path": "$["}}));
        assert!(bad.is_err());
    }
}
