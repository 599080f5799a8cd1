use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Per-destination static configuration values, keyed by setting name.
///
/// Values are stored exactly as configured (`apiKey`, `orgId`, flags).
/// Defaults and validation come from the destination's settings schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

impl Settings {
    /// Create an empty settings set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from a JSON object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(CoreError::SettingsNotAnObject),
        }
    }

    /// Set a value (builder-style, consuming).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Get a value by setting key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a value for a setting key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Check whether a value exists for the given key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of values stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Try to get a value as a string reference.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_str()
    }

    /// Try to get a value as bool.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key)?.as_bool()
    }

    /// Render the settings as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Index<&str> for Settings {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_get() {
        let mut settings = Settings::new();
        settings.set("apiKey", json!("sk_test"));
        settings.set("debug", json!(true));

        assert_eq!(settings.get_str("apiKey"), Some("sk_test"));
        assert_eq!(settings.get_bool("debug"), Some(true));
        assert_eq!(settings.get_str("debug"), None);
        assert_eq!(settings.len(), 2);
        assert!(settings.contains("apiKey"));
        assert!(!settings.contains("orgId"));
    }

    #[test]
    fn from_value_requires_object() {
        let settings = Settings::from_value(json!({"orgId": "o-1"})).unwrap();
        assert_eq!(settings["orgId"], json!("o-1"));

        assert_eq!(
            Settings::from_value(json!("nope")),
            Err(CoreError::SettingsNotAnObject)
        );
    }

    #[test]
    fn serde_is_flat_object() {
        let settings = Settings::new().with("apiKey", json!("k"));
        assert_eq!(serde_json::to_value(&settings).unwrap(), json!({"apiKey": "k"}));
        assert_eq!(settings.to_value(), json!({"apiKey": "k"}));
    }

    #[test]
    fn iter_is_key_ordered() {
        let settings = Settings::new()
            .with("b", json!(2))
            .with("a", json!(1));
        let keys: Vec<&str> = settings.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
