use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::field::FieldDef;

/// An ordered set of field definitions keyed by field name.
///
/// Insertion order is preserved so the mapping UI and generated defaults
/// list fields the way the action author declared them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCollection {
    fields: IndexMap<String, FieldDef>,
}

impl FieldCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field definition (builder-style, consuming).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, field: FieldDef) -> Self {
        self.fields.insert(key.into(), field);
        self
    }

    /// Add a field definition. Replaces an existing field with the same key.
    pub fn add(&mut self, key: impl Into<String>, field: FieldDef) -> &mut Self {
        self.fields.insert(key.into(), field);
        self
    }

    /// Get a field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldDef> {
        self.fields.get(key)
    }

    /// Check whether a field with the given key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate over all field keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Keys of fields marked `required`.
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, f)| f.required)
            .map(|(k, _)| k.as_str())
    }

    /// The number of fields in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(key, definition)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = (&'a String, &'a FieldDef);
    type IntoIter = indexmap::map::Iter<'a, String, FieldDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<(String, FieldDef)> for FieldCollection {
    fn from_iter<I: IntoIterator<Item = (String, FieldDef)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn sample() -> FieldCollection {
        FieldCollection::new()
            .with("event_name", FieldDef::string("Event name").required())
            .with("company_keys", FieldDef::object("Company keys"))
            .with("traits", FieldDef::object("Traits"))
    }

    #[test]
    fn new_is_empty() {
        let col = FieldCollection::new();
        assert!(col.is_empty());
        assert_eq!(col.len(), 0);
    }

    #[test]
    fn preserves_declaration_order() {
        let col = sample();
        let keys: Vec<&str> = col.keys().collect();
        assert_eq!(keys, vec!["event_name", "company_keys", "traits"]);
    }

    #[test]
    fn get_and_contains() {
        let col = sample();
        assert_eq!(col.get("traits").unwrap().field_type, FieldType::Object);
        assert!(col.contains("company_keys"));
        assert!(col.get("missing").is_none());
    }

    #[test]
    fn add_replaces_existing_key() {
        let mut col = sample();
        col.add("traits", FieldDef::string("Replaced"));
        assert_eq!(col.len(), 3);
        assert_eq!(col.get("traits").unwrap().label, "Replaced");
    }

    #[test]
    fn required_keys_filters() {
        let col = sample();
        let required: Vec<&str> = col.required_keys().collect();
        assert_eq!(required, vec!["event_name"]);
    }

    #[test]
    fn serializes_as_plain_map() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.is_object());
        assert_eq!(json["event_name"]["required"], serde_json::json!(true));

        let back: FieldCollection = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}
