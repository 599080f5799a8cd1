use conduit_core::Settings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::validation::value_type_name;

/// Value type of a destination setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    /// String whose value is masked in UIs and logs.
    Password,
    Boolean,
    Number,
}

impl SettingType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String | Self::Password => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Password => "password",
            Self::Boolean => "boolean",
            Self::Number => "number",
        }
    }
}

/// Declaration of one destination setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDef {
    pub label: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "type")]
    pub setting_type: SettingType,

    #[serde(default)]
    pub required: bool,

    /// Literal applied when the setting is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Allowed string values; empty means unrestricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl SettingDef {
    #[must_use]
    pub fn new(label: impl Into<String>, setting_type: SettingType) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            setting_type,
            required: false,
            default: None,
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the value should be masked in the UI and logs.
    pub fn is_sensitive(&self) -> bool {
        self.setting_type == SettingType::Password
    }
}

/// The settings a destination accepts, keyed by setting name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsSchema {
    settings: IndexMap<String, SettingDef>,
}

impl SettingsSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting declaration (builder-style, consuming).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, def: SettingDef) -> Self {
        self.settings.insert(key.into(), def);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SettingDef> {
        self.settings.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingDef)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Validate configured settings and fill in defaults.
    ///
    /// Keys the schema does not declare are kept untouched. A required
    /// string setting configured as `""` counts as missing.
    pub fn resolve(&self, configured: &Settings) -> Result<Settings, SchemaError> {
        let mut resolved = configured.clone();

        for (key, def) in &self.settings {
            match configured.get(key) {
                Some(value) if def.required && value.as_str() == Some("") => {
                    return Err(SchemaError::MissingValue { key: key.clone() });
                }
                Some(value) => check_setting(key, def, value)?,
                None => match &def.default {
                    Some(default) => resolved.set(key.clone(), default.clone()),
                    None if def.required => {
                        return Err(SchemaError::MissingValue { key: key.clone() });
                    }
                    None => {}
                },
            }
        }

        Ok(resolved)
    }

    /// Render settings as JSON with sensitive values masked.
    #[must_use]
    pub fn redact(&self, settings: &Settings) -> Value {
        Value::Object(
            settings
                .iter()
                .map(|(key, value)| {
                    let sensitive = self.get(key).is_some_and(SettingDef::is_sensitive);
                    let shown = if sensitive {
                        Value::String("***".into())
                    } else {
                        value.clone()
                    };
                    (key.to_owned(), shown)
                })
                .collect(),
        )
    }
}

fn check_setting(key: &str, def: &SettingDef, value: &Value) -> Result<(), SchemaError> {
    if !def.setting_type.accepts(value) {
        return Err(SchemaError::InvalidType {
            key: key.to_owned(),
            expected_type: def.setting_type.as_str().to_owned(),
            actual_details: value_type_name(value).to_owned(),
        });
    }
    if let Some(s) = value.as_str() {
        if !def.choices.is_empty() && !def.choices.iter().any(|c| c == s) {
            return Err(SchemaError::InvalidValue {
                key: key.to_owned(),
                reason: format!("must be one of {}", def.choices.join(", ")),
            });
        }
    }
    Ok(())
}
