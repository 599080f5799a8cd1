use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value type a field accepts.
///
/// Determines both the mapping UI widget and the validation applied to a
/// resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Single-line string.
    String,
    /// Multi-line string.
    Text,
    /// Any JSON number.
    Number,
    /// Whole number.
    Integer,
    /// `true` / `false`.
    Boolean,
    /// ISO-8601 timestamp carried as a string.
    Datetime,
    /// Masked string.
    Password,
    /// Key/value object.
    Object,
    /// Not shown in the mapping UI; accepts any value.
    Hidden,
}

impl FieldType {
    /// The wire name (`"string"`, `"object"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Password => "password",
            Self::Object => "object",
            Self::Hidden => "hidden",
        }
    }
}

/// Widget hint for object-typed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectUi {
    /// Free-form key/value editor.
    Keyvalue,
    /// Declared properties rendered as a form.
    Object,
    /// Raw JSON editor.
    Arrayeditor,
}

/// Declarative description of one action input field.
///
/// `default` holds a mapping directive in JSON form: a literal, a
/// `{"@path": "$.userId"}` reference, a `{"@template": "..."}` string, or
/// (for object fields) an object whose values are themselves directives.
/// Interpreting directives is the mapping layer's job; this type only
/// carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Human-readable label.
    pub label: String,

    /// Longer help text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Accepted value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether resolution must produce a value.
    #[serde(default)]
    pub required: bool,

    /// Default mapping directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Declared child properties for object fields.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, FieldDef>,

    /// Whether keys beyond `properties` are passed through.
    #[serde(default)]
    pub additional_properties: bool,

    /// The field holds an array of `field_type` values.
    #[serde(default)]
    pub multiple: bool,

    /// `null` is an acceptable resolved value.
    #[serde(default)]
    pub allow_null: bool,

    /// Widget hint for object fields.
    #[serde(default, rename = "defaultObjectUI", skip_serializing_if = "Option::is_none")]
    pub default_object_ui: Option<ObjectUi>,
}

impl FieldDef {
    /// Create a field with a label and type; everything else empty.
    #[must_use]
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            field_type,
            required: false,
            default: None,
            properties: IndexMap::new(),
            additional_properties: false,
            multiple: false,
            allow_null: false,
            default_object_ui: None,
        }
    }

    /// Shorthand for a string field.
    #[must_use]
    pub fn string(label: impl Into<String>) -> Self {
        Self::new(label, FieldType::String)
    }

    /// Shorthand for an object field.
    #[must_use]
    pub fn object(label: impl Into<String>) -> Self {
        Self::new(label, FieldType::Object)
    }

    /// Shorthand for a boolean field.
    #[must_use]
    pub fn boolean(label: impl Into<String>) -> Self {
        Self::new(label, FieldType::Boolean)
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

    /// Set the default directive.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Declare a child property (builder-style).
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, field: FieldDef) -> Self {
        self.properties.insert(key.into(), field);
        self
    }

    #[must_use]
    pub fn additional_properties(mut self) -> Self {
        self.additional_properties = true;
        self
    }

    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    #[must_use]
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    #[must_use]
    pub fn with_object_ui(mut self, ui: ObjectUi) -> Self {
        self.default_object_ui = Some(ui);
        self
    }

    /// Whether this is an object field with declared properties.
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Whether undeclared keys should be dropped from a resolved object.
    ///
    /// Only object fields that declare properties and do not opt into
    /// `additionalProperties` are closed; an object with no declared
    /// properties is free-form.
    pub fn is_closed_object(&self) -> bool {
        self.field_type == FieldType::Object && self.has_properties() && !self.additional_properties
    }
}
