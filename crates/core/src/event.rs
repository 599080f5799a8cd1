//! The normalized analytics event that actions map from.
//!
//! An [`Event`] is an immutable view over a JSON object in the common
//! track / identify / page message shape. The raw document stays
//! available for path resolution; typed accessors cover the fields every
//! destination reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Kind of analytics call that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// A user action (`analytics.track`).
    Track,
    /// A user profile update (`analytics.identify`).
    Identify,
    /// A web page view.
    Page,
    /// A mobile screen view.
    Screen,
    /// An account/company association.
    Group,
    /// Merging two user identities.
    Alias,
}

impl EventType {
    /// The wire name (`"track"`, `"identify"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Identify => "identify",
            Self::Page => "page",
            Self::Screen => "screen",
            Self::Group => "group",
            Self::Alias => "alias",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(Self::Track),
            "identify" => Ok(Self::Identify),
            "page" => Ok(Self::Page),
            "screen" => Ok(Self::Screen),
            "group" => Ok(Self::Group),
            "alias" => Ok(Self::Alias),
            other => Err(CoreError::UnknownEventType(other.to_owned())),
        }
    }
}

/// A normalized analytics event.
///
/// Construction validates that the document is a JSON object with a known
/// `type`. Nothing else is required: destinations decide which fields
/// they need through their field schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Event {
    event_type: EventType,
    raw: Value,
}

impl Event {
    /// Create an empty event of the given type.
    pub fn new(event_type: EventType) -> Self {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(event_type.as_str().into()));
        Self {
            event_type,
            raw: Value::Object(map),
        }
    }

    /// Wrap a raw JSON document, validating its shape.
    pub fn from_value(raw: Value) -> Result<Self, CoreError> {
        let obj = raw.as_object().ok_or(CoreError::NotAnObject)?;
        let type_name = obj
            .get("type")
            .ok_or(CoreError::MissingField("type"))?
            .as_str()
            .ok_or(CoreError::InvalidField {
                field: "type",
                expected: "string",
            })?;
        let event_type = type_name.parse()?;
        Ok(Self { event_type, raw })
    }

    /// Set a top-level field (builder-style). Intended for fixtures and tests.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key == "type" {
            return self;
        }
        if let Value::Object(map) = &mut self.raw {
            map.insert(key, value);
        }
        self
    }

    /// The event type.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// The full JSON document.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Consume the event and return the JSON document.
    pub fn into_value(self) -> Value {
        self.raw
    }

    /// Top-level field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.raw.get(key)?.as_str()
    }

    /// `userId`, when present and a string.
    pub fn user_id(&self) -> Option<&str> {
        self.get_str("userId")
    }

    /// `anonymousId`, when present and a string.
    pub fn anonymous_id(&self) -> Option<&str> {
        self.get_str("anonymousId")
    }

    /// Track event name (`event`).
    pub fn event_name(&self) -> Option<&str> {
        self.get_str("event")
    }

    /// Page or screen name (`name`).
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// `messageId`, when present.
    pub fn message_id(&self) -> Option<&str> {
        self.get_str("messageId")
    }

    /// `traits` object, when present.
    pub fn traits(&self) -> Option<&Map<String, Value>> {
        self.raw.get("traits")?.as_object()
    }

    /// `properties` object, when present.
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.raw.get("properties")?.as_object()
    }
}

impl TryFrom<Value> for Event {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Event> for Value {
    fn from(event: Event) -> Self {
        event.raw
    }
}
