/// Errors raised while constructing core values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The event document is not a JSON object.
    #[error("event must be a JSON object")]
    NotAnObject,

    /// A mandatory top-level field is absent.
    #[error("event is missing required field `{0}`")]
    MissingField(&'static str),

    /// A top-level field has the wrong JSON type.
    #[error("event field `{field}` must be a {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// `type` names an event kind this crate does not know.
    #[error("unknown event type `{0}`")]
    UnknownEventType(String),

    /// Settings document is not a JSON object.
    #[error("settings must be a JSON object")]
    SettingsNotAnObject,
}

impl CoreError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::NotAnObject => "EVENT_NOT_OBJECT",
            Self::MissingField(_) => "EVENT_MISSING_FIELD",
            Self::InvalidField { .. } => "EVENT_INVALID_FIELD",
            Self::UnknownEventType(_) => "EVENT_UNKNOWN_TYPE",
            Self::SettingsNotAnObject => "SETTINGS_NOT_OBJECT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            CoreError::MissingField("type").to_string(),
            "event is missing required field `type`"
        );
        assert_eq!(
            CoreError::InvalidField {
                field: "type",
                expected: "string"
            }
            .to_string(),
            "event field `type` must be a string"
        );
        assert_eq!(
            CoreError::UnknownEventType("purchase".into()).to_string(),
            "unknown event type `purchase`"
        );
    }

    #[test]
    fn codes_are_unique() {
        let errors = [
            CoreError::NotAnObject,
            CoreError::MissingField("type"),
            CoreError::InvalidField {
                field: "type",
                expected: "string",
            },
            CoreError::UnknownEventType(String::new()),
            CoreError::SettingsNotAnObject,
        ];
        let mut codes: Vec<&str> = errors.iter().map(CoreError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
