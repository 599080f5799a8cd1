/// Error type for schema validation.
///
/// Covers missing required values, type mismatches and malformed
/// schema declarations, for both action fields and destination settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A required value is absent.
    #[error("missing value for required field `{key}`")]
    MissingValue { key: String },

    /// Value type does not match the declared type.
    #[error("invalid type for `{key}`: expected {expected_type}, got {actual_details}")]
    InvalidType {
        key: String,
        expected_type: String,
        actual_details: String,
    },

    /// Value is present but outside the allowed choices.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    /// The schema itself is malformed.
    #[error("invalid schema for `{key}`: {reason}")]
    InvalidDefinition { key: String, reason: String },
}

impl SchemaError {
    /// The dotted key the error refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MissingValue { key }
            | Self::InvalidType { key, .. }
            | Self::InvalidValue { key, .. }
            | Self::InvalidDefinition { key, .. } => key,
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::MissingValue { .. } => "value",
            Self::InvalidType { .. } => "type",
            Self::InvalidValue { .. } => "value",
            Self::InvalidDefinition { .. } => "definition",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingValue { .. } => "SCHEMA_MISSING_VALUE",
            Self::InvalidType { .. } => "SCHEMA_INVALID_TYPE",
            Self::InvalidValue { .. } => "SCHEMA_INVALID_VALUE",
            Self::InvalidDefinition { .. } => "SCHEMA_INVALID_DEFINITION",
        }
    }
}
