use conduit_schema::SchemaError;

/// Errors produced while compiling or applying a mapping.
///
/// A path that simply does not exist in the event is *not* an error: the
/// field resolves to nothing and is omitted from the payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A required field resolved to nothing.
    #[error("missing required field `{field}`")]
    MissingRequired { field: String },

    /// An `@path` directive could not be parsed.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// An `@template` directive could not be parsed.
    #[error("invalid template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A directive object has an unknown or malformed `@` key.
    #[error("invalid directive for `{field}`: {reason}")]
    InvalidDirective { field: String, reason: String },

    /// The resolved value failed schema validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl MappingError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingRequired { .. } => "MAPPING_MISSING_REQUIRED",
            Self::InvalidPath { .. } => "MAPPING_INVALID_PATH",
            Self::InvalidTemplate { .. } => "MAPPING_INVALID_TEMPLATE",
            Self::InvalidDirective { .. } => "MAPPING_INVALID_DIRECTIVE",
            Self::Schema(err) => err.code(),
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::MissingRequired { .. } | Self::Schema(_) => "validation",
            Self::InvalidPath { .. }
            | Self::InvalidTemplate { .. }
            | Self::InvalidDirective { .. } => "mapping",
        }
    }
}
