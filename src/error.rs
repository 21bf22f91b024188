use std::path::PathBuf;
use thiserror::Error;

/// Per-record failures raised while dispatching a raw record to a builder
///
/// These are local to a single record. The batch aggregator swallows them,
/// only direct callers of the dispatcher ever see one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultError {
    /// No registered builder handles the type tag
    #[error("Invalid type \"{type_name}\"")]
    InvalidType { type_name: String },

    /// Neither the raw record nor the caller supplied an identifier value
    #[error("Value missing. Pass in the data array or as the value argument.")]
    MissingValue,

    /// A mandatory field was absent or failed coercion
    #[error("Data field \"{field}\" missing")]
    MissingField { field: String },
}

impl ResultError {
    pub fn invalid_type(type_name: impl Into<String>) -> Self {
        Self::InvalidType {
            type_name: type_name.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Offending type tag, for `InvalidType`
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::InvalidType { type_name } => Some(type_name),
            _ => None,
        }
    }

    /// Missing field name, for `MissingField`
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } => Some(field),
            _ => None,
        }
    }
}

/// Main error type for the sfs-results application
#[derive(Error, Debug)]
pub enum SfsError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Input document has the wrong shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Single-record dispatch failure
    #[error(transparent)]
    Result(#[from] ResultError),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for sfs-results operations
pub type Result<T> = std::result::Result<T, SfsError>;
