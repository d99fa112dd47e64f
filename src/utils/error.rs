//! Error types for permkit

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, PermError>;

/// Main error type for permission operations
#[derive(Error, Debug)]
pub enum PermError {
    /// Permission key string could not be parsed
    #[error("Malformed permission key: {0}")]
    MalformedKey(String),

    /// Object-scoped key was resolved without a usable object reference
    #[error("Incorrect object: {0}")]
    IncorrectObject(String),

    /// Supplied object reference does not match the key's model
    #[error("Incorrect content type: {0}")]
    IncorrectContentType(String),

    /// Supplied object reference has no primary key yet
    #[error("Object not persisted: {0}")]
    ObjectNotPersisted(String),

    /// No matching permission row, holder, or group
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness constraint violation in the permission store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid configuration detected at startup
    #[error("Misconfigured: {0}")]
    Misconfigured(String),

    /// Backend-specific storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors while loading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors while loading configuration
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Helper functions for creating specific errors
impl PermError {
    pub fn malformed_key<S: Into<String>>(message: S) -> Self {
        Self::MalformedKey(message.into())
    }

    pub fn incorrect_object<S: Into<String>>(message: S) -> Self {
        Self::IncorrectObject(message.into())
    }

    pub fn incorrect_content_type<S: Into<String>>(message: S) -> Self {
        Self::IncorrectContentType(message.into())
    }

    pub fn object_not_persisted<S: Into<String>>(message: S) -> Self {
        Self::ObjectNotPersisted(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn misconfigured<S: Into<String>>(message: S) -> Self {
        Self::Misconfigured(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    /// Whether this error came from resolving a permission argument.
    ///
    /// `has_perm` degrades these to a plain `false` instead of failing the
    /// caller; everything else still propagates.
    pub fn is_resolution_miss(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::MalformedKey(_))
    }
}
