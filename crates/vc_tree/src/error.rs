use core::fmt::Display;

use thiserror::Error;

use crate::serde::TYPE_KEY;

// -----------------------------------------------------------------------------
// SerializeError

/// A rich value could not export its fields.
///
/// Never surfaced by [`serialize`](crate::serialize): the container holding the
/// value logs it and drops the entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to export fields: {message}")]
pub struct SerializeError {
    message: String,
}

impl SerializeError {
    /// Creates an error from any displayable message.
    pub fn custom(message: impl Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    /// Returns the message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// -----------------------------------------------------------------------------
// ReconstructError

/// A tagged mapping could not be turned back into a rich value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReconstructError {
    #[error("mapping does not contain the type key `{}`", TYPE_KEY)]
    MissingTypeKey,

    #[error("type key must hold a string alias, found {0}")]
    InvalidTypeKey(&'static str),

    #[error("specified type does not exist: `{0}`")]
    UnknownAlias(String),

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("invalid field `{field}`: expected {expected}, found {found}")]
    InvalidField {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

impl ReconstructError {
    /// Creates an error from any displayable message.
    pub fn custom(message: impl Display) -> Self {
        Self::Custom(message.to_string())
    }
}

// -----------------------------------------------------------------------------
// SerializationFailure

/// The only error of [`deserialize`](crate::deserialize) in fail-fast mode.
///
/// Displays as the message of the underlying [`ReconstructError`], which is
/// available through [`source`](std::error::Error::source) and
/// [`cause`](SerializationFailure::cause).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SerializationFailure {
    message: String,
    #[source]
    cause: ReconstructError,
}

impl SerializationFailure {
    /// Wraps a reconstruction error.
    pub fn new(cause: ReconstructError) -> Self {
        Self {
            message: cause.to_string(),
            cause,
        }
    }

    /// Returns the message of the underlying cause.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the underlying cause.
    #[inline]
    pub fn cause(&self) -> &ReconstructError {
        &self.cause
    }
}

impl From<ReconstructError> for SerializationFailure {
    #[inline]
    fn from(cause: ReconstructError) -> Self {
        Self::new(cause)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::{ReconstructError, SerializationFailure};

    #[test]
    fn failure_carries_cause_message() {
        let failure = SerializationFailure::new(ReconstructError::UnknownAlias("Nope".into()));
        assert_eq!(failure.to_string(), "specified type does not exist: `Nope`");
        assert_eq!(failure.message(), failure.to_string());
        assert!(failure.source().is_some());
        assert_eq!(
            failure.cause(),
            &ReconstructError::UnknownAlias("Nope".into())
        );
    }

    #[test]
    fn invalid_field_message() {
        let err = ReconstructError::InvalidField {
            field: "rating".into(),
            expected: "float",
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "invalid field `rating`: expected float, found string"
        );
    }
}
