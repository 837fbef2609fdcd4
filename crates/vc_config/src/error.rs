use thiserror::Error;
use vc_tree::SerializationFailure;

/// An error of loading or saving a [`ConfigDocument`](crate::ConfigDocument).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration text: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("top level of a configuration must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("top level of a configuration cannot be a serialized object, found `{alias}`")]
    TopLevelObject { alias: String },

    #[error(transparent)]
    Serialization(#[from] SerializationFailure),
}
