//! Errors raised while building or using error types
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErratiError {
    /// Two distinct entries computed the same alias
    #[error("Error with index already exists: {alias}")]
    AliasConflict { alias: String },

    #[error("Malformed dictionary entry {index}: {reason}")]
    MalformedEntry { index: String, reason: String },

    #[error("No error type registered as {0}")]
    UnknownAlias(String),

    #[error("Error type {type_name} has no method {method}")]
    UnknownMethod { type_name: String, method: String },
}
