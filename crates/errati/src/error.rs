//! Setup errors
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Unknown dictionary: {0}")]
    UnknownDictionary(String),

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] errati_core::ErratiError),
}
