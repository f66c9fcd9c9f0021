//! Error types for narramix

use thiserror::Error;

/// Main error type for narramix
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed audio: {0}")]
    MalformedAudio(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Resample error: {0}")]
    Resample(String),

    #[error("Mix configuration error: {0}")]
    MixConfig(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Input '{name}': {source}")]
    Input {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type for narramix operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach the offending input (file path or segment index) to an error.
    ///
    /// Batch operations abort on the first failure; the caller needs to know
    /// which input broke the run.
    pub fn for_input(name: impl Into<String>, err: Error) -> Self {
        Error::Input {
            name: name.into(),
            source: Box::new(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
