//! Error types for GatiDrive

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// GatiDrive error types
///
/// Only construction-time operations are fallible. The per-cycle control
/// operations recover from degenerate inputs locally and report through
/// logging instead of errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
