use thiserror::Error;

/// Result type alias for theme extraction.
pub type Result<T> = std::result::Result<T, ThemeError>;

/// Errors produced by the extraction core.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The pixel buffer holds no pixels, so neither an average nor a palette exists.
    #[error("pixel buffer is empty")]
    EmptyInput,

    /// The byte slice does not match the declared dimensions.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// The declared dimensions do not fit in addressable memory.
    #[error("pixel buffer dimensions {width}x{height} are too large")]
    Dimensions { width: u32, height: u32 },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {parameter} = {value}")]
    InvalidConfig { parameter: String, value: String },

    /// A configuration file could not be read or parsed.
    #[error("failed to load configuration: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ThemeError {
    pub(crate) fn invalid_config(parameter: &str, value: impl ToString) -> Self {
        Self::InvalidConfig {
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
