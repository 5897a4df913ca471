//! Configuration Error Types

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No value for key '{key}' in section '{section}'")]
    NotFound { section: String, key: String },

    #[error("Invalid value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Result type for configuration lookups
pub type ConfigResult<T> = Result<T, ConfigError>;
