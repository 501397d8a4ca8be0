//! Lowering errors

use thiserror::Error;

pub type LowerResult<T> = Result<T, LowerError>;

/// Failures that prevent one method from being lowered at all
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LowerError {
    #[error("Default value {literal} of parameter '{param}' is not assignable to '{target}'")]
    IncompatibleDefault {
        param: String,
        literal: String,
        target: String,
    },
}

/// Errors while loading lowering configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
