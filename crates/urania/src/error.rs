use thiserror::Error;

/// Malformed input rejected before any layout or aspect computation runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Point '{id}' has a non-finite angle")]
    NonFiniteAngle { id: String },
    #[error("Point '{id}' has a non-finite speed")]
    NonFiniteSpeed { id: String },
    #[error("Duplicate point id: {0}")]
    DuplicateId(String),
    #[error("Point set is empty")]
    EmptyPointSet,
    #[error("Minimum separation must be a finite, non-negative number of degrees, got {0}")]
    InvalidSeparation(f64),
    #[error("Radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
    #[error("Invalid cusps: {0}")]
    InvalidCusps(String),
    #[error("Invalid aspect: {0}")]
    InvalidAspect(String),
}

/// Errors that can occur when loading chart settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}
