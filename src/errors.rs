use ebm_core::errors::EBMError;
use thiserror::Error;

/// Error type for configuring and running simulations.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Model(#[from] EBMError),
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid CO2 scenario: {0}")]
    InvalidScenario(String),
}

/// Convenience type for `Result<T, SimulationError>`.
pub type SimulationResult<T> = Result<T, SimulationError>;
