//! Error types for the projection engine

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ModelError>;

/// A parameter set that cannot be projected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("missing required parameter `{0}`")]
    Missing(String),

    #[error("parameter `{name}` = {value} is out of domain: {reason}")]
    OutOfDomain {
        name: String,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown CAPEX scenario `{0}`")]
    UnknownCapexScenario(String),

    #[error("unknown scenario preset `{0}`")]
    UnknownScenario(String),

    #[error("unknown parameter name `{0}`")]
    UnknownName(String),
}

/// Top-level error for engine, loader and report operations
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    /// IRR search could not bracket a root; callers report IRR as undefined
    #[error("IRR did not converge: {reason}")]
    NoConvergence { reason: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ModelError {
    /// True for errors caused by bad input parameters
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, ModelError::InvalidParameter(_))
    }
}
