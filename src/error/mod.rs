use thiserror::Error;

use crate::catalog::ModelKind;

/// Errors produced by the evaluation core
#[derive(Error, Debug)]
pub enum CalculusError {
    /// A supplied value violates a domain constraint
    #[error("Invalid parameter: {param} = {value} ({reason})")]
    InvalidParameter {
        param: String,
        value: String,
        reason: String,
    },

    /// No closed-form antiderivative could be produced
    #[error("Integration failed for {expression}: {reason}")]
    IntegrationFailure { expression: String, reason: String },

    /// A numeric evaluation produced NaN or an infinity
    #[error("Non-finite value {value} at t = {at}")]
    NumericDomainError { at: f64, value: f64 },

    /// The requested transform does not apply to this model family
    #[error("{operation} is not defined for {kind:?} models")]
    UnsupportedOperation {
        operation: &'static str,
        kind: ModelKind,
    },

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CalculusError {
    pub(crate) fn invalid(param: &str, value: impl ToString, reason: &str) -> Self {
        CalculusError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn integration(expression: impl ToString, reason: &str) -> Self {
        CalculusError::IntegrationFailure {
            expression: expression.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for errors the caller can fix by re-prompting for input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CalculusError::InvalidParameter { .. })
    }
}
