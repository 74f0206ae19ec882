//! SPSA gradient errors
//!
//! Gantree: L3_Spsa → Errors
//!
//! A gradient call either returns a complete result or exactly one of
//! these errors; nothing partial is ever returned.

use qgrad_core::CoreError;
use qgrad_estimator::EstimatorError;
use thiserror::Error;

/// SPSA gradient error
/// Gantree: SpsaError // 에러 타입
#[derive(Debug, Error)]
pub enum SpsaError {
    /// Bad epsilon or batch size, or an estimator speaking no known protocol
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The estimator failed to accept or complete the job
    #[error("Estimator job failed: {message}")]
    EvaluatorFailure {
        /// Context of the failure
        message: String,
        /// Underlying cause
        #[source]
        source: EstimatorError,
    },

    /// Gradient task does not fit its circuit
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Config (de)serialization failed
    #[error("JSON error: {0}")]
    Json(String),

    /// Config file could not be read or written
    #[error("IO error: {0}")]
    Io(String),
}

impl SpsaError {
    /// Wrap an estimator error
    pub fn evaluator(message: impl Into<String>, source: EstimatorError) -> Self {
        Self::EvaluatorFailure {
            message: message.into(),
            source,
        }
    }

    /// Check if error is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    /// Check if error came from the estimator
    pub fn is_evaluator_failure(&self) -> bool {
        matches!(self, Self::EvaluatorFailure { .. })
    }
}

impl From<CoreError> for SpsaError {
    fn from(err: CoreError) -> Self {
        SpsaError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for SpsaError {
    fn from(err: serde_json::Error) -> Self {
        SpsaError::Json(err.to_string())
    }
}

impl From<std::io::Error> for SpsaError {
    fn from(err: std::io::Error) -> Self {
        SpsaError::Io(err.to_string())
    }
}

/// Result type for SPSA operations
pub type SpsaResult<T> = Result<T, SpsaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_evaluator_failure_keeps_source() {
        let err = SpsaError::evaluator(
            "legacy job",
            EstimatorError::ExecutionFailed("backend offline".into()),
        );
        assert!(err.is_evaluator_failure());
        assert_eq!(err.to_string(), "Estimator job failed: legacy job");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Job execution failed: backend offline");
    }

    #[test]
    fn test_core_error_is_invalid_input() {
        let err: SpsaError = CoreError::ParameterNotFound("x".into()).into();
        assert!(matches!(err, SpsaError::InvalidInput(msg) if msg.contains("x")));
    }

    #[test]
    fn test_classification() {
        assert!(SpsaError::InvalidConfiguration("eps".into()).is_configuration_error());
        assert!(!SpsaError::Io("disk".into()).is_configuration_error());
    }
}
