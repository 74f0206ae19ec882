//! Estimator errors
//!
//! Gantree: L2_Estimator → Errors

use qgrad_core::CoreError;
use thiserror::Error;

/// Errors raised while submitting or completing an estimator job
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// Job submission failed
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Job execution failed
    #[error("Job execution failed: {0}")]
    ExecutionFailed(String),

    /// Circuit is wider than the estimator can simulate
    #[error("Circuit has {got} qubits, estimator supports at most {max}")]
    TooManyQubits {
        /// Circuit width
        got: usize,
        /// Supported width
        max: usize,
    },

    /// Circuit, observable or layout problem
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other estimator-specific failure
    #[error("{0}")]
    Other(String),
}

impl EstimatorError {
    /// True if the error happened before the job was accepted
    pub fn is_submission_error(&self) -> bool {
        matches!(self, Self::SubmissionFailed(_))
    }
}

/// Result type for estimator operations
pub type EstimatorResult<T> = Result<T, EstimatorError>;
