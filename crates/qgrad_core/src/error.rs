//! Error types for qgrad core
//!
//! Gantree: L0_Foundation → Errors
//!
//! Validation errors raised by parameters, circuits, observables and layouts.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Core error type
/// Gantree: CoreError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    // ========================================================================
    // Parameter Errors
    // ========================================================================
    /// Parameter is not part of the circuit
    /// Gantree: ParameterNotFound(String) // 파라미터 없음
    #[error("Parameter '{0}' is not a parameter of the circuit")]
    ParameterNotFound(String),

    /// Parameter resolves to more than one position
    #[error("Parameter '{name}' resolves to {count} positions in the circuit")]
    AmbiguousParameter { name: String, count: usize },

    /// Number of bound values does not match the number of parameters
    /// Gantree: ParameterCountMismatch{expected,got} // 값 개수
    #[error("Expected {expected} parameter values, got {got}")]
    ParameterCountMismatch { expected: usize, got: usize },

    /// Non-finite value bound to a parameter
    #[error("Invalid parameter value {0}: must be finite")]
    InvalidParameterValue(f64),

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Gate on non-existent qubit
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Qubit index out of range
    #[error("Qubit {qubit} out of range: max is {max}")]
    QubitOutOfRange { qubit: usize, max: usize },

    // ========================================================================
    // Observable / Layout Errors
    // ========================================================================
    /// Observable and circuit widths disagree
    /// Gantree: QubitCountMismatch{left,right} // 큐비트 수
    #[error("Qubit count mismatch: {left} vs {right}")]
    QubitCountMismatch { left: usize, right: usize },

    /// Layout cannot shrink an observable
    #[error("Cannot apply layout: observable has {current} qubits, target has {target}")]
    NotEnoughQubits { current: usize, target: usize },

    /// Malformed layout
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Malformed Pauli label
    #[error("Invalid Pauli label '{0}': must contain only I, X, Y, Z")]
    InvalidPauliLabel(String),

    /// Non-finite observable coefficient
    #[error("Invalid coefficient {0}: must be finite")]
    InvalidCoefficient(f64),

    // ========================================================================
    // Topology Errors
    // ========================================================================
    /// Empty coupling map
    #[error("Coupling map is empty")]
    EmptyCouplingMap,

    /// Invalid coupling
    #[error("Invalid coupling ({0}, {1}): qubits must be different")]
    InvalidCoupling(usize, usize),

    /// No chain of the requested length
    #[error("No linear chain of {0} qubits found in topology")]
    NoLinearChain(usize),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for core operations
/// Gantree: CoreResult<T> // type alias
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::JsonError(err.to_string())
    }
}

impl CoreError {
    /// Check if error comes from parameter resolution or binding
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            CoreError::ParameterNotFound(_)
                | CoreError::AmbiguousParameter { .. }
                | CoreError::ParameterCountMismatch { .. }
                | CoreError::InvalidParameterValue(_)
        )
    }

    /// Check if error comes from observable/layout handling
    pub fn is_layout_error(&self) -> bool {
        matches!(
            self,
            CoreError::NotEnoughQubits { .. }
                | CoreError::InvalidLayout(_)
                | CoreError::QubitCountMismatch { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::ParameterCountMismatch {
            expected: 3,
            got: 2,
        };
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn test_parameter_not_found_names_parameter() {
        let err = CoreError::ParameterNotFound("theta".into());
        assert!(err.to_string().contains("theta"));
    }

    #[test]
    fn test_classification() {
        assert!(CoreError::ParameterNotFound("a".into()).is_parameter_error());
        assert!(!CoreError::EmptyCouplingMap.is_parameter_error());
        assert!(CoreError::InvalidLayout("dup".into()).is_layout_error());
    }
}
