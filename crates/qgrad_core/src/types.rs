//! Core types for qgrad
//!
//! Gantree: L0_Foundation → CoreTypes

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Rotation angle in radians
pub type Angle = f64;

/// Parameter value vector, ordered like the circuit's parameters
/// Gantree: ParamVec // pub type ParamVec = Vec<f64>
pub type ParamVec = Vec<f64>;

// ============================================================================
// Helpers
// ============================================================================

/// Check that every value in a parameter vector is finite
pub fn check_finite(values: &[f64]) -> CoreResult<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&bad) => Err(CoreError::InvalidParameterValue(bad)),
        None => Ok(()),
    }
}
