//! # qgrad Core
//!
//! Parameters, parameterized circuits, Pauli observables and layouts used by
//! the qgrad estimator and gradient crates.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qgrad_core // L0+L1: Foundation + Circuit
//!     L0_Foundation
//!         CoreTypes // 핵심 타입
//!         Errors // 에러 타입
//!     L1_Circuit
//!         Parameter // 심볼 파라미터 (identity, not name)
//!         Gate // 게이트 enum, generic over angle
//!         ParameterizedCircuit // 회로 + 파라미터 순서
//!         CircuitBuilder // 빌더 패턴
//!         Observable // SparsePauliOp + apply_layout
//!         Layout // virtual -> physical
//!         Topology // 큐비트 토폴로지
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qgrad_core::prelude::*;
//!
//! let theta = ParameterVector::new("θ", 2);
//! let circuit = CircuitBuilder::new(2)
//!     .ry(0, &theta[0])
//!     .cnot(0, 1)
//!     .rx(1, &theta[1])
//!     .build();
//!
//! assert_eq!(circuit.num_parameters(), 2);
//! assert_eq!(circuit.parameter_index(&theta[1]).unwrap(), 1);
//!
//! let observable = SparsePauliOp::from_list(&[("ZZ", 1.0), ("XI", 0.5)]).unwrap();
//! assert_eq!(observable.num_qubits(), circuit.num_qubits());
//! ```
//!
//! ## Layouts
//!
//! ```rust
//! use qgrad_core::prelude::*;
//!
//! let layout = Topology::linear(5).chain_layout(2).unwrap();
//! let observable = SparsePauliOp::from_label("ZI", 1.0).unwrap();
//! let physical = observable.apply_layout(Some(&layout), None).unwrap();
//! assert_eq!(physical.num_qubits(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Symbolic parameters (Gantree: L1_Circuit → Parameter)
pub mod parameter;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Parameterized circuits (Gantree: L1_Circuit → ParameterizedCircuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

/// Pauli observables (Gantree: L1_Circuit → Observable)
pub mod observable;

/// Qubit layouts (Gantree: L1_Circuit → Layout)
pub mod layout;

/// Qubit topology (Gantree: L1_Circuit → Topology)
pub mod topology;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::ParameterizedCircuit;
pub use error::{CoreError, CoreResult};
pub use gate::{BoundGate, Gate};
pub use layout::Layout;
pub use observable::{Pauli, PauliString, SparsePauliOp};
pub use parameter::{ParamExpr, Parameter, ParameterId, ParameterVector};
pub use topology::Topology;
pub use types::{check_finite, Angle, ParamVec, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qgrad_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::ParameterizedCircuit;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::gate::{BoundGate, Gate};
    pub use crate::layout::Layout;
    pub use crate::observable::{Pauli, PauliString, SparsePauliOp};
    pub use crate::parameter::{ParamExpr, Parameter, ParameterVector};
    pub use crate::topology::Topology;
    pub use crate::types::{Angle, ParamVec, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transpiled_circuit_and_observable_agree() {
        let params = ParameterVector::new("θ", 3);
        let circuit = CircuitBuilder::new(3).real_amplitudes(&params, 0).cx_chain().build();
        let observable = SparsePauliOp::from_list(&[("ZZI", 1.0), ("IXX", -0.5)]).unwrap();

        let topo = Topology::ring(6);
        let layout = topo.chain_layout(circuit.num_qubits()).unwrap();
        let mapped = circuit.remap(&layout).unwrap();
        let mapped_obs = observable.apply_layout(mapped.layout(), None).unwrap();

        assert_eq!(mapped.num_qubits(), 6);
        assert_eq!(mapped_obs.num_qubits(), 6);
        assert!(topo.validate_circuit(&mapped).is_ok());
        // Parameter order survives transpilation
        assert_eq!(mapped.parameters(), circuit.parameters());
    }

    #[test]
    fn test_requested_subset_order() {
        let params = ParameterVector::new("x", 4);
        let circuit = CircuitBuilder::new(2)
            .rx(0, &params[0])
            .ry(1, &params[1])
            .rz(0, &params[2])
            .rz(1, &params[3])
            .build();

        let subset = vec![params[3].clone(), params[0].clone()];
        assert_eq!(circuit.parameter_indices(&subset).unwrap(), vec![3, 0]);
    }

    #[test]
    fn test_bound_circuit_is_numeric() {
        let theta = Parameter::new("theta");
        let circuit = CircuitBuilder::new(1).rx(0, theta.scaled(0.5, 0.1)).build();
        let bound = circuit.bind(&[2.0]).unwrap();
        match bound[0] {
            Gate::Rx(0, angle) => assert_relative_eq!(angle, 1.1, epsilon = 1e-12),
            ref other => panic!("unexpected gate {:?}", other),
        }
    }
}
