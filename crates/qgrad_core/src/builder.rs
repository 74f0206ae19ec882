//! Circuit builder for qgrad
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for parameterized circuits. Out-of-range gates are
//! dropped silently; use [`ParameterizedCircuit::add_gate`] when the error
//! matters.

use crate::circuit::ParameterizedCircuit;
use crate::gate::Gate;
use crate::parameter::{ParamExpr, Parameter, ParameterVector};
use crate::types::QubitId;

/// Fluent circuit builder (consuming self pattern)
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    circuit: ParameterizedCircuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: ParameterizedCircuit::new(num_qubits),
        }
    }

    /// Create with circuit name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: ParameterizedCircuit::with_name(num_qubits, name),
        }
    }

    fn push(mut self, gate: Gate) -> Self {
        let _ = self.circuit.add_gate(gate);
        self
    }

    // ========================================================================
    // Fixed Gates
    // ========================================================================

    /// Add Hadamard gate
    pub fn h(self, qubit: QubitId) -> Self {
        self.push(Gate::H(qubit))
    }

    /// Add Pauli-X gate
    pub fn x(self, qubit: QubitId) -> Self {
        self.push(Gate::X(qubit))
    }

    /// Add Pauli-Y gate
    pub fn y(self, qubit: QubitId) -> Self {
        self.push(Gate::Y(qubit))
    }

    /// Add Pauli-Z gate
    pub fn z(self, qubit: QubitId) -> Self {
        self.push(Gate::Z(qubit))
    }

    /// Add S gate
    pub fn s(self, qubit: QubitId) -> Self {
        self.push(Gate::S(qubit))
    }

    /// Add S-dagger gate
    pub fn sdg(self, qubit: QubitId) -> Self {
        self.push(Gate::Sdg(qubit))
    }

    /// Add T gate
    pub fn t(self, qubit: QubitId) -> Self {
        self.push(Gate::T(qubit))
    }

    /// Add SX gate
    pub fn sx(self, qubit: QubitId) -> Self {
        self.push(Gate::Sx(qubit))
    }

    // ========================================================================
    // Rotations (fixed or symbolic angle)
    // ========================================================================

    /// Add Rx rotation
    /// Gantree: rx(self, q, a) -> Self // Rx 추가
    pub fn rx(self, qubit: QubitId, angle: impl Into<ParamExpr>) -> Self {
        self.push(Gate::Rx(qubit, angle.into()))
    }

    /// Add Ry rotation
    pub fn ry(self, qubit: QubitId, angle: impl Into<ParamExpr>) -> Self {
        self.push(Gate::Ry(qubit, angle.into()))
    }

    /// Add Rz rotation
    pub fn rz(self, qubit: QubitId, angle: impl Into<ParamExpr>) -> Self {
        self.push(Gate::Rz(qubit, angle.into()))
    }

    /// Add phase gate
    pub fn p(self, qubit: QubitId, angle: impl Into<ParamExpr>) -> Self {
        self.push(Gate::P(qubit, angle.into()))
    }

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================

    /// Add CNOT gate
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.push(Gate::Cnot(control, target))
    }

    /// Add CZ gate
    pub fn cz(self, control: QubitId, target: QubitId) -> Self {
        self.push(Gate::Cz(control, target))
    }

    /// Add SWAP gate
    pub fn swap(self, q1: QubitId, q2: QubitId) -> Self {
        self.push(Gate::Swap(q1, q2))
    }

    /// Add controlled Rz rotation
    pub fn crz(self, control: QubitId, target: QubitId, angle: impl Into<ParamExpr>) -> Self {
        self.push(Gate::Crz(control, target, angle.into()))
    }

    /// Add barrier on all qubits
    pub fn barrier(self) -> Self {
        let qubits = (0..self.circuit.num_qubits()).collect();
        self.push(Gate::Barrier(qubits))
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Hadamard on every qubit
    pub fn h_layer(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n).fold(self, |b, q| b.h(q))
    }

    /// CNOT chain 0→1→...→N-1
    pub fn cx_chain(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n.saturating_sub(1)).fold(self, |b, q| b.cnot(q, q + 1))
    }

    /// Ry on qubit `i` with parameter `params[i]`
    pub fn ry_layer(self, params: &[Parameter]) -> Self {
        params
            .iter()
            .enumerate()
            .fold(self, |b, (q, p)| b.ry(q, p))
    }

    /// Rz on qubit `i` with parameter `params[i]`
    pub fn rz_layer(self, params: &[Parameter]) -> Self {
        params
            .iter()
            .enumerate()
            .fold(self, |b, (q, p)| b.rz(q, p))
    }

    /// `reps` blocks of (Ry layer, CNOT chain) followed by a final Ry layer
    ///
    /// Consumes `num_qubits * (reps + 1)` parameters from `params`.
    pub fn real_amplitudes(self, params: &ParameterVector, reps: usize) -> Self {
        let n = self.circuit.num_qubits();
        let mut builder = self;
        for block in params.params().chunks(n).take(reps + 1).enumerate() {
            let (i, layer) = block;
            builder = builder.ry_layer(layer);
            if i < reps {
                builder = builder.cx_chain();
            }
        }
        builder
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Finish building
    pub fn build(self) -> ParameterizedCircuit {
        self.circuit
    }
}

// ============================================================================
// Tests
// ============================================================================
