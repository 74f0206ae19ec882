//! Quantum gate definitions for qgrad
//!
//! Gantree: L1_Circuit → Gate
//!
//! Gates are generic over their angle type: a circuit stores
//! `Gate<ParamExpr>` (possibly symbolic), binding produces `Gate<f64>`.

use crate::parameter::{ParamExpr, Parameter};
use crate::types::{Angle, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gate with numeric angles, ready for simulation
pub type BoundGate = Gate<Angle>;

/// Quantum gate enumeration
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate<A = ParamExpr> {
    // ========================================================================
    // Single-Qubit Gates (Non-Parameterized)
    // ========================================================================
    /// Hadamard gate
    H(QubitId),

    /// Pauli-X gate (NOT)
    X(QubitId),

    /// Pauli-Y gate
    Y(QubitId),

    /// Pauli-Z gate
    Z(QubitId),

    /// S gate (sqrt(Z))
    S(QubitId),

    /// S-dagger gate
    Sdg(QubitId),

    /// T gate (fourth root of Z)
    T(QubitId),

    /// T-dagger gate
    Tdg(QubitId),

    /// SX gate (sqrt(X))
    Sx(QubitId),

    // ========================================================================
    // Single-Qubit Rotation Gates
    // ========================================================================
    /// Rotation around X-axis
    /// Gantree: Rx(QubitId, A) // X 회전
    Rx(QubitId, A),

    /// Rotation around Y-axis
    /// Gantree: Ry(QubitId, A) // Y 회전
    Ry(QubitId, A),

    /// Rotation around Z-axis
    /// Gantree: Rz(QubitId, A) // Z 회전
    Rz(QubitId, A),

    /// Phase gate P(λ) = diag(1, e^{iλ})
    P(QubitId, A),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (CX)
    Cnot(QubitId, QubitId),

    /// Controlled-Z
    Cz(QubitId, QubitId),

    /// SWAP gate
    Swap(QubitId, QubitId),

    /// Controlled Rz rotation
    Crz(QubitId, QubitId, A),

    // ========================================================================
    // Control
    // ========================================================================
    /// Barrier (no effect on the state)
    Barrier(Vec<QubitId>),
}

impl<A> Gate<A> {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get qubits involved in this gate
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::T(q)
            | Gate::Tdg(q)
            | Gate::Sx(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::P(q, _) => vec![*q],

            Gate::Cnot(c, t) | Gate::Cz(c, t) | Gate::Swap(c, t) | Gate::Crz(c, t, _) => {
                vec![*c, *t]
            }

            Gate::Barrier(qs) => qs.clone(),
        }
    }

    /// Check if gate is single-qubit
    pub fn is_single_qubit(&self) -> bool {
        matches!(
            self,
            Gate::H(_)
                | Gate::X(_)
                | Gate::Y(_)
                | Gate::Z(_)
                | Gate::S(_)
                | Gate::Sdg(_)
                | Gate::T(_)
                | Gate::Tdg(_)
                | Gate::Sx(_)
                | Gate::Rx(_, _)
                | Gate::Ry(_, _)
                | Gate::Rz(_, _)
                | Gate::P(_, _)
        )
    }

    /// Check if gate is two-qubit
    pub fn is_two_qubit(&self) -> bool {
        matches!(
            self,
            Gate::Cnot(_, _) | Gate::Cz(_, _) | Gate::Swap(_, _) | Gate::Crz(_, _, _)
        )
    }

    /// Check if gate is a barrier
    pub fn is_barrier(&self) -> bool {
        matches!(self, Gate::Barrier(_))
    }

    /// Angle of a rotation gate
    pub fn angle(&self) -> Option<&A> {
        match self {
            Gate::Rx(_, a) | Gate::Ry(_, a) | Gate::Rz(_, a) | Gate::P(_, a) => Some(a),
            Gate::Crz(_, _, a) => Some(a),
            _ => None,
        }
    }

    /// Get gate name
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::T(_) => "t",
            Gate::Tdg(_) => "tdg",
            Gate::Sx(_) => "sx",
            Gate::Rx(_, _) => "rx",
            Gate::Ry(_, _) => "ry",
            Gate::Rz(_, _) => "rz",
            Gate::P(_, _) => "p",
            Gate::Cnot(_, _) => "cx",
            Gate::Cz(_, _) => "cz",
            Gate::Swap(_, _) => "swap",
            Gate::Crz(_, _, _) => "crz",
            Gate::Barrier(_) => "barrier",
        }
    }

    // ========================================================================
    // Transformations
    // ========================================================================

    /// Replace the angle with `f(angle)`, keeping qubits
    pub fn map_angle<B, F>(&self, f: F) -> Gate<B>
    where
        F: FnOnce(&A) -> B,
    {
        match self {
            Gate::H(q) => Gate::H(*q),
            Gate::X(q) => Gate::X(*q),
            Gate::Y(q) => Gate::Y(*q),
            Gate::Z(q) => Gate::Z(*q),
            Gate::S(q) => Gate::S(*q),
            Gate::Sdg(q) => Gate::Sdg(*q),
            Gate::T(q) => Gate::T(*q),
            Gate::Tdg(q) => Gate::Tdg(*q),
            Gate::Sx(q) => Gate::Sx(*q),
            Gate::Rx(q, a) => Gate::Rx(*q, f(a)),
            Gate::Ry(q, a) => Gate::Ry(*q, f(a)),
            Gate::Rz(q, a) => Gate::Rz(*q, f(a)),
            Gate::P(q, a) => Gate::P(*q, f(a)),
            Gate::Cnot(c, t) => Gate::Cnot(*c, *t),
            Gate::Cz(c, t) => Gate::Cz(*c, *t),
            Gate::Swap(a, b) => Gate::Swap(*a, *b),
            Gate::Crz(c, t, a) => Gate::Crz(*c, *t, f(a)),
            Gate::Barrier(qs) => Gate::Barrier(qs.clone()),
        }
    }
}

impl<A: Clone> Gate<A> {
    /// Relabel qubits through `map(virtual) -> physical`
    pub fn remap_qubits<F>(&self, map: F) -> Gate<A>
    where
        F: Fn(QubitId) -> QubitId,
    {
        match self {
            Gate::H(q) => Gate::H(map(*q)),
            Gate::X(q) => Gate::X(map(*q)),
            Gate::Y(q) => Gate::Y(map(*q)),
            Gate::Z(q) => Gate::Z(map(*q)),
            Gate::S(q) => Gate::S(map(*q)),
            Gate::Sdg(q) => Gate::Sdg(map(*q)),
            Gate::T(q) => Gate::T(map(*q)),
            Gate::Tdg(q) => Gate::Tdg(map(*q)),
            Gate::Sx(q) => Gate::Sx(map(*q)),
            Gate::Rx(q, a) => Gate::Rx(map(*q), a.clone()),
            Gate::Ry(q, a) => Gate::Ry(map(*q), a.clone()),
            Gate::Rz(q, a) => Gate::Rz(map(*q), a.clone()),
            Gate::P(q, a) => Gate::P(map(*q), a.clone()),
            Gate::Cnot(c, t) => Gate::Cnot(map(*c), map(*t)),
            Gate::Cz(c, t) => Gate::Cz(map(*c), map(*t)),
            Gate::Swap(a, b) => Gate::Swap(map(*a), map(*b)),
            Gate::Crz(c, t, a) => Gate::Crz(map(*c), map(*t), a.clone()),
            Gate::Barrier(qs) => Gate::Barrier(qs.iter().map(|&q| map(q)).collect()),
        }
    }
}

impl Gate<ParamExpr> {
    /// Check if the angle depends on a parameter
    /// Gantree: is_parameterized(&self) -> bool // 파라미터 여부
    pub fn is_parameterized(&self) -> bool {
        self.angle().is_some_and(ParamExpr::is_parameterized)
    }

    /// Parameter referenced by this gate, if any
    pub fn parameter(&self) -> Option<&Parameter> {
        self.angle().and_then(ParamExpr::parameter)
    }
}

impl<A: fmt::Display> fmt::Display for Gate<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits: Vec<String> = self.qubits().iter().map(|q| format!("q[{}]", q)).collect();
        match self.angle() {
            Some(a) => write!(f, "{}({}) {};", self.name(), a, qubits.join(",")),
            None => write!(f, "{} {};", self.name(), qubits.join(",")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_qubits() {
        let h: Gate = Gate::H(0);
        let cx: Gate = Gate::Cnot(0, 1);
        assert_eq!(h.qubits(), vec![0]);
        assert_eq!(cx.qubits(), vec![0, 1]);
    }

    #[test]
    fn test_gate_classification() {
        let theta = Parameter::new("theta");
        let rx: Gate = Gate::Rx(0, (&theta).into());
        let fixed: Gate = Gate::Rx(0, 0.3.into());

        assert!(rx.is_single_qubit());
        assert!(rx.is_parameterized());
        assert!(!fixed.is_parameterized());
        assert_eq!(rx.parameter(), Some(&theta));

        let cz: Gate = Gate::Cz(0, 1);
        assert!(cz.is_two_qubit());
        assert!(!cz.is_single_qubit());
    }

    #[test]
    fn test_map_angle() {
        let theta = Parameter::new("theta");
        let gate: Gate = Gate::Ry(2, theta.scaled(2.0, 0.0));
        let bound: BoundGate = gate.map_angle(|e| e.evaluate(Some(0.25)));
        assert_eq!(bound, Gate::Ry(2, 0.5));
    }

    #[test]
    fn test_remap_qubits() {
        let gate: BoundGate = Gate::Crz(0, 1, 0.1);
        let mapped = gate.remap_qubits(|q| q + 3);
        assert_eq!(mapped, Gate::Crz(3, 4, 0.1));
    }

    #[test]
    fn test_display() {
        let gate: BoundGate = Gate::Rz(1, 0.5);
        assert_eq!(gate.to_string(), "rz(0.5) q[1];");
        let cx: BoundGate = Gate::Cnot(0, 1);
        assert_eq!(cx.to_string(), "cx q[0],q[1];");
    }
}
