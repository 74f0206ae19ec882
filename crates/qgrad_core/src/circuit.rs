//! Parameterized quantum circuit for qgrad
//!
//! Gantree: L1_Circuit → ParameterizedCircuit
//!
//! Gate sequence whose rotation angles may reference symbolic
//! [`Parameter`]s. Parameters are kept in declaration order (first
//! appearance); parameter-value vectors are indexed in that order.

use crate::error::{CoreError, CoreResult};
use crate::gate::{BoundGate, Gate};
use crate::layout::Layout;
use crate::parameter::Parameter;
use crate::types::{check_finite, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Parameterized quantum circuit
/// Gantree: ParameterizedCircuit // 파라미터 회로
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterizedCircuit {
    /// Number of qubits
    num_qubits: usize,

    /// Gate sequence
    gates: Vec<Gate>,

    /// Parameters in declaration order
    parameters: Vec<Parameter>,

    /// Optional circuit name
    name: Option<String>,

    /// Layout set by a transpilation pass
    layout: Option<Layout>,
}

impl ParameterizedCircuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            parameters: Vec::new(),
            name: None,
            layout: None,
        }
    }

    /// Create a circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        let mut circuit = Self::new(num_qubits);
        circuit.name = Some(name.into());
        circuit
    }

    /// Create from a vector of gates
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> CoreResult<Self> {
        let mut circuit = Self::new(num_qubits);
        circuit.add_gates(gates)?;
        Ok(circuit)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate, registering any new parameter it references
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> CoreResult<()> {
        if let Some(&qubit) = gate.qubits().iter().find(|&&q| q >= self.num_qubits) {
            return Err(CoreError::GateQubitMismatch {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        if let Some(param) = gate.parameter() {
            if !self.parameters.contains(param) {
                self.parameters.push(param.clone());
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Add multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> CoreResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Layout attached by transpilation, if any
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Parameters in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Total number of parameters
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Position of a parameter in declaration order, looked up by identity
    /// Gantree: parameter_index(&Parameter) -> Result<usize> // 인덱스 조회
    pub fn parameter_index(&self, param: &Parameter) -> CoreResult<usize> {
        let mut hits = self
            .parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| *p == param)
            .map(|(i, _)| i);

        match (hits.next(), hits.count()) {
            (None, _) => Err(CoreError::ParameterNotFound(param.name().to_string())),
            (Some(index), 0) => Ok(index),
            (Some(_), extra) => Err(CoreError::AmbiguousParameter {
                name: param.name().to_string(),
                count: extra + 1,
            }),
        }
    }

    /// Positions of several parameters, in the order given
    pub fn parameter_indices(&self, params: &[Parameter]) -> CoreResult<Vec<usize>> {
        params.iter().map(|p| self.parameter_index(p)).collect()
    }

    /// Bind values (declaration order) and return numeric gates
    /// Gantree: bind(&self, values) -> Result<Vec<BoundGate>> // 값 바인딩
    pub fn bind(&self, values: &[f64]) -> CoreResult<Vec<BoundGate>> {
        if values.len() != self.parameters.len() {
            return Err(CoreError::ParameterCountMismatch {
                expected: self.parameters.len(),
                got: values.len(),
            });
        }
        check_finite(values)?;

        let lookup: HashMap<&Parameter, f64> =
            self.parameters.iter().zip(values.iter().copied()).collect();

        Ok(self
            .gates
            .iter()
            .map(|gate| {
                gate.map_angle(|expr| {
                    let bound = expr.parameter().and_then(|p| lookup.get(p).copied());
                    expr.evaluate(bound)
                })
            })
            .collect())
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Rewrite qubits onto the physical qubits of `layout` and attach it
    pub fn remap(&self, layout: &Layout) -> CoreResult<Self> {
        if layout.num_virtual() < self.num_qubits {
            return Err(CoreError::InvalidLayout(format!(
                "layout covers {} virtual qubits, circuit has {}",
                layout.num_virtual(),
                self.num_qubits
            )));
        }

        let mapping = layout.mapping();
        Ok(Self {
            num_qubits: layout.num_physical(),
            gates: self
                .gates
                .iter()
                .map(|g| g.remap_qubits(|q| mapping[q]))
                .collect(),
            parameters: self.parameters.clone(),
            name: self.name.clone(),
            layout: Some(layout.clone()),
        })
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Circuit depth (longest path, barriers excluded)
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in self.gates.iter().filter(|g| !g.is_barrier()) {
            let qubits = gate.qubits();
            let level = qubits
                .iter()
                .filter_map(|&q| qubit_depths.get(q))
                .max()
                .copied()
                .unwrap_or(0)
                + 1;
            for q in qubits {
                qubit_depths[q] = level;
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Total gate count
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count two-qubit gates
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Count parameterized gates
    pub fn count_parameterized(&self) -> usize {
        self.gates.iter().filter(|g| g.is_parameterized()).count()
    }

    /// Qubits touched by at least one gate
    pub fn used_qubits(&self) -> Vec<QubitId> {
        let mut used: Vec<QubitId> = self.gates.iter().flat_map(|g| g.qubits()).collect();
        used.sort_unstable();
        used.dedup();
        used
    }
}

impl fmt::Display for ParameterizedCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ParameterizedCircuit({} qubits, {} gates, {} parameters)",
            self.num_qubits,
            self.gates.len(),
            self.parameters.len()
        )?;
        for gate in &self.gates {
            writeln!(f, "  {}", gate)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParamExpr;

    fn two_param_circuit() -> (ParameterizedCircuit, Parameter, Parameter) {
        let a = Parameter::new("a");
        let b = Parameter::new("b");
        let mut circuit = ParameterizedCircuit::new(2);
        circuit.add_gate(Gate::Ry(0, (&b).into())).unwrap();
        circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
        circuit.add_gate(Gate::Rx(1, (&a).into())).unwrap();
        circuit.add_gate(Gate::Rz(1, b.scaled(2.0, 0.0))).unwrap();
        (circuit, a, b)
    }

    #[test]
    fn test_declaration_order() {
        let (circuit, a, b) = two_param_circuit();
        assert_eq!(circuit.num_parameters(), 2);
        assert_eq!(circuit.parameters(), &[b.clone(), a.clone()]);
        assert_eq!(circuit.parameter_index(&b).unwrap(), 0);
        assert_eq!(circuit.parameter_index(&a).unwrap(), 1);
        assert_eq!(circuit.parameter_indices(&[a, b]).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_parameter_index_by_identity() {
        let (circuit, _, _) = two_param_circuit();
        let impostor = Parameter::new("a");
        let err = circuit.parameter_index(&impostor).unwrap_err();
        assert!(matches!(err, CoreError::ParameterNotFound(name) if name == "a"));
    }

    #[test]
    fn test_bind() {
        let (circuit, _, _) = two_param_circuit();
        let bound = circuit.bind(&[0.5, 1.0]).unwrap();
        assert_eq!(bound[0], Gate::Ry(0, 0.5));
        assert_eq!(bound[2], Gate::Rx(1, 1.0));
        assert_eq!(bound[3], Gate::Rz(1, 1.0));
    }

    #[test]
    fn test_bind_count_mismatch() {
        let (circuit, _, _) = two_param_circuit();
        assert!(matches!(
            circuit.bind(&[0.5]),
            Err(CoreError::ParameterCountMismatch {
                expected: 2,
                got: 1
            })
        ));
        assert!(circuit.bind(&[0.5, f64::NAN]).is_err());
    }

    #[test]
    fn test_add_gate_out_of_range() {
        let mut circuit = ParameterizedCircuit::new(2);
        assert!(circuit.add_gate(Gate::H(2)).is_err());
        assert!(circuit
            .add_gate(Gate::Rx(0, ParamExpr::Value(0.1)))
            .is_ok());
        assert_eq!(circuit.num_parameters(), 0);
    }

    #[test]
    fn test_remap() {
        let (circuit, _, _) = two_param_circuit();
        let layout = Layout::from_mapping(vec![3, 1], 4).unwrap();
        let mapped = circuit.remap(&layout).unwrap();

        assert_eq!(mapped.num_qubits(), 4);
        assert_eq!(mapped.layout(), Some(&layout));
        assert_eq!(mapped.gates()[1], Gate::Cnot(3, 1));
        assert_eq!(mapped.parameters(), circuit.parameters());
    }

    #[test]
    fn test_depth() {
        let (circuit, _, _) = two_param_circuit();
        assert_eq!(circuit.depth(), 4);
        assert_eq!(circuit.count_2q(), 1);
        assert_eq!(circuit.count_parameterized(), 3);
        assert_eq!(circuit.used_qubits(), vec![0, 1]);
    }
}
