//! Gradient tasks
//!
//! Gantree: L3_Spsa → GradientTask
//!
//! A task is checked against its circuit once, when it is built, so the
//! gradient pipeline can index values and parameters without further checks.

use crate::error::{SpsaError, SpsaResult};
use qgrad_core::{check_finite, ParamVec, Parameter, ParameterizedCircuit, SparsePauliOp};

/// One circuit, observable and parameter vector to differentiate
/// Gantree: GradientTask // 그래디언트 작업
#[derive(Debug, Clone)]
pub struct GradientTask {
    circuit: ParameterizedCircuit,
    observable: SparsePauliOp,
    values: ParamVec,
    parameters: Vec<Parameter>,
    indices: Vec<usize>,
}

impl GradientTask {
    /// Build a task
    ///
    /// `parameters` selects and orders the gradient entries; `None` means
    /// every circuit parameter in declaration order.
    pub fn new(
        circuit: ParameterizedCircuit,
        observable: SparsePauliOp,
        values: ParamVec,
        parameters: Option<Vec<Parameter>>,
    ) -> SpsaResult<Self> {
        if values.len() != circuit.num_parameters() {
            return Err(SpsaError::InvalidInput(format!(
                "circuit has {} parameters, got {} values",
                circuit.num_parameters(),
                values.len()
            )));
        }
        check_finite(&values)?;

        if observable.num_qubits() != circuit.num_qubits() {
            return Err(SpsaError::InvalidInput(format!(
                "observable acts on {} qubits, circuit has {}",
                observable.num_qubits(),
                circuit.num_qubits()
            )));
        }

        let parameters = parameters.unwrap_or_else(|| circuit.parameters().to_vec());
        let indices = circuit.parameter_indices(&parameters)?;

        Ok(Self {
            circuit,
            observable,
            values,
            parameters,
            indices,
        })
    }

    /// Task over all circuit parameters
    pub fn all(
        circuit: ParameterizedCircuit,
        observable: SparsePauliOp,
        values: ParamVec,
    ) -> SpsaResult<Self> {
        Self::new(circuit, observable, values, None)
    }

    /// Circuit
    pub fn circuit(&self) -> &ParameterizedCircuit {
        &self.circuit
    }

    /// Observable
    pub fn observable(&self) -> &SparsePauliOp {
        &self.observable
    }

    /// Parameter values in declaration order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Requested parameters, in requested order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declaration-order position of each requested parameter
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Full parameter-space dimension
    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qgrad_core::{CircuitBuilder, ParameterVector};

    fn setup() -> (ParameterizedCircuit, SparsePauliOp, ParameterVector) {
        let p = ParameterVector::new("p", 3);
        let circuit = CircuitBuilder::new(2)
            .ry(0, &p[0])
            .ry(1, &p[1])
            .cnot(0, 1)
            .rz(1, &p[2])
            .build();
        let obs = SparsePauliOp::from_label("ZZ", 1.0).unwrap();
        (circuit, obs, p)
    }

    #[test]
    fn test_defaults_to_all_parameters() {
        let (circuit, obs, p) = setup();
        let task = GradientTask::all(circuit, obs, vec![0.1, 0.2, 0.3]).unwrap();
        assert_eq!(task.parameters(), p.params());
        assert_eq!(task.indices(), &[0, 1, 2]);
        assert_eq!(task.dimension(), 3);
    }

    #[test]
    fn test_subset_resolves_in_requested_order() {
        let (circuit, obs, p) = setup();
        let task = GradientTask::new(
            circuit,
            obs,
            vec![0.1, 0.2, 0.3],
            Some(vec![p[2].clone(), p[0].clone()]),
        )
        .unwrap();
        assert_eq!(task.indices(), &[2, 0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        let (circuit, obs, _) = setup();

        let short = GradientTask::all(circuit.clone(), obs.clone(), vec![0.1]);
        assert!(matches!(short, Err(SpsaError::InvalidInput(_))));

        let wide = SparsePauliOp::from_label("ZZZ", 1.0).unwrap();
        assert!(GradientTask::all(circuit.clone(), wide, vec![0.0; 3]).is_err());

        let stranger = Parameter::new("p[0]");
        let unknown = GradientTask::new(circuit.clone(), obs.clone(), vec![0.0; 3], Some(vec![stranger]));
        assert!(matches!(unknown, Err(SpsaError::InvalidInput(_))));

        assert!(GradientTask::all(circuit, obs, vec![0.0, f64::NAN, 0.0]).is_err());
    }
}
