//! Pass managers
//!
//! Gantree: L2_Estimator → Transpiler
//!
//! A pass manager rewrites circuits before they are submitted. Circuits it
//! returns may carry a [`Layout`]; observables must then be moved onto the
//! same physical qubits with [`SparsePauliOp::apply_layout`].
//!
//! [`SparsePauliOp::apply_layout`]: qgrad_core::SparsePauliOp::apply_layout

use crate::error::EstimatorResult;
use qgrad_core::{Layout, ParameterizedCircuit, Topology};

/// Circuit rewriting stage applied before submission
/// Gantree: PassManager // 패스 매니저
pub trait PassManager: Send + Sync {
    /// Rewrite circuits; output has the same length and order as input
    fn run(&self, circuits: &[ParameterizedCircuit]) -> EstimatorResult<Vec<ParameterizedCircuit>>;
}

/// How [`LayoutPass`] picks physical qubits
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutStrategy {
    /// Virtual qubit `i` on physical qubit `i`
    Trivial {
        /// Device width
        num_physical: usize,
    },
    /// Virtual qubits along a linear chain of the topology
    Chain(Topology),
    /// A fixed mapping
    Fixed(Layout),
}

/// Layout-only pass manager: places virtual qubits, no routing
/// Gantree: LayoutPass // 레이아웃 패스
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPass {
    strategy: LayoutStrategy,
}

impl LayoutPass {
    /// Create with a strategy
    pub fn new(strategy: LayoutStrategy) -> Self {
        Self { strategy }
    }

    /// Identity placement on a device with `num_physical` qubits
    pub fn trivial(num_physical: usize) -> Self {
        Self::new(LayoutStrategy::Trivial { num_physical })
    }

    /// Chain placement on a topology
    pub fn on_topology(topology: Topology) -> Self {
        Self::new(LayoutStrategy::Chain(topology))
    }

    /// Fixed placement
    pub fn fixed(layout: Layout) -> Self {
        Self::new(LayoutStrategy::Fixed(layout))
    }

    /// Strategy
    pub fn strategy(&self) -> &LayoutStrategy {
        &self.strategy
    }

    fn layout_for(&self, circuit: &ParameterizedCircuit) -> EstimatorResult<Layout> {
        let n = circuit.num_qubits();
        let layout = match &self.strategy {
            LayoutStrategy::Trivial { num_physical } => {
                Layout::from_mapping((0..n).collect(), *num_physical)?
            }
            LayoutStrategy::Chain(topology) => topology.chain_layout(n)?,
            LayoutStrategy::Fixed(layout) => layout.clone(),
        };
        Ok(layout)
    }

    fn transpile(&self, circuit: &ParameterizedCircuit) -> EstimatorResult<ParameterizedCircuit> {
        let layout = self.layout_for(circuit)?;
        let mapped = circuit.remap(&layout)?;

        if let LayoutStrategy::Chain(topology) = &self.strategy {
            if let Err(e) = topology.validate_circuit(&mapped) {
                log::warn!("Layout leaves unrouted two-qubit gates: {}", e);
            }
        }
        Ok(mapped)
    }
}

impl PassManager for LayoutPass {
    fn run(&self, circuits: &[ParameterizedCircuit]) -> EstimatorResult<Vec<ParameterizedCircuit>> {
        log::debug!("Applying layout pass to {} circuits", circuits.len());
        circuits.iter().map(|c| self.transpile(c)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qgrad_core::{CircuitBuilder, Parameter};

    #[test]
    fn test_trivial_widens() {
        let circuit = CircuitBuilder::new(2).h(0).cnot(0, 1).build();
        let out = LayoutPass::trivial(5).run(&[circuit]).unwrap();
        assert_eq!(out[0].num_qubits(), 5);
        assert_eq!(out[0].layout().unwrap().mapping(), &[0, 1]);
    }

    #[test]
    fn test_chain_keeps_parameters() {
        let theta = Parameter::new("theta");
        let circuit = CircuitBuilder::new(3)
            .ry(0, &theta)
            .cnot(0, 1)
            .cnot(1, 2)
            .build();
        let pass = LayoutPass::on_topology(Topology::grid(2, 2));
        let out = pass.run(&[circuit.clone(), circuit.clone()]).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].num_qubits(), 4);
        assert_eq!(out[0].parameters(), circuit.parameters());
        assert!(Topology::grid(2, 2).validate_circuit(&out[0]).is_ok());
    }

    #[test]
    fn test_fixed_too_small() {
        let circuit = CircuitBuilder::new(3).h(2).build();
        let layout = Layout::from_mapping(vec![1, 0], 2).unwrap();
        assert!(LayoutPass::fixed(layout).run(&[circuit]).is_err());
    }

    #[test]
    fn test_chain_too_long() {
        let circuit = CircuitBuilder::new(4).h(0).build();
        assert!(LayoutPass::on_topology(Topology::linear(3))
            .run(&[circuit])
            .is_err());
    }
}
