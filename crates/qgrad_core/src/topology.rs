//! Qubit topology for qgrad
//!
//! Gantree: L1_Circuit → Topology
//!
//! Device connectivity used to choose where a circuit's virtual qubits
//! land on hardware.

use crate::circuit::ParameterizedCircuit;
use crate::error::{CoreError, CoreResult};
use crate::layout::Layout;
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Qubit topology (undirected coupling map)
/// Gantree: Topology // 큐비트 토폴로지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// Coupling map: list of connected pairs
    coupling_map: Vec<(QubitId, QubitId)>,

    /// Number of physical qubits
    num_qubits: usize,

    /// Optional topology name
    name: Option<String>,
}

impl Topology {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from coupling map
    pub fn from_coupling_map(coupling_map: Vec<(QubitId, QubitId)>) -> CoreResult<Self> {
        if coupling_map.is_empty() {
            return Err(CoreError::EmptyCouplingMap);
        }

        if let Some(&(q1, q2)) = coupling_map.iter().find(|(a, b)| a == b) {
            return Err(CoreError::InvalidCoupling(q1, q2));
        }

        let num_qubits = coupling_map
            .iter()
            .map(|&(a, b)| a.max(b))
            .max()
            .map_or(0, |m| m + 1);

        Ok(Self {
            coupling_map,
            num_qubits,
            name: None,
        })
    }

    /// Linear chain 0-1-2-...-N-1
    pub fn linear(n: usize) -> Self {
        Self {
            coupling_map: (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect(),
            num_qubits: n,
            name: Some(format!("linear_{}", n)),
        }
    }

    /// Ring 0-1-...-N-1-0
    pub fn ring(n: usize) -> Self {
        let mut coupling_map: Vec<_> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        if n > 2 {
            coupling_map.push((n - 1, 0));
        }
        Self {
            coupling_map,
            num_qubits: n,
            name: Some(format!("ring_{}", n)),
        }
    }

    /// Grid with qubit index `row * cols + col`
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut coupling_map = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    coupling_map.push((q, q + 1));
                }
                if r + 1 < rows {
                    coupling_map.push((q, q + cols));
                }
            }
        }
        Self {
            coupling_map,
            num_qubits: rows * cols,
            name: Some(format!("grid_{}x{}", rows, cols)),
        }
    }

    /// Fully connected topology
    pub fn all_to_all(n: usize) -> Self {
        let coupling_map = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        Self {
            coupling_map,
            num_qubits: n,
            name: Some(format!("all_to_all_{}", n)),
        }
    }

    // ========================================================================
    // Connectivity Queries
    // ========================================================================

    /// Number of physical qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Topology name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if two qubits are directly connected
    pub fn is_connected(&self, q1: QubitId, q2: QubitId) -> bool {
        q1 == q2
            || self
                .coupling_map
                .iter()
                .any(|&(a, b)| (a, b) == (q1, q2) || (a, b) == (q2, q1))
    }

    /// Sorted neighbors of a qubit
    pub fn neighbors(&self, qubit: QubitId) -> Vec<QubitId> {
        let set: BTreeSet<QubitId> = self
            .coupling_map
            .iter()
            .filter_map(|&(a, b)| match (a == qubit, b == qubit) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .collect();
        set.into_iter().collect()
    }

    /// Shortest path between two qubits (BFS)
    pub fn shortest_path(&self, start: QubitId, end: QubitId) -> Option<Vec<QubitId>> {
        if start >= self.num_qubits || end >= self.num_qubits {
            return None;
        }

        let mut parent: Vec<Option<QubitId>> = vec![None; self.num_qubits];
        let mut visited = vec![false; self.num_qubits];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(current) = queue.pop_front() {
            if current == end {
                let mut path = vec![end];
                let mut node = end;
                while let Some(p) = parent[node] {
                    path.push(p);
                    node = p;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.neighbors(current) {
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Find a simple path of `length` connected qubits (depth-first with backtracking)
    pub fn find_linear_chain(&self, length: usize) -> CoreResult<Vec<QubitId>> {
        if length == 0 {
            return Ok(Vec::new());
        }
        if length > self.num_qubits {
            return Err(CoreError::NoLinearChain(length));
        }

        for start in 0..self.num_qubits {
            let mut chain = vec![start];
            let mut used = vec![false; self.num_qubits];
            used[start] = true;
            if self.extend_chain(&mut chain, &mut used, length) {
                return Ok(chain);
            }
        }

        Err(CoreError::NoLinearChain(length))
    }

    fn extend_chain(&self, chain: &mut Vec<QubitId>, used: &mut [bool], length: usize) -> bool {
        if chain.len() == length {
            return true;
        }
        let Some(&last) = chain.last() else {
            return false;
        };
        for next in self.neighbors(last) {
            if used[next] {
                continue;
            }
            used[next] = true;
            chain.push(next);
            if self.extend_chain(chain, used, length) {
                return true;
            }
            chain.pop();
            used[next] = false;
        }
        false
    }

    /// Layout placing `num_virtual` qubits along a linear chain
    pub fn chain_layout(&self, num_virtual: usize) -> CoreResult<Layout> {
        let chain = self.find_linear_chain(num_virtual)?;
        Layout::from_mapping(chain, self.num_qubits)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check that every two-qubit gate acts on connected qubits
    pub fn validate_circuit(&self, circuit: &ParameterizedCircuit) -> CoreResult<()> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(CoreError::QubitOutOfRange {
                qubit: circuit.num_qubits() - 1,
                max: self.num_qubits.saturating_sub(1),
            });
        }

        for gate in circuit.gates().iter().filter(|g| g.is_two_qubit()) {
            let qs = gate.qubits();
            if !self.is_connected(qs[0], qs[1]) {
                return Err(CoreError::InvalidLayout(format!(
                    "qubits {} and {} are not connected",
                    qs[0], qs[1]
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Topology({} qubits, {} edges{})",
            self.num_qubits,
            self.coupling_map.len(),
            self.name
                .as_ref()
                .map(|n| format!(", {}", n))
                .unwrap_or_default()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CircuitBuilder;

    #[test]
    fn test_linear_topology() {
        let topo = Topology::linear(5);
        assert_eq!(topo.num_qubits(), 5);
        assert!(topo.is_connected(1, 0));
        assert!(!topo.is_connected(0, 2));
    }

    #[test]
    fn test_from_coupling_map_rejects_self_loop() {
        assert!(Topology::from_coupling_map(vec![]).is_err());
        assert!(Topology::from_coupling_map(vec![(1, 1)]).is_err());
        let topo = Topology::from_coupling_map(vec![(0, 3)]).unwrap();
        assert_eq!(topo.num_qubits(), 4);
    }

    #[test]
    fn test_neighbors_and_path() {
        let topo = Topology::linear(5);
        assert_eq!(topo.neighbors(2), vec![1, 3]);
        assert_eq!(topo.shortest_path(0, 4).unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(topo.shortest_path(3, 3).unwrap(), vec![3]);
    }

    #[test]
    fn test_find_linear_chain_backtracks() {
        // Star: greedy walk from 0 stalls at a leaf, backtracking finds 1-0-2
        let topo = Topology::from_coupling_map(vec![(0, 1), (0, 2), (0, 3)]).unwrap();
        let chain = topo.find_linear_chain(3).unwrap();
        assert_eq!(chain.len(), 3);
        for pair in chain.windows(2) {
            assert!(topo.is_connected(pair[0], pair[1]));
        }
        assert!(topo.find_linear_chain(4).is_err());
    }

    #[test]
    fn test_chain_layout() {
        let topo = Topology::grid(2, 3);
        let layout = topo.chain_layout(4).unwrap();
        assert_eq!(layout.num_virtual(), 4);
        assert_eq!(layout.num_physical(), 6);
    }

    #[test]
    fn test_validate_circuit() {
        let topo = Topology::linear(3);
        let ok = CircuitBuilder::new(3).h(0).cnot(0, 1).cnot(1, 2).build();
        assert!(topo.validate_circuit(&ok).is_ok());

        let bad = CircuitBuilder::new(3).cnot(0, 2).build();
        assert!(topo.validate_circuit(&bad).is_err());
    }

    #[test]
    fn test_all_to_all() {
        let topo = Topology::all_to_all(4);
        for i in 0..4 {
            for j in 0..4 {
                assert!(topo.is_connected(i, j));
            }
        }
    }
}
