//! Qubit layouts
//!
//! Gantree: L1_Circuit → Layout
//!
//! A layout maps each virtual (logical) qubit of a circuit onto a physical
//! qubit of a wider device. Transpiled circuits carry their layout so that
//! observables can be re-expressed on the physical qubits.

use crate::error::{CoreError, CoreResult};
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Virtual → physical qubit mapping
/// Gantree: Layout // 레이아웃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// `mapping[v]` is the physical qubit of virtual qubit `v`
    mapping: Vec<QubitId>,

    /// Number of physical qubits
    num_physical: usize,
}

impl Layout {
    /// Identity layout on `n` qubits
    pub fn identity(n: usize) -> Self {
        Self {
            mapping: (0..n).collect(),
            num_physical: n,
        }
    }

    /// Create from an explicit mapping
    pub fn from_mapping(mapping: Vec<QubitId>, num_physical: usize) -> CoreResult<Self> {
        if let Some(&q) = mapping.iter().find(|&&q| q >= num_physical) {
            return Err(CoreError::InvalidLayout(format!(
                "physical qubit {} out of range for {} qubits",
                q, num_physical
            )));
        }
        let unique: HashSet<_> = mapping.iter().collect();
        if unique.len() != mapping.len() {
            return Err(CoreError::InvalidLayout(
                "mapping contains duplicate physical qubits".into(),
            ));
        }
        Ok(Self {
            mapping,
            num_physical,
        })
    }

    /// Number of virtual qubits
    pub fn num_virtual(&self) -> usize {
        self.mapping.len()
    }

    /// Number of physical qubits
    pub fn num_physical(&self) -> usize {
        self.num_physical
    }

    /// Physical qubit of a virtual qubit
    pub fn physical(&self, virtual_qubit: QubitId) -> Option<QubitId> {
        self.mapping.get(virtual_qubit).copied()
    }

    /// Mapping as a slice
    pub fn mapping(&self) -> &[QubitId] {
        &self.mapping
    }

    /// Check if the layout leaves every qubit in place
    pub fn is_trivial(&self) -> bool {
        self.num_physical == self.mapping.len()
            && self.mapping.iter().enumerate().all(|(i, &q)| i == q)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .mapping
            .iter()
            .enumerate()
            .map(|(v, p)| format!("{}->{}", v, p))
            .collect();
        write!(f, "Layout[{}; {} physical]", pairs.join(", "), self.num_physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let layout = Layout::identity(3);
        assert!(layout.is_trivial());
        assert_eq!(layout.physical(2), Some(2));
        assert_eq!(layout.physical(3), None);
    }

    #[test]
    fn test_from_mapping_validation() {
        assert!(Layout::from_mapping(vec![2, 0], 3).is_ok());
        assert!(Layout::from_mapping(vec![3, 0], 3).is_err());
        assert!(Layout::from_mapping(vec![1, 1], 3).is_err());
    }

    #[test]
    fn test_non_trivial() {
        let layout = Layout::from_mapping(vec![0, 1], 4).unwrap();
        assert!(!layout.is_trivial());
    }
}
