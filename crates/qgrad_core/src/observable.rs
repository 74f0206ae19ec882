//! Pauli observables for qgrad
//!
//! Gantree: L1_Circuit → Observable
//!
//! Weighted sums of Pauli strings. Labels follow the usual convention:
//! the rightmost character acts on qubit 0, so `"IZ"` is Z on qubit 0.

use crate::error::{CoreError, CoreResult};
use crate::layout::Layout;
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Pauli
// ============================================================================

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Pauli {
    /// Identity
    #[default]
    I,
    /// Pauli X
    X,
    /// Pauli Y
    Y,
    /// Pauli Z
    Z,
}

impl Pauli {
    /// Parse a single label character
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    /// Label character
    pub fn as_char(&self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

// ============================================================================
// PauliString
// ============================================================================

/// Tensor product of single-qubit Paulis, indexed by qubit
/// Gantree: PauliString // 파울리 문자열
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    /// `paulis[q]` acts on qubit `q`
    paulis: Vec<Pauli>,
}

impl PauliString {
    /// Identity on `n` qubits
    pub fn identity(n: usize) -> Self {
        Self {
            paulis: vec![Pauli::I; n],
        }
    }

    /// Parse a label such as `"XIZ"` (rightmost = qubit 0)
    pub fn from_label(label: &str) -> CoreResult<Self> {
        let paulis = label
            .chars()
            .rev()
            .map(|c| {
                Pauli::from_char(c).ok_or_else(|| CoreError::InvalidPauliLabel(label.into()))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { paulis })
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// Pauli acting on `qubit`
    pub fn get(&self, qubit: QubitId) -> Pauli {
        self.paulis.get(qubit).copied().unwrap_or_default()
    }

    /// Check if all factors are identity
    pub fn is_identity(&self) -> bool {
        self.paulis.iter().all(|p| *p == Pauli::I)
    }

    /// Bit mask of qubits flipped by the string (X or Y)
    pub fn x_mask(&self) -> usize {
        self.mask(|p| matches!(p, Pauli::X | Pauli::Y))
    }

    /// Bit mask of qubits with a phase flip (Z or Y)
    pub fn z_mask(&self) -> usize {
        self.mask(|p| matches!(p, Pauli::Z | Pauli::Y))
    }

    /// Number of Y factors
    pub fn num_y(&self) -> usize {
        self.paulis.iter().filter(|p| **p == Pauli::Y).count()
    }

    fn mask(&self, pred: impl Fn(Pauli) -> bool) -> usize {
        self.paulis
            .iter()
            .enumerate()
            .filter(|(_, p)| pred(**p))
            .fold(0usize, |m, (q, _)| m | (1 << q))
    }

    /// Label string (rightmost = qubit 0)
    pub fn label(&self) -> String {
        self.paulis.iter().rev().map(Pauli::as_char).collect()
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// SparsePauliOp
// ============================================================================

/// Weighted sum of Pauli strings
/// Gantree: SparsePauliOp // 관측량
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparsePauliOp {
    num_qubits: usize,
    terms: Vec<(PauliString, f64)>,
}

impl SparsePauliOp {
    /// Empty (zero) operator on `num_qubits`
    pub fn zero(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: Vec::new(),
        }
    }

    /// `coeff * I` on `num_qubits`
    pub fn identity(num_qubits: usize, coeff: f64) -> Self {
        Self {
            num_qubits,
            terms: vec![(PauliString::identity(num_qubits), coeff)],
        }
    }

    /// Single term from a label
    pub fn from_label(label: &str, coeff: f64) -> CoreResult<Self> {
        let pauli = PauliString::from_label(label)?;
        let mut op = Self::zero(pauli.num_qubits());
        op.push(pauli, coeff)?;
        Ok(op)
    }

    /// Sum of labelled terms; all labels must have the same width
    pub fn from_list(terms: &[(&str, f64)]) -> CoreResult<Self> {
        let (first, _) = terms
            .first()
            .ok_or_else(|| CoreError::InvalidPauliLabel(String::new()))?;
        let mut op = Self::zero(first.chars().count());
        for &(label, coeff) in terms {
            op.add_term(label, coeff)?;
        }
        Ok(op)
    }

    /// Append a labelled term
    pub fn add_term(&mut self, label: &str, coeff: f64) -> CoreResult<()> {
        self.push(PauliString::from_label(label)?, coeff)
    }

    fn push(&mut self, pauli: PauliString, coeff: f64) -> CoreResult<()> {
        if pauli.num_qubits() != self.num_qubits {
            return Err(CoreError::QubitCountMismatch {
                left: self.num_qubits,
                right: pauli.num_qubits(),
            });
        }
        if !coeff.is_finite() {
            return Err(CoreError::InvalidCoefficient(coeff));
        }
        self.terms.push((pauli, coeff));
        Ok(())
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Terms
    pub fn terms(&self) -> &[(PauliString, f64)] {
        &self.terms
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if there are no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Re-express the operator on the physical qubits of a layout
    /// Gantree: apply_layout(layout, n) -> Result<Self> // 레이아웃 적용
    ///
    /// Without a layout the operator is only widened to `num_qubits`. With a
    /// layout, qubit `i` moves to `layout.physical(i)`; `num_qubits` defaults
    /// to the layout's physical width.
    pub fn apply_layout(
        &self,
        layout: Option<&Layout>,
        num_qubits: Option<usize>,
    ) -> CoreResult<Self> {
        match layout {
            None => {
                let target = num_qubits.unwrap_or(self.num_qubits);
                if target < self.num_qubits {
                    return Err(CoreError::NotEnoughQubits {
                        current: self.num_qubits,
                        target,
                    });
                }
                self.relabel(target, |q| q)
            }
            Some(layout) => {
                let target = num_qubits.unwrap_or_else(|| layout.num_physical());
                if layout.num_virtual() < self.num_qubits {
                    return Err(CoreError::InvalidLayout(format!(
                        "layout maps {} qubits, observable has {}",
                        layout.num_virtual(),
                        self.num_qubits
                    )));
                }
                if let Some(&q) = layout.mapping().iter().find(|&&q| q >= target) {
                    return Err(CoreError::InvalidLayout(format!(
                        "physical qubit {} out of range for {} qubits",
                        q, target
                    )));
                }
                let mapping = layout.mapping();
                self.relabel(target, |q| mapping[q])
            }
        }
    }

    fn relabel(&self, target: usize, map: impl Fn(QubitId) -> QubitId) -> CoreResult<Self> {
        let mut out = Self::zero(target);
        for (pauli, coeff) in &self.terms {
            let mut paulis = vec![Pauli::I; target];
            for q in 0..pauli.num_qubits() {
                let dest = map(q);
                if paulis[dest] != Pauli::I {
                    return Err(CoreError::InvalidLayout(format!(
                        "physical qubit {} assigned twice",
                        dest
                    )));
                }
                paulis[dest] = pauli.get(q);
            }
            out.push(PauliString { paulis }, *coeff)?;
        }
        Ok(out)
    }
}

impl fmt::Display for SparsePauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .terms
            .iter()
            .map(|(p, c)| format!("{:+.6} * {}", c, p))
            .collect();
        write!(f, "SparsePauliOp[{}]", terms.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================
