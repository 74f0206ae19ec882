//! Perturbation generator
//!
//! Gantree: L3_Spsa → PerturbationGenerator
//!
//! Draws ±1 perturbation directions from a stream owned by one gradient
//! instance. With a fixed seed, the sequence of draws is reproducible in
//! call order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `batch_size` perturbation vectors for one task, entries in {-1, +1}
/// Gantree: PerturbationSet // 섭동 벡터 집합
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationSet {
    offsets: Vec<Vec<f64>>,
}

impl PerturbationSet {
    /// Wrap explicit offsets
    ///
    /// Every entry must be ±1; anything else is rejected.
    pub fn from_offsets(offsets: Vec<Vec<f64>>) -> Option<Self> {
        let valid = offsets
            .iter()
            .flatten()
            .all(|&o| o == 1.0 || o == -1.0);
        valid.then_some(Self { offsets })
    }

    /// Perturbation vectors
    pub fn offsets(&self) -> &[Vec<f64>] {
        &self.offsets
    }

    /// Number of samples
    pub fn batch_size(&self) -> usize {
        self.offsets.len()
    }
}

/// Seeded source of perturbation directions
/// Gantree: PerturbationGenerator // 섭동 생성기
#[derive(Debug, Clone)]
pub struct PerturbationGenerator {
    rng: StdRng,
}

impl PerturbationGenerator {
    /// Seeded from `seed`, or from OS entropy when `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Draw `batch_size` vectors of length `dimension`
    /// Gantree: sample(&mut, d, b) -> PerturbationSet // 섭동 추출
    pub fn sample(&mut self, dimension: usize, batch_size: usize) -> PerturbationSet {
        let offsets = (0..batch_size)
            .map(|_| {
                (0..dimension)
                    .map(|_| if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                    .collect()
            })
            .collect();
        PerturbationSet { offsets }
    }
}

// ============================================================================
// Tests
// ============================================================================
