//! Request builder
//!
//! Gantree: L3_Spsa → RequestBuilder
//!
//! Flattens all tasks of a call into one request list. For task `i` the
//! block is `plus_0..plus_{b-1}` followed by `minus_0..minus_{b-1}`; the
//! reducer relies on exactly this order.

use crate::perturbation::PerturbationSet;
use crate::task::GradientTask;
use qgrad_core::{ParamVec, ParameterizedCircuit, SparsePauliOp};
use qgrad_estimator::EstimatorPub;

/// Flat, ordered list of evaluation requests for one call
/// Gantree: RequestBatch // 평가 요청 목록
#[derive(Debug, Clone, Default)]
pub struct RequestBatch {
    circuits: Vec<ParameterizedCircuit>,
    observables: Vec<SparsePauliOp>,
    values: Vec<ParamVec>,
    /// Requests contributed by each task, in task order
    windows: Vec<usize>,
}

impl RequestBatch {
    /// Build plus/minus requests for every task
    /// Gantree: build(tasks, sets, eps) -> RequestBatch // 요청 생성
    pub fn build(tasks: &[GradientTask], perturbations: &[PerturbationSet], epsilon: f64) -> Self {
        let mut batch = Self::default();
        for (task, set) in tasks.iter().zip(perturbations) {
            batch.push_task(task, set, epsilon);
        }
        batch
    }

    fn push_task(&mut self, task: &GradientTask, set: &PerturbationSet, epsilon: f64) {
        let shifted = |sign: f64| {
            set.offsets()
                .iter()
                .map(|offset| {
                    task.values()
                        .iter()
                        .zip(offset)
                        .map(|(v, o)| v + sign * epsilon * o)
                        .collect::<ParamVec>()
                })
                .collect::<Vec<_>>()
        };
        let plus = shifted(1.0);
        let minus = shifted(-1.0);

        let n = plus.len() + minus.len();
        self.circuits.extend(std::iter::repeat(task.circuit()).take(n).cloned());
        self.observables.extend(std::iter::repeat(task.observable()).take(n).cloned());
        self.values.extend(plus);
        self.values.extend(minus);
        self.windows.push(n);
    }

    /// Total number of requests
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no requests
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Circuits, one per request
    pub fn circuits(&self) -> &[ParameterizedCircuit] {
        &self.circuits
    }

    /// Observables, one per request
    pub fn observables(&self) -> &[SparsePauliOp] {
        &self.observables
    }

    /// Parameter values, one per request
    pub fn values(&self) -> &[ParamVec] {
        &self.values
    }

    /// Number of requests per task
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Split into parallel lists
    pub fn into_parts(self) -> (Vec<ParameterizedCircuit>, Vec<SparsePauliOp>, Vec<ParamVec>) {
        (self.circuits, self.observables, self.values)
    }

    /// Requests as PUBs, in order
    pub fn into_pubs(self) -> Vec<EstimatorPub> {
        self.circuits
            .into_iter()
            .zip(self.observables)
            .zip(self.values)
            .map(|((c, o), v)| EstimatorPub::new(c, o, v))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
