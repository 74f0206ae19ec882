//! Gradient reducer
//!
//! Gantree: L3_Spsa → GradientReducer
//!
//! Turns the flat result list back into one gradient per task. For sample
//! `k` of a task, `diff_k = (plus_k - minus_k) / 2ε` and the gradient
//! sample is `diff_k / offset_k` coordinate-wise (offsets are ±1). Samples
//! are averaged, then the requested coordinates are picked out.

use crate::perturbation::PerturbationSet;
use crate::task::GradientTask;

/// Reduce `results` (aligned with the requests) to per-task gradients
///
/// `results.len()` must equal `2 * batch_size` summed over the tasks.
/// Gantree: reduce(results, tasks, sets, eps) -> Vec<Vec<f64>> // 그래디언트 복원
pub fn reduce(
    results: &[f64],
    tasks: &[GradientTask],
    perturbations: &[PerturbationSet],
    epsilon: f64,
) -> Vec<Vec<f64>> {
    let mut start = 0;
    tasks
        .iter()
        .zip(perturbations)
        .map(|(task, set)| {
            let b = set.batch_size();
            let window = &results[start..start + 2 * b];
            start += 2 * b;
            let (plus, minus) = window.split_at(b);

            let full = average_samples(plus, minus, set, task.dimension(), epsilon);
            task.indices().iter().map(|&i| full[i]).collect()
        })
        .collect()
}

/// Mean over samples of `(plus_k - minus_k) / (2ε · offset_k)`
fn average_samples(
    plus: &[f64],
    minus: &[f64],
    set: &PerturbationSet,
    dimension: usize,
    epsilon: f64,
) -> Vec<f64> {
    let mut gradient = vec![0.0; dimension];
    for ((p, m), offset) in plus.iter().zip(minus).zip(set.offsets()) {
        let diff = (p - m) / (2.0 * epsilon);
        for (g, o) in gradient.iter_mut().zip(offset) {
            *g += diff / o;
        }
    }

    let b = set.batch_size() as f64;
    gradient.iter_mut().for_each(|g| *g /= b);
    gradient
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qgrad_core::{CircuitBuilder, Parameter, ParameterVector, SparsePauliOp};

    fn task(p: &ParameterVector, subset: Option<Vec<Parameter>>) -> GradientTask {
        let circuit = CircuitBuilder::new(p.len()).ry_layer(p.params()).build();
        let obs = SparsePauliOp::identity(p.len(), 1.0);
        GradientTask::new(circuit, obs, vec![0.0; p.len()], subset).unwrap()
    }

    #[test]
    fn test_single_sample() {
        let p = ParameterVector::new("x", 3);
        let set = PerturbationSet::from_offsets(vec![vec![1.0, -1.0, 1.0]]).unwrap();
        // plus - minus = 0.4, eps = 0.1 -> diff = 2.0
        let grads = reduce(&[0.7, 0.3], &[task(&p, None)], &[set], 0.1);
        assert_eq!(grads.len(), 1);
        assert_relative_eq!(grads[0][0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(grads[0][1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(grads[0][2], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_batch_average() {
        let p = ParameterVector::new("x", 2);
        let set =
            PerturbationSet::from_offsets(vec![vec![1.0, 1.0], vec![1.0, -1.0]]).unwrap();
        // results: plus_0, plus_1, minus_0, minus_1
        // diff_0 = (1 - 0) / 1 = 1, diff_1 = (3 - 1) / 1 = 2
        let grads = reduce(&[1.0, 3.0, 0.0, 1.0], &[task(&p, None)], &[set], 0.5);
        // sample 0 = [1, 1], sample 1 = [2, -2]
        assert_relative_eq!(grads[0][0], 1.5, epsilon = 1e-12);
        assert_relative_eq!(grads[0][1], -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_subset_and_windows() {
        let p = ParameterVector::new("x", 3);
        let q = ParameterVector::new("y", 1);
        let sub = task(&p, Some(vec![p[2].clone(), p[0].clone()]));
        let single = task(&q, None);
        let sets = vec![
            PerturbationSet::from_offsets(vec![vec![1.0, 1.0, -1.0]]).unwrap(),
            PerturbationSet::from_offsets(vec![vec![-1.0]]).unwrap(),
        ];

        let grads = reduce(&[2.0, 0.0, 5.0, 4.0], &[sub, single], &sets, 0.5);
        assert_eq!(grads[0].len(), 2);
        assert_relative_eq!(grads[0][0], -2.0, epsilon = 1e-12);
        assert_relative_eq!(grads[0][1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(grads[1][0], -1.0, epsilon = 1e-12);
    }
}
