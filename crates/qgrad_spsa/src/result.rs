//! Gradient results
//!
//! Gantree: L3_Spsa → EstimatorGradientResult

use qgrad_core::Parameter;
use qgrad_estimator::EstimatorOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-task bookkeeping returned with a gradient
/// Gantree: GradientMetadata // 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientMetadata {
    /// Parameters the gradient entries belong to, in order
    pub parameters: Vec<Parameter>,
}

/// Result of one gradient call, aligned with the submitted tasks
/// Gantree: EstimatorGradientResult // 그래디언트 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorGradientResult {
    /// One gradient per task, ordered like the task's requested parameters
    pub gradients: Vec<Vec<f64>>,

    /// One entry per task
    pub metadata: Vec<GradientMetadata>,

    /// Options the job ran with
    pub options: EstimatorOptions,
}

impl EstimatorGradientResult {
    /// Number of tasks
    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    /// Check if no task was submitted
    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    /// Euclidean norm of each gradient
    pub fn norms(&self) -> Vec<f64> {
        self.gradients
            .iter()
            .map(|g| g.iter().map(|x| x * x).sum::<f64>().sqrt())
            .collect()
    }
}

impl fmt::Display for EstimatorGradientResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "EstimatorGradientResult({} tasks, {})", self.len(), self.options)?;
        for (gradient, meta) in self.gradients.iter().zip(&self.metadata) {
            let entries: Vec<String> = meta
                .parameters
                .iter()
                .zip(gradient)
                .map(|(p, g)| format!("{}={:+.6}", p, g))
                .collect();
            writeln!(f, "  [{}]", entries.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norms() {
        let result = EstimatorGradientResult {
            gradients: vec![vec![3.0, 4.0], vec![]],
            metadata: vec![
                GradientMetadata {
                    parameters: vec![Parameter::new("a"), Parameter::new("b")],
                },
                GradientMetadata { parameters: vec![] },
            ],
            options: EstimatorOptions::default(),
        };
        assert_eq!(result.len(), 2);
        assert_relative_eq!(result.norms()[0], 5.0);
        assert_eq!(result.norms()[1], 0.0);
        assert!(result.to_string().contains("a=+3.000000"));
    }
}
