//! Estimator run options
//!
//! Gantree: L2_Estimator → Options
//!
//! Options are layered: an estimator's defaults, then a caller's defaults,
//! then per-call options. A field set at a higher layer wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Options forwarded to an estimator with a job
/// Gantree: EstimatorOptions // 실행 옵션
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorOptions {
    /// Number of shots (None = exact expectation values)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u64>,

    /// Target standard deviation of each estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,

    /// Seed for sampling noise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Estimator-specific options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EstimatorOptions {
    /// Empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set shots
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Set precision
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set an estimator-specific option
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Check if no option is set
    pub fn is_empty(&self) -> bool {
        self.shots.is_none()
            && self.precision.is_none()
            && self.seed.is_none()
            && self.extra.is_empty()
    }

    /// Combine with a higher-precedence layer; fields set in `higher` win
    /// Gantree: merged_with(&self, higher) -> Self // 옵션 병합
    pub fn merged_with(&self, higher: &EstimatorOptions) -> EstimatorOptions {
        let mut extra = self.extra.clone();
        extra.extend(higher.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        EstimatorOptions {
            shots: higher.shots.or(self.shots),
            precision: higher.precision.or(self.precision),
            seed: higher.seed.or(self.seed),
            extra,
        }
    }

    /// In-place version of [`merged_with`](Self::merged_with)
    pub fn update(&mut self, higher: &EstimatorOptions) {
        *self = self.merged_with(higher);
    }
}

impl fmt::Display for EstimatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::new();
        if let Some(shots) = self.shots {
            fields.push(format!("shots={}", shots));
        }
        if let Some(precision) = self.precision {
            fields.push(format!("precision={}", precision));
        }
        if let Some(seed) = self.seed {
            fields.push(format!("seed={}", seed));
        }
        for (k, v) in &self.extra {
            fields.push(format!("{}={}", k, v));
        }
        write!(f, "EstimatorOptions({})", fields.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_precedence() {
        let base = EstimatorOptions::new().with_shots(100).with_seed(1);
        let higher = EstimatorOptions::new().with_shots(4000);

        let merged = base.merged_with(&higher);
        assert_eq!(merged.shots, Some(4000));
        assert_eq!(merged.seed, Some(1));
        assert_eq!(merged.precision, None);
    }

    #[test]
    fn test_merge_extra() {
        let base = EstimatorOptions::new()
            .with_extra("resilience", 1)
            .with_extra("twirling", false);
        let higher = EstimatorOptions::new().with_extra("resilience", 2);

        let merged = base.merged_with(&higher);
        assert_eq!(merged.extra["resilience"], serde_json::json!(2));
        assert_eq!(merged.extra["twirling"], serde_json::json!(false));
    }

    #[test]
    fn test_empty() {
        assert!(EstimatorOptions::default().is_empty());
        assert!(!EstimatorOptions::new().with_precision(0.01).is_empty());
    }

    #[test]
    fn test_serde_skips_unset() {
        let json = serde_json::to_string(&EstimatorOptions::new().with_shots(10)).unwrap();
        assert_eq!(json, r#"{"shots":10}"#);
        let back: EstimatorOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shots, Some(10));
    }
}
