//! SPSA gradient configuration
//!
//! Gantree: L3_Spsa → SpsaConfig
//!
//! Configuration for [`SpsaEstimatorGradient`](crate::SpsaEstimatorGradient).

use crate::error::{SpsaError, SpsaResult};
use qgrad_estimator::EstimatorOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default perturbation size
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Default number of perturbation samples per task
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// SPSA gradient configuration
/// Gantree: SpsaConfig // 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpsaConfig {
    /// Offset applied in each perturbation direction
    /// Gantree: epsilon: f64 // 섭동 크기 (1e-6)
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Perturbation samples averaged per task
    /// Gantree: batch_size: usize // 배치 크기 (1)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Seed of the perturbation stream (None = OS entropy)
    /// Gantree: seed: Option<u64> // 시드
    #[serde(default)]
    pub seed: Option<u64>,

    /// Default options forwarded to the estimator
    #[serde(default)]
    pub options: EstimatorOptions,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl SpsaConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            options: EstimatorOptions::default(),
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set epsilon
    /// Gantree: with_epsilon(self, e) -> Self // 섭동 설정
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set default estimator options
    pub fn with_options(mut self, options: EstimatorOptions) -> Self {
        self.options = options;
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> SpsaResult<()> {
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(SpsaError::InvalidConfiguration(format!(
                "epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }

        if self.batch_size == 0 {
            return Err(SpsaError::InvalidConfiguration(
                "batch_size must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> SpsaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> SpsaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SpsaResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save as a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> SpsaResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Default for SpsaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpsaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SpsaConfig(epsilon={:e}, batch_size={}, seed={:?})",
            self.epsilon, self.batch_size, self.seed
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpsaConfig::default();
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SpsaConfig::new()
            .with_epsilon(0.01)
            .with_batch_size(8)
            .with_seed(42)
            .with_options(EstimatorOptions::new().with_shots(1024));

        assert_eq!(config.epsilon, 0.01);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.options.shots, Some(1024));
    }

    #[test]
    fn test_validation() {
        for eps in [0.0, -1e-3, f64::NAN, f64::NEG_INFINITY] {
            let err = SpsaConfig::new().with_epsilon(eps).validate().unwrap_err();
            assert!(err.is_configuration_error(), "epsilon {} accepted", eps);
        }
        for eps in [f64::MIN_POSITIVE, 1e300, f64::INFINITY] {
            assert!(SpsaConfig::new().with_epsilon(eps).validate().is_ok(), "epsilon {}", eps);
        }
        assert!(SpsaConfig::new().with_batch_size(0).validate().is_err());
        assert!(SpsaConfig::new().with_epsilon(1e-12).validate().is_ok());
    }

    #[test]
    fn test_json_fills_defaults() {
        let config = SpsaConfig::from_json(r#"{"batch_size": 4}"#).unwrap();
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
        assert_eq!(config.batch_size, 4);

        assert!(SpsaConfig::from_json(r#"{"epsilon": -0.5}"#).is_err());
        assert!(matches!(
            SpsaConfig::from_json("not json"),
            Err(SpsaError::Json(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let config = SpsaConfig::new().with_seed(7).with_epsilon(0.05);
        let path = std::env::temp_dir().join(format!("qgrad_spsa_{}.json", std::process::id()));
        config.save(&path).unwrap();
        let loaded = SpsaConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
