//! # qgrad SPSA
//!
//! Gradients of estimator expectation values by simultaneous perturbation
//! (SPSA): two evaluations per batch sample, whatever the number of
//! parameters.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qgrad_spsa // L3: SPSA Gradient
//!     SpsaConfig // epsilon, batch_size, seed, options
//!     GradientTask // 회로 + 관측량 + 값 + 요청 파라미터
//!     PerturbationGenerator // ±1 벡터, 인스턴스 소유 StdRng
//!     RequestBatch // plus_0..plus_{b-1}, minus_0..minus_{b-1}
//!     EvaluatorAdapter // legacy / bundle 프로토콜
//!     GradientReducer // 차분 → 평균 → 부분집합
//!     SpsaEstimatorGradient // 전체 파이프라인
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qgrad_spsa::prelude::*;
//! use qgrad_core::prelude::*;
//! use qgrad_estimator::StatevectorEstimator;
//! use std::sync::Arc;
//!
//! let theta = ParameterVector::new("θ", 2);
//! let circuit = CircuitBuilder::new(2)
//!     .ry(0, &theta[0])
//!     .cnot(0, 1)
//!     .ry(1, &theta[1])
//!     .build();
//! let observable = SparsePauliOp::from_label("ZZ", 1.0).unwrap();
//! let task = GradientTask::all(circuit, observable, vec![0.3, -0.2]).unwrap();
//!
//! let config = SpsaConfig::new().with_epsilon(1e-3).with_batch_size(4).with_seed(42);
//! let estimator = Arc::new(StatevectorEstimator::bundle());
//! let mut gradient = SpsaEstimatorGradient::new(estimator, config, None).unwrap();
//!
//! let result = gradient.run(&[task], &EstimatorOptions::default()).unwrap();
//! assert_eq!(result.gradients[0].len(), 2);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Error types (Gantree: L3_Spsa → Errors)
pub mod error;

/// Configuration (Gantree: L3_Spsa → SpsaConfig)
pub mod config;

/// Gradient tasks (Gantree: L3_Spsa → GradientTask)
pub mod task;

/// Perturbations (Gantree: L3_Spsa → PerturbationGenerator)
pub mod perturbation;

/// Request flattening (Gantree: L3_Spsa → RequestBuilder)
pub mod request;

/// Protocol dispatch (Gantree: L3_Spsa → EvaluatorAdapter)
pub mod adapter;

/// Result reduction (Gantree: L3_Spsa → GradientReducer)
pub mod reducer;

/// Results (Gantree: L3_Spsa → EstimatorGradientResult)
pub mod result;

/// Gradient pipeline (Gantree: L3_Spsa → SpsaEstimatorGradient)
pub mod gradient;

// ============================================================================
// Re-exports
// ============================================================================

pub use adapter::EvaluatorAdapter;
pub use config::{SpsaConfig, DEFAULT_BATCH_SIZE, DEFAULT_EPSILON};
pub use error::{SpsaError, SpsaResult};
pub use gradient::SpsaEstimatorGradient;
pub use perturbation::{PerturbationGenerator, PerturbationSet};
pub use request::RequestBatch;
pub use result::{EstimatorGradientResult, GradientMetadata};
pub use task::GradientTask;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qgrad_spsa::prelude::*;
    //! ```

    pub use crate::config::SpsaConfig;
    pub use crate::error::{SpsaError, SpsaResult};
    pub use crate::gradient::SpsaEstimatorGradient;
    pub use crate::result::{EstimatorGradientResult, GradientMetadata};
    pub use crate::task::GradientTask;
    pub use qgrad_estimator::EstimatorOptions;
}

// ============================================================================
// Integration Tests
// ============================================================================
