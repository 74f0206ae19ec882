//! # qgrad Estimator
//!
//! Expectation-value estimators for qgrad: the two submission protocols,
//! job handles, run options, pass managers and a statevector reference.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qgrad_estimator // L2: Estimator
//!     Errors // EstimatorError
//!     Options // EstimatorOptions, 병합 규칙
//!     Job // 제출 → 결과
//!     Protocols // LegacyEstimator, BundleEstimator, Capability
//!     Transpiler // PassManager, LayoutPass
//!     StatevectorEstimator // 참조 구현
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qgrad_estimator::prelude::*;
//! use qgrad_core::prelude::*;
//!
//! let theta = Parameter::new("θ");
//! let circuit = CircuitBuilder::new(1).ry(0, &theta).build();
//! let observable = SparsePauliOp::from_label("Z", 1.0).unwrap();
//!
//! let estimator = StatevectorEstimator::bundle();
//! let job = BundleEstimator::run(
//!     &estimator,
//!     vec![EstimatorPub::new(circuit, observable, vec![0.0])],
//! )
//! .unwrap();
//! let results = job.result().unwrap();
//! assert!((results[0].evs() - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Error types (Gantree: L2_Estimator → Errors)
pub mod error;

/// Run options (Gantree: L2_Estimator → Options)
pub mod options;

/// Job handles (Gantree: L2_Estimator → Job)
pub mod job;

/// Estimator protocols (Gantree: L2_Estimator → Protocols)
pub mod estimator;

/// Pass managers (Gantree: L2_Estimator → Transpiler)
pub mod transpiler;

/// Statevector estimator (Gantree: L2_Estimator → StatevectorEstimator)
pub mod simulator;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{EstimatorError, EstimatorResult};
pub use estimator::{
    BundleEstimator, Capability, Estimator, EstimatorProtocol, EstimatorPub, LegacyEstimator,
    Metadata, PubResult, ValueResult,
};
pub use job::{Job, JobStatus};
pub use options::EstimatorOptions;
pub use simulator::{StatevectorEstimator, DEFAULT_MAX_QUBITS, QUBIT_LIMIT};
pub use transpiler::{LayoutPass, LayoutStrategy, PassManager};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qgrad_estimator::prelude::*;
    //! ```

    pub use crate::error::{EstimatorError, EstimatorResult};
    pub use crate::estimator::{
        BundleEstimator, Capability, Estimator, EstimatorProtocol, EstimatorPub,
        LegacyEstimator, PubResult, ValueResult,
    };
    pub use crate::job::{Job, JobStatus};
    pub use crate::options::EstimatorOptions;
    pub use crate::simulator::StatevectorEstimator;
    pub use crate::transpiler::{LayoutPass, PassManager};
}

// ============================================================================
// Integration Tests
// ============================================================================
