//! Estimator protocols
//!
//! Gantree: L2_Estimator → Protocols
//!
//! Two ways of asking for expectation values are supported:
//!
//! - [`LegacyEstimator`]: parallel lists of circuits, observables and
//!   parameter vectors plus run options; the result carries `values`.
//! - [`BundleEstimator`]: a list of [`EstimatorPub`]s (circuit, observable,
//!   values); each result carries `evs`. Options are not passed per call.
//!
//! An [`Estimator`] declares which protocol it speaks through
//! [`Estimator::capability`].

use crate::error::EstimatorResult;
use crate::job::Job;
use crate::options::EstimatorOptions;
use qgrad_core::{ParamVec, ParameterizedCircuit, SparsePauliOp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form metadata attached to results
pub type Metadata = BTreeMap<String, serde_json::Value>;

// ============================================================================
// Legacy protocol
// ============================================================================

/// Result of a legacy estimator job
/// Gantree: ValueResult // 값 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueResult {
    /// One expectation value per submitted circuit, in submission order
    pub values: Vec<f64>,

    /// Per-circuit metadata
    pub metadata: Vec<Metadata>,
}

impl ValueResult {
    /// Result with empty metadata
    pub fn from_values(values: Vec<f64>) -> Self {
        let metadata = vec![Metadata::new(); values.len()];
        Self { values, metadata }
    }
}

/// Estimator taking parallel circuit/observable/value lists
/// Gantree: LegacyEstimator // 프로토콜 A
pub trait LegacyEstimator: Send + Sync {
    /// Options used when the caller sets nothing
    fn default_options(&self) -> EstimatorOptions {
        EstimatorOptions::default()
    }

    /// Submit a job
    ///
    /// `circuits`, `observables` and `parameter_values` have equal length;
    /// entry `i` of the result's `values` belongs to entry `i` of each list.
    fn run(
        &self,
        circuits: &[ParameterizedCircuit],
        observables: &[SparsePauliOp],
        parameter_values: &[ParamVec],
        options: &EstimatorOptions,
    ) -> EstimatorResult<Job<ValueResult>>;
}

// ============================================================================
// Bundle protocol
// ============================================================================

/// Primitive unified bloc: one circuit, one observable, one parameter vector
/// Gantree: EstimatorPub // PUB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorPub {
    /// Circuit, possibly transpiled
    pub circuit: ParameterizedCircuit,

    /// Observable on the circuit's qubits
    pub observable: SparsePauliOp,

    /// Values in the circuit's parameter order
    pub parameter_values: ParamVec,
}

impl EstimatorPub {
    /// Create a new PUB
    pub fn new(
        circuit: ParameterizedCircuit,
        observable: SparsePauliOp,
        parameter_values: ParamVec,
    ) -> Self {
        Self {
            circuit,
            observable,
            parameter_values,
        }
    }
}

/// Result for a single PUB
/// Gantree: PubResult // PUB 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubResult {
    evs: f64,
    stds: f64,
    metadata: Metadata,
}

impl PubResult {
    /// Create a result from an expectation value and its standard error
    pub fn new(evs: f64, stds: f64) -> Self {
        Self {
            evs,
            stds,
            metadata: Metadata::new(),
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Expectation value
    pub fn evs(&self) -> f64 {
        self.evs
    }

    /// Standard error of the expectation value
    pub fn stds(&self) -> f64 {
        self.stds
    }

    /// Metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Estimator taking a list of PUBs
/// Gantree: BundleEstimator // 프로토콜 B
pub trait BundleEstimator: Send + Sync {
    /// Options the estimator was configured with
    fn default_options(&self) -> EstimatorOptions {
        EstimatorOptions::default()
    }

    /// Submit a job; one [`PubResult`] per PUB, in order
    fn run(&self, pubs: Vec<EstimatorPub>) -> EstimatorResult<Job<Vec<PubResult>>>;
}

// ============================================================================
// Capability
// ============================================================================

/// Protocol spoken by an estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorProtocol {
    /// [`LegacyEstimator`]
    Legacy,
    /// [`BundleEstimator`]
    Bundle,
}

impl fmt::Display for EstimatorProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Bundle => write!(f, "bundle"),
        }
    }
}

/// Declared capability of an estimator
pub enum Capability<'a> {
    /// Speaks the legacy protocol
    Legacy(&'a dyn LegacyEstimator),
    /// Speaks the bundle protocol
    Bundle(&'a dyn BundleEstimator),
    /// Speaks neither
    Unsupported,
}

impl Capability<'_> {
    /// Protocol, if any
    pub fn protocol(&self) -> Option<EstimatorProtocol> {
        match self {
            Capability::Legacy(_) => Some(EstimatorProtocol::Legacy),
            Capability::Bundle(_) => Some(EstimatorProtocol::Bundle),
            Capability::Unsupported => None,
        }
    }

    /// Default options of the underlying estimator
    pub fn default_options(&self) -> EstimatorOptions {
        match self {
            Capability::Legacy(e) => e.default_options(),
            Capability::Bundle(e) => e.default_options(),
            Capability::Unsupported => EstimatorOptions::default(),
        }
    }
}

/// Anything that can be handed to a gradient as its evaluator
/// Gantree: Estimator // 평가기
pub trait Estimator: Send + Sync {
    /// Which protocol this estimator speaks
    fn capability(&self) -> Capability<'_>;

    /// Concrete type name, used in error messages
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    impl Estimator for Opaque {
        fn capability(&self) -> Capability<'_> {
            Capability::Unsupported
        }
    }

    struct Constant(f64);

    impl BundleEstimator for Constant {
        fn run(&self, pubs: Vec<EstimatorPub>) -> EstimatorResult<Job<Vec<PubResult>>> {
            Ok(Job::completed(
                pubs.iter().map(|_| PubResult::new(self.0, 0.0)).collect(),
            ))
        }
    }

    impl Estimator for Constant {
        fn capability(&self) -> Capability<'_> {
            Capability::Bundle(self)
        }
    }

    #[test]
    fn test_type_name_is_concrete() {
        let boxed: Box<dyn Estimator> = Box::new(Opaque);
        assert!(boxed.type_name().ends_with("Opaque"));
        assert_eq!(boxed.capability().protocol(), None);
    }

    #[test]
    fn test_bundle_capability() {
        let est = Constant(0.25);
        let Capability::Bundle(bundle) = est.capability() else {
            panic!("expected bundle capability");
        };
        let circuit = ParameterizedCircuit::new(1);
        let observable = SparsePauliOp::from_label("Z", 1.0).unwrap();
        let pubs = vec![EstimatorPub::new(circuit, observable, vec![]); 3];
        let results = bundle.run(pubs).unwrap().result().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].evs(), 0.25);
    }

    #[test]
    fn test_value_result_metadata_len() {
        let r = ValueResult::from_values(vec![0.1, 0.2]);
        assert_eq!(r.metadata.len(), 2);
    }
}
