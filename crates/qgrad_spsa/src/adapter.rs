//! Evaluator adapter
//!
//! Gantree: L3_Spsa → EvaluatorAdapter
//!
//! Submits a [`RequestBatch`] as one job through whichever protocol the
//! estimator declares and returns one value per request, in request order.
//! Any failure on the estimator side becomes [`SpsaError::EvaluatorFailure`].

use crate::error::{SpsaError, SpsaResult};
use crate::request::RequestBatch;
use qgrad_estimator::{
    BundleEstimator, Capability, Estimator, EstimatorError, EstimatorOptions, EstimatorProtocol,
    EstimatorPub, LegacyEstimator, PassManager,
};

/// Protocol chosen for one gradient call
/// Gantree: EvaluatorAdapter // 프로토콜 어댑터
pub enum EvaluatorAdapter<'a> {
    /// Parallel lists, options forwarded with the job
    Legacy(&'a dyn LegacyEstimator),
    /// PUBs, circuits optionally transpiled first
    Bundle {
        /// Estimator
        estimator: &'a dyn BundleEstimator,
        /// Transpilation applied before building PUBs
        pass_manager: Option<&'a dyn PassManager>,
    },
}

impl<'a> EvaluatorAdapter<'a> {
    /// Pick the protocol declared by `estimator`
    ///
    /// The pass manager only applies to the bundle protocol.
    pub fn select(
        estimator: &'a dyn Estimator,
        pass_manager: Option<&'a dyn PassManager>,
    ) -> SpsaResult<Self> {
        match estimator.capability() {
            Capability::Legacy(legacy) => Ok(Self::Legacy(legacy)),
            Capability::Bundle(bundle) => Ok(Self::Bundle {
                estimator: bundle,
                pass_manager,
            }),
            Capability::Unsupported => Err(SpsaError::InvalidConfiguration(format!(
                "accepted estimators speak the legacy or bundle protocol; got {} instead",
                estimator.type_name()
            ))),
        }
    }

    /// Selected protocol
    pub fn protocol(&self) -> EstimatorProtocol {
        match self {
            Self::Legacy(_) => EstimatorProtocol::Legacy,
            Self::Bundle { .. } => EstimatorProtocol::Bundle,
        }
    }

    /// Default options of the selected estimator
    pub fn default_options(&self) -> EstimatorOptions {
        match self {
            Self::Legacy(e) => e.default_options(),
            Self::Bundle { estimator, .. } => estimator.default_options(),
        }
    }

    /// Submit the batch and block until every value is available
    /// Gantree: evaluate(&self, batch, opts) -> Result<Vec<f64>> // 평가 실행
    ///
    /// `options` only reach legacy estimators.
    pub fn evaluate(&self, batch: RequestBatch, options: &EstimatorOptions) -> SpsaResult<Vec<f64>> {
        let expected = batch.len();
        log::debug!("Submitting {} requests ({} protocol)", expected, self.protocol());

        let values = match self {
            Self::Legacy(estimator) => run_legacy(*estimator, batch, options),
            Self::Bundle {
                estimator,
                pass_manager,
            } => run_bundle(*estimator, *pass_manager, batch),
        }
        .map_err(|source| {
            log::warn!("Estimator job failed: {}", source);
            SpsaError::evaluator(format!("{} estimator job", self.protocol()), source)
        })?;

        if values.len() != expected {
            return Err(SpsaError::evaluator(
                format!("{} estimator job", self.protocol()),
                EstimatorError::Other(format!(
                    "returned {} values for {} requests",
                    values.len(),
                    expected
                )),
            ));
        }
        Ok(values)
    }
}

fn run_legacy(
    estimator: &dyn LegacyEstimator,
    batch: RequestBatch,
    options: &EstimatorOptions,
) -> Result<Vec<f64>, EstimatorError> {
    let (circuits, observables, values) = batch.into_parts();
    let job = estimator.run(&circuits, &observables, &values, options)?;
    log::debug!("Waiting for legacy job {}", job.job_id());
    Ok(job.result()?.values)
}

fn run_bundle(
    estimator: &dyn BundleEstimator,
    pass_manager: Option<&dyn PassManager>,
    batch: RequestBatch,
) -> Result<Vec<f64>, EstimatorError> {
    let pubs = match pass_manager {
        None => batch.into_pubs(),
        Some(pm) => {
            let (circuits, observables, values) = batch.into_parts();
            let transpiled = pm.run(&circuits)?;
            let mapped = transpiled
                .iter()
                .zip(&observables)
                .map(|(c, o)| o.apply_layout(c.layout(), None))
                .collect::<Result<Vec<_>, _>>()?;
            transpiled
                .into_iter()
                .zip(mapped)
                .zip(values)
                .map(|((c, o), v)| EstimatorPub::new(c, o, v))
                .collect()
        }
    };

    let job = estimator.run(pubs)?;
    log::debug!("Waiting for bundle job {}", job.job_id());
    Ok(job.result()?.iter().map(|r| r.evs()).collect())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perturbation::PerturbationSet;
    use crate::task::GradientTask;
    use qgrad_core::{CircuitBuilder, Parameter, ParamVec, ParameterizedCircuit, SparsePauliOp};
    use qgrad_estimator::{Job, StatevectorEstimator, ValueResult};

    struct Opaque;

    impl Estimator for Opaque {
        fn capability(&self) -> Capability<'_> {
            Capability::Unsupported
        }
    }

    /// Legacy estimator that drops the last value
    struct ShortChanging;

    impl LegacyEstimator for ShortChanging {
        fn run(
            &self,
            circuits: &[ParameterizedCircuit],
            _: &[SparsePauliOp],
            _: &[ParamVec],
            _: &EstimatorOptions,
        ) -> Result<Job<ValueResult>, EstimatorError> {
            let n = circuits.len().saturating_sub(1);
            Ok(Job::completed(ValueResult::from_values(vec![0.0; n])))
        }
    }

    impl Estimator for ShortChanging {
        fn capability(&self) -> Capability<'_> {
            Capability::Legacy(self)
        }
    }

    fn batch() -> RequestBatch {
        let theta = Parameter::new("theta");
        let circuit = CircuitBuilder::new(1).ry(0, &theta).build();
        let obs = SparsePauliOp::from_label("Z", 1.0).unwrap();
        let task = GradientTask::all(circuit, obs, vec![0.3]).unwrap();
        let set = PerturbationSet::from_offsets(vec![vec![1.0]]).unwrap();
        RequestBatch::build(&[task], &[set], 0.01)
    }

    #[test]
    fn test_unsupported_names_type() {
        let err = EvaluatorAdapter::select(&Opaque, None).err().unwrap();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("Opaque"));
    }

    #[test]
    fn test_selects_declared_protocol() {
        let legacy = StatevectorEstimator::legacy();
        let bundle = StatevectorEstimator::bundle();
        assert_eq!(
            EvaluatorAdapter::select(&legacy, None).unwrap().protocol(),
            EstimatorProtocol::Legacy
        );
        assert_eq!(
            EvaluatorAdapter::select(&bundle, None).unwrap().protocol(),
            EstimatorProtocol::Bundle
        );
    }

    #[test]
    fn test_values_in_request_order() {
        let est = StatevectorEstimator::bundle();
        let adapter = EvaluatorAdapter::select(&est, None).unwrap();
        let values = adapter.evaluate(batch(), &EstimatorOptions::default()).unwrap();
        assert_eq!(values.len(), 2);
        assert!((values[0] - (0.31f64).cos()).abs() < 1e-12);
        assert!((values[1] - (0.29f64).cos()).abs() < 1e-12);
    }

    #[test]
    fn test_short_result_is_evaluator_failure() {
        let adapter = EvaluatorAdapter::select(&ShortChanging, None).unwrap();
        let err = adapter.evaluate(batch(), &EstimatorOptions::default()).unwrap_err();
        assert!(err.is_evaluator_failure());
    }
}
