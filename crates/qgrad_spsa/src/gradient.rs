//! SPSA estimator gradient
//!
//! Gantree: L3_Spsa → SpsaEstimatorGradient
//!
//! One call runs the whole pipeline: draw perturbations, build the request
//! list, submit it as a single job, reduce the results. Nothing is kept
//! between calls except the perturbation stream.

use crate::adapter::EvaluatorAdapter;
use crate::config::SpsaConfig;
use crate::error::SpsaResult;
use crate::perturbation::{PerturbationGenerator, PerturbationSet};
use crate::reducer;
use crate::request::RequestBatch;
use crate::result::{EstimatorGradientResult, GradientMetadata};
use crate::task::GradientTask;
use qgrad_estimator::{Estimator, EstimatorOptions, EstimatorProtocol, PassManager};
use std::sync::Arc;

/// SPSA gradient of estimator expectation values
/// Gantree: SpsaEstimatorGradient // SPSA 그래디언트
pub struct SpsaEstimatorGradient {
    /// Estimator evaluating the requests
    estimator: Arc<dyn Estimator>,

    /// Epsilon, batch size, seed and default options
    config: SpsaConfig,

    /// Optional transpilation for bundle estimators
    pass_manager: Option<Arc<dyn PassManager>>,

    /// Perturbation stream
    perturbations: PerturbationGenerator,
}

impl SpsaEstimatorGradient {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a gradient; fails if `epsilon <= 0` or `batch_size == 0`
    pub fn new(
        estimator: Arc<dyn Estimator>,
        config: SpsaConfig,
        pass_manager: Option<Arc<dyn PassManager>>,
    ) -> SpsaResult<Self> {
        config.validate()?;
        log::info!(
            "SPSA gradient ready: {} on {}{}",
            config,
            estimator.type_name(),
            if pass_manager.is_some() { " with pass manager" } else { "" }
        );

        let perturbations = PerturbationGenerator::new(config.seed);
        Ok(Self {
            estimator,
            config,
            pass_manager,
            perturbations,
        })
    }

    /// Create with default configuration
    pub fn with_defaults(estimator: Arc<dyn Estimator>) -> SpsaResult<Self> {
        Self::new(estimator, SpsaConfig::default(), None)
    }

    // ========================================================================
    // Options
    // ========================================================================

    /// Gradient default options
    pub fn options(&self) -> &EstimatorOptions {
        &self.config.options
    }

    /// Merge `options` into the gradient defaults
    pub fn update_default_options(&mut self, options: &EstimatorOptions) {
        self.config.options.update(options);
    }

    /// Configuration
    pub fn config(&self) -> &SpsaConfig {
        &self.config
    }

    // ========================================================================
    // Gradient
    // ========================================================================

    /// Estimate gradients for every task
    /// Gantree: run(&mut, tasks, opts) -> Result<EstimatorGradientResult> // 그래디언트 계산
    ///
    /// `options` take precedence over the gradient defaults, which take
    /// precedence over the estimator's own defaults. Bundle estimators do
    /// not receive the options; the result then reports the gradient
    /// defaults merged with `options`.
    pub fn run(
        &mut self,
        tasks: &[GradientTask],
        options: &EstimatorOptions,
    ) -> SpsaResult<EstimatorGradientResult> {
        let adapter =
            EvaluatorAdapter::select(self.estimator.as_ref(), self.pass_manager.as_deref())?;

        let run_options = self.config.options.merged_with(options);
        let result_options = match adapter.protocol() {
            EstimatorProtocol::Legacy => adapter.default_options().merged_with(&run_options),
            EstimatorProtocol::Bundle => {
                if !run_options.is_empty() {
                    log::warn!(
                        "Options ({}) are not forwarded to bundle estimators",
                        run_options
                    );
                }
                run_options.clone()
            }
        };

        if tasks.is_empty() {
            return Ok(EstimatorGradientResult {
                options: result_options,
                ..Default::default()
            });
        }

        let batch_size = self.config.batch_size;
        let sets: Vec<PerturbationSet> = tasks
            .iter()
            .map(|t| self.perturbations.sample(t.dimension(), batch_size))
            .collect();

        let batch = RequestBatch::build(tasks, &sets, self.config.epsilon);
        log::debug!(
            "{} tasks, batch size {}, {} requests",
            tasks.len(),
            batch_size,
            batch.len()
        );

        let results = adapter.evaluate(batch, &run_options)?;
        let gradients = reducer::reduce(&results, tasks, &sets, self.config.epsilon);

        Ok(EstimatorGradientResult {
            gradients,
            metadata: tasks
                .iter()
                .map(|t| GradientMetadata {
                    parameters: t.parameters().to_vec(),
                })
                .collect(),
            options: result_options,
        })
    }
}

impl std::fmt::Debug for SpsaEstimatorGradient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpsaEstimatorGradient")
            .field("estimator", &self.estimator.type_name())
            .field("config", &self.config)
            .field("pass_manager", &self.pass_manager.is_some())
            .finish()
    }
}
