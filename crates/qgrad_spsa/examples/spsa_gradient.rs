//! SPSA gradients of a small ansatz on the statevector estimator
//!
//! Run with `RUST_LOG=debug cargo run -p qgrad_spsa --example spsa_gradient`.

use qgrad_core::prelude::*;
use qgrad_estimator::{Estimator, LayoutPass, PassManager, StatevectorEstimator};
use qgrad_spsa::prelude::*;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let params = ParameterVector::new("θ", 6);
    let circuit = CircuitBuilder::with_name(3, "real_amplitudes")
        .real_amplitudes(&params, 1)
        .build();
    let observable = SparsePauliOp::from_list(&[("ZZI", 1.0), ("IZZ", 1.0), ("XII", 0.5)])?;
    let values = vec![0.1, -0.4, 0.8, 1.2, -0.3, 0.5];

    let tasks = vec![
        GradientTask::all(circuit.clone(), observable.clone(), values.clone())?,
        GradientTask::new(
            circuit,
            observable,
            values,
            Some(vec![params[5].clone(), params[0].clone()]),
        )?,
    ];

    let config = SpsaConfig::new()
        .with_epsilon(1e-3)
        .with_batch_size(8)
        .with_seed(42);
    println!("{}", config);

    // Legacy protocol, options forwarded with the job
    let legacy: Arc<dyn Estimator> = Arc::new(StatevectorEstimator::legacy());
    let mut gradient = SpsaEstimatorGradient::new(legacy, config.clone(), None)?;
    let result = gradient.run(&tasks, &EstimatorOptions::new().with_precision(1e-4).with_seed(7))?;
    println!("legacy:\n{}", result);

    // Bundle protocol with a layout pass onto a 2x3 grid
    let bundle: Arc<dyn Estimator> = Arc::new(StatevectorEstimator::bundle());
    let pass: Arc<dyn PassManager> = Arc::new(LayoutPass::on_topology(Topology::grid(2, 3)));
    let mut gradient = SpsaEstimatorGradient::new(bundle, config, Some(pass))?;
    let result = gradient.run(&tasks, &EstimatorOptions::default())?;
    println!("bundle:\n{}", result);

    for (i, norm) in result.norms().iter().enumerate() {
        println!("task {} gradient norm {:.6}", i, norm);
    }
    Ok(())
}
