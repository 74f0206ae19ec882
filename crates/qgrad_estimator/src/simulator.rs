//! Statevector estimator for qgrad
//!
//! Gantree: L2_Estimator → StatevectorEstimator
//!
//! Exact expectation values from a dense statevector. When `precision` or
//! `shots` is set, Gaussian sampling noise is added to each value. Qubit
//! `q` is bit `q` of the basis-state index, matching Pauli label order.

use crate::error::{EstimatorError, EstimatorResult};
use crate::estimator::{
    BundleEstimator, Capability, Estimator, EstimatorProtocol, EstimatorPub, LegacyEstimator,
    Metadata, PubResult, ValueResult,
};
use crate::job::Job;
use crate::options::EstimatorOptions;
use num_complex::Complex64;
use qgrad_core::{BoundGate, CoreError, Gate, ParamVec, ParameterizedCircuit, SparsePauliOp};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::{Arc, Mutex};

/// Widest circuit simulated by default
pub const DEFAULT_MAX_QUBITS: usize = 16;

/// Upper bound for [`StatevectorEstimator::with_max_qubits`]
pub const QUBIT_LIMIT: usize = 30;

// ============================================================================
// Statevector
// ============================================================================

/// Dense statevector, `2^n` amplitudes
struct Statevector {
    amps: Vec<Complex64>,
}

impl Statevector {
    fn zero(num_qubits: usize) -> Self {
        let mut amps = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amps[0] = Complex64::new(1.0, 0.0);
        Self { amps }
    }

    fn apply(&mut self, gate: &BoundGate) {
        let i = Complex64::i();
        match *gate {
            Gate::H(q) => self.single(q, |a, b| ((a + b) * FRAC_1_SQRT_2, (a - b) * FRAC_1_SQRT_2)),
            Gate::X(q) => self.single(q, |a, b| (b, a)),
            Gate::Y(q) => self.single(q, |a, b| (-i * b, i * a)),
            Gate::Z(q) => self.phase(q, Complex64::new(-1.0, 0.0)),
            Gate::S(q) => self.phase(q, i),
            Gate::Sdg(q) => self.phase(q, -i),
            Gate::T(q) => self.phase(q, Complex64::from_polar(1.0, PI / 4.0)),
            Gate::Tdg(q) => self.phase(q, Complex64::from_polar(1.0, -PI / 4.0)),
            Gate::Sx(q) => {
                let p = Complex64::new(0.5, 0.5);
                let m = Complex64::new(0.5, -0.5);
                self.single(q, |a, b| (p * a + m * b, m * a + p * b))
            }
            Gate::Rx(q, theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                let mis = Complex64::new(0.0, -s);
                self.single(q, |a, b| (a * c + b * mis, a * mis + b * c))
            }
            Gate::Ry(q, theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                self.single(q, |a, b| (a * c - b * s, a * s + b * c))
            }
            Gate::Rz(q, theta) => self.rz(q, theta, None),
            Gate::P(q, lambda) => self.phase(q, Complex64::from_polar(1.0, lambda)),
            Gate::Cnot(control, target) => {
                let (cm, tm) = (1 << control, 1 << target);
                for k in 0..self.amps.len() {
                    if k & cm != 0 && k & tm == 0 {
                        self.amps.swap(k, k | tm);
                    }
                }
            }
            Gate::Cz(a, b) => {
                let mask = (1 << a) | (1 << b);
                for (k, amp) in self.amps.iter_mut().enumerate() {
                    if k & mask == mask {
                        *amp = -*amp;
                    }
                }
            }
            Gate::Swap(a, b) => {
                let (am, bm) = (1 << a, 1 << b);
                for k in 0..self.amps.len() {
                    if k & am != 0 && k & bm == 0 {
                        self.amps.swap(k, k ^ am ^ bm);
                    }
                }
            }
            Gate::Crz(control, target, theta) => self.rz(target, theta, Some(control)),
            Gate::Barrier(_) => {}
        }
    }

    /// Apply a 2x2 map to every amplitude pair differing in bit `q`
    fn single<F>(&mut self, q: usize, f: F)
    where
        F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
    {
        let mask = 1 << q;
        for k in 0..self.amps.len() {
            if k & mask == 0 {
                let (a, b) = f(self.amps[k], self.amps[k | mask]);
                self.amps[k] = a;
                self.amps[k | mask] = b;
            }
        }
    }

    fn phase(&mut self, q: usize, phase: Complex64) {
        let mask = 1 << q;
        for (k, amp) in self.amps.iter_mut().enumerate() {
            if k & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn rz(&mut self, q: usize, theta: f64, control: Option<usize>) {
        let lo = Complex64::from_polar(1.0, -theta / 2.0);
        let hi = Complex64::from_polar(1.0, theta / 2.0);
        let mask = 1 << q;
        let cmask = control.map_or(0, |c| 1 << c);
        for (k, amp) in self.amps.iter_mut().enumerate() {
            if k & cmask == cmask {
                *amp *= if k & mask == 0 { lo } else { hi };
            }
        }
    }

    /// ⟨ψ|O|ψ⟩ using P|k⟩ = i^{#Y} (-1)^{|k & z|} |k ^ x⟩
    fn expectation(&self, observable: &SparsePauliOp) -> f64 {
        observable
            .terms()
            .iter()
            .map(|(pauli, coeff)| {
                let (x, z) = (pauli.x_mask(), pauli.z_mask());
                let sum: Complex64 = self
                    .amps
                    .iter()
                    .enumerate()
                    .map(|(k, amp)| {
                        let sign = if (k & z).count_ones() % 2 == 0 { 1.0 } else { -1.0 };
                        self.amps[k ^ x].conj() * amp * sign
                    })
                    .sum();
                let y_phase = i_pow(pauli.num_y());
                coeff * (y_phase * sum).re
            })
            .sum()
    }
}

fn i_pow(n: usize) -> Complex64 {
    match n % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Everything a deferred job needs, detached from the estimator
#[derive(Clone)]
struct Runner {
    max_qubits: usize,
    options: EstimatorOptions,
    rng: Arc<Mutex<StdRng>>,
}

impl Runner {
    fn exact(
        &self,
        circuit: &ParameterizedCircuit,
        observable: &SparsePauliOp,
        values: &[f64],
    ) -> EstimatorResult<f64> {
        let n = circuit.num_qubits();
        if n > self.max_qubits {
            return Err(EstimatorError::TooManyQubits {
                got: n,
                max: self.max_qubits,
            });
        }
        if observable.num_qubits() != n {
            return Err(CoreError::QubitCountMismatch {
                left: n,
                right: observable.num_qubits(),
            }
            .into());
        }

        let mut state = Statevector::zero(n);
        for gate in circuit.bind(values)? {
            state.apply(&gate);
        }
        Ok(state.expectation(observable))
    }

    /// Standard deviation of the sampling noise, if any
    fn noise_std(&self, exact: f64, observable: &SparsePauliOp) -> Option<f64> {
        match (self.options.precision, self.options.shots) {
            (Some(p), _) if p > 0.0 => Some(p),
            (_, Some(shots)) if shots > 0 => {
                let norm: f64 = observable.terms().iter().map(|(_, c)| c.abs()).sum();
                Some(((norm * norm - exact * exact).max(0.0) / shots as f64).sqrt())
            }
            _ => None,
        }
    }

    /// Estimate each entry; returns (value, std) pairs
    fn estimate(
        &self,
        entries: &[(ParameterizedCircuit, SparsePauliOp, ParamVec)],
    ) -> EstimatorResult<Vec<(f64, f64)>> {
        let exact = entries
            .iter()
            .map(|(c, o, v)| self.exact(c, o, v))
            .collect::<EstimatorResult<Vec<f64>>>()?;

        let stds: Vec<Option<f64>> = exact
            .iter()
            .zip(entries)
            .map(|(&ev, (_, o, _))| self.noise_std(ev, o))
            .collect();
        if stds.iter().all(Option::is_none) {
            return Ok(exact.into_iter().map(|ev| (ev, 0.0)).collect());
        }

        let mut seeded;
        let mut shared;
        let rng: &mut StdRng = match self.options.seed {
            Some(seed) => {
                seeded = StdRng::seed_from_u64(seed);
                &mut seeded
            }
            None => {
                shared = self
                    .rng
                    .lock()
                    .map_err(|_| EstimatorError::ExecutionFailed("noise source poisoned".into()))?;
                &mut shared
            }
        };

        exact
            .into_iter()
            .zip(stds)
            .map(|(ev, std)| match std {
                Some(std) => {
                    let noise = Normal::new(0.0, std).map_err(|e| {
                        EstimatorError::ExecutionFailed(format!("noise with std {}: {}", std, e))
                    })?;
                    Ok((ev + noise.sample(rng), std))
                }
                None => Ok((ev, 0.0)),
            })
            .collect()
    }
}

fn entry_metadata(std: f64, options: &EstimatorOptions) -> Metadata {
    let mut metadata = Metadata::new();
    if let Some(shots) = options.shots {
        metadata.insert("shots".into(), shots.into());
    }
    if std > 0.0 {
        metadata.insert("std".into(), std.into());
    }
    metadata
}

// ============================================================================
// StatevectorEstimator
// ============================================================================

/// Reference estimator speaking either protocol
/// Gantree: StatevectorEstimator // 상태벡터 평가기
pub struct StatevectorEstimator {
    name: String,
    protocol: EstimatorProtocol,
    max_qubits: usize,
    default_options: EstimatorOptions,
    rng: Arc<Mutex<StdRng>>,
}

impl StatevectorEstimator {
    /// Create an estimator for the given protocol
    pub fn new(protocol: EstimatorProtocol) -> Self {
        Self {
            name: "statevector_estimator".to_string(),
            protocol,
            max_qubits: DEFAULT_MAX_QUBITS,
            default_options: EstimatorOptions::default(),
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Estimator speaking the legacy protocol
    pub fn legacy() -> Self {
        Self::new(EstimatorProtocol::Legacy)
    }

    /// Estimator speaking the bundle protocol
    pub fn bundle() -> Self {
        Self::new(EstimatorProtocol::Bundle)
    }

    /// Set default options
    pub fn with_options(mut self, options: EstimatorOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Seed the shared noise source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    /// Set the widest circuit accepted, capped at [`QUBIT_LIMIT`]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        if max_qubits > QUBIT_LIMIT {
            log::warn!(
                "max_qubits {} exceeds the statevector limit, using {}",
                max_qubits,
                QUBIT_LIMIT
            );
        }
        self.max_qubits = max_qubits.min(QUBIT_LIMIT);
        self
    }

    /// Set estimator name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Estimator name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Protocol this instance speaks
    pub fn protocol(&self) -> EstimatorProtocol {
        self.protocol
    }

    fn runner(&self, options: EstimatorOptions) -> Runner {
        Runner {
            max_qubits: self.max_qubits,
            options,
            rng: Arc::clone(&self.rng),
        }
    }
}

impl Default for StatevectorEstimator {
    fn default() -> Self {
        Self::bundle()
    }
}

impl LegacyEstimator for StatevectorEstimator {
    fn default_options(&self) -> EstimatorOptions {
        self.default_options.clone()
    }

    fn run(
        &self,
        circuits: &[ParameterizedCircuit],
        observables: &[SparsePauliOp],
        parameter_values: &[ParamVec],
        options: &EstimatorOptions,
    ) -> EstimatorResult<Job<ValueResult>> {
        if circuits.len() != observables.len() || circuits.len() != parameter_values.len() {
            return Err(EstimatorError::SubmissionFailed(format!(
                "{} circuits, {} observables, {} parameter sets",
                circuits.len(),
                observables.len(),
                parameter_values.len()
            )));
        }

        let options = self.default_options.merged_with(options);
        log::debug!("{}: submitting {} circuits ({})", self.name, circuits.len(), options);

        let entries: Vec<_> = circuits
            .iter()
            .cloned()
            .zip(observables.iter().cloned())
            .zip(parameter_values.iter().cloned())
            .map(|((c, o), v)| (c, o, v))
            .collect();
        let runner = self.runner(options);

        Ok(Job::deferred(move || {
            let estimates = runner.estimate(&entries)?;
            Ok(ValueResult {
                metadata: estimates
                    .iter()
                    .map(|&(_, std)| entry_metadata(std, &runner.options))
                    .collect(),
                values: estimates.into_iter().map(|(ev, _)| ev).collect(),
            })
        }))
    }
}

impl BundleEstimator for StatevectorEstimator {
    fn default_options(&self) -> EstimatorOptions {
        self.default_options.clone()
    }

    fn run(&self, pubs: Vec<EstimatorPub>) -> EstimatorResult<Job<Vec<PubResult>>> {
        log::debug!("{}: submitting {} PUBs", self.name, pubs.len());

        let entries: Vec<_> = pubs
            .into_iter()
            .map(|p| (p.circuit, p.observable, p.parameter_values))
            .collect();
        let runner = self.runner(self.default_options.clone());

        Ok(Job::deferred(move || {
            let estimates = runner.estimate(&entries)?;
            Ok(estimates
                .into_iter()
                .map(|(ev, std)| {
                    PubResult::new(ev, std).with_metadata(entry_metadata(std, &runner.options))
                })
                .collect())
        }))
    }
}

impl Estimator for StatevectorEstimator {
    fn capability(&self) -> Capability<'_> {
        match self.protocol {
            EstimatorProtocol::Legacy => Capability::Legacy(self),
            EstimatorProtocol::Bundle => Capability::Bundle(self),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qgrad_core::{CircuitBuilder, Parameter};

    fn exact_value(circuit: &ParameterizedCircuit, obs: &SparsePauliOp, values: &[f64]) -> f64 {
        let est = StatevectorEstimator::legacy();
        let job = LegacyEstimator::run(
            &est,
            &[circuit.clone()],
            &[obs.clone()],
            &[values.to_vec()],
            &EstimatorOptions::default(),
        )
        .unwrap();
        job.result().unwrap().values[0]
    }

    #[test]
    fn test_ry_expectations() {
        let theta = Parameter::new("theta");
        let circuit = CircuitBuilder::new(1).ry(0, &theta).build();
        let z = SparsePauliOp::from_label("Z", 1.0).unwrap();
        let x = SparsePauliOp::from_label("X", 1.0).unwrap();

        for &t in &[0.0, 0.3, 1.2, PI] {
            assert_relative_eq!(exact_value(&circuit, &z, &[t]), t.cos(), epsilon = 1e-12);
            assert_relative_eq!(exact_value(&circuit, &x, &[t]), t.sin(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rx_y_expectation() {
        let theta = Parameter::new("theta");
        let circuit = CircuitBuilder::new(1).rx(0, &theta).build();
        let y = SparsePauliOp::from_label("Y", 1.0).unwrap();
        assert_relative_eq!(exact_value(&circuit, &y, &[0.7]), -(0.7f64).sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_bell_state() {
        let circuit = CircuitBuilder::new(2).h(0).cnot(0, 1).build();
        let obs = SparsePauliOp::from_list(&[("ZZ", 1.0), ("XX", 0.5), ("ZI", 2.0)]).unwrap();
        assert_relative_eq!(exact_value(&circuit, &obs, &[]), 1.5, epsilon = 1e-12);

        let yy = SparsePauliOp::from_label("YY", 1.0).unwrap();
        assert_relative_eq!(exact_value(&circuit, &yy, &[]), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_qubit_order() {
        // X on qubit 0 only; label "IZ" measures qubit 0
        let circuit = CircuitBuilder::new(2).x(0).build();
        let z0 = SparsePauliOp::from_label("IZ", 1.0).unwrap();
        let z1 = SparsePauliOp::from_label("ZI", 1.0).unwrap();
        assert_relative_eq!(exact_value(&circuit, &z0, &[]), -1.0);
        assert_relative_eq!(exact_value(&circuit, &z1, &[]), 1.0);
    }

    #[test]
    fn test_phase_gates_commute_to_identity() {
        let circuit = CircuitBuilder::new(1).h(0).s(0).sdg(0).t(0).p(0, -PI / 4.0).h(0).build();
        let z = SparsePauliOp::from_label("Z", 1.0).unwrap();
        assert_relative_eq!(exact_value(&circuit, &z, &[]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sx_squared_is_x() {
        let circuit = CircuitBuilder::new(1).sx(0).sx(0).build();
        let z = SparsePauliOp::from_label("Z", 1.0).unwrap();
        assert_relative_eq!(exact_value(&circuit, &z, &[]), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_crz_only_when_control_set() {
        let theta = Parameter::new("theta");
        let circuit = CircuitBuilder::new(2).h(1).crz(0, 1, &theta).h(1).build();
        let z1 = SparsePauliOp::from_label("ZI", 1.0).unwrap();
        // Control is |0>, so the rotation does nothing
        assert_relative_eq!(exact_value(&circuit, &z1, &[1.0]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_legacy_length_mismatch_fails_at_submission() {
        let est = StatevectorEstimator::legacy();
        let circuit = CircuitBuilder::new(1).h(0).build();
        let err = LegacyEstimator::run(&est, &[circuit], &[], &[vec![]], &EstimatorOptions::default())
            .unwrap_err();
        assert!(err.is_submission_error());
    }

    #[test]
    fn test_width_mismatch_fails_at_completion() {
        let est = StatevectorEstimator::bundle();
        let circuit = CircuitBuilder::new(2).h(0).build();
        let obs = SparsePauliOp::from_label("Z", 1.0).unwrap();
        let job = BundleEstimator::run(&est, vec![EstimatorPub::new(circuit, obs, vec![])]).unwrap();
        assert!(matches!(job.result(), Err(EstimatorError::Core(_))));
    }

    #[test]
    fn test_too_many_qubits() {
        let est = StatevectorEstimator::bundle().with_max_qubits(2);
        let circuit = CircuitBuilder::new(3).h(0).build();
        let obs = SparsePauliOp::from_label("ZZZ", 1.0).unwrap();
        let job = BundleEstimator::run(&est, vec![EstimatorPub::new(circuit, obs, vec![])]).unwrap();
        assert!(matches!(
            job.result(),
            Err(EstimatorError::TooManyQubits { got: 3, max: 2 })
        ));
    }

    #[test]
    fn test_max_qubits_is_capped() {
        let est = StatevectorEstimator::bundle().with_max_qubits(64);
        let circuit = CircuitBuilder::new(64).h(63).build();
        let obs = SparsePauliOp::from_label(&"Z".repeat(64), 1.0).unwrap();
        let job = BundleEstimator::run(&est, vec![EstimatorPub::new(circuit, obs, vec![])]).unwrap();
        assert!(matches!(
            job.result(),
            Err(EstimatorError::TooManyQubits { got: 64, max: QUBIT_LIMIT })
        ));
    }

    #[test]
    fn test_precision_noise_is_seeded() {
        let circuit = CircuitBuilder::new(1).h(0).build();
        let obs = SparsePauliOp::from_label("Z", 1.0).unwrap();
        let options = EstimatorOptions::new().with_precision(0.1).with_seed(7);
        let est = StatevectorEstimator::legacy();

        let run = || {
            LegacyEstimator::run(&est, &[circuit.clone()], &[obs.clone()], &[vec![]], &options)
                .unwrap()
                .result()
                .unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.values, b.values);
        assert!(a.values[0] != 0.0);
        assert!(a.values[0].abs() < 1.0);
        assert_eq!(a.metadata[0]["std"], serde_json::json!(0.1));
    }

    #[test]
    fn test_bundle_uses_default_options() {
        let circuit = CircuitBuilder::new(1).build();
        let obs = SparsePauliOp::from_label("Z", 1.0).unwrap();
        let est = StatevectorEstimator::bundle()
            .with_options(EstimatorOptions::new().with_precision(0.05))
            .with_seed(3);
        let pubs = vec![EstimatorPub::new(circuit, obs, vec![]); 2];
        let results = BundleEstimator::run(&est, pubs).unwrap().result().unwrap();

        assert_eq!(results.len(), 2);
        assert_relative_eq!(results[0].stds(), 0.05);
        assert!(results[0].evs() != results[1].evs());
    }

    #[test]
    fn test_capability_follows_protocol() {
        assert_eq!(
            StatevectorEstimator::legacy().capability().protocol(),
            Some(EstimatorProtocol::Legacy)
        );
        assert_eq!(
            StatevectorEstimator::default().capability().protocol(),
            Some(EstimatorProtocol::Bundle)
        );
    }
}
