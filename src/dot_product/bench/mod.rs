//! Benchmark harness for the dot product kernels.
//!
//! For each working-set size the harness generates one pair of seeded input
//! vectors, then times every selected kernel on them with the adaptive
//! batch protocol from [`crate::utils::timer`]. Input generation and
//! calibration stay outside the timed region.

use std::fmt;
use std::hint::black_box;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::code::DotKernel;
use crate::error::{DotError, Result};
use crate::utils::timer::{batch, measure_variants, TimingConfig, Variant, VariantResult};

/// L1, L2 and L3 resident sizes for two f32 vectors
pub const DEFAULT_SIZES: [usize; 3] = [4096, 32768, 262144];

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 42;

const L1_BYTES: usize = 32 << 10;
const L2_BYTES: usize = 1 << 20;
const L3_BYTES: usize = 32 << 20;

/// Cache level the two input vectors of a case fit in
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CacheLevel {
    L1,
    L2,
    L3,
    Dram,
}

impl CacheLevel {
    /// Classify by the footprint of two `len`-element f32 vectors.
    pub fn for_len(len: usize) -> Self {
        let bytes = len.saturating_mul(2 * std::mem::size_of::<f32>());
        if bytes <= L1_BYTES {
            CacheLevel::L1
        } else if bytes <= L2_BYTES {
            CacheLevel::L2
        } else if bytes <= L3_BYTES {
            CacheLevel::L3
        } else {
            CacheLevel::Dram
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CacheLevel::L1 => "L1",
            CacheLevel::L2 => "L2",
            CacheLevel::L3 => "L3",
            CacheLevel::Dram => "DRAM",
        };
        f.write_str(s)
    }
}

/// A vector length together with the cache level it targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkingSet {
    pub len: usize,
    pub level: CacheLevel,
}

impl WorkingSet {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            level: CacheLevel::for_len(len),
        }
    }

    /// The L1/L2/L3 defaults
    pub fn defaults() -> Vec<Self> {
        DEFAULT_SIZES.iter().map(|&len| Self::new(len)).collect()
    }

    /// Bytes touched by one call: both input vectors
    pub fn bytes(&self) -> usize {
        self.len * 2 * std::mem::size_of::<f32>()
    }
}

impl fmt::Display for WorkingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.level, self.len)
    }
}

/// Harness configuration
#[derive(Clone, Debug)]
pub struct BenchConfig {
    /// Vector lengths to benchmark
    pub sizes: Vec<usize>,
    /// Seed for input generation and sample scheduling
    pub seed: u64,
    pub timing: TimingConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            seed: DEFAULT_SEED,
            timing: TimingConfig::default(),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(DotError::InvalidConfig("no sizes given".into()));
        }
        if self.sizes.contains(&0) {
            return Err(DotError::InvalidConfig("sizes must be positive".into()));
        }
        if self.timing.samples == 0 {
            return Err(DotError::InvalidConfig("samples must be positive".into()));
        }
        if self.timing.target_sample_time.is_zero() {
            return Err(DotError::InvalidConfig("target sample time must be positive".into()));
        }
        Ok(())
    }

    pub fn working_sets(&self) -> Vec<WorkingSet> {
        self.sizes.iter().map(|&len| WorkingSet::new(len)).collect()
    }
}

/// Read-only input vectors for one size
#[derive(Clone, Debug)]
pub struct Inputs {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

impl Inputs {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Fill two `len`-element vectors with values in `[0, 1)`, drawing `x` and
/// `y` elements alternately from `rng`.
pub fn generate_inputs<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Inputs {
    let mut x = Vec::with_capacity(len);
    let mut y = Vec::with_capacity(len);
    for _ in 0..len {
        x.push(rng.random::<f32>());
        y.push(rng.random::<f32>());
    }
    Inputs { x, y }
}

/// Inputs for `len` from a generator seeded with `seed` alone, so a size's
/// data does not depend on which other sizes ran before it.
pub fn seeded_inputs(seed: u64, len: usize) -> Inputs {
    generate_inputs(&mut StdRng::seed_from_u64(seed), len)
}

/// Measured outcome of one (kernel, size) case
#[derive(Clone, Debug)]
pub struct CaseResult {
    pub kernel: &'static str,
    pub description: &'static str,
    pub working_set: WorkingSet,
    pub timing: VariantResult,
    /// Value the kernel returned
    pub result: f32,
}

impl CaseResult {
    fn new(working_set: WorkingSet, timing: VariantResult) -> Self {
        Self {
            kernel: timing.name,
            description: timing.description,
            working_set,
            result: timing.result_sample as f32,
            timing,
        }
    }

    /// Median time per call, never below one nanosecond
    pub fn time_per_call_ns(&self) -> f64 {
        if self.timing.median_ns.is_finite() {
            self.timing.median_ns.max(1.0)
        } else {
            1.0
        }
    }

    pub fn calls_per_sec(&self) -> f64 {
        1e9 / self.time_per_call_ns()
    }

    /// Throughput in vector elements per second
    pub fn elements_per_sec(&self) -> f64 {
        self.working_set.len as f64 * self.calls_per_sec()
    }

    /// Input bandwidth in bytes per second
    pub fn bytes_per_sec(&self) -> f64 {
        self.working_set.bytes() as f64 * self.calls_per_sec()
    }

    /// How many times faster than `baseline` this case ran
    pub fn speedup_over(&self, baseline: &CaseResult) -> f64 {
        baseline.time_per_call_ns() / self.time_per_call_ns()
    }
}

/// All cases of one working-set size
#[derive(Clone, Debug)]
pub struct SizeReport {
    pub working_set: WorkingSet,
    pub cases: Vec<CaseResult>,
}

impl SizeReport {
    /// The reference case if it ran, otherwise the first one
    pub fn baseline(&self) -> Option<&CaseResult> {
        self.cases
            .iter()
            .find(|c| c.kernel == "reference")
            .or_else(|| self.cases.first())
    }

    pub fn find(&self, kernel: &str) -> Option<&CaseResult> {
        self.cases.iter().find(|c| c.kernel == kernel)
    }
}

fn variant_for<'a>(kernel: &'a dyn DotKernel, inputs: &'a Inputs) -> Variant<'a> {
    let (x, y) = (inputs.x.as_slice(), inputs.y.as_slice());
    Variant {
        name: kernel.name(),
        description: kernel.description(),
        run: batch(move || kernel.compute(black_box(x), black_box(y)) as f64),
    }
}

/// Run a single (kernel, size) case on prepared inputs.
pub fn run_case(kernel: &dyn DotKernel, inputs: &Inputs, config: &BenchConfig) -> Result<CaseResult> {
    if config.timing.samples == 0 || config.timing.target_sample_time.is_zero() {
        return Err(DotError::InvalidConfig("samples and target sample time must be positive".into()));
    }
    DotError::check_length(inputs.x.len(), inputs.y.len(), inputs.x.len().max(inputs.y.len()))?;
    if inputs.is_empty() {
        return Err(DotError::InvalidConfig("sizes must be positive".into()));
    }
    let working_set = WorkingSet::new(inputs.len());
    let mut schedule = StdRng::seed_from_u64(config.seed);
    let case = measure_variants(vec![variant_for(kernel, inputs)], &config.timing, &mut schedule)
        .into_iter()
        .next()
        .map(|t| CaseResult::new(working_set, t))
        .ok_or_else(|| DotError::InvalidConfig(format!("no measurement for '{}'", kernel.name())))?;
    log_case(&case);
    Ok(case)
}

/// Run every kernel on one size, with samples of all kernels interleaved.
pub fn run_size(kernels: &[&dyn DotKernel], working_set: WorkingSet, config: &BenchConfig) -> SizeReport {
    let inputs = seeded_inputs(config.seed, working_set.len);
    debug!(%working_set, bytes = working_set.bytes(), "generated inputs");

    let variants = kernels.iter().map(|&k| variant_for(k, &inputs)).collect();
    let mut schedule = StdRng::seed_from_u64(config.seed ^ working_set.len as u64);
    let cases: Vec<CaseResult> = measure_variants(variants, &config.timing, &mut schedule)
        .into_iter()
        .map(|t| CaseResult::new(working_set, t))
        .collect();

    for case in &cases {
        log_case(case);
    }

    SizeReport { working_set, cases }
}

/// Run every (kernel, size) case of `config`.
pub fn run_suite(kernels: &[&dyn DotKernel], config: &BenchConfig) -> Result<Vec<SizeReport>> {
    config.validate()?;
    if kernels.is_empty() {
        return Err(DotError::InvalidConfig("no kernels selected".into()));
    }

    info!(
        kernels = kernels.len(),
        sizes = ?config.sizes,
        seed = config.seed,
        "starting benchmark suite"
    );

    Ok(config
        .working_sets()
        .into_iter()
        .map(|ws| run_size(kernels, ws, config))
        .collect())
}

fn log_case(case: &CaseResult) {
    info!(
        kernel = case.kernel,
        size = case.working_set.len,
        level = %case.working_set.level,
        iterations = case.timing.iterations,
        median_ns = case.timing.median_ns,
        melem_per_sec = case.elements_per_sec() / 1e6,
        "case finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot_product::{Reference, Unrolled};
    use crate::error::Operand;
    use float_eq::assert_float_eq;
    use crate::registry::KernelRegistry;
    use crate::utils::timer::PinStrategy;
    use std::time::Duration;

    fn quick_config(sizes: Vec<usize>) -> BenchConfig {
        BenchConfig {
            sizes,
            seed: DEFAULT_SEED,
            timing: TimingConfig {
                samples: 3,
                warmup_iterations: 1,
                target_sample_time: Duration::from_millis(1),
                max_iterations: 1 << 16,
                pin_strategy: PinStrategy::Off,
            },
        }
    }

    #[test]
    fn test_default_sizes_span_cache_levels() {
        let levels: Vec<_> = WorkingSet::defaults().iter().map(|ws| ws.level).collect();
        assert_eq!(levels, vec![CacheLevel::L1, CacheLevel::L2, CacheLevel::L3]);
        assert_eq!(CacheLevel::for_len(16 << 20), CacheLevel::Dram);
        assert_eq!(WorkingSet::new(4096).to_string(), "L1-4096");
    }

    #[test]
    fn test_inputs_are_deterministic_and_in_unit_interval() {
        let a = seeded_inputs(7, 1000);
        let b = seeded_inputs(7, 1000);
        let c = seeded_inputs(8, 1000);

        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
        assert_ne!(a.x, c.x);
        assert_ne!(a.x, a.y);
        assert!(a.x.iter().chain(&a.y).all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_generate_inputs_uses_injected_rng() {
        let mut rng = StdRng::seed_from_u64(3);
        let first = generate_inputs(&mut rng, 16);
        let second = generate_inputs(&mut rng, 16);
        assert_ne!(first.x, second.x);
        assert!(generate_inputs(&mut rng, 0).is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(BenchConfig::default().validate().is_ok());
        assert!(quick_config(vec![]).validate().is_err());
        assert!(quick_config(vec![16, 0]).validate().is_err());

        let mut cfg = quick_config(vec![16]);
        cfg.timing.samples = 0;
        assert!(matches!(cfg.validate(), Err(DotError::InvalidConfig(_))));
    }

    #[test]
    fn test_run_case_reports_result_and_throughput() {
        let config = quick_config(vec![64]);
        let inputs = Inputs {
            x: vec![2.0; 64],
            y: vec![3.0; 64],
        };
        let case = run_case(&Unrolled, &inputs, &config).unwrap();
        assert_eq!(case.kernel, "unrolled");
        assert_eq!(case.result, 384.0);
        assert_eq!(case.timing.samples, 3);
        assert!(case.elements_per_sec().is_finite());
        assert!(case.elements_per_sec() > 0.0);

        let mut broken = config.clone();
        broken.timing.samples = 0;
        assert!(run_case(&Unrolled, &inputs, &broken).is_err());
    }

    #[test]
    fn test_run_case_rejects_mismatched_inputs() {
        let config = quick_config(vec![8]);
        let inputs = Inputs {
            x: vec![1.0; 8],
            y: vec![1.0; 4],
        };
        assert_eq!(
            run_case(&Unrolled, &inputs, &config).err(),
            Some(DotError::InvalidArgument {
                length: 8,
                operand: Operand::Y,
                available: 4
            })
        );

        let swapped = Inputs {
            x: inputs.y.clone(),
            y: inputs.x.clone(),
        };
        assert!(matches!(
            run_case(&Unrolled, &swapped, &config),
            Err(DotError::InvalidArgument { operand: Operand::X, .. })
        ));
    }

    #[test]
    fn test_run_case_rejects_empty_inputs() {
        let config = quick_config(vec![8]);
        let inputs = Inputs { x: vec![], y: vec![] };
        assert!(matches!(
            run_case(&Unrolled, &inputs, &config),
            Err(DotError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_suite_covers_default_sizes_for_every_kernel() {
        let registry = KernelRegistry::detect();
        let kernels = registry.select(&[]).unwrap();
        let config = quick_config(DEFAULT_SIZES.to_vec());

        let reports = run_suite(&kernels, &config).unwrap();
        assert_eq!(reports.len(), DEFAULT_SIZES.len());

        for (report, &size) in reports.iter().zip(DEFAULT_SIZES.iter()) {
            assert_eq!(report.working_set.len, size);
            assert_eq!(report.cases.len(), kernels.len());

            let baseline = report.baseline().unwrap();
            assert_eq!(baseline.kernel, "reference");

            for case in &report.cases {
                let throughput = case.elements_per_sec();
                assert!(throughput.is_finite() && throughput > 0.0, "{}: {}", case.kernel, throughput);
                assert!(case.speedup_over(baseline) > 0.0);
                let tolerance = crate::dot_product::tolerance(size as f64);
                assert_float_eq!(
                    case.result as f64,
                    baseline.result as f64,
                    abs <= tolerance,
                    "{} at {}",
                    case.kernel,
                    size
                );
            }
        }
    }

    #[test]
    fn test_run_suite_rejects_empty_kernel_list() {
        let config = quick_config(vec![16]);
        assert!(run_suite(&[], &config).is_err());

        let reference: [&dyn DotKernel; 1] = [&Reference];
        let reports = run_suite(&reference, &config).unwrap();
        assert_eq!(reports[0].find("reference").map(|c| c.result), reports[0].baseline().map(|c| c.result));
    }
}
