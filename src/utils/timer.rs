//! Timing system for the kernel benchmarks.
//!
//! This module provides:
//! - Adaptive iteration counts: a batch grows until it runs long enough to
//!   be measured reliably
//! - Optional CPU core pinning for stable measurements
//! - Randomized, seeded sample order across variants to avoid ordering bias

use std::hint::black_box;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::cpu_affinity::CpuPinGuard;

// ============================================================================
// Configuration
// ============================================================================

/// CPU pinning strategy during measurements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Leave scheduling to the OS
    Off,
    /// Pin once before all measurements of a size
    #[default]
    Global,
    /// Pin/unpin around every sample
    PerSample,
}

/// Configuration for timing measurements
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Number of timed batches per variant (default: 20)
    pub samples: usize,
    /// Untimed calls before calibration (default: 10)
    pub warmup_iterations: u64,
    /// Minimum duration of one timed batch (default: 10 ms)
    pub target_sample_time: Duration,
    /// Upper bound on calls per batch
    pub max_iterations: u64,
    /// CPU pinning strategy (default: Global)
    pub pin_strategy: PinStrategy,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            samples: 20,
            warmup_iterations: 10,
            target_sample_time: Duration::from_millis(10),
            max_iterations: 1 << 26,
            pin_strategy: PinStrategy::default(),
        }
    }
}

/// A batch runner: performs `iterations` calls and returns the elapsed time
/// together with the last result.
pub type BatchFn<'a> = Box<dyn FnMut(u64) -> (Duration, f64) + 'a>;

/// A variant to be measured
pub struct Variant<'a> {
    /// Unique name of the variant
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Timing happens inside the closure so dispatch stays out of the timed region.
    pub run: BatchFn<'a>,
}

/// Build a batch runner around a single call.
pub fn batch<'a, F>(mut call: F) -> BatchFn<'a>
where
    F: FnMut() -> f64 + 'a,
{
    Box::new(move |iterations| {
        let mut last = 0.0;
        let start = Instant::now();
        for _ in 0..iterations {
            last = black_box(call());
        }
        (start.elapsed(), last)
    })
}

/// Result from measuring a single variant. Times are per call, in nanoseconds.
#[derive(Clone, Debug)]
pub struct VariantResult {
    pub name: &'static str,
    pub description: &'static str,
    /// Calls per timed batch
    pub iterations: u64,
    /// Number of timed batches
    pub samples: usize,
    pub mean_ns: f64,
    pub median_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
    pub std_dev_ns: f64,
    /// Last value returned by the variant
    pub result_sample: f64,
}

impl VariantResult {
    /// Coefficient of variation of the per-call time
    pub fn cv(&self) -> f64 {
        if self.mean_ns > 0.0 {
            self.std_dev_ns / self.mean_ns
        } else {
            0.0
        }
    }
}

// ============================================================================
// Measurement
// ============================================================================

/// Find a batch size whose run time reaches `config.target_sample_time`.
///
/// Grows like Go's `testing.B`: predict from the last batch with 20 %
/// headroom, at least doubling and at most a 100x jump per step.
pub fn calibrate(run: &mut BatchFn<'_>, config: &TimingConfig) -> u64 {
    let target = config.target_sample_time.as_nanos().max(1) as f64;
    let max = config.max_iterations.max(1);
    let mut iterations: u64 = 1;

    loop {
        let (elapsed, _) = run(iterations);
        if elapsed >= config.target_sample_time {
            return iterations;
        }
        if iterations >= max {
            warn!(iterations, ?elapsed, "calibration hit the iteration cap");
            return iterations;
        }

        let elapsed_ns = elapsed.as_nanos().max(1) as f64;
        let predicted = (iterations as f64 * target / elapsed_ns * 1.2) as u64;
        iterations = predicted
            .max(iterations.saturating_mul(2))
            .min(iterations.saturating_mul(100))
            .min(max);
    }
}

/// Measure multiple variants with randomized execution order.
///
/// 1. Warms up and calibrates every variant
/// 2. Shuffles a schedule of `(variant, sample)` tasks with `rng`
/// 3. Times each task, pinned according to `config.pin_strategy`
pub fn measure_variants<R: Rng + ?Sized>(
    mut variants: Vec<Variant<'_>>,
    config: &TimingConfig,
    rng: &mut R,
) -> Vec<VariantResult> {
    if variants.is_empty() {
        return Vec::new();
    }

    let samples = config.samples.max(1);

    let _global_pin = (config.pin_strategy == PinStrategy::Global).then(CpuPinGuard::new);

    let iterations: Vec<u64> = variants
        .iter_mut()
        .map(|variant| {
            black_box((variant.run)(config.warmup_iterations));
            let n = calibrate(&mut variant.run, config);
            debug!(variant = variant.name, iterations = n, "calibrated");
            n
        })
        .collect();

    let mut tasks: Vec<usize> = (0..variants.len())
        .flat_map(|v| std::iter::repeat(v).take(samples))
        .collect();
    tasks.shuffle(rng);

    let mut per_call_ns: Vec<Vec<f64>> = (0..variants.len())
        .map(|_| Vec::with_capacity(samples))
        .collect();
    let mut result_samples = vec![0.0; variants.len()];

    for idx in tasks {
        let _per_sample_pin = (config.pin_strategy == PinStrategy::PerSample).then(CpuPinGuard::new);
        let variant = &mut variants[idx];
        let (elapsed, result) = (variant.run)(iterations[idx]);
        per_call_ns[idx].push(elapsed.as_nanos() as f64 / iterations[idx] as f64);
        result_samples[idx] = result;
    }

    variants
        .iter()
        .enumerate()
        .map(|(idx, variant)| {
            compute_variant_result(
                variant,
                iterations[idx],
                &mut per_call_ns[idx],
                result_samples[idx],
            )
        })
        .collect()
}

/// Compute statistics from raw per-call measurements
fn compute_variant_result(
    variant: &Variant<'_>,
    iterations: u64,
    times: &mut [f64],
    result_sample: f64,
) -> VariantResult {
    times.sort_by(|a, b| a.total_cmp(b));

    let n = times.len();
    let mean = times.iter().sum::<f64>() / n.max(1) as f64;
    let variance = times.iter().map(|t| (t - mean) * (t - mean)).sum::<f64>()
        / (n.saturating_sub(1)).max(1) as f64;

    VariantResult {
        name: variant.name,
        description: variant.description,
        iterations,
        samples: n,
        mean_ns: mean,
        median_ns: calculate_median(times),
        min_ns: times.first().copied().unwrap_or(0.0),
        max_ns: times.last().copied().unwrap_or(0.0),
        std_dev_ns: variance.sqrt(),
        result_sample,
    }
}

/// Median of an already sorted slice
pub fn calculate_median(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}
