//! x86_64 AVX2 + FMA SIMD implementation.
//!
//! Six 256-bit accumulators are kept in flight so the FMA latency is hidden
//! behind independent chains: 48 f32 values per main-loop iteration, then an
//! 8-wide cleanup loop, then a scalar tail. The variant is selected at run
//! time, so the binary still runs on CPUs without AVX2.

use std::arch::x86_64::*;
use std::sync::OnceLock;

use super::x86_64_sse2::hsum_ps;
use super::DotKernel;

const UNROLL: usize = 6;
const LANES: usize = 8;
const BLOCK: usize = UNROLL * LANES;

/// # Safety
/// The CPU must support AVX2 and FMA, and `x.len() == y.len()`.
#[target_feature(enable = "avx2,fma")]
unsafe fn dot_avx2_fma(x: &[f32], y: &[f32]) -> f32 {
    let len = x.len();
    let px = x.as_ptr();
    let py = y.as_ptr();

    let mut acc = [_mm256_setzero_ps(); UNROLL];

    let blocks = len / BLOCK;
    for i in 0..blocks {
        let base = i * BLOCK;
        for (k, acc_k) in acc.iter_mut().enumerate() {
            let off = base + k * LANES;
            let xv = _mm256_loadu_ps(px.add(off));
            let yv = _mm256_loadu_ps(py.add(off));
            *acc_k = _mm256_fmadd_ps(xv, yv, *acc_k);
        }
    }

    let mut idx = blocks * BLOCK;
    while idx + LANES <= len {
        let xv = _mm256_loadu_ps(px.add(idx));
        let yv = _mm256_loadu_ps(py.add(idx));
        acc[0] = _mm256_fmadd_ps(xv, yv, acc[0]);
        idx += LANES;
    }

    // Pairwise reduction of the accumulators
    let s01 = _mm256_add_ps(acc[0], acc[1]);
    let s23 = _mm256_add_ps(acc[2], acc[3]);
    let s45 = _mm256_add_ps(acc[4], acc[5]);
    let sum = _mm256_add_ps(_mm256_add_ps(s01, s23), s45);

    let lo = _mm256_castps256_ps128(sum);
    let hi = _mm256_extractf128_ps(sum, 1);
    let mut result = hsum_ps(_mm_add_ps(lo, hi));

    while idx < len {
        result = (*px.add(idx)).mul_add(*py.add(idx), result);
        idx += 1;
    }

    result
}

/// Both features detected once per process
fn avx2_fma_detected() -> bool {
    static DETECTED: OnceLock<bool> = OnceLock::new();
    *DETECTED.get_or_init(|| is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma"))
}

/// 256-bit AVX2 + FMA variant
#[derive(Clone, Copy, Debug, Default)]
pub struct X86_64Avx2Fma;

impl DotKernel for X86_64Avx2Fma {
    fn name(&self) -> &'static str {
        "x86_64-avx2-fma"
    }

    fn description(&self) -> &'static str {
        "x86_64 with AVX2 + FMA intrinsics, 6 accumulators"
    }

    fn lanes(&self) -> usize {
        LANES
    }

    fn is_available(&self) -> bool {
        avx2_fma_detected()
    }

    fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");

        if avx2_fma_detected() {
            // SAFETY: features checked above, lengths asserted equal.
            unsafe { dot_avx2_fma(x, y) }
        } else {
            super::dot_product_unrolled(x, y)
        }
    }
}
