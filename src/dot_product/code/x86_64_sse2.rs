//! x86_64 SSE2 SIMD implementation.
//!
//! SSE2 is part of the x86_64 baseline, so this variant needs no run-time
//! detection. Two 128-bit accumulators process 8 f32 values per iteration.

use std::arch::x86_64::*;

use super::DotKernel;

/// Horizontal sum of the four lanes of a 128-bit register, SSE2 only.
#[inline(always)]
pub(super) unsafe fn hsum_ps(v: __m128) -> f32 {
    // v = [a, b, c, d]
    let hi = _mm_movehl_ps(v, v); // [c, d, c, d]
    let pairs = _mm_add_ps(v, hi); // [a+c, b+d, _, _]
    let odd = _mm_shuffle_ps(pairs, pairs, 0b0000_0001); // [b+d, _, _, _]
    _mm_cvtss_f32(_mm_add_ss(pairs, odd))
}

/// Compute the dot product using SSE2 SIMD instructions.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_x86_64_sse2(x: &[f32], y: &[f32]) -> f32 {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");

    let len = x.len();
    if len < 8 {
        return x.iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let chunks = len / 8;

    // SAFETY: SSE2 is always present on x86_64, and every load reads
    // `idx..idx + 8` with `idx + 8 <= chunks * 8 <= len` for both slices.
    let mut result = unsafe {
        let mut acc0 = _mm_setzero_ps();
        let mut acc1 = _mm_setzero_ps();
        let px = x.as_ptr();
        let py = y.as_ptr();

        for i in 0..chunks {
            let idx = i * 8;
            let x0 = _mm_loadu_ps(px.add(idx));
            let y0 = _mm_loadu_ps(py.add(idx));
            let x1 = _mm_loadu_ps(px.add(idx + 4));
            let y1 = _mm_loadu_ps(py.add(idx + 4));
            acc0 = _mm_add_ps(acc0, _mm_mul_ps(x0, y0));
            acc1 = _mm_add_ps(acc1, _mm_mul_ps(x1, y1));
        }

        hsum_ps(_mm_add_ps(acc0, acc1))
    };

    let base = chunks * 8;
    for (a, b) in x[base..].iter().zip(&y[base..]) {
        result += a * b;
    }

    result
}

/// 128-bit SSE2 variant
#[derive(Clone, Copy, Debug, Default)]
pub struct X86_64Sse2;

impl DotKernel for X86_64Sse2 {
    fn name(&self) -> &'static str {
        "x86_64-sse2"
    }

    fn description(&self) -> &'static str {
        "x86_64 with SSE2 SIMD intrinsics, 2 accumulators"
    }

    fn lanes(&self) -> usize {
        4
    }

    fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
        dot_product_x86_64_sse2(x, y)
    }
}
