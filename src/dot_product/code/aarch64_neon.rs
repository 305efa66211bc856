//! aarch64 NEON SIMD implementation.
//!
//! NEON is mandatory on aarch64. Four 128-bit FMA accumulators process
//! 16 f32 values per iteration.

use std::arch::aarch64::*;

use super::DotKernel;

/// Compute the dot product using NEON intrinsics.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_aarch64_neon(x: &[f32], y: &[f32]) -> f32 {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");

    let len = x.len();
    let chunks = len / 16;

    // SAFETY: NEON is baseline on aarch64, and every load reads
    // `idx..idx + 16` with `idx + 16 <= chunks * 16 <= len` for both slices.
    let mut result = unsafe {
        let mut acc0 = vdupq_n_f32(0.0);
        let mut acc1 = vdupq_n_f32(0.0);
        let mut acc2 = vdupq_n_f32(0.0);
        let mut acc3 = vdupq_n_f32(0.0);
        let px = x.as_ptr();
        let py = y.as_ptr();

        for i in 0..chunks {
            let idx = i * 16;
            acc0 = vfmaq_f32(acc0, vld1q_f32(px.add(idx)), vld1q_f32(py.add(idx)));
            acc1 = vfmaq_f32(acc1, vld1q_f32(px.add(idx + 4)), vld1q_f32(py.add(idx + 4)));
            acc2 = vfmaq_f32(acc2, vld1q_f32(px.add(idx + 8)), vld1q_f32(py.add(idx + 8)));
            acc3 = vfmaq_f32(acc3, vld1q_f32(px.add(idx + 12)), vld1q_f32(py.add(idx + 12)));
        }

        vaddvq_f32(vaddq_f32(vaddq_f32(acc0, acc1), vaddq_f32(acc2, acc3)))
    };

    let base = chunks * 16;
    for (a, b) in x[base..].iter().zip(&y[base..]) {
        result += a * b;
    }

    result
}

/// 128-bit NEON variant
#[derive(Clone, Copy, Debug, Default)]
pub struct Aarch64Neon;

impl DotKernel for Aarch64Neon {
    fn name(&self) -> &'static str {
        "aarch64-neon"
    }

    fn description(&self) -> &'static str {
        "aarch64 with NEON FMA intrinsics, 4 accumulators"
    }

    fn lanes(&self) -> usize {
        4
    }

    fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
        dot_product_aarch64_neon(x, y)
    }
}
