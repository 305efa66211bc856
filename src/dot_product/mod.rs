//! # Dot Product Kernel
//!
//! The dot product computes the sum of products of corresponding elements in
//! two vectors:
//!
//! `dot(x, y) = Σ(x[i] * y[i])`
//!
//! ## Optimization Strategies
//!
//! - **Loop unrolling**: several independent accumulators per iteration
//! - **SIMD**: SSE2, AVX2 and NEON process 4-8 floats per instruction
//! - **FMA**: fused multiply-add where the CPU has it
//!
//! Accumulation order differs between variants, so results agree only within
//! [`within_tolerance`], never bit for bit.

pub mod bench;
pub mod code;
pub mod test;

pub use code::*;

use crate::error::Result;
use crate::registry::KernelRegistry;

/// Relative tolerance against the magnitude of the summed terms
pub const RELATIVE_TOLERANCE: f64 = 1e-4;

/// Absolute floor, so that sums of vanishing terms still compare equal
pub const ABSOLUTE_TOLERANCE: f64 = 1e-6;

/// Compute the dot product of the first `length` elements of `x` and `y`
/// with the fastest kernel the running CPU supports.
///
/// Fails with [`DotError::InvalidArgument`](crate::error::DotError::InvalidArgument)
/// when `length` exceeds either input; never reads past the end.
///
/// # Example
/// ```
/// let x = [2.0, 2.0];
/// let y = [3.0, 3.0];
/// assert_eq!(simd_dot::dot_product(&x, &y, 2).unwrap(), 12.0);
/// assert!(simd_dot::dot_product(&x, &y, 3).is_err());
/// ```
pub fn dot_product(x: &[f32], y: &[f32], length: usize) -> Result<f32> {
    KernelRegistry::fastest().dot_product(x, y, length)
}

/// `Σ|x[i] * y[i]|` in f64, the scale that accumulation error grows with.
pub fn magnitude(x: &[f32], y: &[f32]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(&a, &b)| (a as f64 * b as f64).abs())
        .sum()
}

/// Allowed deviation from the reference for a sum of terms of this magnitude.
pub fn tolerance(magnitude: f64) -> f64 {
    RELATIVE_TOLERANCE * magnitude + ABSOLUTE_TOLERANCE
}

/// Whether `actual` matches `expected` within the kernel contract.
pub fn within_tolerance(actual: f32, expected: f32, magnitude: f64) -> bool {
    actual.is_finite() && (actual as f64 - expected as f64).abs() <= tolerance(magnitude)
}
