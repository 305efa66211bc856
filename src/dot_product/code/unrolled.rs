//! Portable scalar implementation with loop unrolling.
//!
//! Four independent accumulators break the dependency chain on a single sum,
//! letting the CPU keep several multiply-adds in flight. `chunks_exact` lets
//! the compiler drop the per-element bounds checks.

use super::DotKernel;

/// Compute the dot product with 4x loop unrolling.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_unrolled(x: &[f32], y: &[f32]) -> f32 {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");

    let x_chunks = x.chunks_exact(4);
    let y_chunks = y.chunks_exact(4);
    let x_tail = x_chunks.remainder();
    let y_tail = y_chunks.remainder();

    let mut acc = [0.0f32; 4];
    for (a, b) in x_chunks.zip(y_chunks) {
        acc[0] += a[0] * b[0];
        acc[1] += a[1] * b[1];
        acc[2] += a[2] * b[2];
        acc[3] += a[3] * b[3];
    }

    for (a, b) in x_tail.iter().zip(y_tail) {
        acc[0] += a * b;
    }

    (acc[0] + acc[1]) + (acc[2] + acc[3])
}

/// Unrolled portable scalar variant
#[derive(Clone, Copy, Debug, Default)]
pub struct Unrolled;

impl DotKernel for Unrolled {
    fn name(&self) -> &'static str {
        "unrolled"
    }

    fn description(&self) -> &'static str {
        "Portable scalar, 4 independent accumulators"
    }

    fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
        dot_product_unrolled(x, y)
    }
}
