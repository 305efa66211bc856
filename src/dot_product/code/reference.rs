//! Reference implementation of the dot product.
//!
//! A plain accumulate-in-a-loop implementation. It is the baseline for
//! performance comparison and the correctness oracle every other variant is
//! checked against.

use super::DotKernel;

/// Compute the dot product of two vectors, left to right, one element at a time.
///
/// # Panics
/// Panics if the vectors have different lengths.
///
/// # Example
/// ```
/// use simd_dot::dot_product::dot_product_reference;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [4.0, 5.0, 6.0];
/// assert_eq!(dot_product_reference(&x, &y), 32.0);
/// ```
pub fn dot_product_reference(x: &[f32], y: &[f32]) -> f32 {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");

    let mut sum = 0.0f32;
    for (a, b) in x.iter().zip(y) {
        sum += a * b;
    }
    sum
}

/// Scalar loop baseline
#[derive(Clone, Copy, Debug, Default)]
pub struct Reference;

impl DotKernel for Reference {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn description(&self) -> &'static str {
        "Scalar accumulate-in-a-loop baseline"
    }

    fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
        dot_product_reference(x, y)
    }
}
