//! Dot product implementations.
//!
//! This module contains all implementation variants of the dot product kernel.
//! Every variant is a stateless unit struct implementing [`DotKernel`].

mod c_impl;
mod reference;
mod unrolled;

#[cfg(target_arch = "aarch64")]
mod aarch64_neon;
#[cfg(target_arch = "x86_64")]
mod x86_64_avx2_fma;
#[cfg(target_arch = "x86_64")]
mod x86_64_sse2;

pub use c_impl::{CUnrolled, C_COMPILER_NAME, C_IMPL_AVAILABLE};
pub use reference::{dot_product_reference, Reference};
pub use unrolled::{dot_product_unrolled, Unrolled};

#[cfg(target_arch = "aarch64")]
pub use aarch64_neon::Aarch64Neon;
#[cfg(target_arch = "x86_64")]
pub use x86_64_avx2_fma::X86_64Avx2Fma;
#[cfg(target_arch = "x86_64")]
pub use x86_64_sse2::X86_64Sse2;

use crate::error::{DotError, Result};

/// The single capability every dot product variant provides.
///
/// Implementations hold no state, so one instance may be shared freely
/// across threads.
pub trait DotKernel: Send + Sync {
    /// Unique identifier for this variant (e.g., "reference", "x86_64-avx2-fma")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Number of f32 lanes processed per instruction (1 for scalar code)
    fn lanes(&self) -> usize {
        1
    }

    /// Whether the running CPU can execute this variant
    fn is_available(&self) -> bool {
        true
    }

    /// Compute `Σ x[i] * y[i]` over two equal-length slices.
    ///
    /// # Panics
    /// Panics if the slices have different lengths.
    fn compute(&self, x: &[f32], y: &[f32]) -> f32;

    /// Compute the dot product of the first `length` elements of `x` and `y`.
    ///
    /// Returns [`DotError::InvalidArgument`] when `length` exceeds either
    /// slice. A `length` of zero yields `0.0`.
    fn dot_product(&self, x: &[f32], y: &[f32], length: usize) -> Result<f32> {
        DotError::check_length(x.len(), y.len(), length)?;
        Ok(self.compute(&x[..length], &y[..length]))
    }
}

/// All variants compiled for this target, available on this CPU or not,
/// in baseline-first order.
pub fn compiled_variants() -> Vec<Box<dyn DotKernel>> {
    let mut variants: Vec<Box<dyn DotKernel>> = vec![Box::new(Reference), Box::new(Unrolled)];

    #[cfg(target_arch = "x86_64")]
    {
        variants.push(Box::new(X86_64Sse2));
        variants.push(Box::new(X86_64Avx2Fma));
    }

    #[cfg(target_arch = "aarch64")]
    variants.push(Box::new(Aarch64Neon));

    if C_IMPL_AVAILABLE {
        variants.push(Box::new(CUnrolled));
    }

    variants
}
