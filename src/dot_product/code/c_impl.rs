//! FFI binding for the natively compiled C kernel.
//!
//! `build.rs` compiles `dot_product.c` and sets `c_kernel_active` when a
//! suitable compiler was found; otherwise the variant is never registered.

#[cfg(c_kernel_active)]
mod ffi {
    use libc::size_t;
    use std::os::raw::c_float;

    extern "C" {
        pub fn simd_dot_c_unrolled(x: *const c_float, y: *const c_float, len: size_t) -> c_float;
    }
}

use super::DotKernel;

/// Check if the C kernel was compiled in
#[cfg(c_kernel_active)]
pub const C_IMPL_AVAILABLE: bool = true;

#[cfg(not(c_kernel_active))]
pub const C_IMPL_AVAILABLE: bool = false;

/// C compiler name detected at build time
pub const C_COMPILER_NAME: Option<&str> = option_env!("C_COMPILER_NAME");

/// C unrolled variant
#[derive(Clone, Copy, Debug, Default)]
pub struct CUnrolled;

impl DotKernel for CUnrolled {
    fn name(&self) -> &'static str {
        "c-unrolled"
    }

    fn description(&self) -> &'static str {
        "C with 4 accumulators, built by the host C compiler"
    }

    fn is_available(&self) -> bool {
        C_IMPL_AVAILABLE
    }

    #[cfg(c_kernel_active)]
    fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        // SAFETY: the C side reads exactly `len` elements from each pointer.
        unsafe { ffi::simd_dot_c_unrolled(x.as_ptr(), y.as_ptr(), x.len()) }
    }

    #[cfg(not(c_kernel_active))]
    fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
        super::dot_product_unrolled(x, y)
    }
}
