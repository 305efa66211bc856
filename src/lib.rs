//! # simd-dot
//!
//! Single-precision dot product kernels (scalar, unrolled, SSE2, AVX2+FMA,
//! NEON and an optional C build) behind one [`DotKernel`] contract, plus a
//! harness measuring their throughput at L1, L2 and L3 resident sizes.
//!
//! ```
//! let x = vec![1.0, 0.0, -1.0];
//! let y = vec![1.0, 5.0, 1.0];
//! assert_eq!(simd_dot::dot_product(&x, &y, 3).unwrap(), 0.0);
//! ```

pub mod dot_product;
pub mod error;
pub mod registry;
pub mod utils;

pub use dot_product::{dot_product, DotKernel};
pub use error::{DotError, Result};
pub use registry::KernelRegistry;

/// Re-export tui from utils
pub use utils::tui;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::dot_product::bench::{run_case, run_suite, BenchConfig, CaseResult, SizeReport, WorkingSet};
    pub use crate::dot_product::{dot_product, DotKernel};
    pub use crate::error::{DotError, Result};
    pub use crate::registry::KernelRegistry;
}
