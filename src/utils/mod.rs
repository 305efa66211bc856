//! Utility modules for benchmarking and reporting.

pub mod cpu_affinity;
pub mod logging;
pub mod timer;
pub mod tui;

// Re-export commonly used items
pub use cpu_affinity::CpuPinGuard;
pub use timer::{calculate_median, measure_variants, PinStrategy, TimingConfig, Variant, VariantResult};
