//! Minimal demo: one kernel call on constant-filled vectors.

use simd_dot::{dot_product, KernelRegistry};

fn main() -> anyhow::Result<()> {
    simd_dot::utils::logging::init(0);

    let x = vec![2.0f32; 2048];
    let y = vec![3.0f32; x.len()];

    let z = dot_product(&x, &y, x.len())?;

    println!("hello world");
    println!("z = {} ({})", z, KernelRegistry::fastest().name());
    Ok(())
}
