//! One criterion case per (kernel, working-set size).
//!
//! cargo bench --bench dot_product                      # everything
//! cargo bench --bench dot_product -- 'L2-32768/unrolled' # a single case

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use simd_dot::dot_product::bench::{seeded_inputs, WorkingSet, DEFAULT_SEED};
use simd_dot::KernelRegistry;

fn bench_dot_product(c: &mut Criterion) {
    let registry = KernelRegistry::detect();
    let mut group = c.benchmark_group("dot_product");

    for working_set in WorkingSet::defaults() {
        let inputs = seeded_inputs(DEFAULT_SEED, working_set.len);
        group.throughput(Throughput::Elements(working_set.len as u64));

        for kernel in registry.all() {
            group.bench_with_input(
                BenchmarkId::new(working_set.to_string(), kernel.name()),
                &inputs,
                |b, inputs| b.iter(|| kernel.compute(black_box(&inputs.x), black_box(&inputs.y))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_dot_product);
criterion_main!(benches);
