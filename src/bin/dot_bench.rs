//! Benchmark CLI for the dot product kernels.
//!
//! Usage:
//!   dot-bench                          # All kernels at the L1/L2/L3 sizes
//!   dot-bench --list                   # List available kernels
//!   dot-bench --verify                 # Check every kernel against the reference
//!   dot-bench --kernel reference --kernel x86_64-avx2-fma --sizes 4096
//!   dot-bench --format csv > runs.csv

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use simd_dot::dot_product::bench::{run_suite, BenchConfig, DEFAULT_SEED, DEFAULT_SIZES};
use simd_dot::utils::{logging, tui, PinStrategy, TimingConfig};
use simd_dot::KernelRegistry;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Csv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pin {
    Off,
    Global,
    PerSample,
}

impl From<Pin> for PinStrategy {
    fn from(pin: Pin) -> Self {
        match pin {
            Pin::Off => PinStrategy::Off,
            Pin::Global => PinStrategy::Global,
            Pin::PerSample => PinStrategy::PerSample,
        }
    }
}

/// Measure dot product kernels against the scalar reference loop.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// List available kernels and exit
    #[arg(short, long)]
    list: bool,

    /// Verify every kernel against the reference and exit
    #[arg(long)]
    verify: bool,

    /// Kernel to run (repeatable); all available kernels by default
    #[arg(short, long = "kernel", value_name = "NAME")]
    kernels: Vec<String>,

    /// Comma-separated vector sizes
    #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    sizes: Vec<usize>,

    /// Seed for input generation and sample order
    #[arg(long, env = "DOT_BENCH_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Timed batches per kernel and size
    #[arg(long, default_value_t = 20)]
    samples: usize,

    /// Minimum duration of one timed batch, in milliseconds
    #[arg(long, default_value_t = 10)]
    target_ms: u64,

    /// Untimed calls before calibration
    #[arg(long, default_value_t = 10)]
    warmup: u64,

    /// CPU pinning during measurement
    #[arg(long, value_enum, default_value_t = Pin::Global)]
    pin: Pin,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn bench_config(&self) -> BenchConfig {
        BenchConfig {
            sizes: self.sizes.clone(),
            seed: self.seed,
            timing: TimingConfig {
                samples: self.samples,
                warmup_iterations: self.warmup,
                target_sample_time: Duration::from_millis(self.target_ms),
                pin_strategy: self.pin.into(),
                ..TimingConfig::default()
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let registry = KernelRegistry::detect();

    if args.list {
        tui::print_available_kernels(&registry);
        return Ok(());
    }

    if args.verify {
        registry.verify().context("kernel verification failed")?;
        println!("All {} kernels agree with the reference.", registry.len());
        return Ok(());
    }

    let kernels = registry.select(&args.kernels).with_context(|| {
        format!("available kernels: {}", registry.list_names().join(", "))
    })?;
    let config = args.bench_config();
    info!(?config, "configuration");

    if matches!(args.format, Format::Table) {
        tui::print_header();
    }

    let reports = run_suite(&kernels, &config)?;

    match args.format {
        Format::Table => tui::print_reports(&reports),
        Format::Csv => print!("{}", tui::render_csv(&reports)),
    }

    Ok(())
}
