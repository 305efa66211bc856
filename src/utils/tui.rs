//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI: a results table per working-set
//! size, or CSV rows for external analysis.

use std::fmt::Write as _;

use terminal_size::{terminal_size, Width};

use crate::dot_product::bench::{CaseResult, SizeReport};
use crate::dot_product::C_COMPILER_NAME;
use crate::registry::KernelRegistry;

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Variant name, with the compiler appended for the C kernel
fn display_name(case: &CaseResult) -> String {
    match (case.kernel.starts_with("c-"), C_COMPILER_NAME) {
        (true, Some(compiler)) => format!("{} ({})", case.kernel, compiler),
        _ => case.kernel.to_string(),
    }
}

/// Format nanoseconds with a readable unit
pub fn format_nanos(ns: f64) -> String {
    if ns >= 1e9 {
        format!("{:.2} s", ns / 1e9)
    } else if ns >= 1e6 {
        format!("{:.2} ms", ns / 1e6)
    } else if ns >= 1e3 {
        format!("{:.2} µs", ns / 1e3)
    } else {
        format!("{:.1} ns", ns)
    }
}

/// Format a rate with an SI prefix
pub fn format_rate(per_sec: f64) -> String {
    if per_sec >= 1e9 {
        format!("{:.2} G/s", per_sec / 1e9)
    } else if per_sec >= 1e6 {
        format!("{:.2} M/s", per_sec / 1e6)
    } else if per_sec >= 1e3 {
        format!("{:.2} K/s", per_sec / 1e3)
    } else {
        format!("{:.2} /s", per_sec)
    }
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " SIMD Dot Product Benchmarks ";
    let padding = term_width.saturating_sub(title.len()) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!("║{}{}{}║", " ".repeat(padding), title, " ".repeat(right_padding));
    println!("╚{}╝", border);
    println!();
}

/// Print the list of available kernels
pub fn print_available_kernels(registry: &KernelRegistry) {
    let fastest = KernelRegistry::fastest().name();
    println!("Available kernels:");
    println!();
    for kernel in registry.all() {
        let marker = if kernel.name() == fastest { "*" } else { " " };
        println!(
            " {}{:<18} [{} lane{}] - {}",
            marker,
            kernel.name(),
            kernel.lanes(),
            if kernel.lanes() == 1 { "" } else { "s" },
            kernel.description()
        );
    }
    println!();
    println!("  * selected by dot_product()");
}

/// Render the results table for one size
pub fn render_size_report(report: &SizeReport) -> String {
    let mut out = String::new();
    let Some(baseline) = report.baseline() else {
        return out;
    };

    let term_width = get_term_width();
    let fixed_width = 74;
    let variant_col_width = term_width.saturating_sub(fixed_width).max(15);
    let table_width = variant_col_width + fixed_width - 4;

    let ws = report.working_set;
    let _ = writeln!(
        out,
        "  {} working set: {} elements ({} KiB)",
        ws.level,
        ws.len,
        ws.bytes() / 1024
    );
    let _ = writeln!(out, "  {}", "─".repeat(table_width));
    let _ = writeln!(
        out,
        "  {:<v_width$} {:>11} {:>11} {:>11} {:>12} {:>8} {:>7} {:>9}",
        "Variant",
        "Median",
        "Min",
        "Max",
        "Elements",
        "Speedup",
        "CV",
        "Rel. Err",
        v_width = variant_col_width
    );
    let _ = writeln!(out, "  {}", "─".repeat(table_width));

    for case in &report.cases {
        let base = baseline.result as f64;
        let diff = (case.result as f64 - base).abs();
        let relative_error = if base.abs() > 1e-9 { diff / base.abs() } else { diff };

        let _ = writeln!(
            out,
            "  {:<v_width$} {:>11} {:>11} {:>11} {:>12} {:>7.2}x {:>6.2}% {:>9.2e}",
            truncate(&display_name(case), variant_col_width),
            format_nanos(case.timing.median_ns),
            format_nanos(case.timing.min_ns),
            format_nanos(case.timing.max_ns),
            format_rate(case.elements_per_sec()),
            case.speedup_over(baseline),
            case.timing.cv() * 100.0,
            relative_error,
            v_width = variant_col_width
        );
    }
    out
}

/// Print results tables for every size
pub fn print_reports(reports: &[SizeReport]) {
    for report in reports {
        println!("{}", render_size_report(report));
    }
    println!("Note: Speedup is relative to the 'reference' variant when it ran.");
}

/// Render all cases as CSV, header included
pub fn render_csv(reports: &[SizeReport]) -> String {
    let mut out = String::from(
        "variant,compiler,cache_level,size,iterations,samples,median_ns,mean_ns,min_ns,max_ns,std_dev_ns,elements_per_sec,result\n",
    );
    for report in reports {
        for case in &report.cases {
            let compiler = if case.kernel.starts_with("c-") {
                C_COMPILER_NAME.unwrap_or("Unknown")
            } else {
                ""
            };
            let t = &case.timing;
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.0},{}",
                case.kernel,
                compiler,
                case.working_set.level,
                case.working_set.len,
                t.iterations,
                t.samples,
                t.median_ns,
                t.mean_ns,
                t.min_ns,
                t.max_ns,
                t.std_dev_ns,
                case.elements_per_sec(),
                case.result
            );
        }
    }
    out
}
