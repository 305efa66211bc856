//! Build script to compile the C dot-product kernel.

use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(c_kernel_active)");
    println!("cargo:rerun-if-changed=build.rs");

    if env::var_os("CARGO_FEATURE_C_KERNEL").is_none() {
        return;
    }

    let compiler = match cc::Build::new().try_get_compiler() {
        Ok(compiler) => compiler,
        Err(e) => {
            println!("cargo:warning=No C compiler found ({e}). C kernel disabled.");
            return;
        }
    };

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let compiler_name = if compiler.is_like_clang() {
        if target_os != "macos" {
            // Vanilla Clang shares Rust's LLVM backend, so the comparison says nothing.
            println!("cargo:warning=Vanilla Clang detected. C kernel disabled (requires GCC, MSVC, or Apple Clang).");
            return;
        }
        "Apple Clang"
    } else if compiler.is_like_gnu() {
        "GCC"
    } else if compiler.is_like_msvc() {
        "MSVC"
    } else {
        println!("cargo:warning=C compiler is not compatible (needs GCC, Apple Clang, or MSVC). C kernel disabled.");
        return;
    };

    let rustflags = env::var("RUSTFLAGS").unwrap_or_default();
    let encoded_rustflags = env::var("CARGO_ENCODED_RUSTFLAGS").unwrap_or_default();
    let is_rust_native =
        rustflags.contains("target-cpu=native") || encoded_rustflags.contains("target-cpu=native");

    let mut build = cc::Build::new();

    let c_files = match glob::glob("src/**/*.c") {
        Ok(paths) => paths.filter_map(Result::ok).collect::<Vec<_>>(),
        Err(e) => {
            println!("cargo:warning=Bad glob pattern ({e}). C kernel disabled.");
            return;
        }
    };
    if c_files.is_empty() {
        return;
    }
    for file in &c_files {
        println!("cargo:rerun-if-changed={}", file.display());
        build.file(file);
    }

    // Reassociation is within the kernel's tolerance contract.
    build.opt_level(3).flag_if_supported("-ffast-math");

    if is_rust_native {
        build.flag_if_supported("-march=native");
    }

    if let Err(e) = build.try_compile("simd_dot_c") {
        println!("cargo:warning=C kernel failed to compile ({e}). C kernel disabled.");
        return;
    }

    println!("cargo:rustc-cfg=c_kernel_active");
    println!("cargo:rustc-env=C_COMPILER_NAME={compiler_name}");
}
