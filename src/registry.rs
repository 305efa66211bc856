//! Kernel registry for variant discovery, selection and cross-validation.
//!
//! The registry only holds variants the running CPU can execute. It is also
//! the correctness oracle: [`KernelRegistry::verify`] checks every variant
//! against the reference loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::dot_product::{self, compiled_variants, DotKernel, Reference};
use crate::error::{DotError, Result};

/// Sizes used by [`KernelRegistry::verify`]: empty, shorter than one SIMD
/// register, around every unroll boundary, and one odd large size.
pub const VERIFY_SIZES: [usize; 14] = [0, 1, 3, 4, 7, 8, 15, 16, 47, 48, 49, 97, 1023, 4101];

/// Seed for the verification inputs
pub const VERIFY_SEED: u64 = 0x5EED_D07;

/// Set of available kernel variants
pub struct KernelRegistry {
    kernels: Vec<Box<dyn DotKernel>>,
}

impl KernelRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            kernels: Vec::new(),
        }
    }

    /// Registry of every compiled variant the running CPU supports
    pub fn detect() -> Self {
        let mut registry = Self::new();
        for kernel in compiled_variants() {
            registry.register_boxed(kernel);
        }
        registry
    }

    /// Register a variant; variants the CPU cannot run are skipped.
    pub fn register<K: DotKernel + 'static>(&mut self, kernel: K) {
        self.register_boxed(Box::new(kernel));
    }

    pub fn register_boxed(&mut self, kernel: Box<dyn DotKernel>) {
        if !kernel.is_available() {
            debug!(kernel = kernel.name(), "skipping variant unsupported on this CPU");
            return;
        }
        if self.find(kernel.name()).is_some() {
            debug!(kernel = kernel.name(), "variant already registered");
            return;
        }
        debug!(kernel = kernel.name(), lanes = kernel.lanes(), "registered variant");
        self.kernels.push(kernel);
    }

    /// Get all registered variants
    pub fn all(&self) -> &[Box<dyn DotKernel>] {
        &self.kernels
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Find variant by name
    pub fn find(&self, name: &str) -> Option<&dyn DotKernel> {
        self.kernels
            .iter()
            .find(|k| k.name() == name)
            .map(|k| k.as_ref())
    }

    /// List variant names
    pub fn list_names(&self) -> Vec<&'static str> {
        self.kernels.iter().map(|k| k.name()).collect()
    }

    /// Variants matching `names`, in registry order. An empty filter selects
    /// every variant.
    pub fn select(&self, names: &[String]) -> Result<Vec<&dyn DotKernel>> {
        if let Some(unknown) = names.iter().find(|n| self.find(n).is_none()) {
            return Err(DotError::UnknownKernel(unknown.clone()));
        }
        Ok(self
            .kernels
            .iter()
            .filter(|k| names.is_empty() || names.iter().any(|n| n == k.name()))
            .map(|k| k.as_ref())
            .collect())
    }

    /// The fastest variant the running CPU supports.
    pub fn fastest() -> &'static dyn DotKernel {
        #[cfg(target_arch = "x86_64")]
        {
            use crate::dot_product::{X86_64Avx2Fma, X86_64Sse2};

            let kernel: &'static dyn DotKernel = if X86_64Avx2Fma.is_available() {
                &X86_64Avx2Fma
            } else {
                &X86_64Sse2
            };
            kernel
        }

        #[cfg(target_arch = "aarch64")]
        {
            &crate::dot_product::Aarch64Neon
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            &crate::dot_product::Unrolled
        }
    }

    /// Verify every variant against the reference on seeded inputs in [-1, 1).
    pub fn verify(&self) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(VERIFY_SEED);
        for &len in &VERIFY_SIZES {
            let x: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect();
            let y: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect();
            self.verify_on(&x, &y)?;
        }
        Ok(())
    }

    /// Verify every variant against the reference on equal-length inputs.
    pub fn verify_on(&self, x: &[f32], y: &[f32]) -> Result<()> {
        let len = x.len().max(y.len());
        DotError::check_length(x.len(), y.len(), len)?;

        let expected = Reference.compute(x, y);
        let magnitude = dot_product::magnitude(x, y);

        for kernel in &self.kernels {
            let actual = kernel.compute(x, y);
            if !dot_product::within_tolerance(actual, expected, magnitude) {
                return Err(DotError::NumericToleranceViolation {
                    kernel: kernel.name(),
                    len,
                    expected,
                    actual,
                    tolerance: dot_product::tolerance(magnitude),
                });
            }
        }
        debug!(len, variants = self.kernels.len(), "all variants within tolerance");
        Ok(())
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot_product::Unrolled;
    use crate::error::Operand;

    /// Deliberately wrong kernel to exercise the oracle
    struct OffByOne;

    impl DotKernel for OffByOne {
        fn name(&self) -> &'static str {
            "off-by-one"
        }

        fn description(&self) -> &'static str {
            "Adds one to the true result"
        }

        fn compute(&self, x: &[f32], y: &[f32]) -> f32 {
            Reference.compute(x, y) + 1.0
        }
    }

    struct Unavailable;

    impl DotKernel for Unavailable {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn description(&self) -> &'static str {
            "Never available"
        }

        fn is_available(&self) -> bool {
            false
        }

        fn compute(&self, _x: &[f32], _y: &[f32]) -> f32 {
            unreachable!()
        }
    }

    #[test]
    fn test_detect_starts_with_reference() {
        let registry = KernelRegistry::detect();
        let names = registry.list_names();
        assert_eq!(names[0], "reference");
        assert!(names.contains(&"unrolled"));
        #[cfg(target_arch = "x86_64")]
        assert!(names.contains(&"x86_64-sse2"));
        #[cfg(target_arch = "aarch64")]
        assert!(names.contains(&"aarch64-neon"));
    }

    #[test]
    fn test_all_variants_verify() {
        let registry = KernelRegistry::detect();
        if let Err(e) = registry.verify() {
            panic!("verification failed: {}", e);
        }
    }

    #[test]
    fn test_verify_flags_wrong_kernel() {
        let mut registry = KernelRegistry::new();
        registry.register(Reference);
        registry.register(OffByOne);

        match registry.verify() {
            Err(DotError::NumericToleranceViolation { kernel, len, .. }) => {
                assert_eq!(kernel, "off-by-one");
                assert_eq!(len, 0);
            }
            other => panic!("expected tolerance violation, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_on_rejects_unequal_inputs() {
        let registry = KernelRegistry::detect();
        assert_eq!(
            registry.verify_on(&[1.0; 6], &[1.0; 4]),
            Err(DotError::InvalidArgument {
                length: 6,
                operand: Operand::Y,
                available: 4
            })
        );
        assert!(registry.verify_on(&[1.0; 4], &[2.0; 4]).is_ok());
    }

    #[test]
    fn test_register_skips_unavailable_and_duplicates() {
        let mut registry = KernelRegistry::new();
        registry.register(Unavailable);
        registry.register(Unrolled);
        registry.register(Unrolled);
        assert_eq!(registry.list_names(), vec!["unrolled"]);
    }

    #[test]
    fn test_select() {
        let registry = KernelRegistry::detect();

        let all = registry.select(&[]).unwrap();
        assert_eq!(all.len(), registry.len());

        let some = registry
            .select(&["unrolled".to_string(), "reference".to_string()])
            .unwrap();
        let names: Vec<_> = some.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["reference", "unrolled"]);

        assert_eq!(
            registry.select(&["nope".to_string()]).err(),
            Some(DotError::UnknownKernel("nope".to_string()))
        );
    }

    #[test]
    fn test_fastest_is_registered() {
        let registry = KernelRegistry::detect();
        let fastest = KernelRegistry::fastest();
        assert!(fastest.is_available());
        assert!(registry.find(fastest.name()).is_some());
    }
}
