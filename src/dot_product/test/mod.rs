//! Tests for the dot product kernels.

#[cfg(test)]
mod tests {
    use crate::dot_product::*;
    use crate::error::{DotError, Operand};
    use crate::registry::KernelRegistry;
    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    fn assert_matches_reference(kernel: &dyn DotKernel, x: &[f32], y: &[f32]) {
        let expected = dot_product_reference(x, y);
        let actual = kernel.compute(x, y);
        assert!(actual.is_finite(), "{} at len {}", kernel.name(), x.len());
        assert_float_eq!(
            actual as f64,
            expected as f64,
            abs <= tolerance(magnitude(x, y)),
            "{} at len {}",
            kernel.name(),
            x.len()
        );
    }

    #[test]
    fn test_reference_basic() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [5.0, 6.0, 7.0, 8.0];
        // 1*5 + 2*6 + 3*7 + 4*8 = 5 + 12 + 21 + 32 = 70
        assert_float_eq!(dot_product_reference(&x, &y), 70.0, abs <= 1e-6);
    }

    #[test]
    fn test_twos_and_threes() {
        let x = [2.0, 2.0];
        let y = [3.0, 3.0];
        let mag = magnitude(&x, &y);
        for kernel in KernelRegistry::detect().all() {
            let z = kernel.dot_product(&x, &y, 2).unwrap();
            assert_float_eq!(z as f64, 12.0, abs <= tolerance(mag), "{}", kernel.name());
        }
        assert_eq!(dot_product(&x, &y, 2), Ok(12.0));
    }

    #[test]
    fn test_cancelling_terms() {
        let x = [1.0, 0.0, -1.0];
        let y = [1.0, 5.0, 1.0];
        for kernel in KernelRegistry::detect().all() {
            assert_eq!(kernel.dot_product(&x, &y, 3), Ok(0.0), "{}", kernel.name());
        }
        assert_eq!(dot_product(&x, &y, 3), Ok(0.0));
    }

    #[test]
    fn test_zero_length_is_zero() {
        let x = [1.5, 2.5, 3.5];
        let y = [4.0, 5.0, 6.0];
        for kernel in KernelRegistry::detect().all() {
            assert_eq!(kernel.dot_product(&x, &y, 0), Ok(0.0), "{}", kernel.name());
            assert_eq!(kernel.compute(&[], &[]), 0.0, "{}", kernel.name());
        }
        assert_eq!(dot_product(&[], &[], 0), Ok(0.0));
    }

    #[test]
    fn test_length_prefix_only() {
        let x = [1.0, 1.0, 1.0, 100.0];
        let y = [1.0, 2.0, 3.0, 100.0];
        assert_eq!(dot_product(&x, &y, 3), Ok(6.0));
    }

    #[test]
    fn test_length_past_end_is_invalid_argument() {
        let x = [1.0f32; 8];
        let y = [1.0f32; 5];

        for kernel in KernelRegistry::detect().all() {
            assert_eq!(
                kernel.dot_product(&x, &y, 6),
                Err(DotError::InvalidArgument {
                    length: 6,
                    operand: Operand::Y,
                    available: 5
                }),
                "{}",
                kernel.name()
            );
            assert_eq!(
                kernel.dot_product(&y, &x, 9),
                Err(DotError::InvalidArgument {
                    length: 9,
                    operand: Operand::X,
                    available: 5
                }),
                "{}",
                kernel.name()
            );
        }
        assert!(dot_product(&x, &y, usize::MAX).is_err());
    }

    #[test]
    #[should_panic(expected = "Vectors must have the same length")]
    fn test_compute_rejects_unequal_slices() {
        Unrolled.compute(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn test_every_length_up_to_unroll_boundaries() {
        let x: Vec<f32> = (0..130).map(|i| (i as f32 * 0.37).sin()).collect();
        let y: Vec<f32> = (0..130).map(|i| (i as f32 * 0.11).cos()).collect();
        let registry = KernelRegistry::detect();
        for len in 0..=x.len() {
            for kernel in registry.all() {
                assert_matches_reference(kernel.as_ref(), &x[..len], &y[..len]);
            }
        }
    }

    #[test]
    fn test_unaligned_subslices() {
        let x: Vec<f32> = (0..1100).map(|i| (i % 17) as f32 * 0.25).collect();
        let y: Vec<f32> = (0..1100).map(|i| (i % 5) as f32 - 2.0).collect();
        let registry = KernelRegistry::detect();
        for offset in 1..8 {
            for kernel in registry.all() {
                assert_matches_reference(kernel.as_ref(), &x[offset..1000 + offset], &y[..1000]);
            }
        }
    }

    #[test]
    fn test_fastest_kernel_metadata() {
        let fastest = KernelRegistry::fastest();
        assert!(fastest.lanes() >= 1);
        assert!(!fastest.description().is_empty());
    }

    fn vectors(max_len: usize) -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
        (0..max_len).prop_flat_map(|len| {
            (
                prop::collection::vec(-100.0f32..100.0, len),
                prop::collection::vec(-100.0f32..100.0, len),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_every_kernel_matches_reference((x, y) in vectors(600)) {
            let expected = dot_product_reference(&x, &y);
            let mag = magnitude(&x, &y);
            for kernel in KernelRegistry::detect().all() {
                let actual = kernel.compute(&x, &y);
                prop_assert!(
                    within_tolerance(actual, expected, mag),
                    "{}: expected {}, got {}", kernel.name(), expected, actual
                );
            }
        }

        #[test]
        fn prop_commutative((x, y) in vectors(600)) {
            let n = x.len();
            let xy = dot_product(&x, &y, n).unwrap();
            let yx = dot_product(&y, &x, n).unwrap();
            prop_assert!(within_tolerance(xy, yx, magnitude(&x, &y)));
        }

        #[test]
        fn prop_scaling_linear((x, y) in vectors(600), k in -10.0f32..10.0) {
            let n = x.len();
            let kx: Vec<f32> = x.iter().map(|v| k * v).collect();
            let scaled = dot_product(&kx, &y, n).unwrap();
            let expected = k * dot_product(&x, &y, n).unwrap();
            let mag = k.abs() as f64 * magnitude(&x, &y);
            prop_assert!(
                within_tolerance(scaled, expected, mag),
                "k = {}: {} vs {}", k, scaled, expected
            );
        }

        #[test]
        fn prop_zero_length_is_zero((x, y) in vectors(64)) {
            prop_assert_eq!(dot_product(&x, &y, 0).unwrap(), 0.0);
        }

        #[test]
        fn prop_overlong_length_rejected((x, y) in vectors(64), extra in 1usize..16) {
            let n = x.len() + extra;
            let is_invalid = matches!(
                dot_product(&x, &y, n),
                Err(DotError::InvalidArgument { .. })
            );
            prop_assert!(is_invalid);
        }
    }
}
