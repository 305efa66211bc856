//! Error types for the dot-product kernels and the benchmark harness.

use std::fmt;
use thiserror::Error;

/// Which input of a dot product an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    X,
    Y,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::X => f.write_str("x"),
            Operand::Y => f.write_str("y"),
        }
    }
}

/// Crate error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DotError {
    /// Requested length exceeds the true length of an input vector
    #[error("Invalid argument: length {length} exceeds {operand} vector length {available}")]
    InvalidArgument {
        length: usize,
        operand: Operand,
        available: usize,
    },

    /// A kernel disagrees with the reference beyond the accepted tolerance.
    ///
    /// Only the verification oracle produces this; kernels never do.
    #[error(
        "Kernel '{kernel}' out of tolerance at len {len}: expected {expected}, got {actual} (tolerance {tolerance:e})"
    )]
    NumericToleranceViolation {
        kernel: &'static str,
        len: usize,
        expected: f32,
        actual: f32,
        tolerance: f64,
    },

    /// No available kernel carries this name
    #[error("Unknown kernel '{0}'")]
    UnknownKernel(String),

    /// Benchmark configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, DotError>;

impl DotError {
    /// Check `length` against both operands, reporting the first one too short.
    pub fn check_length(x_len: usize, y_len: usize, length: usize) -> Result<()> {
        if length > x_len {
            return Err(DotError::InvalidArgument {
                length,
                operand: Operand::X,
                available: x_len,
            });
        }
        if length > y_len {
            return Err(DotError::InvalidArgument {
                length,
                operand: Operand::Y,
                available: y_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_length_reports_operand() {
        assert_eq!(DotError::check_length(4, 4, 4), Ok(()));
        assert_eq!(DotError::check_length(4, 4, 0), Ok(()));
        assert_eq!(
            DotError::check_length(3, 8, 4),
            Err(DotError::InvalidArgument {
                length: 4,
                operand: Operand::X,
                available: 3
            })
        );
        assert_eq!(
            DotError::check_length(8, 2, 4),
            Err(DotError::InvalidArgument {
                length: 4,
                operand: Operand::Y,
                available: 2
            })
        );
    }

    #[test]
    fn test_display_names_operand() {
        let err = DotError::check_length(8, 2, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: length 4 exceeds y vector length 2"
        );
    }
}
