//! Error types for the perron-solver crate.

use crate::config::Method;

/// Error type for all fallible operations in the perron-solver crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SolverError {
    /// Returned when a solver configuration fails validation.
    #[error("invalid solver configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the matrix view cannot serve the requested method.
    #[error("matrix view does not support {method}")]
    WrongFormat {
        /// The unsupported method.
        method: Method,
    },

    /// Returned when a vector length disagrees with the matrix dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let e = SolverError::InvalidConfig {
            reason: "relaxation must be in (0, 2)".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid solver configuration: relaxation must be in (0, 2)"
        );
    }

    #[test]
    fn error_wrong_format() {
        let e = SolverError::WrongFormat {
            method: Method::MatVecJacobi,
        };
        assert_eq!(e.to_string(), "matrix view does not support MatVec Jacobi");
    }

    #[test]
    fn error_dimension_mismatch() {
        let e = SolverError::DimensionMismatch {
            expected: 10,
            got: 7,
        };
        assert_eq!(e.to_string(), "dimension mismatch: expected 10, got 7");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<SolverError>();
    }
}
