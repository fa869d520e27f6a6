//! Configuration for the iterative solver family.

use crate::error::SolverError;

/// The iterative method to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Jacobi reading a full auxiliary copy of the iterate, row by row.
    RowJacobi,
    /// Jacobi as one sparse matrix-vector product per iteration.
    MatVecJacobi,
    /// In-place sweep; each row sees the values updated before it.
    GaussSeidel,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::RowJacobi => "Row Jacobi",
            Method::MatVecJacobi => "MatVec Jacobi",
            Method::GaussSeidel => "Gauss-Seidel",
        };
        f.write_str(name)
    }
}

/// Configuration for one solver call.
///
/// Immutable per call; there is no process-wide option table. Use the
/// builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use perron_solver::{Method, SolverConfig};
///
/// let config = SolverConfig::new()
///     .with_method(Method::GaussSeidel)
///     .with_relaxation(1.2)
///     .with_precision(1e-8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    method: Method,
    relaxation: f64,
    precision: f64,
    min_iters: usize,
    max_iters: usize,
    use_relative: bool,
    float_vectors: bool,
}

impl SolverConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `method = GaussSeidel`, `relaxation = 1.0`,
    /// `precision = 1e-10`, `min_iters = 1`, `max_iters = 10_000`,
    /// `use_relative = false`, `float_vectors = false`.
    pub fn new() -> Self {
        Self {
            method: Method::GaussSeidel,
            relaxation: 1.0,
            precision: 1e-10,
            min_iters: 1,
            max_iters: 10_000,
            use_relative: false,
            float_vectors: false,
        }
    }

    /// Sets the iterative method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the over-relaxation factor (must end up in the open
    /// interval (0, 2)).
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Sets the convergence threshold (must end up in (0, 1)).
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the iteration below which convergence is not checked.
    pub fn with_min_iters(mut self, min_iters: usize) -> Self {
        self.min_iters = min_iters;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Switches the convergence test to relative differences.
    pub fn with_use_relative(mut self, use_relative: bool) -> Self {
        self.use_relative = use_relative;
        self
    }

    /// Stores the Row Jacobi auxiliary iterate in single precision.
    pub fn with_float_vectors(mut self, float_vectors: bool) -> Self {
        self.float_vectors = float_vectors;
        self
    }

    // --- Accessors ---

    /// Returns the iterative method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the over-relaxation factor.
    pub fn relaxation(&self) -> f64 {
        self.relaxation
    }

    /// Returns the convergence threshold.
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Returns the minimum number of iterations before convergence checks.
    pub fn min_iters(&self) -> usize {
        self.min_iters
    }

    /// Returns the iteration budget.
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// True when convergence uses relative differences.
    pub fn use_relative(&self) -> bool {
        self.use_relative
    }

    /// True when the Row Jacobi auxiliary copy is single precision.
    pub fn float_vectors(&self) -> bool {
        self.float_vectors
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.relaxation.is_finite() || self.relaxation <= 0.0 || self.relaxation >= 2.0 {
            return Err(SolverError::InvalidConfig {
                reason: format!("relaxation must be in (0, 2), got {}", self.relaxation),
            });
        }
        if !self.precision.is_finite() || self.precision <= 0.0 || self.precision >= 1.0 {
            return Err(SolverError::InvalidConfig {
                reason: format!("precision must be in (0, 1), got {}", self.precision),
            });
        }
        if self.max_iters == 0 {
            return Err(SolverError::InvalidConfig {
                reason: "max_iters must be at least 1".to_string(),
            });
        }
        if self.min_iters > self.max_iters {
            return Err(SolverError::InvalidConfig {
                reason: format!(
                    "min_iters ({}) exceeds max_iters ({})",
                    self.min_iters, self.max_iters
                ),
            });
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
