//! Output type for solver calls.

/// Termination status of a solver call.
///
/// Running out of iterations is not an error: the caller still receives the
/// best-achieved iterate and precision, and may retry with a larger budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// The convergence criterion was met.
    Converged,
    /// The iteration budget ran out first.
    NoConvergence,
}

/// Result of one solver call.
#[derive(Debug, Clone, Copy)]
pub struct SolverOutput {
    status: SolverStatus,
    iterations: usize,
    precision: f64,
}

impl SolverOutput {
    pub(crate) fn new(status: SolverStatus, iterations: usize, precision: f64) -> Self {
        Self {
            status,
            iterations,
            precision,
        }
    }

    /// Returns the termination status.
    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// True when the call converged.
    pub fn converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }

    /// Returns the number of iterations performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the last measured maximum difference between iterates
    /// (infinite when no convergence check ever ran).
    pub fn precision(&self) -> f64 {
        self.precision
    }
}
