use perron_solver::SolverOutput;

/// Combined outcome of the linear solves behind an analysis call.
///
/// A reducible steady-state query may run one solve per recurrent class plus
/// one over the transient block; the report aggregates them, so `converged`
/// is only true when every constituent solve converged.
#[derive(Debug, Clone, Copy)]
pub struct SolveReport {
    converged: bool,
    iterations: usize,
    precision: f64,
}

impl SolveReport {
    /// A report for an analysis that needed no iteration at all.
    pub(crate) fn trivial() -> Self {
        SolveReport {
            converged: true,
            iterations: 0,
            precision: 0.0,
        }
    }

    /// Folds another solve into the report.
    pub(crate) fn absorb(&mut self, out: &SolverOutput) {
        self.converged &= out.converged();
        self.iterations += out.iterations();
        self.precision = self.precision.max(out.precision());
    }

    /// Whether every constituent solve converged.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Total iterations across all constituent solves.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Worst final error estimate across all constituent solves.
    pub fn precision(&self) -> f64 {
        self.precision
    }
}

impl From<SolverOutput> for SolveReport {
    fn from(out: SolverOutput) -> Self {
        let mut report = SolveReport::trivial();
        report.absorb(&out);
        report
    }
}
