//! Gauss-Seidel sweeps with successive over-relaxation.
//!
//! **Not part of the public API.**

use crate::config::SolverConfig;
use crate::matrix::MatrixView;
use crate::result::{SolverOutput, SolverStatus};
use crate::sweep;

/// In-place sweep: each row update immediately feeds the rows after it, so
/// no auxiliary iterate is needed. Sweep order makes the result order
/// dependent, which is fine for the fixed points solved here.
pub(crate) fn gauss_seidel<M: MatrixView>(
    m: &M,
    b: Option<&[f64]>,
    x: &mut [f64],
    cfg: &SolverConfig,
    nullspace: bool,
) -> SolverOutput {
    let (start, stop) = (m.start(), m.stop());
    let omega = cfg.relaxation();

    let mut status = SolverStatus::NoConvergence;
    let mut achieved = f64::INFINITY;
    let mut iterations = 0;

    for iter in 1..=cfg.max_iters() {
        iterations = iter;
        let check = iter >= cfg.min_iters();
        let mut maxerr = 0.0f64;
        for row in start..stop {
            let oldv = x[row];
            let val = if m.one_over_diag(row) == 0.0 {
                oldv
            } else {
                let bi = b.map_or(0.0, |b| b[row]);
                sweep::blend(omega, m.solve_row(row, x, bi), oldv)
            };
            if check {
                maxerr = maxerr.max(sweep::diff(val, oldv, cfg.use_relative()));
            }
            x[row] = val;
        }
        if nullspace {
            sweep::normalize(x, start..stop);
        }
        if check {
            achieved = maxerr;
            if maxerr < cfg.precision() {
                status = SolverStatus::Converged;
                break;
            }
        }
    }

    SolverOutput::new(status, iterations, achieved)
}
