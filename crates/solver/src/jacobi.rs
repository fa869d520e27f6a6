//! Jacobi iterations: row-gather and matrix-vector variants.
//!
//! **Not part of the public API.**

use crate::config::SolverConfig;
use crate::matrix::{MatrixView, Scalar};
use crate::result::{SolverOutput, SolverStatus};
use crate::sweep;

/// Row Jacobi: every sweep reads a full auxiliary copy of the iterate,
/// kept in `S` (double, or single precision in low-memory mode).
pub(crate) fn row_jacobi<S: Scalar, M: MatrixView>(
    m: &M,
    b: Option<&[f64]>,
    x: &mut [f64],
    cfg: &SolverConfig,
    nullspace: bool,
) -> SolverOutput {
    let (start, stop) = (m.start(), m.stop());
    let omega = cfg.relaxation();
    let mut old: Vec<S> = x.iter().map(|&v| S::from_f64(v)).collect();
    let mut new: Vec<S> = old.clone();

    let mut status = SolverStatus::NoConvergence;
    let mut achieved = f64::INFINITY;
    let mut iterations = 0;

    for iter in 1..=cfg.max_iters() {
        iterations = iter;
        for row in start..stop {
            let oldv = old[row].to_f64();
            let val = if m.one_over_diag(row) == 0.0 {
                oldv
            } else {
                let bi = b.map_or(0.0, |b| b[row]);
                sweep::blend(omega, m.solve_row(row, &old, bi), oldv)
            };
            new[row] = S::from_f64(val);
        }
        if nullspace {
            sweep::normalize(&mut new, start..stop);
        }
        if iter >= cfg.min_iters() {
            achieved = sweep::max_diff(
                &new,
                &old,
                start..stop,
                cfg.use_relative(),
                cfg.precision(),
                iter < cfg.max_iters(),
            );
            if achieved < cfg.precision() {
                status = SolverStatus::Converged;
                break;
            }
        }
        std::mem::swap(&mut old, &mut new);
    }

    // On a break the freshest iterate is `new`; after a swap it is `old`.
    let latest = if status == SolverStatus::Converged {
        &new
    } else {
        &old
    };
    for row in start..stop {
        x[row] = latest[row].to_f64();
    }
    SolverOutput::new(status, iterations, achieved)
}

/// MatVec Jacobi: one sparse matrix-vector product per iteration, then a
/// division by the diagonal.
pub(crate) fn matvec_jacobi<M: MatrixView>(
    m: &M,
    b: Option<&[f64]>,
    x: &mut [f64],
    cfg: &SolverConfig,
    nullspace: bool,
) -> SolverOutput {
    let (start, stop) = (m.start(), m.stop());
    let omega = cfg.relaxation();
    let mut cur = x.to_vec();
    let mut nxt = x.to_vec();

    let mut status = SolverStatus::NoConvergence;
    let mut achieved = f64::INFINITY;
    let mut iterations = 0;

    for iter in 1..=cfg.max_iters() {
        iterations = iter;
        for v in &mut nxt[start..stop] {
            *v = 0.0;
        }
        m.mat_vec(&cur, &mut nxt);
        for row in start..stop {
            let ood = m.one_over_diag(row);
            let oldv = cur[row];
            nxt[row] = if ood == 0.0 {
                oldv
            } else {
                let bi = b.map_or(0.0, |b| b[row]);
                sweep::blend(omega, ood * (nxt[row] - bi), oldv)
            };
        }
        if nullspace {
            sweep::normalize(&mut nxt, start..stop);
        }
        if iter >= cfg.min_iters() {
            achieved = sweep::max_diff(
                &nxt,
                &cur,
                start..stop,
                cfg.use_relative(),
                cfg.precision(),
                iter < cfg.max_iters(),
            );
            if achieved < cfg.precision() {
                status = SolverStatus::Converged;
                break;
            }
        }
        std::mem::swap(&mut cur, &mut nxt);
    }

    let latest = if status == SolverStatus::Converged {
        &nxt
    } else {
        &cur
    };
    x[start..stop].copy_from_slice(&latest[start..stop]);
    SolverOutput::new(status, iterations, achieved)
}
