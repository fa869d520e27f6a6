//! Public solver entry points.

use tracing::debug;

use crate::config::{Method, SolverConfig};
use crate::error::SolverError;
use crate::gauss_seidel;
use crate::jacobi;
use crate::matrix::MatrixView;
use crate::result::{SolverOutput, SolverStatus};

/// Solves `A x = 0` over the view's window, normalizing the iterate to sum 1
/// after every sweep.
///
/// `x` is full-length; entries inside the window act as the initial guess
/// (seeded uniformly when they carry no mass) and receive the solution.
/// Entries outside the window are read-only context for the gather.
///
/// Running out of iterations is reported through the output status, never
/// as an error; the window then holds the best-achieved iterate.
pub fn solve_null<M: MatrixView>(
    m: &M,
    x: &mut [f64],
    cfg: &SolverConfig,
) -> Result<SolverOutput, SolverError> {
    let out = prepare(m, x, None, cfg)?;
    if let Some(out) = out {
        return Ok(out);
    }

    // Seed the window with a distribution.
    let range = m.start()..m.stop();
    let sum: f64 = x[range.clone()].iter().sum();
    if sum > 0.0 {
        for v in &mut x[range] {
            *v /= sum;
        }
    } else {
        let uniform = 1.0 / m.len() as f64;
        for v in &mut x[range] {
            *v = uniform;
        }
    }

    let out = dispatch(m, None, x, cfg, true);
    debug!(
        method = %cfg.method(),
        iterations = out.iterations(),
        converged = out.converged(),
        "null-space solve finished"
    );
    Ok(out)
}

/// Solves `A x = b` over the view's window, starting from the current
/// content of `x`.
///
/// Vector contract and non-convergence reporting match [`solve_null`].
pub fn solve_system<M: MatrixView>(
    m: &M,
    b: &[f64],
    x: &mut [f64],
    cfg: &SolverConfig,
) -> Result<SolverOutput, SolverError> {
    let out = prepare(m, x, Some(b), cfg)?;
    if let Some(out) = out {
        return Ok(out);
    }
    let out = dispatch(m, Some(b), x, cfg, false);
    debug!(
        method = %cfg.method(),
        iterations = out.iterations(),
        converged = out.converged(),
        "linear solve finished"
    );
    Ok(out)
}

/// Shared validation; `Some(output)` short-circuits empty windows.
fn prepare<M: MatrixView>(
    m: &M,
    x: &[f64],
    b: Option<&[f64]>,
    cfg: &SolverConfig,
) -> Result<Option<SolverOutput>, SolverError> {
    cfg.validate()?;
    if x.len() != m.dim() {
        return Err(SolverError::DimensionMismatch {
            expected: m.dim(),
            got: x.len(),
        });
    }
    if let Some(b) = b {
        if b.len() != m.dim() {
            return Err(SolverError::DimensionMismatch {
                expected: m.dim(),
                got: b.len(),
            });
        }
    }
    if !m.supports(cfg.method()) {
        return Err(SolverError::WrongFormat {
            method: cfg.method(),
        });
    }
    if m.is_empty() {
        return Ok(Some(SolverOutput::new(SolverStatus::Converged, 0, 0.0)));
    }
    Ok(None)
}

fn dispatch<M: MatrixView>(
    m: &M,
    b: Option<&[f64]>,
    x: &mut [f64],
    cfg: &SolverConfig,
    nullspace: bool,
) -> SolverOutput {
    match cfg.method() {
        Method::RowJacobi => {
            if cfg.float_vectors() {
                jacobi::row_jacobi::<f32, M>(m, b, x, cfg, nullspace)
            } else {
                jacobi::row_jacobi::<f64, M>(m, b, x, cfg, nullspace)
            }
        }
        Method::MatVecJacobi => jacobi::matvec_jacobi(m, b, x, cfg, nullspace),
        Method::GaussSeidel => gauss_seidel::gauss_seidel(m, b, x, cfg, nullspace),
    }
}
