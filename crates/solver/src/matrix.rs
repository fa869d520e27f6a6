//! Read-only matrix views over a frozen graph.

use std::ops::Range;

use perron_graph::FrozenGraph;

use crate::config::Method;
use crate::error::SolverError;

/// Element type of the auxiliary iterate (double, or single precision when
/// the caller trades accuracy for memory).
pub trait Scalar: Copy {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl Scalar for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Scalar for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

/// A read-only equation system `A x = b` restricted to a row window.
///
/// Vectors passed to a view are always full-length (indexed by global state
/// id); only entries inside `[start, stop)` are read or written, and matrix
/// entries whose column falls outside the window are skipped. The diagonal
/// is carried separately as `one_over_diag`, the negated reciprocal of
/// `A[i][i]`, with 0.0 standing in for an empty diagonal.
pub trait MatrixView {
    /// First row of the window.
    fn start(&self) -> usize;

    /// One past the last row of the window.
    fn stop(&self) -> usize;

    /// Dimension of the backing matrix (full vector length).
    fn dim(&self) -> usize;

    /// Number of rows in the window.
    fn len(&self) -> usize {
        self.stop() - self.start()
    }

    /// True when the window is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Negated reciprocal diagonal of a row; 0.0 when the diagonal is empty.
    fn one_over_diag(&self, row: usize) -> f64;

    /// True when this view can serve the given method.
    fn supports(&self, method: Method) -> bool;

    /// Computes the full update value for one row:
    /// `one_over_diag(row) * (sum of off-diagonal entries times x - b)`.
    ///
    /// Only meaningful on views that support gathering (Row Jacobi,
    /// Gauss-Seidel); behaviour is unspecified otherwise.
    fn solve_row<S: Scalar>(&self, row: usize, x: &[S], b: f64) -> f64;

    /// Accumulates the off-diagonal product into `y` (scatter). `y` entries
    /// inside the window must be zeroed by the caller beforehand.
    ///
    /// Only meaningful on views that support scattering (MatVec Jacobi).
    fn mat_vec(&self, x: &[f64], y: &mut [f64]);
}

fn check_window(
    graph: &FrozenGraph,
    window: &Range<usize>,
    one_over_diag: &[f64],
) -> Result<(), SolverError> {
    if one_over_diag.len() != graph.num_nodes() {
        return Err(SolverError::DimensionMismatch {
            expected: graph.num_nodes(),
            got: one_over_diag.len(),
        });
    }
    if window.start > window.end || window.end > graph.num_nodes() {
        return Err(SolverError::DimensionMismatch {
            expected: graph.num_nodes(),
            got: window.end,
        });
    }
    Ok(())
}

/// Gather-oriented view: stored row `i` holds the off-diagonal entries of
/// equation row `i` (entry `(i, j)` with weight `A[i][j]`).
#[derive(Debug, Clone, Copy)]
pub struct CsrView<'a> {
    graph: &'a FrozenGraph,
    start: usize,
    stop: usize,
    one_over_diag: &'a [f64],
}

impl<'a> CsrView<'a> {
    /// Creates a view over `window`, sharing the diagonal slice with any
    /// sibling views on the same graph.
    pub fn new(
        graph: &'a FrozenGraph,
        window: Range<usize>,
        one_over_diag: &'a [f64],
    ) -> Result<Self, SolverError> {
        check_window(graph, &window, one_over_diag)?;
        Ok(Self {
            graph,
            start: window.start,
            stop: window.end,
            one_over_diag,
        })
    }
}

impl MatrixView for CsrView<'_> {
    fn start(&self) -> usize {
        self.start
    }

    fn stop(&self) -> usize {
        self.stop
    }

    fn dim(&self) -> usize {
        self.graph.num_nodes()
    }

    fn one_over_diag(&self, row: usize) -> f64 {
        self.one_over_diag[row]
    }

    fn supports(&self, method: Method) -> bool {
        matches!(method, Method::RowJacobi | Method::GaussSeidel)
    }

    fn solve_row<S: Scalar>(&self, row: usize, x: &[S], b: f64) -> f64 {
        let (cols, vals) = self.graph.row(row);
        // Columns are sorted, so the window is one contiguous slice.
        let lo = cols.partition_point(|&c| c < self.start);
        let hi = cols.partition_point(|&c| c < self.stop);
        let mut sum = 0.0;
        for k in lo..hi {
            let j = cols[k];
            if j != row {
                sum += vals[k] * x[j].to_f64();
            }
        }
        self.one_over_diag[row] * (sum - b)
    }

    fn mat_vec(&self, _x: &[f64], _y: &mut [f64]) {
        debug_assert!(false, "CsrView cannot scatter");
    }
}

/// Scatter-oriented view: stored row `j` holds column `j` of the equation
/// system (entry `(j, i)` with weight `A[i][j]`).
#[derive(Debug, Clone, Copy)]
pub struct CscView<'a> {
    graph: &'a FrozenGraph,
    start: usize,
    stop: usize,
    one_over_diag: &'a [f64],
}

impl<'a> CscView<'a> {
    /// Creates a view over `window`, sharing the diagonal slice with any
    /// sibling views on the same graph.
    pub fn new(
        graph: &'a FrozenGraph,
        window: Range<usize>,
        one_over_diag: &'a [f64],
    ) -> Result<Self, SolverError> {
        check_window(graph, &window, one_over_diag)?;
        Ok(Self {
            graph,
            start: window.start,
            stop: window.end,
            one_over_diag,
        })
    }
}

impl MatrixView for CscView<'_> {
    fn start(&self) -> usize {
        self.start
    }

    fn stop(&self) -> usize {
        self.stop
    }

    fn dim(&self) -> usize {
        self.graph.num_nodes()
    }

    fn one_over_diag(&self, row: usize) -> f64 {
        self.one_over_diag[row]
    }

    fn supports(&self, method: Method) -> bool {
        matches!(method, Method::MatVecJacobi)
    }

    fn solve_row<S: Scalar>(&self, _row: usize, _x: &[S], _b: f64) -> f64 {
        debug_assert!(false, "CscView cannot gather");
        0.0
    }

    fn mat_vec(&self, x: &[f64], y: &mut [f64]) {
        for j in self.start..self.stop {
            let xj = x[j];
            if xj == 0.0 {
                continue;
            }
            let (rows, vals) = self.graph.row(j);
            let lo = rows.partition_point(|&i| i < self.start);
            let hi = rows.partition_point(|&i| i < self.stop);
            for k in lo..hi {
                let i = rows[k];
                if i != j {
                    y[i] += vals[k] * xj;
                }
            }
        }
    }
}
