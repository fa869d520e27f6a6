//! Chain assembly: freeze, classify, renumber, and cache solver inputs.

use std::ops::Range;

use tracing::debug;

use perron_classify::{classify, verify_absorbing, Classification, Renumbering};
use perron_graph::{DynamicGraph, FrozenGraph, Orientation};
use perron_solver::{solve_null, solve_system, CscView, CsrView, Method, SolverConfig, SolverOutput};

use crate::config::{ChainConfig, TimeDomain};
use crate::error::ChainError;

/// Factor by which the uniformisation rate exceeds the largest exit rate,
/// so every state keeps a positive self-loop in the uniformised chain.
const UNIFORMIZATION_SLACK: f64 = 1.02;

/// A frozen Markov chain, ready for analysis.
///
/// States are held in classified order: transient states first, then each
/// recurrent class as a contiguous block, then absorbing states. All public
/// methods accept and return vectors in the caller's original numbering;
/// the permutation is applied and undone internally.
///
/// The transition structure is kept twice, as an outgoing (row-stored) and
/// an incoming (column-stored) graph, both with the diagonal stripped. For
/// discrete chains the stored weights are one-step probabilities; for
/// continuous chains they are rates.
#[derive(Debug, Clone)]
pub struct MarkovChain {
    time_domain: TimeDomain,
    rows: FrozenGraph,
    cols: FrozenGraph,
    one_over_diag: Vec<f64>,
    classification: Classification,
    renumbering: Renumbering,
    unif_rate: f64,
}

impl MarkovChain {
    /// Freezes a dynamic graph into an analysable chain.
    ///
    /// The pipeline compresses the graph to CSR form, classifies its states,
    /// renumbers them into class order, strips the diagonal, and, for
    /// discrete chains, normalises each row to probabilities. Rows that end
    /// up empty describe absorbing states (a discrete state with no outgoing
    /// edges keeps all mass in place).
    ///
    /// # Errors
    ///
    /// Propagates graph and classification failures; with
    /// [`ChainConfig::with_verify_absorbing`] set, also the cross-check that
    /// every state reaches some recurrent or absorbing state.
    pub fn finish(graph: DynamicGraph, config: &ChainConfig) -> Result<Self, ChainError> {
        config.validate()?;
        let frozen = graph.finish()?;
        let frozen = match frozen.orientation() {
            Orientation::RowStored => frozen,
            Orientation::ColumnStored => frozen.transpose(),
        };
        let classified = classify(&frozen)?;
        if config.verify_absorbing() {
            verify_absorbing(&classified, config.reach_scratch())?;
        }
        let (permuted, classification, renumbering) = classified.into_parts();

        let rows = strip_diagonal(&permuted, config.time_domain())?;
        let n = rows.num_nodes();
        let mut one_over_diag = vec![0.0; n];
        let mut max_exit = 0.0f64;
        for i in 0..n {
            let s = rows.row_sum(i);
            if s > 0.0 {
                one_over_diag[i] = 1.0 / s;
            }
            max_exit = max_exit.max(s);
        }
        let unif_rate = match config.time_domain() {
            TimeDomain::Continuous if max_exit > 0.0 => UNIFORMIZATION_SLACK * max_exit,
            _ => 0.0,
        };
        let cols = rows.transpose();

        debug!(
            states = n,
            edges = rows.num_edges(),
            domain = %config.time_domain(),
            unif_rate,
            "chain assembled"
        );
        Ok(MarkovChain {
            time_domain: config.time_domain(),
            rows,
            cols,
            one_over_diag,
            classification,
            renumbering,
            unif_rate,
        })
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.rows.num_nodes()
    }

    /// Time domain the chain was assembled for.
    pub fn time_domain(&self) -> TimeDomain {
        self.time_domain
    }

    /// Class partition over the internal state order.
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Permutation between caller and internal state numbering.
    pub fn renumbering(&self) -> &Renumbering {
        &self.renumbering
    }

    /// Uniformisation rate of a continuous chain, cached at assembly.
    ///
    /// `None` for discrete chains and for continuous chains in which no
    /// state has an outgoing rate.
    pub fn uniformization_rate(&self) -> Option<f64> {
        (self.unif_rate > 0.0).then_some(self.unif_rate)
    }

    /// Outgoing off-diagonal graph in internal order.
    pub(crate) fn rows(&self) -> &FrozenGraph {
        &self.rows
    }

    /// Exit weight of internal state `i`: total off-diagonal probability
    /// (discrete) or exit rate (continuous). Zero for absorbing states.
    pub(crate) fn exit_weight(&self, i: usize) -> f64 {
        self.rows.row_sum(i)
    }

    pub(crate) fn require_domain(&self, expected: TimeDomain) -> Result<(), ChainError> {
        if self.time_domain != expected {
            return Err(ChainError::WrongTimeDomain { expected });
        }
        Ok(())
    }

    /// Checks a caller-facing state index.
    pub(crate) fn check_state(&self, index: usize) -> Result<(), ChainError> {
        if index >= self.num_states() {
            return Err(ChainError::BadIndex {
                index,
                num_states: self.num_states(),
            });
        }
        Ok(())
    }

    /// Solves `A x = 0` over a window of internal states, where `A` is the
    /// transposed equation matrix of the chain restricted to that window.
    ///
    /// Gather methods run over the incoming graph, the scatter method over
    /// the outgoing one; both see the same matrix.
    pub(crate) fn solve_null_window(
        &self,
        window: Range<usize>,
        x: &mut [f64],
        cfg: &SolverConfig,
    ) -> Result<SolverOutput, ChainError> {
        match cfg.method() {
            Method::MatVecJacobi => {
                let view = CscView::new(&self.rows, window, &self.one_over_diag)?;
                Ok(solve_null(&view, x, cfg)?)
            }
            Method::RowJacobi | Method::GaussSeidel => {
                let view = CsrView::new(&self.cols, window, &self.one_over_diag)?;
                Ok(solve_null(&view, x, cfg)?)
            }
        }
    }

    /// Solves `A x = b` over a window of internal states.
    pub(crate) fn solve_system_window(
        &self,
        window: Range<usize>,
        b: &[f64],
        x: &mut [f64],
        cfg: &SolverConfig,
    ) -> Result<SolverOutput, ChainError> {
        match cfg.method() {
            Method::MatVecJacobi => {
                let view = CscView::new(&self.rows, window, &self.one_over_diag)?;
                Ok(solve_system(&view, b, x, cfg)?)
            }
            Method::RowJacobi | Method::GaussSeidel => {
                let view = CsrView::new(&self.cols, window, &self.one_over_diag)?;
                Ok(solve_system(&view, b, x, cfg)?)
            }
        }
    }
}

/// Rebuilds a row-stored graph without diagonal entries, normalising each
/// row to probabilities for discrete chains, with self-weight included in
/// the row total.
fn strip_diagonal(graph: &FrozenGraph, domain: TimeDomain) -> Result<FrozenGraph, ChainError> {
    let n = graph.num_nodes();
    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::with_capacity(graph.num_edges());
    let mut values = Vec::with_capacity(graph.num_edges());
    row_ptr.push(0);
    for i in 0..n {
        let (cols, vals) = graph.row(i);
        let scale = match domain {
            TimeDomain::Discrete => {
                let total: f64 = vals.iter().sum();
                if total > 0.0 {
                    1.0 / total
                } else {
                    0.0
                }
            }
            TimeDomain::Continuous => 1.0,
        };
        for (&j, &w) in cols.iter().zip(vals) {
            if j != i {
                col_idx.push(j);
                values.push(w * scale);
            }
        }
        row_ptr.push(col_idx.len());
    }
    Ok(FrozenGraph::from_parts(
        n,
        row_ptr,
        col_idx,
        values,
        Orientation::RowStored,
    )?)
}
