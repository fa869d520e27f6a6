use thiserror::Error;

use crate::config::TimeDomain;

/// Errors produced while assembling or analysing a Markov chain.
#[derive(Error, Debug)]
pub enum ChainError {
    /// A state index lies outside the chain.
    #[error("state index {index} out of range for chain with {num_states} states")]
    BadIndex {
        /// Offending index.
        index: usize,
        /// Number of states in the chain.
        num_states: usize,
    },

    /// A time bound or rate was negative or not finite.
    #[error("time bound {value} is negative or not finite")]
    BadTime {
        /// Offending value.
        value: f64,
    },

    /// A precision setting lies outside `(0, 1)`.
    #[error("precision {value} must lie strictly between 0 and 1")]
    BadPrecision {
        /// Offending value.
        value: f64,
    },

    /// An initial vector carried no probability mass.
    #[error("initial vector has no positive mass")]
    NullVector,

    /// An initial vector entry was negative or not finite.
    #[error("initial mass {value} at state {index} is negative or not finite")]
    BadMass {
        /// State the mass was assigned to.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Sparse initial vector entries were not strictly ascending.
    #[error("sparse initial vector not strictly ascending at position {position}")]
    UnsortedVector {
        /// Position of the first out-of-order pair.
        position: usize,
    },

    /// A state's exit rate could not seed an exponential holding time.
    #[error("exit rate {rate} at state {state} is not a valid exponential rate")]
    BadRate {
        /// State whose holding time was requested.
        state: usize,
        /// Offending rate.
        rate: f64,
    },

    /// An operation was called on a chain of the wrong time domain.
    #[error("operation requires a {expected} chain")]
    WrongTimeDomain {
        /// Time domain the operation is defined for.
        expected: TimeDomain,
    },

    /// Error from the underlying graph.
    #[error(transparent)]
    Graph(#[from] perron_graph::GraphError),

    /// Error from state classification.
    #[error(transparent)]
    Classify(#[from] perron_classify::ClassifyError),

    /// Error from the linear solver.
    #[error(transparent)]
    Solver(#[from] perron_solver::SolverError),
}
