//! Error types for the perron-classify crate.

use perron_graph::GraphError;

/// Error type for all fallible operations in the perron-classify crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    /// Returned when a column-stored graph is passed where outgoing
    /// adjacency is required.
    #[error("classification requires a row-stored graph")]
    WrongOrientation,

    /// Returned by the absorbing-chain check when a state cannot reach the
    /// absorbing bucket.
    #[error("state {state} cannot reach any absorbing state")]
    NotAbsorbing {
        /// Renumbered index of the offending state.
        state: usize,
    },

    /// Propagated when rebuilding the renumbered graph fails.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
