//! Error types for the perron-graph crate.

/// Error type for all fallible operations in the perron-graph crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphError {
    /// Returned when an edge weight is non-finite or not positive.
    #[error("bad rate on edge ({from}, {to}): {weight} (must be finite and > 0)")]
    BadRate {
        /// Source node of the offending edge.
        from: usize,
        /// Target node of the offending edge.
        to: usize,
        /// The invalid weight.
        weight: f64,
    },

    /// Returned when raw CSR parts do not describe a valid graph.
    #[error("corrupt graph structure: {reason}")]
    CorruptStructure {
        /// Description of the problem.
        reason: String,
    },
}
