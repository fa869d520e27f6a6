//! Configuration for graph construction and freezing.

/// Storage orientation of a frozen graph.
///
/// A row-stored graph keeps outgoing edges contiguous per source node; a
/// column-stored graph is the transpose, keeping incoming edges contiguous
/// per target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Rows hold outgoing edges (CSR).
    RowStored,
    /// Rows hold incoming edges (CSC of the original).
    ColumnStored,
}

/// What to do with an edge whose source and target coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfLoopPolicy {
    /// Store self-loops like any other edge.
    Keep,
    /// Drop self-loops silently (counted by `dropped_edges`).
    Discard,
}

/// Configuration for [`crate::DynamicGraph::finish`].
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use perron_graph::{GraphConfig, SelfLoopPolicy};
///
/// let config = GraphConfig::new().with_self_loops(SelfLoopPolicy::Discard);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphConfig {
    orientation: Orientation,
    self_loops: SelfLoopPolicy,
}

impl GraphConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `orientation = RowStored`, `self_loops = Keep`.
    pub fn new() -> Self {
        Self {
            orientation: Orientation::RowStored,
            self_loops: SelfLoopPolicy::Keep,
        }
    }

    /// Sets the preferred storage orientation of the frozen graph.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the self-loop policy applied by `add_edge`.
    pub fn with_self_loops(mut self, policy: SelfLoopPolicy) -> Self {
        self.self_loops = policy;
        self
    }

    /// Returns the preferred storage orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the self-loop policy.
    pub fn self_loops(&self) -> SelfLoopPolicy {
        self.self_loops
    }

    /// Validates this configuration.
    ///
    /// All current combinations are legal; this exists so callers can treat
    /// every config type uniformly.
    pub fn validate(&self) -> Result<(), crate::GraphError> {
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = GraphConfig::new();
        assert_eq!(cfg.orientation(), Orientation::RowStored);
        assert_eq!(cfg.self_loops(), SelfLoopPolicy::Keep);
    }

    #[test]
    fn builder_chaining() {
        let cfg = GraphConfig::new()
            .with_orientation(Orientation::ColumnStored)
            .with_self_loops(SelfLoopPolicy::Discard);
        assert_eq!(cfg.orientation(), Orientation::ColumnStored);
        assert_eq!(cfg.self_loops(), SelfLoopPolicy::Discard);
    }

    #[test]
    fn validate_ok() {
        assert!(GraphConfig::new().validate().is_ok());
    }
}
