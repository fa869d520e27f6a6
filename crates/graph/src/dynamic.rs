//! Mutable graph built edge-by-edge over the arena.

use tracing::debug;

use crate::arena::{EdgeArena, Link, NIL};
use crate::config::{GraphConfig, Orientation, SelfLoopPolicy};
use crate::error::GraphError;
use crate::frozen::FrozenGraph;

/// A mutable directed weighted graph.
///
/// Each row's edges form a sorted circular linked list over the shared edge
/// arena: the head handle points at the smallest column, every slot links to
/// the next larger column, and the largest links back to the head. The list
/// is compacted into CSR exactly once by [`DynamicGraph::finish`].
///
/// Out-of-range endpoints are dropped without an error, matching the
/// behaviour callers of the construction interface rely on; the
/// [`dropped_edges`](DynamicGraph::dropped_edges) counter exposes how many
/// were ignored.
#[derive(Debug, Clone)]
pub struct DynamicGraph {
    config: GraphConfig,
    arena: EdgeArena,
    row_head: Vec<usize>,
    row_len: Vec<usize>,
    num_edges: usize,
    dropped: usize,
}

impl DynamicGraph {
    /// Creates an empty graph with the default [`GraphConfig`].
    pub fn new() -> Self {
        Self::with_config(GraphConfig::new())
    }

    /// Creates an empty graph with an explicit configuration.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            arena: EdgeArena::new(),
            row_head: Vec::new(),
            row_len: Vec::new(),
            num_edges: 0,
            dropped: 0,
        }
    }

    /// Appends `n` fresh nodes, returning the index of the first one.
    pub fn add_nodes(&mut self, n: usize) -> usize {
        let first = self.row_head.len();
        self.row_head.resize(first + n, NIL);
        self.row_len.resize(first + n, 0);
        first
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.row_head.len()
    }

    /// Returns the number of stored edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Returns how many edges were silently dropped (out-of-range endpoints
    /// or discarded self-loops).
    pub fn dropped_edges(&self) -> usize {
        self.dropped
    }

    /// Adds an edge, summing the weight into an existing slot when the
    /// `(from, to)` pair is already present.
    ///
    /// Returns `Ok(true)` when the edge was a duplicate. Edges with an
    /// out-of-range endpoint are dropped and counted, returning `Ok(false)`.
    ///
    /// # Errors
    ///
    /// [`GraphError::BadRate`] when `weight` is non-finite or not positive.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<bool, GraphError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(GraphError::BadRate { from, to, weight });
        }
        let n = self.row_head.len();
        if from >= n || to >= n {
            self.dropped += 1;
            return Ok(false);
        }
        if from == to && self.config.self_loops() == SelfLoopPolicy::Discard {
            self.dropped += 1;
            return Ok(false);
        }

        let head = self.row_head[from];
        if head == NIL {
            let h = self.arena.alloc(to, weight, NIL);
            self.set_next(h, h);
            self.row_head[from] = h;
            self.row_len[from] += 1;
            self.num_edges += 1;
            return Ok(false);
        }

        if self.arena.columns[head] == to {
            self.arena.weights[head] += weight;
            return Ok(true);
        }

        if to < self.arena.columns[head] {
            // New smallest column: splice before the head and retarget the
            // tail's wrap-around link.
            let tail = self.tail_of(from);
            let h = self.arena.alloc(to, weight, head);
            self.set_next(tail, h);
            self.row_head[from] = h;
            self.row_len[from] += 1;
            self.num_edges += 1;
            return Ok(false);
        }

        // Walk until the successor wraps or passes `to`.
        let mut cur = head;
        loop {
            let nxt = self.arena.next_of(cur);
            if nxt == head || self.arena.columns[nxt] > to {
                let h = self.arena.alloc(to, weight, nxt);
                self.set_next(cur, h);
                self.row_len[from] += 1;
                self.num_edges += 1;
                return Ok(false);
            }
            if self.arena.columns[nxt] == to {
                self.arena.weights[nxt] += weight;
                return Ok(true);
            }
            cur = nxt;
        }
    }

    /// Freezes the graph into immutable CSR storage.
    ///
    /// Converts each circular row list into a terminated one, then compacts
    /// the arena in place: rows are walked in order and out-of-place slots
    /// are swapped into the next contiguous position, leaving forwarding
    /// markers so later rows still find their moved records. Runs in
    /// O(edges) and reuses the arena arrays as the CSR payload.
    pub fn finish(mut self) -> Result<FrozenGraph, GraphError> {
        self.config.validate()?;
        let n = self.row_head.len();

        // Circular -> terminated.
        for row in 0..n {
            let head = self.row_head[row];
            if head != NIL {
                let tail = self.tail_of(row);
                self.set_next(tail, NIL);
            }
        }

        // Prefix-sum row pointers.
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut acc = 0usize;
        row_ptr.push(0);
        for row in 0..n {
            acc += self.row_len[row];
            row_ptr.push(acc);
        }

        // In-place defragmentation.
        let mut write = 0usize;
        for row in 0..n {
            let mut h = self.row_head[row];
            while h != NIL {
                let slot = self.arena.resolve(h);
                let next = self.arena.next_of(slot);
                if slot != write {
                    self.arena.swap(slot, write);
                    // The record displaced from `write` now lives at `slot`;
                    // the finalized slot's link field carries the marker.
                    self.arena.links[write] = Link::Forwarded { to: slot };
                }
                write += 1;
                h = next;
            }
        }
        debug_assert_eq!(write, self.num_edges);

        debug!(
            nodes = n,
            edges = self.num_edges,
            dropped = self.dropped,
            "froze dynamic graph"
        );

        let frozen = FrozenGraph::from_parts(
            n,
            row_ptr,
            self.arena.columns,
            self.arena.weights,
            Orientation::RowStored,
        )?;
        match self.config.orientation() {
            Orientation::RowStored => Ok(frozen),
            Orientation::ColumnStored => Ok(frozen.transpose()),
        }
    }

    /// Returns the handle of the slot whose `next` wraps to the row head.
    fn tail_of(&self, row: usize) -> usize {
        let head = self.row_head[row];
        let mut cur = head;
        while self.arena.next_of(cur) != head {
            cur = self.arena.next_of(cur);
        }
        cur
    }

    fn set_next(&mut self, handle: usize, next: usize) {
        self.arena.links[handle] = Link::Active { next };
    }
}

impl Default for DynamicGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_nodes_returns_first_index() {
        let mut g = DynamicGraph::new();
        assert_eq!(g.add_nodes(3), 0);
        assert_eq!(g.add_nodes(2), 3);
        assert_eq!(g.num_nodes(), 5);
    }

    #[test]
    fn add_edge_rejects_bad_rate() {
        let mut g = DynamicGraph::new();
        g.add_nodes(2);
        assert!(matches!(
            g.add_edge(0, 1, 0.0),
            Err(GraphError::BadRate { .. })
        ));
        assert!(matches!(
            g.add_edge(0, 1, -2.0),
            Err(GraphError::BadRate { .. })
        ));
        assert!(matches!(
            g.add_edge(0, 1, f64::NAN),
            Err(GraphError::BadRate { .. })
        ));
    }

    #[test]
    fn out_of_range_edges_are_dropped_and_counted() {
        let mut g = DynamicGraph::new();
        g.add_nodes(2);
        assert_eq!(g.add_edge(0, 5, 1.0).unwrap(), false);
        assert_eq!(g.add_edge(9, 1, 1.0).unwrap(), false);
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.dropped_edges(), 2);
    }

    #[test]
    fn duplicate_edge_sums_weight() {
        let mut g = DynamicGraph::new();
        g.add_nodes(2);
        assert_eq!(g.add_edge(0, 1, 1.5).unwrap(), false);
        assert_eq!(g.add_edge(0, 1, 2.5).unwrap(), true);
        assert_eq!(g.num_edges(), 1);

        let frozen = g.finish().unwrap();
        let (cols, vals) = frozen.row(0);
        assert_eq!(cols, &[1]);
        assert_eq!(vals, &[4.0]);
    }

    #[test]
    fn self_loop_policy_discard() {
        let mut g = DynamicGraph::with_config(
            GraphConfig::new().with_self_loops(SelfLoopPolicy::Discard),
        );
        g.add_nodes(2);
        assert_eq!(g.add_edge(0, 0, 1.0).unwrap(), false);
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.dropped_edges(), 1);
    }

    #[test]
    fn rows_come_out_sorted() {
        let mut g = DynamicGraph::new();
        g.add_nodes(5);
        // Insert out of order, including a new minimum after the fact.
        g.add_edge(0, 3, 1.0).unwrap();
        g.add_edge(0, 1, 2.0).unwrap();
        g.add_edge(0, 4, 3.0).unwrap();
        g.add_edge(0, 0, 4.0).unwrap();
        g.add_edge(0, 2, 5.0).unwrap();

        let frozen = g.finish().unwrap();
        let (cols, vals) = frozen.row(0);
        assert_eq!(cols, &[0, 1, 2, 3, 4]);
        assert_eq!(vals, &[4.0, 2.0, 5.0, 1.0, 3.0]);
    }

    #[test]
    fn defrag_handles_interleaved_rows() {
        let mut g = DynamicGraph::new();
        g.add_nodes(4);
        // Interleave insertions so arena order differs from row order.
        g.add_edge(3, 0, 1.0).unwrap();
        g.add_edge(1, 2, 2.0).unwrap();
        g.add_edge(3, 2, 3.0).unwrap();
        g.add_edge(0, 1, 4.0).unwrap();
        g.add_edge(2, 3, 5.0).unwrap();
        g.add_edge(1, 0, 6.0).unwrap();
        g.add_edge(0, 3, 7.0).unwrap();

        let frozen = g.finish().unwrap();
        assert_eq!(frozen.row(0), (&[1usize, 3][..], &[4.0, 7.0][..]));
        assert_eq!(frozen.row(1), (&[0usize, 2][..], &[6.0, 2.0][..]));
        assert_eq!(frozen.row(2), (&[3usize][..], &[5.0][..]));
        assert_eq!(frozen.row(3), (&[0usize, 2][..], &[1.0, 3.0][..]));
    }

    #[test]
    fn empty_graph_freezes() {
        let mut g = DynamicGraph::new();
        g.add_nodes(3);
        let frozen = g.finish().unwrap();
        assert_eq!(frozen.num_nodes(), 3);
        assert_eq!(frozen.num_edges(), 0);
    }
}
