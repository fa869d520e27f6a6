//! Immutable compressed sparse row storage.

use crate::config::Orientation;
use crate::error::GraphError;

/// A single edge yielded by [`FrozenGraph::edges`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Source node (row).
    pub from: usize,
    /// Target node (column).
    pub to: usize,
    /// Edge weight.
    pub weight: f64,
}

/// An immutable directed weighted graph in CSR layout.
///
/// `row_ptr` has `num_nodes + 1` entries; the edges of row `i` occupy
/// `col_idx[row_ptr[i]..row_ptr[i+1]]` with columns sorted ascending, and
/// `values` holds the matching weights. Produced by
/// [`crate::DynamicGraph::finish`] and immutable thereafter.
#[derive(Debug, Clone)]
pub struct FrozenGraph {
    orientation: Orientation,
    num_nodes: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl FrozenGraph {
    /// Assembles a frozen graph from raw CSR parts.
    ///
    /// # Errors
    ///
    /// [`GraphError::CorruptStructure`] when the parts are inconsistent:
    /// wrong `row_ptr` length or endpoints, non-monotone row pointers,
    /// mismatched column/value lengths, out-of-range columns, or columns
    /// not strictly ascending within a row.
    pub fn from_parts(
        num_nodes: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<f64>,
        orientation: Orientation,
    ) -> Result<Self, GraphError> {
        if row_ptr.len() != num_nodes + 1 {
            return Err(GraphError::CorruptStructure {
                reason: format!(
                    "row_ptr has {} entries, expected {}",
                    row_ptr.len(),
                    num_nodes + 1
                ),
            });
        }
        if row_ptr[0] != 0 || row_ptr[num_nodes] != col_idx.len() {
            return Err(GraphError::CorruptStructure {
                reason: "row_ptr endpoints do not match edge count".to_string(),
            });
        }
        if col_idx.len() != values.len() {
            return Err(GraphError::CorruptStructure {
                reason: format!(
                    "{} columns but {} values",
                    col_idx.len(),
                    values.len()
                ),
            });
        }
        for row in 0..num_nodes {
            let (start, stop) = (row_ptr[row], row_ptr[row + 1]);
            if start > stop {
                return Err(GraphError::CorruptStructure {
                    reason: format!("row_ptr not monotone at row {row}"),
                });
            }
            for k in start..stop {
                if col_idx[k] >= num_nodes {
                    return Err(GraphError::CorruptStructure {
                        reason: format!("column {} out of range in row {row}", col_idx[k]),
                    });
                }
                if k > start && col_idx[k] <= col_idx[k - 1] {
                    return Err(GraphError::CorruptStructure {
                        reason: format!("columns not ascending in row {row}"),
                    });
                }
            }
        }
        Ok(Self {
            orientation,
            num_nodes,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Returns the storage orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.col_idx.len()
    }

    /// Returns the columns and weights of one row.
    pub fn row(&self, row: usize) -> (&[usize], &[f64]) {
        let (start, stop) = (self.row_ptr[row], self.row_ptr[row + 1]);
        (&self.col_idx[start..stop], &self.values[start..stop])
    }

    /// Returns the out-degree of a row.
    pub fn row_degree(&self, row: usize) -> usize {
        self.row_ptr[row + 1] - self.row_ptr[row]
    }

    /// Looks up the weight of edge `(from, to)`, if present.
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        let (cols, vals) = self.row(from);
        cols.binary_search(&to).ok().map(|k| vals[k])
    }

    /// Returns the sum of weights in one row, skipping the diagonal entry.
    pub fn row_sum_off_diagonal(&self, row: usize) -> f64 {
        let (cols, vals) = self.row(row);
        cols.iter()
            .zip(vals)
            .filter(|(&c, _)| c != row)
            .map(|(_, &w)| w)
            .sum()
    }

    /// Returns the sum of weights in one row.
    pub fn row_sum(&self, row: usize) -> f64 {
        self.row(row).1.iter().sum()
    }

    /// Returns the largest row sum over the whole graph (0.0 when empty).
    pub fn max_row_sum(&self) -> f64 {
        (0..self.num_nodes)
            .map(|r| self.row_sum(r))
            .fold(0.0, f64::max)
    }

    /// Iterates over every edge in row order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.num_nodes).flat_map(move |from| {
            let (cols, vals) = self.row(from);
            cols.iter().zip(vals).map(move |(&to, &weight)| Edge {
                from,
                to,
                weight,
            })
        })
    }

    /// Builds the transposed graph; `self` is left untouched.
    ///
    /// Runs the classic three-pass scheme: count in-degrees, prefix-sum them
    /// into row offsets, then scatter every edge. Row order in the result is
    /// ascending because the source is walked in row-major order.
    pub fn transpose(&self) -> FrozenGraph {
        let n = self.num_nodes;
        let mut row_ptr = vec![0usize; n + 1];
        for &c in &self.col_idx {
            row_ptr[c + 1] += 1;
        }
        for i in 0..n {
            row_ptr[i + 1] += row_ptr[i];
        }

        let mut cursor = row_ptr.clone();
        let mut col_idx = vec![0usize; self.col_idx.len()];
        let mut values = vec![0.0f64; self.values.len()];
        for edge in self.edges() {
            let k = cursor[edge.to];
            col_idx[k] = edge.from;
            values[k] = edge.weight;
            cursor[edge.to] += 1;
        }

        FrozenGraph {
            orientation: match self.orientation {
                Orientation::RowStored => Orientation::ColumnStored,
                Orientation::ColumnStored => Orientation::RowStored,
            },
            num_nodes: n,
            row_ptr,
            col_idx,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> FrozenGraph {
        // 0 -> 1 (1.0), 0 -> 2 (2.0), 1 -> 2 (3.0), 2 -> 0 (4.0)
        FrozenGraph::from_parts(
            3,
            vec![0, 2, 3, 4],
            vec![1, 2, 2, 0],
            vec![1.0, 2.0, 3.0, 4.0],
            Orientation::RowStored,
        )
        .unwrap()
    }

    #[test]
    fn from_parts_rejects_bad_row_ptr() {
        let r = FrozenGraph::from_parts(
            2,
            vec![0, 1],
            vec![0],
            vec![1.0],
            Orientation::RowStored,
        );
        assert!(matches!(r, Err(GraphError::CorruptStructure { .. })));
    }

    #[test]
    fn from_parts_rejects_unsorted_columns() {
        let r = FrozenGraph::from_parts(
            2,
            vec![0, 2, 2],
            vec![1, 0],
            vec![1.0, 1.0],
            Orientation::RowStored,
        );
        assert!(matches!(r, Err(GraphError::CorruptStructure { .. })));
    }

    #[test]
    fn weight_lookup() {
        let g = triangle();
        assert_eq!(g.weight(0, 2), Some(2.0));
        assert_eq!(g.weight(2, 0), Some(4.0));
        assert_eq!(g.weight(1, 0), None);
    }

    #[test]
    fn row_sums() {
        let g = triangle();
        assert_eq!(g.row_sum(0), 3.0);
        assert_eq!(g.row_sum(2), 4.0);
        assert_eq!(g.max_row_sum(), 4.0);
    }

    #[test]
    fn off_diagonal_sum_skips_self_loop() {
        let g = FrozenGraph::from_parts(
            2,
            vec![0, 2, 2],
            vec![0, 1],
            vec![5.0, 1.0],
            Orientation::RowStored,
        )
        .unwrap();
        assert_eq!(g.row_sum(0), 6.0);
        assert_eq!(g.row_sum_off_diagonal(0), 1.0);
    }

    #[test]
    fn transpose_flips_edges() {
        let g = triangle();
        let t = g.transpose();
        assert_eq!(t.orientation(), Orientation::ColumnStored);
        assert_eq!(t.weight(1, 0), Some(1.0));
        assert_eq!(t.weight(2, 0), Some(2.0));
        assert_eq!(t.weight(2, 1), Some(3.0));
        assert_eq!(t.weight(0, 2), Some(4.0));
        assert_eq!(t.num_edges(), 4);
    }

    #[test]
    fn double_transpose_is_identity() {
        let g = triangle();
        let tt = g.transpose().transpose();
        let mut a: Vec<Edge> = g.edges().collect();
        let mut b: Vec<Edge> = tt.edges().collect();
        let key = |e: &Edge| (e.from, e.to);
        a.sort_by_key(key);
        b.sort_by_key(key);
        assert_eq!(a, b);
        assert_eq!(tt.orientation(), g.orientation());
    }
}
