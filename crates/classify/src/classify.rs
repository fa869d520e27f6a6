//! Classification and contiguous renumbering of chain states.

use std::ops::Range;

use tracing::debug;

use perron_graph::{FrozenGraph, GraphError, Orientation};

use crate::error::ClassifyError;
use crate::period;
use crate::scc;

/// Class id of the transient class.
pub const TRANSIENT: usize = 0;
/// Class id of the absorbing bucket.
pub const ABSORBING: usize = 1;
/// First recurrent class id.
pub const FIRST_RECURRENT: usize = 2;

/// Partition of states into transient, recurrent, and absorbing classes.
///
/// Expressed in renumbered coordinates: class 0 occupies the lowest index
/// range, each recurrent class a contiguous range after it, and the
/// absorbing bucket the highest range.
#[derive(Debug, Clone)]
pub struct Classification {
    class_of: Vec<usize>,
    /// Layout boundaries: transient, recurrent classes in id order, then
    /// absorbing. Length `num_classes + 1`.
    class_start: Vec<usize>,
    num_classes: usize,
    /// Period per recurrent class, indexed by `class_id - FIRST_RECURRENT`.
    periods: Vec<usize>,
}

impl Classification {
    /// Returns the number of states.
    pub fn num_states(&self) -> usize {
        self.class_of.len()
    }

    /// Returns the total number of classes, the (possibly empty) transient
    /// and absorbing buckets included.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns the number of recurrent classes.
    pub fn num_recurrent_classes(&self) -> usize {
        self.num_classes - 2
    }

    /// Returns the class id of a renumbered state.
    pub fn class_of(&self, state: usize) -> usize {
        self.class_of[state]
    }

    /// Returns the contiguous index range of a class.
    pub fn range_of_class(&self, class: usize) -> Range<usize> {
        let slot = self.layout_slot(class);
        self.class_start[slot]..self.class_start[slot + 1]
    }

    /// Returns the transient index range (starts at 0).
    pub fn transient_range(&self) -> Range<usize> {
        self.range_of_class(TRANSIENT)
    }

    /// Returns the absorbing index range (ends at `num_states`).
    pub fn absorbing_range(&self) -> Range<usize> {
        self.range_of_class(ABSORBING)
    }

    /// Iterates over the recurrent class ids.
    pub fn recurrent_classes(&self) -> Range<usize> {
        FIRST_RECURRENT..self.num_classes
    }

    /// True when the whole chain is one recurrent class.
    pub fn is_irreducible(&self) -> bool {
        self.num_recurrent_classes() == 1
            && self.transient_range().is_empty()
            && self.absorbing_range().is_empty()
    }

    /// Returns the period of a recurrent class (0 for the transient class,
    /// the absorbing bucket, or a non-periodic singleton).
    pub fn period(&self, class: usize) -> usize {
        if (FIRST_RECURRENT..self.num_classes).contains(&class) {
            self.periods[class - FIRST_RECURRENT]
        } else {
            0
        }
    }

    /// Maps a class id onto its position in the contiguous layout.
    fn layout_slot(&self, class: usize) -> usize {
        match class {
            TRANSIENT => 0,
            ABSORBING => self.num_classes - 1,
            c => c - 1,
        }
    }
}

/// Permutation between caller-visible and renumbered state indices.
///
/// Carried explicitly so callers keep their own handles; vectors cross the
/// boundary through [`Renumbering::permute`] and [`Renumbering::restore`].
#[derive(Debug, Clone)]
pub struct Renumbering {
    old_to_new: Vec<usize>,
    new_to_old: Vec<usize>,
    identity: bool,
}

impl Renumbering {
    /// True when the renumbering moves at least one state, so identity
    /// permutations can skip vector shuffling entirely.
    pub fn changes_something(&self) -> bool {
        !self.identity
    }

    /// Maps a caller-visible index to its renumbered position.
    pub fn to_new(&self, old: usize) -> usize {
        self.old_to_new[old]
    }

    /// Maps a renumbered index back to the caller-visible one.
    pub fn to_old(&self, new: usize) -> usize {
        self.new_to_old[new]
    }

    /// Reorders a caller-indexed vector into renumbered order.
    pub fn permute(&self, v: &[f64]) -> Vec<f64> {
        if self.identity {
            return v.to_vec();
        }
        let mut out = vec![0.0; v.len()];
        for (old, &x) in v.iter().enumerate() {
            out[self.old_to_new[old]] = x;
        }
        out
    }

    /// Reorders a renumbered vector back into caller order.
    pub fn restore(&self, v: &[f64]) -> Vec<f64> {
        if self.identity {
            return v.to_vec();
        }
        let mut out = vec![0.0; v.len()];
        for (new, &x) in v.iter().enumerate() {
            out[self.new_to_old[new]] = x;
        }
        out
    }

    /// Rebuilds a frozen graph with rows and columns in renumbered order.
    pub fn permute_graph(&self, graph: &FrozenGraph) -> Result<FrozenGraph, GraphError> {
        if self.identity {
            return Ok(graph.clone());
        }
        let n = graph.num_nodes();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::with_capacity(graph.num_edges());
        let mut values = Vec::with_capacity(graph.num_edges());
        row_ptr.push(0);
        let mut scratch: Vec<(usize, f64)> = Vec::new();
        for new_row in 0..n {
            let (cols, vals) = graph.row(self.new_to_old[new_row]);
            scratch.clear();
            scratch.extend(
                cols.iter()
                    .zip(vals)
                    .map(|(&c, &w)| (self.old_to_new[c], w)),
            );
            scratch.sort_unstable_by_key(|&(c, _)| c);
            for &(c, w) in &scratch {
                col_idx.push(c);
                values.push(w);
            }
            row_ptr.push(col_idx.len());
        }
        FrozenGraph::from_parts(n, row_ptr, col_idx, values, graph.orientation())
    }
}

/// Result bundle of [`classify`]: the renumbered graph, the class
/// partition, and the permutation that produced it.
#[derive(Debug, Clone)]
pub struct Classified {
    graph: FrozenGraph,
    classification: Classification,
    renumbering: Renumbering,
}

impl Classified {
    /// Returns the renumbered row-stored graph.
    pub fn graph(&self) -> &FrozenGraph {
        &self.graph
    }

    /// Returns the class partition.
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Returns the renumbering permutation.
    pub fn renumbering(&self) -> &Renumbering {
        &self.renumbering
    }

    /// Consumes the bundle.
    pub fn into_parts(self) -> (FrozenGraph, Classification, Renumbering) {
        (self.graph, self.classification, self.renumbering)
    }
}

/// Classifies the states of a frozen row-stored graph.
///
/// Runs an O(V+E) SCC decomposition, marks each terminal component as a
/// recurrent class (or as absorbing when it is a single state without a
/// self-loop), renumbers states into contiguous class ranges, and computes
/// the period of every recurrent class.
///
/// # Errors
///
/// [`ClassifyError::WrongOrientation`] when the graph is column-stored.
pub fn classify(graph: &FrozenGraph) -> Result<Classified, ClassifyError> {
    if graph.orientation() != Orientation::RowStored {
        return Err(ClassifyError::WrongOrientation);
    }
    let n = graph.num_nodes();
    let scc = scc::decompose(graph);

    // Component sizes and one representative node each, for the
    // singleton/absorbing distinction.
    let mut comp_size = vec![0usize; scc.num_comps];
    let mut comp_rep = vec![0usize; scc.num_comps];
    for (node, &c) in scc.comp_of.iter().enumerate() {
        if comp_size[c] == 0 {
            comp_rep[c] = node;
        }
        comp_size[c] += 1;
    }

    // Assign class ids: 0 transient, 1 absorbing, 2.. recurrent in
    // component order.
    let mut class_of_comp = vec![TRANSIENT; scc.num_comps];
    let mut num_recurrent = 0usize;
    for comp in 0..scc.num_comps {
        if !scc.terminal[comp] {
            continue;
        }
        let singleton = comp_size[comp] == 1;
        let self_loop = singleton && {
            let node = comp_rep[comp];
            graph.weight(node, node).is_some()
        };
        if singleton && !self_loop {
            class_of_comp[comp] = ABSORBING;
        } else {
            class_of_comp[comp] = FIRST_RECURRENT + num_recurrent;
            num_recurrent += 1;
        }
    }
    let num_classes = num_recurrent + 2;

    let class_of_old: Vec<usize> = scc.comp_of.iter().map(|&c| class_of_comp[c]).collect();

    // Layout: transient, recurrent classes in id order, absorbing.
    let slot_of = |class: usize| match class {
        TRANSIENT => 0,
        ABSORBING => num_classes - 1,
        c => c - 1,
    };
    let mut class_start = vec![0usize; num_classes + 1];
    for &class in &class_of_old {
        class_start[slot_of(class) + 1] += 1;
    }
    for i in 0..num_classes {
        class_start[i + 1] += class_start[i];
    }

    // Stable renumbering: within a class, states keep their relative order.
    let mut cursor = class_start.clone();
    let mut old_to_new = vec![0usize; n];
    let mut new_to_old = vec![0usize; n];
    for old in 0..n {
        let slot = slot_of(class_of_old[old]);
        let new = cursor[slot];
        cursor[slot] += 1;
        old_to_new[old] = new;
        new_to_old[new] = old;
    }
    let identity = old_to_new.iter().enumerate().all(|(i, &v)| i == v);

    let renumbering = Renumbering {
        old_to_new,
        new_to_old,
        identity,
    };
    let permuted = renumbering.permute_graph(graph)?;

    let class_of: Vec<usize> = (0..n)
        .map(|new| class_of_old[renumbering.new_to_old[new]])
        .collect();
    let mut classification = Classification {
        class_of,
        class_start,
        num_classes,
        periods: Vec::new(),
    };
    classification.periods = period::class_periods(&permuted, &classification);

    debug!(
        states = n,
        transient = classification.transient_range().len(),
        recurrent_classes = num_recurrent,
        absorbing = classification.absorbing_range().len(),
        identity,
        "classified chain states"
    );

    Ok(Classified {
        graph: permuted,
        classification,
        renumbering,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use perron_graph::DynamicGraph;

    fn freeze(n: usize, edges: &[(usize, usize, f64)]) -> FrozenGraph {
        let mut g = DynamicGraph::new();
        g.add_nodes(n);
        for &(a, b, w) in edges {
            g.add_edge(a, b, w).unwrap();
        }
        g.finish().unwrap()
    }

    #[test]
    fn irreducible_cycle() {
        let g = freeze(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        let c = classify(&g).unwrap();
        let cl = c.classification();
        assert!(cl.is_irreducible());
        assert_eq!(cl.num_recurrent_classes(), 1);
        assert_eq!(cl.range_of_class(FIRST_RECURRENT), 0..3);
        assert!(!c.renumbering().changes_something());
    }

    #[test]
    fn absorbing_singleton_vs_self_loop_singleton() {
        // 0 -> 1 (absorbing), 0 -> 2 (self-loop: recurrent singleton)
        let g = freeze(3, &[(0, 1, 1.0), (0, 2, 1.0), (2, 2, 1.0)]);
        let c = classify(&g).unwrap();
        let cl = c.classification();
        assert_eq!(cl.transient_range().len(), 1);
        assert_eq!(cl.absorbing_range().len(), 1);
        assert_eq!(cl.num_recurrent_classes(), 1);
        // Layout: transient first, absorbing last.
        assert_eq!(cl.class_of(0), TRANSIENT);
        assert_eq!(cl.class_of(cl.num_states() - 1), ABSORBING);
    }

    #[test]
    fn class_sizes_sum_to_num_states() {
        let g = freeze(
            6,
            &[
                (0, 1, 1.0),
                (1, 0, 1.0),
                (1, 2, 1.0),
                (2, 3, 1.0),
                (3, 2, 1.0),
                (0, 4, 1.0),
                (0, 5, 1.0),
                (5, 5, 2.0),
            ],
        );
        let c = classify(&g).unwrap();
        let cl = c.classification();
        let total: usize = (0..cl.num_classes())
            .map(|class| cl.range_of_class(class).len())
            .sum();
        assert_eq!(total, cl.num_states());
    }

    #[test]
    fn class_of_agrees_with_class_ranges() {
        let g = freeze(
            5,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 1, 1.0), (0, 3, 1.0), (0, 4, 1.0)],
        );
        let c = classify(&g).unwrap();
        let cl = c.classification();
        for state in 0..cl.num_states() {
            let class = cl.class_of(state);
            assert!(
                cl.range_of_class(class).contains(&state),
                "state {state} outside range of class {class}"
            );
        }
    }

    #[test]
    fn renumbering_round_trips_vectors() {
        let g = freeze(4, &[(2, 0, 1.0), (0, 2, 1.0), (1, 2, 1.0), (1, 3, 1.0)]);
        let c = classify(&g).unwrap();
        let v = vec![0.1, 0.2, 0.3, 0.4];
        let restored = c.renumbering().restore(&c.renumbering().permute(&v));
        assert_eq!(restored, v);
    }

    #[test]
    fn permuted_graph_preserves_weights() {
        let g = freeze(4, &[(0, 1, 1.5), (1, 0, 2.5), (2, 1, 3.5), (2, 3, 4.5)]);
        let c = classify(&g).unwrap();
        let r = c.renumbering();
        for edge in g.edges() {
            assert_eq!(
                c.graph().weight(r.to_new(edge.from), r.to_new(edge.to)),
                Some(edge.weight)
            );
        }
    }

    #[test]
    fn column_stored_graph_is_rejected() {
        let g = freeze(2, &[(0, 1, 1.0)]).transpose();
        assert!(matches!(
            classify(&g),
            Err(ClassifyError::WrongOrientation)
        ));
    }
}
