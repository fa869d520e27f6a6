//! Absorbing-chain reachability verification.

use tracing::debug;

use crate::classify::Classified;
use crate::error::ClassifyError;

/// Marking structure used by the reachability sweep.
///
/// The compact bitset trades a little indexing work for an 8x smaller
/// scratch footprint on large chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachScratch {
    /// One bit per state, packed into 64-bit words.
    Bitset,
    /// One byte per state.
    BoolArray,
}

enum Marks {
    Bits(Vec<u64>),
    Bools(Vec<bool>),
}

impl Marks {
    fn new(kind: ReachScratch, n: usize) -> Self {
        match kind {
            ReachScratch::Bitset => Marks::Bits(vec![0; n.div_ceil(64)]),
            ReachScratch::BoolArray => Marks::Bools(vec![false; n]),
        }
    }

    fn set(&mut self, i: usize) {
        match self {
            Marks::Bits(words) => words[i / 64] |= 1 << (i % 64),
            Marks::Bools(flags) => flags[i] = true,
        }
    }

    fn get(&self, i: usize) -> bool {
        match self {
            Marks::Bits(words) => words[i / 64] >> (i % 64) & 1 == 1,
            Marks::Bools(flags) => flags[i],
        }
    }
}

/// Verifies that every state of an absorbing chain reaches the absorbing
/// bucket.
///
/// Walks the transposed graph backwards from all absorbing states; any state
/// left unmarked cannot be absorbed and fails the check. Intended for
/// absorbing-chain mode, where recurrent classes are themselves a failure.
///
/// # Errors
///
/// [`ClassifyError::NotAbsorbing`] naming the first (renumbered) state that
/// cannot reach the absorbing bucket.
pub fn verify_absorbing(classified: &Classified, scratch: ReachScratch) -> Result<(), ClassifyError> {
    let graph = classified.graph();
    let n = graph.num_nodes();
    let absorbing = classified.classification().absorbing_range();

    let reverse = graph.transpose();
    let mut marks = Marks::new(scratch, n);
    let mut queue: Vec<usize> = absorbing.clone().collect();
    for &s in &queue {
        marks.set(s);
    }
    while let Some(s) = queue.pop() {
        let (cols, _) = reverse.row(s);
        for &p in cols {
            if !marks.get(p) {
                marks.set(p);
                queue.push(p);
            }
        }
    }

    for state in 0..n {
        if !marks.get(state) {
            debug!(state, "state cannot reach the absorbing bucket");
            return Err(ClassifyError::NotAbsorbing { state });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use perron_graph::DynamicGraph;

    fn classified(n: usize, edges: &[(usize, usize)]) -> Classified {
        let mut g = DynamicGraph::new();
        g.add_nodes(n);
        for &(a, b) in edges {
            g.add_edge(a, b, 1.0).unwrap();
        }
        classify(&g.finish().unwrap()).unwrap()
    }

    #[test]
    fn absorbing_chain_passes_with_both_scratch_kinds() {
        let c = classified(3, &[(0, 1), (1, 2)]);
        assert!(verify_absorbing(&c, ReachScratch::Bitset).is_ok());
        assert!(verify_absorbing(&c, ReachScratch::BoolArray).is_ok());
    }

    #[test]
    fn recurrent_class_fails_the_check() {
        // 0 -> absorbing 1, but 2 <-> 3 never absorbs.
        let c = classified(4, &[(0, 1), (2, 3), (3, 2)]);
        let err = verify_absorbing(&c, ReachScratch::Bitset).unwrap_err();
        assert!(matches!(err, ClassifyError::NotAbsorbing { .. }));
    }

    #[test]
    fn bitset_marks_cross_word_boundaries() {
        // A 70-state funnel into one absorbing state exercises word 2.
        let edges: Vec<(usize, usize)> = (0..69).map(|i| (i, 69)).collect();
        let c = classified(70, &edges);
        assert!(verify_absorbing(&c, ReachScratch::Bitset).is_ok());
    }
}
