//! Period computation for recurrent classes.

use crate::classify::Classification;
use perron_graph::FrozenGraph;

const UNSEEN: usize = usize::MAX;

/// Computes the period of every recurrent class of a renumbered graph.
///
/// For each class, BFS distance labels are taken from an arbitrary member;
/// every intra-class edge `(i, j)` with `dist(i) >= dist(j)` closes a walk of
/// length `dist(i) - dist(j) + 1`, and the gcd of all such lengths is the
/// class period. A singleton without a qualifying edge yields 0.
pub(crate) fn class_periods(graph: &FrozenGraph, classification: &Classification) -> Vec<usize> {
    classification
        .recurrent_classes()
        .map(|class| {
            let range = classification.range_of_class(class);
            period_of_range(graph, range.start, range.end)
        })
        .collect()
}

fn period_of_range(graph: &FrozenGraph, start: usize, stop: usize) -> usize {
    let len = stop - start;
    let mut dist = vec![UNSEEN; len];
    let mut queue = std::collections::VecDeque::new();
    dist[0] = 0;
    queue.push_back(start);

    while let Some(i) = queue.pop_front() {
        let (cols, _) = graph.row(i);
        for &j in cols {
            if (start..stop).contains(&j) && dist[j - start] == UNSEEN {
                dist[j - start] = dist[i - start] + 1;
                queue.push_back(j);
            }
        }
    }

    let mut g = 0usize;
    for i in start..stop {
        let (cols, _) = graph.row(i);
        for &j in cols {
            if (start..stop).contains(&j) && dist[i - start] >= dist[j - start] {
                g = gcd(g, dist[i - start] - dist[j - start] + 1);
            }
        }
    }
    g
}

fn gcd(a: usize, b: usize) -> usize {
    if a == 0 {
        b
    } else {
        gcd(b % a, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, FIRST_RECURRENT};
    use perron_graph::DynamicGraph;

    fn freeze(n: usize, edges: &[(usize, usize)]) -> FrozenGraph {
        let mut g = DynamicGraph::new();
        g.add_nodes(n);
        for &(a, b) in edges {
            g.add_edge(a, b, 1.0).unwrap();
        }
        g.finish().unwrap()
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 13), 1);
    }

    #[test]
    fn pure_cycle_has_period_equal_to_length() {
        for n in 2..6 {
            let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
            let g = freeze(n, &edges);
            let c = classify(&g).unwrap();
            assert_eq!(c.classification().period(FIRST_RECURRENT), n);
        }
    }

    #[test]
    fn self_loop_makes_class_aperiodic() {
        let g = freeze(3, &[(0, 1), (1, 2), (2, 0), (0, 0)]);
        let c = classify(&g).unwrap();
        assert_eq!(c.classification().period(FIRST_RECURRENT), 1);
    }

    #[test]
    fn bipartite_chain_has_period_two() {
        // Cycles of length 4 and 2 only: gcd = 2.
        let g = freeze(4, &[(0, 2), (2, 1), (1, 3), (3, 0), (0, 3)]);
        let c = classify(&g).unwrap();
        assert_eq!(c.classification().period(FIRST_RECURRENT), 2);
    }

    #[test]
    fn self_looping_singleton_has_period_one() {
        let g = freeze(2, &[(0, 1), (1, 1)]);
        let c = classify(&g).unwrap();
        assert_eq!(c.classification().period(FIRST_RECURRENT), 1);
    }

    #[test]
    fn non_recurrent_classes_report_zero() {
        let g = freeze(2, &[(0, 1)]);
        let c = classify(&g).unwrap();
        assert_eq!(c.classification().period(0), 0);
        assert_eq!(c.classification().period(1), 0);
    }
}
