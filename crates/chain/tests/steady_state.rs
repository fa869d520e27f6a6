//! Limiting behaviour of reducible chains.

use approx::assert_relative_eq;
use perron_chain::{ChainConfig, InitialVector, MarkovChain, TimeDomain};
use perron_graph::DynamicGraph;
use perron_solver::SolverConfig;

/// Transient state 2 feeds two recurrent flip-flops {0, 1} and {3, 4} with
/// rates 1 and 3, placed so the classified order differs from the caller's.
fn two_traps() -> MarkovChain {
    let mut g = DynamicGraph::new();
    g.add_nodes(5);
    g.add_edge(0, 1, 1.0).unwrap();
    g.add_edge(1, 0, 1.0).unwrap();
    g.add_edge(3, 4, 1.0).unwrap();
    g.add_edge(4, 3, 1.0).unwrap();
    g.add_edge(2, 0, 1.0).unwrap();
    g.add_edge(2, 3, 3.0).unwrap();
    MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Continuous)).unwrap()
}

#[test]
fn classification_shape() {
    let chain = two_traps();
    let class = chain.classification();
    assert!(!class.is_irreducible());
    assert_eq!(class.num_recurrent_classes(), 2);
    assert_eq!(class.transient_range().len(), 1);
    assert!(class.absorbing_range().is_empty());
    // The transient state moved to the front of the internal order.
    assert!(chain.renumbering().changes_something());
    assert_eq!(chain.renumbering().to_new(2), 0);
}

#[test]
fn limiting_distribution_weights_classes_by_entry_probability() {
    let chain = two_traps();
    let (pi, out) = chain
        .infinity_distribution(&InitialVector::point_mass(2), &SolverConfig::new())
        .unwrap();
    assert!(out.converged());
    // Entry probabilities 1/4 and 3/4, split evenly inside each flip-flop.
    assert_relative_eq!(pi[2], 0.0);
    assert_relative_eq!(pi[0], 0.125, epsilon = 1e-8);
    assert_relative_eq!(pi[1], 0.125, epsilon = 1e-8);
    assert_relative_eq!(pi[3], 0.375, epsilon = 1e-8);
    assert_relative_eq!(pi[4], 0.375, epsilon = 1e-8);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let chain = two_traps();
    let cfg = SolverConfig::new();
    let initial = InitialVector::point_mass(2);
    let (first, _) = chain.infinity_distribution(&initial, &cfg).unwrap();
    let (second, _) = chain.infinity_distribution(&initial, &cfg).unwrap();
    assert_eq!(first, second);
}

#[test]
fn limiting_distribution_is_idempotent() {
    let chain = two_traps();
    let cfg = SolverConfig::new();
    let (pi, _) = chain
        .infinity_distribution(&InitialVector::point_mass(2), &cfg)
        .unwrap();
    let (again, _) = chain
        .infinity_distribution(&InitialVector::dense(&pi), &cfg)
        .unwrap();
    for s in 0..5 {
        assert_relative_eq!(pi[s], again[s], epsilon = 1e-8);
    }
}

#[test]
fn mass_already_in_a_trap_stays_there() {
    let chain = two_traps();
    let (pi, _) = chain
        .infinity_distribution(&InitialVector::point_mass(0), &SolverConfig::new())
        .unwrap();
    assert_relative_eq!(pi[0], 0.5, epsilon = 1e-8);
    assert_relative_eq!(pi[1], 0.5, epsilon = 1e-8);
    assert_relative_eq!(pi[3], 0.0);
    assert_relative_eq!(pi[4], 0.0);
}

#[test]
fn trapping_probabilities_sum_per_class() {
    let chain = two_traps();
    let (probs, out) = chain
        .trapping_probabilities(&InitialVector::point_mass(2), &SolverConfig::new())
        .unwrap();
    assert!(out.converged());
    assert_relative_eq!(probs[2], 0.0);
    assert_relative_eq!(probs[0] + probs[1], 0.25, epsilon = 1e-8);
    assert_relative_eq!(probs[3] + probs[4], 0.75, epsilon = 1e-8);
}

#[test]
fn absorbing_sink_collects_everything() {
    // 0 -> 1 -> 2, state 2 absorbing.
    let mut g = DynamicGraph::new();
    g.add_nodes(3);
    g.add_edge(0, 1, 2.0).unwrap();
    g.add_edge(1, 2, 1.0).unwrap();
    let config = ChainConfig::new(TimeDomain::Continuous).with_verify_absorbing(true);
    let chain = MarkovChain::finish(g, &config).unwrap();
    let (pi, _) = chain
        .infinity_distribution(&InitialVector::point_mass(0), &SolverConfig::new())
        .unwrap();
    assert_relative_eq!(pi[0], 0.0);
    assert_relative_eq!(pi[1], 0.0);
    assert_relative_eq!(pi[2], 1.0, epsilon = 1e-9);
}
