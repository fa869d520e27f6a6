//! Birth-death chains with known closed forms.

use approx::assert_relative_eq;
use perron_chain::{ChainConfig, InitialVector, MarkovChain, TimeDomain};
use perron_graph::DynamicGraph;
use perron_solver::{Method, SolverConfig};

const N: usize = 8;
const BIRTH: f64 = 1.0;
const DEATH: f64 = 2.0;

fn birth_death() -> MarkovChain {
    let mut g = DynamicGraph::new();
    g.add_nodes(N);
    for i in 0..N - 1 {
        g.add_edge(i, i + 1, BIRTH).unwrap();
        g.add_edge(i + 1, i, DEATH).unwrap();
    }
    MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Continuous)).unwrap()
}

/// Detailed balance gives pi(i) proportional to (birth/death)^i.
fn exact_stationary() -> Vec<f64> {
    let rho = BIRTH / DEATH;
    let mut pi: Vec<f64> = (0..N).map(|i| rho.powi(i as i32)).collect();
    let total: f64 = pi.iter().sum();
    for p in &mut pi {
        *p /= total;
    }
    pi
}

#[test]
fn stationary_distribution_matches_detailed_balance() {
    let chain = birth_death();
    assert!(chain.classification().is_irreducible());
    let exact = exact_stationary();

    let cfg = SolverConfig::new()
        .with_precision(1e-12)
        .with_max_iters(200_000);
    let (pi, out) = chain
        .infinity_distribution(&InitialVector::point_mass(0), &cfg)
        .unwrap();
    assert!(out.converged());
    for i in 0..N {
        assert_relative_eq!(pi[i], exact[i], epsilon = 1e-8);
    }
}

#[test]
fn all_methods_agree_on_an_aperiodic_chain() {
    // The plain birth-death jump chain is bipartite, which defeats the
    // Jacobi sweeps; a single shortcut edge breaks the periodicity.
    let mut g = DynamicGraph::new();
    g.add_nodes(N);
    for i in 0..N - 1 {
        g.add_edge(i, i + 1, BIRTH).unwrap();
        g.add_edge(i + 1, i, DEATH).unwrap();
    }
    g.add_edge(0, 2, 0.5).unwrap();
    let chain = MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Continuous)).unwrap();

    let mut answers = Vec::new();
    for method in [Method::GaussSeidel, Method::RowJacobi, Method::MatVecJacobi] {
        let cfg = SolverConfig::new()
            .with_method(method)
            .with_precision(1e-12)
            .with_max_iters(500_000);
        let (pi, out) = chain
            .infinity_distribution(&InitialVector::point_mass(0), &cfg)
            .unwrap();
        assert!(out.converged(), "{method} did not converge");
        let total: f64 = pi.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        answers.push(pi);
    }
    for pi in &answers[1..] {
        for i in 0..N {
            assert_relative_eq!(pi[i], answers[0][i], epsilon = 1e-7);
        }
    }
}

#[test]
fn over_relaxation_reaches_the_same_answer() {
    let chain = birth_death();
    let exact = exact_stationary();
    let cfg = SolverConfig::new()
        .with_relaxation(1.3)
        .with_precision(1e-12)
        .with_max_iters(200_000);
    let (pi, out) = chain
        .infinity_distribution(&InitialVector::point_mass(3), &cfg)
        .unwrap();
    assert!(out.converged());
    for i in 0..N {
        assert_relative_eq!(pi[i], exact[i], epsilon = 1e-8);
    }
}

#[test]
fn pure_death_absorption_times() {
    // i -> i-1 at rate DEATH, state 0 absorbing: from state k the chain
    // spends exactly 1/DEATH in each of k, .., 1.
    let mut g = DynamicGraph::new();
    g.add_nodes(4);
    for i in 1..4 {
        g.add_edge(i, i - 1, DEATH).unwrap();
    }
    let chain = MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Continuous)).unwrap();

    let (times, out) = chain
        .time_to_absorption(&InitialVector::point_mass(3), &SolverConfig::new())
        .unwrap();
    assert!(out.converged());
    assert_relative_eq!(times[0], 0.0);
    for i in 1..4 {
        assert_relative_eq!(times[i], 1.0 / DEATH, epsilon = 1e-9);
    }

    let (total, _) = chain
        .expected_time_to_absorption(&InitialVector::point_mass(3), &SolverConfig::new())
        .unwrap();
    assert_relative_eq!(total, 3.0 / DEATH, epsilon = 1e-9);
}
