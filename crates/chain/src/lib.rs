//! Markov chain analysis over frozen sparse graphs.
//!
//! A [`MarkovChain`] is assembled once from a
//! [`DynamicGraph`](perron_graph::DynamicGraph) and analysed many times:
//!
//! ```text
//! DynamicGraph --finish--> classify --renumber--> MarkovChain
//!                                                    |
//!            +------------------+--------------------+----------------+
//!            |                  |                    |                |
//!     infinity_distribution  time_to_absorption  transient_*      random_walk
//!     (stationary / limits)  (expected sojourn)  (uniformisation) (simulation)
//! ```
//!
//! Discrete chains interpret edge weights as unnormalised one-step odds,
//! continuous chains as transition rates. Linear questions go through the
//! iterative solvers of [`perron_solver`]; time-bounded questions on
//! continuous chains go through uniformisation with [`FoxGlynn`] Poisson
//! weights.
//!
//! # Quick start
//!
//! ```rust
//! use perron_chain::{ChainConfig, InitialVector, MarkovChain, TimeDomain};
//! use perron_graph::DynamicGraph;
//! use perron_solver::SolverConfig;
//!
//! // Two-state flip-flop CTMC.
//! let mut g = DynamicGraph::new();
//! g.add_nodes(2);
//! g.add_edge(0, 1, 3.0).unwrap();
//! g.add_edge(1, 0, 1.0).unwrap();
//! let chain = MarkovChain::finish(g, &ChainConfig::new(TimeDomain::Continuous)).unwrap();
//!
//! let (pi, out) = chain
//!     .infinity_distribution(&InitialVector::point_mass(0), &SolverConfig::new())
//!     .unwrap();
//! assert!(out.converged());
//! assert!((pi[0] - 0.25).abs() < 1e-8);
//! assert!((pi[1] - 0.75).abs() < 1e-8);
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod fox_glynn;
pub mod report;
pub mod scratch;
pub mod vector;
pub mod walk;

mod absorption;
mod steady;
mod transient;

pub use chain::MarkovChain;
pub use config::{ChainConfig, TimeDomain, TransientConfig};
pub use error::ChainError;
pub use fox_glynn::FoxGlynn;
pub use report::SolveReport;
pub use scratch::TransientScratch;
pub use steady::is_ergodic;
pub use vector::InitialVector;
pub use walk::{WalkLimit, WalkOutcome};
