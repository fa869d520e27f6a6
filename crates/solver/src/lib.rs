//! Iterative linear solvers for Markov-chain equation systems.
//!
//! Solves `Ax = 0` (null space, normalized to sum 1) and `Ax = b` over
//! class-restricted views of a frozen graph, using Row Jacobi, MatVec
//! Jacobi, or Gauss-Seidel sweeps with successive over-relaxation.
//!
//! The matrix never materialises: a [`MatrixView`] restricts a shared CSR
//! backing to a `[start, stop)` row window and carries the negated
//! reciprocal diagonal, so several views (one per recurrent class) can alias
//! the same frozen graph.
//!
//! # Quick start
//!
//! ```rust
//! use perron_graph::DynamicGraph;
//! use perron_solver::{solve_null, CsrView, Method, SolverConfig};
//!
//! // Symmetric two-state chain; equations indexed by incoming edges.
//! let mut g = DynamicGraph::new();
//! g.add_nodes(2);
//! g.add_edge(0, 1, 1.0).unwrap();
//! g.add_edge(1, 0, 1.0).unwrap();
//! let incoming = g.finish().unwrap().transpose();
//!
//! let one_over_diag = vec![1.0, 1.0];
//! let view = CsrView::new(&incoming, 0..2, &one_over_diag).unwrap();
//! let mut x = vec![0.0; 2];
//! let out = solve_null(&view, &mut x, &SolverConfig::new()).unwrap();
//! assert!(out.converged());
//! assert!((x[0] - 0.5).abs() < 1e-9);
//! ```

pub mod config;
pub mod error;
pub mod matrix;
pub mod result;

mod gauss_seidel;
mod jacobi;
mod solve;
mod sweep;

pub use config::{Method, SolverConfig};
pub use error::SolverError;
pub use matrix::{CscView, CsrView, MatrixView, Scalar};
pub use result::{SolverOutput, SolverStatus};
pub use solve::{solve_null, solve_system};
