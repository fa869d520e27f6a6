//! Sparse directed weighted graph with a dynamic-to-frozen lifecycle.
//!
//! A graph is built edge-by-edge as a [`DynamicGraph`], where every row is a
//! sorted circular linked list over an index-addressed edge arena. Calling
//! [`DynamicGraph::finish`] compacts the linked structure in place into an
//! immutable CSR [`FrozenGraph`] without allocating a second edge array.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │  add_nodes    │────▶│  add_edge      │────▶│    finish        │
//!  │  (grow)       │     │  (splice row)  │     │  (defrag to CSR) │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use perron_graph::DynamicGraph;
//!
//! let mut g = DynamicGraph::new();
//! g.add_nodes(3);
//! g.add_edge(0, 1, 2.0).unwrap();
//! g.add_edge(1, 2, 1.0).unwrap();
//!
//! let frozen = g.finish().unwrap();
//! assert_eq!(frozen.num_edges(), 2);
//! ```

pub mod config;
pub mod error;
pub mod frozen;

mod arena;
mod dynamic;

pub use config::{GraphConfig, Orientation, SelfLoopPolicy};
pub use dynamic::DynamicGraph;
pub use error::GraphError;
pub use frozen::{Edge, FrozenGraph};
