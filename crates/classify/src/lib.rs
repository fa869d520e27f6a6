//! State classification for finite Markov chains.
//!
//! Partitions the nodes of a frozen graph into one transient class, zero or
//! more recurrent classes (the terminal strongly connected components), and
//! an absorbing bucket, then renumbers states so every class occupies a
//! contiguous index range:
//!
//! ```text
//!  ┌────────────┬─────────────┬─────┬─────────────┬────────────┐
//!  │ transient   │ recurrent 2 │ ... │ recurrent k │ absorbing  │
//!  └────────────┴─────────────┴─────┴─────────────┴────────────┘
//! ```
//!
//! Class 0 is the transient class, class 1 the absorbing bucket, and classes
//! 2 and above the recurrent classes. A size-1 terminal component without a
//! self-loop is absorbing; with a self-loop it is a recurrent class of its
//! own.

pub mod classify;
pub mod error;
pub mod period;

mod reach;
mod scc;

pub use classify::{classify, Classification, Classified, Renumbering};
pub use error::ClassifyError;
pub use reach::{verify_absorbing, ReachScratch};
