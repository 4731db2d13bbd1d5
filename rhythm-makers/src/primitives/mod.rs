//! Elements, from which rhythm is constructed.
//!
//! Everything is measured by exact `Duration` in whole notes.
//! Talea counts are pulled into Divisions, every Division is filled by
//! written Leaves, and, if written durations do not sum to the target,
//! wrapped into a Container (tuplet). Divisions of one call make a Forest.

pub mod container;
pub mod duration;
pub mod forest;
pub mod fraction_tools;
pub mod leaf;

pub use container::{Container, Division};
pub use duration::Duration;
pub use forest::Forest;
pub use fraction_tools::{is_notatable, split_written};
pub use leaf::{Leaf, LeafKind, Tie};

/// Smallest written value by default is 1/128.
pub static LIMIT_DENOMINATOR: u64 = 128;
