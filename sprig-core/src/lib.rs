//! Core of the sprig behavior-driven test engine. Models a suite as a tree of groups,
//! tests and hooks, flattens it into an ordered execution plan, and re-enters a suite
//! definition so that only the branch relevant to one step runs.

mod array;
mod discovery;
mod error;
mod flatten;
mod outcome;
mod replay;
mod suite;
pub mod trace_categories;
mod tree;

pub use array::{DynArray, INITIAL_CAPACITY};
pub use discovery::{Discovery, discover};
pub use error::{Error, NodeShape};
pub use flatten::{Step, flatten, flatten_from, test_count};
pub use outcome::{Failure, Outcome, ensure};
pub use replay::{Replay, replay};
pub use suite::{Body, Declarations, Suite};
pub use tree::{GroupLists, Node, NodeId, NodeKind, SuiteTree, TreeBuilder};
