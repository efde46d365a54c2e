//! Member path addressing: selectors and the lazily built path tree.
//!
//! Callers name members with a [`Selector`]; the engine resolves selectors
//! against a per-fixture [`PathTree`] whose [`NodeId`]s key all member
//! configuration and drive the instance builder's walk.

pub mod selector;
pub mod tree;

pub use selector::{Selector, SelectorStep};
pub use tree::{ChildKey, NodeId, PathKind, PathTree};
