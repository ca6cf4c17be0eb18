//! Navigation module tree.

pub mod tree;

pub use tree::{ModuleTreeNode, NodeId};
