//! Side navigation.

pub mod filter;
pub mod menu;

pub use filter::{VisibleNavigation, build_visible_tree};
pub use menu::MenuCache;
