//! In-process storage provider.

pub mod store;

pub use store::MemoryStore;
