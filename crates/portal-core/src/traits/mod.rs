//! Trait definitions implemented by the storage backends.

pub mod store;

pub use store::KeyValueStore;
