//! JSON-file storage provider.

pub mod store;

pub use store::FileStore;
