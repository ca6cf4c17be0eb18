//! Durable identity slots.

pub mod store;

pub use store::{SessionStore, SlotPair};
