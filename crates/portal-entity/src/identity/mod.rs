//! The two identity slots a single process can hold.

pub mod slot;

pub use slot::{IdentitySlot, SlotName};
