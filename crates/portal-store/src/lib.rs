//! # portal-store
//!
//! Durable storage for identity slot credentials. Supports two modes:
//!
//! - **memory**: process-local map, lost on exit (tests, ephemeral runs)
//! - **file**: a single JSON document rewritten atomically on every batch
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::StorageManager;
