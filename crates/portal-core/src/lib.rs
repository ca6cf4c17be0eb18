//! # portal-core
//!
//! Core crate for the portal access layer. Contains the unified error
//! system, configuration schemas, and the durable key-value storage trait
//! that credential backends implement.
//!
//! This crate has **no** internal dependencies on other portal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
