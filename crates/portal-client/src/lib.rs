//! # portal-client
//!
//! The HTTP collaborator of the access layer:
//!
//! - `api`: the [`AccessApi`] and [`AuthApi`] traits the core consumes
//! - `http`: reqwest implementation with per-slot bearer selection
//! - `token`: where bearer credentials come from
//! - `notify`: de-duplicated user-visible notices for transport failures

pub mod api;
pub mod http;
pub mod notify;
pub mod token;

pub use api::{AccessApi, AuthApi, Credentials};
pub use http::HttpClient;
pub use notify::{
    BroadcastNotifier, MemoryNotifier, Notice, Notifier, ThrottledNotifier, TracingNotifier,
};
pub use token::{StaticTokens, TokenSource};
