//! API client for the chat-archive backend
//!
//! One [`ArchiveClient`] wraps all REST endpoints. Every wrapper is a pure
//! mapping from typed arguments to a URL plus request options; none of them
//! retries or caches, and all of them fail with [`ApiError`].

pub mod client;
mod conversations;
mod error;
mod messages;
mod settings;
mod users;

pub use client::ArchiveClient;
pub use error::ApiError;
pub use messages::MessageFilter;
