//! Jenkins client modules
//!
//! `api` speaks HTTP, `service` chains trigger, queue resolution and status
//! lookups into build operations, and `blocking` wraps them for synchronous
//! callers.

pub mod api;
pub mod blocking;
pub mod config;
pub mod error;
pub mod poller;
pub mod service;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use blocking::BlockingClient;
pub use config::{ClientConfig, PollingConfig, StatusMapping};
pub use error::{ClientError, Stage};
pub use service::JenkinsClient;

pub type Result<T> = std::result::Result<T, ClientError>;
