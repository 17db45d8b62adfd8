//! Shared types for the punch-card platform
//!
//! Error codes and response envelopes, loyalty models and small utilities
//! used by the server and by device clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
