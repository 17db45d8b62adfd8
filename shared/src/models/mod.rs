//! Data models
//!
//! Shared between punch-server and device clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Card and program IDs are `i64` snowflakes; tenant, member, staff and
//! branch IDs are opaque strings owned by external collaborators.

pub mod card;
pub mod event;
pub mod presentation;
pub mod program;

// Re-exports
pub use card::*;
pub use event::*;
pub use presentation::*;
pub use program::*;
