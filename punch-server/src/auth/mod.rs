//! Session authentication
//!
//! - [`require_session`] - verifies the session JWT on `/api/` routes
//! - [`MemberSession`] / [`StaffSession`] / [`AdminSession`] - role-checked extractors

pub mod extractor;
pub mod middleware;
pub mod session;

pub use extractor::{AdminSession, MemberSession, StaffSession};
pub use middleware::require_session;
pub use session::{SessionClaims, SessionIdentity, SessionRole, create_token, verify_token};
