//! Unified error system for the punch-card platform
//!
//! - [`ErrorCode`]: Standardized error codes shared with device clients
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON body an error renders as
//!
//! # Error Code Ranges
//!
//! - 1xxx: Session errors
//! - 2xxx: Presentation token errors
//! - 3xxx: Staff errors
//! - 4xxx: Card errors
//! - 5xxx: Program errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::CardFull).with_detail("card_id", 42);
//! let body = ErrorBody::from(err);
//! assert_eq!(body.code.code(), 4003);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
