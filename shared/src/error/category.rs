//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 1xxx: Session errors
/// - 2xxx: Presentation token errors
/// - 3xxx: Staff errors
/// - 4xxx: Card errors
/// - 5xxx: Program errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Session errors (1xxx)
    Session,
    /// Presentation token errors (2xxx)
    Token,
    /// Staff errors (3xxx)
    Staff,
    /// Card errors (4xxx)
    Card,
    /// Program errors (5xxx)
    Program,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            1000..2000 => Self::Session,
            2000..3000 => Self::Token,
            3000..4000 => Self::Staff,
            4000..5000 => Self::Card,
            5000..6000 => Self::Program,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Token => "token",
            Self::Staff => "staff",
            Self::Card => "card",
            Self::Program => "program",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Session);
        assert_eq!(ErrorCategory::from_code(2004), ErrorCategory::Token);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Staff);
        assert_eq!(ErrorCategory::from_code(4003), ErrorCategory::Card);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Program);
        assert_eq!(ErrorCategory::from_code(7000), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::TokenReplayed.category(), ErrorCategory::Token);
        assert_eq!(ErrorCode::RateLimited.category(), ErrorCategory::Card);
        assert_eq!(ErrorCode::NoActiveProgram.category(), ErrorCategory::Program);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Token).unwrap();
        assert_eq!(json, "\"token\"");

        let category: ErrorCategory = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(category, ErrorCategory::Card);
    }
}
