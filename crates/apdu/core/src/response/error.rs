//! Structured error carried through every failed exchange

use super::status::{ErrorCode, ErrorDescriptions, describe};

/// A return code paired with its resolved human-readable message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error_message} ({return_code})")]
pub struct ResponseError {
    /// Numeric code that caused the error
    pub return_code: ErrorCode,
    /// Resolved description, possibly followed by device diagnostic text
    pub error_message: String,
}

impl ResponseError {
    /// Create a new response error
    pub fn new(return_code: ErrorCode, error_message: impl Into<String>) -> Self {
        Self {
            return_code,
            error_message: error_message.into(),
        }
    }

    /// Create a response error whose message comes from the built-in table
    pub fn from_return_code(return_code: ErrorCode) -> Self {
        Self::from_return_code_with(return_code, None)
    }

    /// Create a response error, preferring `overrides` for the message
    pub fn from_return_code_with(
        return_code: ErrorCode,
        overrides: Option<&ErrorDescriptions>,
    ) -> Self {
        Self {
            return_code,
            error_message: describe(return_code, overrides),
        }
    }

    /// Get the return code
    pub const fn return_code(&self) -> ErrorCode {
        self.return_code
    }

    /// Get the error message
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Check if this error has the given return code
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.return_code == code
    }
}
