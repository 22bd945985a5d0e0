//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The closed set of caller-meaningful failures. Storage adapters translate
/// their native signals into these kinds and never leak driver detail through
/// them; anything that does not fit stays unclassified one layer up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Client-supplied data violates a validation rule or the expected shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The unique-name constraint was violated.
    #[error("duplicate item name")]
    DuplicateName,

    /// The referenced item does not exist.
    #[error("item not found")]
    NotFound,
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::DuplicateName => "conflict",
            Self::NotFound => "not_found",
        }
    }
}
