//! Errors surfaced by the catalog service and its repositories.

use catalog_core::DomainError;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Either one of the closed domain kinds, or an opaque storage failure.
///
/// `Storage` covers connectivity problems, timeouts and unexpected driver
/// errors. It is never reinterpreted as one of the domain kinds. The HTTP
/// layer turns it into a 500 without echoing the detail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

impl CatalogError {
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        Self::Storage(err.into())
    }

    /// The domain kind, if this error was classified.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Storage(_) => None,
        }
    }
}

impl PartialEq<DomainError> for CatalogError {
    fn eq(&self, other: &DomainError) -> bool {
        self.as_domain() == Some(other)
    }
}
