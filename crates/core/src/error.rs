//! Resolver error surface.

use thiserror::Error;

/// Result type used across the resolution path.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Error returned by identity resolution.
///
/// Two kinds only: the caller sent nothing usable, or the contact store
/// failed. Store failures keep their cause for logging; nothing here is
/// retried internally.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request carried no usable identifier.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The contact store failed; reported before any partial recovery is
    /// attempted (there is none — the caller retries the whole call).
    #[error("contact store failure: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ResolveError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(err))
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}
