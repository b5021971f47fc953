//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use lprovider::{ProviderError, ProviderErrorKind};
//!
//! let auth = ProviderError::authentication("bad key");
//! assert!(!auth.is_compatibility_rejection());
//!
//! let compat = ProviderError::compatibility("systemInstruction is not supported").with_status(400);
//! assert_eq!(compat.kind, ProviderErrorKind::Compatibility);
//! assert!(compat.is_compatibility_rejection());
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    EmptyResponse,
    /// The backend rejected the request shape itself, e.g. the system-instruction channel.
    Compatibility,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::EmptyResponse, message)
    }

    pub fn compatibility(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Compatibility, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_compatibility_rejection(&self) -> bool {
        self.kind == ProviderErrorKind::Compatibility
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_compatibility_errors_are_recoverable() {
        assert!(ProviderError::compatibility("shape").is_compatibility_rejection());
        assert!(!ProviderError::timeout("slow").is_compatibility_rejection());
        assert!(!ProviderError::unavailable("down").is_compatibility_rejection());
        assert_eq!(
            ProviderError::empty_response("nothing").kind,
            ProviderErrorKind::EmptyResponse
        );
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = ProviderError::invalid_request("bad payload").with_status(422);
        assert_eq!(error.to_string(), "InvalidRequest: bad payload");
        assert_eq!(error.status, Some(422));
        assert!(!error.is_compatibility_rejection());
    }
}
