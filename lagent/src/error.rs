//! Turn-level errors surfaced by the orchestrator.

use std::error::Error;
use std::fmt::{Display, Formatter};

use lmemory::MemoryError;
use lprovider::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorKind {
    InvalidRequest,
    Provider,
    Store,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorPhase {
    Validation,
    Persistence,
    Planning,
    ToolExecution,
    Answer,
    Streaming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub message: String,
    pub phase: AgentErrorPhase,
    pub provider_kind: Option<ProviderErrorKind>,
}

impl AgentError {
    pub fn new(kind: AgentErrorKind, phase: AgentErrorPhase, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            phase,
            provider_kind: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::InvalidRequest, AgentErrorPhase::Validation, message)
    }

    pub fn cancelled(phase: AgentErrorPhase) -> Self {
        Self::new(AgentErrorKind::Cancelled, phase, "turn was cancelled")
    }

    pub fn with_phase(mut self, phase: AgentErrorPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == AgentErrorKind::Cancelled
    }
}

impl Display for AgentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for AgentError {}

impl From<ProviderError> for AgentError {
    fn from(value: ProviderError) -> Self {
        Self {
            kind: AgentErrorKind::Provider,
            message: value.message,
            phase: AgentErrorPhase::Answer,
            provider_kind: Some(value.kind),
        }
    }
}

impl From<MemoryError> for AgentError {
    fn from(value: MemoryError) -> Self {
        Self::new(
            AgentErrorKind::Store,
            AgentErrorPhase::Persistence,
            value.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_message_verbatim() {
        let error = AgentError::from(ProviderError::unavailable("Gemini API error 503"));

        assert_eq!(error.kind, AgentErrorKind::Provider);
        assert_eq!(error.message, "Gemini API error 503");
        assert_eq!(error.provider_kind, Some(ProviderErrorKind::Unavailable));
        assert_eq!(error.phase, AgentErrorPhase::Answer);
    }

    #[test]
    fn memory_errors_map_to_store_kind() {
        let error = AgentError::from(MemoryError::storage("disk full"));

        assert_eq!(error.kind, AgentErrorKind::Store);
        assert_eq!(error.to_string(), "Store: Storage: disk full");
    }
}
