//! Turn request, result, and event types.

use std::fmt::{Display, Formatter};
use std::pin::Pin;

use futures_core::Stream;
use lcommon::SessionId;
use ltooling::ToolArguments;
use tokio_util::sync::CancellationToken;

use crate::AgentError;

#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub session_id: SessionId,
    pub user_input: String,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub cancellation: CancellationToken,
}

impl TurnRequest {
    pub fn new(session_id: impl Into<SessionId>, user_input: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_input: user_input.into(),
            model: None,
            max_tokens: None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// One tool run within a turn. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallLog {
    pub tool_name: String,
    pub arguments: ToolArguments,
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub session_id: SessionId,
    pub final_text: String,
    pub tool_calls: Vec<ToolCallLog>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    Fragment(String),
    Completed(TurnResult),
}

pub type TurnStream<'a> = Pin<Box<dyn Stream<Item = Result<TurnEvent, AgentError>> + Send + 'a>>;

/// Orchestrator states, in the order a successful turn visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Received,
    UserPersisted,
    ContextLoaded,
    Planned,
    ToolExecuted,
    Composed,
    Answered,
    AssistantPersisted,
    FactPersisted,
    Done,
}

impl TurnPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::UserPersisted => "user_persisted",
            Self::ContextLoaded => "context_loaded",
            Self::Planned => "planned",
            Self::ToolExecuted => "tool_executed",
            Self::Composed => "composed",
            Self::Answered => "answered",
            Self::AssistantPersisted => "assistant_persisted",
            Self::FactPersisted => "fact_persisted",
            Self::Done => "done",
        }
    }
}

impl Display for TurnPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
