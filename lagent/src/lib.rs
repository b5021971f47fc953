//! Intent routing and turn orchestration over providers, tools, and memory.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lagent::{TurnOrchestrator, TurnRequest};
//! use lmemory::InMemoryTranscriptStore;
//! use lprovider::StaticReplyProvider;
//! use ltooling::ToolRegistry;
//!
//! let orchestrator = TurnOrchestrator::builder(
//!     Arc::new(StaticReplyProvider::new("offline")),
//!     Arc::new(InMemoryTranscriptStore::new()),
//!     Arc::new(ToolRegistry::empty()),
//! )
//! .history_window(20)
//! .build();
//!
//! let request = TurnRequest::new("session-1", "hello").with_max_tokens(256);
//! assert_eq!(orchestrator.history_window(), 20);
//! assert_eq!(request.max_tokens, Some(256));
//! ```

mod error;
mod hooks;
mod orchestrator;
mod prompt;
mod router;
mod types;

pub mod prelude {
    pub use crate::{
        AgentError, AgentErrorKind, AgentErrorPhase, ExecutionPlan, IntentRouter,
        LlmIntentRouter, ToolCallLog, TurnEvent, TurnOrchestrator, TurnRequest, TurnResult,
        TurnStream,
    };
    pub use tokio_util::sync::CancellationToken;
}

pub use error::{AgentError, AgentErrorKind, AgentErrorPhase};
pub use hooks::{NoopTurnHooks, TurnHooks};
pub use orchestrator::{DEFAULT_HISTORY_WINDOW, TurnOrchestrator, TurnOrchestratorBuilder};
pub use prompt::{ANSWER_SYSTEM_PROMPT, TOOL_RESULT_PREAMBLE, compose_answer_messages};
pub use router::{
    ExecutionPlan, IntentRouter, LlmIntentRouter, PLANNER_INSTRUCTION, PLANNER_SYSTEM_PROMPT,
    PlannedToolCall, PlanningContext, extract_json_object, parse_plan,
};
pub use types::{ToolCallLog, TurnEvent, TurnPhase, TurnRequest, TurnResult, TurnStream};
pub use tokio_util::sync::CancellationToken;
