//! Unified facade over the loquat workspace crates.
//!
//! This crate is the single dependency for most applications. It re-exports
//! the core crates and wires configuration, providers, tools, and the
//! console loop into a runnable agent.
//!
//! ```rust
//! use loquat::config::LoquatConfig;
//! use loquat::runtime::build_runtime;
//!
//! let runtime = build_runtime(&LoquatConfig::default()).expect("defaults are valid");
//! assert!(runtime.orchestrator.tools().contains("calendar.search"));
//! ```

pub mod config;
pub mod console;
pub mod prelude;
pub mod providers;
pub mod runtime;

pub use lagent;
pub use lcommon;
pub use lmemory;
pub use lobserve;
pub use lprovider;
pub use ltooling;

pub use lagent::{
    AgentError, AgentErrorKind, AgentErrorPhase, CancellationToken, ExecutionPlan, IntentRouter,
    LlmIntentRouter, ToolCallLog, TurnEvent, TurnHooks, TurnOrchestrator,
    TurnOrchestratorBuilder, TurnPhase, TurnRequest, TurnResult, TurnStream,
};
pub use lcommon::{BoxFuture, SessionId};
pub use lmemory::{
    InMemoryTranscriptStore, MemoryError, MemoryErrorKind, TranscriptEntry, TranscriptStore,
};
pub use lprovider::{
    ChatProvider, ChatRequest, ChatResponse, Message, ProviderError, ProviderErrorKind,
    ProviderId, Role, StaticReplyProvider,
};
pub use ltooling::{
    CalendarSearchTool, FunctionTool, InMemoryCalendar, Tool, ToolArguments, ToolDefinition,
    ToolError, ToolErrorKind, ToolOutcome, ToolRegistry,
};

pub use config::{ConfigError, ConfigErrorKind, LoquatConfig};
pub use console::{ConsoleOptions, TurnInterrupt, run_repl};
pub use providers::build_provider;
pub use runtime::{RuntimeBundle, build_orchestrator, build_runtime, default_tools};
