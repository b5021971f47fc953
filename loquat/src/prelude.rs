//! Common imports for most loquat applications.

pub use crate::{
    AgentError, CancellationToken, ChatProvider, ConfigError, ConsoleOptions, LoquatConfig,
    Message, ProviderError, Role, RuntimeBundle, SessionId, Tool, ToolDefinition, ToolOutcome,
    ToolRegistry, TranscriptStore, TurnEvent, TurnOrchestrator, TurnRequest, TurnResult,
    build_orchestrator, build_provider, build_runtime, default_tools, run_repl,
};
