//! Runtime wiring from configuration to a ready [`TurnOrchestrator`].

use std::sync::Arc;

use lagent::TurnOrchestrator;
use lmemory::{InMemoryTranscriptStore, TranscriptStore};
use lobserve::{SafeProviderHooks, SafeToolHooks, SafeTurnHooks, TracingObservabilityHooks};
use lprovider::ChatProvider;
use ltooling::{CalendarSearchTool, InMemoryCalendar, ToolRegistry};

use crate::config::{ConfigError, LoquatConfig};
use crate::providers::build_provider;

#[derive(Clone)]
pub struct RuntimeBundle {
    pub store: Arc<dyn TranscriptStore>,
    pub orchestrator: TurnOrchestrator,
}

pub fn in_memory_store() -> Arc<dyn TranscriptStore> {
    Arc::new(InMemoryTranscriptStore::new())
}

/// Registry holding the calendar search tool over `calendar`.
pub fn default_tools(calendar: InMemoryCalendar) -> ToolRegistry {
    ToolRegistry::builder()
        .register(CalendarSearchTool::new(calendar))
        .build()
}

pub fn build_orchestrator(
    config: &LoquatConfig,
    provider: Arc<dyn ChatProvider>,
    store: Arc<dyn TranscriptStore>,
    tools: Arc<ToolRegistry>,
) -> TurnOrchestrator {
    let mut builder = TurnOrchestrator::builder(provider, store, tools)
        .history_window(config.history_window)
        .model(config.model.clone())
        .hooks(Arc::new(SafeTurnHooks::new(TracingObservabilityHooks)))
        .tool_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)));
    if let Some(max_tokens) = config.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    builder.build()
}

/// Validates `config` and wires provider, in-memory store, and tools.
pub fn build_runtime(config: &LoquatConfig) -> Result<RuntimeBundle, ConfigError> {
    config.validate()?;

    let provider = build_provider(
        config,
        Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)),
    )?;
    let calendar = InMemoryCalendar::new(config.calendar_events()?);
    let store = in_memory_store();
    let orchestrator = build_orchestrator(
        config,
        provider,
        Arc::clone(&store),
        Arc::new(default_tools(calendar)),
    );

    Ok(RuntimeBundle {
        store,
        orchestrator,
    })
}

#[cfg(test)]
mod tests {
    use lagent::TurnRequest;
    use lcommon::SessionId;
    use lmemory::TranscriptEntry;

    use super::*;
    use crate::config::ConfigErrorKind;

    #[tokio::test]
    async fn runtime_without_key_answers_with_static_reply_and_persists() {
        let runtime = build_runtime(&LoquatConfig::default()).expect("runtime should build");

        let result = runtime
            .orchestrator
            .handle(TurnRequest::new("session-1", "hello"))
            .await
            .expect("turn should succeed");

        assert!(result.final_text.starts_with("[Fallback] "));
        let transcript = runtime
            .store
            .recent(&SessionId::from("session-1"), 10)
            .await
            .expect("transcript should load");
        assert_eq!(
            transcript,
            vec![
                TranscriptEntry::new("user", "hello"),
                TranscriptEntry::new("assistant", result.final_text.clone()),
            ]
        );
    }

    #[test]
    fn runtime_registers_calendar_tool() {
        let runtime = build_runtime(&LoquatConfig::default()).expect("runtime should build");

        assert!(runtime.orchestrator.tools().contains("calendar.search"));
        assert_eq!(runtime.orchestrator.history_window(), 40);
    }

    #[test]
    fn invalid_config_is_rejected_before_wiring() {
        let config = LoquatConfig {
            max_tokens: Some(0),
            ..LoquatConfig::default()
        };

        let error = build_runtime(&config)
            .err()
            .expect("config should be rejected");
        assert_eq!(error.kind, ConfigErrorKind::Invalid);
    }
}
