//! Turn orchestration for blocking and streaming turns.
//!
//! A turn persists the user input first, plans, optionally runs one tool,
//! answers, and only then persists the assistant reply and any fact. A
//! provider failure or cancellation during answering leaves the transcript
//! holding just the user input.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_stream::{stream, try_stream};
use futures_util::StreamExt;
use lcommon::{SessionId, truncate_for_log};
use lmemory::TranscriptStore;
use lprovider::{ChatProvider, ChatRequest};
use ltooling::{ToolInvocationHooks, ToolInvoker, ToolRegistry};
use tokio_util::sync::CancellationToken;

use crate::{
    AgentError, AgentErrorPhase, ExecutionPlan, IntentRouter, LlmIntentRouter, NoopTurnHooks,
    PlanningContext, ToolCallLog, TurnEvent, TurnHooks, TurnPhase, TurnRequest, TurnResult,
    TurnStream, compose_answer_messages,
};

pub const DEFAULT_HISTORY_WINDOW: usize = 40;
const USER_ROLE: &str = "user";
const ASSISTANT_ROLE: &str = "assistant";

pub struct TurnOrchestratorBuilder {
    provider: Arc<dyn ChatProvider>,
    store: Arc<dyn TranscriptStore>,
    tools: Arc<ToolRegistry>,
    router: Option<Arc<dyn IntentRouter>>,
    hooks: Arc<dyn TurnHooks>,
    tool_hooks: Option<Arc<dyn ToolInvocationHooks>>,
    tool_timeout: Option<Duration>,
    history_window: usize,
    max_tokens: Option<u32>,
    model: Option<String>,
}

impl TurnOrchestratorBuilder {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        store: Arc<dyn TranscriptStore>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            store,
            tools,
            router: None,
            hooks: Arc::new(NoopTurnHooks),
            tool_hooks: None,
            tool_timeout: None,
            history_window: DEFAULT_HISTORY_WINDOW,
            max_tokens: None,
            model: None,
        }
    }

    pub fn router(mut self, router: Arc<dyn IntentRouter>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn TurnHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolInvocationHooks>) -> Self {
        self.tool_hooks = Some(hooks);
        self
    }

    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    pub fn history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = Some(model);
        }
        self
    }

    pub fn build(self) -> TurnOrchestrator {
        let router = self.router.unwrap_or_else(|| {
            let router = LlmIntentRouter::new(Arc::clone(&self.provider));
            let router: Arc<dyn IntentRouter> = Arc::new(match &self.model {
                Some(model) => router.with_model(model.clone()),
                None => router,
            });
            router
        });

        let mut invoker = ToolInvoker::new(Arc::clone(&self.tools));
        if let Some(hooks) = self.tool_hooks {
            invoker = invoker.with_hooks(hooks);
        }
        if let Some(timeout) = self.tool_timeout {
            invoker = invoker.with_timeout(timeout);
        }

        TurnOrchestrator {
            provider: self.provider,
            store: self.store,
            tools: self.tools,
            invoker,
            router,
            hooks: self.hooks,
            history_window: self.history_window,
            max_tokens: self.max_tokens,
            model: self.model,
        }
    }
}

#[derive(Clone)]
pub struct TurnOrchestrator {
    provider: Arc<dyn ChatProvider>,
    store: Arc<dyn TranscriptStore>,
    tools: Arc<ToolRegistry>,
    invoker: ToolInvoker,
    router: Arc<dyn IntentRouter>,
    hooks: Arc<dyn TurnHooks>,
    history_window: usize,
    max_tokens: Option<u32>,
    model: Option<String>,
}

struct PreparedTurn {
    session_id: SessionId,
    plan: ExecutionPlan,
    tool_calls: Vec<ToolCallLog>,
    chat_request: ChatRequest,
    cancellation: CancellationToken,
}

impl TurnOrchestrator {
    pub fn builder(
        provider: Arc<dyn ChatProvider>,
        store: Arc<dyn TranscriptStore>,
        tools: Arc<ToolRegistry>,
    ) -> TurnOrchestratorBuilder {
        TurnOrchestratorBuilder::new(provider, store, tools)
    }

    pub fn tools(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.tools)
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Runs one turn and returns once the reply and any fact are persisted.
    pub async fn handle(&self, request: TurnRequest) -> Result<TurnResult, AgentError> {
        let started_at = Instant::now();
        let session_id = request.session_id.clone();

        let result = self.handle_turn(request).await;
        match &result {
            Ok(turn) => self
                .hooks
                .on_turn_complete(&session_id, turn, started_at.elapsed()),
            Err(error) => self.report_failure(&session_id, error, started_at.elapsed()),
        }
        result
    }

    /// Streams reply fragments as they arrive, then one
    /// [`TurnEvent::Completed`] after persistence. A cancelled or failed
    /// stream persists nothing for the assistant.
    pub fn stream(&self, request: TurnRequest) -> TurnStream<'_> {
        Box::pin(stream! {
            let started_at = Instant::now();
            let session_id = request.session_id.clone();
            let mut events = self.stream_turn(request);

            while let Some(event) = events.next().await {
                match &event {
                    Ok(TurnEvent::Completed(turn)) => self
                        .hooks
                        .on_turn_complete(&session_id, turn, started_at.elapsed()),
                    Err(error) => self.report_failure(&session_id, error, started_at.elapsed()),
                    Ok(TurnEvent::Fragment(_)) => {}
                }
                yield event;
            }
        })
    }

    async fn handle_turn(&self, request: TurnRequest) -> Result<TurnResult, AgentError> {
        let prepared = self.prepare(request).await?;

        let response = prepared
            .cancellation
            .run_until_cancelled(self.provider.complete(prepared.chat_request.clone()))
            .await
            .ok_or_else(|| AgentError::cancelled(AgentErrorPhase::Answer))??;
        self.enter(TurnPhase::Answered, &prepared.session_id);

        self.finish(prepared, response.text, response.finish_reason)
            .await
    }

    fn stream_turn(&self, request: TurnRequest) -> TurnStream<'_> {
        Box::pin(try_stream! {
            let prepared = self.prepare(request).await?;
            let cancellation = prepared.cancellation.clone();

            let mut fragments = cancellation
                .run_until_cancelled(self.provider.stream(prepared.chat_request.clone()))
                .await
                .ok_or_else(|| AgentError::cancelled(AgentErrorPhase::Streaming))?
                .map_err(|error| AgentError::from(error).with_phase(AgentErrorPhase::Streaming))?;

            let mut buffer = String::new();
            loop {
                let fragment = match cancellation.run_until_cancelled(fragments.next()).await {
                    Some(Some(fragment)) => fragment.map_err(|error| {
                        AgentError::from(error).with_phase(AgentErrorPhase::Streaming)
                    })?,
                    Some(None) => break,
                    None => Err::<String, AgentError>(AgentError::cancelled(
                        AgentErrorPhase::Streaming,
                    ))?,
                };

                buffer.push_str(&fragment);
                yield TurnEvent::Fragment(fragment);
            }
            self.enter(TurnPhase::Answered, &prepared.session_id);

            let turn = self.finish(prepared, buffer, None).await?;
            yield TurnEvent::Completed(turn);
        })
    }

    async fn prepare(&self, request: TurnRequest) -> Result<PreparedTurn, AgentError> {
        let TurnRequest {
            session_id,
            user_input,
            model,
            max_tokens,
            cancellation,
        } = request;

        if session_id.is_blank() {
            return Err(AgentError::invalid_request("session_id must not be empty"));
        }
        if user_input.trim().is_empty() {
            return Err(AgentError::invalid_request("user_input must not be empty"));
        }
        if cancellation.is_cancelled() {
            return Err(AgentError::cancelled(AgentErrorPhase::Validation));
        }
        self.enter(TurnPhase::Received, &session_id);

        let input_position = self
            .store
            .append(&session_id, USER_ROLE, &user_input)
            .await?;
        self.enter(TurnPhase::UserPersisted, &session_id);

        let history = self
            .store
            .before(&session_id, input_position, self.history_window)
            .await?;
        self.enter(TurnPhase::ContextLoaded, &session_id);

        let plan = cancellation
            .run_until_cancelled(self.router.plan(PlanningContext {
                session_id: &session_id,
                user_input: &user_input,
                recent: &history,
                tools: &self.tools,
            }))
            .await
            .ok_or_else(|| AgentError::cancelled(AgentErrorPhase::Planning))?;
        tracing::debug!(
            session_id = %session_id,
            requires_tool = plan.requires_tool(),
            tool_name = ?plan.tool_name(),
            should_write_memory = plan.should_write_memory(),
            "intent plan"
        );
        self.enter(TurnPhase::Planned, &session_id);

        let mut tool_calls = Vec::new();
        let mut tool_payload = None;
        if let Some(call) = &plan.tool {
            let outcome = cancellation
                .run_until_cancelled(self.invoker.invoke(&call.name, &session_id, &call.parameters))
                .await
                .ok_or_else(|| AgentError::cancelled(AgentErrorPhase::ToolExecution))?;
            tracing::debug!(
                session_id = %session_id,
                tool_name = %call.name,
                ok = outcome.ok,
                "tool executed"
            );

            tool_payload = Some(outcome.prompt_payload());
            tool_calls.push(ToolCallLog {
                tool_name: call.name.clone(),
                arguments: call.parameters.clone(),
                ok: outcome.ok,
                error: outcome.error,
            });
            self.enter(TurnPhase::ToolExecuted, &session_id);
        }

        let messages = compose_answer_messages(&history, &user_input, tool_payload.as_ref());
        if tracing::enabled!(tracing::Level::TRACE) {
            for message in &messages {
                tracing::trace!(
                    session_id = %session_id,
                    role = %message.role,
                    content = %truncate_for_log(&message.content, 200),
                    "answer prompt message"
                );
            }
        }
        let chat_request = ChatRequest::new(messages)
            .with_optional_model(model.or_else(|| self.model.clone()))
            .with_optional_max_tokens(max_tokens.or(self.max_tokens));
        self.enter(TurnPhase::Composed, &session_id);

        Ok(PreparedTurn {
            session_id,
            plan,
            tool_calls,
            chat_request,
            cancellation,
        })
    }

    async fn finish(
        &self,
        prepared: PreparedTurn,
        final_text: String,
        finish_reason: Option<String>,
    ) -> Result<TurnResult, AgentError> {
        let PreparedTurn {
            session_id,
            plan,
            tool_calls,
            ..
        } = prepared;

        tracing::debug!(
            session_id = %session_id,
            answer = %truncate_for_log(&final_text, 300),
            "assistant answer"
        );

        self.store
            .append(&session_id, ASSISTANT_ROLE, &final_text)
            .await?;
        self.enter(TurnPhase::AssistantPersisted, &session_id);

        if let Some(note) = &plan.memory_note {
            self.store.add_fact(&session_id, note).await?;
            self.enter(TurnPhase::FactPersisted, &session_id);
        }
        self.enter(TurnPhase::Done, &session_id);

        Ok(TurnResult {
            session_id,
            final_text,
            tool_calls,
            finish_reason,
        })
    }

    fn enter(&self, phase: TurnPhase, session_id: &SessionId) {
        tracing::trace!(session_id = %session_id, phase = phase.as_str(), "turn phase");
        self.hooks.on_phase(phase, session_id);
    }

    fn report_failure(&self, session_id: &SessionId, error: &AgentError, elapsed: Duration) {
        if error.is_cancelled() {
            tracing::info!(session_id = %session_id, phase = ?error.phase, "turn cancelled");
        } else {
            tracing::warn!(
                session_id = %session_id,
                kind = ?error.kind,
                phase = ?error.phase,
                error = %error.message,
                "turn failed"
            );
        }
        self.hooks.on_turn_failure(session_id, error, elapsed);
    }
}
