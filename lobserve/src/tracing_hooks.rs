//! Tracing-based observability hooks for provider calls, tool invocations, and turn phases.
//!
//! ```rust
//! use lagent::TurnHooks;
//! use lobserve::TracingObservabilityHooks;
//!
//! fn accepts_turn_hooks(_hooks: &dyn TurnHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_turn_hooks(&hooks);
//! ```

use std::time::Duration;

use lagent::{AgentError, TurnHooks, TurnPhase, TurnResult};
use lcommon::SessionId;
use lprovider::{ProviderCallHooks, ProviderError, ProviderId, WirePayload};
use ltooling::{ToolArguments, ToolError, ToolInvocationHooks, ToolOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderCallHooks for TracingObservabilityHooks {
    fn on_attempt_start(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        payload: WirePayload,
    ) {
        tracing::debug!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt,
            payload = payload.as_str()
        );
    }

    fn on_compat_fallback(&self, provider: ProviderId, operation: &str, error: &ProviderError) {
        tracing::warn!(
            phase = "provider",
            event = "compat_fallback",
            provider = %provider,
            operation,
            status = error.status,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::debug!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            status = error.status,
            error = %error
        );
    }
}

impl ToolInvocationHooks for TracingObservabilityHooks {
    fn on_invocation_start(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        arguments: &ToolArguments,
    ) {
        tracing::info!(
            phase = "tool",
            event = "invocation_start",
            tool_name,
            session_id = %session_id,
            argument_count = arguments.len()
        );
    }

    fn on_invocation_success(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        outcome: &ToolOutcome,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "invocation_success",
            tool_name,
            session_id = %session_id,
            ok = outcome.ok,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_invocation_failure(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "invocation_failure",
            tool_name,
            session_id = %session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}

impl TurnHooks for TracingObservabilityHooks {
    fn on_phase(&self, phase: TurnPhase, session_id: &SessionId) {
        tracing::debug!(
            phase = "turn",
            event = "phase",
            turn_phase = %phase,
            session_id = %session_id
        );
    }

    fn on_turn_complete(&self, session_id: &SessionId, result: &TurnResult, elapsed: Duration) {
        tracing::info!(
            phase = "turn",
            event = "complete",
            session_id = %session_id,
            tool_calls = result.tool_calls.len(),
            answer_chars = result.final_text.chars().count(),
            finish_reason = result.finish_reason.as_deref(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_turn_failure(&self, session_id: &SessionId, error: &AgentError, elapsed: Duration) {
        if error.is_cancelled() {
            tracing::info!(
                phase = "turn",
                event = "cancelled",
                session_id = %session_id,
                turn_phase = ?error.phase,
                elapsed_ms = elapsed.as_millis() as u64
            );
            return;
        }

        tracing::error!(
            phase = "turn",
            event = "failure",
            session_id = %session_id,
            turn_phase = ?error.phase,
            error_kind = ?error.kind,
            elapsed_ms = elapsed.as_millis() as u64,
            error = %error
        );
    }
}
