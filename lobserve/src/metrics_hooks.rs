//! Metrics-based observability hooks for provider calls, tool invocations, and turns.
//!
//! ```rust
//! use lobserve::MetricsObservabilityHooks;
//! use lprovider::ProviderCallHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderCallHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use lagent::{AgentError, TurnHooks, TurnPhase, TurnResult};
use lcommon::SessionId;
use lprovider::{ProviderCallHooks, ProviderError, ProviderId, WirePayload};
use ltooling::{ToolArguments, ToolError, ToolInvocationHooks, ToolOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderCallHooks for MetricsObservabilityHooks {
    fn on_attempt_start(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        payload: WirePayload,
    ) {
        metrics::counter!(
            "loquat_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "payload" => payload.as_str()
        )
        .increment(1);
    }

    fn on_compat_fallback(&self, provider: ProviderId, operation: &str, _error: &ProviderError) {
        metrics::counter!(
            "loquat_provider_compat_fallback_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::counter!(
            "loquat_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "loquat_provider_attempts_per_success",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "loquat_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}

impl ToolInvocationHooks for MetricsObservabilityHooks {
    fn on_invocation_start(
        &self,
        tool_name: &str,
        _session_id: &SessionId,
        _arguments: &ToolArguments,
    ) {
        metrics::counter!(
            "loquat_tool_invocation_start_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }

    fn on_invocation_success(
        &self,
        tool_name: &str,
        _session_id: &SessionId,
        _outcome: &ToolOutcome,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "loquat_tool_invocation_success_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "loquat_tool_invocation_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_invocation_failure(
        &self,
        tool_name: &str,
        _session_id: &SessionId,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "loquat_tool_invocation_failure_total",
            "tool_name" => tool_name.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "loquat_tool_invocation_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl TurnHooks for MetricsObservabilityHooks {
    fn on_phase(&self, phase: TurnPhase, _session_id: &SessionId) {
        metrics::counter!("loquat_turn_phase_total", "phase" => phase.as_str()).increment(1);
    }

    fn on_turn_complete(&self, _session_id: &SessionId, result: &TurnResult, elapsed: Duration) {
        metrics::counter!("loquat_turn_success_total").increment(1);
        metrics::histogram!("loquat_turn_duration_seconds", "status" => "success")
            .record(elapsed.as_secs_f64());
        metrics::histogram!("loquat_turn_tool_calls").record(result.tool_calls.len() as f64);
    }

    fn on_turn_failure(&self, _session_id: &SessionId, error: &AgentError, elapsed: Duration) {
        metrics::counter!(
            "loquat_turn_failure_total",
            "error_kind" => format!("{:?}", error.kind),
            "phase" => format!("{:?}", error.phase)
        )
        .increment(1);
        metrics::histogram!("loquat_turn_duration_seconds", "status" => "failure")
            .record(elapsed.as_secs_f64());
    }
}
