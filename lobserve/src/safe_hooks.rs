use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use lagent::{AgentError, TurnHooks, TurnPhase, TurnResult};
use lcommon::SessionId;
use lprovider::{ProviderCallHooks, ProviderError, ProviderId, WirePayload};
use ltooling::{ToolArguments, ToolError, ToolInvocationHooks, ToolOutcome};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderCallHooks for SafeProviderHooks<H>
where
    H: ProviderCallHooks,
{
    fn on_attempt_start(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        payload: WirePayload,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_attempt_start(provider, operation, attempt, payload)
        }));
    }

    fn on_compat_fallback(&self, provider: ProviderId, operation: &str, error: &ProviderError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_compat_fallback(provider, operation, error)
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolInvocationHooks for SafeToolHooks<H>
where
    H: ToolInvocationHooks,
{
    fn on_invocation_start(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        arguments: &ToolArguments,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_invocation_start(tool_name, session_id, arguments)
        }));
    }

    fn on_invocation_success(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        outcome: &ToolOutcome,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_invocation_success(tool_name, session_id, outcome, elapsed)
        }));
    }

    fn on_invocation_failure(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_invocation_failure(tool_name, session_id, error, elapsed)
        }));
    }
}

pub struct SafeTurnHooks<H> {
    inner: H,
}

impl<H> SafeTurnHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> TurnHooks for SafeTurnHooks<H>
where
    H: TurnHooks,
{
    fn on_phase(&self, phase: TurnPhase, session_id: &SessionId) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_phase(phase, session_id)));
    }

    fn on_turn_complete(&self, session_id: &SessionId, result: &TurnResult, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_turn_complete(session_id, result, elapsed)
        }));
    }

    fn on_turn_failure(&self, session_id: &SessionId, error: &AgentError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_turn_failure(session_id, error, elapsed)
        }));
    }
}
