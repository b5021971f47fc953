//! Two-attempt compatibility fallback policy and operational hook contracts.
//!
//! A provider call is first attempted with the [`WirePayload::Standard`] shape. Only when
//! that attempt fails with a [`ProviderErrorKind::Compatibility`](crate::ProviderErrorKind)
//! rejection is it attempted once more with [`WirePayload::Degraded`]. There is never a
//! third attempt.

use std::future::Future;

use crate::{ProviderError, ProviderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WirePayload {
    /// System text travels through the backend's dedicated instruction channel.
    Standard,
    /// System text is injected as a leading user turn and the instruction channel is omitted.
    Degraded,
}

impl WirePayload {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Degraded => "degraded",
        }
    }
}

pub trait ProviderCallHooks: Send + Sync {
    fn on_attempt_start(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _payload: WirePayload,
    ) {
    }

    fn on_compat_fallback(&self, _provider: ProviderId, _operation: &str, _error: &ProviderError) {}

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {}

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProviderHooks;

impl ProviderCallHooks for NoopProviderHooks {}

pub async fn call_with_compat_fallback<T, Op, OpFuture>(
    provider: ProviderId,
    operation: &str,
    hooks: &dyn ProviderCallHooks,
    mut attempt: Op,
) -> Result<T, ProviderError>
where
    Op: FnMut(WirePayload) -> OpFuture,
    OpFuture: Future<Output = Result<T, ProviderError>>,
{
    hooks.on_attempt_start(provider, operation, 1, WirePayload::Standard);
    let error = match attempt(WirePayload::Standard).await {
        Ok(value) => {
            hooks.on_success(provider, operation, 1);
            return Ok(value);
        }
        Err(error) => error,
    };

    if !error.is_compatibility_rejection() {
        hooks.on_failure(provider, operation, 1, &error);
        return Err(error);
    }

    tracing::warn!(
        provider = %provider,
        operation,
        status = error.status,
        "backend rejected system instruction channel; retrying with degraded payload"
    );
    hooks.on_compat_fallback(provider, operation, &error);
    hooks.on_attempt_start(provider, operation, 2, WirePayload::Degraded);

    match attempt(WirePayload::Degraded).await {
        Ok(value) => {
            hooks.on_success(provider, operation, 2);
            Ok(value)
        }
        Err(error) => {
            hooks.on_failure(provider, operation, 2, &error);
            Err(error)
        }
    }
}
