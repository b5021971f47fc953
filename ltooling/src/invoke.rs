//! Registry-backed tool invocation that never fails the caller.
//!
//! Every failure mode (unknown tool, tool error, panic, timeout) is folded
//! into a negative [`ToolOutcome`] so a turn always has a payload to show the
//! model.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::FutureExt;
use futures_util::future::{Either, select};
use lcommon::SessionId;

use crate::{
    NoopToolInvocationHooks, ToolArguments, ToolError, ToolInvocationHooks, ToolOutcome,
    ToolRegistry,
};

#[derive(Clone)]
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolInvocationHooks>,
    timeout: Option<Duration>,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolInvocationHooks),
            timeout: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolInvocationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    /// Runs `tool_name`, converting any failure into `ok = false`.
    pub async fn invoke(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        arguments: &ToolArguments,
    ) -> ToolOutcome {
        match self.try_invoke(tool_name, session_id, arguments).await {
            Ok(outcome) => outcome,
            Err(error) => ToolOutcome::from(error),
        }
    }

    /// Runs `tool_name`; soft failures reported by the tool stay `Ok`.
    pub async fn try_invoke(
        &self,
        tool_name: &str,
        session_id: &SessionId,
        arguments: &ToolArguments,
    ) -> Result<ToolOutcome, ToolError> {
        let tool = self.registry.get(tool_name).ok_or_else(|| {
            ToolError::not_found(format!("tool '{tool_name}' is not registered"))
                .with_tool_name(tool_name)
        })?;

        self.hooks
            .on_invocation_start(tool_name, session_id, arguments);
        let started_at = Instant::now();

        let guarded = AssertUnwindSafe(tool.invoke(session_id, arguments)).catch_unwind();
        let result = match self.timeout {
            Some(limit) => match select(Box::pin(guarded), Delay::new(limit)).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => Ok(Err(ToolError::timeout(format!(
                    "tool '{tool_name}' did not finish within {}ms",
                    limit.as_millis()
                )))),
            },
            None => guarded.await,
        };

        let result = match result {
            Ok(result) => result,
            Err(payload) => Err(ToolError::panicked(format!(
                "tool '{tool_name}' panicked: {}",
                panic_message(payload.as_ref())
            ))),
        };
        let elapsed = started_at.elapsed();

        match result {
            Ok(outcome) if outcome.ok => {
                self.hooks
                    .on_invocation_success(tool_name, session_id, &outcome, elapsed);
                Ok(outcome)
            }
            Ok(outcome) => {
                let error = ToolError::execution(outcome.error.clone().unwrap_or_default())
                    .with_tool_name(tool_name);
                self.hooks
                    .on_invocation_failure(tool_name, session_id, &error, elapsed);
                Ok(outcome)
            }
            Err(error) => {
                let error = error.with_tool_name(tool_name);
                tracing::warn!(
                    tool_name,
                    session_id = %session_id,
                    kind = ?error.kind,
                    error = %error.message,
                    "tool invocation failed"
                );
                self.hooks
                    .on_invocation_failure(tool_name, session_id, &error, elapsed);
                Err(error)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::{Tool, ToolDefinition, ToolErrorKind, ToolFuture};

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl ToolInvocationHooks for RecordingHooks {
        fn on_invocation_start(&self, tool_name: &str, _: &SessionId, _: &ToolArguments) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{tool_name}"));
        }

        fn on_invocation_success(&self, tool_name: &str, _: &SessionId, _: &ToolOutcome, _: Duration) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("success:{tool_name}"));
        }

        fn on_invocation_failure(&self, tool_name: &str, _: &SessionId, error: &ToolError, _: Duration) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("failure:{tool_name}:{:?}", error.kind));
        }
    }

    struct PanickingTool;

    impl Tool for PanickingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("panics", "Always panics")
        }

        fn invoke<'a>(
            &'a self,
            _session_id: &'a SessionId,
            _arguments: &'a ToolArguments,
        ) -> ToolFuture<'a, Result<ToolOutcome, ToolError>> {
            Box::pin(async move { explode() })
        }
    }

    fn explode() -> Result<ToolOutcome, ToolError> {
        panic!("calendar backend exploded")
    }

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(
            ToolRegistry::builder()
                .register_fn(ToolDefinition::new("echo", "Echoes"), |session, args| async move {
                    Ok(ToolOutcome::success(json!({
                        "session": session.as_str(),
                        "args": args,
                    })))
                })
                .register_fn(ToolDefinition::new("broken", "Fails"), |_session, _args| async {
                    Err(ToolError::execution("tool exploded"))
                })
                .register_fn(ToolDefinition::new("soft", "Soft failure"), |_session, _args| async {
                    Ok(ToolOutcome::failure("no results"))
                })
                .register_fn(ToolDefinition::new("slow", "Sleeps"), |_session, _args| async {
                    Delay::new(Duration::from_secs(5)).await;
                    Ok(ToolOutcome::success(json!(null)))
                })
                .register(PanickingTool)
                .build(),
        )
    }

    #[tokio::test]
    async fn invokes_registered_tool_with_session_and_arguments() {
        let hooks = Arc::new(RecordingHooks::default());
        let invoker = ToolInvoker::new(registry()).with_hooks(hooks.clone());
        let args = json!({"query": "q"}).as_object().cloned().expect("object");

        let outcome = invoker.invoke("ECHO", &SessionId::from("s1"), &args).await;

        assert!(outcome.ok);
        assert_eq!(
            outcome.data,
            Some(json!({"session": "s1", "args": {"query": "q"}}))
        );
        assert_eq!(
            hooks.events.lock().expect("events lock").clone(),
            vec!["start:ECHO".to_string(), "success:ECHO".to_string()]
        );
    }

    #[tokio::test]
    async fn unknown_tool_becomes_negative_outcome() {
        let invoker = ToolInvoker::new(registry());

        let error = invoker
            .try_invoke("missing", &SessionId::from("s1"), &ToolArguments::new())
            .await
            .expect_err("missing tool should fail");
        assert_eq!(error.kind, ToolErrorKind::NotFound);

        let outcome = invoker
            .invoke("missing", &SessionId::from("s1"), &ToolArguments::new())
            .await;
        assert!(!outcome.ok);
        assert_eq!(outcome.error.as_deref(), Some("tool 'missing' is not registered"));
    }

    #[tokio::test]
    async fn tool_error_and_soft_failure_are_reported_as_not_ok() {
        let hooks = Arc::new(RecordingHooks::default());
        let invoker = ToolInvoker::new(registry()).with_hooks(hooks.clone());
        let session = SessionId::from("s1");

        let broken = invoker.invoke("broken", &session, &ToolArguments::new()).await;
        assert!(!broken.ok);
        assert_eq!(broken.error.as_deref(), Some("tool exploded"));

        let soft = invoker.invoke("soft", &session, &ToolArguments::new()).await;
        assert!(!soft.ok);
        assert_eq!(soft.error.as_deref(), Some("no results"));

        let events = hooks.events.lock().expect("events lock").clone();
        assert!(events.contains(&"failure:broken:Execution".to_string()));
        assert!(events.contains(&"failure:soft:Execution".to_string()));
    }

    #[tokio::test]
    async fn panicking_tool_is_contained() {
        let invoker = ToolInvoker::new(registry());

        let error = invoker
            .try_invoke("panics", &SessionId::from("s1"), &ToolArguments::new())
            .await
            .expect_err("panic should surface as error");

        assert_eq!(error.kind, ToolErrorKind::Panicked);
        assert!(error.message.contains("calendar backend exploded"));
    }

    #[tokio::test]
    async fn slow_tool_times_out() {
        let invoker = ToolInvoker::new(registry()).with_timeout(Duration::from_millis(20));

        let error = invoker
            .try_invoke("slow", &SessionId::from("s1"), &ToolArguments::new())
            .await
            .expect_err("slow tool should time out");

        assert_eq!(error.kind, ToolErrorKind::Timeout);
        assert_eq!(error.tool_name.as_deref(), Some("slow"));
    }
}
