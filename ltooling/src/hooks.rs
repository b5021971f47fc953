//! Hooks for tool invocation lifecycle events.
//!
//! ```rust
//! use ltooling::{NoopToolInvocationHooks, ToolInvocationHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ToolInvocationHooks) {}
//!
//! let hooks = NoopToolInvocationHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use lcommon::SessionId;

use crate::{ToolArguments, ToolError, ToolOutcome};

pub trait ToolInvocationHooks: Send + Sync {
    fn on_invocation_start(
        &self,
        _tool_name: &str,
        _session_id: &SessionId,
        _arguments: &ToolArguments,
    ) {
    }

    fn on_invocation_success(
        &self,
        _tool_name: &str,
        _session_id: &SessionId,
        _outcome: &ToolOutcome,
        _elapsed: Duration,
    ) {
    }

    fn on_invocation_failure(
        &self,
        _tool_name: &str,
        _session_id: &SessionId,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolInvocationHooks;

impl ToolInvocationHooks for NoopToolInvocationHooks {}
