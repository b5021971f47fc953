//! Hooks for turn lifecycle events.
//!
//! ```rust
//! use lagent::{NoopTurnHooks, TurnHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn TurnHooks) {}
//!
//! let hooks = NoopTurnHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use lcommon::SessionId;

use crate::{AgentError, TurnPhase, TurnResult};

pub trait TurnHooks: Send + Sync {
    fn on_phase(&self, _phase: TurnPhase, _session_id: &SessionId) {}

    fn on_turn_complete(&self, _session_id: &SessionId, _result: &TurnResult, _elapsed: Duration) {}

    fn on_turn_failure(&self, _session_id: &SessionId, _error: &AgentError, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTurnHooks;

impl TurnHooks for NoopTurnHooks {}
