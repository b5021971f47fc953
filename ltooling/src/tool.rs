//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use ltooling::{FunctionTool, Tool, ToolDefinition, ToolOutcome};
//! use serde_json::Value;
//!
//! let tool = FunctionTool::new(
//!     ToolDefinition::new("echo", "Echoes its arguments"),
//!     |_session, args| async move { Ok(ToolOutcome::success(Value::Object(args))) },
//! );
//!
//! assert_eq!(tool.definition().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use lcommon::{BoxFuture, SessionId};

use crate::{ToolArguments, ToolDefinition, ToolError, ToolOutcome};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool. Implementations may report a soft failure through
    /// [`ToolOutcome::failure`] or a hard one through `Err`; callers treat both alike.
    fn invoke<'a>(
        &'a self,
        session_id: &'a SessionId,
        arguments: &'a ToolArguments,
    ) -> ToolFuture<'a, Result<ToolOutcome, ToolError>>;
}

type ToolHandler = dyn Fn(SessionId, ToolArguments) -> ToolFuture<'static, Result<ToolOutcome, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(SessionId, ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |session_id, arguments| Box::pin(handler(session_id, arguments)));

        Self {
            definition,
            handler,
        }
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn invoke<'a>(
        &'a self,
        session_id: &'a SessionId,
        arguments: &'a ToolArguments,
    ) -> ToolFuture<'a, Result<ToolOutcome, ToolError>> {
        (self.handler)(session_id.clone(), arguments.clone())
    }
}
