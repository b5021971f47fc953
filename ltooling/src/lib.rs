//! Capability layer for registering and invoking tools.

mod args;
pub mod calendar;
mod error;
mod hooks;
mod invoke;
mod registry;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        FunctionTool, Tool, ToolArguments, ToolDefinition, ToolError, ToolErrorKind,
        ToolFuture, ToolInvoker, ToolOutcome, ToolRegistry, ToolRegistryBuilder,
    };
}

pub use args::{optional_string, optional_u64, parse_json_object, parse_json_value, required_string};
pub use calendar::{CalendarSearchTool, CalendarSource, InMemoryCalendar};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolInvocationHooks, ToolInvocationHooks};
pub use invoke::ToolInvoker;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{ToolArguments, ToolDefinition, ToolOutcome};
