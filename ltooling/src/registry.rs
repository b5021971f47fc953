//! Immutable tool registry keyed by case-insensitive tool name.
//!
//! ```rust
//! use ltooling::{ToolDefinition, ToolOutcome, ToolRegistry};
//! use serde_json::json;
//!
//! let registry = ToolRegistry::builder()
//!     .register_fn(ToolDefinition::new("clock.now", "Current time"), |_session, _args| async {
//!         Ok(ToolOutcome::success(json!({"now": "12:00"})))
//!     })
//!     .build();
//!
//! assert!(registry.get("CLOCK.NOW").is_some());
//! assert_eq!(registry.len(), 1);
//! ```

use std::future::Future;
use std::sync::Arc;

use lcommon::{Registry, SessionId};

use crate::{FunctionTool, Tool, ToolArguments, ToolDefinition, ToolError, ToolOutcome};

#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tool`. A later registration under the same case-insensitive name
    /// replaces the earlier one.
    pub fn register<T>(self, tool: T) -> Self
    where
        T: Tool + 'static,
    {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        let name = tool.definition().name;
        if self.tools.insert(registry_key(&name), tool).is_some() {
            tracing::warn!(tool_name = %name, "tool registration replaced an earlier tool");
        }
        self
    }

    pub fn register_fn<F, Fut>(self, definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(SessionId, ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler))
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(registry_key(name).as_str()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(registry_key(name).as_str())
    }

    /// Every registered tool, ordered by name.
    pub fn all(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<(String, Arc<dyn Tool>)> = self
            .tools
            .values()
            .map(|tool| (tool.definition().name, Arc::clone(tool)))
            .collect();
        tools.sort_by(|left, right| left.0.cmp(&right.0));
        tools.into_iter().map(|(_, tool)| tool).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.all().iter().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn registry_key(name: &str) -> String {
    name.trim().to_lowercase()
}
