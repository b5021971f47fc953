//! Intent routing: one planning call to the model, then a plan normalized
//! against the tool registry.
//!
//! ```rust
//! use lagent::parse_plan;
//! use ltooling::ToolRegistry;
//!
//! let plan = parse_plan(
//!     r#"Sure! {"requiresTool": true, "toolName": "x.search", "parameters": {"query": "q"}}"#,
//!     &ToolRegistry::empty(),
//! );
//!
//! assert!(!plan.requires_tool());
//! ```

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use lcommon::{BoxFuture, SessionId};
use lmemory::TranscriptEntry;
use lprovider::{ChatProvider, ChatRequest, Message, ProviderError};
use ltooling::{ToolArguments, ToolRegistry};
use serde::Deserialize;
use serde_json::json;

pub const PLANNER_SYSTEM_PROMPT: &str =
    "You plan actions for an agent. Respond with STRICT JSON only.";
pub const PLANNER_INSTRUCTION: &str =
    "Decide if a tool is needed; if yes, pick one and build parameters.";

pub struct PlanningContext<'a> {
    pub session_id: &'a SessionId,
    pub user_input: &'a str,
    pub recent: &'a [TranscriptEntry],
    pub tools: &'a ToolRegistry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedToolCall {
    /// Registered (canonical) tool name.
    pub name: String,
    pub parameters: ToolArguments,
}

/// A plan that has already been checked against the registry. `tool` is only
/// set for a registered tool and `memory_note` only for a non-blank note the
/// model asked to keep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionPlan {
    pub tool: Option<PlannedToolCall>,
    pub memory_note: Option<String>,
}

impl ExecutionPlan {
    pub fn no_action() -> Self {
        Self::default()
    }

    pub fn requires_tool(&self) -> bool {
        self.tool.is_some()
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_ref().map(|tool| tool.name.as_str())
    }

    pub fn should_write_memory(&self) -> bool {
        self.memory_note.is_some()
    }
}

pub trait IntentRouter: Send + Sync {
    /// Never fails; any planning problem yields [`ExecutionPlan::no_action`].
    fn plan<'a>(&'a self, context: PlanningContext<'a>) -> BoxFuture<'a, ExecutionPlan>;
}

#[derive(Debug)]
enum PlanningError {
    Provider(ProviderError),
    Malformed(serde_json::Error),
}

impl Display for PlanningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(error) => write!(f, "planning call failed: {error}"),
            Self::Malformed(error) => write!(f, "planning reply is not a plan: {error}"),
        }
    }
}

/// Model-backed router. Single-shot: a bad reply is never re-prompted.
#[derive(Clone)]
pub struct LlmIntentRouter {
    provider: Arc<dyn ChatProvider>,
    model: Option<String>,
}

impl LlmIntentRouter {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn planning_request(&self, context: &PlanningContext<'_>) -> ChatRequest {
        let tools: Vec<serde_json::Value> = context
            .tools
            .definitions()
            .into_iter()
            .map(|definition| {
                json!({
                    "name": definition.name,
                    "description": definition.description,
                    "inputSchema": definition.input_schema,
                })
            })
            .collect();

        let user = json!({
            "instruction": PLANNER_INSTRUCTION,
            "tools": tools,
            "input": context.user_input,
            "schema": {
                "requiresTool": "bool",
                "toolName": "string|null",
                "parameters": "object|null",
                "shouldWriteMemory": "bool",
                "memoryNote": "string|null",
            },
        });

        ChatRequest::new(vec![
            Message::system(PLANNER_SYSTEM_PROMPT),
            Message::user(user.to_string()),
        ])
        .with_optional_model(self.model.clone())
    }

    async fn try_plan(&self, context: &PlanningContext<'_>) -> Result<ExecutionPlan, PlanningError> {
        let response = self
            .provider
            .complete(self.planning_request(context))
            .await
            .map_err(PlanningError::Provider)?;

        let raw: RawPlan = serde_json::from_str(extract_json_object(&response.text))
            .map_err(PlanningError::Malformed)?;
        Ok(raw.normalize(context.tools))
    }
}

impl IntentRouter for LlmIntentRouter {
    fn plan<'a>(&'a self, context: PlanningContext<'a>) -> BoxFuture<'a, ExecutionPlan> {
        Box::pin(async move {
            match self.try_plan(&context).await {
                Ok(plan) => plan,
                Err(error) => {
                    tracing::warn!(
                        session_id = %context.session_id,
                        error = %error,
                        "falling back to a no-action plan"
                    );
                    ExecutionPlan::no_action()
                }
            }
        })
    }
}

/// Untrusted plan as the model wrote it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPlan {
    requires_tool: bool,
    tool_name: Option<String>,
    parameters: Option<ToolArguments>,
    should_write_memory: bool,
    memory_note: Option<String>,
}

impl RawPlan {
    fn normalize(self, tools: &ToolRegistry) -> ExecutionPlan {
        let tool = if self.requires_tool {
            self.tool_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .and_then(|name| tools.get(name))
                .map(|tool| PlannedToolCall {
                    name: tool.definition().name,
                    parameters: self.parameters.unwrap_or_default(),
                })
        } else {
            None
        };

        let memory_note = if self.should_write_memory {
            self.memory_note.filter(|note| !note.trim().is_empty())
        } else {
            None
        };

        ExecutionPlan { tool, memory_note }
    }
}

/// Substring from the first `{` to the last `}`, or `"{}"` when there is none.
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end >= start => &text[start..=end],
        _ => "{}",
    }
}

/// Parses a planning reply; anything unparseable becomes a no-action plan.
pub fn parse_plan(reply: &str, tools: &ToolRegistry) -> ExecutionPlan {
    serde_json::from_str::<RawPlan>(extract_json_object(reply))
        .map(|raw| raw.normalize(tools))
        .unwrap_or_default()
}
