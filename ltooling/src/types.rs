//! Tool descriptors and invocation outcome types.

use serde_json::{Map, Value};

use crate::ToolError;

/// JSON object arguments passed to a tool.
pub type ToolArguments = Map<String, Value>;

/// Static description of a tool. Schemas are advisory shape hints for planning
/// prompts and are never enforced against actual arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: String,
    pub output_schema: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: "{\"type\":\"object\"}".to_string(),
            output_schema: "{}".to_string(),
        }
    }

    pub fn with_input_schema(mut self, schema: impl Into<String>) -> Self {
        self.input_schema = schema.into();
        self
    }

    pub fn with_output_schema(mut self, schema: impl Into<String>) -> Self {
        self.output_schema = schema.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub ok: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// JSON projection handed to the answer prompt: the data on success,
    /// `{"error": message}` otherwise.
    pub fn prompt_payload(&self) -> Value {
        if self.ok {
            self.data.clone().unwrap_or(Value::Null)
        } else {
            let mut payload = Map::new();
            payload.insert(
                "error".to_string(),
                Value::String(self.error.clone().unwrap_or_default()),
            );
            Value::Object(payload)
        }
    }
}

impl From<ToolError> for ToolOutcome {
    fn from(value: ToolError) -> Self {
        Self::failure(value.message)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prompt_payload_projects_data_or_error() {
        let success = ToolOutcome::success(json!({"events": []}));
        assert_eq!(success.prompt_payload(), json!({"events": []}));

        let failure = ToolOutcome::from(ToolError::execution("calendar offline"));
        assert!(!failure.ok);
        assert_eq!(failure.prompt_payload(), json!({"error": "calendar offline"}));
    }

    #[test]
    fn definition_defaults_to_object_input_schema() {
        let definition = ToolDefinition::new("echo", "Echoes input").with_output_schema("{\"type\":\"string\"}");
        assert_eq!(definition.input_schema, "{\"type\":\"object\"}");
        assert_eq!(definition.output_schema, "{\"type\":\"string\"}");
    }
}
