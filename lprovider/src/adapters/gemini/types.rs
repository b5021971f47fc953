//! Gemini adapter types and payload-shape conversion logic.

use serde_json::Value;

use crate::{ChatResponse, Role, WirePayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiRequest {
    pub model: String,
    pub contents: Vec<GeminiContent>,
    /// Folded system text; sent through `systemInstruction` in the standard payload.
    pub system_instruction: Option<String>,
    pub max_output_tokens: Option<u32>,
}

impl GeminiRequest {
    /// Shapes the request for one attempt of the compatibility fallback policy.
    ///
    /// The degraded shape moves the system text into a leading user turn and
    /// drops the instruction channel.
    pub fn for_payload(mut self, payload: WirePayload) -> Self {
        if payload == WirePayload::Degraded {
            if let Some(system_text) = self.system_instruction.take() {
                self.contents.insert(0, GeminiContent::user(system_text));
            }
        }

        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiContent {
    pub role: GeminiRole,
    pub text: String,
}

impl GeminiContent {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: GeminiRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: GeminiRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiRole {
    User,
    Model,
}

impl GeminiRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl From<Role> for GeminiRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Assistant => Self::Model,
            Role::User | Role::System => Self::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiResponse {
    pub text: String,
    pub finish_reason: Option<String>,
    pub raw: Value,
}

impl GeminiResponse {
    pub fn into_chat_response(self) -> ChatResponse {
        ChatResponse {
            text: self.text,
            finish_reason: self.finish_reason,
            raw: Some(self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_system() -> GeminiRequest {
        GeminiRequest {
            model: "gemini-2.0-flash".to_string(),
            contents: vec![GeminiContent::user("hi"), GeminiContent::model("hello")],
            system_instruction: Some("Be brief.".to_string()),
            max_output_tokens: None,
        }
    }

    #[test]
    fn standard_payload_keeps_instruction_channel() {
        let request = request_with_system().for_payload(WirePayload::Standard);
        assert_eq!(request.system_instruction.as_deref(), Some("Be brief."));
        assert_eq!(request.contents.len(), 2);
    }

    #[test]
    fn degraded_payload_prepends_system_text_as_user_turn() {
        let request = request_with_system().for_payload(WirePayload::Degraded);
        assert_eq!(request.system_instruction, None);
        assert_eq!(
            request.contents,
            vec![
                GeminiContent::user("Be brief."),
                GeminiContent::user("hi"),
                GeminiContent::model("hello"),
            ]
        );
    }

    #[test]
    fn degraded_payload_without_system_text_is_unchanged() {
        let mut request = request_with_system();
        request.system_instruction = None;
        let degraded = request.clone().for_payload(WirePayload::Degraded);
        assert_eq!(degraded, request);
    }
}
