//! Gemini provider implementation over transport and shared models.

use std::sync::Arc;

use crate::{
    BoxedTextStream, ChatProvider, ChatRequest, ChatResponse, NoopProviderHooks, ProviderCallHooks,
    ProviderError, ProviderFuture, ProviderId, Role, SecretString, call_with_compat_fallback,
};

use super::transport::GeminiTransport;
use super::types::{GeminiContent, GeminiRequest};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: Arc<SecretString>,
    transport: Arc<dyn GeminiTransport>,
    default_model: String,
    system_prompt: Option<String>,
    hooks: Arc<dyn ProviderCallHooks>,
}

impl GeminiProvider {
    pub fn new(
        api_key: impl Into<String>,
        transport: Arc<dyn GeminiTransport>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: Arc::new(SecretString::api_key(api_key)?),
            transport,
            default_model: DEFAULT_GEMINI_MODEL.to_string(),
            system_prompt: None,
            hooks: Arc::new(NoopProviderHooks),
        })
    }

    /// Blank values keep the built-in default model.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.default_model = model.trim().to_string();
        }
        self
    }

    /// Fixed instruction placed ahead of every request's own system messages.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        self.system_prompt = (!system_prompt.trim().is_empty()).then_some(system_prompt);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderCallHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub(crate) fn build_gemini_request(&self, request: ChatRequest) -> GeminiRequest {
        let model = request
            .model
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.default_model.clone());

        let mut system_parts = self.system_prompt.iter().cloned().collect::<Vec<_>>();
        let mut contents = Vec::with_capacity(request.messages.len());
        for message in request.messages {
            if message.role == Role::System {
                system_parts.push(message.content);
            } else {
                contents.push(GeminiContent {
                    role: message.role.into(),
                    text: message.content,
                });
            }
        }

        GeminiRequest {
            model,
            contents,
            system_instruction: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
            max_output_tokens: request.max_tokens,
        }
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &self.api_key)
            .field("transport", &self.transport)
            .field("default_model", &self.default_model)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

impl ChatProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn complete<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let gemini_request = self.build_gemini_request(request);
            tracing::debug!(
                model = %gemini_request.model,
                turns = gemini_request.contents.len(),
                has_system = gemini_request.system_instruction.is_some(),
                "sending Gemini completion"
            );

            let transport = self.transport.as_ref();
            let api_key = self.api_key.as_ref();
            let response = call_with_compat_fallback(
                self.id(),
                "complete",
                self.hooks.as_ref(),
                move |payload| transport.generate(gemini_request.clone().for_payload(payload), api_key),
            )
            .await?;

            Ok(response.into_chat_response())
        })
    }

    fn stream<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<BoxedTextStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let gemini_request = self.build_gemini_request(request);
            tracing::debug!(
                model = %gemini_request.model,
                turns = gemini_request.contents.len(),
                has_system = gemini_request.system_instruction.is_some(),
                "opening Gemini stream"
            );

            let transport = self.transport.as_ref();
            let api_key = self.api_key.as_ref();
            call_with_compat_fallback(self.id(), "stream", self.hooks.as_ref(), move |payload| {
                transport.stream_generate(gemini_request.clone().for_payload(payload), api_key)
            })
            .await
        })
    }
}
