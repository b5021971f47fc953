//! Focused unit tests for Gemini adapter internals.

#![cfg(test)]

use std::sync::Arc;

use futures_util::stream;

use crate::{BoxedTextStream, ChatRequest, Message, ProviderError, ProviderFuture, SecretString};

use super::provider::GeminiProvider;
use super::transport::GeminiTransport;
use super::types::{GeminiContent, GeminiRequest, GeminiResponse};

#[derive(Debug)]
struct NoopTransport;

impl GeminiTransport for NoopTransport {
    fn generate<'a>(
        &'a self,
        _request: GeminiRequest,
        _api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async { Err(ProviderError::other("not used")) })
    }

    fn stream_generate<'a>(
        &'a self,
        _request: GeminiRequest,
        _api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<BoxedTextStream<'a>, ProviderError>> {
        Box::pin(async {
            let output = stream::iter(vec![Err(ProviderError::other("not used"))]);
            Ok(Box::pin(output) as BoxedTextStream<'a>)
        })
    }
}

fn provider() -> GeminiProvider {
    GeminiProvider::new("test-key", Arc::new(NoopTransport)).expect("provider should build")
}

#[test]
fn system_messages_are_folded_in_order_with_blank_line_separator() {
    let request = ChatRequest::new(vec![
        Message::system("first rule"),
        Message::user("hi"),
        Message::system("second rule"),
        Message::assistant("hello"),
    ]);

    let built = provider().build_gemini_request(request);
    assert_eq!(
        built.system_instruction.as_deref(),
        Some("first rule\n\nsecond rule")
    );
    assert_eq!(
        built.contents,
        vec![GeminiContent::user("hi"), GeminiContent::model("hello")]
    );
}

#[test]
fn fixed_system_prompt_leads_the_folded_instruction() {
    let request = ChatRequest::new(vec![Message::system("request rule"), Message::user("hi")]);

    let built = provider()
        .with_system_prompt("persona")
        .build_gemini_request(request);
    assert_eq!(
        built.system_instruction.as_deref(),
        Some("persona\n\nrequest rule")
    );
}

#[test]
fn instruction_channel_is_omitted_without_system_messages() {
    let request = ChatRequest::new(vec![Message::user("hi")]);

    let built = provider().with_system_prompt("   ").build_gemini_request(request);
    assert_eq!(built.system_instruction, None);
}

#[test]
fn model_override_and_token_cap_are_carried_through() {
    let default_model = provider().build_gemini_request(ChatRequest::new(vec![Message::user("hi")]));
    assert_eq!(default_model.model, "gemini-2.0-flash");

    let configured = provider()
        .with_default_model("gemini-1.5-pro")
        .build_gemini_request(ChatRequest::new(vec![Message::user("hi")]).with_max_tokens(32));
    assert_eq!(configured.model, "gemini-1.5-pro");
    assert_eq!(configured.max_output_tokens, Some(32));

    let overridden = provider().build_gemini_request(
        ChatRequest::new(vec![Message::user("hi")]).with_model("gemini-exp"),
    );
    assert_eq!(overridden.model, "gemini-exp");
}

#[test]
fn blank_api_key_is_rejected() {
    let error = GeminiProvider::new("  ", Arc::new(NoopTransport)).expect_err("key should fail");
    assert_eq!(error.kind, crate::ProviderErrorKind::Authentication);
}

#[test]
fn debug_output_redacts_api_key() {
    let rendered = format!("{:?}", provider());
    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains("test-key"));
}
