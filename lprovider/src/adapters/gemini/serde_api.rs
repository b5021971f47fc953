//! Gemini HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProviderError;

use super::types::{GeminiRequest, GeminiResponse};

pub(crate) fn build_api_request(request: &GeminiRequest) -> Result<GeminiApiRequest, ProviderError> {
    if request.contents.is_empty() {
        return Err(ProviderError::invalid_request(
            "Gemini request requires at least one content turn",
        ));
    }

    let contents = request
        .contents
        .iter()
        .map(|content| GeminiApiContent {
            role: content.role.as_str().to_string(),
            parts: vec![GeminiApiPart::text(content.text.clone())],
        })
        .collect();

    let system_instruction = request
        .system_instruction
        .as_ref()
        .map(|text| GeminiApiSystemInstruction {
            parts: vec![GeminiApiPart::text(text.clone())],
        });

    let generation_config = request
        .max_output_tokens
        .map(|max_output_tokens| GeminiApiGenerationConfig {
            max_output_tokens: Some(max_output_tokens),
        });

    Ok(GeminiApiRequest {
        contents,
        system_instruction,
        generation_config,
    })
}

pub(crate) fn parse_response_body(body: &str) -> Result<GeminiResponse, ProviderError> {
    if body.trim().is_empty() {
        return Err(ProviderError::empty_response("Gemini API returned an empty body"));
    }

    let raw: Value = serde_json::from_str(body)
        .map_err(|err| ProviderError::transport(format!("invalid Gemini response JSON: {err}")))?;
    let parsed: GeminiApiResponse = serde_json::from_value(raw.clone())
        .map_err(|err| ProviderError::transport(format!("unexpected Gemini response shape: {err}")))?;

    Ok(GeminiResponse {
        text: parsed.first_text().unwrap_or_default().to_string(),
        finish_reason: parsed.finish_reason().map(ToString::to_string),
        raw,
    })
}

/// Parses one SSE line, returning the text of the event it carries, if any.
pub(crate) fn parse_sse_line(line: &str) -> Result<Option<String>, ProviderError> {
    let line = line.trim();
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };

    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }

    let parsed: GeminiApiResponse = serde_json::from_str(payload)
        .map_err(|err| ProviderError::transport(format!("invalid Gemini stream event: {err}")))?;

    Ok(parsed
        .first_text()
        .filter(|text| !text.is_empty())
        .map(ToString::to_string))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiRequest {
    pub contents: Vec<GeminiApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiApiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiApiGenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiContent {
    pub role: String,
    pub parts: Vec<GeminiApiPart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiSystemInstruction {
    pub parts: Vec<GeminiApiPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GeminiApiPart {
    fn text(text: String) -> Self {
        Self { text: Some(text) }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiApiCandidate>,
}

impl GeminiApiResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiCandidate {
    #[serde(default)]
    pub content: Option<GeminiApiCandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiCandidateContent {
    #[serde(default)]
    pub parts: Vec<GeminiApiPart>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;
    use crate::adapters::gemini::types::GeminiContent;

    #[test]
    fn api_request_uses_camel_case_and_omits_absent_fields() {
        let request = GeminiRequest {
            model: "gemini-2.0-flash".to_string(),
            contents: vec![GeminiContent::user("hi")],
            system_instruction: None,
            max_output_tokens: None,
        };

        let encoded = serde_json::to_value(build_api_request(&request).expect("request builds"))
            .expect("request serializes");
        assert_eq!(
            encoded,
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn api_request_includes_system_instruction_and_token_cap() {
        let request = GeminiRequest {
            model: "gemini-2.0-flash".to_string(),
            contents: vec![GeminiContent::user("hi"), GeminiContent::model("hey")],
            system_instruction: Some("Be brief.".to_string()),
            max_output_tokens: Some(64),
        };

        let encoded = serde_json::to_value(build_api_request(&request).expect("request builds"))
            .expect("request serializes");
        assert_eq!(encoded["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(encoded["generationConfig"]["maxOutputTokens"], 64);
        assert_eq!(encoded["contents"][1]["role"], "model");
    }

    #[test]
    fn empty_contents_are_rejected() {
        let request = GeminiRequest {
            model: "gemini-2.0-flash".to_string(),
            contents: Vec::new(),
            system_instruction: Some("only system".to_string()),
            max_output_tokens: None,
        };

        let error = build_api_request(&request).expect_err("request should fail");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }

    #[test]
    fn response_body_yields_first_candidate_text() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "ignored"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        })
        .to_string();

        let response = parse_response_body(&body).expect("body should parse");
        assert_eq!(response.text, "first");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert!(response.raw.get("candidates").is_some());
    }

    #[test]
    fn response_without_candidates_yields_empty_text() {
        let response = parse_response_body("{}").expect("body should parse");
        assert_eq!(response.text, "");
        assert_eq!(response.finish_reason, None);
    }

    #[test]
    fn empty_or_malformed_bodies_are_errors() {
        let empty = parse_response_body("  ").expect_err("empty body should fail");
        assert_eq!(empty.kind, ProviderErrorKind::EmptyResponse);

        let malformed = parse_response_body("not json").expect_err("malformed body should fail");
        assert_eq!(malformed.kind, ProviderErrorKind::Transport);
    }

    #[test]
    fn sse_lines_skip_non_data_blank_and_done_payloads() {
        assert_eq!(parse_sse_line(": keep-alive").expect("comment"), None);
        assert_eq!(parse_sse_line("data:").expect("blank"), None);
        assert_eq!(parse_sse_line("data: [DONE]").expect("done"), None);
        assert_eq!(
            parse_sse_line(r#"data: {"candidates":[{"content":{"parts":[{"text":""}]}}]}"#)
                .expect("empty text"),
            None
        );
        assert_eq!(
            parse_sse_line(r#"data: {"candidates":[{"content":{"parts":[{"text":"Hel"}]}}]}"#)
                .expect("text event"),
            Some("Hel".to_string())
        );
        assert!(parse_sse_line("data: {broken").is_err());
    }
}
