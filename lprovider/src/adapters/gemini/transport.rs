//! Gemini transport trait and reqwest-based HTTP implementation.

use async_stream::try_stream;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};

use crate::{BoxedTextStream, ProviderError, ProviderFuture, SecretString};

use super::serde_api::{build_api_request, parse_response_body, parse_sse_line};
use super::types::{GeminiRequest, GeminiResponse};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";
const SYSTEM_INSTRUCTION_FIELD: &str = "systeminstruction";

pub trait GeminiTransport: Send + Sync + std::fmt::Debug {
    fn generate<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>>;

    /// Opens a streaming generation. Non-success statuses are reported here,
    /// before any fragment is produced.
    fn stream_generate<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<BoxedTextStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct GeminiHttpTransport {
    client: Client,
    base_url: String,
    debug_http: bool,
}

impl GeminiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            debug_http: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Appends the serialized request body to non-success error messages.
    pub fn with_debug_http(mut self, enabled: bool) -> Self {
        self.debug_http = enabled;
        self
    }

    fn endpoint(&self, model: &str, action: &str) -> String {
        format!(
            "{}/v1/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model,
            action
        )
    }

    async fn send(
        &self,
        url: String,
        request: &GeminiRequest,
        api_key: &SecretString,
        streaming: bool,
    ) -> Result<Response, ProviderError> {
        let api_request = build_api_request(request)?;
        let mut builder = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key.expose())
            .json(&api_request);
        if streaming {
            builder = builder.header(ACCEPT, "text/event-stream");
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                ProviderError::timeout(err.to_string())
            } else {
                ProviderError::transport(err.to_string())
            }
        })?;

        if !response.status().is_success() {
            let debug_body = self
                .debug_http
                .then(|| serde_json::to_string(&api_request).ok())
                .flatten();
            return Err(Self::parse_error(response, debug_body).await);
        }

        Ok(response)
    }

    async fn parse_error(response: Response, debug_body: Option<String>) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let mut message = format!(
            "Gemini API error {} {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            body
        );
        if let Some(request_json) = debug_body {
            message.push_str(&format!("\nRequest: {request_json}"));
        }

        let error = match status {
            StatusCode::BAD_REQUEST
                if body.to_ascii_lowercase().contains(SYSTEM_INSTRUCTION_FIELD) =>
            {
                ProviderError::compatibility(message)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::invalid_request(message)
            }
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                ProviderError::unavailable(message)
            }
            _ => ProviderError::transport(message),
        };

        error.with_status(status.as_u16())
    }
}

impl GeminiTransport for GeminiHttpTransport {
    fn generate<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            let url = self.endpoint(&request.model, "generateContent");
            let response = self.send(url, &request, api_key, false).await?;
            let body = response
                .text()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            parse_response_body(&body)
        })
    }

    fn stream_generate<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<BoxedTextStream<'a>, ProviderError>> {
        Box::pin(async move {
            let url = self.endpoint(&request.model, "streamGenerateContent?alt=sse");
            let response = self.send(url, &request, api_key, true).await?;

            let stream = try_stream! {
                let mut chunks = response.bytes_stream();
                let mut lines = SseLineBuffer::default();

                while let Some(item) = chunks.next().await {
                    let bytes = item.map_err(|err| ProviderError::transport(err.to_string()))?;
                    lines.extend(&bytes);

                    while let Some(line) = lines.next_line()? {
                        if let Some(fragment) = parse_sse_line(&line)? {
                            yield fragment;
                        }
                    }
                }

                if let Some(fragment) = parse_sse_line(&lines.finish()?)? {
                    yield fragment;
                }
            };

            Ok(Box::pin(stream) as BoxedTextStream<'a>)
        })
    }
}

/// Raw bytes waiting for a newline. A multi-byte character split across
/// network chunks stays buffered until its line is complete.
#[derive(Debug, Default)]
struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    fn next_line(&mut self) -> Result<Option<String>, ProviderError> {
        let Some(newline_index) = self.pending.iter().position(|byte| *byte == b'\n') else {
            return Ok(None);
        };
        let line: Vec<u8> = self.pending.drain(..=newline_index).collect();
        decode_line(line).map(Some)
    }

    fn finish(self) -> Result<String, ProviderError> {
        decode_line(self.pending)
    }
}

fn decode_line(bytes: Vec<u8>) -> Result<String, ProviderError> {
    String::from_utf8(bytes).map_err(|err| ProviderError::transport(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{GeminiHttpTransport, SseLineBuffer};
    use crate::ProviderErrorKind;

    #[test]
    fn endpoint_joins_base_url_model_and_action() {
        let transport = GeminiHttpTransport::new(reqwest::Client::new())
            .with_base_url("http://localhost:8080/");

        assert_eq!(
            transport.endpoint("gemini-2.0-flash", "generateContent"),
            "http://localhost:8080/v1/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            transport.endpoint("gemini-2.0-flash", "streamGenerateContent?alt=sse"),
            "http://localhost:8080/v1/models/gemini-2.0-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn line_buffer_waits_for_characters_split_across_chunks() {
        let line = "data: café\n".as_bytes();
        let split = line.iter().position(|byte| *byte == 0xC3).expect("é lead byte") + 1;
        let mut buffer = SseLineBuffer::default();

        buffer.extend(&line[..split]);
        assert_eq!(buffer.next_line().expect("partial line is not an error"), None);

        buffer.extend(&line[split..]);
        assert_eq!(
            buffer.next_line().expect("line should decode"),
            Some("data: café\n".to_string())
        );
        assert_eq!(buffer.finish().expect("empty tail"), "");
    }

    #[test]
    fn line_buffer_rejects_invalid_utf8_in_a_complete_line() {
        let mut buffer = SseLineBuffer::default();
        buffer.extend(b"data: \xFF\n");

        let error = buffer.next_line().expect_err("invalid bytes should fail");
        assert_eq!(error.kind, ProviderErrorKind::Transport);
    }
}
