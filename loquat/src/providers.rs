//! Chat provider construction from configuration.

use std::sync::Arc;

use lprovider::{ChatProvider, ProviderCallHooks, ProviderError, StaticReplyProvider};

use crate::config::LoquatConfig;

pub const MISSING_KEY_REASON: &str =
    "Gemini API key not set. Export GEMINI_API_KEY or add api_key to the config file.";

/// Builds the configured provider. A missing API key yields a
/// [`StaticReplyProvider`] so callers can still run turns.
pub fn build_provider(
    config: &LoquatConfig,
    hooks: Arc<dyn ProviderCallHooks>,
) -> Result<Arc<dyn ChatProvider>, ProviderError> {
    config
        .provider_id()
        .map_err(|err| ProviderError::invalid_request(err.message))?;

    let Some(api_key) = config.api_key() else {
        tracing::warn!(provider = %config.provider, "no API key configured; using static replies");
        return Ok(Arc::new(StaticReplyProvider::new(MISSING_KEY_REASON)));
    };

    build_gemini_provider(config, api_key.to_string(), hooks)
}

#[cfg(feature = "provider-gemini")]
fn build_gemini_provider(
    config: &LoquatConfig,
    api_key: String,
    hooks: Arc<dyn ProviderCallHooks>,
) -> Result<Arc<dyn ChatProvider>, ProviderError> {
    use lprovider::adapters::gemini::{GeminiHttpTransport, GeminiProvider};

    let http = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;
    let transport = GeminiHttpTransport::new(http)
        .with_base_url(config.base_url.clone())
        .with_debug_http(config.debug_http);

    let mut provider = GeminiProvider::new(api_key, Arc::new(transport))?
        .with_default_model(config.model.clone())
        .with_hooks(hooks);
    if let Some(system_prompt) = config.system_prompt.as_deref() {
        provider = provider.with_system_prompt(system_prompt);
    }

    Ok(Arc::new(provider))
}

#[cfg(not(feature = "provider-gemini"))]
fn build_gemini_provider(
    _config: &LoquatConfig,
    _api_key: String,
    _hooks: Arc<dyn ProviderCallHooks>,
) -> Result<Arc<dyn ChatProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-gemini feature is not enabled on loquat",
    ))
}

#[cfg(test)]
mod tests {
    use lprovider::{ChatRequest, Message, NoopProviderHooks, ProviderErrorKind, ProviderId};

    use super::*;

    #[tokio::test]
    async fn missing_key_falls_back_to_static_replies() {
        let provider = build_provider(&LoquatConfig::default(), Arc::new(NoopProviderHooks))
            .expect("provider should build");

        assert_eq!(provider.id(), ProviderId::Static);
        let response = provider
            .complete(ChatRequest::new(vec![Message::user("hello")]))
            .await
            .expect("static provider should answer");
        assert_eq!(response.text, format!("[Fallback] {MISSING_KEY_REASON}"));
    }

    #[test]
    fn unknown_provider_is_an_invalid_request() {
        let config = LoquatConfig {
            provider: "openai".to_string(),
            ..LoquatConfig::default()
        };

        let error = build_provider(&config, Arc::new(NoopProviderHooks))
            .err()
            .expect("provider should be rejected");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
        assert!(error.message.contains("supported: 'gemini'"));
    }

    #[cfg(feature = "provider-gemini")]
    #[test]
    fn configured_key_builds_gemini_provider() {
        let config = LoquatConfig {
            api_key: Some("test-key".to_string()),
            system_prompt: Some("Answer briefly.".to_string()),
            ..LoquatConfig::default()
        };

        let provider =
            build_provider(&config, Arc::new(NoopProviderHooks)).expect("provider should build");
        assert_eq!(provider.id(), ProviderId::Gemini);
    }
}
