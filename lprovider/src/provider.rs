use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{BoxedTextStream, ChatRequest, ChatResponse, ProviderError};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Gemini,
    Static,
}

impl ProviderId {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "static" | "fallback" => Some(Self::Static),
            _ => None,
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::Gemini => "gemini",
            Self::Static => "static",
        };

        f.write_str(id)
    }
}

/// Executes role-tagged message lists against an LLM backend.
///
/// `stream` re-issues the request on every call; the returned stream is not restartable.
pub trait ChatProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn complete<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>>;

    fn stream<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<BoxedTextStream<'a>, ProviderError>>;
}

#[cfg(test)]
mod tests {
    use super::ProviderId;

    #[test]
    fn provider_id_parses_aliases() {
        assert_eq!(ProviderId::parse("Gemini"), Some(ProviderId::Gemini));
        assert_eq!(ProviderId::parse(" google "), Some(ProviderId::Gemini));
        assert_eq!(ProviderId::parse("fallback"), Some(ProviderId::Static));
        assert_eq!(ProviderId::parse("openai"), None);
        assert_eq!(ProviderId::Gemini.to_string(), "gemini");
    }
}
