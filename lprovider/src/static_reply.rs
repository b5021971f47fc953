//! Provider that answers every call with a fixed fallback notice.
//!
//! ```rust
//! use lprovider::StaticReplyProvider;
//!
//! let provider = StaticReplyProvider::new("no API key configured");
//! assert_eq!(provider.reply(), "[Fallback] no API key configured");
//! ```

use crate::{
    BoxedTextStream, ChatProvider, ChatRequest, ChatResponse, ProviderError, ProviderFuture,
    ProviderId, VecTextStream,
};

#[derive(Debug, Clone)]
pub struct StaticReplyProvider {
    reply: String,
}

impl StaticReplyProvider {
    pub fn new(reason: impl AsRef<str>) -> Self {
        Self {
            reply: format!("[Fallback] {}", reason.as_ref()),
        }
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }
}

impl ChatProvider for StaticReplyProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Static
    }

    fn complete<'a>(
        &'a self,
        _request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
        Box::pin(async move { Ok(ChatResponse::text(self.reply.clone()).with_finish_reason("STOP")) })
    }

    fn stream<'a>(
        &'a self,
        _request: ChatRequest,
    ) -> ProviderFuture<'a, Result<BoxedTextStream<'a>, ProviderError>> {
        Box::pin(async move {
            let stream = VecTextStream::from_fragments([self.reply.clone()]);
            Ok(Box::pin(stream) as BoxedTextStream<'a>)
        })
    }
}
