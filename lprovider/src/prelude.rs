//! Common `lprovider` imports for downstream crates.

pub use crate::{
    BoxedTextStream, ChatProvider, ChatRequest, ChatResponse, Message, NoopProviderHooks,
    ProviderCallHooks, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, Role,
    StaticReplyProvider, TextFragmentStream, VecTextStream, WirePayload,
};
pub use lcommon::BoxFuture;
