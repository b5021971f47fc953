//! Provider-agnostic chat model types and LLM backend adapters.
//!
//! ```rust
//! use lprovider::{ChatRequest, Message, Role};
//!
//! let request = ChatRequest::new(vec![
//!     Message::new(Role::System, "You are concise."),
//!     Message::new(Role::User, "Summarize this repository"),
//! ]);
//!
//! assert_eq!(request.messages.len(), 2);
//! ```

mod credentials;
mod error;
mod fallback;
mod model;
mod provider;
mod static_reply;
mod stream;

pub mod adapters;
pub mod prelude;

pub use credentials::SecretString;
pub use error::{ProviderError, ProviderErrorKind};
pub use fallback::{NoopProviderHooks, ProviderCallHooks, WirePayload, call_with_compat_fallback};
pub use model::{ChatRequest, ChatResponse, Message, Role};
pub use provider::{ChatProvider, ProviderFuture, ProviderId};
pub use static_reply::StaticReplyProvider;
pub use stream::{BoxedTextStream, TextFragmentStream, VecTextStream};
