mod provider;
mod serde_api;
mod tests;
mod transport;
mod types;

pub use provider::{DEFAULT_GEMINI_MODEL, GeminiProvider};
pub use transport::{DEFAULT_GEMINI_BASE_URL, GeminiHttpTransport, GeminiTransport};
pub use types::{GeminiContent, GeminiRequest, GeminiResponse, GeminiRole};
