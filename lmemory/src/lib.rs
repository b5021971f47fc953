//! Process-lifetime session memory: transcripts and facts.
//!
//! ```rust
//! use lcommon::SessionId;
//! use lmemory::{InMemoryTranscriptStore, TranscriptStore};
//!
//! let store = InMemoryTranscriptStore::new();
//! let session = SessionId::from("s1");
//! let _pending = store.append(&session, "user", "hello");
//! assert_eq!(store.session_count(), 0);
//! ```

mod error;
mod store;

pub mod prelude {
    pub use crate::{
        InMemoryTranscriptStore, MemoryError, MemoryErrorKind, TranscriptEntry, TranscriptStore,
    };
}

pub use error::{MemoryError, MemoryErrorKind};
pub use store::{
    DEFAULT_FACT_LIMIT, DEFAULT_RECENT_LIMIT, InMemoryTranscriptStore, TranscriptEntry,
    TranscriptStore,
};
