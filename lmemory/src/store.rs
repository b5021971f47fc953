//! Transcript store trait and the process-lifetime in-memory implementation.

use std::sync::Arc;

use dashmap::DashMap;
use lcommon::{BoxFuture, SessionId};
use tokio::sync::Mutex;

use crate::MemoryError;

pub const DEFAULT_RECENT_LIMIT: usize = 50;
pub const DEFAULT_FACT_LIMIT: usize = 10;

/// One stored transcript message. `role` is kept as written by the caller and
/// interpreted case-insensitively by readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Append-only per-session transcript plus a separate per-session fact list.
///
/// Unknown sessions are never an error; they read as empty.
pub trait TranscriptStore: Send + Sync {
    /// Appends one message and returns its zero-based position in the
    /// session log.
    fn append<'a>(
        &'a self,
        session_id: &'a SessionId,
        role: &'a str,
        content: &'a str,
    ) -> BoxFuture<'a, Result<usize, MemoryError>>;

    /// Last `limit` messages in append order.
    fn recent<'a>(
        &'a self,
        session_id: &'a SessionId,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<TranscriptEntry>, MemoryError>>;

    /// Last `limit` messages stored strictly before `position`.
    fn before<'a>(
        &'a self,
        session_id: &'a SessionId,
        position: usize,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<TranscriptEntry>, MemoryError>>;

    fn add_fact<'a>(
        &'a self,
        session_id: &'a SessionId,
        note: &'a str,
    ) -> BoxFuture<'a, Result<(), MemoryError>>;

    /// Last `limit` facts in insertion order.
    fn recent_facts<'a>(
        &'a self,
        session_id: &'a SessionId,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<String>, MemoryError>>;
}

#[derive(Debug, Default)]
struct SessionLog {
    messages: Vec<TranscriptEntry>,
    facts: Vec<String>,
}

/// Sharded session map; each session owns its own async lock so writers for
/// one session never wait on another.
#[derive(Debug, Default)]
pub struct InMemoryTranscriptStore {
    sessions: DashMap<SessionId, Arc<Mutex<SessionLog>>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn session(&self, session_id: &SessionId) -> Arc<Mutex<SessionLog>> {
        if let Some(log) = self.sessions.get(session_id) {
            return Arc::clone(log.value());
        }

        let log = self.sessions.entry(session_id.clone()).or_insert_with(|| {
            tracing::trace!(session_id = %session_id, "creating session transcript");
            Arc::default()
        });
        Arc::clone(log.value())
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    fn append<'a>(
        &'a self,
        session_id: &'a SessionId,
        role: &'a str,
        content: &'a str,
    ) -> BoxFuture<'a, Result<usize, MemoryError>> {
        Box::pin(async move {
            let log = self.session(session_id);
            let mut log = log.lock().await;
            log.messages.push(TranscriptEntry::new(role, content));
            Ok(log.messages.len() - 1)
        })
    }

    fn recent<'a>(
        &'a self,
        session_id: &'a SessionId,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<TranscriptEntry>, MemoryError>> {
        Box::pin(async move {
            let log = self.session(session_id);
            let log = log.lock().await;
            Ok(tail(&log.messages, limit))
        })
    }

    fn before<'a>(
        &'a self,
        session_id: &'a SessionId,
        position: usize,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<TranscriptEntry>, MemoryError>> {
        Box::pin(async move {
            let log = self.session(session_id);
            let log = log.lock().await;
            let end = position.min(log.messages.len());
            Ok(tail(&log.messages[..end], limit))
        })
    }

    fn add_fact<'a>(
        &'a self,
        session_id: &'a SessionId,
        note: &'a str,
    ) -> BoxFuture<'a, Result<(), MemoryError>> {
        Box::pin(async move {
            let log = self.session(session_id);
            let mut log = log.lock().await;
            log.facts.push(note.to_string());
            Ok(())
        })
    }

    fn recent_facts<'a>(
        &'a self,
        session_id: &'a SessionId,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<String>, MemoryError>> {
        Box::pin(async move {
            let log = self.session(session_id);
            let log = log.lock().await;
            Ok(tail(&log.facts, limit))
        })
    }
}

impl<T> TranscriptStore for Arc<T>
where
    T: TranscriptStore + ?Sized,
{
    fn append<'a>(
        &'a self,
        session_id: &'a SessionId,
        role: &'a str,
        content: &'a str,
    ) -> BoxFuture<'a, Result<usize, MemoryError>> {
        self.as_ref().append(session_id, role, content)
    }

    fn recent<'a>(
        &'a self,
        session_id: &'a SessionId,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<TranscriptEntry>, MemoryError>> {
        self.as_ref().recent(session_id, limit)
    }

    fn before<'a>(
        &'a self,
        session_id: &'a SessionId,
        position: usize,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<TranscriptEntry>, MemoryError>> {
        self.as_ref().before(session_id, position, limit)
    }

    fn add_fact<'a>(
        &'a self,
        session_id: &'a SessionId,
        note: &'a str,
    ) -> BoxFuture<'a, Result<(), MemoryError>> {
        self.as_ref().add_fact(session_id, note)
    }

    fn recent_facts<'a>(
        &'a self,
        session_id: &'a SessionId,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<String>, MemoryError>> {
        self.as_ref().recent_facts(session_id, limit)
    }
}

fn tail<T: Clone>(items: &[T], limit: usize) -> Vec<T> {
    items[items.len().saturating_sub(limit)..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_reads_as_empty() {
        let store = InMemoryTranscriptStore::new();
        let session = SessionId::from("fresh");

        assert!(store.recent(&session, 10).await.expect("read").is_empty());
        assert!(store.recent_facts(&session, 10).await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn recent_returns_ordered_suffix() {
        let store = InMemoryTranscriptStore::new();
        let session = SessionId::from("s1");

        for index in 0..5 {
            store
                .append(&session, "user", &format!("m{index}"))
                .await
                .expect("append");
        }

        let recent = store.recent(&session, 3).await.expect("read");
        let contents: Vec<&str> = recent.iter().map(|entry| entry.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);

        assert_eq!(store.recent(&session, 99).await.expect("read").len(), 5);
        assert!(store.recent(&session, 0).await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn before_reads_up_to_an_appended_position() {
        let store = InMemoryTranscriptStore::new();
        let session = SessionId::from("s1");

        let mut positions = Vec::new();
        for index in 0..4 {
            positions.push(
                store
                    .append(&session, "user", &format!("m{index}"))
                    .await
                    .expect("append"),
            );
        }
        assert_eq!(positions, vec![0, 1, 2, 3]);

        let earlier = store.before(&session, 2, 10).await.expect("read");
        let contents: Vec<&str> = earlier.iter().map(|entry| entry.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1"]);

        assert_eq!(store.before(&session, 3, 1).await.expect("read")[0].content, "m2");
        assert_eq!(store.before(&session, 99, 10).await.expect("read").len(), 4);
        assert!(store.before(&session, 0, 10).await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn facts_are_independent_of_messages() {
        let store = InMemoryTranscriptStore::new();
        let session = SessionId::from("s1");

        store.append(&session, "user", "hello").await.expect("append");
        store.add_fact(&session, "likes tea").await.expect("fact");
        store.add_fact(&session, "lives in Oslo").await.expect("fact");

        assert_eq!(store.recent(&session, DEFAULT_RECENT_LIMIT).await.expect("read").len(), 1);
        assert_eq!(
            store.recent_facts(&session, 1).await.expect("read"),
            vec!["lives in Oslo".to_string()]
        );
        assert_eq!(
            store.recent_facts(&session, DEFAULT_FACT_LIMIT).await.expect("read").len(),
            2
        );
        assert_eq!(store.session_count(), 1);
    }
}
