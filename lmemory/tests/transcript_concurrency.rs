use std::sync::Arc;

use lcommon::SessionId;
use lmemory::{InMemoryTranscriptStore, TranscriptStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sessions_keep_their_own_order() {
    let store = Arc::new(InMemoryTranscriptStore::new());
    let mut tasks = Vec::new();

    for session_index in 0..8 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            let session = SessionId::new(format!("session-{session_index}"));
            for message_index in 0..50 {
                store
                    .append(&session, "user", &format!("{session_index}:{message_index}"))
                    .await
                    .expect("append should succeed");
            }
        }));
    }

    for task in tasks {
        task.await.expect("task should finish");
    }

    assert_eq!(store.session_count(), 8);
    for session_index in 0..8 {
        let session = SessionId::new(format!("session-{session_index}"));
        let entries = store.recent(&session, 100).await.expect("read should succeed");
        let expected: Vec<String> = (0..50)
            .map(|message_index| format!("{session_index}:{message_index}"))
            .collect();
        let actual: Vec<String> = entries.into_iter().map(|entry| entry.content).collect();
        assert_eq!(actual, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_session_writers_never_lose_messages() {
    let store = Arc::new(InMemoryTranscriptStore::new());
    let session = SessionId::from("shared");
    let mut tasks = Vec::new();

    for writer in 0..4 {
        let store = Arc::clone(&store);
        let session = session.clone();
        tasks.push(tokio::spawn(async move {
            for message_index in 0..25 {
                store
                    .append(&session, "assistant", &format!("w{writer}-{message_index}"))
                    .await
                    .expect("append should succeed");
            }
        }));
    }

    for task in tasks {
        task.await.expect("task should finish");
    }

    let entries = store.recent(&session, 1_000).await.expect("read should succeed");
    assert_eq!(entries.len(), 100);

    for writer in 0..4 {
        let prefix = format!("w{writer}-");
        let own: Vec<usize> = entries
            .iter()
            .filter_map(|entry| entry.content.strip_prefix(&prefix))
            .map(|index| index.parse().expect("index should parse"))
            .collect();
        assert_eq!(own, (0..25).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn every_read_is_a_suffix_of_the_full_log() {
    let store = InMemoryTranscriptStore::new();
    let session = SessionId::from("s1");
    let mut appended = Vec::new();

    for index in 0..12 {
        let content = format!("m{index}");
        store
            .append(&session, "user", &content)
            .await
            .expect("append should succeed");
        appended.push(content);

        for limit in [0, 1, 5, 40] {
            let recent: Vec<String> = store
                .recent(&session, limit)
                .await
                .expect("read should succeed")
                .into_iter()
                .map(|entry| entry.content)
                .collect();
            assert!(recent.len() <= limit);
            assert!(appended.ends_with(&recent));
        }
    }
}
