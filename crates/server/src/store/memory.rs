//! [`MemoryStore`]: process-lifetime, mutex-guarded document map.

use std::collections::{hash_map::Entry, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{validate, DocumentStore, StoreError};

/// In-memory [`DocumentStore`].
///
/// Wraps an `Arc<Mutex<HashMap<_, _>>>`. Every operation performs its
/// existence check and its mutation under a single lock acquisition, so the
/// create-once and read-once guarantees hold across all worker threads.
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new, empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Names and envelopes stay out of debug output.
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn save(&self, name: &str, content: String) -> Result<(), StoreError> {
        validate(name, &content)?;
        let mut documents = self.inner.lock().await;
        match documents.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(content);
                Ok(())
            }
        }
    }

    async fn load(&self, name: &str) -> Result<String, StoreError> {
        self.inner
            .lock()
            .await
            .remove(name)
            .ok_or(StoreError::NotFound)
    }

    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn initially_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert_eq!(store.load("anything").await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn save_rejects_empty_name_or_content() {
        let store = MemoryStore::new();
        assert_eq!(store.save("", "x".into()).await, Err(StoreError::Validation));
        assert_eq!(store.save("a", String::new()).await, Err(StoreError::Validation));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn second_save_conflicts_and_keeps_first_value() {
        let store = MemoryStore::new();
        store.save("a", "x".into()).await.unwrap();
        assert_eq!(store.save("a", "y".into()).await, Err(StoreError::Conflict));
        assert_eq!(store.load("a").await.unwrap(), "x");
    }

    #[tokio::test]
    async fn load_is_read_once() {
        let store = MemoryStore::new();
        store.save("b", "z".into()).await.unwrap();
        assert_eq!(store.load("b").await.unwrap(), "z");
        assert_eq!(store.load("b").await, Err(StoreError::NotFound));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn name_is_reusable_after_load() {
        let store = MemoryStore::new();
        store.save("c", "first".into()).await.unwrap();
        store.load("c").await.unwrap();
        store.save("c", "second".into()).await.unwrap();
        assert_eq!(store.load("c").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn names_are_independent() {
        let store = MemoryStore::new();
        store.save("one", "1".into()).await.unwrap();
        store.save("two", "2".into()).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert_eq!(store.load("two").await.unwrap(), "2");
        assert_eq!(store.load("one").await.unwrap(), "1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_have_exactly_one_winner() {
        for round in 0..50 {
            let store = MemoryStore::new();
            let mut tasks = JoinSet::new();
            for i in 0..16 {
                let store = store.clone();
                tasks.spawn(async move {
                    let value = format!("v{i}");
                    store.save("c", value.clone()).await.map(|()| value)
                });
            }

            let mut winners = Vec::new();
            while let Some(outcome) = tasks.join_next().await {
                match outcome.unwrap() {
                    Ok(value) => winners.push(value),
                    Err(e) => assert_eq!(e, StoreError::Conflict),
                }
            }
            assert_eq!(winners.len(), 1, "round {round}");
            assert_eq!(store.load("c").await.unwrap(), winners[0]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_loads_release_content_once() {
        for round in 0..50 {
            let store = MemoryStore::new();
            store.save("d", "payload".into()).await.unwrap();
            let mut tasks = JoinSet::new();
            for _ in 0..16 {
                let store = store.clone();
                tasks.spawn(async move { store.load("d").await });
            }

            let mut delivered = 0;
            while let Some(outcome) = tasks.join_next().await {
                match outcome.unwrap() {
                    Ok(content) => {
                        assert_eq!(content, "payload");
                        delivered += 1;
                    }
                    Err(e) => assert_eq!(e, StoreError::NotFound),
                }
            }
            assert_eq!(delivered, 1, "round {round}");
        }
    }

    #[test]
    fn debug_output_hides_contents() {
        let store = MemoryStore::new();
        assert_eq!(format!("{store:?}"), "MemoryStore { .. }");
    }
}
