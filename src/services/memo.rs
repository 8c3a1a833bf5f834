//! Process-lifetime memoization of fetch results.

use crate::error::Result;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache of successful results keyed by the operation's arguments.
///
/// Entries are never evicted. Failed loads are not stored, so the next call
/// with the same key tries again. Two callers racing on a missing key may
/// both run the loader; the first value inserted is kept and returned to both.
pub struct Memo<K, V> {
    name: &'static str,
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Return the cached value for `key`, or run `load` and cache its success
    pub async fn get_or_try_insert_with<F, Fut>(&self, key: K, load: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(hit) = self.get(&key).await {
            tracing::debug!(cache = self.name, key = ?key, "Memo hit");
            return Ok(hit);
        }

        tracing::debug!(cache = self.name, key = ?key, "Memo miss, loading");
        let value = Arc::new(load().await?);

        let mut entries = self.entries.write().await;
        let stored = entries.entry(key).or_insert(value);
        Ok(Arc::clone(stored))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_call_uses_cached_value() {
        let memo: Memo<String, u32> = Memo::new("test");
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = memo
                .get_or_try_insert_with("AKBNK".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
            assert_eq!(*value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.len().await, 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_stored() {
        let memo: Memo<&'static str, u32> = Memo::new("test");

        let failed = memo
            .get_or_try_insert_with("GARAN", || async {
                Err(AppError::Network("timeout".to_string()))
            })
            .await;
        assert!(failed.is_err());
        assert!(memo.is_empty().await);

        let value = memo
            .get_or_try_insert_with("GARAN", || async { Ok(3) })
            .await
            .unwrap();
        assert_eq!(*value, 3);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let memo: Memo<(String, u8), String> = Memo::new("test");
        memo.get_or_try_insert_with(("A".to_string(), 1), || async { Ok("a1".to_string()) })
            .await
            .unwrap();
        memo.get_or_try_insert_with(("A".to_string(), 2), || async { Ok("a2".to_string()) })
            .await
            .unwrap();

        assert_eq!(memo.len().await, 2);
        assert_eq!(
            memo.get(&("A".to_string(), 2)).await.as_deref(),
            Some(&"a2".to_string())
        );
    }
}
