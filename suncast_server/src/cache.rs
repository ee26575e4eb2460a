use dashmap::DashMap;
use std::sync::Arc;

/// Process-wide memo of values keyed by lower-cased city name.
///
/// Clones share the same underlying map. Entries never expire. Nothing is
/// locked while a value is being computed, so concurrent misses for the same
/// city may each compute and the last write wins.
pub struct Memo<V> {
    entries: Arc<DashMap<String, V>>,
}

impl<V> Clone for Memo<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for Memo<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }
}

impl<V: Clone> Memo<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(city: &str) -> String {
        city.to_lowercase()
    }

    pub fn get(&self, city: &str) -> Option<V> {
        self.entries
            .get(&Self::key(city))
            .map(|entry| entry.value().clone())
    }

    pub fn insert(&self, city: &str, value: V) {
        self.entries.insert(Self::key(city), value);
    }

    /// Return the memoized value for `city` or compute, store and return it.
    /// Errors are passed through and never stored.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, city: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(city) {
            return Ok(value);
        }
        let value = compute().await?;
        self.insert(city, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
impl<V> Memo<V> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
