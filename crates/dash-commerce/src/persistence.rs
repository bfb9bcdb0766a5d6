//! Durable copies of the cart and checkout preferences.

use dash_cache::{cache_key, Cache, KvStore};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

pub(crate) const CART_PART: &str = "cart";
pub(crate) const PREFERENCES_PART: &str = "checkout";

/// Namespaced JSON persistence shared by the stores.
///
/// Reads that fail to decode are treated as absent state. Writes never fail
/// the calling operation; errors are logged and dropped.
#[derive(Debug, Clone)]
pub struct Persistence {
    cache: Cache,
    namespace: String,
}

impl Persistence {
    /// Persist under `namespace` in `store`.
    pub fn new(store: Arc<dyn KvStore>, namespace: impl Into<String>) -> Self {
        Self {
            cache: Cache::new(store),
            namespace: namespace.into(),
        }
    }

    /// Namespace prefix of every key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Full key of a stored part.
    pub fn key(&self, part: &str) -> String {
        cache_key!(self.namespace.as_str(), part)
    }

    pub(crate) fn load<T: DeserializeOwned>(&self, part: &str) -> Option<T> {
        let key = self.key(part);
        match self.cache.get(&key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding unreadable persisted state");
                None
            }
        }
    }

    pub(crate) fn save<T: Serialize>(&self, part: &str, value: &T) {
        let key = self.key(part);
        if let Err(e) = self.cache.set(&key, value) {
            tracing::warn!(key = %key, error = %e, "failed to persist state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_cache::MemoryStore;

    #[test]
    fn test_key_is_namespaced() {
        let p = Persistence::new(Arc::new(MemoryStore::new()), "food-delivery-storage");
        assert_eq!(p.key(CART_PART), "food-delivery-storage:cart");
    }

    #[test]
    fn test_save_then_load() {
        let p = Persistence::new(Arc::new(MemoryStore::new()), "ns");
        p.save("numbers", &vec![1, 2, 3]);
        assert_eq!(p.load::<Vec<i32>>("numbers"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_corrupt_state_loads_as_none() {
        let store = Arc::new(MemoryStore::new());
        store.set("ns:cart", b"not json").unwrap();
        let p = Persistence::new(store, "ns");
        assert_eq!(p.load::<Vec<i32>>(CART_PART), None);
    }
}
