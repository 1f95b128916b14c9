//! In-memory backend.
//!
//! This provides a [`Backend`](super::common::Backend) backed by a `HashMap`. It serves as the
//! session storage area, whose contents only live as long as the process, and keeps unit tests
//! free of tempdir management. The backend is [`Clone`] so tests can hold a handle for direct
//! inspection while the service owns a boxed copy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::common::{Backend, BackendResult};

type Store = HashMap<String, String>;

/// A storage area that lives only as long as the process.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    name: &'static str,
    store: Arc<Mutex<Store>>,
}

impl InMemoryBackend {
    /// Creates an empty backend with the given diagnostic name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            store: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns a clone of the stored value, bypassing the `Backend` trait.
    pub fn get_stored(&self, key: &str) -> Option<String> {
        self.store().get(key).cloned()
    }

    /// Returns `true` if the backend contains an entry for the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.store().contains_key(key)
    }

    /// Returns `true` if the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    fn store(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl Backend for InMemoryBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn get_item(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(self.store().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> BackendResult<()> {
        self.store().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> BackendResult<()> {
        self.store().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let backend = InMemoryBackend::new("test");
        assert_eq!(backend.get_item("k").await.unwrap(), None);

        backend.set_item("k", "v1").await.unwrap();
        backend.set_item("k", "v2").await.unwrap();
        assert_eq!(backend.get_item("k").await.unwrap().as_deref(), Some("v2"));

        backend.remove_item("k").await.unwrap();
        backend.remove_item("k").await.unwrap();
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let backend = InMemoryBackend::new("test");
        let handle = backend.clone();
        backend.set_item("k", "v").await.unwrap();
        assert!(handle.contains("k"));
    }
}
