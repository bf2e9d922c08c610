use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, MemoryStore};

/// JSON adapter over a [`KeyValueStore`].
///
/// Values that fail to decode are logged and treated as absent.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.inner.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("failed to parse '{key}' from local storage: {err}");
                None
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let encoded = serde_json::to_string(value)
            .with_context(|| format!("failed to encode '{key}' for local storage"))?;
        self.inner
            .set(key, encoded)
            .with_context(|| format!("failed to persist '{key}'"))
    }

    pub fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.inner
            .remove(key)
            .with_context(|| format!("failed to remove '{key}'"))
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }
}

impl fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, LocalStore, MemoryStore};

    #[test]
    fn load_returns_none_for_missing_and_corrupt_values() -> anyhow::Result<()> {
        let backing = MemoryStore::new();
        let store = LocalStore::new(backing.clone());
        assert_eq!(store.load::<Vec<String>>("tasks"), None);

        backing.set("tasks", "[\"unterminated".to_string())?;
        assert_eq!(store.load::<Vec<String>>("tasks"), None);
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> anyhow::Result<()> {
        let store = LocalStore::memory();
        store.save("names", &vec!["a".to_string(), "b".to_string()])?;
        assert_eq!(
            store.load::<Vec<String>>("names"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(store.raw("names").as_deref(), Some("[\"a\",\"b\"]"));
        Ok(())
    }
}
