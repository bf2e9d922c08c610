mod examples;
mod gallery;
mod tasks;

pub use examples::{FewShotExample, FewShotLibrary};
pub use gallery::{Gallery, GeneratedImageData};
pub use tasks::{Task, TaskList};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::store::LocalStore;

pub trait Identified {
    fn id(&self) -> &str;
}

/// Ordered entities mirrored to one storage key.
///
/// Every change rewrites the whole list under the key, so storage always
/// matches memory when a call returns.
#[derive(Debug)]
pub(crate) struct PersistedCollection<T> {
    key: &'static str,
    store: LocalStore,
    items: Vec<T>,
}

impl<T> PersistedCollection<T>
where
    T: Identified + Clone + Serialize + DeserializeOwned,
{
    pub(crate) fn load(store: LocalStore, key: &'static str) -> Self {
        let items = store.load::<Vec<T>>(key).unwrap_or_default();
        Self { key, store, items }
    }

    pub(crate) fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    pub(crate) fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn prepend(&mut self, item: T) -> anyhow::Result<()> {
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(item);
        next.extend(self.items.iter().cloned());
        self.commit(next)
    }

    pub(crate) fn append(&mut self, item: T) -> anyhow::Result<()> {
        let mut next = self.items.clone();
        next.push(item);
        self.commit(next)
    }

    /// Applies `edit` to a copy of the entity with `id`; persists only when it reports a change.
    pub(crate) fn modify<F>(&mut self, id: &str, edit: F) -> anyhow::Result<bool>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let Some(index) = self.items.iter().position(|item| item.id() == id) else {
            return Ok(false);
        };
        let mut edited = self.items[index].clone();
        if !edit(&mut edited) {
            return Ok(false);
        }
        let mut next = self.items.clone();
        next[index] = edited;
        self.commit(next)?;
        Ok(true)
    }

    pub(crate) fn remove(&mut self, id: &str) -> anyhow::Result<bool> {
        let next = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect::<Vec<T>>();
        if next.len() == self.items.len() {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Drops the storage key, then empties the collection.
    pub(crate) fn clear(&mut self) -> anyhow::Result<()> {
        self.store.remove(self.key)?;
        self.items.clear();
        Ok(())
    }

    /// Full id, or the single id starting with `prefix`.
    pub(crate) fn resolve_id(&self, prefix: &str) -> Option<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        if let Some(item) = self.get(prefix) {
            return Some(item.id().to_string());
        }
        let mut matches = self.items.iter().filter(|item| item.id().starts_with(prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first.id().to_string())
    }

    /// Writes `next` under the key and only then adopts it; a failed write
    /// leaves memory untouched.
    fn commit(&mut self, next: Vec<T>) -> anyhow::Result<()> {
        self.store.save(self.key, &next)?;
        log::debug!("persisted {} item(s) under '{}'", next.len(), self.key);
        self.items = next;
        Ok(())
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
