use serde::{Deserialize, Serialize};

use super::{new_id, Identified, PersistedCollection};
use crate::store::{keys, LocalStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Identified for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Locally persisted to-do list, newest first.
#[derive(Debug)]
pub struct TaskList {
    tasks: PersistedCollection<Task>,
}

impl TaskList {
    pub fn load(store: LocalStore) -> Self {
        Self {
            tasks: PersistedCollection::load(store, keys::TASKS),
        }
    }

    pub fn list(&self) -> &[Task] {
        self.tasks.items()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn resolve_id(&self, prefix: &str) -> Option<String> {
        self.tasks.resolve_id(prefix)
    }

    pub fn remaining(&self) -> usize {
        self.list().iter().filter(|task| !task.completed).count()
    }

    /// Blank text creates nothing and returns `None`.
    pub fn add(&mut self, text: &str) -> anyhow::Result<Option<Task>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let task = Task {
            id: new_id(),
            text: text.to_string(),
            completed: false,
        };
        self.tasks.prepend(task.clone())?;
        Ok(Some(task))
    }

    /// Replaces the text; blank replacements keep the previous text.
    pub fn update(&mut self, id: &str, text: &str) -> anyhow::Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.tasks.modify(id, |task| {
            task.text = text.to_string();
            true
        })
    }

    pub fn toggle_completed(&mut self, id: &str) -> anyhow::Result<bool> {
        self.tasks.modify(id, |task| {
            task.completed = !task.completed;
            true
        })
    }

    pub fn delete(&mut self, id: &str) -> anyhow::Result<bool> {
        self.tasks.remove(id)
    }
}
