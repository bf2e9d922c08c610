use serde::{Deserialize, Serialize};

use super::{new_id, Identified, PersistedCollection};
use crate::store::{keys, LocalStore};

/// Input/output pair shown to the optimizer as a worked example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FewShotExample {
    pub id: String,
    pub input: String,
    pub output: String,
}

impl Identified for FewShotExample {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
pub struct FewShotLibrary {
    examples: PersistedCollection<FewShotExample>,
}

impl FewShotLibrary {
    pub fn load(store: LocalStore) -> Self {
        Self {
            examples: PersistedCollection::load(store, keys::FEW_SHOT_EXAMPLES),
        }
    }

    pub fn list(&self) -> &[FewShotExample] {
        self.examples.items()
    }

    pub fn get(&self, id: &str) -> Option<&FewShotExample> {
        self.examples.get(id)
    }

    pub fn resolve_id(&self, prefix: &str) -> Option<String> {
        self.examples.resolve_id(prefix)
    }

    /// Appends an empty example.
    pub fn add(&mut self) -> anyhow::Result<FewShotExample> {
        let example = FewShotExample {
            id: new_id(),
            input: String::new(),
            output: String::new(),
        };
        self.examples.append(example.clone())?;
        Ok(example)
    }

    /// Replaces both fields when at least one of them differs.
    pub fn update(&mut self, id: &str, input: &str, output: &str) -> anyhow::Result<bool> {
        self.examples.modify(id, |example| {
            if example.input == input && example.output == output {
                return false;
            }
            example.input = input.to_string();
            example.output = output.to_string();
            true
        })
    }

    pub fn delete(&mut self, id: &str) -> anyhow::Result<bool> {
        self.examples.remove(id)
    }
}
