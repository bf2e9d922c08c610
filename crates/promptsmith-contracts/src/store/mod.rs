mod file;
mod local;
mod memory;

pub use file::FileStore;
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Storage keys, one JSON-encoded value each.
pub mod keys {
    pub const TASKS: &str = "todo-list-tasks";
    pub const FEW_SHOT_EXAMPLES: &str = "few-shot-examples";
    pub const GALLERY_IMAGES: &str = "gallery-images";
    pub const THEME: &str = "theme";
}

/// Synchronous string-keyed persistent storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}
