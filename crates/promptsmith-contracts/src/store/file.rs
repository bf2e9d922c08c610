use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{Map, Value};

use super::KeyValueStore;

/// Key-value store kept in a single JSON object file.
///
/// Every read goes to disk. Writes merge the touched key into whatever is on
/// disk at that moment, so two handles on the same file only race on a key
/// they both write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> Vec<String> {
        read_json_object(&self.path)
            .map(|payload| payload.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let payload = read_json_object(&self.path)?;
        payload.get(key).and_then(Value::as_str).map(str::to_string)
    }

    fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        let mut on_disk = read_json_object(&self.path).unwrap_or_default();
        let snapshot = Value::String(value);
        if on_disk.get(key) == Some(&snapshot) {
            return Ok(());
        }
        on_disk.insert(key.to_string(), snapshot);
        write_json_object(&self.path, &on_disk)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let Some(mut on_disk) = read_json_object(&self.path) else {
            return Ok(());
        };
        if on_disk.remove(key).is_none() {
            return Ok(());
        }
        write_json_object(&self.path, &on_disk)
    }
}

fn read_json_object(path: &Path) -> Option<Map<String, Value>> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(parsed) => parsed.as_object().cloned(),
        Err(err) => {
            log::warn!("ignoring unreadable store file {}: {err}", path.display());
            None
        }
    }
}

fn write_json_object(path: &Path, payload: &Map<String, Value>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(
        path,
        serde_json::to_string_pretty(&Value::Object(payload.clone()))?,
    )
    .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::{FileStore, KeyValueStore};

    #[test]
    fn file_store_basic() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let store = FileStore::new(temp.path().join("storage.json"));
        assert_eq!(store.get("theme"), None);
        store.set("theme", "\"gray\"".to_string())?;
        assert_eq!(store.get("theme").as_deref(), Some("\"gray\""));
        Ok(())
    }

    #[test]
    fn file_store_creates_missing_parent_directories() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("dir").join("storage.json");
        let store = FileStore::new(&path);
        store.set("tasks", "[]".to_string())?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn file_store_merges_with_concurrent_writer() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("storage.json");
        let store_a = FileStore::new(&path);
        let store_b = FileStore::new(&path);

        store_a.set("a", "1".to_string())?;
        store_b.set("b", "2".to_string())?;
        store_a.set("c", "3".to_string())?;

        let reloaded = FileStore::new(path);
        assert_eq!(reloaded.get("a").as_deref(), Some("1"));
        assert_eq!(reloaded.get("b").as_deref(), Some("2"));
        assert_eq!(reloaded.get("c").as_deref(), Some("3"));
        Ok(())
    }

    #[test]
    fn file_store_remove_drops_the_key_entirely() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("storage.json");
        let store = FileStore::new(&path);
        store.set("gallery-images", "[]".to_string())?;
        store.set("theme", "\"dark\"".to_string())?;
        store.remove("gallery-images")?;

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert!(parsed.get("gallery-images").is_none());
        assert_eq!(parsed["theme"], Value::String("\"dark\"".to_string()));
        assert_eq!(store.keys(), vec!["theme".to_string()]);
        Ok(())
    }

    #[test]
    fn file_store_treats_corrupt_file_as_empty() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("storage.json");
        std::fs::write(&path, "{not json")?;
        let store = FileStore::new(&path);
        assert_eq!(store.get("tasks"), None);
        store.set("tasks", "[]".to_string())?;
        assert_eq!(store.get("tasks").as_deref(), Some("[]"));
        Ok(())
    }
}
