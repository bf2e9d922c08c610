use serde::{Deserialize, Serialize};

use super::{new_id, Identified, PersistedCollection};
use crate::models::AspectRatio;
use crate::store::{keys, LocalStore};

/// A generated image kept in the gallery.
///
/// `image_data` is the base64 payload returned by the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImageData {
    pub id: String,
    pub image_data: String,
    pub prompt: String,
    pub aspect_ratio: String,
    pub timestamp: i64,
}

impl Identified for GeneratedImageData {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
pub struct Gallery {
    images: PersistedCollection<GeneratedImageData>,
}

impl Gallery {
    pub fn load(store: LocalStore) -> Self {
        Self {
            images: PersistedCollection::load(store, keys::GALLERY_IMAGES),
        }
    }

    pub fn list(&self) -> &[GeneratedImageData] {
        self.images.items()
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedImageData> {
        self.images.get(id)
    }

    pub fn resolve_id(&self, prefix: &str) -> Option<String> {
        self.images.resolve_id(prefix)
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    pub fn add(
        &mut self,
        image_data: String,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> anyhow::Result<GeneratedImageData> {
        let image = GeneratedImageData {
            id: new_id(),
            image_data,
            prompt: prompt.to_string(),
            aspect_ratio: aspect_ratio.as_str().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.images.prepend(image.clone())?;
        log::info!("added image {} to gallery", image.id);
        Ok(image)
    }

    /// Blank or unchanged (after trimming) prompts are ignored.
    pub fn update_prompt(&mut self, id: &str, prompt: &str) -> anyhow::Result<bool> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(false);
        }
        self.images.modify(id, |image| {
            if image.prompt == prompt {
                return false;
            }
            image.prompt = prompt.to_string();
            true
        })
    }

    pub fn delete(&mut self, id: &str) -> anyhow::Result<bool> {
        self.images.remove(id)
    }

    /// Drops every image and removes the storage key itself.
    pub fn clear_all(&mut self) -> anyhow::Result<()> {
        self.images.clear()?;
        log::info!("cleared gallery");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::AspectRatio;
    use crate::store::{keys, KeyValueStore, LocalStore, MemoryStore};

    use super::{Gallery, GeneratedImageData};

    #[test]
    fn images_are_prepended_with_metadata() -> anyhow::Result<()> {
        let mut gallery = Gallery::load(LocalStore::memory());
        let first = gallery.add("AAAA".to_string(), "a red fox", AspectRatio::Square)?;
        let second = gallery.add("BBBB".to_string(), "a blue whale", AspectRatio::Widescreen)?;

        assert_eq!(gallery.list()[0], second);
        assert_eq!(gallery.list()[1], first);
        assert_eq!(second.aspect_ratio, "16:9");
        assert!(second.timestamp >= first.timestamp);
        assert!(first.timestamp > 0);
        Ok(())
    }

    #[test]
    fn adds_and_deletes_survive_a_reload_in_newest_first_order() -> anyhow::Result<()> {
        let backing = MemoryStore::new();
        let mut gallery = Gallery::load(LocalStore::new(backing.clone()));
        let a = gallery.add("AAAA".to_string(), "a", AspectRatio::Square)?;
        let b = gallery.add("BBBB".to_string(), "b", AspectRatio::Portrait)?;
        let c = gallery.add("CCCC".to_string(), "c", AspectRatio::Landscape)?;
        let ids = |gallery: &Gallery| -> Vec<String> {
            gallery.list().iter().map(|img| img.id.clone()).collect()
        };
        assert_eq!(ids(&gallery), vec![c.id.clone(), b.id.clone(), a.id.clone()]);

        assert!(gallery.delete(&b.id)?);
        assert_eq!(ids(&gallery), vec![c.id.clone(), a.id.clone()]);

        let writes = backing.writes();
        assert!(!gallery.delete("missing")?);
        assert_eq!(backing.writes(), writes);

        let reloaded = Gallery::load(LocalStore::new(backing.clone()));
        assert_eq!(ids(&reloaded), vec![c.id.clone(), a.id.clone()]);
        assert_eq!(reloaded.list(), gallery.list());
        assert_eq!(reloaded.get(&a.id).map(|img| img.prompt.as_str()), Some("a"));
        Ok(())
    }

    #[test]
    fn unchanged_trimmed_prompt_is_not_persisted() -> anyhow::Result<()> {
        let backing = MemoryStore::new();
        let mut gallery = Gallery::load(LocalStore::new(backing.clone()));
        let image = gallery.add("AAAA".to_string(), "sunset", AspectRatio::Square)?;
        let writes = backing.writes();

        assert!(!gallery.update_prompt(&image.id, "  sunset  ")?);
        assert!(!gallery.update_prompt(&image.id, "   ")?);
        assert!(!gallery.update_prompt("missing", "sunrise")?);
        assert_eq!(backing.writes(), writes);

        assert!(gallery.update_prompt(&image.id, " sunrise ")?);
        assert_eq!(backing.writes(), writes + 1);
        let updated = gallery.get(&image.id).cloned();
        assert_eq!(updated.as_ref().map(|img| img.prompt.as_str()), Some("sunrise"));
        assert_eq!(updated.map(|img| img.image_data), Some("AAAA".to_string()));
        Ok(())
    }

    #[test]
    fn clear_all_removes_the_storage_key() -> anyhow::Result<()> {
        let backing = MemoryStore::new();
        let mut gallery = Gallery::load(LocalStore::new(backing.clone()));
        gallery.add("AAAA".to_string(), "one", AspectRatio::Square)?;
        gallery.add("BBBB".to_string(), "two", AspectRatio::Portrait)?;
        assert!(backing.contains(keys::GALLERY_IMAGES));

        gallery.clear_all()?;
        assert!(gallery.is_empty());
        assert!(!backing.contains(keys::GALLERY_IMAGES));
        Ok(())
    }

    #[test]
    fn corrupt_gallery_loads_empty_without_error() -> anyhow::Result<()> {
        let backing = MemoryStore::new();
        backing.set(keys::GALLERY_IMAGES, "[{\"id\": 42,".to_string())?;
        let gallery = Gallery::load(LocalStore::new(backing.clone()));
        assert!(gallery.is_empty());
        assert_eq!(backing.writes(), 1);
        Ok(())
    }

    #[test]
    fn image_json_uses_camel_case_fields() -> anyhow::Result<()> {
        let images = vec![GeneratedImageData {
            id: "img-1".to_string(),
            image_data: "iVBORw0KGgo=".to_string(),
            prompt: "lighthouse at dusk".to_string(),
            aspect_ratio: "4:3".to_string(),
            timestamp: 1_717_000_000_000,
        }];
        let encoded = serde_json::to_string(&images)?;
        assert_eq!(
            encoded,
            r#"[{"id":"img-1","imageData":"iVBORw0KGgo=","prompt":"lighthouse at dusk","aspectRatio":"4:3","timestamp":1717000000000}]"#
        );
        let decoded: Vec<GeneratedImageData> = serde_json::from_str(&encoded)?;
        assert_eq!(decoded, images);
        Ok(())
    }
}
