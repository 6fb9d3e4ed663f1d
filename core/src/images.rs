//! Key-value image library.
//!
//! Each image is one JSON item under `item_prefix + id`; a separate JSON
//! index under `index_key` lists the metadata of every item, newest first.
//! Items hold the image as a data URL so the store works on top of plain
//! string storage such as `localStorage`.

use serde::{Deserialize, Serialize};

use crate::catalog::chira_fallback_src;
use crate::storage::{KeyValueStorage, StorageError};

pub const DEFAULT_IMAGE_NAME: &str = "image";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMeta {
    pub id: String,
    pub name: String,
    pub created_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub id: String,
    pub name: String,
    pub created_at: u64,
    pub data_url: String,
}

impl StoredImage {
    pub fn meta(&self) -> ImageMeta {
        ImageMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageWithSrc {
    pub meta: ImageMeta,
    pub src: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    None,
    ChiraStatic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LibraryKeys {
    pub index_key: &'static str,
    pub item_prefix: &'static str,
    pub id_prefix: &'static str,
    pub fallback: Fallback,
}

pub const USER_LIBRARY: LibraryKeys = LibraryKeys {
    index_key: "ahatouch_user_images_index_v1",
    item_prefix: "ahatouch_user_image_v1:",
    id_prefix: "user",
    fallback: Fallback::None,
};

pub const CHIRA_LIBRARY: LibraryKeys = LibraryKeys {
    index_key: "ahatouch_chirarizumu_index_v1",
    item_prefix: "ahatouch_chirarizumu_item_v1:",
    id_prefix: "chira",
    fallback: Fallback::ChiraStatic,
};

pub fn make_id(prefix: &str, now_ms: u64, entropy: u32) -> String {
    format!("{prefix}_{now_ms}_{entropy:x}")
}

/// Parses an index blob, dropping anything that is not a well-formed entry.
pub fn parse_index(raw: &str) -> Vec<ImageMeta> {
    let Ok(serde_json::Value::Array(values)) = serde_json::from_str::<serde_json::Value>(raw)
    else {
        return Vec::new();
    };
    let mut index: Vec<ImageMeta> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<ImageMeta>(value).ok())
        .collect();
    sort_newest_first(&mut index);
    index
}

pub fn sort_newest_first(index: &mut [ImageMeta]) {
    index.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub struct ImageLibrary<S> {
    storage: S,
    keys: LibraryKeys,
}

impl<S: KeyValueStorage> ImageLibrary<S> {
    pub fn new(storage: S, keys: LibraryKeys) -> Self {
        Self { storage, keys }
    }

    fn item_key(&self, id: &str) -> String {
        format!("{}{}", self.keys.item_prefix, id)
    }

    fn load_index(&self) -> Result<Vec<ImageMeta>, StorageError> {
        let raw = self.storage.get_item(self.keys.index_key)?;
        Ok(raw.as_deref().map(parse_index).unwrap_or_default())
    }

    fn save_index(&self, index: &[ImageMeta]) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(index).map_err(|err| StorageError::Encode(err.to_string()))?;
        self.storage.set_item(self.keys.index_key, &raw)
    }

    pub fn save(
        &self,
        name: &str,
        data_url: &str,
        now_ms: u64,
        entropy: u32,
    ) -> Result<String, StorageError> {
        let name = name.trim();
        let item = StoredImage {
            id: make_id(self.keys.id_prefix, now_ms, entropy),
            name: if name.is_empty() {
                DEFAULT_IMAGE_NAME.to_string()
            } else {
                name.to_string()
            },
            created_at: now_ms,
            data_url: data_url.to_string(),
        };
        let raw =
            serde_json::to_string(&item).map_err(|err| StorageError::Encode(err.to_string()))?;
        self.storage.set_item(&self.item_key(&item.id), &raw)?;

        let mut index = self.load_index()?;
        index.retain(|meta| meta.id != item.id);
        index.insert(0, item.meta());
        self.save_index(&index)?;
        Ok(item.id)
    }

    pub fn list(&self) -> Result<Vec<ImageMeta>, StorageError> {
        self.load_index()
    }

    pub fn get(&self, id: &str) -> Result<Option<StoredImage>, StorageError> {
        if id.is_empty() {
            return Ok(None);
        }
        let Some(raw) = self.storage.get_item(&self.item_key(id))? else {
            return Ok(None);
        };
        Ok(serde_json::from_str::<StoredImage>(&raw).ok())
    }

    /// Stored data URL, or the preset's static fallback.
    pub fn src_by_id(&self, id: &str) -> Result<Option<String>, StorageError> {
        if id.is_empty() {
            return Ok(None);
        }
        if let Some(item) = self.get(id)? {
            return Ok(Some(item.data_url));
        }
        Ok(match self.keys.fallback {
            Fallback::None => None,
            Fallback::ChiraStatic => Some(chira_fallback_src(id)),
        })
    }

    pub fn list_with_src(&self) -> Result<Vec<ImageWithSrc>, StorageError> {
        self.list()?
            .into_iter()
            .map(|meta| {
                let src = self.src_by_id(&meta.id)?;
                Ok(ImageWithSrc { meta, src })
            })
            .collect()
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        if id.is_empty() {
            return Ok(());
        }
        self.storage.remove_item(&self.item_key(id))?;
        let mut index = self.load_index()?;
        index.retain(|meta| meta.id != id);
        self.save_index(&index)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        for meta in self.load_index()? {
            self.storage.remove_item(&self.item_key(&meta.id))?;
        }
        self.storage.remove_item(self.keys.index_key)
    }
}
