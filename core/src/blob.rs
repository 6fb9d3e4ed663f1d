use rkyv::{Archive, Deserialize, Serialize};

use crate::images::ImageMeta;

pub const IMAGE_UPLOAD_MAX_BYTES: usize = 12 * 1024 * 1024;
pub const IMAGE_REFS_KEY: &str = "image-refs.v1";

#[derive(Clone, Debug, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct ImageBlobEntry {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub size: u32,
    pub created_at: u64,
}

impl ImageBlobEntry {
    pub fn meta(&self, id: &str) -> ImageMeta {
        ImageMeta {
            id: id.to_string(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Flat index of blob ids, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct ImageRefs {
    pub ids: Vec<String>,
    pub updated_at: u64,
}

impl ImageRefs {
    pub fn insert_front(&mut self, id: &str, now_ms: u64) {
        self.ids.retain(|value| value != id);
        self.ids.insert(0, id.to_string());
        self.updated_at = now_ms;
    }

    /// Returns whether `id` was present.
    pub fn remove(&mut self, id: &str, now_ms: u64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|value| value != id);
        let removed = self.ids.len() != before;
        if removed {
            self.updated_at = now_ms;
        }
        removed
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

pub fn validate_upload(mime: &str, len: usize) -> Result<(), String> {
    if !is_image_mime(mime) {
        return Err("Unsupported file type".to_string());
    }
    if len == 0 {
        return Err("Empty file".to_string());
    }
    if len > IMAGE_UPLOAD_MAX_BYTES {
        return Err(format!(
            "File too large ({} MiB max)",
            IMAGE_UPLOAD_MAX_BYTES / (1024 * 1024)
        ));
    }
    Ok(())
}
