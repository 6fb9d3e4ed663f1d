use crate::rng::shuffle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub cover_src: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogImage {
    pub id: String,
    pub src: String,
}

pub const DEFAULT_CATEGORY_ID: &str = "animals";
pub const IMAGES_PER_CATEGORY: u32 = 20;
pub const PICKER_CARD_COUNT: usize = 6;

pub const CATEGORIES: &[CategoryEntry] = &[
    CategoryEntry {
        id: "animals",
        label: "動物",
        cover_src: "/ahatouch/animals.jpg",
    },
    CategoryEntry {
        id: "flowers",
        label: "花",
        cover_src: "/ahatouch/flowers.jpg",
    },
    CategoryEntry {
        id: "world",
        label: "世界の風景",
        cover_src: "/ahatouch/world.jpg",
    },
];

pub const CHIRA_STATIC_IDS: &[&str] = &[
    "animals_001",
    "animals_002",
    "animals_003",
    "animals_004",
    "animals_005",
    "animals_006",
    "animals_007",
    "animals_008",
    "animals_009",
];

pub const CHIRA_FALLBACK_PREFIX: &str = "/ahatouch/chirarizumu/";
pub const CHIRA_FALLBACK_EXT: &str = ".jpg";

pub fn category_by_id(id: &str) -> Option<&'static CategoryEntry> {
    let trimmed = id.trim();
    CATEGORIES.iter().find(|entry| entry.id == trimmed)
}

pub fn default_category() -> &'static CategoryEntry {
    &CATEGORIES[0]
}

/// Numbered images `{cat}_001..{cat}_020`; unknown categories resolve to the
/// `world` folder.
pub fn images_by_category(cat_id: &str) -> Vec<CatalogImage> {
    let folder = match cat_id {
        "animals" => "/ahatouch/animals",
        "flowers" => "/ahatouch/flowers",
        _ => "/ahatouch/world",
    };
    (1..=IMAGES_PER_CATEGORY)
        .map(|no| {
            let id = format!("{cat_id}_{no:03}");
            let src = format!("{folder}/{id}.webp");
            CatalogImage { id, src }
        })
        .collect()
}

pub fn pick_random<T: Clone>(items: &[T], count: usize, seed: u32) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let mut picked = items.to_vec();
    shuffle(&mut picked, seed);
    picked.truncate(count);
    picked
}

pub fn infer_category(image_id: &str, fallback: Option<&str>) -> &'static str {
    let prefix = image_id.split_once('_').map(|(head, _)| head);
    if let Some(entry) = prefix.and_then(category_by_id) {
        return entry.id;
    }
    if prefix.is_none() {
        if let Some(entry) = fallback.and_then(category_by_id) {
            return entry.id;
        }
    }
    DEFAULT_CATEGORY_ID
}

pub fn puzzle_image_src(image_id: &str, cat: Option<&str>) -> Option<String> {
    let id = image_id.trim();
    if id.is_empty() {
        return None;
    }
    let cat = infer_category(id, cat);
    Some(format!("/ahatouch/{cat}/{id}.webp"))
}

pub fn chira_fallback_src(id: &str) -> String {
    format!("{CHIRA_FALLBACK_PREFIX}{id}{CHIRA_FALLBACK_EXT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_twenty_padded_images() {
        let images = images_by_category("flowers");
        assert_eq!(images.len(), 20);
        assert_eq!(images[0].id, "flowers_001");
        assert_eq!(images[0].src, "/ahatouch/flowers/flowers_001.webp");
        assert_eq!(images[19].id, "flowers_020");
    }

    #[test]
    fn unknown_category_uses_world_folder() {
        let images = images_by_category("nostalgia");
        assert_eq!(images[0].src, "/ahatouch/world/nostalgia_001.webp");
    }

    #[test]
    fn pick_random_truncates() {
        let images = images_by_category("animals");
        let picked = pick_random(&images, PICKER_CARD_COUNT, 99);
        assert_eq!(picked.len(), PICKER_CARD_COUNT);
        for image in &picked {
            assert!(images.contains(image));
        }
        assert!(pick_random::<CatalogImage>(&[], 3, 1).is_empty());
        assert_eq!(pick_random(&images, 100, 1).len(), 20);
    }

    #[test]
    fn infers_category_from_prefix() {
        assert_eq!(infer_category("flowers_003", Some("world")), "flowers");
        assert_eq!(infer_category("plain", Some("world")), "world");
        assert_eq!(infer_category("plain", None), "animals");
        assert_eq!(infer_category("plain", Some("cats")), "animals");
        assert_eq!(infer_category("cats_001", Some("world")), "animals");
        assert_eq!(infer_category("cats_001", None), "animals");
    }

    #[test]
    fn puzzle_src_requires_id() {
        assert_eq!(puzzle_image_src("  ", None), None);
        assert_eq!(
            puzzle_image_src("world_010", None).as_deref(),
            Some("/ahatouch/world/world_010.webp")
        );
    }
}
