use ahatouch_core::images::{make_id, parse_index};
use ahatouch_core::{
    ImageLibrary, ImageMeta, KeyValueStorage, MemoryStorage, CHIRA_LIBRARY, USER_LIBRARY,
};

const PNG_URL: &str = "data:image/png;base64,iVBORw0KGgo=";
const JPG_URL: &str = "data:image/jpeg;base64,/9j/4AAQ";

#[test]
fn save_then_list_newest_first() {
    let storage = MemoryStorage::new();
    let library = ImageLibrary::new(&storage, USER_LIBRARY);
    let older = library.save("beach.png", PNG_URL, 1_000, 0xab).expect("save");
    let newer = library.save("  ", JPG_URL, 2_000, 0xcd).expect("save");
    assert_eq!(older, "user_1000_ab");
    assert_eq!(newer, "user_2000_cd");

    let metas = library.list().expect("list");
    assert_eq!(
        metas,
        vec![
            ImageMeta {
                id: newer.clone(),
                name: "image".to_string(),
                created_at: 2_000,
            },
            ImageMeta {
                id: older.clone(),
                name: "beach.png".to_string(),
                created_at: 1_000,
            },
        ]
    );

    let stored = library.get(&older).expect("get").expect("present");
    assert_eq!(stored.data_url, PNG_URL);
    let with_src = library.list_with_src().expect("list");
    assert_eq!(with_src[0].src.as_deref(), Some(JPG_URL));
}

#[test]
fn user_library_has_no_fallback() {
    let storage = MemoryStorage::new();
    let library = ImageLibrary::new(&storage, USER_LIBRARY);
    assert_eq!(library.src_by_id("user_1_1").expect("src"), None);
    assert_eq!(library.src_by_id("").expect("src"), None);
}

#[test]
fn chira_library_falls_back_to_static_images() {
    let storage = MemoryStorage::new();
    let library = ImageLibrary::new(&storage, CHIRA_LIBRARY);
    assert_eq!(
        library.src_by_id("animals_003").expect("src").as_deref(),
        Some("/ahatouch/chirarizumu/animals_003.jpg")
    );
    let id = library.save("mine.jpg", JPG_URL, 5, 1).expect("save");
    assert!(id.starts_with("chira_"));
    assert_eq!(library.src_by_id(&id).expect("src").as_deref(), Some(JPG_URL));
    // static images never appear in the listing
    assert_eq!(library.list().expect("list").len(), 1);
}

#[test]
fn delete_removes_item_and_index_entry() {
    let storage = MemoryStorage::new();
    let library = ImageLibrary::new(&storage, USER_LIBRARY);
    let keep = library.save("a", PNG_URL, 1, 1).expect("save");
    let drop = library.save("b", PNG_URL, 2, 2).expect("save");
    library.delete(&drop).expect("delete");
    library.delete("").expect("noop");
    assert_eq!(library.get(&drop).expect("get"), None);
    let ids: Vec<String> = library.list().expect("list").into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![keep]);
}

#[test]
fn clear_removes_everything_it_owns() {
    let storage = MemoryStorage::new();
    storage.set_item("unrelated", "1").expect("set");
    let library = ImageLibrary::new(&storage, USER_LIBRARY);
    library.save("a", PNG_URL, 1, 1).expect("save");
    library.save("b", PNG_URL, 2, 2).expect("save");
    library.clear().expect("clear");
    assert_eq!(storage.keys(), vec!["unrelated".to_string()]);
    assert!(library.list().expect("list").is_empty());
}

#[test]
fn libraries_do_not_share_keys() {
    let storage = MemoryStorage::new();
    let user = ImageLibrary::new(&storage, USER_LIBRARY);
    let chira = ImageLibrary::new(&storage, CHIRA_LIBRARY);
    user.save("u", PNG_URL, 1, 1).expect("save");
    chira.save("c", PNG_URL, 1, 1).expect("save");
    chira.clear().expect("clear");
    assert_eq!(user.list().expect("list").len(), 1);
}

#[test]
fn index_parsing_is_tolerant() {
    assert!(parse_index("not json").is_empty());
    assert!(parse_index("{\"id\":\"x\"}").is_empty());
    let raw = r#"[
        {"id":"a","name":"old","createdAt":1},
        {"id":7,"name":"bad","createdAt":2},
        {"id":"b","name":"new","createdAt":3},
        {"id":"c","createdAt":4},
        null
    ]"#;
    let ids: Vec<String> = parse_index(raw).into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
}

#[test]
fn corrupt_item_reads_as_missing() {
    let storage = MemoryStorage::new();
    storage
        .set_item("ahatouch_user_image_v1:user_1_1", "{broken")
        .expect("set");
    let library = ImageLibrary::new(&storage, USER_LIBRARY);
    assert_eq!(library.get("user_1_1").expect("get"), None);
}

#[test]
fn ids_embed_time_and_entropy() {
    assert_eq!(make_id("user", 1_700_000_000_000, 0xbeef), "user_1700000000000_beef");
}
