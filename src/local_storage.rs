use std::rc::Rc;

use ahatouch_core::{ImageLibrary, KeyValueStorage, LibraryKeys, MemoryStorage, StorageError};

/// `window.localStorage`, or an in-memory map when the page is denied it.
#[derive(Clone)]
pub(crate) enum KvBackend {
    Browser(web_sys::Storage),
    Memory(Rc<MemoryStorage>),
}

thread_local! {
    static MEMORY_FALLBACK: Rc<MemoryStorage> = Rc::new(MemoryStorage::new());
}

pub(crate) fn kv_storage() -> KvBackend {
    let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
    match storage {
        Some(storage) => KvBackend::Browser(storage),
        None => {
            gloo::console::warn!("localStorage unavailable, keeping data in memory");
            KvBackend::Memory(MEMORY_FALLBACK.with(Rc::clone))
        }
    }
}

pub(crate) fn image_library(keys: LibraryKeys) -> ImageLibrary<KvBackend> {
    ImageLibrary::new(kv_storage(), keys)
}

fn backend_err(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(crate::idb::js_err(err))
}

impl KeyValueStorage for KvBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            KvBackend::Browser(storage) => storage.get_item(key).map_err(backend_err),
            KvBackend::Memory(storage) => storage.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            KvBackend::Browser(storage) => storage.set_item(key, value).map_err(backend_err),
            KvBackend::Memory(storage) => storage.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self {
            KvBackend::Browser(storage) => storage.remove_item(key).map_err(backend_err),
            KvBackend::Memory(storage) => storage.remove_item(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahatouch_core::USER_LIBRARY;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn browser_storage_backs_the_image_library() {
        let library = image_library(USER_LIBRARY);
        library.clear().expect("clear");
        let id = library
            .save("cat.png", "data:image/png;base64,AAAA", 1_700_000_000_000, 7)
            .expect("save");
        assert!(id.starts_with("user_"));
        assert_eq!(
            library.src_by_id(&id).expect("src").as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        library.delete(&id).expect("delete");
        assert!(library.list().expect("list").is_empty());
    }
}
