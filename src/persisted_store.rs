use std::cell::RefCell;

use wasm_bindgen_futures::spawn_local;
use web_sys::IdbDatabase;

use crate::idb;
use crate::persisted::{SettingsBlob, SETTINGS_KEY, SETTINGS_VERSION};
use ahatouch_core::images::make_id;
use ahatouch_core::{decode, encode, ImageBlobEntry, ImageMeta, ImageRefs, IMAGE_REFS_KEY};

pub(crate) const BLOB_ID_PREFIX: &str = "photo";

thread_local! {
    static SETTINGS_CACHE: RefCell<Option<SettingsBlob>> = RefCell::new(None);
}

pub(crate) async fn bootstrap() -> Result<(), String> {
    let db = idb::open_db().await.map_err(idb::js_err)?;
    let settings = load_settings_blob(&db).await.unwrap_or_default();
    SETTINGS_CACHE.with(|slot| {
        *slot.borrow_mut() = Some(settings);
    });
    Ok(())
}

pub(crate) fn settings_blob() -> SettingsBlob {
    SETTINGS_CACHE
        .with(|slot| slot.borrow().clone())
        .unwrap_or_default()
}

pub(crate) fn update_settings_blob<F>(update: F)
where
    F: FnOnce(&mut SettingsBlob),
{
    let settings = SETTINGS_CACHE.with(|slot| {
        let mut settings = slot.borrow().clone().unwrap_or_default();
        update(&mut settings);
        *slot.borrow_mut() = Some(settings.clone());
        settings
    });
    spawn_local(async move {
        if let Err(err) = save_settings_blob(settings).await {
            gloo::console::warn!("settings save failed", err);
        }
    });
}

/// Stores `entry` under a fresh id and puts it at the front of the refs.
pub(crate) async fn save_image_blob(entry: ImageBlobEntry, entropy: u32) -> Result<String, String> {
    let id = make_id(BLOB_ID_PREFIX, entry.created_at, entropy);
    let now = entry.created_at;
    let bytes = encode(&entry).map_err(|err| err.to_string())?;
    let db = idb::open_db().await.map_err(idb::js_err)?;
    idb::idb_put_bytes(&db, idb::IDB_STORE_IMAGES, &id, &bytes)
        .await
        .map_err(idb::js_err)?;
    let mut refs = load_refs(&db).await?;
    refs.insert_front(&id, now);
    save_refs(&db, &refs).await?;
    Ok(id)
}

pub(crate) async fn load_image_blob(id: &str) -> Result<Option<ImageBlobEntry>, String> {
    let id = id.trim();
    if id.is_empty() {
        return Ok(None);
    }
    let db = idb::open_db().await.map_err(idb::js_err)?;
    load_entry(&db, id).await
}

/// Records in refs order, each read once; refs pointing at missing or
/// unreadable records are skipped.
pub(crate) async fn list_image_entries() -> Result<Vec<(ImageMeta, ImageBlobEntry)>, String> {
    let db = idb::open_db().await.map_err(idb::js_err)?;
    let refs = load_refs(&db).await?;
    let mut entries = Vec::with_capacity(refs.ids.len());
    for id in &refs.ids {
        match load_entry(&db, id).await {
            Ok(Some(entry)) => entries.push((entry.meta(id), entry)),
            Ok(None) => gloo::console::warn!("image ref without record", id.clone()),
            Err(err) => gloo::console::warn!("image record unreadable", id.clone(), err),
        }
    }
    Ok(entries)
}

pub(crate) async fn delete_image_blob(id: &str, now_ms: u64) -> Result<(), String> {
    let id = id.trim();
    if id.is_empty() {
        return Ok(());
    }
    let db = idb::open_db().await.map_err(idb::js_err)?;
    idb::idb_delete_key(&db, idb::IDB_STORE_IMAGES, id)
        .await
        .map_err(idb::js_err)?;
    let mut refs = load_refs(&db).await?;
    if refs.remove(id, now_ms) {
        save_refs(&db, &refs).await?;
    }
    Ok(())
}

/// Drops every record and the refs with them.
pub(crate) async fn clear_image_blobs() -> Result<(), String> {
    let db = idb::open_db().await.map_err(idb::js_err)?;
    idb::idb_clear_store(&db, idb::IDB_STORE_IMAGES)
        .await
        .map_err(idb::js_err)
}

async fn load_entry(db: &IdbDatabase, id: &str) -> Result<Option<ImageBlobEntry>, String> {
    let bytes = idb::idb_get_bytes(db, idb::IDB_STORE_IMAGES, id)
        .await
        .map_err(idb::js_err)?;
    let Some(bytes) = bytes else {
        return Ok(None);
    };
    decode::<ImageBlobEntry>(&bytes)
        .map(Some)
        .map_err(|err| err.to_string())
}

async fn load_refs(db: &IdbDatabase) -> Result<ImageRefs, String> {
    let bytes = idb::idb_get_bytes(db, idb::IDB_STORE_IMAGES, IMAGE_REFS_KEY)
        .await
        .map_err(idb::js_err)?;
    let Some(bytes) = bytes else {
        return Ok(ImageRefs::default());
    };
    match decode::<ImageRefs>(&bytes) {
        Ok(refs) => Ok(refs),
        Err(err) => {
            gloo::console::warn!("image refs reset", err.to_string());
            Ok(ImageRefs::default())
        }
    }
}

async fn save_refs(db: &IdbDatabase, refs: &ImageRefs) -> Result<(), String> {
    let bytes = encode(refs).map_err(|err| err.to_string())?;
    idb::idb_put_bytes(db, idb::IDB_STORE_IMAGES, IMAGE_REFS_KEY, &bytes)
        .await
        .map_err(idb::js_err)
}

async fn load_settings_blob(db: &IdbDatabase) -> Option<SettingsBlob> {
    let bytes = idb::idb_get_bytes(db, idb::IDB_STORE_SETTINGS, SETTINGS_KEY)
        .await
        .ok()
        .flatten()?;
    let settings = decode::<SettingsBlob>(&bytes).ok()?;
    if settings.version != SETTINGS_VERSION {
        return None;
    }
    Some(settings)
}

async fn save_settings_blob(settings: SettingsBlob) -> Result<(), String> {
    let bytes = encode(&settings).map_err(|err| err.to_string())?;
    let db = idb::open_db().await.map_err(idb::js_err)?;
    idb::idb_put_bytes(&db, idb::IDB_STORE_SETTINGS, SETTINGS_KEY, &bytes)
        .await
        .map_err(idb::js_err)
}
