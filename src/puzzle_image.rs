use std::cell::Cell;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, File, HtmlImageElement, Url};

use ahatouch_core::{time_seed, ImageBlobEntry};

thread_local! {
    static ENTROPY_COUNTER: Cell<u32> = const { Cell::new(0) };
}

fn asset_base() -> &'static str {
    option_env!("AHATOUCH_ASSET_BASE")
        .or(option_env!("TRUNK_PUBLIC_AHATOUCH_ASSET_BASE"))
        .map(|raw| raw.trim().trim_end_matches('/'))
        .unwrap_or("")
}

/// Prefixes site-absolute paths with the build's asset base; data and blob URLs pass through.
pub(crate) fn asset_url(src: &str) -> String {
    if src.starts_with('/') {
        format!("{}{}", asset_base(), src)
    } else {
        src.to_string()
    }
}

pub(crate) fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

/// Fresh seed per call, even within one millisecond.
pub(crate) fn entropy() -> u32 {
    let salt = ENTROPY_COUNTER.with(|counter| {
        let next = counter.get().wrapping_add(1);
        counter.set(next);
        next
    });
    time_seed(now_ms(), salt)
}

pub(crate) fn create_object_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let array = js_sys::Array::new();
    let u8_array = js_sys::Uint8Array::from(bytes);
    array.push(&u8_array.buffer());
    let options = BlobPropertyBag::new();
    if !mime.trim().is_empty() {
        options.set_type(mime);
    }
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options)?;
    Url::create_object_url_with_blob(&blob)
}

pub(crate) fn entry_object_url(entry: &ImageBlobEntry) -> Option<String> {
    match create_object_url(&entry.bytes, &entry.mime) {
        Ok(url) => Some(url),
        Err(err) => {
            gloo::console::warn!("object url failed", entry.name.clone(), err);
            None
        }
    }
}

pub(crate) fn revoke_object_url(url: &str) {
    let _ = Url::revoke_object_url(url);
}

pub(crate) fn data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime.trim(), STANDARD.encode(bytes))
}

pub(crate) async fn read_file_bytes(file: &File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| "failed to read file".to_string())?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

pub(crate) async fn load_image_dimensions(file: &File) -> Result<(u32, u32), String> {
    let url = Url::create_object_url_with_blob(file).map_err(|_| "failed to read image".to_string())?;
    let img = HtmlImageElement::new().map_err(|_| "failed to read image".to_string())?;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let img_onload = img.clone();
        let onload = wasm_bindgen::closure::Closure::once(move || {
            let size = js_sys::Array::of2(
                &JsValue::from_f64(img_onload.natural_width() as f64),
                &JsValue::from_f64(img_onload.natural_height() as f64),
            );
            let _ = resolve.call1(&JsValue::NULL, &size);
        });
        let onerror = wasm_bindgen::closure::Closure::once(move || {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("image_load_failed"));
        });
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
    });
    img.set_src(&url);
    let value = wasm_bindgen_futures::JsFuture::from(promise).await;
    revoke_object_url(&url);
    let value = value.map_err(|_| "failed to read image".to_string())?;
    let size = js_sys::Array::from(&value);
    let width = size.get(0).as_f64().unwrap_or(0.0) as u32;
    let height = size.get(1).as_f64().unwrap_or(0.0) as u32;
    if width == 0 || height == 0 {
        return Err("invalid image dimensions".to_string());
    }
    Ok((width, height))
}

/// Reads and validates an uploaded file into a storable record.
pub(crate) async fn file_to_entry(file: &File) -> Result<ImageBlobEntry, String> {
    let mime = file.type_();
    let len = file.size().max(0.0) as usize;
    ahatouch_core::validate_upload(&mime, len)?;
    let bytes = read_file_bytes(file).await?;
    let (width, height) = load_image_dimensions(file).await?;
    let size = (bytes.len() as u64).min(u32::MAX as u64) as u32;
    Ok(ImageBlobEntry {
        name: file.name(),
        mime,
        bytes,
        width,
        height,
        size,
        created_at: now_ms(),
    })
}
