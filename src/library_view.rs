use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::local_storage::image_library;
use crate::persisted_store;
use crate::puzzle_image::{entropy, entry_object_url, file_to_entry, now_ms, revoke_object_url};
use crate::sfx::{self, Sfx};
use crate::swap_view::SwapPuzzleBoard;
use crate::yew_app::{confirm, BackLink, Generation, MissingImage};
use ahatouch_core::{ImageMeta, Route, USER_LIBRARY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    /// Record in the IndexedDB `images` store, shown through an object URL.
    Blob,
    /// Data URL kept in `localStorage` by older builds.
    Inline,
}

#[derive(Clone, Debug, PartialEq)]
struct LibraryItem {
    meta: ImageMeta,
    src: String,
    source: Source,
}

async fn load_items() -> Result<Vec<LibraryItem>, String> {
    let mut items = Vec::new();
    for (meta, entry) in persisted_store::list_image_entries().await? {
        if let Some(src) = entry_object_url(&entry) {
            items.push(LibraryItem {
                meta,
                src,
                source: Source::Blob,
            });
        }
    }
    match image_library(USER_LIBRARY).list_with_src() {
        Ok(inline) => items.extend(inline.into_iter().filter_map(|image| {
            Some(LibraryItem {
                src: image.src?,
                meta: image.meta,
                source: Source::Inline,
            })
        })),
        Err(err) => gloo::console::warn!("inline images unreadable", err.to_string()),
    }
    Ok(items)
}

fn revoke_items(items: &[LibraryItem]) {
    for item in items.iter().filter(|item| item.source == Source::Blob) {
        revoke_object_url(&item.src);
    }
}

async fn import_files(files: Vec<File>) -> Vec<String> {
    let mut errors = Vec::new();
    for file in files {
        let name = file.name();
        let saved = match file_to_entry(&file).await {
            Ok(entry) => persisted_store::save_image_blob(entry, entropy()).await,
            Err(message) => Err(message),
        };
        if let Err(message) = saved {
            gloo::console::warn!("upload rejected", name.clone(), message.clone());
            errors.push(format!("{name}: {message}"));
        }
    }
    errors
}

#[function_component(MyLibrary)]
pub(crate) fn my_library() -> Html {
    let generation = use_reducer(Generation::default);
    let items = use_state(Vec::<LibraryItem>::new);
    let loading = use_state(|| true);
    let busy = use_state(|| false);
    let errors = use_state(Vec::<String>::new);

    {
        let items = items.clone();
        let loading = loading.clone();
        let errors = errors.clone();
        use_effect_with(generation.0, move |_| {
            let alive = Rc::new(Cell::new(true));
            {
                let alive = alive.clone();
                spawn_local(async move {
                    match load_items().await {
                        Ok(loaded) if !alive.get() => revoke_items(&loaded),
                        Ok(loaded) => items.set(loaded),
                        Err(message) => {
                            gloo::console::warn!("library load failed", message.clone());
                            errors.set(vec![message]);
                        }
                    }
                    loading.set(false);
                });
            }
            move || alive.set(false)
        });
    }
    // A list's object URLs are revoked once its replacement has rendered.
    use_effect_with((*items).clone(), |shown| {
        let shown = shown.clone();
        move || revoke_items(&shown)
    });

    let on_files = {
        let generation = generation.clone();
        let busy = busy.clone();
        let errors = errors.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let Some(list) = input.files() else {
                return;
            };
            let files: Vec<File> = (0..list.length()).filter_map(|idx| list.get(idx)).collect();
            input.set_value("");
            if files.is_empty() {
                return;
            }
            busy.set(true);
            let generation = generation.clone();
            let busy = busy.clone();
            let errors = errors.clone();
            spawn_local(async move {
                errors.set(import_files(files).await);
                busy.set(false);
                generation.dispatch(());
            });
        })
    };
    let on_delete = {
        let generation = generation.clone();
        let errors = errors.clone();
        Callback::from(move |item: LibraryItem| {
            let generation = generation.clone();
            let errors = errors.clone();
            match item.source {
                Source::Blob => spawn_local(async move {
                    if let Err(message) =
                        persisted_store::delete_image_blob(&item.meta.id, now_ms()).await
                    {
                        errors.set(vec![message]);
                    }
                    generation.dispatch(());
                }),
                Source::Inline => {
                    if let Err(err) = image_library(USER_LIBRARY).delete(&item.meta.id) {
                        errors.set(vec![err.to_string()]);
                    }
                    generation.dispatch(());
                }
            }
        })
    };
    let on_clear = {
        let generation = generation.clone();
        let errors = errors.clone();
        Callback::from(move |_: MouseEvent| {
            if !confirm("保存した写真をすべて削除しますか？") {
                return;
            }
            sfx::play(Sfx::Clear);
            let generation = generation.clone();
            let errors = errors.clone();
            spawn_local(async move {
                let mut failures = Vec::new();
                if let Err(message) = persisted_store::clear_image_blobs().await {
                    failures.push(message);
                }
                if let Err(err) = image_library(USER_LIBRARY).clear() {
                    failures.push(err.to_string());
                }
                errors.set(failures);
                generation.dispatch(());
            });
        })
    };

    let body = if *loading {
        html! { <p class="note">{"読み込み中…"}</p> }
    } else if items.is_empty() {
        html! { <p class="note">{"まだ写真がありません。"}</p> }
    } else {
        items
            .iter()
            .map(|item| {
                let href = Route::MyPlay {
                    id: item.meta.id.clone(),
                }
                .href();
                let remove = {
                    let item = item.clone();
                    on_delete.reform(move |_: MouseEvent| item.clone())
                };
                html! {
                    <figure class="library-card">
                        <a href={href}>
                            <img src={item.src.clone()} alt={item.meta.name.clone()} loading="lazy" />
                        </a>
                        <figcaption>{item.meta.name.clone()}</figcaption>
                        <button class="delete" onclick={remove}>{"削除"}</button>
                    </figure>
                }
            })
            .collect::<Html>()
    };
    let error_list = errors
        .iter()
        .map(|message| html! { <li>{message.clone()}</li> })
        .collect::<Html>();

    html! {
        <section class="my-library">
            <BackLink route={Route::Home} />
            <label class="upload">
                {if *busy { "保存中…" } else { "写真を追加" }}
                <input type="file" accept="image/*" multiple=true disabled={*busy} onchange={on_files} />
            </label>
            <ul class="errors">{error_list}</ul>
            <div class="library-grid">{body}</div>
            <button class="clear" onclick={on_clear} disabled={items.is_empty()}>{"すべて削除"}</button>
        </section>
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Loaded {
    Pending,
    Missing,
    Ready(String),
}

#[derive(Properties, PartialEq)]
pub(crate) struct MyPlayProps {
    pub(crate) id: String,
}

#[function_component(MyPlay)]
pub(crate) fn my_play(props: &MyPlayProps) -> Html {
    let loaded = use_state(|| Loaded::Pending);
    {
        let loaded = loaded.clone();
        use_effect_with(props.id.clone(), move |id| {
            let alive = Rc::new(Cell::new(true));
            let object_url: Rc<RefCell<Option<String>>> = Rc::default();
            loaded.set(Loaded::Pending);
            {
                let id = id.clone();
                let alive = alive.clone();
                let object_url = object_url.clone();
                spawn_local(async move {
                    let blob = match persisted_store::load_image_blob(&id).await {
                        Ok(entry) => entry.as_ref().and_then(entry_object_url),
                        Err(message) => {
                            gloo::console::warn!("photo load failed", id.clone(), message);
                            None
                        }
                    };
                    if !alive.get() {
                        if let Some(url) = blob {
                            revoke_object_url(&url);
                        }
                        return;
                    }
                    let src = match blob {
                        Some(url) => {
                            *object_url.borrow_mut() = Some(url.clone());
                            Some(url)
                        }
                        None => image_library(USER_LIBRARY).src_by_id(&id).ok().flatten(),
                    };
                    loaded.set(src.map(Loaded::Ready).unwrap_or(Loaded::Missing));
                });
            }
            move || {
                alive.set(false);
                if let Some(url) = object_url.borrow_mut().take() {
                    revoke_object_url(&url);
                }
            }
        });
    }

    let back = Route::MyLibrary;
    match &*loaded {
        Loaded::Pending => html! { <p class="note">{"読み込み中…"}</p> },
        Loaded::Missing => html! { <MissingImage back={back} /> },
        Loaded::Ready(src) => html! {
            <section class="puzzle-play">
                <BackLink route={back} />
                <SwapPuzzleBoard src={src.clone()} image_key={props.id.clone()} />
            </section>
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yew_app::test_support::{click, mount_root, settle};
    use ahatouch_core::ImageBlobEntry;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;
    use web_sys::{Element, HtmlImageElement};

    wasm_bindgen_test_configure!(run_in_browser);

    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn pixel_entry(name: &str, created_at: u64) -> ImageBlobEntry {
        let bytes = STANDARD.decode(PIXEL_PNG).expect("pixel png");
        ImageBlobEntry {
            name: name.to_string(),
            mime: "image/png".to_string(),
            size: bytes.len() as u32,
            bytes,
            width: 1,
            height: 1,
            created_at,
        }
    }

    fn shown_srcs(root: &Element) -> Vec<String> {
        let nodes = root.query_selector_all(".library-card img").expect("query");
        (0..nodes.length())
            .filter_map(|idx| nodes.get(idx))
            .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
            .map(|img| img.src())
            .collect()
    }

    async fn loads(src: &str) -> bool {
        let img = HtmlImageElement::new().expect("image element");
        img.set_src(src);
        JsFuture::from(img.decode()).await.is_ok()
    }

    async fn wait_for_cards(root: &Element, count: usize) {
        for _ in 0..100 {
            if shown_srcs(root).len() == count {
                return;
            }
            settle().await;
        }
        panic!("expected {count} library cards");
    }

    #[wasm_bindgen_test(async)]
    async fn library_merges_blob_and_inline_photos() {
        persisted_store::clear_image_blobs().await.expect("clear blobs");
        let inline = image_library(USER_LIBRARY);
        inline.clear().expect("clear inline");

        let entry = ImageBlobEntry {
            name: "park.png".to_string(),
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3],
            width: 1,
            height: 1,
            size: 3,
            created_at: 5,
        };
        let blob_id = persisted_store::save_image_blob(entry, 9)
            .await
            .expect("save blob");
        let inline_id = inline
            .save("old.png", "data:image/png;base64,AA", 4, 1)
            .expect("save inline");

        let items = load_items().await.expect("load");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].meta.id, blob_id);
        assert_eq!(items[0].source, Source::Blob);
        assert!(items[0].src.starts_with("blob:"));
        assert_eq!(items[1].meta.id, inline_id);
        assert_eq!(items[1].src, "data:image/png;base64,AA");
        revoke_items(&items);

        persisted_store::clear_image_blobs().await.expect("clear blobs");
        inline.clear().expect("clear inline");
    }

    #[wasm_bindgen_test(async)]
    async fn shown_photos_stay_loadable_across_reloads() {
        persisted_store::clear_image_blobs().await.expect("clear blobs");
        image_library(USER_LIBRARY).clear().expect("clear inline");
        persisted_store::save_image_blob(pixel_entry("older.png", 1), 1)
            .await
            .expect("save older");
        persisted_store::save_image_blob(pixel_entry("newer.png", 2), 2)
            .await
            .expect("save newer");

        let root = mount_root("library-reload-test");
        let handle = yew::Renderer::<MyLibrary>::with_root(root.clone()).render();
        wait_for_cards(&root, 2).await;
        let before = shown_srcs(&root);
        for src in &before {
            assert!(loads(src).await, "{src} should load");
        }

        click(&root, ".library-card:last-of-type .delete");
        for _ in 0..200 {
            let srcs = shown_srcs(&root);
            for src in &srcs {
                assert!(loads(src).await, "{src} should load while shown");
            }
            if srcs.len() == 1 {
                break;
            }
            TimeoutFuture::new(1).await;
        }
        wait_for_cards(&root, 1).await;
        settle().await;
        let after = shown_srcs(&root);
        assert_ne!(after[0], before[0]);
        assert!(!loads(&before[0]).await, "replaced url is revoked");

        handle.destroy();
        settle().await;
        assert!(!loads(&after[0]).await, "unmount revokes the shown url");

        persisted_store::clear_image_blobs().await.expect("clear blobs");
    }
}
