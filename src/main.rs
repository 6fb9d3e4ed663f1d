mod app_router;
mod idb;
mod library_view;
mod local_storage;
mod persisted;
mod persisted_store;
mod puzzle_image;
mod quiz_view;
mod reveal_view;
mod sfx;
mod swap_view;
mod yew_app;

fn main() {
    console_error_panic_hook::set_once();
    wasm_bindgen_futures::spawn_local(async {
        // Settings fall back to defaults when IndexedDB is unavailable.
        if let Err(err) = persisted_store::bootstrap().await {
            gloo::console::warn!("storage bootstrap failed", err);
        }
        yew::Renderer::<yew_app::App>::new().render();
    });
}
