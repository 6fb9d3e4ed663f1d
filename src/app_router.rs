use gloo::events::EventListener;
use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::persisted_store;
use ahatouch_core::{Difficulty, Route};

pub(crate) fn current_route() -> Route {
    let hash = web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .unwrap_or_default();
    Route::parse(&hash)
}

pub(crate) fn navigate(route: &Route) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.location().set_hash(&route.path()) {
        gloo::console::warn!("navigation failed", err);
    }
}

/// Swaps the current history entry, so Back skips the page being replaced.
pub(crate) fn replace_route(route: &Route) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let replaced = window
        .history()
        .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&route.href())));
    match replaced {
        Ok(()) => {
            // replaceState does not fire hashchange.
            if let Ok(event) = web_sys::Event::new("hashchange") {
                let _ = window.dispatch_event(&event);
            }
        }
        Err(_) => navigate(route),
    }
}

#[hook]
pub(crate) fn use_route() -> Route {
    let route = use_state(current_route);
    {
        let route = route.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "hashchange", move |_| {
                    route.set(current_route());
                })
            });
            move || drop(listener)
        });
    }
    (*route).clone()
}

pub(crate) fn load_difficulty_preference() -> Difficulty {
    persisted_store::settings_blob().difficulty()
}

pub(crate) fn save_difficulty_preference(difficulty: Difficulty) {
    persisted_store::update_settings_blob(|settings| {
        settings.last_difficulty = difficulty.key().to_string();
    });
}

pub(crate) fn load_sound_enabled() -> bool {
    persisted_store::settings_blob().sound_enabled
}

pub(crate) fn save_sound_enabled(enabled: bool) {
    persisted_store::update_settings_blob(|settings| {
        settings.sound_enabled = enabled;
    });
}
