use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::app_router::load_sound_enabled;
use crate::puzzle_image::asset_url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Sfx {
    Open,
    Lock,
    Reset,
    Clear,
    Aha,
}

impl Sfx {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Sfx::Open => "open",
            Sfx::Lock => "lock",
            Sfx::Reset => "reset",
            Sfx::Clear => "clear",
            Sfx::Aha => "aha",
        }
    }

    pub(crate) fn volume(self) -> f64 {
        match self {
            Sfx::Open | Sfx::Clear => 0.7,
            Sfx::Reset => 0.6,
            Sfx::Lock | Sfx::Aha => 1.0,
        }
    }

    pub(crate) fn src(self) -> String {
        asset_url(&format!("/sounds/{}.mp3", self.name()))
    }
}

/// Fire-and-forget; a blocked or missing clip only logs.
pub(crate) fn play(sfx: Sfx) {
    if !load_sound_enabled() {
        return;
    }
    let audio = match HtmlAudioElement::new_with_src(&sfx.src()) {
        Ok(audio) => audio,
        Err(err) => {
            gloo::console::warn!("audio unavailable", sfx.name(), err);
            return;
        }
    };
    audio.set_volume(sfx.volume());
    let promise = match audio.play() {
        Ok(promise) => promise,
        Err(err) => {
            gloo::console::warn!("audio play failed", sfx.name(), err);
            return;
        }
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            gloo::console::warn!("audio blocked", sfx.name(), err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn sources_follow_sound_names() {
        assert!(Sfx::Aha.src().ends_with("/sounds/aha.mp3"));
        assert!(Sfx::Lock.src().ends_with("/sounds/lock.mp3"));
    }
}
