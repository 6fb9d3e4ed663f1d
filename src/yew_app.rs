use std::rc::Rc;

use yew::prelude::*;

use crate::app_router::{load_sound_enabled, replace_route, save_sound_enabled, use_route};
use crate::library_view::{MyLibrary, MyPlay};
use crate::quiz_view::QuizPage;
use crate::reveal_view::{Chirarizumu, ChirarizumuPlay};
use crate::swap_view::{PuzzlePicker, PuzzlePlay};
use ahatouch_core::Route;

/// Bumped to make a view reload what it shows from storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Generation(pub(crate) u32);

impl Reducible for Generation {
    type Action = ();

    fn reduce(self: Rc<Self>, _action: ()) -> Rc<Self> {
        Rc::new(Generation(self.0.wrapping_add(1)))
    }
}

pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[derive(Properties, PartialEq)]
pub(crate) struct BackLinkProps {
    pub(crate) route: Route,
    #[prop_or(AttrValue::Static("戻る"))]
    pub(crate) label: AttrValue,
}

#[function_component(BackLink)]
pub(crate) fn back_link(props: &BackLinkProps) -> Html {
    html! { <a class="back-link" href={props.route.href()}>{props.label.clone()}</a> }
}

#[derive(Properties, PartialEq)]
pub(crate) struct MissingImageProps {
    pub(crate) back: Route,
}

#[function_component(MissingImage)]
pub(crate) fn missing_image(props: &MissingImageProps) -> Html {
    html! {
        <section class="missing">
            <p>{"画像が見つかりませんでした。"}</p>
            <BackLink route={props.back.clone()} />
        </section>
    }
}

#[function_component(SoundToggle)]
fn sound_toggle() -> Html {
    let enabled = use_state(load_sound_enabled);
    let onclick = {
        let enabled = enabled.clone();
        Callback::from(move |_: MouseEvent| {
            let next = !*enabled;
            save_sound_enabled(next);
            enabled.set(next);
        })
    };
    let label = if *enabled { "🔊 音あり" } else { "🔇 音なし" };
    html! { <button class="sound-toggle" onclick={onclick}>{label}</button> }
}

#[function_component(Portal)]
fn portal() -> Html {
    html! {
        <section class="portal">
            <h1>{"NURU PORTAL"}</h1>
            <p class="note">{"アプリを選ぶ"}</p>
            <a class="tile" href={Route::Home.href()}>{"AHA TOUCH"}</a>
        </section>
    }
}

#[function_component(Home)]
fn home() -> Html {
    let tiles = [
        ("AHA TOUCH パズル", "入れ替えて完成させる", Route::PuzzlePicker { cat: None }),
        ("自分だけのAHA パズル", "自分の写真でパズル", Route::MyLibrary),
        ("みんなでチラリズム", "チラ見せで気づく", Route::Chirarizumu),
    ]
    .into_iter()
    .map(|(title, desc, route)| {
        html! {
            <a class="tile" href={route.href()}>
                <strong>{title}</strong>
                <span>{desc}</span>
            </a>
        }
    })
    .collect::<Html>();

    html! {
        <section class="home">
            <header>
                <h1>{"AHA TOUCH"}</h1>
                <p>{"あそぶ？ それとも、つくる？✨"}</p>
                <BackLink route={Route::Portal} label="NURU PORTAL" />
            </header>
            <div class="choices">
                <a class="choice" href={Route::Chirarizumu.href()}>{"あそぶ"}</a>
                <a class="choice" href={Route::MyLibrary.href()}>{"つくる"}</a>
            </div>
            <div class="tiles">{tiles}</div>
            <ul class="note">
                <li>{"ここでは遊び方だけを選びます"}</li>
                <li>{"むずかしさやカテゴリは次の画面で選択します"}</li>
            </ul>
            <SoundToggle />
        </section>
    }
}

#[function_component(NotFound)]
fn not_found() -> Html {
    html! {
        <section class="missing">
            <p>{"ページが見つかりませんでした。"}</p>
            <BackLink route={Route::Home} label="AHA TOUCH HOME" />
        </section>
    }
}

fn render_route(route: &Route) -> Html {
    match route.clone() {
        Route::Portal => html! { <Portal /> },
        Route::Home => html! { <Home /> },
        Route::PuzzlePicker { cat } => html! { <PuzzlePicker cat={cat} /> },
        Route::PuzzlePlay { id, cat } => html! { <PuzzlePlay id={id} cat={cat} /> },
        Route::MyLibrary => html! { <MyLibrary /> },
        Route::MyPlay { id } => html! { <MyPlay id={id} /> },
        Route::Chirarizumu => html! { <Chirarizumu /> },
        Route::ChirarizumuPlay { id } => html! { <ChirarizumuPlay id={id} /> },
        Route::Quiz { cat } => html! { <QuizPage cat={cat} /> },
        Route::NotFound => html! { <NotFound /> },
    }
}

#[function_component(App)]
pub(crate) fn app() -> Html {
    let route = use_route();
    {
        let route = route.clone();
        use_effect_with(route, |route| {
            gloo::console::log!("route", route.path());
            // Play pages without an id have nothing to show.
            let empty_play = match route {
                Route::PuzzlePlay { id, cat } if id.is_empty() => {
                    Some(Route::PuzzlePicker { cat: cat.clone() })
                }
                Route::MyPlay { id } if id.is_empty() => Some(Route::MyLibrary),
                Route::ChirarizumuPlay { id } if id.is_empty() => Some(Route::Chirarizumu),
                _ => None,
            };
            if let Some(target) = empty_play {
                replace_route(&target);
            }
            || ()
        });
    }
    html! {
        <main class="ahatouch">
            {render_route(&route)}
        </main>
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen::JsCast;
    use web_sys::{Element, HtmlElement};

    /// Fresh, empty container appended to `<body>`.
    pub(crate) fn mount_root(id: &str) -> Element {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        if let Some(stale) = document.get_element_by_id(id) {
            stale.remove();
        }
        let root = document.create_element("div").expect("create test root");
        root.set_id(id);
        document
            .body()
            .expect("body available")
            .append_child(&root)
            .expect("append test root");
        root
    }

    /// Lets yew flush pending renders and effects.
    pub(crate) async fn settle() {
        TimeoutFuture::new(20).await;
    }

    pub(crate) fn click(root: &Element, selector: &str) {
        root.query_selector(selector)
            .expect("valid selector")
            .expect("element present")
            .unchecked_into::<HtmlElement>()
            .click();
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{mount_root, settle};
    use super::*;
    use crate::app_router::navigate;
    use console_error_panic_hook::set_once as set_panic_hook;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn generation_only_moves_forward() {
        let first = Rc::new(Generation::default());
        let second = first.clone().reduce(());
        assert_eq!(second.0, 1);
        assert_eq!(second.reduce(()).0, 2);
    }

    #[wasm_bindgen_test(async)]
    async fn app_follows_the_location_hash() {
        set_panic_hook();
        navigate(&Route::Home);
        settle().await;
        let root = mount_root("app-test");
        let _handle = yew::Renderer::<App>::with_root(root.clone()).render();
        settle().await;
        assert!(root.query_selector(".home").expect("query").is_some());

        navigate(&Route::Quiz {
            cat: Some("animals".to_string()),
        });
        settle().await;
        assert!(root.query_selector(".quiz").expect("query").is_some());

        navigate(&Route::Home);
        settle().await;
    }

    #[wasm_bindgen_test(async)]
    async fn unknown_paths_render_not_found() {
        navigate(&Route::Home);
        settle().await;
        let root = mount_root("not-found-test");
        let _handle = yew::Renderer::<App>::with_root(root.clone()).render();
        settle().await;
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_hash("/nowhere");
        }
        settle().await;
        assert!(root.query_selector(".missing").expect("query").is_some());
        navigate(&Route::Home);
        settle().await;
    }
}
