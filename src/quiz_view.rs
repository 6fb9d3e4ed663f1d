use yew::prelude::*;

use crate::puzzle_image::asset_url;
use crate::sfx::{self, Sfx};
use crate::yew_app::BackLink;
use ahatouch_core::catalog::default_category;
use ahatouch_core::{category_by_id, QuizGrid, Route, QUIZ_TILE_COUNT};

#[derive(Properties, PartialEq)]
pub(crate) struct QuizProps {
    pub(crate) cat: Option<String>,
}

#[function_component(QuizPage)]
pub(crate) fn quiz_page(props: &QuizProps) -> Html {
    let category = props
        .cat
        .as_deref()
        .and_then(category_by_id)
        .unwrap_or_else(default_category);
    let grid = use_state(QuizGrid::new);
    {
        let grid = grid.clone();
        use_effect_with(category.id, move |_| {
            grid.set(QuizGrid::new());
            || ()
        });
    }

    let on_open = {
        let grid = grid.clone();
        Callback::from(move |idx: usize| {
            let mut next = (*grid).clone();
            if next.open(idx) {
                sfx::play(Sfx::Open);
                grid.set(next);
            }
        })
    };
    let on_reset = {
        let grid = grid.clone();
        Callback::from(move |_: MouseEvent| {
            grid.set(QuizGrid::new());
            sfx::play(Sfx::Reset);
        })
    };
    let on_open_all = {
        let grid = grid.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*grid).clone();
            next.open_all();
            grid.set(next);
            sfx::play(Sfx::Clear);
        })
    };

    let covers = (0..QUIZ_TILE_COUNT)
        .map(|idx| {
            let rect = QuizGrid::tile_rect(idx);
            let style = format!(
                "left:{}%;top:{}%;width:{}%;height:{}%;",
                rect.left, rect.top, rect.width, rect.height
            );
            let class = classes!("quiz-cover", grid.is_open(idx).then_some("is-open"));
            html! {
                <button
                    type="button"
                    class={class}
                    style={style}
                    aria-label={format!("tile-{idx}")}
                    onclick={on_open.reform(move |_: MouseEvent| idx)}
                />
            }
        })
        .collect::<Html>();
    let done = if grid.all_opened() {
        html! { <div class="quiz-done">{"ぜんぶ見えた！"}</div> }
    } else {
        html! {}
    };

    html! {
        <section class="quiz">
            <h1>{format!("ちらりずむ（{}）", category.label)}</h1>
            <p class="note">{"100枚めくり"}</p>
            <div class="quiz-count">{format!("{}/{}", grid.opened_count(), QUIZ_TILE_COUNT)}</div>
            <div class="quiz-actions">
                <BackLink route={Route::Chirarizumu} label="カテゴリへ戻る" />
                <button onclick={on_reset}>{"リセット"}</button>
                <button onclick={on_open_all}>{"全開"}</button>
            </div>
            <div class="quiz-stage">
                <img src={asset_url(category.cover_src)} alt={category.label} draggable="false" />
                <div class="quiz-covers">{covers}</div>
                {done}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yew_app::test_support::{click, mount_root, settle};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test(async)]
    async fn open_all_shows_the_done_banner() {
        let root = mount_root("quiz-test");
        let props = QuizProps {
            cat: Some("world".to_string()),
        };
        let _handle = yew::Renderer::<QuizPage>::with_root_and_props(root.clone(), props).render();
        settle().await;
        assert_eq!(
            root.query_selector_all(".quiz-cover").expect("query").length() as usize,
            QUIZ_TILE_COUNT
        );
        click(&root, ".quiz-cover");
        settle().await;
        assert_eq!(root.query_selector_all(".quiz-cover.is-open").expect("query").length(), 1);
        assert!(root.query_selector(".quiz-done").expect("query").is_none());

        click(&root, ".quiz-actions button:nth-of-type(2)");
        settle().await;
        assert!(root.query_selector(".quiz-done").expect("query").is_some());
    }
}
