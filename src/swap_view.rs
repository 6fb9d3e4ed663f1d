use gloo::timers::callback::{Interval, Timeout};
use yew::prelude::*;

use crate::app_router::{load_difficulty_preference, save_difficulty_preference};
use crate::local_storage::kv_storage;
use crate::puzzle_image::{asset_url, entropy, now_ms};
use crate::sfx::{self, Sfx};
use crate::yew_app::{BackLink, MissingImage};
use ahatouch_core::catalog::default_category;
use ahatouch_core::{
    calc_goals, category_by_id, format_ms, images_by_category, load_best, pick_random,
    puzzle_image_src, record_if_better, Difficulty, PuzzleBest, Route, SwapPuzzle, TapOutcome,
    CATEGORIES, DIFFICULTIES, PICKER_CARD_COUNT,
};

const TICK_MS: u32 = 250;
const TOAST_MS: u32 = 1800;

#[derive(Properties, PartialEq)]
pub(crate) struct PickerProps {
    pub(crate) cat: Option<String>,
}

#[function_component(PuzzlePicker)]
pub(crate) fn puzzle_picker(props: &PickerProps) -> Html {
    let category = props
        .cat
        .as_deref()
        .and_then(category_by_id)
        .unwrap_or_else(default_category);
    let draw = use_state(|| 0u32);
    let cards = use_memo((category.id, *draw), |(cat_id, _)| {
        pick_random(&images_by_category(cat_id), PICKER_CARD_COUNT, entropy())
    });
    let on_redraw = {
        let draw = draw.clone();
        Callback::from(move |_: MouseEvent| draw.set(draw.wrapping_add(1)))
    };

    let tabs = CATEGORIES
        .iter()
        .map(|entry| {
            let href = Route::PuzzlePicker {
                cat: Some(entry.id.to_string()),
            }
            .href();
            let class = classes!("tab", (entry.id == category.id).then_some("is-active"));
            html! { <a class={class} href={href}>{entry.label}</a> }
        })
        .collect::<Html>();
    let card_list = cards
        .iter()
        .map(|image| {
            let href = Route::PuzzlePlay {
                id: image.id.clone(),
                cat: Some(category.id.to_string()),
            }
            .href();
            html! {
                <a class="picker-card" href={href}>
                    <img src={asset_url(&image.src)} alt={image.id.clone()} loading="lazy" />
                </a>
            }
        })
        .collect::<Html>();

    html! {
        <section class="puzzle-picker">
            <BackLink route={Route::Home} />
            <nav class="tabs">{tabs}</nav>
            <div class="picker-grid">{card_list}</div>
            <button class="redraw" onclick={on_redraw}>{"ほかの絵"}</button>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PlayProps {
    pub(crate) id: String,
    pub(crate) cat: Option<String>,
}

#[function_component(PuzzlePlay)]
pub(crate) fn puzzle_play(props: &PlayProps) -> Html {
    let back = Route::PuzzlePicker {
        cat: props.cat.clone(),
    };
    match puzzle_image_src(&props.id, props.cat.as_deref()) {
        Some(src) => html! {
            <section class="puzzle-play">
                <BackLink route={back} />
                <SwapPuzzleBoard src={asset_url(&src)} image_key={props.id.clone()} />
            </section>
        },
        None => html! { <MissingImage back={back} /> },
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct BoardProps {
    pub(crate) src: AttrValue,
    /// Best scores are stored per image key and difficulty.
    pub(crate) image_key: AttrValue,
}

#[function_component(SwapPuzzleBoard)]
pub(crate) fn swap_puzzle_board(props: &BoardProps) -> Html {
    let difficulty = use_state(load_difficulty_preference);
    let puzzle = {
        let size = difficulty.grid_size();
        use_state(move || SwapPuzzle::unshuffled(size))
    };
    let best = use_state(|| None::<PuzzleBest>);
    let now = use_state(now_ms);
    let toast = use_state(|| false);
    let round = use_state(|| 0u32);

    {
        let puzzle = puzzle.clone();
        let best = best.clone();
        let toast = toast.clone();
        use_effect_with(
            (props.image_key.clone(), *difficulty, *round),
            move |(image_key, difficulty, _)| {
                puzzle.set(SwapPuzzle::shuffled(difficulty.grid_size(), entropy()));
                best.set(load_best(&kv_storage(), image_key, *difficulty));
                toast.set(false);
                || ()
            },
        );
    }
    {
        let now = now.clone();
        use_effect_with(puzzle.is_ticking(), move |ticking| {
            let interval = ticking.then(|| Interval::new(TICK_MS, move || now.set(now_ms())));
            move || drop(interval)
        });
    }
    {
        let hide = toast.clone();
        use_effect_with(*toast, move |visible| {
            let timeout = visible.then(|| Timeout::new(TOAST_MS, move || hide.set(false)));
            move || drop(timeout)
        });
    }

    let on_tap = {
        let puzzle = puzzle.clone();
        let best = best.clone();
        let toast = toast.clone();
        let image_key = props.image_key.clone();
        let difficulty = *difficulty;
        Callback::from(move |pos: usize| {
            let mut next = (*puzzle).clone();
            match next.tap(pos, now_ms()) {
                TapOutcome::Ignored => return,
                TapOutcome::Solved(result) => {
                    match record_if_better(&kv_storage(), &image_key, difficulty, result) {
                        Ok((shown, improved)) => {
                            if improved {
                                gloo::console::log!("new best", image_key.to_string(), shown.moves);
                            }
                            best.set(Some(shown));
                        }
                        Err(err) => gloo::console::warn!("best score not saved", err.to_string()),
                    }
                    toast.set(true);
                    sfx::play(Sfx::Aha);
                }
                TapOutcome::Selected | TapOutcome::Deselected | TapOutcome::Swapped => {}
            }
            puzzle.set(next);
        })
    };
    let on_difficulty = {
        let difficulty = difficulty.clone();
        Callback::from(move |next: Difficulty| {
            save_difficulty_preference(next);
            difficulty.set(next);
        })
    };
    let on_restart = {
        let round = round.clone();
        Callback::from(move |_: MouseEvent| {
            sfx::play(Sfx::Reset);
            round.set(round.wrapping_add(1));
        })
    };

    let size = puzzle.size();
    let sprite = format!("{}% {}%", size * 100, size * 100);
    let tiles = puzzle
        .order()
        .iter()
        .enumerate()
        .map(|(pos, &piece)| {
            let (x, y) = puzzle.tile_background(piece);
            let style = format!(
                "background-image:url('{}');background-size:{sprite};background-position:{x}% {y}%;",
                props.src
            );
            let class = classes!(
                "swap-tile",
                (puzzle.selected() == Some(pos)).then_some("is-selected")
            );
            html! { <button class={class} style={style} onclick={on_tap.reform(move |_: MouseEvent| pos)} /> }
        })
        .collect::<Html>();
    let difficulty_buttons = DIFFICULTIES
        .iter()
        .map(|&option| {
            let class = classes!("difficulty", (option == *difficulty).then_some("is-active"));
            html! {
                <button class={class} onclick={on_difficulty.reform(move |_: MouseEvent| option)}>
                    {option.label()}
                </button>
            }
        })
        .collect::<Html>();

    let goals = calc_goals((*best).map(|best| best.moves), *difficulty);
    let best_line = match *best {
        Some(best) => format!("ベスト: {} 手 / {}", best.moves, format_ms(best.time_ms)),
        None => "ベスト: まだありません".to_string(),
    };
    let toast_view = if *toast {
        html! { <div class="aha-toast">{"Aha!! 🎉"}</div> }
    } else {
        html! {}
    };

    html! {
        <div class="swap-board">
            <div class="difficulties">{difficulty_buttons}</div>
            <div class="status">
                <span>{format!("手数: {}", puzzle.moves())}</span>
                <span>{format!("タイム: {}", format_ms(puzzle.elapsed_ms(*now)))}</span>
            </div>
            <div class="goals">
                <span>{best_line}</span>
                <span>{format!("目標: {} 手 (挑戦: {} 手)", goals.goal, goals.stretch)}</span>
            </div>
            <div class="swap-grid" style={format!("grid-template-columns:repeat({size}, 1fr);")}>
                {tiles}
            </div>
            {toast_view}
            <button class="restart" onclick={on_restart}>{"シャッフル"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yew_app::test_support::{mount_root, settle};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test(async)]
    async fn board_renders_one_button_per_piece() {
        let root = mount_root("swap-board-test");
        let props = BoardProps {
            src: AttrValue::from("data:image/png;base64,AA"),
            image_key: AttrValue::from("animals_001"),
        };
        let _handle = yew::Renderer::<SwapPuzzleBoard>::with_root_and_props(root.clone(), props).render();
        settle().await;
        let size = load_difficulty_preference().grid_size();
        let tiles = root.query_selector_all(".swap-tile").expect("query tiles");
        assert_eq!(tiles.length() as usize, size * size);
    }

    #[wasm_bindgen_test(async)]
    async fn picker_draws_six_cards() {
        let root = mount_root("picker-test");
        let props = PickerProps {
            cat: Some("flowers".to_string()),
        };
        let _handle = yew::Renderer::<PuzzlePicker>::with_root_and_props(root.clone(), props).render();
        settle().await;
        let cards = root.query_selector_all(".picker-card").expect("query cards");
        assert_eq!(cards.length() as usize, PICKER_CARD_COUNT);
    }
}
