use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::local_storage::image_library;
use crate::puzzle_image::{asset_url, data_url, entropy, file_to_entry, now_ms};
use crate::sfx::{self, Sfx};
use crate::yew_app::{confirm, BackLink, Generation, MissingImage};
use ahatouch_core::catalog::{chira_fallback_src, CHIRA_STATIC_IDS};
use ahatouch_core::{ImageWithSrc, RevealBoard, Route, ToggleOutcome, CATEGORIES, CHIRA_LIBRARY};

const REVEAL_COLS: usize = 4;
const REVEAL_ROWS: usize = 4;
const FLIP_BUDGETS: [Option<u32>; 4] = [None, Some(3), Some(5), Some(8)];
const LOCK_NOTICE_MS: u32 = 1200;

fn imported_images() -> Vec<ImageWithSrc> {
    match image_library(CHIRA_LIBRARY).list_with_src() {
        Ok(images) => images,
        Err(err) => {
            gloo::console::warn!("chirarizumu index unreadable", err.to_string());
            Vec::new()
        }
    }
}

/// Files become data URLs in `localStorage`; quota errors come back per file.
async fn import_chira_files(files: Vec<File>) -> Vec<String> {
    let library = image_library(CHIRA_LIBRARY);
    let mut errors = Vec::new();
    for file in files {
        let name = file.name();
        let saved = match file_to_entry(&file).await {
            Ok(entry) => library
                .save(
                    &entry.name,
                    &data_url(&entry.bytes, &entry.mime),
                    now_ms(),
                    entropy(),
                )
                .map(|_| ())
                .map_err(|err| err.to_string()),
            Err(message) => Err(message),
        };
        if let Err(message) = saved {
            gloo::console::warn!("chirarizumu import failed", name.clone(), message.clone());
            errors.push(format!("{name}: {message}"));
        }
    }
    errors
}

fn chira_card(id: &str, label: &str, src: &str, on_delete: Option<Callback<MouseEvent>>) -> Html {
    let href = Route::ChirarizumuPlay { id: id.to_string() }.href();
    let delete = on_delete
        .map(|onclick| html! { <button class="delete" onclick={onclick}>{"削除"}</button> })
        .unwrap_or_else(|| html! {});
    html! {
        <figure class="chira-card">
            <a href={href}>
                <img src={asset_url(src)} alt={label.to_string()} loading="lazy" draggable="false" />
            </a>
            <figcaption>{label.to_string()}</figcaption>
            {delete}
        </figure>
    }
}

#[function_component(Chirarizumu)]
pub(crate) fn chirarizumu() -> Html {
    let generation = use_reducer(Generation::default);
    let imported = use_memo(generation.0, |_| imported_images());
    let busy = use_state(|| false);
    let errors = use_state(Vec::<String>::new);

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
                errors.set(import_chira_files(files).await);
                busy.set(false);
                generation.dispatch(());
            });
        })
    };
    let on_delete = {
        let generation = generation.clone();
        let errors = errors.clone();
        Callback::from(move |id: String| {
            if let Err(err) = image_library(CHIRA_LIBRARY).delete(&id) {
                errors.set(vec![err.to_string()]);
            }
            generation.dispatch(());
        })
    };
    let on_clear = {
        let generation = generation.clone();
        let errors = errors.clone();
        Callback::from(move |_: MouseEvent| {
            if !confirm("取り込んだ画像をすべて削除しますか？") {
                return;
            }
            sfx::play(Sfx::Clear);
            let failures = match image_library(CHIRA_LIBRARY).clear() {
                Ok(()) => Vec::new(),
                Err(err) => vec![err.to_string()],
            };
            errors.set(failures);
            generation.dispatch(());
        })
    };

    let static_cards = CHIRA_STATIC_IDS
        .iter()
        .map(|id| chira_card(id, id, &chira_fallback_src(id), None))
        .collect::<Html>();
    let imported_cards = imported
        .iter()
        .filter_map(|image| {
            let src = image.src.as_deref()?;
            let id = image.meta.id.clone();
            let remove = on_delete.reform(move |_: MouseEvent| id.clone());
            Some(chira_card(&image.meta.id, &image.meta.name, src, Some(remove)))
        })
        .collect::<Html>();
    let quiz_links = CATEGORIES
        .iter()
        .map(|entry| {
            let href = Route::Quiz {
                cat: Some(entry.id.to_string()),
            }
            .href();
            html! { <a class="quiz-link" href={href}>{format!("{}（100枚めくり）", entry.label)}</a> }
        })
        .collect::<Html>();
    let error_list = errors
        .iter()
        .map(|message| html! { <li>{message.clone()}</li> })
        .collect::<Html>();

    html! {
        <section class="chirarizumu">
            <BackLink route={Route::Home} />
            <h1>{"みんなでチラリズム"}</h1>
            <p class="note">{"順番にめくって楽しもう"}</p>
            <nav class="quiz-links">{quiz_links}</nav>
            <div class="chira-grid">{static_cards}</div>
            <h2>{"取り込んだ画像"}</h2>
            <label class="upload">
                {if *busy { "取り込み中…" } else { "画像を取り込む" }}
                <input type="file" accept="image/*" multiple=true disabled={*busy} onchange={on_files} />
            </label>
            <ul class="errors">{error_list}</ul>
            <div class="chira-grid">{imported_cards}</div>
            <button class="clear" onclick={on_clear} disabled={imported.is_empty()}>{"すべて削除"}</button>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ChiraPlayProps {
    pub(crate) id: String,
}

#[function_component(ChirarizumuPlay)]
pub(crate) fn chirarizumu_play(props: &ChiraPlayProps) -> Html {
    let src = use_memo(props.id.clone(), |id| {
        image_library(CHIRA_LIBRARY)
            .src_by_id(id.trim())
            .unwrap_or_else(|err| {
                gloo::console::warn!("chirarizumu image unreadable", err.to_string());
                None
            })
    });
    let budget = use_state(|| None::<u32>);
    let back = Route::Chirarizumu;

    let Some(src) = (*src).clone() else {
        return html! { <MissingImage back={back} /> };
    };
    let budget_buttons = FLIP_BUDGETS
        .iter()
        .map(|&option| {
            let label = option.map_or_else(|| "無制限".to_string(), |max| format!("{max}枚まで"));
            let class = classes!("budget", (option == *budget).then_some("is-active"));
            let onclick = {
                let budget = budget.clone();
                Callback::from(move |_: MouseEvent| budget.set(option))
            };
            html! { <button class={class} onclick={onclick}>{label}</button> }
        })
        .collect::<Html>();

    html! {
        <section class="chira-play">
            <BackLink route={back} />
            <div class="budgets">{budget_buttons}</div>
            <RevealBoardView
                src={asset_url(&src)}
                cols={REVEAL_COLS}
                rows={REVEAL_ROWS}
                max_flips={*budget}
                board_key={props.id.clone()}
            />
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct RevealBoardProps {
    pub(crate) src: AttrValue,
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    #[prop_or_default]
    pub(crate) max_flips: Option<u32>,
    /// A new key closes every tile.
    #[prop_or_default]
    pub(crate) board_key: AttrValue,
}

#[function_component(RevealBoardView)]
pub(crate) fn reveal_board_view(props: &RevealBoardProps) -> Html {
    let board = {
        let (cols, rows, max_flips) = (props.cols, props.rows, props.max_flips);
        use_state(move || RevealBoard::new(cols, rows, max_flips))
    };
    let locked = use_state(|| false);
    {
        let board = board.clone();
        use_effect_with(
            (
                props.src.clone(),
                props.cols,
                props.rows,
                props.max_flips,
                props.board_key.clone(),
            ),
            move |(_, cols, rows, max_flips, _)| {
                board.set(RevealBoard::new(*cols, *rows, *max_flips));
                || ()
            },
        );
    }
    {
        let hide = locked.clone();
        use_effect_with(*locked, move |visible| {
            let timeout = visible.then(|| Timeout::new(LOCK_NOTICE_MS, move || hide.set(false)));
            move || drop(timeout)
        });
    }

    let on_toggle = {
        let board = board.clone();
        let locked = locked.clone();
        Callback::from(move |idx: usize| {
            let mut next = (*board).clone();
            match next.toggle(idx) {
                ToggleOutcome::Opened => sfx::play(Sfx::Open),
                ToggleOutcome::Closed => {}
                ToggleOutcome::Locked => {
                    sfx::play(Sfx::Lock);
                    locked.set(true);
                    return;
                }
                ToggleOutcome::Ignored => return,
            }
            board.set(next);
        })
    };
    let on_reset = {
        let board = board.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*board).clone();
            next.reset();
            board.set(next);
            sfx::play(Sfx::Reset);
        })
    };

    let sprite = format!("{}% {}%", board.cols() * 100, board.rows() * 100);
    let tiles = (0..board.len())
        .map(|idx| {
            let face = if board.is_open(idx) {
                let (x, y) = board.tile_background(idx);
                let style = format!(
                    "background-image:url('{}');background-size:{sprite};background-position:{x}% {y}%;",
                    props.src
                );
                html! { <div class="face is-open" style={style} /> }
            } else {
                html! { <div class="face" /> }
            };
            html! {
                <button type="button" class="reveal-tile" onclick={on_toggle.reform(move |_: MouseEvent| idx)}>
                    {face}
                </button>
            }
        })
        .collect::<Html>();
    let counter = match board.max_flips() {
        Some(max) => format!("めくり：{}/{}", board.flipped_count(), max),
        None => format!("めくり：{}", board.flipped_count()),
    };
    let lock_notice = if *locked {
        html! { <div class="lock-notice">{"これ以上めくれません"}</div> }
    } else {
        html! {}
    };

    html! {
        <div class="reveal-board">
            <div class="reveal-grid" style={format!("grid-template-columns:repeat({}, minmax(0, 1fr));", board.cols())}>
                {tiles}
            </div>
            {lock_notice}
            <div class="status">
                <span>{counter}</span>
                <button class="reset" onclick={on_reset}>{"リセット"}</button>
            </div>
        </div>
    }
}
