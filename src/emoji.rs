//! Emoji picker: a lazily-loaded, categorized glyph catalog with
//! incremental search, presented inside the shared dialog.
//!
//! The catalog is one static JSON document. It is fetched at most once per
//! session: the first caller starts the fetch and every caller that arrives
//! while it is in flight waits on the same load. A failed load is reported
//! and the loader resets, so the next user action retries from scratch.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::dialog::ModalHandle;
use crate::toast::ToastHandle;

pub const CATALOG_URL: &str = "/static/emojis.json";
/// Searching only kicks in from two typed characters.
pub const MIN_QUERY_LEN: usize = 2;
pub const SEARCH_RESULT_CAP: usize = 50;

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct EmojiEntry {
    pub glyph: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct EmojiGroup {
    pub name: String,
    pub emojis: Vec<EmojiEntry>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
pub struct EmojiCatalog {
    pub groups: Vec<EmojiGroup>,
}

impl EmojiCatalog {
    /// Keyword search over the whole catalog, case-insensitive. Entries whose
    /// keyword starts with the query come before plain substring hits, both
    /// in catalog order. Capped at [`SEARCH_RESULT_CAP`].
    pub fn search(&self, query: &str) -> Vec<&EmojiEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut prefix_hits = Vec::new();
        let mut substring_hits = Vec::new();
        for group in &self.groups {
            for entry in &group.emojis {
                let mut hit_prefix = false;
                let mut hit_substring = false;
                for keyword in &entry.keywords {
                    let keyword = keyword.to_lowercase();
                    if keyword.starts_with(&needle) {
                        hit_prefix = true;
                        break;
                    }
                    if keyword.contains(&needle) {
                        hit_substring = true;
                    }
                }
                if hit_prefix {
                    prefix_hits.push(entry);
                } else if hit_substring {
                    substring_hits.push(entry);
                }
            }
        }

        prefix_hits.extend(substring_hits);
        prefix_hits.truncate(SEARCH_RESULT_CAP);
        prefix_hits
    }
}

type Waiter = Callback<Result<Rc<EmojiCatalog>, String>>;

enum LoadState {
    Idle,
    Loading(Vec<Waiter>),
    Ready(Rc<EmojiCatalog>),
}

/// Single-flight catalog loader, shared through context.
#[derive(Clone)]
pub struct CatalogLoader {
    url: Rc<String>,
    state: Rc<RefCell<LoadState>>,
}

impl PartialEq for CatalogLoader {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl CatalogLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Rc::new(url.into()),
            state: Rc::new(RefCell::new(LoadState::Idle)),
        }
    }

    /// Hand the catalog to `waiter` once it is available, fetching it on the
    /// first call. Concurrent callers share the in-flight fetch.
    pub fn ensure(&self, waiter: Waiter) {
        if self.enqueue(waiter) {
            let loader = self.clone();
            spawn_local(async move {
                let result = fetch_catalog(&loader.url).await;
                if let Err(err) = &result {
                    gloo_console::error!(format!("emoji catalog load failed: {err}"));
                }
                loader.finish(result);
            });
        }
    }

    /// Returns true when this caller has to start the fetch.
    fn enqueue(&self, waiter: Waiter) -> bool {
        let mut state = self.state.borrow_mut();
        match &mut *state {
            LoadState::Ready(catalog) => {
                let catalog = catalog.clone();
                drop(state);
                waiter.emit(Ok(catalog));
                false
            }
            LoadState::Loading(waiters) => {
                waiters.push(waiter);
                false
            }
            LoadState::Idle => {
                *state = LoadState::Loading(vec![waiter]);
                true
            }
        }
    }

    fn finish(&self, result: Result<EmojiCatalog, String>) {
        let mut state = self.state.borrow_mut();
        let waiters = match std::mem::replace(&mut *state, LoadState::Idle) {
            LoadState::Loading(waiters) => waiters,
            other => {
                *state = other;
                return;
            }
        };
        let shared = result.map(Rc::new);
        if let Ok(catalog) = &shared {
            *state = LoadState::Ready(catalog.clone());
        }
        drop(state);
        for waiter in waiters {
            waiter.emit(shared.clone());
        }
    }
}

async fn fetch_catalog(url: &str) -> Result<EmojiCatalog, String> {
    let response = Request::get(url).send().await.map_err(|e| e.to_string())?;
    response
        .json::<EmojiCatalog>()
        .await
        .map_err(|e| e.to_string())
}

/// Write the picked glyph into the input it was opened for. The input may
/// have been replaced or removed since then; that is fine, nothing happens.
fn write_selection(target_id: &str, glyph: &str) {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(target_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok());
    if let Some(input) = input {
        input.set_value(glyph);
    }
}

/// Open the picker for the input identified by `target_id`. Selecting a
/// glyph writes it into that input and closes the dialog.
pub fn open_emoji_picker(
    modal: &ModalHandle,
    loader: &CatalogLoader,
    toasts: &ToastHandle,
    target_id: &str,
) {
    let modal = modal.clone();
    let toasts = toasts.clone();
    let target_id = target_id.to_string();
    loader.ensure(Callback::from(
        move |result: Result<Rc<EmojiCatalog>, String>| match result {
            Ok(catalog) => {
                let on_pick = {
                    let modal = modal.clone();
                    let target_id = target_id.clone();
                    Callback::from(move |glyph: String| {
                        write_selection(&target_id, &glyph);
                        modal.close();
                    })
                };
                let footer = {
                    let modal = modal.clone();
                    html! {
                        <button class="btn btn-secondary" onclick={Callback::from(move |_| modal.close())}>
                            {"Cancel"}
                        </button>
                    }
                };
                modal.open(
                    "Select Emoji",
                    html! { <EmojiPickerBody catalog={catalog} on_pick={on_pick} /> },
                    footer,
                );
            }
            Err(err) => toasts.error(format!("Could not load emoji catalog: {err}")),
        },
    ));
}

#[derive(Properties, PartialEq)]
pub struct EmojiPickerProps {
    pub catalog: Rc<EmojiCatalog>,
    pub on_pick: Callback<String>,
}

#[function_component(EmojiPickerBody)]
pub fn emoji_picker_body(props: &EmojiPickerProps) -> Html {
    let query = use_state(String::new);

    let oninput = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                query.set(input.value());
            }
        })
    };

    let searching = query.trim().chars().count() >= MIN_QUERY_LEN;

    html! {
        <div class="emoji-picker">
            <input
                type="text"
                class="emoji-search"
                placeholder="Search emoji (money, house, food...)..."
                value={(*query).clone()}
                {oninput}
            />
            {
                if searching {
                    results_section(props.catalog.search(query.as_str()), &props.on_pick)
                } else {
                    html! {
                        <>
                            { for props.catalog.groups.iter().map(|group| category_section(group, &props.on_pick)) }
                        </>
                    }
                }
            }
        </div>
    }
}

fn category_section(group: &EmojiGroup, on_pick: &Callback<String>) -> Html {
    html! {
        <details class="emoji-category" open=true>
            <summary>{ group.name.clone() }</summary>
            <div class="emoji-grid">
                { for group.emojis.iter().map(|entry| emoji_button(&entry.glyph, on_pick)) }
            </div>
        </details>
    }
}

fn results_section(matches: Vec<&EmojiEntry>, on_pick: &Callback<String>) -> Html {
    if matches.is_empty() {
        return html! { <p class="emoji-empty">{"No emojis found"}</p> };
    }
    html! {
        <div class="emoji-category">
            <h4>{"Search Results"}</h4>
            <div class="emoji-grid">
                { for matches.iter().map(|entry| emoji_button(&entry.glyph, on_pick)) }
            </div>
        </div>
    }
}

fn emoji_button(glyph: &str, on_pick: &Callback<String>) -> Html {
    let glyph = glyph.to_string();
    let onclick = {
        let on_pick = on_pick.clone();
        let glyph = glyph.clone();
        Callback::from(move |_| on_pick.emit(glyph.clone()))
    };
    html! {
        <button type="button" class="emoji-btn" {onclick}>{ glyph }</button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn entry(glyph: &str, keywords: &[&str]) -> EmojiEntry {
        EmojiEntry {
            glyph: glyph.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn catalog() -> EmojiCatalog {
        EmojiCatalog {
            groups: vec![
                EmojiGroup {
                    name: "Money".into(),
                    emojis: vec![
                        entry("\u{1f4b0}", &["money", "bag"]),
                        entry("\u{1f3e0}", &["house", "home"]),
                    ],
                },
                EmojiGroup {
                    name: "Food".into(),
                    emojis: vec![
                        entry("\u{1f355}", &["pizza", "food"]),
                        entry("\u{1f3d8}", &["townhouse", "neighborhood"]),
                    ],
                },
            ],
        }
    }

    #[test]
    fn search_with_no_match_is_empty() {
        assert!(catalog().search("xy").is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = catalog();
        let hits = catalog.search("MON");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].glyph, "\u{1f4b0}");
    }

    #[test]
    fn prefix_hits_rank_before_substring_hits() {
        let catalog = catalog();
        let hits: Vec<&str> = catalog
            .search("house")
            .iter()
            .map(|e| e.glyph.as_str())
            .collect();
        // "house" is a keyword prefix on the house, only a substring on the
        // townhouse, so the house wins even though both match.
        assert_eq!(hits, vec!["\u{1f3e0}", "\u{1f3d8}"]);
    }

    #[test]
    fn search_caps_at_fifty_results() {
        let emojis: Vec<EmojiEntry> = (0..60)
            .map(|i| entry(&format!("g{i}"), &["money"]))
            .collect();
        let catalog = EmojiCatalog {
            groups: vec![EmojiGroup {
                name: "Big".into(),
                emojis,
            }],
        };
        assert_eq!(catalog.search("money").len(), SEARCH_RESULT_CAP);
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(catalog().search("   ").is_empty());
    }

    #[test]
    fn empty_state_renders_explicit_message() {
        assert_eq!(
            results_section(Vec::new(), &Callback::noop()),
            html! { <p class="emoji-empty">{"No emojis found"}</p> }
        );
    }

    fn recording_waiter(
        log: &Rc<RefCell<Vec<Result<Rc<EmojiCatalog>, String>>>>,
    ) -> Waiter {
        let log = log.clone();
        Callback::from(move |result| log.borrow_mut().push(result))
    }

    #[test]
    fn first_caller_starts_the_fetch_second_waits() {
        let loader = CatalogLoader::new("/static/emojis.json");
        let log = Rc::new(RefCell::new(Vec::new()));
        assert!(loader.enqueue(recording_waiter(&log)));
        assert!(!loader.enqueue(recording_waiter(&log)));
        assert!(log.borrow().is_empty(), "nothing served before the load finishes");

        loader.finish(Ok(catalog()));
        let served = log.borrow();
        assert_eq!(served.len(), 2);
        let first = served[0].as_ref().expect("load succeeded");
        let second = served[1].as_ref().expect("load succeeded");
        assert!(Rc::ptr_eq(first, second), "both waiters share one catalog");
    }

    #[test]
    fn loaded_is_terminal_and_served_immediately() {
        let loader = CatalogLoader::new("/static/emojis.json");
        let log = Rc::new(RefCell::new(Vec::new()));
        assert!(loader.enqueue(recording_waiter(&log)));
        loader.finish(Ok(catalog()));

        // A later caller never re-triggers the fetch.
        assert!(!loader.enqueue(recording_waiter(&log)));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn failed_load_resets_for_a_retry() {
        let loader = CatalogLoader::new("/static/emojis.json");
        let log = Rc::new(RefCell::new(Vec::new()));
        assert!(loader.enqueue(recording_waiter(&log)));
        loader.finish(Err("404 Not Found".into()));

        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].is_err());

        // The next user action starts a fresh fetch.
        assert!(loader.enqueue(recording_waiter(&log)));
    }
}
