//! Category manager: the one feature collaborator shipped with the kernel.
//!
//! Lists categories from the backend, adds new ones through an inline form
//! whose emoji field is filled by the picker, and deletes behind a confirm
//! prompt. Every kernel surface gets exercised here: the request pipeline,
//! the toasts, the busy overlay, the dialog, and the emoji picker.

use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::dialog::ModalHandle;
use crate::emoji::{open_emoji_picker, CatalogLoader};
use crate::toast::ToastHandle;

const EMOJI_FIELD_ID: &str = "new-category-emoji";
const DEFAULT_EMOJI: &str = "\u{1f4c1}";

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// The emoji input is written by the picker behind Yew's back, so it is read
/// back from the DOM at save time.
fn current_emoji() -> String {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(EMOJI_FIELD_ID))
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_EMOJI.to_string())
}

#[function_component(CategoriesPanel)]
pub fn categories_panel() -> Html {
    let api = use_context::<ApiClient>();
    let modal = use_context::<ModalHandle>();
    let toasts = use_context::<ToastHandle>();
    let loader = use_context::<CatalogLoader>();

    let categories = use_state(Vec::<Category>::new);
    let show_add = use_state(|| false);
    let form_name = use_state(String::new);
    let form_kind = use_state(|| "expense".to_string());
    let reload_tick = use_state(|| 0u32);

    {
        let api = api.clone();
        let categories = categories.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(api) = api {
                    spawn_local(async move {
                        if let Some(envelope) = api.get("/api/categories").await {
                            if let Some(list) =
                                envelope.parse_field::<Vec<Category>>("categories")
                            {
                                categories.set(list);
                            }
                        }
                    });
                }
                || ()
            },
            *reload_tick,
        );
    }

    let (Some(api), Some(modal), Some(toasts), Some(loader)) = (api, modal, toasts, loader)
    else {
        return html! {};
    };

    let on_toggle_add = {
        let show_add = show_add.clone();
        Callback::from(move |_| show_add.set(!*show_add))
    };

    let on_pick_emoji = {
        let modal = modal.clone();
        let loader = loader.clone();
        let toasts = toasts.clone();
        Callback::from(move |_| open_emoji_picker(&modal, &loader, &toasts, EMOJI_FIELD_ID))
    };

    let on_name_input = {
        let form_name = form_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                form_name.set(input.value());
            }
        })
    };

    let on_kind_change = {
        let form_kind = form_kind.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            form_kind.set(select.value());
        })
    };

    let on_save = {
        let api = api.clone();
        let toasts = toasts.clone();
        let form_name = form_name.clone();
        let form_kind = form_kind.clone();
        let show_add = show_add.clone();
        let reload_tick = reload_tick.clone();
        Callback::from(move |_| {
            let name = form_name.trim().to_string();
            if name.is_empty() {
                toasts.error("Category name is required");
                return;
            }
            let payload = serde_json::json!({
                "name": name,
                "type": (*form_kind).clone(),
                "emoji": current_emoji(),
            });
            let api = api.clone();
            let form_name = form_name.clone();
            let show_add = show_add.clone();
            let reload_tick = reload_tick.clone();
            spawn_local(async move {
                if api.post("/api/categories", payload).await.is_some() {
                    form_name.set(String::new());
                    show_add.set(false);
                    reload_tick.set((*reload_tick).wrapping_add(1));
                }
            });
        })
    };

    let on_delete = |category: &Category| {
        let api = api.clone();
        let reload_tick = reload_tick.clone();
        let id = category.id;
        let prompt = format!("Delete {}?", category.name);
        Callback::from(move |_| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message(&prompt).ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let api = api.clone();
            let reload_tick = reload_tick.clone();
            spawn_local(async move {
                if api.delete(&format!("/api/categories/{id}")).await.is_some() {
                    reload_tick.set((*reload_tick).wrapping_add(1));
                }
            });
        })
    };

    html! {
        <section class="panel">
            <div class="panel-header">
                <h2>{"Categories"}</h2>
                <button class="btn btn-success" onclick={on_toggle_add}>
                    { if *show_add { "Close" } else { "+ Add Category" } }
                </button>
            </div>

            {
                if *show_add {
                    html! {
                        <div class="form-row">
                            <div class="form-group">
                                <label>{"Name"}</label>
                                <input type="text" value={(*form_name).clone()} oninput={on_name_input} />
                            </div>
                            <div class="form-group">
                                <label>{"Type"}</label>
                                <select onchange={on_kind_change}>
                                    <option value="expense" selected={*form_kind == "expense"}>{"Expense"}</option>
                                    <option value="income" selected={*form_kind == "income"}>{"Income"}</option>
                                </select>
                            </div>
                            <div class="form-group">
                                <label>{"Emoji"}</label>
                                <div class="emoji-field">
                                    <input type="text" id={EMOJI_FIELD_ID} readonly=true placeholder={DEFAULT_EMOJI} />
                                    <button type="button" class="btn btn-secondary" onclick={on_pick_emoji}>{"Pick"}</button>
                                </div>
                            </div>
                            <button class="btn btn-success" onclick={on_save}>{"Save"}</button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }

            <table class="panel-table">
                <thead>
                    <tr><th>{"Name"}</th><th>{"Type"}</th><th>{"Actions"}</th></tr>
                </thead>
                <tbody>
                    {
                        if categories.is_empty() {
                            html! { <tr><td colspan="3">{"No categories"}</td></tr> }
                        } else {
                            html! {
                                { for categories.iter().map(|category| {
                                    html! {
                                        <tr key={category.id}>
                                            <td>{ format!("{} {}", category.emoji, category.name) }</td>
                                            <td>{ category.kind.clone() }</td>
                                            <td>
                                                <button class="btn btn-danger" onclick={on_delete(category)}>{"Delete"}</button>
                                            </td>
                                        </tr>
                                    }
                                }) }
                            }
                        }
                    }
                </tbody>
            </table>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_rows_parse_from_api_shape() {
        let raw = serde_json::json!([
            {"id": 1, "name": "Housing", "emoji": "\u{1f3e0}", "type": "expense"},
            {"id": 2, "name": "Salary"}
        ]);
        let rows: Vec<Category> = serde_json::from_value(raw).expect("rows parse");
        assert_eq!(rows[0].kind, "expense");
        assert_eq!(rows[1].emoji, "");
        assert_eq!(rows[1].kind, "");
    }
}
