//! Root shell: constructs the session-wide services once, provides them
//! through context, and mounts the host components next to the page content.

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{ApiClient, Method};
use crate::busy::{BusyHandle, BusyOverlay, BusyState};
use crate::categories::CategoriesPanel;
use crate::dialog::{ModalHandle, ModalHost, ModalState};
use crate::emoji::{CatalogLoader, CATALOG_URL};
use crate::toast::{ToastHandle, ToastHost, ToastLevel, ToastList, DEFAULT_DURATION_MS};

#[function_component(App)]
pub fn app() -> Html {
    let modal = ModalHandle::new(use_reducer(ModalState::default));
    let toasts = ToastHandle::new(use_reducer(ToastList::default));
    let busy = BusyHandle::new(use_reducer(BusyState::default));

    // The client and the catalog loader are built once; reducer handles stay
    // valid for the whole session, so first-render clones are enough.
    let api = use_memo(
        {
            let busy = busy.clone();
            let toasts = toasts.clone();
            move |_| {
                let busy_cb =
                    Callback::from(move |on: bool| if on { busy.show() } else { busy.hide() });
                let notify_cb = Callback::from(move |(level, message): (ToastLevel, String)| {
                    toasts.show(message, level, DEFAULT_DURATION_MS);
                });
                ApiClient::new(busy_cb, notify_cb)
            }
        },
        (),
    );
    let loader = use_memo(|_| CatalogLoader::new(CATALOG_URL), ());

    html! {
        <ContextProvider<ModalHandle> context={modal}>
        <ContextProvider<ToastHandle> context={toasts}>
        <ContextProvider<BusyHandle> context={busy}>
        <ContextProvider<ApiClient> context={(*api).clone()}>
        <ContextProvider<CatalogLoader> context={(*loader).clone()}>
            <main class="dashboard">
                <header class="dashboard-header">
                    <h1>{"Bill Dashboard"}</h1>
                    <MaintenanceBar />
                </header>
                <CategoriesPanel />
            </main>
            <ModalHost />
            <ToastHost />
            <BusyOverlay />
        </ContextProvider<CatalogLoader>>
        </ContextProvider<ApiClient>>
        </ContextProvider<BusyHandle>>
        </ContextProvider<ToastHandle>>
        </ContextProvider<ModalHandle>>
    }
}

/// Batch operations plus the full-database download link.
#[function_component(MaintenanceBar)]
fn maintenance_bar() -> Html {
    let api = use_context::<ApiClient>();

    let on_reset = batch_action(
        api.clone(),
        "Reset all monthly bills to pending?",
        "/api/batch/reset-monthly",
    );
    let on_clear = batch_action(api, "Clear all paid bills?", "/api/batch/clear-paid");
    let on_export = Callback::from(|_| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/api/export/full");
        }
    });

    html! {
        <div class="toolbar">
            <button class="btn btn-secondary" onclick={on_reset}>{"Reset Monthly Bills"}</button>
            <button class="btn btn-secondary" onclick={on_clear}>{"Clear Paid Bills"}</button>
            <button class="btn btn-secondary" onclick={on_export}>{"Export Database"}</button>
        </div>
    }
}

fn batch_action(
    api: Option<ApiClient>,
    prompt: &'static str,
    endpoint: &'static str,
) -> Callback<MouseEvent> {
    Callback::from(move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        if let Some(api) = api.clone() {
            spawn_local(async move {
                // Page data is server-rendered; the success toast is the
                // user-visible outcome here.
                let _ = api.execute(Method::Post, endpoint, None).await;
            });
        }
    })
}
