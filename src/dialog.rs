//! The single reusable dialog surface.
//!
//! One `ModalState` lives at the root of the app and is handed out through
//! context as a [`ModalHandle`]. Feature code opens it with whatever
//! title/body/footer it needs; opening while already open just replaces the
//! content, so the last caller wins and dialogs never stack.

use std::rc::Rc;

use yew::prelude::*;

/// What the dialog currently shows.
#[derive(Clone, PartialEq)]
pub struct ModalContent {
    pub title: String,
    pub body: Html,
    pub footer: Html,
}

#[derive(Clone, PartialEq, Default)]
pub struct ModalState {
    pub content: Option<ModalContent>,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }
}

pub enum ModalAction {
    Open(ModalContent),
    Close,
}

impl Reducible for ModalState {
    type Action = ModalAction;

    fn reduce(self: Rc<Self>, action: ModalAction) -> Rc<Self> {
        match action {
            ModalAction::Open(content) => Rc::new(ModalState {
                content: Some(content),
            }),
            // Closing an already-closed dialog changes nothing.
            ModalAction::Close if self.content.is_none() => self,
            ModalAction::Close => Rc::new(ModalState::default()),
        }
    }
}

/// Cloneable handle to the dialog surface, provided via context.
#[derive(Clone, PartialEq)]
pub struct ModalHandle(UseReducerHandle<ModalState>);

impl ModalHandle {
    pub fn new(inner: UseReducerHandle<ModalState>) -> Self {
        Self(inner)
    }

    pub fn open(&self, title: impl Into<String>, body: Html, footer: Html) {
        self.0.dispatch(ModalAction::Open(ModalContent {
            title: title.into(),
            body,
            footer,
        }));
    }

    pub fn close(&self) {
        self.0.dispatch(ModalAction::Close);
    }

    pub fn is_open(&self) -> bool {
        self.0.is_open()
    }
}

/// Suspend or restore scrolling on the page behind the dialog.
fn set_body_scroll_locked(locked: bool) {
    if let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    {
        let style = body.style();
        if locked {
            let _ = style.set_property("overflow", "hidden");
        } else {
            let _ = style.remove_property("overflow");
        }
    }
}

/// Renders the dialog overlay. Mount exactly once, inside the provider shell.
#[function_component(ModalHost)]
pub fn modal_host() -> Html {
    let modal = use_context::<ModalHandle>();

    let content = modal.as_ref().and_then(|m| m.0.content.clone());
    let is_open = content.is_some();

    use_effect_with_deps(
        move |open| {
            set_body_scroll_locked(*open);
            || set_body_scroll_locked(false)
        },
        is_open,
    );

    let Some(modal) = modal else { return html! {} };
    let Some(content) = content else { return html! {} };

    let on_scrim_click = {
        let modal = modal.clone();
        Callback::from(move |_| modal.close())
    };
    // Clicks inside the panel must not reach the scrim.
    let on_panel_click = Callback::from(|e: MouseEvent| e.stop_propagation());
    let on_close_click = {
        let modal = modal.clone();
        Callback::from(move |_| modal.close())
    };

    html! {
        <div class="modal-overlay active" onclick={on_scrim_click}>
            <div class="modal" onclick={on_panel_click}>
                <div class="modal-header">
                    <h3>{ content.title.clone() }</h3>
                    <button class="modal-close" onclick={on_close_click}>{ "\u{00d7}" }</button>
                </div>
                <div class="modal-body">{ content.body.clone() }</div>
                <div class="modal-footer">{ content.footer.clone() }</div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_state() -> Rc<ModalState> {
        Rc::new(ModalState::default()).reduce(ModalAction::Open(ModalContent {
            title: "Edit Bill".into(),
            body: html! { <p>{"body"}</p> },
            footer: html! {},
        }))
    }

    #[test]
    fn open_sets_content() {
        let state = open_state();
        assert!(state.is_open());
        assert_eq!(state.content.as_ref().map(|c| c.title.as_str()), Some("Edit Bill"));
    }

    #[test]
    fn open_while_open_replaces_content() {
        let state = open_state().reduce(ModalAction::Open(ModalContent {
            title: "Select Emoji".into(),
            body: html! {},
            footer: html! {},
        }));
        assert!(state.is_open());
        assert_eq!(
            state.content.as_ref().map(|c| c.title.as_str()),
            Some("Select Emoji")
        );
    }

    #[test]
    fn close_is_idempotent() {
        let mut state = open_state();
        for _ in 0..3 {
            state = state.reduce(ModalAction::Close);
            assert!(!state.is_open());
        }
    }

    #[test]
    fn close_when_closed_keeps_same_state() {
        let closed = Rc::new(ModalState::default());
        let after = Rc::clone(&closed).reduce(ModalAction::Close);
        assert!(Rc::ptr_eq(&closed, &after));
    }
}
