//! Transient status toasts.
//!
//! Toasts stack in call order, newest at the bottom. Each one lives for its
//! `duration_ms`, then plays a 300 ms exit transition before it is dropped
//! from the list. A manual dismiss removes it immediately and the stale
//! timers fall through as no-ops.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

pub const DEFAULT_DURATION_MS: u32 = 3000;
pub const EXIT_ANIMATION_MS: u32 = 300;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

impl ToastLevel {
    fn class(&self) -> &'static str {
        match self {
            ToastLevel::Success => "toast success",
            ToastLevel::Error => "toast error",
            ToastLevel::Info => "toast info",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "\u{2713}",
            ToastLevel::Error => "\u{2715}",
            ToastLevel::Info => "\u{2139}",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub level: ToastLevel,
    pub duration_ms: u32,
    /// True once the exit transition has started.
    pub leaving: bool,
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct ToastList {
    pub items: Vec<Toast>,
}

pub enum ToastAction {
    Push {
        id: u32,
        message: String,
        level: ToastLevel,
        duration_ms: u32,
    },
    BeginExit(u32),
    Remove(u32),
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: ToastAction) -> Rc<Self> {
        match action {
            ToastAction::Push {
                id,
                message,
                level,
                duration_ms,
            } => {
                let mut items = self.items.clone();
                items.push(Toast {
                    id,
                    message,
                    level,
                    duration_ms,
                    leaving: false,
                });
                Rc::new(ToastList { items })
            }
            ToastAction::BeginExit(id) => {
                // Stale timer after a manual dismiss: the id is gone, do nothing.
                if !self.items.iter().any(|t| t.id == id && !t.leaving) {
                    return self;
                }
                let items = self
                    .items
                    .iter()
                    .cloned()
                    .map(|mut t| {
                        if t.id == id {
                            t.leaving = true;
                        }
                        t
                    })
                    .collect();
                Rc::new(ToastList { items })
            }
            ToastAction::Remove(id) => {
                if !self.items.iter().any(|t| t.id == id) {
                    return self;
                }
                let items = self.items.iter().filter(|t| t.id != id).cloned().collect();
                Rc::new(ToastList { items })
            }
        }
    }
}

thread_local! {
    static NEXT_TOAST_ID: Cell<u32> = Cell::new(0);
}

fn next_toast_id() -> u32 {
    NEXT_TOAST_ID.with(|cell| {
        let id = cell.get();
        cell.set(id.wrapping_add(1));
        id
    })
}

/// Cloneable handle to the toast stack, provided via context.
#[derive(Clone, PartialEq)]
pub struct ToastHandle(UseReducerHandle<ToastList>);

impl ToastHandle {
    pub fn new(inner: UseReducerHandle<ToastList>) -> Self {
        Self(inner)
    }

    pub fn show(&self, message: impl Into<String>, level: ToastLevel, duration_ms: u32) {
        let id = next_toast_id();
        self.0.dispatch(ToastAction::Push {
            id,
            message: message.into(),
            level,
            duration_ms,
        });

        let list = self.0.clone();
        Timeout::new(duration_ms, move || {
            list.dispatch(ToastAction::BeginExit(id));
        })
        .forget();

        let list = self.0.clone();
        Timeout::new(duration_ms + EXIT_ANIMATION_MS, move || {
            list.dispatch(ToastAction::Remove(id));
        })
        .forget();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastLevel::Success, DEFAULT_DURATION_MS);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastLevel::Error, DEFAULT_DURATION_MS);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, ToastLevel::Info, DEFAULT_DURATION_MS);
    }

    pub fn dismiss(&self, id: u32) {
        self.0.dispatch(ToastAction::Remove(id));
    }
}

/// Renders the toast stack. Mount exactly once, inside the provider shell.
#[function_component(ToastHost)]
pub fn toast_host() -> Html {
    let toasts = use_context::<ToastHandle>();
    let Some(toasts) = toasts else {
        return html! {};
    };

    html! {
        <div class="toast-container">
            { for toasts.0.items.iter().map(|toast| {
                let class = if toast.leaving {
                    format!("{} leaving", toast.level.class())
                } else {
                    toast.level.class().to_string()
                };
                let on_dismiss = {
                    let toasts = toasts.clone();
                    let id = toast.id;
                    Callback::from(move |_| toasts.dismiss(id))
                };
                html! {
                    <div key={toast.id} class={class}>
                        <div class="toast-icon">{ toast.level.icon() }</div>
                        <div class="toast-content">
                            <div class="toast-message">{ toast.message.clone() }</div>
                        </div>
                        <button class="toast-close" onclick={on_dismiss}>{ "\u{00d7}" }</button>
                    </div>
                }
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(list: Rc<ToastList>, id: u32, message: &str, level: ToastLevel) -> Rc<ToastList> {
        list.reduce(ToastAction::Push {
            id,
            message: message.into(),
            level,
            duration_ms: DEFAULT_DURATION_MS,
        })
    }

    #[test]
    fn toasts_display_in_call_order() {
        let mut list = Rc::new(ToastList::default());
        list = push(list, 0, "saved", ToastLevel::Success);
        list = push(list, 1, "oops", ToastLevel::Error);
        list = push(list, 2, "fyi", ToastLevel::Info);
        let messages: Vec<&str> = list.items.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["saved", "oops", "fyi"]);
    }

    #[test]
    fn duplicate_messages_are_not_deduplicated() {
        let mut list = Rc::new(ToastList::default());
        list = push(list, 0, "saved", ToastLevel::Success);
        list = push(list, 1, "saved", ToastLevel::Success);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn begin_exit_marks_leaving_without_removing() {
        let mut list = Rc::new(ToastList::default());
        list = push(list, 7, "saved", ToastLevel::Success);
        list = list.reduce(ToastAction::BeginExit(7));
        assert_eq!(list.items.len(), 1);
        assert!(list.items[0].leaving);
    }

    #[test]
    fn remove_drops_only_the_matching_toast() {
        let mut list = Rc::new(ToastList::default());
        list = push(list, 0, "a", ToastLevel::Info);
        list = push(list, 1, "b", ToastLevel::Info);
        list = list.reduce(ToastAction::Remove(0));
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, 1);
    }

    #[test]
    fn stale_timers_after_manual_dismiss_are_noops() {
        // Manual dismiss removes the toast right away; the scheduled
        // BeginExit/Remove timers then fire against an id that no longer
        // exists and must leave the list untouched.
        let mut list = Rc::new(ToastList::default());
        list = push(list, 3, "bye", ToastLevel::Info);
        list = list.reduce(ToastAction::Remove(3));
        assert!(list.items.is_empty());

        let after_exit = Rc::clone(&list).reduce(ToastAction::BeginExit(3));
        assert!(Rc::ptr_eq(&list, &after_exit));
        let after_remove = Rc::clone(&list).reduce(ToastAction::Remove(3));
        assert!(Rc::ptr_eq(&list, &after_remove));
    }

    #[test]
    fn toast_ids_are_unique_and_increasing() {
        let a = next_toast_id();
        let b = next_toast_id();
        assert!(b > a);
    }

    #[test]
    fn exit_animation_delay_is_fixed() {
        assert_eq!(EXIT_ANIMATION_MS, 300);
        assert_eq!(DEFAULT_DURATION_MS, 3000);
    }
}
