//! Global "operation in progress" overlay.
//!
//! The state is one shared flag, not a counter: when requests overlap, the
//! first one to settle clears the flag for everyone. That matches the
//! long-standing dashboard behavior; callers that need the overlay to stay
//! up across overlapping calls have to hold it themselves.

use std::rc::Rc;

use yew::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct BusyState {
    pub active: bool,
}

pub enum BusyAction {
    Show,
    Hide,
}

impl Reducible for BusyState {
    type Action = BusyAction;

    fn reduce(self: Rc<Self>, action: BusyAction) -> Rc<Self> {
        let active = matches!(action, BusyAction::Show);
        if self.active == active {
            self
        } else {
            Rc::new(BusyState { active })
        }
    }
}

/// Cloneable handle to the busy flag, provided via context.
#[derive(Clone, PartialEq)]
pub struct BusyHandle(UseReducerHandle<BusyState>);

impl BusyHandle {
    pub fn new(inner: UseReducerHandle<BusyState>) -> Self {
        Self(inner)
    }

    pub fn show(&self) {
        self.0.dispatch(BusyAction::Show);
    }

    pub fn hide(&self) {
        self.0.dispatch(BusyAction::Hide);
    }

    pub fn is_active(&self) -> bool {
        self.0.active
    }
}

/// Renders the spinner overlay. Mount exactly once, inside the provider shell.
#[function_component(BusyOverlay)]
pub fn busy_overlay() -> Html {
    let busy = use_context::<BusyHandle>();
    let Some(busy) = busy else {
        return html! {};
    };
    if !busy.is_active() {
        return html! {};
    }
    html! {
        <div class="spinner-overlay active">
            <div class="spinner"></div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_and_hide_are_idempotent() {
        let mut state = Rc::new(BusyState::default());
        state = state.reduce(BusyAction::Show);
        assert!(state.active);
        let again = Rc::clone(&state).reduce(BusyAction::Show);
        assert!(Rc::ptr_eq(&state, &again));

        state = state.reduce(BusyAction::Hide);
        assert!(!state.active);
        let again = Rc::clone(&state).reduce(BusyAction::Hide);
        assert!(Rc::ptr_eq(&state, &again));
    }

    #[test]
    fn overlapping_calls_share_one_flag() {
        // Known limitation, kept on purpose: two in-flight requests both set
        // the flag, and whichever settles first hides the overlay even though
        // the other is still running.
        let mut state = Rc::new(BusyState::default());
        state = state.reduce(BusyAction::Show); // request A starts
        state = state.reduce(BusyAction::Show); // request B starts
        state = state.reduce(BusyAction::Hide); // request B settles first
        assert!(!state.active, "overlay already hidden while A is in flight");
        state = state.reduce(BusyAction::Hide); // request A settles
        assert!(!state.active);
    }
}
