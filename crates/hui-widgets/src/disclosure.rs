#![forbid(unsafe_code)]

//! Open/closed state shared by dialog and collapsible roots.

use std::cell::{Cell, OnceCell};

use hui_core::callback::Callback;
use hui_core::reactive::ControllableState;

/// Root-owned open state with identity-stable callbacks.
#[derive(Debug, Default)]
pub(crate) struct OpenState {
    prop: Cell<Option<bool>>,
    default_open: bool,
    on_change: Option<Callback<bool>>,
    live: OnceCell<LiveOpenState>,
}

#[derive(Debug, Clone)]
pub(crate) struct LiveOpenState {
    pub state: ControllableState<bool>,
    pub on_open_change: Callback<bool>,
    pub on_open_toggle: Callback<()>,
}

impl OpenState {
    pub(crate) fn set_prop(&self, open: Option<bool>) {
        self.prop.set(open);
    }

    pub(crate) fn set_default(&mut self, open: bool) {
        self.default_open = open;
    }

    pub(crate) fn set_on_change(&mut self, on_change: Callback<bool>) {
        self.on_change = Some(on_change);
    }

    /// State for this render pass, with the latest controlling prop applied.
    pub(crate) fn live(&self) -> &LiveOpenState {
        let live = self.live.get_or_init(|| {
            let state = ControllableState::new(self.prop.get(), self.default_open, self.on_change.clone());
            let setter = state.clone();
            let toggler = state.clone();
            LiveOpenState {
                state,
                on_open_change: Callback::new(move |open| setter.set(open)),
                on_open_toggle: Callback::new(move |()| toggler.set(!toggler.get())),
            }
        });
        live.state.set_prop(self.prop.get());
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn callbacks_keep_identity_across_passes() {
        let open = OpenState::default();
        let a = open.live().on_open_toggle.clone();
        let b = open.live().on_open_toggle.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn toggle_flips_uncontrolled_state() {
        let open = OpenState::default();
        open.live().on_open_toggle.call(());
        assert!(open.live().state.get());
    }

    #[test]
    fn controlled_prop_is_reapplied_each_pass() {
        let seen = Rc::new(Cell::new(None));
        let s = Rc::clone(&seen);
        let mut open = OpenState::default();
        open.set_on_change(Callback::new(move |v| s.set(Some(v))));
        open.set_prop(Some(false));
        open.live().on_open_toggle.call(());
        assert_eq!(seen.get(), Some(true));
        assert!(!open.live().state.get());
        open.set_prop(Some(true));
        assert!(open.live().state.get());
    }
}
