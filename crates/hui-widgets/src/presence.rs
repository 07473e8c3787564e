#![forbid(unsafe_code)]

//! Mount/unmount gating with exit animations.
//!
//! A part that can disappear (dialog content, overlay, collapsible content)
//! asks its [`Presence`] each render whether to emit markup. Without an exit
//! animation it follows `present` directly. With one, turning `present` off
//! keeps the part mounted in [`PresenceState::UnmountSuspended`] until the
//! host reports `AnimationEnd` on the element itself. Animations that end
//! on descendants bubble through but do not complete the unmount.
//!
//! # State Machine
//!
//! | From | Input | To |
//! |------|-------|----|
//! | any | present | `Mounted` |
//! | `Mounted` | absent, exit animation | `UnmountSuspended` |
//! | `Mounted` | absent, no animation | `Unmounted` |
//! | `UnmountSuspended` | animation end | `Unmounted` |

use std::cell::Cell;
use std::rc::Rc;

use hui_core::callback::ElementRef;
use hui_core::event::{EventKind, Handler, handler};
use hui_core::markup::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceState {
    Mounted,
    UnmountSuspended,
    #[default]
    Unmounted,
}

#[derive(Debug, Default)]
struct PresenceInner {
    state: Cell<PresenceState>,
    exit_animation: Cell<bool>,
    node: ElementRef,
}

/// Presence tracker for one part instance. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct Presence {
    inner: Rc<PresenceInner>,
}

impl Presence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare whether the part runs an exit animation when closing.
    pub fn set_exit_animation(&self, animated: bool) {
        self.inner.exit_animation.set(animated);
    }

    #[must_use]
    pub fn state(&self) -> PresenceState {
        self.inner.state.get()
    }

    /// Feed the desired presence; returns whether markup should be emitted.
    pub fn update(&self, present: bool) -> bool {
        let next = match (self.state(), present) {
            (_, true) => PresenceState::Mounted,
            (PresenceState::Mounted, false) if self.inner.exit_animation.get() => {
                PresenceState::UnmountSuspended
            }
            (PresenceState::UnmountSuspended, false) => PresenceState::UnmountSuspended,
            (_, false) => PresenceState::Unmounted,
        };
        if next != self.state() {
            tracing::trace!(from = ?self.state(), to = ?next, "presence transition");
        }
        self.inner.state.set(next);
        self.is_present()
    }

    /// Whether markup is currently emitted.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.state() != PresenceState::Unmounted
    }

    /// Exit animation finished.
    pub fn animation_end(&self) {
        if self.state() == PresenceState::UnmountSuspended {
            self.inner.state.set(PresenceState::Unmounted);
        }
    }

    /// Handler that completes a suspended unmount when the animation ended
    /// on the element bound by [`Presence::attach`].
    #[must_use]
    pub fn animation_end_handler(&self) -> Handler {
        let presence = self.clone();
        handler(move |event| {
            if event.target().is_some_and(|target| presence.inner.node.get() == Some(target)) {
                presence.animation_end();
            }
        })
    }

    /// Bind the element and attach the animation-end handler when an exit
    /// animation is declared.
    #[must_use]
    pub fn attach(&self, el: Element) -> Element {
        if self.inner.exit_animation.get() {
            el.node_ref(self.inner.node.clone())
                .on(EventKind::AnimationEnd, self.animation_end_handler())
        } else {
            el
        }
    }
}
