#![forbid(unsafe_code)]

//! Controlled / uncontrolled state.
//!
//! Widgets such as dialogs and collapsibles accept an optional `open` prop.
//! When it is present the caller owns the value and the widget only reports
//! requested changes; when it is absent the widget keeps its own value,
//! seeded from `default_open`.
//!
//! # Failure Modes
//!
//! | Scenario | Behavior |
//! |----------|----------|
//! | Controlled, caller ignores `on_change` | Value stays at the prop |
//! | Request equals current value | No callback, no version bump |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};
use crate::callback::Callback;

struct ControllableInner<T> {
    prop: RefCell<Option<T>>,
    internal: Observable<T>,
    on_change: RefCell<Option<Callback<T>>>,
}

/// Widget-owned or caller-owned value. Clones share state.
pub struct ControllableState<T> {
    inner: Rc<ControllableInner<T>>,
}

impl<T> Clone for ControllableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for ControllableState<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for ControllableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllableState")
            .field("prop", &self.inner.prop.borrow())
            .field("internal", &self.inner.internal)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> ControllableState<T> {
    /// Create from an optional controlling prop and the uncontrolled default.
    pub fn new(prop: Option<T>, default: T, on_change: Option<Callback<T>>) -> Self {
        Self {
            inner: Rc::new(ControllableInner {
                prop: RefCell::new(prop),
                internal: Observable::new(default),
                on_change: RefCell::new(on_change),
            }),
        }
    }

    /// Whether the caller owns the value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.inner.prop.borrow().is_some()
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        match self.inner.prop.borrow().as_ref() {
            Some(value) => value.clone(),
            None => self.inner.internal.get(),
        }
    }

    /// Request a new value.
    pub fn set(&self, value: T) {
        if self.get() == value {
            return;
        }
        if !self.is_controlled() {
            self.inner.internal.set(value.clone());
        }
        let on_change = self.inner.on_change.borrow().clone();
        if let Some(on_change) = on_change {
            on_change.call(value);
        }
    }

    /// Update the controlling prop (`None` hands ownership back to the widget).
    pub fn set_prop(&self, prop: Option<T>) {
        *self.inner.prop.borrow_mut() = prop;
    }

    pub fn set_on_change(&self, on_change: Option<Callback<T>>) {
        *self.inner.on_change.borrow_mut() = on_change;
    }

    /// Observe changes of the widget-owned value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.internal.subscribe(callback)
    }
}
