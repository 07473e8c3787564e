#![forbid(unsafe_code)]

//! Identity-comparable callbacks and element refs.
//!
//! Both types compare by pointer, not by behavior. A payload that stores a
//! callback created once per widget instance therefore stays equal across
//! render passes, which keeps published context nodes stable.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::document::ElementKey;

/// Shared, pointer-compared callback.
pub struct Callback<A> {
    f: Rc<dyn Fn(A)>,
}

impl<A> Callback<A> {
    /// Wrap a closure.
    pub fn new(f: impl Fn(A) + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Invoke the callback.
    pub fn call(&self, arg: A) {
        (self.f)(arg);
    }
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<A> PartialEq for Callback<A> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}

/// Slot bound by the document to the key of a mounted element.
#[derive(Clone, Default)]
pub struct ElementRef {
    key: Rc<Cell<Option<ElementKey>>>,
}

impl ElementRef {
    /// Create an unbound ref.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the element currently bound, if mounted.
    #[must_use]
    pub fn get(&self) -> Option<ElementKey> {
        self.key.get()
    }

    pub(crate) fn set(&self, key: Option<ElementKey>) {
        self.key.set(key);
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.key, &other.key)
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementRef").field(&self.key.get()).finish()
    }
}
