#![forbid(unsafe_code)]

//! Version-tracked shared value.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

struct Subscriber<T>(Box<dyn Fn(&T)>);

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Subscriber<T>>>,
}

/// Shared value that notifies subscribers when it changes.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Wrap `value` at version 0.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Number of changing mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Replace the value. Returns whether it changed.
    pub fn set(&self, value: T) -> bool {
        let subscribers = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.version += 1;
            inner.subscribers.retain(|s| s.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect::<Vec<_>>()
        };
        // Callbacks may read or write this observable; no borrow is held here.
        let value = self.get();
        for subscriber in subscribers {
            (subscriber.0)(&value);
        }
        true
    }

    /// Apply `f` to a copy of the value and store the result.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = self.with(f);
        self.set(next)
    }

    /// Call `callback` with the new value after each change.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let subscriber = Rc::new(Subscriber(Box::new(callback)));
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&subscriber));
        Subscription {
            _guard: subscriber as Rc<dyn Any>,
        }
    }

    /// Live subscriber count.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }
}

/// Keeps a subscription alive; dropping it unsubscribes.
pub struct Subscription {
    _guard: Rc<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_bumps_version_only_on_change() {
        let obs = Observable::new(1);
        assert!(!obs.set(1));
        assert_eq!(obs.version(), 0);
        assert!(obs.set(2));
        assert_eq!(obs.version(), 1);
        assert_eq!(obs.get(), 2);
    }

    #[test]
    fn subscribers_run_in_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        let _s1 = obs.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let _s2 = obs.subscribe(move |v| b.borrow_mut().push(("b", *v)));
        obs.set(5);
        assert_eq!(*log.borrow(), vec![("a", 5), ("b", 5)]);
    }

    #[test]
    fn dropped_subscription_is_not_notified() {
        let obs = Observable::new(false);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = obs.subscribe(move |_| h.set(h.get() + 1));
        obs.set(true);
        drop(sub);
        obs.set(false);
        assert_eq!(hits.get(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_may_read_back() {
        let obs = Observable::new(1);
        let seen = Rc::new(Cell::new(0));
        let (o, s) = (obs.clone(), Rc::clone(&seen));
        let _sub = obs.subscribe(move |_| s.set(o.get()));
        obs.update(|v| v * 10);
        assert_eq!(seen.get(), 10);
    }
}
