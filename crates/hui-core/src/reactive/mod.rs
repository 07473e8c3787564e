#![forbid(unsafe_code)]

//! Change-tracked widget state.
//!
//! - [`Observable`]: shared, version-tracked value with subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`ControllableState`]: a value that is either owned by the widget
//!   (uncontrolled) or mirrored from a caller-supplied prop (controlled),
//!   reporting requested changes through an `on_change` callback.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are held as `Weak` pointers and pruned lazily during
//! notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. A controlled [`ControllableState`] never changes its own value; it only
//!    forwards requests to `on_change`.

pub mod controllable;
pub mod observable;

pub use controllable::ControllableState;
pub use observable::{Observable, Subscription};
