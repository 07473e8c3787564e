#![forbid(unsafe_code)]

//! Render scope: the ambient chain threaded through every render call.
//!
//! A [`Scope`] is an immutable, singly-linked list of frames. Each frame
//! carries exactly one published context node for one registry channel and
//! points at the scope that enclosed it. Providers never mutate a scope;
//! they push a new frame and hand the resulting scope to their subtree.
//!
//! # Invariants
//!
//! 1. The chain terminates: a frame only points at an already existing
//!    scope, so no cycle can be built.
//! 2. Publishing is O(1) and shares every ancestor frame.
//! 3. A lookup from a scope only ever observes frames pushed by ancestors
//!    of the render call that received that scope.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for registry channel ids.
static CHANNEL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identity of one registry channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Allocate a new unique channel id.
    pub(crate) fn next() -> Self {
        Self(CHANNEL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

struct Frame {
    channel: ChannelId,
    node: Rc<dyn Any>,
    parent: Scope,
    depth: usize,
}

/// Immutable ambient chain handed to every render call.
#[derive(Clone, Default)]
pub struct Scope {
    head: Option<Rc<Frame>>,
}

impl Scope {
    /// The empty scope at the top of a render tree.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Push a frame publishing `node` on `channel`.
    pub(crate) fn push(&self, channel: ChannelId, node: Rc<dyn Any>) -> Self {
        let frame = Frame {
            channel,
            node,
            parent: self.clone(),
            depth: self.depth() + 1,
        };
        Self {
            head: Some(Rc::new(frame)),
        }
    }

    /// Nearest node published on `channel`, walking toward the root.
    pub(crate) fn nearest(&self, channel: ChannelId) -> Option<&Rc<dyn Any>> {
        let mut cursor = self.head.as_ref();
        while let Some(frame) = cursor {
            if frame.channel == channel {
                return Some(&frame.node);
            }
            cursor = frame.parent.head.as_ref();
        }
        None
    }

    /// Number of frames between this scope and the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.head.as_ref().map_or(0, |frame| frame.depth)
    }

    /// Whether this is the empty root scope.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }

    /// Identity comparison: both scopes are the same chain.
    #[must_use]
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty() {
        let root = Scope::root();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert!(root.ptr_eq(&Scope::root()));
    }

    #[test]
    fn nearest_walks_past_other_channels() {
        let a = ChannelId::next();
        let b = ChannelId::next();
        let scope = Scope::root()
            .push(a, Rc::new(1_u32))
            .push(b, Rc::new("b"))
            .push(b, Rc::new("b2"));
        assert_eq!(scope.depth(), 3);

        let found = scope.nearest(a).and_then(|n| n.downcast_ref::<u32>());
        assert_eq!(found, Some(&1));
        let found = scope.nearest(b).and_then(|n| n.downcast_ref::<&str>());
        assert_eq!(found, Some(&"b2"));
    }

    #[test]
    fn nearest_is_none_without_frame() {
        let scope = Scope::root().push(ChannelId::next(), Rc::new(()));
        assert!(scope.nearest(ChannelId::next()).is_none());
    }

    #[test]
    fn push_shares_parent() {
        let base = Scope::root().push(ChannelId::next(), Rc::new(()));
        let child = base.push(ChannelId::next(), Rc::new(()));
        assert!(!child.ptr_eq(&base));
        assert!(child.head.as_ref().map(|f| f.parent.ptr_eq(&base)).unwrap_or(false));
    }
}
