#![forbid(unsafe_code)]

//! Scoped, inheritance-aware context registry.
//!
//! A [`ContextRegistry<T>`] is a typed channel created once per widget type.
//! Providers publish [`ContextNode`]s into a [`Scope`]; descendant parts look
//! up the nearest node whose [`Group`] matches the one they assert. Several
//! groups can share one channel (an alert dialog publishes dialog state under
//! its own group), and nested instances of the same group shadow outer ones.
//!
//! # Lookup
//!
//! 1. Take the nearest node of this channel reachable from the scope,
//!    whatever its group.
//! 2. Walk `node -> node.parent` until a node with the asserted group is
//!    found.
//! 3. No match: return the registry default if one was registered,
//!    otherwise fail with [`MissingContext`] (root-part or sub-part message).
//!
//! # Invariants
//!
//! 1. A node's group never changes after creation.
//! 2. `parent` is a `Weak` pointer; nodes never own their ancestors. The
//!    scope frames that published the ancestors keep them alive for as long
//!    as any descendant scope exists.
//! 3. [`Provider::publish`] reuses the previous node when the group, the
//!    payload (by value) and the parent node (by identity) are unchanged, so
//!    downstream identity checks see no change.
//!
//! # Example
//!
//! ```
//! use hui_core::context::{ContextRegistry, Group};
//! use hui_core::scope::Scope;
//!
//! const DIALOG: Group = Group::new("Dialog");
//! let registry: ContextRegistry<bool> = ContextRegistry::new("Dialog");
//!
//! let provider = registry.provider();
//! let cx = provider.publish(&Scope::root(), DIALOG, true);
//! assert!(*registry.lookup(&cx, DIALOG, Some("Trigger")).unwrap().payload());
//!
//! let err = registry.lookup(&Scope::root(), DIALOG, Some("Trigger")).unwrap_err();
//! assert_eq!(err.to_string(), "Trigger must be used within Dialog");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::error::MissingContext;
use crate::scope::{ChannelId, Scope};

/// Logical widget type a context node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group(&'static str);

impl Group {
    /// Create a group tag.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Group name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<&'static str> for Group {
    fn from(name: &'static str) -> Self {
        Self(name)
    }
}

/// Immutable snapshot published by one provider instance.
pub struct ContextNode<T> {
    group: Group,
    payload: T,
    parent: Weak<ContextNode<T>>,
}

impl<T> ContextNode<T> {
    /// Group this node was published under.
    #[inline]
    #[must_use]
    pub fn group(&self) -> Group {
        self.group
    }

    /// Published payload.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Nearest enclosing node of the same channel, of any group.
    #[must_use]
    pub fn parent(&self) -> Option<Rc<ContextNode<T>>> {
        self.parent.upgrade()
    }

    fn parent_is(&self, other: Option<&Rc<ContextNode<T>>>) -> bool {
        match other {
            Some(node) => Weak::ptr_eq(&self.parent, &Rc::downgrade(node)),
            None => self.parent.upgrade().is_none(),
        }
    }
}

impl<T> Deref for ContextNode<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

impl<T: fmt::Debug> fmt::Debug for ContextNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextNode")
            .field("group", &self.group)
            .field("payload", &self.payload)
            .field("has_parent", &(self.parent.strong_count() > 0))
            .finish()
    }
}

struct RegistryInner<T> {
    channel: ChannelId,
    name: Group,
    default: Option<Rc<ContextNode<T>>>,
}

/// Typed handle for one context channel.
///
/// Cloning is cheap and yields the same channel. Widget modules keep their
/// registry in a `thread_local!` and hand out clones.
pub struct ContextRegistry<T> {
    inner: Rc<RegistryInner<T>>,
}

impl<T> Clone for ContextRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ContextRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("name", &self.inner.name)
            .field("channel", &self.inner.channel)
            .field("has_default", &self.inner.default.is_some())
            .finish()
    }
}

impl<T: 'static> ContextRegistry<T> {
    /// Registry without a default: lookups outside a provider fail.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self::build(Group::new(name), None)
    }

    /// Registry whose lookups fall back to `default` outside a provider.
    #[must_use]
    pub fn with_default(name: &'static str, default: T) -> Self {
        let group = Group::new(name);
        let node = ContextNode {
            group,
            payload: default,
            parent: Weak::new(),
        };
        Self::build(group, Some(Rc::new(node)))
    }

    fn build(name: Group, default: Option<Rc<ContextNode<T>>>) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                channel: ChannelId::next(),
                name,
                default,
            }),
        }
    }

    /// Name the registry was created with.
    #[must_use]
    pub fn name(&self) -> Group {
        self.inner.name
    }

    /// Channel identity of this registry.
    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.inner.channel
    }

    /// Whether a default payload was registered.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.inner.default.is_some()
    }

    /// Whether `node` is this registry's default node.
    #[must_use]
    pub fn is_default(&self, node: &Rc<ContextNode<T>>) -> bool {
        self.inner
            .default
            .as_ref()
            .is_some_and(|default| Rc::ptr_eq(default, node))
    }

    /// Create the publishing slot for one provider instance.
    #[must_use]
    pub fn provider(&self) -> Provider<T> {
        Provider {
            registry: self.clone(),
            cache: RefCell::new(None),
        }
    }

    /// Publish a fresh node without memoization.
    pub fn publish(&self, cx: &Scope, group: Group, payload: T) -> (Scope, Rc<ContextNode<T>>) {
        let parent = self.ambient(cx);
        let node = Rc::new(ContextNode {
            group,
            payload,
            parent: parent.as_ref().map_or_else(Weak::new, Rc::downgrade),
        });
        #[cfg(feature = "tracing")]
        tracing::trace!(
            registry = self.inner.name.name(),
            group = group.name(),
            depth = cx.depth(),
            "context published"
        );
        let scope = cx.push(self.inner.channel, Rc::clone(&node) as Rc<dyn std::any::Any>);
        (scope, node)
    }

    /// Nearest node of this channel reachable from `cx`, regardless of group.
    #[must_use]
    pub fn ambient(&self, cx: &Scope) -> Option<Rc<ContextNode<T>>> {
        cx.nearest(self.inner.channel)
            .and_then(|node| Rc::clone(node).downcast::<ContextNode<T>>().ok())
    }

    /// Resolve the nearest node published under `group`.
    ///
    /// `part` names the calling sub-component; `None` means the caller is the
    /// root part of the group. It only affects the error message.
    pub fn lookup(
        &self,
        cx: &Scope,
        group: Group,
        part: Option<&str>,
    ) -> Result<Rc<ContextNode<T>>, MissingContext> {
        let mut cursor = self.ambient(cx);
        while let Some(node) = cursor {
            if node.group == group {
                return Ok(node);
            }
            cursor = node.parent();
        }

        if let Some(default) = &self.inner.default {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                registry = self.inner.name.name(),
                group = group.name(),
                "context lookup fell back to default"
            );
            return Ok(Rc::clone(default));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            registry = self.inner.name.name(),
            group = group.name(),
            part = part.unwrap_or(""),
            "context lookup failed"
        );
        Err(match part {
            None => MissingContext::root(group),
            Some(part) => MissingContext::part(part, group),
        })
    }
}

struct Published<T> {
    parent_scope: Scope,
    node: Rc<ContextNode<T>>,
    scope: Scope,
}

/// Publishing slot owned by one provider instance.
///
/// Holds the last published node so re-publishing an unchanged payload keeps
/// node identity stable across render passes.
pub struct Provider<T> {
    registry: ContextRegistry<T>,
    cache: RefCell<Option<Published<T>>>,
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("registry", &self.registry)
            .field("published", &self.cache.borrow().is_some())
            .finish()
    }
}

impl<T: PartialEq + 'static> Provider<T> {
    /// Publish `payload` under `group` and return the scope for the subtree.
    pub fn publish(&self, cx: &Scope, group: Group, payload: T) -> Scope {
        let parent = self.registry.ambient(cx);
        let mut cache = self.cache.borrow_mut();

        if let Some(published) = cache.as_mut() {
            let node = &published.node;
            if node.group == group && node.payload == payload && node.parent_is(parent.as_ref()) {
                if !published.parent_scope.ptr_eq(cx) {
                    // Unrelated frames above us changed; keep the node, re-link the frame.
                    published.scope = cx.push(
                        self.registry.channel(),
                        Rc::clone(node) as Rc<dyn std::any::Any>,
                    );
                    published.parent_scope = cx.clone();
                }
                return published.scope.clone();
            }
        }

        let (scope, node) = self.registry.publish(cx, group, payload);
        *cache = Some(Published {
            parent_scope: cx.clone(),
            node,
            scope: scope.clone(),
        });
        scope
    }

    /// Publish and render `children` inside the new scope.
    pub fn provide<R>(
        &self,
        cx: &Scope,
        group: Group,
        payload: T,
        children: impl FnOnce(&Scope) -> R,
    ) -> R {
        let scope = self.publish(cx, group, payload);
        children(&scope)
    }

    /// Last published node, if any.
    #[must_use]
    pub fn node(&self) -> Option<Rc<ContextNode<T>>> {
        self.cache
            .borrow()
            .as_ref()
            .map(|published| Rc::clone(&published.node))
    }

    /// Registry this slot publishes into.
    #[must_use]
    pub fn registry(&self) -> &ContextRegistry<T> {
        &self.registry
    }
}

/// Value derived from a context node, recomputed only when node identity changes.
pub struct NodeMemo<T, R> {
    cache: RefCell<Option<(Weak<ContextNode<T>>, R)>>,
}

impl<T, R> Default for NodeMemo<T, R> {
    fn default() -> Self {
        Self {
            cache: RefCell::new(None),
        }
    }
}

impl<T, R> fmt::Debug for NodeMemo<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMemo")
            .field("cached", &self.cache.borrow().is_some())
            .finish()
    }
}

impl<T, R: Clone> NodeMemo<T, R> {
    /// Create an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `node`, computing it on identity change.
    pub fn get(&self, node: &Rc<ContextNode<T>>, compute: impl FnOnce(&ContextNode<T>) -> R) -> R {
        let mut cache = self.cache.borrow_mut();
        if let Some((cached, value)) = cache.as_ref()
            && Weak::ptr_eq(cached, &Rc::downgrade(node))
        {
            return value.clone();
        }
        let value = compute(node);
        *cache = Some((Rc::downgrade(node), value.clone()));
        value
    }

    /// Drop the cached value.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const DIALOG: Group = Group::new("Dialog");
    const ALERT: Group = Group::new("AlertDialog");

    #[derive(Debug, Clone, PartialEq)]
    struct DialogValue {
        open: bool,
        content_id: &'static str,
    }

    fn value(open: bool, content_id: &'static str) -> DialogValue {
        DialogValue { open, content_id }
    }

    #[test]
    fn lookup_returns_published_payload() {
        let registry = ContextRegistry::new("Dialog");
        let provider = registry.provider();
        let cx = provider.publish(&Scope::root(), DIALOG, value(true, "c1"));

        let node = registry.lookup(&cx, DIALOG, Some("Trigger")).unwrap();
        assert_eq!(node.payload(), &value(true, "c1"));
        assert_eq!(node.group(), DIALOG);
    }

    #[test]
    fn nested_same_group_returns_nearest() {
        let registry = ContextRegistry::new("Dialog");
        let outer = registry.provider();
        let inner = registry.provider();

        let between = outer.publish(&Scope::root(), DIALOG, value(false, "outer"));
        let inside = inner.publish(&between, DIALOG, value(true, "inner"));

        assert!(registry.lookup(&inside, DIALOG, None).unwrap().open);
        assert!(!registry.lookup(&between, DIALOG, None).unwrap().open);
    }

    #[test]
    fn lookup_skips_other_groups_on_same_channel() {
        let registry = ContextRegistry::new("Dialog");
        let dialog = registry.provider();
        let alert = registry.provider();

        let cx = dialog.publish(&Scope::root(), DIALOG, value(false, "dialog"));
        let cx = alert.publish(&cx, ALERT, value(true, "alert"));

        assert_eq!(registry.lookup(&cx, DIALOG, None).unwrap().content_id, "dialog");
        assert_eq!(registry.lookup(&cx, ALERT, None).unwrap().content_id, "alert");
    }

    #[test]
    fn lookup_skips_other_channels() {
        let dialogs = ContextRegistry::new("Dialog");
        let others: ContextRegistry<u8> = ContextRegistry::new("Other");
        let dialog = dialogs.provider();
        let other = others.provider();

        let cx = dialog.publish(&Scope::root(), DIALOG, value(true, "d"));
        let cx = other.publish(&cx, Group::new("Other"), 7);

        assert_eq!(dialogs.lookup(&cx, DIALOG, None).unwrap().content_id, "d");
    }

    #[test]
    fn missing_part_context_fails_with_part_message() {
        let registry: ContextRegistry<DialogValue> = ContextRegistry::new("Dialog");
        let err = registry.lookup(&Scope::root(), DIALOG, Some("X")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains('X'));
        assert!(message.contains("Dialog"));
    }

    #[test]
    fn missing_root_context_fails_with_group_message() {
        let registry: ContextRegistry<DialogValue> = ContextRegistry::new("Dialog");
        let err = registry.lookup(&Scope::root(), DIALOG, None).unwrap_err();
        assert!(err.is_root_part());
        assert_eq!(err.to_string(), "Missing default context for Dialog");
    }

    #[test]
    fn default_is_returned_without_provider() {
        let registry = ContextRegistry::with_default("Dialog", value(false, "default"));
        let node = registry.lookup(&Scope::root(), DIALOG, Some("Trigger")).unwrap();
        assert!(registry.is_default(&node));
        assert_eq!(node.content_id, "default");
    }

    #[test]
    fn default_is_returned_when_only_other_groups_exist() {
        let registry = ContextRegistry::with_default("Dialog", value(false, "default"));
        let alert = registry.provider();
        let cx = alert.publish(&Scope::root(), ALERT, value(true, "alert"));

        let node = registry.lookup(&cx, DIALOG, None).unwrap();
        assert!(registry.is_default(&node));
    }

    #[test]
    fn parent_links_to_enclosing_node() {
        let registry = ContextRegistry::new("Dialog");
        let outer = registry.provider();
        let inner = registry.provider();
        let cx = outer.publish(&Scope::root(), DIALOG, value(false, "o"));
        let cx = inner.publish(&cx, ALERT, value(true, "i"));

        let node = registry.ambient(&cx).unwrap();
        assert_eq!(node.group(), ALERT);
        let parent = node.parent().unwrap();
        assert_eq!(parent.content_id, "o");
        assert!(parent.parent().is_none());
    }

    #[test]
    fn republish_unchanged_payload_keeps_identity() {
        let registry = ContextRegistry::new("Dialog");
        let provider = registry.provider();

        let first = provider.publish(&Scope::root(), DIALOG, value(true, "c1"));
        let node_a = registry.lookup(&first, DIALOG, None).unwrap();
        let second = provider.publish(&Scope::root(), DIALOG, value(true, "c1"));
        let node_b = registry.lookup(&second, DIALOG, None).unwrap();

        assert!(Rc::ptr_eq(&node_a, &node_b));
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn republish_changed_payload_creates_new_node() {
        let registry = ContextRegistry::new("Dialog");
        let provider = registry.provider();

        let first = provider.publish(&Scope::root(), DIALOG, value(true, "c1"));
        let node_a = registry.lookup(&first, DIALOG, None).unwrap();
        let second = provider.publish(&Scope::root(), DIALOG, value(false, "c1"));
        let node_b = registry.lookup(&second, DIALOG, None).unwrap();

        assert!(!Rc::ptr_eq(&node_a, &node_b));
        assert!(!node_b.open);
    }

    #[test]
    fn republish_under_new_parent_creates_new_node() {
        let registry = ContextRegistry::new("Dialog");
        let outer = registry.provider();
        let inner = registry.provider();

        let cx = outer.publish(&Scope::root(), DIALOG, value(false, "o"));
        let node_a = registry.ambient(&inner.publish(&cx, ALERT, value(true, "i"))).unwrap();

        let cx = outer.publish(&Scope::root(), DIALOG, value(true, "o"));
        let node_b = registry.ambient(&inner.publish(&cx, ALERT, value(true, "i"))).unwrap();

        assert!(!Rc::ptr_eq(&node_a, &node_b));
        assert!(node_b.parent().unwrap().open);
    }

    #[test]
    fn unrelated_frame_change_keeps_node_identity() {
        let registry = ContextRegistry::new("Dialog");
        let others: ContextRegistry<u8> = ContextRegistry::new("Other");
        let other = others.provider();
        let provider = registry.provider();

        let cx = other.publish(&Scope::root(), Group::new("Other"), 1);
        let node_a = registry.ambient(&provider.publish(&cx, DIALOG, value(true, "c"))).unwrap();
        let cx = other.publish(&Scope::root(), Group::new("Other"), 2);
        let scope = provider.publish(&cx, DIALOG, value(true, "c"));
        let node_b = registry.ambient(&scope).unwrap();

        assert!(Rc::ptr_eq(&node_a, &node_b));
        assert_eq!(*others.ambient(&scope).unwrap().payload(), 2);
    }

    #[test]
    fn node_memo_recomputes_only_on_identity_change() {
        let registry = ContextRegistry::new("Dialog");
        let provider = registry.provider();
        let memo = NodeMemo::new();
        let computed = Cell::new(0);

        for open in [true, true, true, false] {
            let cx = provider.publish(&Scope::root(), DIALOG, value(open, "c"));
            let node = registry.lookup(&cx, DIALOG, None).unwrap();
            let label = memo.get(&node, |n| {
                computed.set(computed.get() + 1);
                if n.open { "open" } else { "closed" }
            });
            assert_eq!(label, if open { "open" } else { "closed" });
        }
        assert_eq!(computed.get(), 2);
    }

    #[test]
    fn provide_renders_children_in_new_scope() {
        let registry = ContextRegistry::new("Dialog");
        let provider = registry.provider();
        let open = provider.provide(&Scope::root(), DIALOG, value(true, "c"), |cx| {
            registry.lookup(cx, DIALOG, Some("Content")).map(|n| n.open)
        });
        assert_eq!(open, Ok(true));
    }
}
