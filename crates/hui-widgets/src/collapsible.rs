#![forbid(unsafe_code)]

//! Collapsible: a trigger that shows and hides one content region.
//!
//! ```text
//! Collapsible            div  data-state data-disabled
//! ├── CollapsibleTrigger button aria-controls aria-expanded
//! └── CollapsibleContent div  id hidden (children only while open)
//! ```

use hui_a11y::{aria_bool, open_state};
use hui_core::callback::Callback;
use hui_core::context::{ContextRegistry, Group, Provider};
use hui_core::event::{EventKind, handler};
use hui_core::id::IdSlot;
use hui_core::markup::Element;
use hui_core::scope::Scope;

use crate::disclosure::OpenState;
use crate::presence::{Presence, PresenceState};
use crate::{Children, Component, PartProps, RenderResult};

pub const COLLAPSIBLE: Group = Group::new("Collapsible");

const TRIGGER_NAME: &str = "Trigger";
const CONTENT_NAME: &str = "Content";

/// Published by [`Collapsible`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsibleContextValue {
    pub content_id: String,
    pub disabled: bool,
    pub open: bool,
    pub on_open_toggle: Callback<()>,
}

thread_local! {
    static COLLAPSIBLE_CONTEXT: ContextRegistry<CollapsibleContextValue> =
        ContextRegistry::new(COLLAPSIBLE.name());
}

/// Collapsible context registry (thread-local).
#[must_use]
pub fn collapsible_context() -> ContextRegistry<CollapsibleContextValue> {
    COLLAPSIBLE_CONTEXT.with(Clone::clone)
}

/// Root part.
#[derive(Debug)]
pub struct Collapsible {
    group: Group,
    open: OpenState,
    disabled: bool,
    content_id: IdSlot,
    provider: Provider<CollapsibleContextValue>,
    props: PartProps,
    children: Children,
}

impl Default for Collapsible {
    fn default() -> Self {
        Self::new()
    }
}

impl Collapsible {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: COLLAPSIBLE,
            open: OpenState::default(),
            disabled: false,
            content_id: IdSlot::new(),
            provider: collapsible_context().provider(),
            props: PartProps::new(),
            children: Children::new(),
        }
    }

    /// Control the open state from outside.
    #[must_use]
    pub fn open(self, open: bool) -> Self {
        self.open.set_prop(Some(open));
        self
    }

    /// Update (or release with `None`) the controlling prop between passes.
    pub fn set_open(&self, open: Option<bool>) {
        self.open.set_prop(open);
    }

    #[must_use]
    pub fn default_open(mut self, open: bool) -> Self {
        self.open.set_default(open);
        self
    }

    #[must_use]
    pub fn on_open_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.open.set_on_change(Callback::new(f));
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Current open state.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.live().state.get()
    }
}

crate::part_builders!(Collapsible, group);
crate::child_builders!(Collapsible);

impl Component for Collapsible {
    fn render(&self, cx: &Scope) -> RenderResult {
        let _span = tracing::debug_span!("widget_render", widget = "Collapsible").entered();
        let live = self.open.live();
        let open = live.state.get();
        let value = CollapsibleContextValue {
            content_id: self.content_id.get(cx, None)?,
            disabled: self.disabled,
            open,
            on_open_toggle: live.on_open_toggle.clone(),
        };
        let inner = self.provider.publish(cx, self.group, value);
        let el = Element::new("div")
            .attr("data-state", open_state(open))
            .flag("data-disabled", self.disabled)
            .children(self.children.render(&inner)?);
        Ok(self.props.apply(el).into())
    }
}

/// Button toggling the content.
#[derive(Debug)]
pub struct CollapsibleTrigger {
    group: Group,
    props: PartProps,
    children: Children,
}

impl Default for CollapsibleTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl CollapsibleTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: COLLAPSIBLE,
            props: PartProps::new(),
            children: Children::new(),
        }
    }
}

crate::part_builders!(CollapsibleTrigger, group);
crate::child_builders!(CollapsibleTrigger);

impl Component for CollapsibleTrigger {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = collapsible_context().lookup(cx, self.group, Some(TRIGGER_NAME))?;
        let toggle = context.on_open_toggle.clone();
        let el = Element::new("button")
            .attr("type", "button")
            .attr("aria-controls", context.content_id.clone())
            .attr("aria-expanded", aria_bool(context.open))
            .attr("data-state", open_state(context.open))
            .flag("data-disabled", context.disabled)
            .flag("disabled", context.disabled)
            .on(EventKind::Click, handler(move |_| toggle.call(())))
            .children(self.children.render(cx)?);
        Ok(self.props.apply(el).into())
    }
}

/// Region shown while open.
#[derive(Debug)]
pub struct CollapsibleContent {
    group: Group,
    force_mount: bool,
    presence: Presence,
    props: PartProps,
    children: Children,
}

impl Default for CollapsibleContent {
    fn default() -> Self {
        Self::new()
    }
}

impl CollapsibleContent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: COLLAPSIBLE,
            force_mount: false,
            presence: Presence::new(),
            props: PartProps::new(),
            children: Children::new(),
        }
    }

    /// Keep the element mounted while closed.
    #[must_use]
    pub fn force_mount(mut self, force: bool) -> Self {
        self.force_mount = force;
        self
    }

    /// Declare a closing animation; children stay until it ends.
    #[must_use]
    pub fn exit_animation(self, animated: bool) -> Self {
        self.presence.set_exit_animation(animated);
        self
    }
}

crate::part_builders!(CollapsibleContent, group);
crate::child_builders!(CollapsibleContent);

impl Component for CollapsibleContent {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = collapsible_context().lookup(cx, self.group, Some(CONTENT_NAME))?;
        if !self.presence.update(self.force_mount || context.open) {
            return Ok(hui_core::markup::Node::Empty);
        }
        let is_open = context.open || self.presence.state() == PresenceState::UnmountSuspended;
        let mut el = Element::new("div")
            .attr("data-state", open_state(context.open))
            .flag("data-disabled", context.disabled)
            .attr("id", context.content_id.clone())
            .flag("hidden", !is_open);
        if is_open {
            el = el.children(self.children.render(cx)?);
        }
        Ok(self.props.apply(self.presence.attach(el)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hui_core::id::IdProviderState;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tree() -> Collapsible {
        Collapsible::new()
            .child(CollapsibleTrigger::new().child("Toggle"))
            .child(CollapsibleContent::new().child("Hidden text"))
    }

    fn click_trigger(node: &hui_core::markup::Node) {
        let trigger = node.find(&|el| el.tag() == "button").unwrap();
        trigger.handler(EventKind::Click).unwrap()(&hui_core::event::UiEvent::new(EventKind::Click));
    }

    #[test]
    fn closed_by_default() {
        let ids = IdProviderState::new();
        let cx = ids.provide(&Scope::root()).unwrap();
        let node = tree().render(&cx).unwrap();
        assert_eq!(
            node.to_html(),
            "<div data-state=\"closed\"><button type=\"button\" aria-controls=\"hui-id-0-1\" \
             aria-expanded=\"false\" data-state=\"closed\">Toggle</button></div>"
        );
    }

    #[test]
    fn trigger_toggles_open() {
        let root = tree();
        let cx = Scope::root();
        let node = root.render(&cx).unwrap();
        click_trigger(&node);
        let node = root.render(&cx).unwrap();
        let content = node
            .find(&|el| el.tag() == "div" && el.has_attr("id"))
            .unwrap();
        assert_eq!(content.get_attr("data-state"), Some("open"));
        assert!(!content.has_attr("hidden"));
        assert_eq!(content.text_content(), "Hidden text");
    }

    #[test]
    fn force_mounted_content_stays_in_tree() {
        let root = Collapsible::new()
            .child(CollapsibleTrigger::new())
            .child(CollapsibleContent::new().force_mount(true).child("x"));
        let node = root.render(&Scope::root()).unwrap();
        let region = node.find(&|el| el.tag() == "div" && el.has_attr("id")).unwrap();
        assert!(region.has_attr("hidden"));
        assert_eq!(region.text_content(), "");
    }

    #[test]
    fn disabled_marks_parts() {
        let root = Collapsible::new().disabled(true).child(CollapsibleTrigger::new());
        let node = root.render(&Scope::root()).unwrap();
        let trigger = node.find(&|el| el.tag() == "button").unwrap();
        assert!(trigger.has_attr("disabled"));
        assert!(trigger.has_attr("data-disabled"));
    }

    #[test]
    fn controlled_root_reports_but_does_not_change() {
        let seen = Rc::new(Cell::new(None));
        let s = Rc::clone(&seen);
        let root = tree().open(false).on_open_change(move |v| s.set(Some(v)));
        let node = root.render(&Scope::root()).unwrap();
        click_trigger(&node);
        assert_eq!(seen.get(), Some(true));
        let node = root.render(&Scope::root()).unwrap();
        assert!(node.find(&|el| el.get_attr("data-state") == Some("open")).is_none());
    }

    #[test]
    fn orphaned_trigger_fails() {
        let err = CollapsibleTrigger::new().render(&Scope::root()).unwrap_err();
        assert_eq!(err.to_string(), "Trigger must be used within Collapsible");
    }

    #[test]
    fn exit_animation_keeps_children_until_animation_end() {
        let content = Rc::new(CollapsibleContent::new().exit_animation(true).child("body"));
        let root = Collapsible::new()
            .default_open(true)
            .child(CollapsibleTrigger::new())
            .child_shared(content.clone());
        let node = root.render(&Scope::root()).unwrap();
        click_trigger(&node);

        let node = root.render(&Scope::root()).unwrap();
        let region = node.find(&|el| el.tag() == "div" && el.has_attr("id")).unwrap();
        assert_eq!(region.get_attr("data-state"), Some("closed"));
        assert_eq!(region.text_content(), "body");

        let mut document = hui_core::document::Document::new();
        document.mount(&node);
        let key = document
            .find(|el| el.tag() == "div" && el.has_attr("id"))
            .unwrap();
        document.animation_end(key);
        let node = root.render(&Scope::root()).unwrap();
        assert!(node.find(&|el| el.tag() == "div" && el.has_attr("id")).is_none());
    }
}
