#![forbid(unsafe_code)]

//! Buttons that open and close a dialog.

use hui_a11y::{aria_bool, open_state};
use hui_core::context::Group;
use hui_core::event::{EventKind, handler};
use hui_core::markup::Element;
use hui_core::scope::Scope;

use super::{CLOSE_NAME, DIALOG, TRIGGER_NAME, dialog_context};
use crate::{Children, Component, PartProps, RenderResult};

/// Toggles the dialog and receives focus back when it closes.
#[derive(Debug)]
pub struct DialogTrigger {
    group: Group,
    props: PartProps,
    children: Children,
}

impl Default for DialogTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DIALOG,
            props: PartProps::new(),
            children: Children::new(),
        }
    }
}

crate::part_builders!(DialogTrigger, group);
crate::child_builders!(DialogTrigger);

impl Component for DialogTrigger {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = dialog_context().lookup(cx, self.group, Some(TRIGGER_NAME))?;
        let toggle = context.on_open_toggle.clone();
        let el = Element::new("button")
            .attr("type", "button")
            .attr("aria-haspopup", "dialog")
            .attr("aria-expanded", aria_bool(context.open))
            .attr("aria-controls", context.content_id.clone())
            .attr("data-state", open_state(context.open))
            .node_ref(context.trigger_ref.clone())
            .on(EventKind::Click, handler(move |_| toggle.call(())))
            .children(self.children.render(cx)?);
        Ok(self.props.apply(el).into())
    }
}

/// Closes the dialog.
#[derive(Debug)]
pub struct DialogClose {
    group: Group,
    props: PartProps,
    children: Children,
}

impl Default for DialogClose {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogClose {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DIALOG,
            props: PartProps::new(),
            children: Children::new(),
        }
    }
}

crate::part_builders!(DialogClose, group);
crate::child_builders!(DialogClose);

impl Component for DialogClose {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = dialog_context().lookup(cx, self.group, Some(CLOSE_NAME))?;
        let change = context.on_open_change.clone();
        let el = Element::new("button")
            .attr("type", "button")
            .on(EventKind::Click, handler(move |_| change.call(false)))
            .children(self.children.render(cx)?);
        Ok(self.props.apply(el).into())
    }
}
