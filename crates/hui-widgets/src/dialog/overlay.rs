#![forbid(unsafe_code)]

//! Backdrop behind a modal dialog.

use hui_a11y::open_state;
use hui_core::context::Group;
use hui_core::markup::{Element, Node};
use hui_core::scope::Scope;

use super::{DIALOG, OVERLAY_NAME, dialog_context};
use crate::presence::Presence;
use crate::{Children, Component, PartProps, RenderResult};

/// `div` rendered for modal dialogs while open (or animating out).
#[derive(Debug)]
pub struct DialogOverlay {
    group: Group,
    force_mount: bool,
    presence: Presence,
    props: PartProps,
    children: Children,
}

impl Default for DialogOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DIALOG,
            force_mount: false,
            presence: Presence::new(),
            props: PartProps::new(),
            children: Children::new(),
        }
    }

    #[must_use]
    pub fn force_mount(mut self, force: bool) -> Self {
        self.force_mount = force;
        self
    }

    #[must_use]
    pub fn exit_animation(self, animated: bool) -> Self {
        self.presence.set_exit_animation(animated);
        self
    }
}

crate::part_builders!(DialogOverlay, group);
crate::child_builders!(DialogOverlay);

impl Component for DialogOverlay {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = dialog_context().lookup(cx, self.group, Some(OVERLAY_NAME))?;
        if !context.modal || !self.presence.update(self.force_mount || context.open) {
            return Ok(Node::Empty);
        }
        let el = Element::new("div")
            .attr("data-state", open_state(context.open))
            .children(self.children.render(cx)?);
        Ok(self.props.apply(self.presence.attach(el)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Dialog;

    #[test]
    fn overlay_only_for_open_modal() {
        let closed = Dialog::new().child(DialogOverlay::new());
        assert!(closed.render(&Scope::root()).unwrap().is_empty());

        let open = Dialog::new().default_open(true).child(DialogOverlay::new());
        assert_eq!(
            open.render(&Scope::root()).unwrap().to_html(),
            "<div data-state=\"open\"></div>"
        );

        let non_modal = Dialog::new().default_open(true).modal(false).child(DialogOverlay::new());
        assert!(non_modal.render(&Scope::root()).unwrap().is_empty());
    }

    #[test]
    fn forced_overlay_shows_closed_state() {
        let dialog = Dialog::new().child(DialogOverlay::new().force_mount(true));
        assert_eq!(
            dialog.render(&Scope::root()).unwrap().to_html(),
            "<div data-state=\"closed\"></div>"
        );
    }
}
