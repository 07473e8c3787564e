#![forbid(unsafe_code)]

//! Title and description, referenced by the content's ARIA attributes.

use hui_core::context::Group;
use hui_core::markup::Element;
use hui_core::scope::Scope;

use super::{DESCRIPTION_NAME, DIALOG, TITLE_NAME, dialog_context};
use crate::{Children, Component, PartProps, RenderResult};

/// `h2` labelling the dialog.
#[derive(Debug)]
pub struct DialogTitle {
    group: Group,
    props: PartProps,
    children: Children,
}

impl Default for DialogTitle {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogTitle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DIALOG,
            props: PartProps::new(),
            children: Children::new(),
        }
    }
}

crate::part_builders!(DialogTitle, group);
crate::child_builders!(DialogTitle);

impl Component for DialogTitle {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = dialog_context().lookup(cx, self.group, Some(TITLE_NAME))?;
        let el = Element::new("h2")
            .attr("id", context.title_id.clone())
            .children(self.children.render(cx)?);
        Ok(self.props.apply(el).into())
    }
}

/// `p` describing the dialog.
#[derive(Debug)]
pub struct DialogDescription {
    group: Group,
    props: PartProps,
    children: Children,
}

impl Default for DialogDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogDescription {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DIALOG,
            props: PartProps::new(),
            children: Children::new(),
        }
    }
}

crate::part_builders!(DialogDescription, group);
crate::child_builders!(DialogDescription);

impl Component for DialogDescription {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = dialog_context().lookup(cx, self.group, Some(DESCRIPTION_NAME))?;
        let el = Element::new("p")
            .attr("id", context.description_id.clone())
            .children(self.children.render(cx)?);
        Ok(self.props.apply(el).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Dialog;
    use hui_core::id::IdProviderState;

    #[test]
    fn ids_come_from_root() {
        let ids = IdProviderState::new();
        let cx = ids.provide(&Scope::root()).unwrap();
        let dialog = Dialog::new()
            .child(DialogTitle::new().child("Edit profile"))
            .child(DialogDescription::new().child("Make changes"));
        assert_eq!(
            dialog.render(&cx).unwrap().to_html(),
            "<h2 id=\"hui-id-0-2\">Edit profile</h2><p id=\"hui-id-0-3\">Make changes</p>"
        );
    }

    #[test]
    fn title_outside_dialog_fails() {
        let err = DialogTitle::new().render(&Scope::root()).unwrap_err();
        assert_eq!(err.to_string(), "Title must be used within Dialog");
    }
}
