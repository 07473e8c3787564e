#![forbid(unsafe_code)]

//! Content announced by assistive technology but not shown.

use hui_a11y::VISUALLY_HIDDEN_STYLE;
use hui_core::markup::Element;
use hui_core::scope::Scope;

use crate::{Children, Component, PartProps, RenderResult};

/// `span` hidden from sight but kept in the accessibility tree.
#[derive(Debug, Default)]
pub struct VisuallyHidden {
    props: PartProps,
    children: Children,
}

impl VisuallyHidden {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

crate::part_builders!(VisuallyHidden);
crate::child_builders!(VisuallyHidden);

impl Component for VisuallyHidden {
    fn render(&self, cx: &Scope) -> RenderResult {
        let el = Element::new("span")
            .attr("style", VISUALLY_HIDDEN_STYLE)
            .children(self.children.render(cx)?);
        Ok(self.props.apply(el).into())
    }
}
