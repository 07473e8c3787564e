#![forbid(unsafe_code)]

//! Id scope component.

use hui_core::id::IdProviderState;
use hui_core::scope::Scope;

use crate::{Children, Component, RenderResult};

/// Gives its subtree a private id prefix.
#[derive(Debug, Default)]
pub struct IdProvider {
    state: IdProviderState,
    children: Children,
}

impl IdProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

crate::child_builders!(IdProvider);

impl Component for IdProvider {
    fn render(&self, cx: &Scope) -> RenderResult {
        let cx = self.state.provide(cx)?;
        self.children.render_fragment(&cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_fn;
    use hui_core::id::generate_id;
    use hui_core::markup::Node;

    #[test]
    fn subtree_ids_use_provider_prefix() {
        let tree = IdProvider::new()
            .child(render_fn(|cx| Ok(Node::text(generate_id(cx, None)?))))
            .child(IdProvider::new().child(render_fn(|cx| Ok(Node::text(generate_id(cx, None)?)))));
        assert_eq!(tree.render(&Scope::root()).unwrap().to_html(), "hui-id-0-1hui-id-1-1");
    }
}
