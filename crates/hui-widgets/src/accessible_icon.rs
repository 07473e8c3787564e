#![forbid(unsafe_code)]

//! Decorative icon with an accessible label.

use std::rc::Rc;

use hui_core::markup::Node;
use hui_core::scope::Scope;

use crate::visually_hidden::VisuallyHidden;
use crate::{Component, RenderResult};

/// Hides `icon` from assistive technology and announces `label` instead.
pub struct AccessibleIcon {
    label: String,
    icon: Rc<dyn Component>,
    hidden_label: VisuallyHidden,
}

impl std::fmt::Debug for AccessibleIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessibleIcon")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl AccessibleIcon {
    pub fn new(label: impl Into<String>, icon: impl Component + 'static) -> Self {
        let label = label.into();
        Self {
            hidden_label: VisuallyHidden::new().child(label.clone()),
            label,
            icon: Rc::new(icon),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Component for AccessibleIcon {
    fn render(&self, cx: &Scope) -> RenderResult {
        let icon = self.icon.render(cx)?.map_element(|el| {
            el.attr("aria-hidden", "true").attr("focusable", "false")
        });
        if icon.as_element().is_none() {
            tracing::warn!(label = %self.label, "AccessibleIcon expects a single element icon");
        }
        Ok(Node::Fragment(vec![icon, self.hidden_label.render(cx)?]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hui_core::markup::Element;

    #[test]
    fn icon_is_hidden_and_label_announced() {
        let icon = Element::new("svg").attr("viewBox", "0 0 24 24");
        let node = AccessibleIcon::new("Close", icon).render(&Scope::root()).unwrap();
        let tops = node.top_elements();
        assert_eq!(tops.len(), 2);
        assert_eq!(tops[0].get_attr("aria-hidden"), Some("true"));
        assert_eq!(tops[0].get_attr("focusable"), Some("false"));
        assert_eq!(tops[1].text_content(), "Close");
    }
}
