#![forbid(unsafe_code)]

//! Label and description audits for dialog-like content.
//!
//! Audits inspect a rendered element subtree. A label is present when the
//! element carries a non-empty `aria-label`, or when every id listed in
//! `aria-labelledby` resolves to an element inside the subtree. Descriptions
//! follow the same rule with `aria-describedby`.
//!
//! # Failure Modes
//!
//! | Scenario | Result |
//! |----------|--------|
//! | `aria-labelledby` points outside the subtree | Reported as missing |
//! | Empty `aria-label` | Reported as missing |

use std::fmt;

use ahash::AHashMap;
use hui_core::markup::{Element, Node};

/// Names used in warning messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequirement {
    pub content_name: &'static str,
    pub title_name: &'static str,
    pub docs_slug: &'static str,
}

impl LabelRequirement {
    #[must_use]
    pub const fn new(
        content_name: &'static str,
        title_name: &'static str,
        docs_slug: &'static str,
    ) -> Self {
        Self {
            content_name,
            title_name,
            docs_slug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MissingLabel,
    MissingDescription,
}

/// Advisory accessibility finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A11yWarning {
    kind: WarningKind,
    content_name: &'static str,
    message: String,
}

impl A11yWarning {
    #[must_use]
    pub fn kind(&self) -> WarningKind {
        self.kind
    }

    #[must_use]
    pub fn content_name(&self) -> &'static str {
        self.content_name
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for A11yWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn index_ids<'a>(element: &'a Element, index: &mut AHashMap<&'a str, &'a Element>) {
    if let Some(id) = element.get_attr("id") {
        index.entry(id).or_insert(element);
    }
    for child in element.child_nodes() {
        index_node(child, index);
    }
}

fn index_node<'a>(node: &'a Node, index: &mut AHashMap<&'a str, &'a Element>) {
    match node {
        Node::Element(el) => index_ids(el, index),
        Node::Fragment(nodes) => nodes.iter().for_each(|n| index_node(n, index)),
        Node::Text(_) | Node::Empty => {}
    }
}

fn references_resolve(element: &Element, attr: &str) -> bool {
    let Some(ids) = element.get_attr(attr) else {
        return false;
    };
    let mut index = AHashMap::new();
    index_ids(element, &mut index);
    let mut ids = ids.split_whitespace().peekable();
    ids.peek().is_some() && ids.all(|id| index.contains_key(id))
}

/// Report a missing accessible name on `element`.
#[must_use]
pub fn audit_label(element: &Element, names: &LabelRequirement) -> Option<A11yWarning> {
    let labelled = element
        .get_attr("aria-label")
        .is_some_and(|label| !label.trim().is_empty())
        || references_resolve(element, "aria-labelledby");
    if labelled {
        return None;
    }
    let content = names.content_name;
    let title = names.title_name;
    Some(A11yWarning {
        kind: WarningKind::MissingLabel,
        content_name: content,
        message: format!(
            "`{content}` requires a label for the component to be accessible for screen reader users.\n\n\
             You can label the `{content}` by passing a `{title}` component as a child, which also \
             benefits sighted users by adding visible context to the dialog.\n\n\
             Alternatively, you can use your own component as a title by assigning it an `id` and \
             passing the same value to the `aria-labelledby` attribute of `{content}`. If the label \
             is confusing or duplicative for sighted users, you can also pass a label directly with \
             `aria-label`.\n\n\
             For more information, see the `{}` component documentation.",
            names.docs_slug
        ),
    })
}

/// Report a missing accessible description on `element`.
#[must_use]
pub fn audit_description(
    element: &Element,
    content_name: &'static str,
    description_name: &'static str,
    docs_slug: &'static str,
) -> Option<A11yWarning> {
    if references_resolve(element, "aria-describedby") {
        return None;
    }
    Some(A11yWarning {
        kind: WarningKind::MissingDescription,
        content_name,
        message: format!(
            "`{content_name}` requires a description for the component to be accessible for screen \
             reader users.\n\n\
             You can add a description to the `{content_name}` by passing a `{description_name}` \
             component as a child, which also benefits sighted users by adding visible context to \
             the dialog.\n\n\
             Alternatively, you can use your own component as a description by assigning it an `id` \
             and passing the same value to the `aria-describedby` attribute of `{content_name}`. If \
             the description is confusing or duplicative for sighted users, you can wrap it in a \
             visually hidden element.\n\n\
             For more information, see the `{docs_slug}` component documentation."
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: LabelRequirement = LabelRequirement::new("DialogContent", "DialogTitle", "dialog");

    fn content() -> Element {
        Element::new("div").attr("role", "dialog")
    }

    #[test]
    fn aria_label_satisfies_audit() {
        assert!(audit_label(&content().attr("aria-label", "Settings"), &NAMES).is_none());
    }

    #[test]
    fn blank_aria_label_is_missing() {
        let warning = audit_label(&content().attr("aria-label", "  "), &NAMES).unwrap();
        assert_eq!(warning.kind(), WarningKind::MissingLabel);
    }

    #[test]
    fn labelledby_must_resolve_inside() {
        let with_title = content()
            .attr("aria-labelledby", "t1")
            .child(Element::new("h2").attr("id", "t1").child("Title"));
        assert!(audit_label(&with_title, &NAMES).is_none());

        let dangling = content().attr("aria-labelledby", "t1");
        let warning = audit_label(&dangling, &NAMES).unwrap();
        assert!(warning.message().contains("`DialogContent` requires a label"));
        assert!(warning.message().contains("`DialogTitle`"));
    }

    #[test]
    fn labelledby_resolves_through_fragments() {
        let el = content().attr("aria-labelledby", "a b").child(Node::Fragment(vec![
            Element::new("span").attr("id", "a").into(),
            Element::new("span").attr("id", "b").into(),
        ]));
        assert!(audit_label(&el, &NAMES).is_none());
    }

    #[test]
    fn description_audit() {
        let described = content()
            .attr("aria-describedby", "d")
            .child(Element::new("p").attr("id", "d"));
        assert!(audit_description(&described, "AlertDialogContent", "AlertDialogDescription", "alert-dialog").is_none());

        let missing = audit_description(&content(), "AlertDialogContent", "AlertDialogDescription", "alert-dialog")
            .unwrap();
        assert_eq!(missing.kind(), WarningKind::MissingDescription);
        assert_eq!(missing.content_name(), "AlertDialogContent");
    }
}
