#![forbid(unsafe_code)]

//! Headless markup tree produced by rendering.
//!
//! A rendered tree is plain data plus event handlers. The [`crate::document`]
//! host mounts it; [`Node::to_html`] serializes it deterministically for
//! snapshots and server output.
//!
//! # Invariants
//!
//! 1. Attribute order is insertion order; setting an existing attribute
//!    replaces its value in place.
//! 2. At most one handler per [`EventKind`] lives on an element; composing
//!    several is the caller's job (see [`crate::event::compose_handlers`]).
//! 3. Serialization never includes handlers or refs.

use std::fmt::{self, Write as _};

use crate::callback::ElementRef;
use crate::event::{EventKind, Handler};

const VOID_TAGS: &[&str] = &["area", "br", "col", "hr", "img", "input", "link", "meta", "source"];

/// One rendered node.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "lowercase"))]
pub enum Node {
    Element(Element),
    Text(String),
    Fragment(Vec<Node>),
    #[default]
    Empty,
}

/// A markup element.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
    #[cfg_attr(feature = "serde", serde(skip))]
    handlers: Vec<(EventKind, Handler)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    refs: Vec<ElementRef>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            handlers: Vec::new(),
            refs: Vec::new(),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute when `value` is `Some`.
    #[must_use]
    pub fn attr_opt(mut self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.set_attr(name, value);
        }
        self
    }

    /// Presence attribute: `name=""` when `on`, absent otherwise.
    #[must_use]
    pub fn flag(mut self, name: impl Into<String>, on: bool) -> Self {
        let name = name.into();
        if on {
            self.set_attr(name, "");
        } else {
            self.remove_attr(&name);
        }
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// Attribute value, if set.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Append a child node.
    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several child nodes.
    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    #[must_use]
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Attach (or replace) the handler for `kind`.
    #[must_use]
    pub fn on(mut self, kind: EventKind, handler: Handler) -> Self {
        self.set_handler(kind, handler);
        self
    }

    pub fn set_handler(&mut self, kind: EventKind, handler: Handler) {
        match self.handlers.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((kind, handler)),
        }
    }

    /// Handler registered for `kind`.
    #[must_use]
    pub fn handler(&self, kind: EventKind) -> Option<&Handler> {
        self.handlers
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, h)| h)
    }

    #[must_use]
    pub fn has_handler(&self, kind: EventKind) -> bool {
        self.handler(kind).is_some()
    }

    /// Bind `r` to this element once mounted.
    #[must_use]
    pub fn node_ref(mut self, r: ElementRef) -> Self {
        if !self.refs.contains(&r) {
            self.refs.push(r);
        }
        self
    }

    pub fn refs(&self) -> &[ElementRef] {
        &self.refs
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    pub(crate) fn without_children(&self) -> Self {
        Self {
            tag: self.tag,
            attrs: self.attrs.clone(),
            children: Vec::new(),
            handlers: self.handlers.clone(),
            refs: self.refs.clone(),
        }
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field(
                "handlers",
                &self.handlers.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Node {
    /// Text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fragment(nodes) => nodes.iter().all(Node::is_empty),
            _ => false,
        }
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Apply `f` to this node if it is an element; other nodes pass through.
    #[must_use]
    pub fn map_element(self, f: impl FnOnce(Element) -> Element) -> Self {
        match self {
            Self::Element(el) => Self::Element(f(el)),
            other => other,
        }
    }

    /// Depth-first search for the first element matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        match self {
            Self::Element(el) => {
                if pred(el) {
                    return Some(el);
                }
                el.children.iter().find_map(|child| child.find(pred))
            }
            Self::Fragment(nodes) => nodes.iter().find_map(|child| child.find(pred)),
            _ => None,
        }
    }

    /// Top-level elements, looking through fragments.
    #[must_use]
    pub fn top_elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_top(&mut out);
        out
    }

    fn collect_top<'a>(&'a self, out: &mut Vec<&'a Element>) {
        match self {
            Self::Element(el) => out.push(el),
            Self::Fragment(nodes) => nodes.iter().for_each(|n| n.collect_top(out)),
            _ => {}
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Self::Fragment(nodes) => nodes.iter().for_each(|c| c.collect_text(out)),
            Self::Empty => {}
        }
    }

    /// Deterministic HTML serialization.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(el) => el.write_html(out),
            Self::Text(text) => out.push_str(&escape(text)),
            Self::Fragment(nodes) => nodes.iter().for_each(|n| n.write_html(out)),
            Self::Empty => {}
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(el) => el.fmt(f),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Fragment(nodes) => f.debug_tuple("Fragment").field(nodes).finish(),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Self::Fragment(nodes)
    }
}

fn escape(raw: &str) -> std::borrow::Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"']) {
        return std::borrow::Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    std::borrow::Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::handler;

    #[test]
    fn attributes_replace_in_place() {
        let el = Element::new("button")
            .attr("type", "button")
            .attr("data-state", "closed")
            .attr("type", "submit");
        assert_eq!(
            el.attrs().collect::<Vec<_>>(),
            vec![("type", "submit"), ("data-state", "closed")]
        );
    }

    #[test]
    fn flag_sets_and_clears() {
        let el = Element::new("div").flag("data-disabled", true);
        assert_eq!(el.get_attr("data-disabled"), Some(""));
        let el = el.flag("data-disabled", false);
        assert!(!el.has_attr("data-disabled"));
    }

    #[test]
    fn html_is_deterministic_and_escaped() {
        let node: Node = Element::new("p")
            .attr("title", "a \"b\"")
            .child("x < y & z")
            .child(Element::new("img").attr("src", "/a.png"))
            .into();
        assert_eq!(
            node.to_html(),
            "<p title=\"a &quot;b&quot;\">x &lt; y &amp; z<img src=\"/a.png\"></p>"
        );
    }

    #[test]
    fn handlers_are_not_serialized() {
        let node: Node = Element::new("button")
            .on(EventKind::Click, handler(|_| {}))
            .child("Go")
            .into();
        assert_eq!(node.to_html(), "<button>Go</button>");
        assert!(node.as_element().is_some_and(|el| el.has_handler(EventKind::Click)));
    }

    #[test]
    fn find_descends_through_fragments() {
        let node = Node::Fragment(vec![
            Node::Empty,
            Element::new("div")
                .child(Element::new("h2").attr("id", "t").child("Title"))
                .into(),
        ]);
        let title = node.find(&|el| el.tag() == "h2").unwrap();
        assert_eq!(title.text_content(), "Title");
        assert_eq!(node.top_elements().len(), 1);
    }

    #[test]
    fn empty_fragment_is_empty() {
        assert!(Node::Fragment(vec![Node::Empty, Node::Fragment(vec![])]).is_empty());
        assert!(!Node::text("").is_empty());
    }
}
