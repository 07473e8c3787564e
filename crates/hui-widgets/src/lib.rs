#![forbid(unsafe_code)]

//! Headless, accessible widget primitives for hui.
//!
//! Every widget is a tree of persistent part structs. A root part publishes
//! its state through a context registry; sub-parts look it up by
//! `(group, part name)` and render markup with the right ARIA attributes and
//! event handlers. Rendering an orphaned part fails with
//! [`MissingContext`]; it never panics.

pub mod accessible_icon;
pub mod alert_dialog;
pub mod avatar;
pub mod collapsible;
pub mod dialog;
mod disclosure;
pub mod id_provider;
pub mod presence;
pub mod props;
pub mod visually_hidden;

#[cfg(test)]
mod test_support;

use std::fmt;
use std::rc::Rc;

use hui_core::error::MissingContext;
use hui_core::markup::{Element, Node};
use hui_core::scope::Scope;

pub use accessible_icon::AccessibleIcon;
pub use alert_dialog::{
    AlertDialog, AlertDialogAction, AlertDialogCancel, AlertDialogContent, AlertDialogDescription,
    AlertDialogOverlay, AlertDialogTitle, AlertDialogTrigger,
};
pub use avatar::{Avatar, AvatarFallback, AvatarImage, ImageLoader, ImageLoadingStatus};
pub use collapsible::{Collapsible, CollapsibleContent, CollapsibleTrigger};
pub use dialog::{
    Dialog, DialogClose, DialogContent, DialogDescription, DialogOverlay, DialogTitle, DialogTrigger,
};
pub use id_provider::IdProvider;
pub use presence::{Presence, PresenceState};
pub use props::PartProps;
pub use visually_hidden::VisuallyHidden;

#[doc(hidden)]
pub mod __private {
    pub use hui_core::callback::ElementRef;
    pub use hui_core::context::Group;
    pub use hui_core::event::{EventKind, UiEvent};
}

/// Result of rendering one component.
pub type RenderResult = Result<Node, MissingContext>;

/// A renderable part.
///
/// Components are built once and rendered on every pass with the scope of
/// their position in the tree. State that must survive between passes lives
/// in the component behind interior mutability.
pub trait Component {
    /// Render into markup.
    fn render(&self, cx: &Scope) -> RenderResult;
}

impl<T: Component + ?Sized> Component for Rc<T> {
    fn render(&self, cx: &Scope) -> RenderResult {
        (**self).render(cx)
    }
}

impl<T: Component + ?Sized> Component for Box<T> {
    fn render(&self, cx: &Scope) -> RenderResult {
        (**self).render(cx)
    }
}

impl Component for Node {
    fn render(&self, _cx: &Scope) -> RenderResult {
        Ok(self.clone())
    }
}

impl Component for Element {
    fn render(&self, _cx: &Scope) -> RenderResult {
        Ok(Node::Element(self.clone()))
    }
}

impl Component for &'static str {
    fn render(&self, _cx: &Scope) -> RenderResult {
        Ok(Node::text(*self))
    }
}

impl Component for String {
    fn render(&self, _cx: &Scope) -> RenderResult {
        Ok(Node::text(self.clone()))
    }
}

/// Component backed by a closure.
pub struct FnComponent<F>(F);

/// Wrap `f` as a component.
pub fn render_fn<F>(f: F) -> FnComponent<F>
where
    F: Fn(&Scope) -> RenderResult,
{
    FnComponent(f)
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&Scope) -> RenderResult,
{
    fn render(&self, cx: &Scope) -> RenderResult {
        (self.0)(cx)
    }
}

/// Ordered child components.
#[derive(Clone, Default)]
pub struct Children {
    items: Vec<Rc<dyn Component>>,
}

impl fmt::Debug for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("len", &self.items.len())
            .finish()
    }
}

impl Children {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: impl Component + 'static) {
        self.items.push(Rc::new(child));
    }

    /// Add a component shared with the caller.
    pub fn push_shared(&mut self, child: Rc<dyn Component>) {
        self.items.push(child);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render every child in `cx`, stopping at the first failure.
    pub fn render(&self, cx: &Scope) -> Result<Vec<Node>, MissingContext> {
        self.items.iter().map(|child| child.render(cx)).collect()
    }

    /// Render every child into one fragment.
    pub fn render_fragment(&self, cx: &Scope) -> RenderResult {
        self.render(cx).map(Node::Fragment)
    }
}

/// Implement `child` / `child_shared` builders on a type with a
/// `children: Children` field.
#[macro_export]
macro_rules! child_builders {
    ($ty:ty) => {
        impl $ty {
            /// Append a child component.
            #[must_use]
            pub fn child(mut self, child: impl $crate::Component + 'static) -> Self {
                self.children.push(child);
                self
            }

            /// Append a component the caller keeps a handle to.
            #[must_use]
            pub fn child_shared(mut self, child: ::std::rc::Rc<dyn $crate::Component>) -> Self {
                self.children.push_shared(child);
                self
            }
        }
    };
}

/// Plain element with caller props and child components.
#[derive(Debug)]
pub struct Primitive {
    tag: &'static str,
    props: PartProps,
    children: Children,
}

impl Primitive {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            props: PartProps::new(),
            children: Children::new(),
        }
    }

    #[must_use]
    pub fn div() -> Self {
        Self::new("div")
    }

    #[must_use]
    pub fn span() -> Self {
        Self::new("span")
    }

    #[must_use]
    pub fn button() -> Self {
        Self::new("button").attr("type", "button")
    }
}

crate::part_builders!(Primitive);
child_builders!(Primitive);

impl Component for Primitive {
    fn render(&self, cx: &Scope) -> RenderResult {
        let children = self.children.render(cx)?;
        Ok(self.props.apply(Element::new(self.tag).children(children)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hui_core::context::{ContextRegistry, Group};

    #[test]
    fn primitive_renders_children_in_order() {
        let node = Primitive::div()
            .attr("data-x", "1")
            .child("a")
            .child(Primitive::span().child("b"))
            .render(&Scope::root())
            .unwrap();
        assert_eq!(node.to_html(), "<div data-x=\"1\">a<span>b</span></div>");
    }

    #[test]
    fn children_propagate_missing_context() {
        const GROUP: Group = Group::new("Thing");
        let registry: ContextRegistry<u8> = ContextRegistry::new("Thing");
        let node = Primitive::div()
            .child(render_fn(move |cx| {
                registry.lookup(cx, GROUP, Some("Part"))?;
                Ok(Node::Empty)
            }))
            .render(&Scope::root());
        assert_eq!(node.unwrap_err().to_string(), "Part must be used within Thing");
    }

    #[test]
    fn shared_children_render_through_rc() {
        let shared: Rc<dyn Component> = Rc::new(Primitive::button().child("Go"));
        let node = Primitive::div().child_shared(Rc::clone(&shared)).render(&Scope::root()).unwrap();
        assert_eq!(node.to_html(), "<div><button type=\"button\">Go</button></div>");
    }
}
