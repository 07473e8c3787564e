#![forbid(unsafe_code)]

//! Caller-supplied attributes, handlers and refs for one widget part.
//!
//! Parts compute their own attributes and handlers, then apply
//! [`PartProps`] on top: caller attributes replace computed ones, caller
//! handlers run ahead of built-in ones (which are skipped when the caller
//! prevents the default), and caller refs bind alongside the part's own.

use hui_core::callback::ElementRef;
use hui_core::event::{EventKind, Handler, UiEvent, compose_handlers};
use hui_core::markup::Element;

/// Overrides applied to the element a part renders.
#[derive(Clone, Default)]
pub struct PartProps {
    attrs: Vec<(String, String)>,
    handlers: Vec<(EventKind, Handler)>,
    refs: Vec<ElementRef>,
}

impl std::fmt::Debug for PartProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartProps")
            .field("attrs", &self.attrs)
            .field(
                "handlers",
                &self.handlers.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            )
            .field("refs", &self.refs.len())
            .finish()
    }
}

impl PartProps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Caller attribute, if set.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Add a handler. A second handler for the same kind runs after the first.
    pub fn add_handler(&mut self, kind: EventKind, handler: Handler) {
        match self.handlers.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => {
                let first = slot.1.clone();
                slot.1 = compose_handlers(Some(first), handler);
            }
            None => self.handlers.push((kind, handler)),
        }
    }

    pub fn add_ref(&mut self, r: ElementRef) {
        if !self.refs.contains(&r) {
            self.refs.push(r);
        }
    }

    /// Apply these overrides to a computed element.
    #[must_use]
    pub fn apply(&self, mut el: Element) -> Element {
        for (name, value) in &self.attrs {
            el.set_attr(name.clone(), value.clone());
        }
        for (kind, handler) in &self.handlers {
            let composed = compose_handlers(Some(handler.clone()), ours_or_noop(&el, *kind));
            el.set_handler(*kind, composed);
        }
        for r in &self.refs {
            el = el.node_ref(r.clone());
        }
        el
    }
}

fn ours_or_noop(el: &Element, kind: EventKind) -> Handler {
    match el.handler(kind) {
        Some(ours) => ours.clone(),
        None => std::rc::Rc::new(|_: &UiEvent| {}),
    }
}

/// Implement the caller-override builders (`attr`, `on`, `node_ref`) and,
/// with `group`, the group override, on a part type with `props: PartProps`
/// (and `group: Group`) fields.
#[macro_export]
macro_rules! part_builders {
    ($ty:ty) => {
        impl $ty {
            /// Set an attribute on the rendered element (overrides computed ones).
            #[must_use]
            pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.props.set_attr(name, value);
                self
            }

            /// Run `handler` ahead of the part's own handler for `kind`.
            #[must_use]
            pub fn on(
                mut self,
                kind: $crate::__private::EventKind,
                handler: impl Fn(&$crate::__private::UiEvent) + 'static,
            ) -> Self {
                self.props.add_handler(kind, ::std::rc::Rc::new(handler));
                self
            }

            /// Bind `r` to the rendered element.
            #[must_use]
            pub fn node_ref(mut self, r: $crate::__private::ElementRef) -> Self {
                self.props.add_ref(r);
                self
            }
        }
    };
    ($ty:ty, group) => {
        $crate::part_builders!($ty);

        impl $ty {
            /// Resolve context under `group` instead of the widget's own.
            #[must_use]
            pub fn group(mut self, group: $crate::__private::Group) -> Self {
                self.group = group;
                self
            }
        }
    };
}
