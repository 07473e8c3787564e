#![forbid(unsafe_code)]

//! Headless document host.
//!
//! [`Document`] plays the role a browser plays for DOM-based widgets: it
//! mounts a rendered [`Node`] tree, binds [`ElementRef`]s, tracks focus, and
//! dispatches events with bubbling. Widgets describe behavior through marker
//! attributes; the document implements it:
//!
//! | Attribute | Behavior |
//! |-----------|----------|
//! | `data-focus-scope="loop trapped"` | Tab cycles inside; focus cannot leave while trapped; auto-focus on mount/unmount |
//! | `data-dismissable-layer` | Most recently mounted layer receives `EscapeKeyDown` and `PointerDownOutside` |
//! | `data-disable-outside-pointer-events` | Clicks outside the topmost such layer are swallowed |
//!
//! # Invariants
//!
//! 1. Element keys are document-order indices of the current mount.
//! 2. Focus survives a re-mount when an element with the same tree path and
//!    tag still exists.
//! 3. Auto-focus events fire once per scope appearance/disappearance, keyed
//!    by the scope's `id` (or its tree path when it has none).
//! 4. Layers are ordered by when they first mounted, using the same identity
//!    as scopes. Layers that mount together are ordered by document position.
//!
//! # Failure Modes
//!
//! | Scenario | Behavior |
//! |----------|----------|
//! | Event on unknown key | Ignored, returns an event nobody saw |
//! | Click on disabled element | Not delivered |
//! | Tab with nothing focusable | Focus unchanged |
//! | Scope mounts with nothing focusable | The scope element itself takes focus |

use std::fmt;

use crate::callback::ElementRef;
use crate::event::{EventKind, Key, Modifiers, PointerButton, UiEvent};
use crate::markup::{Element, Node};

/// Marks an element as a focus scope. Value holds `loop` and/or `trapped`.
pub const FOCUS_SCOPE_ATTR: &str = "data-focus-scope";
/// Marks an element as a dismissable layer.
pub const DISMISSABLE_LAYER_ATTR: &str = "data-dismissable-layer";
/// Marks a dismissable layer that blocks pointer events outside it.
pub const DISABLE_OUTSIDE_POINTER_ATTR: &str = "data-disable-outside-pointer-events";

/// Key of a mounted element (document-order index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(usize);

impl ElementKey {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

struct Mounted {
    element: Element,
    text: String,
    parent: Option<ElementKey>,
    children: Vec<ElementKey>,
    path: Vec<usize>,
}

/// Parsed `data-focus-scope` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusScopeMode {
    pub looping: bool,
    pub trapped: bool,
}

impl FocusScopeMode {
    /// Attribute value for this mode.
    #[must_use]
    pub fn attr_value(self) -> String {
        let mut tokens = Vec::new();
        if self.looping {
            tokens.push("loop");
        }
        if self.trapped {
            tokens.push("trapped");
        }
        tokens.join(" ")
    }

    fn parse(value: &str) -> Self {
        let mut mode = Self::default();
        for token in value.split_whitespace() {
            match token {
                "loop" => mode.looping = true,
                "trapped" => mode.trapped = true,
                _ => {}
            }
        }
        mode
    }
}

/// Mounted, interactive document.
#[derive(Default)]
pub struct Document {
    nodes: Vec<Mounted>,
    refs: Vec<ElementRef>,
    focused: Option<ElementKey>,
    layers: Vec<(String, ElementKey)>,
    html: String,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.nodes.len())
            .field("focused", &self.focused)
            .finish()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `root`, replacing the previous tree.
    pub fn mount(&mut self, root: &Node) {
        let previous = std::mem::take(&mut self.nodes);
        let focused_path = self
            .focused
            .and_then(|key| previous.get(key.index()))
            .map(|m| (m.path.clone(), m.element.tag()));

        let mut nodes = Vec::new();
        flatten(root, None, &[], &mut nodes);
        self.nodes = nodes;
        self.html = root.to_html();

        for r in self.refs.drain(..) {
            r.set(None);
        }
        for (index, mounted) in self.nodes.iter().enumerate() {
            for r in mounted.element.refs() {
                r.set(Some(ElementKey(index)));
                self.refs.push(r.clone());
            }
        }

        self.focused = focused_path.and_then(|(path, tag)| {
            self.nodes
                .iter()
                .position(|m| m.path == path && m.element.tag() == tag)
                .map(ElementKey)
        });

        self.order_layers();
        self.run_auto_focus(&previous);
    }

    fn order_layers(&mut self) {
        let current = identities(&self.nodes, DISMISSABLE_LAYER_ATTR);
        let mut layers: Vec<(String, ElementKey)> = std::mem::take(&mut self.layers)
            .into_iter()
            .filter_map(|(identity, _)| {
                let index = current.iter().find(|(id, _)| *id == identity)?.1;
                Some((identity, ElementKey(index)))
            })
            .collect();
        for (identity, index) in current {
            if !layers.iter().any(|(id, _)| *id == identity) {
                layers.push((identity, ElementKey(index)));
            }
        }
        self.layers = layers;
    }

    fn run_auto_focus(&mut self, previous: &[Mounted]) {
        let old_scopes = identities(previous, FOCUS_SCOPE_ATTR);
        let new_scopes = identities(&self.nodes, FOCUS_SCOPE_ATTR);

        for (identity, index) in &old_scopes {
            if new_scopes.iter().any(|(id, _)| id == identity) {
                continue;
            }
            let event = UiEvent::new(EventKind::UnmountAutoFocus);
            if let Some(handler) = previous[*index].element.handler(EventKind::UnmountAutoFocus) {
                handler(&event);
            }
            if let Some(key) = event.focus_request() {
                self.focused = Some(key);
            } else if !event.is_default_prevented() {
                self.focused = None;
            }
        }

        for (identity, index) in &new_scopes {
            if old_scopes.iter().any(|(id, _)| id == identity) {
                continue;
            }
            let scope = ElementKey(*index);
            let event = UiEvent::new(EventKind::MountAutoFocus).with_target_path(vec![scope]);
            if let Some(handler) = self.nodes[*index].element.handler(EventKind::MountAutoFocus) {
                handler(&event);
            }
            if let Some(key) = event.focus_request() {
                self.focused = Some(key);
            } else if !event.is_default_prevented()
                && !self.focused.is_some_and(|f| self.contains(scope, f))
            {
                self.focused = self
                    .focusable_within(Some(scope))
                    .first()
                    .copied()
                    .or(Some(scope));
            }
        }
    }

    /// HTML of the mounted tree.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Number of mounted elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mounted element (without children).
    #[must_use]
    pub fn element(&self, key: ElementKey) -> Option<&Element> {
        self.nodes.get(key.index()).map(|m| &m.element)
    }

    /// Text content of an element's subtree.
    #[must_use]
    pub fn text(&self, key: ElementKey) -> Option<&str> {
        self.nodes.get(key.index()).map(|m| m.text.as_str())
    }

    #[must_use]
    pub fn parent(&self, key: ElementKey) -> Option<ElementKey> {
        self.nodes.get(key.index()).and_then(|m| m.parent)
    }

    #[must_use]
    pub fn children(&self, key: ElementKey) -> &[ElementKey] {
        self.nodes
            .get(key.index())
            .map_or(&[], |m| m.children.as_slice())
    }

    /// First element in document order matching `pred`.
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<ElementKey> {
        self.nodes
            .iter()
            .position(|m| pred(&m.element))
            .map(ElementKey)
    }

    /// Every element matching `pred`, in document order.
    pub fn find_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<ElementKey> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, m)| pred(&m.element))
            .map(|(i, _)| ElementKey(i))
            .collect()
    }

    /// Element whose `id` attribute is `id`.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<ElementKey> {
        self.find(|el| el.get_attr("id") == Some(id))
    }

    /// Whether `key` is `ancestor` or lies inside it.
    #[must_use]
    pub fn contains(&self, ancestor: ElementKey, key: ElementKey) -> bool {
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn path_to_root(&self, key: ElementKey) -> Vec<ElementKey> {
        let mut path = Vec::new();
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.parent(current);
        }
        path
    }

    /// Currently focused element.
    #[must_use]
    pub fn focused(&self) -> Option<ElementKey> {
        self.focused
    }

    /// Move focus to `key`. Refused when `key` is not focusable or a trapped
    /// scope would be escaped.
    pub fn focus(&mut self, key: ElementKey) -> bool {
        if !self.is_focusable(key) {
            return false;
        }
        if let Some(trap) = self.topmost_trap()
            && !self.contains(trap, key)
        {
            return false;
        }
        self.focused = Some(key);
        true
    }

    /// Dispatch `event` at `target`, bubbling to the root.
    pub fn dispatch(&self, target: ElementKey, event: UiEvent) -> UiEvent {
        if target.index() >= self.nodes.len() {
            return event;
        }
        let path = self.path_to_root(target);
        let event = event.with_target_path(path.clone());
        for key in path {
            if let Some(handler) = self.nodes[key.index()].element.handler(event.kind()) {
                handler(&event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event
    }

    /// Press and release the primary button on `key`.
    ///
    /// Returns `false` when the click was not delivered (disabled target or
    /// swallowed by a modal layer).
    pub fn click(&mut self, key: ElementKey) -> bool {
        if self.is_disabled(key) {
            return false;
        }
        if !self.pointer_down(key, PointerButton::Primary, Modifiers::empty()) {
            return false;
        }
        if self.is_focusable(key) {
            self.focus(key);
        }
        self.dispatch(key, UiEvent::new(EventKind::Click));
        true
    }

    /// Pointer press on `key`; returns whether the press reached the target.
    pub fn pointer_down(
        &mut self,
        key: ElementKey,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> bool {
        if key.index() >= self.nodes.len() {
            return false;
        }
        let event = UiEvent::pointer(EventKind::PointerDown, button, modifiers)
            .with_target_path(self.path_to_root(key));

        if let Some(layer) = self.topmost_layer()
            && !self.contains(layer, key)
        {
            let outside = event.derive(EventKind::PointerDownOutside);
            if let Some(handler) = self.nodes[layer.index()]
                .element
                .handler(EventKind::PointerDownOutside)
            {
                handler(&outside);
            }
            if self.nodes[layer.index()]
                .element
                .has_attr(DISABLE_OUTSIDE_POINTER_ATTR)
            {
                return false;
            }
        }

        self.dispatch(key, event);
        true
    }

    /// Key press delivered to the focused element (or the first element).
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> UiEvent {
        let event = UiEvent::key(key, modifiers);
        let event = match self.focused.or_else(|| (!self.nodes.is_empty()).then_some(ElementKey(0))) {
            Some(target) => self.dispatch(target, event),
            None => event,
        };
        if event.is_default_prevented() {
            return event;
        }

        match key {
            Key::Escape => {
                if let Some(layer) = self.topmost_layer() {
                    let escape = event.derive(EventKind::EscapeKeyDown);
                    if let Some(handler) =
                        self.nodes[layer.index()].element.handler(EventKind::EscapeKeyDown)
                    {
                        handler(&escape);
                    }
                }
            }
            Key::Tab => self.move_focus(modifiers.contains(Modifiers::SHIFT)),
            _ => {}
        }
        event
    }

    /// Signal that an exit animation on `key` finished.
    pub fn animation_end(&self, key: ElementKey) -> UiEvent {
        self.dispatch(key, UiEvent::new(EventKind::AnimationEnd))
    }

    fn move_focus(&mut self, backwards: bool) {
        let scope = self
            .focused
            .and_then(|f| self.nearest_scope(f))
            .or_else(|| self.topmost_trap());
        let mode = scope
            .and_then(|s| self.nodes[s.index()].element.get_attr(FOCUS_SCOPE_ATTR))
            .map(FocusScopeMode::parse)
            .unwrap_or_default();
        let candidates = self.focusable_within(scope);
        if candidates.is_empty() {
            return;
        }

        let current = self
            .focused
            .and_then(|f| candidates.iter().position(|c| *c == f));
        let next = match current {
            None if backwards => candidates.len() - 1,
            None => 0,
            Some(0) if backwards => {
                if mode.looping {
                    candidates.len() - 1
                } else {
                    0
                }
            }
            Some(i) if backwards => i - 1,
            Some(i) if i + 1 == candidates.len() => {
                if mode.looping {
                    0
                } else {
                    i
                }
            }
            Some(i) => i + 1,
        };
        self.focused = Some(candidates[next]);
    }

    fn nearest_scope(&self, key: ElementKey) -> Option<ElementKey> {
        self.path_to_root(key)
            .into_iter()
            .find(|k| self.nodes[k.index()].element.has_attr(FOCUS_SCOPE_ATTR))
    }

    fn topmost_trap(&self) -> Option<ElementKey> {
        self.nodes
            .iter()
            .rposition(|m| {
                m.element
                    .get_attr(FOCUS_SCOPE_ATTR)
                    .is_some_and(|v| FocusScopeMode::parse(v).trapped)
            })
            .map(ElementKey)
    }

    fn topmost_layer(&self) -> Option<ElementKey> {
        self.layers.last().map(|(_, key)| *key)
    }

    /// Focusable elements inside `scope` (or the whole document), in order.
    #[must_use]
    pub fn focusable_within(&self, scope: Option<ElementKey>) -> Vec<ElementKey> {
        (0..self.nodes.len())
            .map(ElementKey)
            .filter(|k| scope.is_none_or(|s| *k != s && self.contains(s, *k)))
            .filter(|k| self.is_focusable(*k))
            .collect()
    }

    fn is_disabled(&self, key: ElementKey) -> bool {
        self.element(key).is_some_and(|el| el.has_attr("disabled"))
    }

    fn is_hidden(&self, key: ElementKey) -> bool {
        self.path_to_root(key)
            .iter()
            .any(|k| self.nodes[k.index()].element.has_attr("hidden"))
    }

    /// Whether `key` can receive focus.
    #[must_use]
    pub fn is_focusable(&self, key: ElementKey) -> bool {
        let Some(el) = self.element(key) else {
            return false;
        };
        let natively = match el.tag() {
            "button" | "input" | "select" | "textarea" => !el.has_attr("disabled"),
            "a" => el.has_attr("href"),
            _ => false,
        };
        let tabbable = el
            .get_attr("tabindex")
            .is_some_and(|t| !t.trim_start().starts_with('-'));
        (natively || tabbable) && !self.is_hidden(key)
    }
}

fn flatten(node: &Node, parent: Option<ElementKey>, path: &[usize], out: &mut Vec<Mounted>) {
    let mut position = 0;
    flatten_into(node, parent, path, &mut position, out);
}

fn flatten_into(
    node: &Node,
    parent: Option<ElementKey>,
    path: &[usize],
    position: &mut usize,
    out: &mut Vec<Mounted>,
) {
    match node {
        Node::Element(el) => {
            let key = ElementKey(out.len());
            let mut own_path = path.to_vec();
            own_path.push(*position);
            *position += 1;
            out.push(Mounted {
                element: el.without_children(),
                text: el.text_content(),
                parent,
                children: Vec::new(),
                path: own_path.clone(),
            });
            if let Some(p) = parent {
                out[p.index()].children.push(key);
            }
            let mut child_position = 0;
            for child in el.child_nodes() {
                flatten_into(child, Some(key), &own_path, &mut child_position, out);
            }
        }
        Node::Fragment(nodes) => {
            for child in nodes {
                flatten_into(child, parent, path, position, out);
            }
        }
        Node::Text(_) | Node::Empty => {}
    }
}

fn identities(nodes: &[Mounted], attr: &str) -> Vec<(String, usize)> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, m)| m.element.has_attr(attr))
        .map(|(index, m)| {
            let identity = match m.element.get_attr("id") {
                Some(id) => format!("#{id}"),
                None => format!("{:?}", m.path),
            };
            (identity, index)
        })
        .collect()
}
