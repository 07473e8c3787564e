#![forbid(unsafe_code)]

//! Host events delivered to markup handlers.
//!
//! Events are preventable and stoppable. Handlers see the full target path
//! so they can tell whether an interaction happened inside a given element.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::document::ElementKey;

/// Kinds of events a markup element can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Primary activation (click / tap / Enter on a button).
    Click,
    /// Key pressed while focus is inside the element.
    KeyDown,
    /// Pointer pressed on the element.
    PointerDown,
    /// Pointer pressed outside a dismissable layer.
    PointerDownOutside,
    /// Escape pressed while the element is the topmost dismissable layer.
    EscapeKeyDown,
    /// A focus scope mounted; default action focuses its first focusable.
    MountAutoFocus,
    /// A focus scope unmounted; default action clears focus.
    UnmountAutoFocus,
    /// An exit animation on the element finished.
    AnimationEnd,
}

bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    Char(char),
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

/// A dispatched event.
pub struct UiEvent {
    kind: EventKind,
    key: Option<Key>,
    modifiers: Modifiers,
    button: Option<PointerButton>,
    target_path: Vec<ElementKey>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    focus_request: Cell<Option<ElementKey>>,
}

impl UiEvent {
    /// Create an event of `kind` with no payload.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            modifiers: Modifiers::empty(),
            button: None,
            target_path: Vec::new(),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            focus_request: Cell::new(None),
        }
    }

    /// Keyboard event.
    #[must_use]
    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        let mut event = Self::new(EventKind::KeyDown);
        event.key = Some(key);
        event.modifiers = modifiers;
        event
    }

    /// Pointer event of `kind`.
    #[must_use]
    pub fn pointer(kind: EventKind, button: PointerButton, modifiers: Modifiers) -> Self {
        let mut event = Self::new(kind);
        event.button = Some(button);
        event.modifiers = modifiers;
        event
    }

    /// Copy of this event retargeted as `kind`, keeping key, pointer and path.
    #[must_use]
    pub fn derive(&self, kind: EventKind) -> Self {
        let mut event = Self::new(kind);
        event.key = self.key;
        event.modifiers = self.modifiers;
        event.button = self.button;
        event.target_path = self.target_path.clone();
        event
    }

    /// Set the target path (target first, then its ancestors).
    #[must_use]
    pub fn with_target_path(mut self, path: Vec<ElementKey>) -> Self {
        self.target_path = path;
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn key_code(&self) -> Option<Key> {
        self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn button(&self) -> Option<PointerButton> {
        self.button
    }

    /// Element the event was aimed at.
    #[must_use]
    pub fn target(&self) -> Option<ElementKey> {
        self.target_path.first().copied()
    }

    /// Whether the target is `key` or one of its descendants.
    #[must_use]
    pub fn target_is_within(&self, key: ElementKey) -> bool {
        self.target_path.contains(&key)
    }

    /// Secondary button, or ctrl + primary (macOS context click).
    #[must_use]
    pub fn is_context_click(&self) -> bool {
        match self.button {
            Some(PointerButton::Secondary) => true,
            Some(PointerButton::Primary) => self.modifiers.contains(Modifiers::CTRL),
            _ => false,
        }
    }

    /// Cancel the host's default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop bubbling to ancestors.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Ask the host to move focus to `key` once dispatch finishes.
    pub fn request_focus(&self, key: ElementKey) {
        self.focus_request.set(Some(key));
    }

    #[must_use]
    pub fn focus_request(&self) -> Option<ElementKey> {
        self.focus_request.get()
    }
}

impl fmt::Debug for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiEvent")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("modifiers", &self.modifiers)
            .field("button", &self.button)
            .field("target", &self.target())
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}

/// Event handler attached to a markup element.
pub type Handler = Rc<dyn Fn(&UiEvent)>;

/// Wrap a closure as a [`Handler`].
pub fn handler(f: impl Fn(&UiEvent) + 'static) -> Handler {
    Rc::new(f)
}

/// Run `user` first, then `ours` unless the user prevented the default.
#[must_use]
pub fn compose_handlers(user: Option<Handler>, ours: Handler) -> Handler {
    match user {
        None => ours,
        Some(user) => Rc::new(move |event: &UiEvent| {
            user(event);
            if !event.is_default_prevented() {
                ours(event);
            }
        }),
    }
}
