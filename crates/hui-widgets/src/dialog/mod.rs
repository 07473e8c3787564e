#![forbid(unsafe_code)]

//! Dialog: a window overlaid on the page, modal by default.
//!
//! ```text
//! Dialog                  (no element) publishes DialogContextValue
//! ├── DialogTrigger       button aria-haspopup=dialog aria-expanded aria-controls
//! ├── DialogOverlay       div (modal only, while present)
//! └── DialogContent       div role=dialog, focus scope + dismissable layer
//!     ├── DialogTitle       h2 id=title_id
//!     ├── DialogDescription p  id=description_id
//!     └── DialogClose       button
//! ```
//!
//! # Focus Management
//!
//! - **Auto-focus**: opening focuses the first focusable element in the
//!   content (the host's default for a newly mounted focus scope).
//! - **Focus trap**: while open and modal, Tab cycles inside the content and
//!   focus cannot be moved outside.
//! - **Focus restore**: closing returns focus to the trigger. A non-modal
//!   dialog skips this when the user interacted outside it.
//!
//! # Dismissal
//!
//! Escape and pointer presses outside the content request `open = false`.
//! A modal dialog ignores context clicks (secondary button, ctrl + primary)
//! and blocks pointer events behind it. A non-modal dialog ignores presses on
//! its own trigger, which toggles it anyway.
//!
//! # Invariants
//!
//! 1. Parts resolve the nearest dialog of their group, so nested dialogs
//!    never see each other's state.
//! 2. The published node is reused across passes while nothing the parts
//!    read has changed.
//! 3. The label audit runs at most once per content instance.

mod content;
mod overlay;
mod text;
mod trigger;

use hui_a11y::LabelRequirement;
use hui_core::callback::{Callback, ElementRef};
use hui_core::context::{ContextRegistry, Group, Provider};
use hui_core::id::IdSlot;
use hui_core::scope::Scope;

use crate::disclosure::OpenState;
use crate::{Children, Component, RenderResult};

pub use content::DialogContent;
pub use overlay::DialogOverlay;
pub use text::{DialogDescription, DialogTitle};
pub use trigger::{DialogClose, DialogTrigger};

pub const DIALOG: Group = Group::new("Dialog");

pub(crate) const TRIGGER_NAME: &str = "Trigger";
pub(crate) const OVERLAY_NAME: &str = "Overlay";
pub(crate) const CONTENT_NAME: &str = "Content";
pub(crate) const TITLE_NAME: &str = "Title";
pub(crate) const DESCRIPTION_NAME: &str = "Description";
pub(crate) const CLOSE_NAME: &str = "Close";
pub(crate) const LABEL_WARNING_NAME: &str = "LabelWarning";

/// State published by [`Dialog`] to its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogContextValue {
    pub trigger_ref: ElementRef,
    pub content_id: String,
    pub title_id: String,
    pub description_id: String,
    pub open: bool,
    pub on_open_change: Callback<bool>,
    pub on_open_toggle: Callback<()>,
    pub modal: bool,
}

thread_local! {
    static DIALOG_CONTEXT: ContextRegistry<DialogContextValue> = ContextRegistry::new(DIALOG.name());
    static LABEL_WARNING_CONTEXT: ContextRegistry<LabelRequirement> = ContextRegistry::with_default(
        "DialogLabelWarning",
        LabelRequirement::new("DialogContent", "DialogTitle", "dialog"),
    );
}

/// Dialog context registry (thread-local).
#[must_use]
pub fn dialog_context() -> ContextRegistry<DialogContextValue> {
    DIALOG_CONTEXT.with(Clone::clone)
}

/// Names used by the missing-label audit. Has a default, so lookups never fail.
#[must_use]
pub fn label_warning_context() -> ContextRegistry<LabelRequirement> {
    LABEL_WARNING_CONTEXT.with(Clone::clone)
}

/// Dialog root. Renders its children only.
#[derive(Debug)]
pub struct Dialog {
    group: Group,
    modal: bool,
    open: OpenState,
    trigger_ref: ElementRef,
    content_id: IdSlot,
    title_id: IdSlot,
    description_id: IdSlot,
    provider: Provider<DialogContextValue>,
    children: Children,
}

impl Default for Dialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DIALOG,
            modal: true,
            open: OpenState::default(),
            trigger_ref: ElementRef::new(),
            content_id: IdSlot::new(),
            title_id: IdSlot::new(),
            description_id: IdSlot::new(),
            provider: dialog_context().provider(),
            children: Children::new(),
        }
    }

    /// Control the open state from outside.
    #[must_use]
    pub fn open(self, open: bool) -> Self {
        self.open.set_prop(Some(open));
        self
    }

    /// Update (or release with `None`) the controlling prop between passes.
    pub fn set_open(&self, open: Option<bool>) {
        self.open.set_prop(open);
    }

    #[must_use]
    pub fn default_open(mut self, open: bool) -> Self {
        self.open.set_default(open);
        self
    }

    #[must_use]
    pub fn on_open_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.open.set_on_change(Callback::new(f));
        self
    }

    #[must_use]
    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Publish under `group` instead of [`DIALOG`].
    #[must_use]
    pub fn group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }

    /// Current open state.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.live().state.get()
    }

    /// Ref bound to the trigger button once mounted.
    #[must_use]
    pub fn trigger_ref(&self) -> &ElementRef {
        &self.trigger_ref
    }
}

crate::child_builders!(Dialog);

impl Component for Dialog {
    fn render(&self, cx: &Scope) -> RenderResult {
        let _span = tracing::debug_span!("widget_render", widget = self.group.name()).entered();
        let live = self.open.live();
        let value = DialogContextValue {
            trigger_ref: self.trigger_ref.clone(),
            content_id: self.content_id.get(cx, None)?,
            title_id: self.title_id.get(cx, None)?,
            description_id: self.description_id.get(cx, None)?,
            open: live.state.get(),
            on_open_change: live.on_open_change.clone(),
            on_open_toggle: live.on_open_toggle.clone(),
            modal: self.modal,
        };
        let inner = self.provider.publish(cx, self.group, value);
        self.children.render_fragment(&inner)
    }
}
