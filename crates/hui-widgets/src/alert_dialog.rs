#![forbid(unsafe_code)]

//! Alert dialog: a modal dialog that interrupts the user and expects a
//! response.
//!
//! Every part is a dialog part bound to the [`ALERT_DIALOG`] group, so an
//! alert dialog nested inside a dialog (or the reverse) resolves its own
//! root. The content additionally:
//!
//! - uses `role=alertdialog`;
//! - never dismisses on an outside pointer press (Escape still closes);
//! - moves focus to [`AlertDialogCancel`] when it opens;
//! - reports a missing description once per mount when diagnostics are on.

use std::cell::Cell;

use hui_a11y::{LabelRequirement, Role, audit_description};
use hui_core::callback::ElementRef;
use hui_core::config::DiagnosticsConfig;
use hui_core::context::{ContextRegistry, Group, Provider};
use hui_core::event::{EventKind, UiEvent, handler};
use hui_core::scope::Scope;

use crate::dialog::{
    Dialog, DialogClose, DialogContent, DialogDescription, DialogOverlay, DialogTitle,
    DialogTrigger, label_warning_context,
};
use crate::{Component, RenderResult};

pub const ALERT_DIALOG: Group = Group::new("AlertDialog");

const CANCEL_NAME: &str = "Cancel";
const CONTENT_DISPLAY_NAME: &str = "AlertDialogContent";
const DESCRIPTION_DISPLAY_NAME: &str = "AlertDialogDescription";
const DOCS_SLUG: &str = "alert-dialog";

const LABEL_NAMES: LabelRequirement =
    LabelRequirement::new(CONTENT_DISPLAY_NAME, "AlertDialogTitle", DOCS_SLUG);

/// Published by [`AlertDialogContent`] for its cancel button.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDialogContentValue {
    pub cancel_ref: ElementRef,
}

thread_local! {
    static CONTENT_CONTEXT: ContextRegistry<AlertDialogContentValue> =
        ContextRegistry::new(CONTENT_DISPLAY_NAME);
}

/// Alert dialog content registry (thread-local).
#[must_use]
pub fn alert_dialog_content_context() -> ContextRegistry<AlertDialogContentValue> {
    CONTENT_CONTEXT.with(Clone::clone)
}

/// Alert dialog root. Always modal.
#[derive(Debug)]
pub struct AlertDialog(Dialog);

impl Default for AlertDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertDialog {
    #[must_use]
    pub fn new() -> Self {
        Self(Dialog::new().group(ALERT_DIALOG).modal(true))
    }

    #[must_use]
    pub fn open(self, open: bool) -> Self {
        Self(self.0.open(open))
    }

    pub fn set_open(&self, open: Option<bool>) {
        self.0.set_open(open);
    }

    #[must_use]
    pub fn default_open(self, open: bool) -> Self {
        Self(self.0.default_open(open))
    }

    #[must_use]
    pub fn on_open_change(self, f: impl Fn(bool) + 'static) -> Self {
        Self(self.0.on_open_change(f))
    }

    #[must_use]
    pub fn group(self, group: Group) -> Self {
        Self(self.0.group(group))
    }

    #[must_use]
    pub fn child(self, child: impl Component + 'static) -> Self {
        Self(self.0.child(child))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.0.is_open()
    }

    #[must_use]
    pub fn trigger_ref(&self) -> &ElementRef {
        self.0.trigger_ref()
    }
}

impl Component for AlertDialog {
    fn render(&self, cx: &Scope) -> RenderResult {
        self.0.render(cx)
    }
}

/// Newtype over a dialog part that resolves the alert dialog group.
macro_rules! alert_part {
    ($(#[$meta:meta])* $name:ident => $inner:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name($inner);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self($inner::new().group(ALERT_DIALOG))
            }

            #[must_use]
            pub fn group(self, group: Group) -> Self {
                Self(self.0.group(group))
            }

            #[must_use]
            pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
                Self(self.0.attr(name, value))
            }

            #[must_use]
            pub fn on(self, kind: EventKind, handler: impl Fn(&UiEvent) + 'static) -> Self {
                Self(self.0.on(kind, handler))
            }

            #[must_use]
            pub fn node_ref(self, r: ElementRef) -> Self {
                Self(self.0.node_ref(r))
            }

            #[must_use]
            pub fn child(self, child: impl Component + 'static) -> Self {
                Self(self.0.child(child))
            }
        }

        impl Component for $name {
            fn render(&self, cx: &Scope) -> RenderResult {
                self.0.render(cx)
            }
        }
    };
}

alert_part!(
    /// Opens the alert dialog.
    AlertDialogTrigger => DialogTrigger
);
alert_part!(
    /// Backdrop behind the alert dialog.
    AlertDialogOverlay => DialogOverlay
);
alert_part!(AlertDialogTitle => DialogTitle);
alert_part!(AlertDialogDescription => DialogDescription);
alert_part!(
    /// Confirms and closes.
    AlertDialogAction => DialogClose
);

impl AlertDialogOverlay {
    #[must_use]
    pub fn force_mount(self, force: bool) -> Self {
        Self(self.0.force_mount(force))
    }

    #[must_use]
    pub fn exit_animation(self, animated: bool) -> Self {
        Self(self.0.exit_animation(animated))
    }
}

/// `div role=alertdialog`.
#[derive(Debug)]
pub struct AlertDialogContent {
    group: Group,
    content: DialogContent,
    cancel_ref: ElementRef,
    provider: Provider<AlertDialogContentValue>,
    labels: Provider<LabelRequirement>,
    description_checked: Cell<bool>,
}

impl Default for AlertDialogContent {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertDialogContent {
    #[must_use]
    pub fn new() -> Self {
        let cancel_ref = ElementRef::new();
        let mut content = DialogContent::new().group(ALERT_DIALOG);
        content.wrapper.set_attr("role", Role::AlertDialog.as_str());
        let cancel = cancel_ref.clone();
        content.wrapper.add_handler(
            EventKind::MountAutoFocus,
            handler(move |event| {
                event.prevent_default();
                if let Some(key) = cancel.get() {
                    event.request_focus(key);
                }
            }),
        );
        content
            .wrapper
            .add_handler(EventKind::PointerDownOutside, handler(UiEvent::prevent_default));
        Self {
            group: ALERT_DIALOG,
            content,
            cancel_ref,
            provider: alert_dialog_content_context().provider(),
            labels: label_warning_context().provider(),
            description_checked: Cell::new(false),
        }
    }

    #[must_use]
    pub fn group(mut self, group: Group) -> Self {
        self.group = group;
        self.content = self.content.group(group);
        self
    }

    #[must_use]
    pub fn force_mount(mut self, force: bool) -> Self {
        self.content = self.content.force_mount(force);
        self
    }

    #[must_use]
    pub fn exit_animation(mut self, animated: bool) -> Self {
        self.content = self.content.exit_animation(animated);
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.content = self.content.attr(name, value);
        self
    }

    #[must_use]
    pub fn on(mut self, kind: EventKind, handler: impl Fn(&UiEvent) + 'static) -> Self {
        self.content = self.content.on(kind, handler);
        self
    }

    #[must_use]
    pub fn node_ref(mut self, r: ElementRef) -> Self {
        self.content = self.content.node_ref(r);
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Component + 'static) -> Self {
        self.content = self.content.child(child);
        self
    }

    /// Ref bound to the cancel button once mounted.
    #[must_use]
    pub fn cancel_ref(&self) -> &ElementRef {
        &self.cancel_ref
    }
}

impl Component for AlertDialogContent {
    fn render(&self, cx: &Scope) -> RenderResult {
        let cx = self.labels.publish(cx, self.group, LABEL_NAMES);
        let cx = self.provider.publish(
            &cx,
            self.group,
            AlertDialogContentValue {
                cancel_ref: self.cancel_ref.clone(),
            },
        );
        let node = self.content.render(&cx)?;
        if node.is_empty() {
            self.description_checked.set(false);
        }
        if let Some(el) = node.as_element()
            && DiagnosticsConfig::global().description_warnings
            && !self.description_checked.replace(true)
            && let Some(warning) =
                audit_description(el, CONTENT_DISPLAY_NAME, DESCRIPTION_DISPLAY_NAME, DOCS_SLUG)
        {
            tracing::warn!(target: "hui::a11y", content = warning.content_name(), "{warning}");
        }
        Ok(node)
    }
}

/// Closes without confirming. Receives focus when the alert dialog opens.
#[derive(Debug)]
pub struct AlertDialogCancel {
    group: Group,
    close: DialogClose,
}

impl Default for AlertDialogCancel {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertDialogCancel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: ALERT_DIALOG,
            close: DialogClose::new().group(ALERT_DIALOG),
        }
    }

    #[must_use]
    pub fn group(mut self, group: Group) -> Self {
        self.group = group;
        self.close = self.close.group(group);
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.close = self.close.attr(name, value);
        self
    }

    #[must_use]
    pub fn on(mut self, kind: EventKind, handler: impl Fn(&UiEvent) + 'static) -> Self {
        self.close = self.close.on(kind, handler);
        self
    }

    #[must_use]
    pub fn node_ref(mut self, r: ElementRef) -> Self {
        self.close = self.close.node_ref(r);
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Component + 'static) -> Self {
        self.close = self.close.child(child);
        self
    }
}

impl Component for AlertDialogCancel {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = alert_dialog_content_context().lookup(cx, self.group, Some(CANCEL_NAME))?;
        let cancel_ref = context.cancel_ref.clone();
        Ok(self.close.render(cx)?.map_element(|el| el.node_ref(cancel_ref)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{DIALOG, dialog_context};
    use crate::test_support::capture_warnings;
    use hui_core::markup::{Element, Node};

    fn content_of(node: &Node) -> Element {
        node.find(&|el| el.get_attr("role") == Some("alertdialog"))
            .unwrap()
            .clone()
    }

    fn quiet() -> hui_core::config::DiagnosticsOverride {
        DiagnosticsConfig::enabled(false).push_override()
    }

    #[test]
    fn publishes_under_alert_group_on_dialog_channel() {
        let root = AlertDialog::new().child(crate::render_fn(|cx| {
            assert!(dialog_context().lookup(cx, DIALOG, None).is_err());
            let node = dialog_context().lookup(cx, ALERT_DIALOG, None)?;
            assert!(node.modal);
            Ok(Node::Empty)
        }));
        root.render(&Scope::root()).unwrap();
    }

    #[test]
    fn content_is_alertdialog_and_ignores_outside_press() {
        let _quiet = quiet();
        let root = AlertDialog::new().default_open(true).child(AlertDialogContent::new());
        let el = content_of(&root.render(&Scope::root()).unwrap());
        assert_eq!(el.get_attr("aria-modal"), Some("true"));

        let outside = UiEvent::new(EventKind::PointerDownOutside);
        el.handler(EventKind::PointerDownOutside).unwrap()(&outside);
        assert!(outside.is_default_prevented());
        assert!(root.is_open());

        el.handler(EventKind::EscapeKeyDown).unwrap()(&UiEvent::new(EventKind::EscapeKeyDown));
        assert!(!root.is_open());
    }

    #[test]
    fn cancel_binds_ref_and_closes() {
        let _quiet = quiet();
        let content = std::rc::Rc::new(AlertDialogContent::new().child(AlertDialogCancel::new().child("No")));
        let root = AlertDialog::new()
            .default_open(true)
            .child(std::rc::Rc::clone(&content));
        let node = root.render(&Scope::root()).unwrap();
        let cancel = node.find(&|el| el.tag() == "button").unwrap();
        assert!(cancel.refs().contains(content.cancel_ref()));

        cancel.handler(EventKind::Click).unwrap()(&UiEvent::new(EventKind::Click));
        assert!(!root.is_open());
    }

    #[test]
    fn cancel_outside_content_fails() {
        let root = AlertDialog::new().child(AlertDialogCancel::new());
        let err = root.render(&Scope::root()).unwrap_err();
        assert_eq!(err.to_string(), "Cancel must be used within AlertDialogContent");
    }

    #[test]
    fn missing_title_and_description_warn_once_with_alert_names() {
        let _diagnostics = DiagnosticsConfig::enabled(true).push_override();
        let root = AlertDialog::new().default_open(true).child(AlertDialogContent::new());
        let warnings = capture_warnings(|| {
            root.render(&Scope::root()).unwrap();
            root.render(&Scope::root()).unwrap();
        });
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("`AlertDialogContent` requires a label"));
        assert!(warnings[0].contains("`AlertDialogTitle`"));
        assert!(warnings[1].starts_with("`AlertDialogContent` requires a description"));
    }

    #[test]
    fn description_audit_waits_for_diagnostics_and_reruns_on_remount() {
        let root = AlertDialog::new().default_open(true).child(
            AlertDialogContent::new().child(AlertDialogTitle::new().child("Delete?")),
        );
        {
            let _quiet = quiet();
            root.render(&Scope::root()).unwrap();
        }

        let _diagnostics = DiagnosticsConfig::enabled(true).push_override();
        let warnings = capture_warnings(|| {
            root.render(&Scope::root()).unwrap();
            root.render(&Scope::root()).unwrap();
            root.set_open(Some(false));
            root.render(&Scope::root()).unwrap();
            root.set_open(Some(true));
            root.render(&Scope::root()).unwrap();
        });
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.starts_with("`AlertDialogContent` requires a description")));
    }

    #[test]
    fn labelled_and_described_content_is_quiet() {
        let _diagnostics = DiagnosticsConfig::enabled(true).push_override();
        let root = AlertDialog::new().default_open(true).child(
            AlertDialogContent::new()
                .child(AlertDialogTitle::new().child("Delete?"))
                .child(AlertDialogDescription::new().child("This cannot be undone.")),
        );
        let warnings = capture_warnings(|| {
            root.render(&Scope::root()).unwrap();
        });
        assert!(warnings.is_empty());
    }

    #[test]
    fn plain_dialog_warning_uses_dialog_names() {
        let _diagnostics = DiagnosticsConfig::enabled(true).push_override();
        let root = Dialog::new().default_open(true).child(DialogContent::new());
        let warnings = capture_warnings(|| {
            root.render(&Scope::root()).unwrap();
        });
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("`DialogContent` requires a label"));
        assert!(warnings[0].contains("`dialog`"));
    }
}
