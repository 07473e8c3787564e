#![forbid(unsafe_code)]

//! The dialog window: focus scope, dismissable layer and label audit.
//!
//! # Failure Modes
//!
//! | Scenario | Behavior |
//! |----------|----------|
//! | Rendered outside a dialog | `MissingContext` (`Content must be used within Dialog`) |
//! | No title and no `aria-label` | One `warn!` each time the content mounts (diagnostics on) |
//! | Trigger never mounted | Closing leaves focus where the host put it |

use std::cell::Cell;
use std::rc::Rc;

use hui_a11y::{Role, audit_label, open_state};
use hui_core::config::DiagnosticsConfig;
use hui_core::context::Group;
use hui_core::document::{
    DISABLE_OUTSIDE_POINTER_ATTR, DISMISSABLE_LAYER_ATTR, FOCUS_SCOPE_ATTR, FocusScopeMode,
};
use hui_core::error::MissingContext;
use hui_core::event::{EventKind, handler};
use hui_core::markup::{Element, Node};
use hui_core::scope::Scope;

use super::{
    CONTENT_NAME, DIALOG, DialogContextValue, LABEL_WARNING_NAME, dialog_context,
    label_warning_context,
};
use crate::presence::Presence;
use crate::{Children, Component, PartProps, RenderResult};

/// `div role=dialog`, present while open (or forced, or animating out).
#[derive(Debug)]
pub struct DialogContent {
    group: Group,
    force_mount: bool,
    presence: Presence,
    props: PartProps,
    /// Overrides from a wrapping widget, applied beneath caller props.
    pub(crate) wrapper: PartProps,
    children: Children,
    interacted_outside: Rc<Cell<bool>>,
    label_checked: Cell<bool>,
}

impl Default for DialogContent {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogContent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: DIALOG,
            force_mount: false,
            presence: Presence::new(),
            props: PartProps::new(),
            wrapper: PartProps::new(),
            children: Children::new(),
            interacted_outside: Rc::new(Cell::new(false)),
            label_checked: Cell::new(false),
        }
    }

    /// Keep the content mounted while closed.
    #[must_use]
    pub fn force_mount(mut self, force: bool) -> Self {
        self.force_mount = force;
        self
    }

    /// Stay mounted after closing until the host reports `AnimationEnd`.
    #[must_use]
    pub fn exit_animation(self, animated: bool) -> Self {
        self.presence.set_exit_animation(animated);
        self
    }

    fn dismiss_handlers(&self, context: &DialogContextValue, el: Element) -> Element {
        let close = context.on_open_change.clone();
        let el = el.on(EventKind::EscapeKeyDown, handler(move |_| close.call(false)));

        let close = context.on_open_change.clone();
        let trigger = context.trigger_ref.clone();
        if context.modal {
            el.on(
                EventKind::PointerDownOutside,
                handler(move |event| {
                    if event.is_context_click() {
                        event.prevent_default();
                    } else {
                        close.call(false);
                    }
                }),
            )
            .on(
                EventKind::UnmountAutoFocus,
                handler(move |event| {
                    event.prevent_default();
                    if let Some(key) = trigger.get() {
                        event.request_focus(key);
                    }
                }),
            )
        } else {
            let interacted = Rc::clone(&self.interacted_outside);
            let on_outside = {
                let trigger = trigger.clone();
                handler(move |event| {
                    interacted.set(true);
                    // The trigger toggles on its own click.
                    if trigger.get().is_some_and(|key| event.target_is_within(key)) {
                        event.prevent_default();
                    } else {
                        close.call(false);
                    }
                })
            };
            let interacted = Rc::clone(&self.interacted_outside);
            el.on(EventKind::PointerDownOutside, on_outside).on(
                EventKind::UnmountAutoFocus,
                handler(move |event| {
                    if !interacted.get()
                        && let Some(key) = trigger.get()
                    {
                        event.request_focus(key);
                    }
                    event.prevent_default();
                    interacted.set(false);
                }),
            )
        }
    }

    fn check_label(&self, cx: &Scope, el: &Element) -> Result<(), MissingContext> {
        if !DiagnosticsConfig::global().label_warnings || self.label_checked.replace(true) {
            return Ok(());
        }
        let names = label_warning_context().lookup(cx, self.group, Some(LABEL_WARNING_NAME))?;
        if let Some(warning) = audit_label(el, &names) {
            tracing::warn!(target: "hui::a11y", content = warning.content_name(), "{warning}");
        }
        Ok(())
    }
}

crate::part_builders!(DialogContent, group);
crate::child_builders!(DialogContent);

impl Component for DialogContent {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = dialog_context().lookup(cx, self.group, Some(CONTENT_NAME))?;
        let was_present = self.presence.is_present();
        if !self.presence.update(self.force_mount || context.open) {
            return Ok(Node::Empty);
        }
        if !was_present {
            self.interacted_outside.set(false);
            self.label_checked.set(false);
        }

        let focus_scope = FocusScopeMode {
            looping: true,
            trapped: context.modal && context.open,
        };
        let el = Element::new("div")
            .attr("role", Role::Dialog.as_str())
            .attr("id", context.content_id.clone())
            .attr("aria-describedby", context.description_id.clone())
            .attr("aria-labelledby", context.title_id.clone())
            .attr("data-state", open_state(context.open))
            .attr(FOCUS_SCOPE_ATTR, focus_scope.attr_value())
            .flag(DISMISSABLE_LAYER_ATTR, true)
            .attr_opt("aria-modal", context.modal.then_some("true"))
            .flag(DISABLE_OUTSIDE_POINTER_ATTR, context.modal)
            .children(self.children.render(cx)?);
        let el = self.dismiss_handlers(&context, el);

        let mut el = self.props.apply(self.wrapper.apply(self.presence.attach(el)));
        let has_label = el.get_attr("aria-label").is_some_and(|l| !l.trim().is_empty());
        if has_label && self.props.attr("aria-labelledby").is_none() {
            el.remove_attr("aria-labelledby");
        }

        self.check_label(cx, &el)?;
        Ok(el.into())
    }
}
