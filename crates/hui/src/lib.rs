#![forbid(unsafe_code)]

//! hui: headless, accessible UI primitives.
//!
//! Widgets are trees of persistent part structs rendered with an explicit
//! [`Scope`](core::Scope). Roots publish instance state through scoped,
//! group-tagged context registries; parts resolve the nearest context of
//! their own group, so nested and interleaved widgets never see each other's
//! state. The output is a markup tree with ARIA attributes and event
//! handlers, mountable into the headless [`Document`](core::Document).
//!
//! ```ignore
//! use hui::prelude::*;
//!
//! let dialog = Dialog::new()
//!     .child(DialogTrigger::new().child("Open"))
//!     .child(
//!         DialogContent::new()
//!             .child(DialogTitle::new().child("Edit profile"))
//!             .child(DialogClose::new().child("Close")),
//!     );
//! let root = IdProvider::new().child(dialog);
//! let mut document = Document::new();
//! document.mount(&root.render(&Scope::root())?);
//! ```

pub use hui_a11y as a11y;
pub use hui_core as core;
pub use hui_widgets as widgets;

pub use hui_core::{
    ContextRegistry, DiagnosticsConfig, Document, Group, MissingContext, Node, Provider, Scope,
};
pub use hui_widgets::{Component, RenderResult};

/// Everything needed to build and render widget trees.
pub mod prelude {
    pub use hui_core::{
        Callback, ContextRegistry, DiagnosticsConfig, Document, Element, ElementKey, ElementRef,
        EventKind, Group, Key, MissingContext, Modifiers, Node, PointerButton, Provider, Scope,
        UiEvent,
    };
    pub use hui_widgets::{
        AccessibleIcon, AlertDialog, AlertDialogAction, AlertDialogCancel, AlertDialogContent,
        AlertDialogDescription, AlertDialogOverlay, AlertDialogTitle, AlertDialogTrigger, Avatar,
        AvatarFallback, AvatarImage, Children, Collapsible, CollapsibleContent, CollapsibleTrigger,
        Component, Dialog, DialogClose, DialogContent, DialogDescription, DialogOverlay, DialogTitle,
        DialogTrigger, IdProvider, ImageLoader, ImageLoadingStatus, PartProps, Presence, Primitive,
        RenderResult, VisuallyHidden, render_fn,
    };

    #[cfg(feature = "tracing-json")]
    pub use hui_core::logging::init_json_logging;
}
