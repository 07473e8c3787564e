#![forbid(unsafe_code)]

//! Core primitives for hui headless widgets.
//!
//! Render calls thread a [`Scope`] down the tree. Providers publish typed,
//! group-tagged context nodes into it through a [`ContextRegistry`]; parts
//! look up the nearest node of the group they belong to. Rendering produces
//! a [`Node`] tree that the headless [`Document`] mounts and drives (focus,
//! dismissal, auto-focus).

pub mod callback;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod event;
pub mod id;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod markup;
pub mod reactive;
pub mod scope;

pub use callback::{Callback, ElementRef};
pub use config::DiagnosticsConfig;
pub use context::{ContextNode, ContextRegistry, Group, NodeMemo, Provider};
pub use document::{Document, ElementKey};
pub use error::MissingContext;
pub use event::{
    EventKind, Handler, Key, Modifiers, PointerButton, UiEvent, compose_handlers, handler,
};
pub use id::{IdProviderState, IdSlot, generate_id};
pub use markup::{Element, Node};
pub use reactive::{ControllableState, Observable, Subscription};
pub use scope::Scope;
