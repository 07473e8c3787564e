#![forbid(unsafe_code)]

//! Test harness for hui widget trees.
//!
//! [`Harness`] owns a component tree, renders it under a root id provider,
//! and mounts the result into a headless [`Document`]. Every interaction
//! (click, key press, pointer press, animation end) is followed by a fresh
//! render and mount, the way a UI runtime re-renders after state changes.
//!
//! Snapshot assertions compare rendered HTML against files under
//! `tests/snapshots/`. Run `BLESS=1 cargo test --package hui-harness` to
//! create or update them.
//!
//! # Example
//!
//! ```ignore
//! let mut h = Harness::mount(
//!     Dialog::new()
//!         .child(DialogTrigger::new().child("Open"))
//!         .child(DialogContent::new().child(DialogTitle::new().child("Hi"))),
//! )?;
//! h.click_text("Open")?;
//! assert!(h.by_role("dialog").is_some());
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;

use hui_core::document::{Document, ElementKey};
use hui_core::error::MissingContext;
use hui_core::event::{Key, Modifiers, PointerButton, UiEvent};
use hui_core::markup::{Element, Node};
use hui_core::scope::Scope;
use hui_widgets::{Component, IdProvider};

/// A mounted component tree driven like a browser page.
pub struct Harness {
    root: IdProvider,
    document: Document,
    last: Node,
    renders: usize,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("html", &self.document.html())
            .field("focused", &self.document.focused())
            .field("renders", &self.renders)
            .finish()
    }
}

impl Harness {
    /// Render and mount `root`.
    pub fn mount(root: impl Component + 'static) -> Result<Self, MissingContext> {
        Self::mount_shared(Rc::new(root))
    }

    /// Render and mount a component the caller keeps a handle to.
    pub fn mount_shared(root: Rc<dyn Component>) -> Result<Self, MissingContext> {
        let mut harness = Self {
            root: IdProvider::new().child_shared(root),
            document: Document::new(),
            last: Node::Empty,
            renders: 0,
        };
        harness.rerender()?;
        Ok(harness)
    }

    /// Render the tree again and mount the result.
    pub fn rerender(&mut self) -> Result<(), MissingContext> {
        let node = self.root.render(&Scope::root())?;
        self.document.mount(&node);
        self.last = node;
        self.renders += 1;
        tracing::debug!(renders = self.renders, elements = self.document.len(), "harness mounted");
        Ok(())
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Tree produced by the last render.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.last
    }

    #[must_use]
    pub fn html(&self) -> &str {
        self.document.html()
    }

    /// Number of render passes so far.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }

    #[must_use]
    pub fn element(&self, key: ElementKey) -> Option<&Element> {
        self.document.element(key)
    }

    #[must_use]
    pub fn attr(&self, key: ElementKey, name: &str) -> Option<&str> {
        self.document.element(key).and_then(|el| el.get_attr(name))
    }

    #[must_use]
    pub fn focused(&self) -> Option<ElementKey> {
        self.document.focused()
    }

    /// Text content of the focused element.
    #[must_use]
    pub fn focused_text(&self) -> Option<&str> {
        self.focused().and_then(|key| self.document.text(key))
    }

    /// Innermost element whose text content is exactly `text`.
    #[must_use]
    pub fn by_text(&self, text: &str) -> Option<ElementKey> {
        let matches = |key: ElementKey| self.document.text(key) == Some(text);
        self.document
            .find_all(|_| true)
            .into_iter()
            .filter(|key| matches(*key))
            .find(|key| !self.document.children(*key).iter().any(|c| matches(*c)))
    }

    /// First element with the explicit or implicit ARIA `role`.
    #[must_use]
    pub fn by_role(&self, role: &str) -> Option<ElementKey> {
        self.all_by_role(role).into_iter().next()
    }

    /// Every element with the explicit or implicit ARIA `role`.
    #[must_use]
    pub fn all_by_role(&self, role: &str) -> Vec<ElementKey> {
        self.document.find_all(|el| implicit_role(el) == Some(role))
    }

    #[must_use]
    pub fn by_attr(&self, name: &str, value: &str) -> Option<ElementKey> {
        self.document.find(|el| el.get_attr(name) == Some(value))
    }

    pub fn focus(&mut self, key: ElementKey) -> bool {
        self.document.focus(key)
    }

    /// Click `key`, then re-render. Returns whether the click was delivered.
    pub fn click(&mut self, key: ElementKey) -> Result<bool, MissingContext> {
        let delivered = self.document.click(key);
        self.rerender()?;
        Ok(delivered)
    }

    /// Click the element found by [`Harness::by_text`]. Returns `false`
    /// when nothing matches or the click was swallowed.
    pub fn click_text(&mut self, text: &str) -> Result<bool, MissingContext> {
        match self.by_text(text) {
            Some(key) => self.click(key),
            None => Ok(false),
        }
    }

    /// Press `key` on the focused element, then re-render.
    pub fn press(&mut self, key: Key) -> Result<UiEvent, MissingContext> {
        self.press_with(key, Modifiers::empty())
    }

    pub fn press_with(&mut self, key: Key, modifiers: Modifiers) -> Result<UiEvent, MissingContext> {
        let event = self.document.key_down(key, modifiers);
        self.rerender()?;
        Ok(event)
    }

    /// Pointer press on `key`, then re-render.
    pub fn pointer_down(
        &mut self,
        key: ElementKey,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> Result<bool, MissingContext> {
        let delivered = self.document.pointer_down(key, button, modifiers);
        self.rerender()?;
        Ok(delivered)
    }

    /// Report a finished exit animation on `key`, then re-render.
    pub fn animation_end(&mut self, key: ElementKey) -> Result<(), MissingContext> {
        self.document.animation_end(key);
        self.rerender()
    }
}

fn implicit_role(el: &Element) -> Option<&str> {
    el.get_attr("role").or(match el.tag() {
        "button" => Some("button"),
        "img" => Some("img"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some("heading"),
        "p" => Some("paragraph"),
        _ => None,
    })
}

/// Where the snapshot `name` lives for the crate at `manifest_dir`.
#[must_use]
pub fn snapshot_path(manifest_dir: &str, name: &str) -> PathBuf {
    Path::new(manifest_dir)
        .join("tests")
        .join("snapshots")
        .join(format!("{name}.snap"))
}

/// Compare `actual` with the stored snapshot, or store it when `BLESS=1`.
///
/// # Panics
///
/// When the snapshot differs, or is missing and `BLESS` is not set.
pub fn check_snapshot(manifest_dir: &str, name: &str, actual: &str) {
    let path = snapshot_path(manifest_dir, name);
    let bless = std::env::var("BLESS").is_ok_and(|v| v == "1");
    if bless {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).unwrap_or_else(|e| panic!("create {}: {e}", dir.display()));
        }
        std::fs::write(&path, format!("{actual}\n"))
            .unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
        return;
    }
    let expected = std::fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!(
            "missing snapshot {}; run with BLESS=1 to create it",
            path.display()
        )
    });
    assert_eq!(
        expected.trim_end_matches('\n'),
        actual,
        "snapshot `{name}` changed; run with BLESS=1 to accept"
    );
}

/// Assert that rendered HTML matches `tests/snapshots/<name>.snap`.
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $html:expr) => {
        $crate::check_snapshot(env!("CARGO_MANIFEST_DIR"), $name, $html)
    };
}
