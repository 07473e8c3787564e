#![forbid(unsafe_code)]

//! Accessibility vocabulary for hui widgets.
//!
//! Roles, `data-state` values and ARIA boolean encoding shared by every
//! widget, plus advisory audits for missing labels and descriptions.

pub mod audit;
pub mod visually_hidden;

use std::fmt;

pub use audit::{A11yWarning, LabelRequirement, WarningKind, audit_description, audit_label};
pub use visually_hidden::VISUALLY_HIDDEN_STYLE;

/// ARIA role emitted by widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Dialog,
    AlertDialog,
    Button,
    Img,
    Region,
    Presentation,
}

impl Role {
    /// Value of the `role` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::AlertDialog => "alertdialog",
            Self::Button => "button",
            Self::Img => "img",
            Self::Region => "region",
            Self::Presentation => "presentation",
        }
    }

    /// Whether the role is modal-capable (`aria-modal` is meaningful).
    #[must_use]
    pub const fn is_dialog(self) -> bool {
        matches!(self, Self::Dialog | Self::AlertDialog)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `data-state` value for disclosure widgets.
#[must_use]
pub const fn open_state(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}

/// ARIA boolean attribute value.
#[must_use]
pub const fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings() {
        assert_eq!(Role::AlertDialog.to_string(), "alertdialog");
        assert_eq!(Role::Dialog.as_str(), "dialog");
        assert!(Role::AlertDialog.is_dialog());
        assert!(!Role::Button.is_dialog());
    }

    #[test]
    fn state_helpers() {
        assert_eq!(open_state(true), "open");
        assert_eq!(open_state(false), "closed");
        assert_eq!(aria_bool(false), "false");
    }
}
