#![forbid(unsafe_code)]

//! Style for content that is read by assistive technology but not shown.

/// Inline style that removes an element from the visual layout while keeping
/// it in the accessibility tree.
pub const VISUALLY_HIDDEN_STYLE: &str = "position: absolute; border: 0; width: 1px; height: 1px; \
padding: 0; margin: -1px; overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; \
word-wrap: normal;";

/// Whether an inline style string hides its element visually.
#[must_use]
pub fn is_visually_hidden(style: &str) -> bool {
    style.contains("clip: rect(0, 0, 0, 0)") && style.contains("position: absolute")
}
