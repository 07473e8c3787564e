#![forbid(unsafe_code)]

//! Diagnostics configuration.
//!
//! Accessibility audits (missing dialog titles, missing alert descriptions)
//! are advisory. They are on by default in debug builds and can be toggled
//! with `HUI_DIAGNOSTICS` or programmatically per thread.

use std::cell::RefCell;
use std::rc::Rc;

/// Environment variable read by [`DiagnosticsConfig::from_env`].
pub const ENV_DIAGNOSTICS: &str = "HUI_DIAGNOSTICS";

thread_local! {
    static GLOBAL_DIAGNOSTICS: Rc<RefCell<Vec<DiagnosticsConfig>>> =
        Rc::new(RefCell::new(vec![DiagnosticsConfig::from_env()]));
}

/// Which advisory audits run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    pub label_warnings: bool,
    pub description_warnings: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self::enabled(cfg!(debug_assertions))
    }
}

impl DiagnosticsConfig {
    /// Every audit on (`true`) or off (`false`).
    #[must_use]
    pub const fn enabled(on: bool) -> Self {
        Self {
            label_warnings: on,
            description_warnings: on,
        }
    }

    /// Build-profile default, overridden by `HUI_DIAGNOSTICS` when set.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(ENV_DIAGNOSTICS)
            .ok()
            .and_then(|v| parse_switch(&v))
            .map_or_else(Self::default, Self::enabled)
    }

    /// Active configuration for this thread.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_DIAGNOSTICS.with(|stack| {
            stack
                .borrow()
                .last()
                .copied()
                .unwrap_or_default()
        })
    }

    /// Replace the base configuration for this thread.
    pub fn set_global(config: Self) {
        GLOBAL_DIAGNOSTICS.with(|stack| {
            let mut stack = stack.borrow_mut();
            match stack.first_mut() {
                Some(base) => *base = config,
                None => stack.push(config),
            }
        });
    }

    /// Apply `self` until the returned guard drops.
    #[must_use = "the override ends when the guard is dropped"]
    pub fn push_override(self) -> DiagnosticsOverride {
        GLOBAL_DIAGNOSTICS.with(|stack| {
            stack.borrow_mut().push(self);
            DiagnosticsOverride {
                stack: Rc::clone(stack),
                config: self,
            }
        })
    }
}

/// RAII guard for a scoped diagnostics override.
#[derive(Debug)]
pub struct DiagnosticsOverride {
    stack: Rc<RefCell<Vec<DiagnosticsConfig>>>,
    config: DiagnosticsConfig,
}

impl Drop for DiagnosticsOverride {
    fn drop(&mut self) {
        let mut stack = self.stack.borrow_mut();
        if stack.len() > 1 {
            let popped = stack.pop();
            debug_assert_eq!(popped, Some(self.config));
        }
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw == "1" || raw.eq_ignore_ascii_case("on") || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("off") || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
