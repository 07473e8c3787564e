#![forbid(unsafe_code)]

//! Errors raised by context lookups.

use std::fmt;

use crate::context::Group;

/// A lookup found no provider of its group and the registry has no default.
///
/// Raised at the lookup site, never at provider construction. It signals a
/// sub-component rendered outside its required ancestor and is never
/// translated or retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingContext {
    group: Group,
    part: Option<String>,
}

impl MissingContext {
    /// Lookup performed by the root part of `group`.
    #[must_use]
    pub fn root(group: Group) -> Self {
        Self { group, part: None }
    }

    /// Lookup performed by the sub-part `part` of `group`.
    #[must_use]
    pub fn part(part: impl Into<String>, group: Group) -> Self {
        Self {
            group,
            part: Some(part.into()),
        }
    }

    /// Group the lookup asserted.
    #[must_use]
    pub fn group(&self) -> Group {
        self.group
    }

    /// Part that performed the lookup, `None` for a root part.
    #[must_use]
    pub fn part_name(&self) -> Option<&str> {
        self.part.as_deref()
    }

    /// Whether the failing lookup came from a root part.
    #[must_use]
    pub fn is_root_part(&self) -> bool {
        self.part.is_none()
    }
}

impl fmt::Display for MissingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.part {
            None => write!(f, "Missing default context for {}", self.group),
            Some(part) => write!(f, "{part} must be used within {}", self.group),
        }
    }
}

impl std::error::Error for MissingContext {}
