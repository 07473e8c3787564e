#![forbid(unsafe_code)]

//! Stable element id generation.
//!
//! Ids are scoped by an id provider. The outermost provider uses prefix `0`
//! so server and client renders of the same tree agree; nested providers
//! draw a fresh prefix from a counter shared with their ancestors. Without
//! any provider, the registry default supplies a random per-thread prefix.
//!
//! # Invariants
//!
//! 1. Two ids generated under the same provider never collide.
//! 2. Ids generated under distinct providers of one tree never collide.
//! 3. An [`IdSlot`] yields the same id on every render pass.

use std::cell::{Cell, OnceCell};
use std::hash::BuildHasher;
use std::rc::Rc;

use crate::context::{ContextRegistry, Group, Provider};
use crate::error::MissingContext;
use crate::scope::Scope;

/// Group name used by id providers and consumers alike.
pub const ID_PROVIDER: Group = Group::new("IdProvider");

thread_local! {
    static ID_CONTEXT: ContextRegistry<IdContextValue> =
        ContextRegistry::with_default(ID_PROVIDER.name(), IdContextValue::detached(random_prefix()));
}

/// Access the id registry (thread-local).
#[must_use]
pub fn id_context() -> ContextRegistry<IdContextValue> {
    ID_CONTEXT.with(Clone::clone)
}

fn random_prefix() -> u64 {
    ahash::RandomState::new().hash_one(std::process::id()) % 10_000_000_000
}

/// Payload published by an id provider.
#[derive(Debug, Clone)]
pub struct IdContextValue {
    prefix: u64,
    current: Rc<Cell<u64>>,
    prefixes: Rc<Cell<u64>>,
}

impl IdContextValue {
    fn detached(prefix: u64) -> Self {
        Self {
            prefix,
            current: Rc::new(Cell::new(0)),
            prefixes: Rc::new(Cell::new(prefix)),
        }
    }

    /// Prefix shared by every id generated under this provider.
    #[must_use]
    pub fn prefix(&self) -> u64 {
        self.prefix
    }

    fn next_id(&self) -> String {
        let n = self.current.get() + 1;
        self.current.set(n);
        format!("hui-id-{}-{n}", self.prefix)
    }
}

impl PartialEq for IdContextValue {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
            && Rc::ptr_eq(&self.current, &other.current)
            && Rc::ptr_eq(&self.prefixes, &other.prefixes)
    }
}

/// State of one id provider instance.
#[derive(Debug)]
pub struct IdProviderState {
    provider: Provider<IdContextValue>,
    value: OnceCell<IdContextValue>,
}

impl Default for IdProviderState {
    fn default() -> Self {
        Self::new()
    }
}

impl IdProviderState {
    /// Create an unpublished provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: id_context().provider(),
            value: OnceCell::new(),
        }
    }

    /// Publish this provider's id scope below `cx`.
    pub fn provide(&self, cx: &Scope) -> Result<Scope, MissingContext> {
        let registry = self.provider.registry().clone();
        let current = registry.lookup(cx, ID_PROVIDER, None)?;
        let value = self.value.get_or_init(|| {
            if registry.is_default(&current) {
                IdContextValue {
                    prefix: 0,
                    current: Rc::new(Cell::new(0)),
                    prefixes: Rc::new(Cell::new(0)),
                }
            } else {
                let prefix = current.prefixes.get() + 1;
                current.prefixes.set(prefix);
                IdContextValue {
                    prefix,
                    current: Rc::new(Cell::new(0)),
                    prefixes: Rc::clone(&current.prefixes),
                }
            }
        });
        Ok(self.provider.publish(cx, ID_PROVIDER, value.clone()))
    }
}

/// Generate a new id in the nearest id scope, or return `deterministic`.
pub fn generate_id(cx: &Scope, deterministic: Option<&str>) -> Result<String, MissingContext> {
    if let Some(id) = deterministic {
        return Ok(id.to_owned());
    }
    let node = id_context().lookup(cx, ID_PROVIDER, None)?;
    Ok(node.next_id())
}

/// One memoized id per component instance.
#[derive(Debug, Default)]
pub struct IdSlot {
    id: OnceCell<String>,
}

impl IdSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for this slot, generated on first use.
    pub fn get(&self, cx: &Scope, deterministic: Option<&str>) -> Result<String, MissingContext> {
        if let Some(id) = self.id.get() {
            return Ok(id.clone());
        }
        let id = generate_id(cx, deterministic)?;
        Ok(self.id.get_or_init(|| id).clone())
    }
}
