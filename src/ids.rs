//! Opaque identity tokens.
//!
//! `spec.md` §3 gives the parser a `key_fountain`: "a source of fresh opaque
//! identity tokens used as keys into the per-rule metadata arenas". The
//! arena-index newtypes below *are* that fountain — `Parser::arena.len()` at
//! push time is the fresh token, there is no separate counter to keep in
//! sync with it (see `DESIGN.md`, "key_fountain").

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one `Parser` instance, stamped onto every arena-backed [`crate::rule::Rule`]
/// it builds so that running the rule against a different parser is a
/// checkable error rather than a memory-safety hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserId(u64);

impl ParserId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ParserId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Index into a `Parser`'s rule-node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(pub(crate) usize);

/// Index into a `Parser`'s action-descriptor arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub(crate) usize);

/// Index into a `Parser`'s quoted-string output-slot arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

/// Opaque, consumer-settable tag carried by a [`crate::rule::Rule`] (`spec.md` §3
/// `client_tag`). The core never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClientTag(pub i64);
