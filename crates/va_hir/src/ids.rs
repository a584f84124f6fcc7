//! Identity-keyed symbol ids (§4.5, §9 "Identity vs value for symbols").
//!
//! HIR symbols (`Variable`, `Net`, `Branch`) compare structurally for
//! ease of testing, but code generation needs per-instance identity to
//! associate each symbol with exactly one IR global. Every symbol that
//! can be a compilation-map key carries a `SymbolId` assigned
//! monotonically at construction time; maps are keyed on this id, never
//! on structural equality.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// A monotonically assigned, per-process-unique id for an HIR symbol
/// (`Variable`, `Net`, `Branch`) that can be the target of a compilation
/// map. Never reused; never derived from a symbol's name or shape.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SymbolId(u32);

static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(0);

impl SymbolId {
    /// Allocates the next `SymbolId` in the process-wide sequence.
    pub fn next() -> Self {
        Self(NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value, for diagnostics/serialization only.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_ids_are_distinct() {
        let a = SymbolId::next();
        let b = SymbolId::next();
        assert_ne!(a, b);
    }
}
