//! A nested-scope symbol table (§4.4).
//!
//! `resolve(name)` walks the frame stack from innermost to outermost;
//! failure raises `UndefinedIdentifier`. Each module pushes one frame on
//! entry; each `begin...end` block with local declarations pushes
//! another. Frames are keyed by interned [`Ident`]s rather than raw
//! `String`s, since lowering re-resolves the same identifiers repeatedly
//! while walking nested scopes (`va_common::ident`).

use std::collections::HashMap;

use va_common::{Ident, Interner};
use va_hir::{BranchKey, ContributionKind, HirType, SymbolId};

/// What a resolved identifier refers to.
#[derive(Clone, Debug)]
pub enum Resolved {
    /// A variable or parameter.
    Var {
        /// The symbol's identity.
        id: SymbolId,
        /// The symbol's type.
        ty: HirType,
        /// Whether this is a parameter (read-only from `run_analog`).
        is_parameter: bool,
    },
    /// A net name (used as a branch endpoint, never read directly).
    Net,
    /// A named branch alias.
    Branch {
        /// The branch's identity.
        id: SymbolId,
        /// The branch's table key.
        key: BranchKey,
    },
    /// A nature accessor (`V`, `I`, ...).
    Accessor(ContributionKind),
}

/// The nested-scope symbol table threaded through lowering a single
/// module.
pub struct Scope {
    frames: Vec<HashMap<Ident, Resolved>>,
    interner: Interner,
}

impl Scope {
    /// Creates a scope with a single (module-level) frame.
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
            interner: Interner::new(),
        }
    }

    /// Pushes a new (block-level) frame.
    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost frame.
    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Declares `name` in the innermost frame. Returns `false` (without
    /// inserting) if `name` is already declared in that same frame —
    /// the caller raises `DuplicateIdentifier`.
    pub fn declare(&mut self, name: impl AsRef<str>, value: Resolved) -> bool {
        let id = self.interner.get_or_intern(name.as_ref());
        let frame = self.frames.last_mut().expect("scope always has a frame");
        if frame.contains_key(&id) {
            false
        } else {
            frame.insert(id, value);
            true
        }
    }

    /// Resolves `name` by searching frames innermost-first.
    pub fn resolve(&self, name: &str) -> Option<&Resolved> {
        let id = self.interner.get_or_intern(name);
        self.frames.iter().rev().find_map(|f| f.get(&id))
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_frame_shadows_outer() {
        let mut s = Scope::new();
        s.declare(
            "x",
            Resolved::Var {
                id: SymbolId::next(),
                ty: HirType::Integer,
                is_parameter: false,
            },
        );
        s.push_frame();
        s.declare(
            "x",
            Resolved::Var {
                id: SymbolId::next(),
                ty: HirType::Real,
                is_parameter: false,
            },
        );
        match s.resolve("x") {
            Some(Resolved::Var { ty, .. }) => assert_eq!(*ty, HirType::Real),
            _ => panic!("expected inner x"),
        }
        s.pop_frame();
        match s.resolve("x") {
            Some(Resolved::Var { ty, .. }) => assert_eq!(*ty, HirType::Integer),
            _ => panic!("expected outer x"),
        }
    }

    #[test]
    fn duplicate_declare_in_same_frame_fails() {
        let mut s = Scope::new();
        assert!(s.declare("x", Resolved::Net));
        assert!(!s.declare("x", Resolved::Net));
    }

    #[test]
    fn unresolved_identifier_is_none() {
        let s = Scope::new();
        assert!(s.resolve("nope").is_none());
    }
}
