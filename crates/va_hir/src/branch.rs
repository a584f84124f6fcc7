//! Branches (§3, §9 "Branches keyed by net pair").

use serde::{Deserialize, Serialize};
use crate::ids::SymbolId;

/// A branch between two net endpoints, the second optional (implicit
/// ground). Two branches are the *same* branch iff they share an
/// ordered `(net1, net2)` key; a module's branch table is keyed on
/// exactly this pair so `V(a,b)` and `I(a,b)` share a slot. A named
/// branch declaration registers an alias, not a second slot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Branch {
    /// This branch's identity key, used by the code generator.
    pub id: SymbolId,
    /// The optional user-given name from a `branch (...) name;` decl.
    pub name: Option<String>,
    /// First endpoint net name.
    pub net1: String,
    /// Second endpoint net name; `None` denotes implicit ground.
    pub net2: Option<String>,
}

/// The key a module's branch table is indexed by.
pub type BranchKey = (String, Option<String>);

impl Branch {
    /// This branch's table key.
    pub fn key(&self) -> BranchKey {
        (self.net1.clone(), self.net2.clone())
    }
}
