//! Nets and ports (§3).

use serde::{Deserialize, Serialize};
use crate::ids::SymbolId;

/// A net: a named wire with a discipline (§3). Ports that declare a
/// discipline induce a net of the same name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Net {
    /// This net's identity key, used by the code generator.
    pub id: SymbolId,
    /// The net's name.
    pub name: String,
    /// The net's discipline name, if known.
    pub discipline: Option<String>,
}

/// Port direction (§3).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PortDirection {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}
