//! Disciplines (§3, §4.4 step 2).

use serde::{Deserialize, Serialize};

/// A discipline: a domain tag plus the potential/flow natures it pairs
/// nets with (§3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Discipline {
    /// The discipline's name (e.g. `electrical`).
    pub name: String,
    /// `"discrete"` or `"continuous"`.
    pub domain: String,
    /// The potential nature's name (resolved from source text).
    pub potential: String,
    /// The flow nature's name (resolved from source text).
    pub flow: String,
}
