//! Natures (§3, §4.4 step 1, §9 "Cyclic references among natures").

use serde::{Deserialize, Serialize};

/// A physical quantity kind: voltage, current, charge, ... (§3).
///
/// Natures are lowered in two passes to allow `idt_nature`/`ddt_nature`
/// cycles (e.g. `Current.idt_nature = Charge`, `Charge.ddt_nature =
/// Current`): first every `Nature` is created with only its `name`
/// populated, then a second pass fills in the remaining fields by name
/// lookup against the already-created set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Nature {
    /// The nature's name.
    pub name: String,
    /// Absolute tolerance, if given.
    pub abstol: Option<f64>,
    /// Engineering units string, if given.
    pub units: Option<String>,
    /// The accessor identifier used in source (e.g. `V`, `I`), if given.
    pub access: Option<String>,
    /// Name of the nature whose time-integral this one is, if given.
    pub idt_nature: Option<String>,
    /// Name of the nature whose time-derivative this one is, if given.
    pub ddt_nature: Option<String>,
}

impl Nature {
    /// Creates a nature with only its name populated (pass 1).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
