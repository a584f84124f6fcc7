//! The standard nature/discipline preamble (§6).
//!
//! Ships the minimal `Voltage`/`Current`/`Charge`/`Flux` natures and the
//! `electrical` discipline that test sources and user modules assume are
//! already in scope. The CLI and test harness prepend this source
//! through the same preprocessor/lowering path as user modules, rather
//! than hand-constructing HIR `Nature`/`Discipline` records directly, so
//! it exercises the identical two-pass nature construction (§4.4 step 1)
//! as anything else written in the language.

/// Verilog-A source text defining `Voltage`, `Current`, `Charge`,
/// `Flux`, and the `electrical` discipline.
pub const DISCIPLINES_VAMS: &str = r#"
nature Voltage
  units = "V";
  abstol = 1e-6;
  access = V;
  ddt_nature = Flux;
endnature

nature Current
  units = "A";
  abstol = 1e-12;
  access = I;
  idt_nature = Charge;
endnature

nature Charge
  units = "coul";
  abstol = 1e-14;
  access = Q;
  ddt_nature = Current;
endnature

nature Flux
  units = "Wb";
  abstol = 1e-9;
  access = Phi;
  idt_nature = Voltage;
endnature

discipline electrical
  domain continuous;
  potential Voltage;
  flow Current;
enddiscipline
"#;
