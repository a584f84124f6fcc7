//! End-to-end scenarios driving the full lex → preprocess → parse →
//! lower → codegen → interpret pipeline (§8).

use va_codegen::generate;
use va_diagnostics::DiagnosticSink;
use va_jit::{CompiledModule, InterpEngine};
use va_lexer::{lex, preprocessor::preprocess};
use va_lower::lower_source_file;
use va_parser::parse;
use va_source::SourceDb;

fn compile(src: &str) -> CompiledModule {
    let full = format!("{}\n{}", va_hir::preamble::DISCIPLINES_VAMS, src);
    let mut db = SourceDb::new();
    let id = db.add_source("t.va", full.clone());
    let tokens = lex(&full, id).unwrap();
    let tokens = preprocess(tokens, &mut db, &[]).unwrap();
    let file = parse(tokens).unwrap();
    let sink = DiagnosticSink::new();
    let (modules, _, _) = lower_source_file(&file, &sink).unwrap();
    let ir = generate(&modules[0]).unwrap();
    CompiledModule::compile(&InterpEngine::new(), ir).unwrap()
}

#[test]
fn constant_assignment() {
    let mut m = compile("module m(); real x; analog x = 3.5; endmodule");
    m.run_analog().unwrap();
    assert_eq!(m.real("x").unwrap(), 3.5);
}

#[test]
fn int_real_mixing() {
    let mut m = compile("module m(); integer i; real r; analog begin r = 2; i = r * 3; end endmodule");
    m.run_analog().unwrap();
    assert_eq!(m.real("r").unwrap(), 2.0);
    assert_eq!(m.integer("i").unwrap(), 6);
}

#[test]
fn nested_if() {
    let src = "module m(); real a,b,c; analog if (a) if (b) c=3; else c=1; else if (b) c=2; else c=0; endmodule";
    for a in [0.0, 1.0] {
        for b in [0.0, 1.0] {
            let mut m = compile(src);
            m.set_real("a", a).unwrap();
            m.set_real("b", b).unwrap();
            m.run_analog().unwrap();
            assert_eq!(m.real("c").unwrap(), a + 2.0 * b, "a={a} b={b}");
        }
    }
}

#[test]
fn analog_contribution_two_terminal_and_one_terminal() {
    let src = "module m(n1,n2); inout electrical n1,n2; \
               analog I(n1) <+ 3.5; analog I(n2,n1) <+ 4.5; endmodule";
    let mut m = compile(src);
    m.run_analog().unwrap();
    assert_eq!(m.net_flow("n1").unwrap(), -1.0);
    assert_eq!(m.net_flow("n2").unwrap(), 4.5);
}

#[test]
fn probe_and_resistor() {
    let src = "module m(n1,n2); inout electrical n1,n2; parameter real R=1; \
               analog I(n1,n2) <+ V(n1,n2)/R; endmodule";
    for (v1, v2, r) in [(1.0, 0.0, 1.0), (5.0, 2.0, 2.0), (-3.0, 1.0, 0.5)] {
        let mut m = compile(src);
        m.set_net_potential("n1", v1).unwrap();
        m.set_net_potential("n2", v2).unwrap();
        m.set_real("R", r).unwrap();
        m.run_analog().unwrap();
        assert_eq!(m.net_flow("n1").unwrap(), (v1 - v2) / r);
        assert_eq!(m.net_flow("n2").unwrap(), -(v1 - v2) / r);
    }
}

#[test]
fn macro_expansion_reorders_arguments() {
    use va_lexer::token::VaToken;

    let src = "`define ADD(y,x) x+y\n`ADD(2*3, 4*5)";
    let mut db = SourceDb::new();
    let id = db.add_source("t.va", src.to_string());
    let tokens = lex(src, id).unwrap();
    let tokens = preprocess(tokens, &mut db, &[]).unwrap();
    let kinds: Vec<&VaToken> = tokens
        .iter()
        .map(|t| &t.kind)
        .filter(|k| !matches!(k, VaToken::Newline | VaToken::Eof))
        .collect();
    assert_eq!(
        kinds,
        vec![
            &VaToken::IntLiteral(4),
            &VaToken::Star,
            &VaToken::IntLiteral(5),
            &VaToken::Plus,
            &VaToken::IntLiteral(2),
            &VaToken::Star,
            &VaToken::IntLiteral(3),
        ]
    );
}
