//! Token kinds for the Verilog-A analog subset (§3, §4.1).

use serde::{Deserialize, Serialize};
use va_source::Span;

/// The closed set of token kinds this lexer ever produces.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum VaToken {
    // Literals
    /// A decimal integer literal, e.g. `42`.
    IntLiteral(i64),
    /// A real literal with fractional/exponent part or an SI scale suffix,
    /// e.g. `3.5`, `2.3e-3`, `2.3T`.
    RealLiteral(f64),
    /// A double-quoted string literal, escapes preserved verbatim.
    StringLiteral(String),

    // Names
    /// A plain identifier, or an escaped identifier (`\name `) with the
    /// leading backslash stripped.
    Identifier(String),
    /// A system identifier, e.g. `$temperature`, `$strobe` (`$` included).
    SystemIdentifier(String),

    // Keywords
    /// `module`
    Module,
    /// `endmodule`
    EndModule,
    /// `analog`
    Analog,
    /// `begin`
    Begin,
    /// `end`
    End,
    /// `if`
    If,
    /// `else`
    Else,
    /// `case`
    Case,
    /// `default`
    Default,
    /// `endcase`
    EndCase,
    /// `for`
    For,
    /// `inout`
    Inout,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `branch`
    Branch,
    /// `parameter`
    Parameter,
    /// `real`
    RealType,
    /// `integer`
    IntegerType,
    /// `string`
    StringType,
    /// `nature`
    Nature,
    /// `endnature`
    EndNature,
    /// `discipline`
    Discipline,
    /// `enddiscipline`
    EndDiscipline,
    /// `domain`
    Domain,
    /// `discrete`
    Discrete,
    /// `continuous`
    Continuous,
    /// `potential`
    Potential,
    /// `flow`
    Flow,
    /// `from`
    From,
    /// `exclude`
    Exclude,
    /// `inf`
    Inf,
    /// `units`
    Units,
    /// `access`
    Access,
    /// `abstol`
    Abstol,
    /// `idt_nature`
    IdtNature,
    /// `ddt_nature`
    DdtNature,

    // Operators / punctuation
    /// `=`
    Assign,
    /// `<+`
    ContributionOp,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `^~`
    XnorCaretTilde,
    /// `~^`
    XnorTildeCaret,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(*`
    AttrStart,
    /// `*)`
    AttrEnd,
    /// An end-of-line, significant to the preprocessor and to macro-body
    /// capture, dropped by the parser.
    Newline,
    /// A `\` immediately followed by a newline: a macro-body line
    /// continuation. Swallowed by `` `define`` body capture rather than
    /// terminating the body or appearing in it.
    Continuation,

    // Preprocessor
    /// A `` `name `` directive/macro-call token; value excludes the backtick.
    Directive(String),

    /// End of input.
    Eof,
}

/// Looks up a reserved word, case-sensitive, returning its keyword token.
pub fn lookup_keyword(s: &str) -> Option<VaToken> {
    use VaToken::*;
    Some(match s {
        "module" => Module,
        "endmodule" => EndModule,
        "analog" => Analog,
        "begin" => Begin,
        "end" => End,
        "if" => If,
        "else" => Else,
        "case" => Case,
        "default" => Default,
        "endcase" => EndCase,
        "for" => For,
        "inout" => Inout,
        "input" => Input,
        "output" => Output,
        "branch" => Branch,
        "parameter" => Parameter,
        "real" => RealType,
        "integer" => IntegerType,
        "string" => StringType,
        "nature" => Nature,
        "endnature" => EndNature,
        "discipline" => Discipline,
        "enddiscipline" => EndDiscipline,
        "domain" => Domain,
        "discrete" => Discrete,
        "continuous" => Continuous,
        "potential" => Potential,
        "flow" => Flow,
        "from" => From,
        "exclude" => Exclude,
        "inf" => Inf,
        "units" => Units,
        "access" => Access,
        "abstol" => Abstol,
        "idt_nature" => IdtNature,
        "ddt_nature" => DdtNature,
        _ => return None,
    })
}

impl VaToken {
    /// Whether this token kind can begin a macro-call / directive-name
    /// position (used by the preprocessor to decide whether a
    /// `Directive` name is `define`/`ifdef`/`else`/`endif`/`include` or a
    /// user macro invocation).
    pub fn is_directive(&self) -> bool {
        matches!(self, VaToken::Directive(_))
    }
}

/// A located token: its kind plus the span (with origin chain) it came
/// from or was carried to by expansion.
#[derive(Clone, Debug)]
pub struct Token {
    /// The token's kind and (for literals/identifiers) value.
    pub kind: VaToken,
    /// Where the token came from, including any expansion/inclusion chain.
    pub span: Span,
}

impl Token {
    /// Builds a token.
    pub fn new(kind: VaToken, span: Span) -> Self {
        Self { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_case_sensitive() {
        assert_eq!(lookup_keyword("module"), Some(VaToken::Module));
        assert_eq!(lookup_keyword("Module"), None);
        assert_eq!(lookup_keyword("MODULE"), None);
    }

    #[test]
    fn non_keyword_is_none() {
        assert_eq!(lookup_keyword("sin"), None);
        assert_eq!(lookup_keyword("R"), None);
    }

    #[test]
    fn all_reserved_words_recognized() {
        let words = [
            "module", "endmodule", "analog", "begin", "end", "if", "else", "case", "default",
            "endcase", "for", "inout", "input", "output", "branch", "parameter", "real",
            "integer", "string", "nature", "endnature", "discipline", "enddiscipline", "domain",
            "discrete", "continuous", "potential", "flow", "from", "exclude", "inf", "units",
            "access", "abstol", "idt_nature", "ddt_nature",
        ];
        for w in words {
            assert!(lookup_keyword(w).is_some(), "expected {w} to be a keyword");
        }
    }
}
