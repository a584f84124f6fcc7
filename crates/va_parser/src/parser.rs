//! Core parser infrastructure and module/statement grammar (§4.3).

use va_lexer::{Token, VaToken};
use va_source::Span;

use crate::ast::*;
use crate::errors::ParseError;

/// Parses a preprocessed token stream into a [`SourceFile`].
pub fn parse(tokens: Vec<Token>) -> Result<SourceFile, ParseError> {
    let mut parser = Parser::new(tokens);
    parser.parse_source_file()
}

/// A recursive-descent parser over a preprocessed Verilog-A token stream.
///
/// Parsing aborts on the first error (§4.3); there is no error recovery.
pub struct Parser<'t> {
    tokens: Vec<Token>,
    pos: usize,
    _marker: std::marker::PhantomData<&'t ()>,
}

impl<'t> Parser<'t> {
    /// Builds a parser over an already-lexed-and-preprocessed token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            _marker: std::marker::PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    pub(crate) fn current(&self) -> &VaToken {
        &self.tokens[self.pos].kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].span.clone()
    }

    pub(crate) fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span.clone()
        } else {
            self.current_span()
        }
    }

    pub(crate) fn at(&self, kind: VaToken) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(&kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.current(), VaToken::Eof)
    }

    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: VaToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: VaToken) -> Result<(), ParseError> {
        if self.eat(kind.clone()) {
            Ok(())
        } else {
            Err(ParseError::ExpectedButGot {
                expected: format!("{kind:?}"),
                found: format!("{:?}", self.current()),
                span: self.current_span(),
            })
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.current().clone() {
            VaToken::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::ExpectedButGot {
                expected: "identifier".to_string(),
                found: format!("{other:?}"),
                span: self.current_span(),
            }),
        }
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.expect_identifier()?];
        while self.eat(VaToken::Comma) {
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    // ------------------------------------------------------------------
    // Top level
    // ------------------------------------------------------------------

    fn parse_source_file(&mut self) -> Result<SourceFile, ParseError> {
        let mut items = Vec::new();
        while !self.at_eof() {
            items.push(self.parse_item()?);
        }
        Ok(SourceFile { items })
    }

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        match self.current() {
            VaToken::Nature => Ok(Item::Nature(self.parse_nature_decl()?)),
            VaToken::Discipline => Ok(Item::Discipline(self.parse_discipline_decl()?)),
            VaToken::Module => Ok(Item::Module(self.parse_module_decl()?)),
            _ => Err(ParseError::UnexpectedToken {
                span: self.current_span(),
            }),
        }
    }

    fn parse_nature_decl(&mut self) -> Result<NatureDecl, ParseError> {
        let start = self.current_span();
        self.expect(VaToken::Nature)?;
        let name = self.expect_identifier()?;
        let mut attributes = Vec::new();
        while !self.at(VaToken::EndNature) {
            let attr_name = self.expect_identifier()?;
            self.expect(VaToken::Assign)?;
            let value = self.parse_expr()?;
            self.expect(VaToken::Semi)?;
            attributes.push((attr_name, value));
        }
        self.expect(VaToken::EndNature)?;
        let span = start.merge(&self.prev_span());
        Ok(NatureDecl { name, attributes, span })
    }

    fn parse_discipline_decl(&mut self) -> Result<DisciplineDecl, ParseError> {
        let start = self.current_span();
        self.expect(VaToken::Discipline)?;
        let name = self.expect_identifier()?;
        let mut domain = None;
        let mut potential = None;
        let mut flow = None;
        while !self.at(VaToken::EndDiscipline) {
            match self.current() {
                VaToken::Domain => {
                    self.advance();
                    domain = Some(match self.current() {
                        VaToken::Discrete => "discrete".to_string(),
                        VaToken::Continuous => "continuous".to_string(),
                        _ => self.expect_identifier()?,
                    });
                    if matches!(self.current(), VaToken::Discrete | VaToken::Continuous) {
                        self.advance();
                    }
                    self.expect(VaToken::Semi)?;
                }
                VaToken::Potential => {
                    self.advance();
                    potential = Some(self.expect_identifier()?);
                    self.expect(VaToken::Semi)?;
                }
                VaToken::Flow => {
                    self.advance();
                    flow = Some(self.expect_identifier()?);
                    self.expect(VaToken::Semi)?;
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        span: self.current_span(),
                    })
                }
            }
        }
        self.expect(VaToken::EndDiscipline)?;
        let span = start.merge(&self.prev_span());
        Ok(DisciplineDecl {
            name,
            domain,
            potential,
            flow,
            span,
        })
    }

    fn parse_module_decl(&mut self) -> Result<ModuleDecl, ParseError> {
        let start = self.current_span();
        self.expect(VaToken::Module)?;
        let name = self.expect_identifier()?;
        let mut port_names = Vec::new();
        self.expect(VaToken::LParen)?;
        if !self.at(VaToken::RParen) {
            port_names = self.parse_identifier_list()?;
        }
        self.expect(VaToken::RParen)?;
        self.expect(VaToken::Semi)?;

        let mut items = Vec::new();
        while !self.at(VaToken::EndModule) {
            items.push(self.parse_module_item()?);
        }
        self.expect(VaToken::EndModule)?;
        let span = start.merge(&self.prev_span());
        Ok(ModuleDecl {
            name,
            port_names,
            items,
            span,
        })
    }

    fn parse_direction(&mut self) -> Option<Direction> {
        let dir = match self.current() {
            VaToken::Input => Direction::Input,
            VaToken::Output => Direction::Output,
            VaToken::Inout => Direction::Inout,
            _ => return None,
        };
        self.advance();
        Some(dir)
    }

    fn parse_scalar_type(&mut self) -> Option<ScalarType> {
        let ty = match self.current() {
            VaToken::RealType => ScalarType::Real,
            VaToken::IntegerType => ScalarType::Integer,
            VaToken::StringType => ScalarType::String,
            _ => return None,
        };
        self.advance();
        Some(ty)
    }

    fn parse_module_item(&mut self) -> Result<ModuleItem, ParseError> {
        let start = self.current_span();

        if self.eat(VaToken::AttrStart) {
            while !self.at(VaToken::AttrEnd) {
                self.advance();
            }
            self.expect(VaToken::AttrEnd)?;
            return Ok(ModuleItem::AttributeInstance(start.merge(&self.prev_span())));
        }

        if let Some(direction) = self.parse_direction() {
            let discipline = if matches!(self.current(), VaToken::Identifier(_)) && self.peek_is_discipline_then_names() {
                Some(self.expect_identifier()?)
            } else {
                None
            };
            let names = self.parse_identifier_list()?;
            self.expect(VaToken::Semi)?;
            return Ok(ModuleItem::PortDecl {
                direction,
                discipline,
                names,
                span: start.merge(&self.prev_span()),
            });
        }

        if let Some(ty) = self.parse_scalar_type() {
            let mut names = Vec::new();
            loop {
                let name = self.expect_identifier()?;
                let init = if self.eat(VaToken::Assign) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                names.push((name, init));
                if !self.eat(VaToken::Comma) {
                    break;
                }
            }
            self.expect(VaToken::Semi)?;
            return Ok(ModuleItem::VariableDecl {
                ty,
                names,
                span: start.merge(&self.prev_span()),
            });
        }

        if self.eat(VaToken::Parameter) {
            let ty = self.parse_scalar_type().ok_or_else(|| ParseError::ExpectedButGot {
                expected: "real|integer|string".to_string(),
                found: format!("{:?}", self.current()),
                span: self.current_span(),
            })?;
            let name = self.expect_identifier()?;
            self.expect(VaToken::Assign)?;
            let init = self.parse_expr()?;
            let mut ranges = Vec::new();
            loop {
                if self.eat(VaToken::From) {
                    self.expect(VaToken::LBracket)?;
                    let lo = self.parse_expr()?;
                    self.expect(VaToken::Colon)?;
                    let hi = self.parse_expr()?;
                    self.expect(VaToken::RBracket)?;
                    ranges.push(ParamRange::From { lo, hi });
                } else if self.eat(VaToken::Exclude) {
                    ranges.push(ParamRange::Exclude(self.parse_expr()?));
                } else {
                    break;
                }
            }
            self.expect(VaToken::Semi)?;
            return Ok(ModuleItem::ParameterDecl {
                ty,
                name,
                init,
                ranges,
                span: start.merge(&self.prev_span()),
            });
        }

        if self.eat(VaToken::Branch) {
            self.expect(VaToken::LParen)?;
            let net1 = self.expect_identifier()?;
            let net2 = if self.eat(VaToken::Comma) {
                Some(self.expect_identifier()?)
            } else {
                None
            };
            self.expect(VaToken::RParen)?;
            let name = if matches!(self.current(), VaToken::Identifier(_)) {
                Some(self.expect_identifier()?)
            } else {
                None
            };
            self.expect(VaToken::Semi)?;
            return Ok(ModuleItem::BranchDecl {
                name,
                net1,
                net2,
                span: start.merge(&self.prev_span()),
            });
        }

        if self.eat(VaToken::Analog) {
            let stmt = self.parse_stmt()?;
            return Ok(ModuleItem::Analog(stmt));
        }

        // Bare net declaration: `discipline_name name, ... ;`
        if matches!(self.current(), VaToken::Identifier(_)) {
            let discipline = self.expect_identifier()?;
            let names = self.parse_identifier_list()?;
            self.expect(VaToken::Semi)?;
            return Ok(ModuleItem::NetDecl {
                discipline,
                names,
                span: start.merge(&self.prev_span()),
            });
        }

        Err(ParseError::UnexpectedToken { span: start })
    }

    /// Heuristic used by `PortDecl` to decide whether the identifier right
    /// after a direction keyword is a discipline name (followed by more
    /// names) or is itself the first port name. A discipline name is
    /// followed directly by another identifier before any `,`/`;`.
    fn peek_is_discipline_then_names(&self) -> bool {
        matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(VaToken::Identifier(_)))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        match self.current().clone() {
            VaToken::Begin => self.parse_block(),
            VaToken::If => self.parse_if(),
            VaToken::Case => self.parse_case(),
            VaToken::For => self.parse_for(),
            VaToken::SystemIdentifier(name) => {
                self.advance();
                let mut args = Vec::new();
                if self.eat(VaToken::LParen) {
                    if !self.at(VaToken::RParen) {
                        args.push(self.parse_expr()?);
                        while self.eat(VaToken::Comma) {
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.expect(VaToken::RParen)?;
                }
                self.expect(VaToken::Semi)?;
                Ok(Stmt::SystemTaskCall {
                    name,
                    args,
                    span: start.merge(&self.prev_span()),
                })
            }
            VaToken::Identifier(name) => {
                // Either `accessor(net1[,net2]) <+ expr;` or `lvalue = expr;`.
                if matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(VaToken::LParen)) {
                    self.advance();
                    self.advance();
                    let net1 = self.expect_identifier()?;
                    let net2 = if self.eat(VaToken::Comma) {
                        Some(self.expect_identifier()?)
                    } else {
                        None
                    };
                    self.expect(VaToken::RParen)?;
                    self.expect(VaToken::ContributionOp)?;
                    let value = self.parse_expr()?;
                    self.expect(VaToken::Semi)?;
                    return Ok(Stmt::Contribution {
                        accessor: name,
                        net1,
                        net2,
                        value,
                        span: start.merge(&self.prev_span()),
                    });
                }
                self.advance();
                self.expect(VaToken::Assign)?;
                let value = self.parse_expr()?;
                self.expect(VaToken::Semi)?;
                Ok(Stmt::Assignment {
                    lvalue: name,
                    value,
                    span: start.merge(&self.prev_span()),
                })
            }
            _ => Err(ParseError::UnexpectedToken { span: start }),
        }
    }

    fn parse_block(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(VaToken::Begin)?;
        let mut locals = Vec::new();
        while self.parse_scalar_type_peek() {
            locals.push(self.parse_local_decl()?);
        }
        let mut statements = Vec::new();
        while !self.at(VaToken::End) {
            if self.at_eof() {
                return Err(ParseError::UnterminatedConstruct {
                    what: "begin/end block".to_string(),
                    span: start,
                });
            }
            statements.push(self.parse_stmt()?);
        }
        self.expect(VaToken::End)?;
        Ok(Stmt::Block {
            locals,
            statements,
            span: start.merge(&self.prev_span()),
        })
    }

    fn parse_scalar_type_peek(&self) -> bool {
        matches!(
            self.current(),
            VaToken::RealType | VaToken::IntegerType | VaToken::StringType
        )
    }

    fn parse_local_decl(&mut self) -> Result<ModuleItem, ParseError> {
        let start = self.current_span();
        let ty = self.parse_scalar_type().expect("caller checked parse_scalar_type_peek");
        let mut names = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let init = if self.eat(VaToken::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            names.push((name, init));
            if !self.eat(VaToken::Comma) {
                break;
            }
        }
        self.expect(VaToken::Semi)?;
        Ok(ModuleItem::VariableDecl {
            ty,
            names,
            span: start.merge(&self.prev_span()),
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(VaToken::If)?;
        self.expect(VaToken::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(VaToken::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(VaToken::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            span: start.merge(&self.prev_span()),
        })
    }

    fn parse_case(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(VaToken::Case)?;
        self.expect(VaToken::LParen)?;
        let selector = self.parse_expr()?;
        self.expect(VaToken::RParen)?;
        let mut arms = Vec::new();
        let mut default = None;
        while !self.at(VaToken::EndCase) {
            if self.at_eof() {
                return Err(ParseError::UnterminatedConstruct {
                    what: "case".to_string(),
                    span: start,
                });
            }
            if self.eat(VaToken::Default) {
                self.expect(VaToken::Colon)?;
                default = Some(Box::new(self.parse_stmt()?));
                continue;
            }
            let mut values = vec![self.parse_expr()?];
            while self.eat(VaToken::Comma) {
                values.push(self.parse_expr()?);
            }
            self.expect(VaToken::Colon)?;
            let body = self.parse_stmt()?;
            arms.push(CaseArm { values, body });
        }
        self.expect(VaToken::EndCase)?;
        Ok(Stmt::Case {
            selector,
            arms,
            default,
            span: start.merge(&self.prev_span()),
        })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(VaToken::For)?;
        self.expect(VaToken::LParen)?;
        let init = Box::new(self.parse_simple_assignment()?);
        self.expect(VaToken::Semi)?;
        let condition = self.parse_expr()?;
        self.expect(VaToken::Semi)?;
        let step = Box::new(self.parse_simple_assignment()?);
        self.expect(VaToken::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For {
            init,
            condition,
            step,
            body,
            span: start.merge(&self.prev_span()),
        })
    }

    fn parse_simple_assignment(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let lvalue = self.expect_identifier()?;
        self.expect(VaToken::Assign)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assignment {
            lvalue,
            value,
            span: start.merge(&self.prev_span()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_lexer::{lex, preprocessor::preprocess};
    use va_source::{FileId, SourceDb};

    fn parse_src(src: &str) -> SourceFile {
        let mut db = SourceDb::new();
        let id = db.add_source("t.va", src.to_string());
        let tokens = lex(src, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        parse(tokens).unwrap()
    }

    #[test]
    fn parses_minimal_module() {
        let file = parse_src("module m(); real x; analog x = 3.5; endmodule");
        assert_eq!(file.items.len(), 1);
        match &file.items[0] {
            Item::Module(m) => {
                assert_eq!(m.name, "m");
                assert_eq!(m.items.len(), 2);
            }
            _ => panic!("expected module"),
        }
    }

    #[test]
    fn parses_ports_with_discipline() {
        let file = parse_src(
            "module m(n1,n2); inout electrical n1,n2; parameter real R=1; analog I(n1,n2) <+ V(n1,n2)/R; endmodule",
        );
        let Item::Module(m) = &file.items[0] else { panic!("expected module") };
        assert_eq!(m.port_names, vec!["n1", "n2"]);
        assert!(matches!(m.items[0], ModuleItem::PortDecl { .. }));
        assert!(matches!(m.items[1], ModuleItem::ParameterDecl { .. }));
        assert!(matches!(m.items[2], ModuleItem::Analog(Stmt::Contribution { .. })));
    }

    #[test]
    fn parses_nature_and_discipline() {
        let file = parse_src(
            "nature Voltage units=\"V\"; abstol=1e-6; access=V; endnature \
             discipline electrical domain continuous; potential Voltage; flow Current; enddiscipline \
             module m(); endmodule",
        );
        assert_eq!(file.items.len(), 3);
        assert!(matches!(file.items[0], Item::Nature(_)));
        assert!(matches!(file.items[1], Item::Discipline(_)));
        assert!(matches!(file.items[2], Item::Module(_)));
    }

    #[test]
    fn parses_nested_if_else() {
        let file = parse_src(
            "module m(); real a,b,c; analog if (a) if (b) c=3; else c=1; else if (b) c=2; else c=0; endmodule",
        );
        let Item::Module(m) = &file.items[0] else { panic!("expected module") };
        assert!(matches!(m.items.last().unwrap(), ModuleItem::Analog(Stmt::If { .. })));
    }

    #[test]
    fn parses_begin_end_block() {
        let file = parse_src("module m(); integer i; real r; analog begin r = 2; i = r * 3; end endmodule");
        let Item::Module(m) = &file.items[0] else { panic!("expected module") };
        match m.items.last().unwrap() {
            ModuleItem::Analog(Stmt::Block { statements, .. }) => assert_eq!(statements.len(), 2),
            _ => panic!("expected analog block"),
        }
    }

    #[test]
    fn unexpected_token_errors() {
        let mut db = SourceDb::new();
        let src = "module m(); ; endmodule";
        let id = db.add_source("t.va", src.to_string());
        let tokens = lex(src, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        assert!(parse(tokens).is_err());
    }

    #[test]
    fn unterminated_module_errors() {
        let mut db = SourceDb::new();
        let src = "module m(); real x;";
        let id = db.add_source("t.va", src.to_string());
        let tokens = lex(src, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        assert!(parse(tokens).is_err());
    }
}
