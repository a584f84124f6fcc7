//! Pratt expression parser (§4.3).
//!
//! Binding powers, low to high:
//!
//! | BP (L,R) | Operators |
//! |----------|-----------|
//! | special  | `? :` (right-assoc, lowest) |
//! | (6,7)    | `||` |
//! | (8,9)    | `&&` |
//! | (10,11)  | `|` |
//! | (12,13)  | `^` `^~` `~^` |
//! | (14,15)  | `&` |
//! | (16,17)  | `==` `!=` |
//! | (18,19)  | `<` `<=` `>` `>=` |
//! | (20,21)  | `<<` `>>` |
//! | (22,23)  | `+` `-` |
//! | (24,25)  | `*` `/` `%` |
//! | (26,27)  | `**` (left-assoc: a deliberate deviation from standard
//! |          | Verilog-A's right-associative `**`, §9) |
//! | prefix 28 | unary `+` `-` `!` `~` |

use va_lexer::VaToken;
use va_source::Span;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::errors::ParseError;
use crate::parser::Parser;

fn infix_binding_power(tok: &VaToken) -> Option<(BinaryOp, u8, u8)> {
    use VaToken::*;
    Some(match tok {
        OrOr => (BinaryOp::LogOr, 6, 7),
        AndAnd => (BinaryOp::LogAnd, 8, 9),
        Pipe => (BinaryOp::BitOr, 10, 11),
        Caret => (BinaryOp::BitXor, 12, 13),
        XnorCaretTilde | XnorTildeCaret => (BinaryOp::BitXnor, 12, 13),
        Amp => (BinaryOp::BitAnd, 14, 15),
        Eq => (BinaryOp::Eq, 16, 17),
        Neq => (BinaryOp::Neq, 16, 17),
        Lt => (BinaryOp::Lt, 18, 19),
        Le => (BinaryOp::Le, 18, 19),
        Gt => (BinaryOp::Gt, 18, 19),
        Ge => (BinaryOp::Ge, 18, 19),
        Shl => (BinaryOp::Shl, 20, 21),
        Shr => (BinaryOp::Shr, 20, 21),
        Plus => (BinaryOp::Add, 22, 23),
        Minus => (BinaryOp::Sub, 22, 23),
        Star => (BinaryOp::Mul, 24, 25),
        Slash => (BinaryOp::Div, 24, 25),
        Percent => (BinaryOp::Mod, 24, 25),
        StarStar => (BinaryOp::Pow, 26, 27),
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parses a full expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix_expr()?;

        loop {
            if self.at(VaToken::Question) && min_bp == 0 {
                let q_span = self.current_span();
                self.advance();
                let then_expr = self.parse_expr_bp(0)?;
                self.expect(VaToken::Colon)?;
                let else_expr = self.parse_expr_bp(0)?;
                let span = lhs.span().merge(&else_expr.span()).merge(&q_span);
                lhs = Expr::Ternary {
                    condition: Box::new(lhs),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                    span,
                };
                continue;
            }

            let Some((op, l_bp, r_bp)) = infix_binding_power(self.current()) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;
            let span = lhs.span().merge(&rhs.span());
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }

        Ok(lhs)
    }

    fn parse_prefix_expr(&mut self) -> Result<Expr, ParseError> {
        const PREFIX_BP: u8 = 28;
        let op = match self.current() {
            VaToken::Plus => Some(UnaryOp::Plus),
            VaToken::Minus => Some(UnaryOp::Neg),
            VaToken::Bang => Some(UnaryOp::Not),
            VaToken::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            let op_span = self.current_span();
            self.advance();
            let operand = self.parse_expr_bp(PREFIX_BP)?;
            let span = op_span.merge(&operand.span());
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        match self.current().clone() {
            VaToken::IntLiteral(v) => {
                self.advance();
                Ok(Expr::IntLiteral(v, span))
            }
            VaToken::RealLiteral(v) => {
                self.advance();
                Ok(Expr::RealLiteral(v, span))
            }
            VaToken::StringLiteral(v) => {
                self.advance();
                Ok(Expr::StringLiteral(v, span))
            }
            VaToken::SystemIdentifier(name) => {
                self.advance();
                Ok(Expr::SystemIdentifier(name, span))
            }
            VaToken::Identifier(name) => {
                self.advance();
                if self.eat(VaToken::LParen) {
                    let args = self.parse_call_args()?;
                    let end_span = self.prev_span();
                    Ok(Expr::Call {
                        callee: name,
                        args,
                        span: span.merge(&end_span),
                    })
                } else {
                    Ok(Expr::Identifier(name, span))
                }
            }
            VaToken::LParen => {
                self.advance();
                let inner = self.parse_expr_bp(0)?;
                self.expect(VaToken::RParen)?;
                Ok(inner)
            }
            _ => Err(ParseError::UnexpectedToken { span }),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.at(VaToken::RParen) {
            args.push(self.parse_expr_bp(0)?);
            while self.eat(VaToken::Comma) {
                args.push(self.parse_expr_bp(0)?);
            }
        }
        self.expect(VaToken::RParen)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use va_lexer::lex;
    use va_source::FileId;

    fn parse(src: &str) -> Expr {
        let tokens = lex(src, FileId::from_raw(0)).unwrap();
        let mut p = Parser::new(tokens);
        p.parse_expr().unwrap()
    }

    #[test]
    fn precedence_mul_over_add() {
        let e = parse("1 + 2 * 3");
        match e {
            Expr::Binary { op: BinaryOp::Add, rhs, .. } => {
                assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            _ => panic!("expected addition at top level"),
        }
    }

    #[test]
    fn pow_is_left_associative() {
        // 2 ** 3 ** 2 must parse as (2**3)**2, not 2**(3**2).
        let e = parse("2 ** 3 ** 2");
        match e {
            Expr::Binary { op: BinaryOp::Pow, lhs, .. } => {
                assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::Pow, .. }));
            }
            _ => panic!("expected pow at top level"),
        }
    }

    #[test]
    fn ternary_is_right_associative() {
        let e = parse("1 ? 2 : 3 ? 4 : 5");
        match e {
            Expr::Ternary { else_expr, .. } => {
                assert!(matches!(*else_expr, Expr::Ternary { .. }));
            }
            _ => panic!("expected ternary at top level"),
        }
    }

    #[test]
    fn function_call_parses_arguments() {
        let e = parse("pow(2, 3)");
        match e {
            Expr::Call { callee, args, .. } => {
                assert_eq!(callee, "pow");
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn parenthesized_expression_overrides_precedence() {
        let e = parse("(1 + 2) * 3");
        match e {
            Expr::Binary { op: BinaryOp::Mul, lhs, .. } => {
                assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::Add, .. }));
            }
            _ => panic!("expected multiplication at top level"),
        }
    }
}
