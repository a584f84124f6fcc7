//! Token-level macro preprocessor (§4.2).
//!
//! Consumes a token stream (typically straight from [`crate::lexer::lex`])
//! and yields an expanded stream with `` `define``/`` `ifdef``/``
//! `include``/macro-call directives resolved, carrying origin chains that
//! unwind back through every expansion and inclusion site (§3, §9.1).

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use va_source::{OriginFrame, SourceDb, Span};

use crate::errors::PreprocessError;
use crate::lexer;
use crate::token::{Token, VaToken};

/// A function-like macro's definition: its formal parameters and
/// unexpanded body tokens.
#[derive(Clone)]
pub struct Macro {
    /// Formal parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// The macro body, with parameter-name identifiers left unsubstituted.
    pub body: Vec<Token>,
}

impl Macro {
    /// Substitutes `arguments` (one token sequence per parameter, in
    /// parameter order) for parameter references in the body, yielding
    /// the expanded token sequence.
    fn substitute(&self, arguments: &[Vec<Token>]) -> Vec<Token> {
        let mut out = Vec::new();
        for tok in &self.body {
            if let VaToken::Identifier(name) = &tok.kind {
                if let Some(idx) = self.parameters.iter().position(|p| p == name) {
                    out.extend(arguments[idx].iter().cloned());
                    continue;
                }
            }
            out.push(tok.clone());
        }
        out
    }
}

enum Definition {
    Object(Vec<Token>),
    Function(Macro),
}

enum BlockKind {
    Outer,
    If,
    Parentheses,
}

/// The outcome of consuming a bounded block: the tokens collected, and
/// (for `BlockKind::If`) which directive terminated it.
struct BlockResult {
    tokens: Vec<Token>,
    terminator: Option<String>,
}

/// Preprocesses a complete token stream (§4.2).
///
/// `source_db` is used to resolve `` `include`` paths and to register
/// newly loaded include files; `include_dirs` is the search path consulted
/// after the current file's own directory.
pub fn preprocess(
    tokens: Vec<Token>,
    source_db: &mut SourceDb,
    include_dirs: &[PathBuf],
) -> Result<Vec<Token>, PreprocessError> {
    let mut pp = Preprocessor {
        source_db,
        include_dirs: include_dirs.to_vec(),
        definitions: HashMap::new(),
    };
    let mut cursor = Cursor::new(tokens);
    let result = pp.preprocess_block(&mut cursor, BlockKind::Outer)?;
    Ok(result.tokens)
}

struct Cursor {
    pending: VecDeque<Token>,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            pending: tokens.into(),
        }
    }

    fn next(&mut self) -> Option<Token> {
        self.pending.pop_front()
    }

    fn peek(&self) -> Option<&Token> {
        self.pending.front()
    }

    /// Splices `tokens` in front of the remaining stream (used by
    /// `` `include``, matching `itertools::chain(included, self.tokens)`
    /// in the reference implementation).
    fn prepend(&mut self, tokens: Vec<Token>) {
        for tok in tokens.into_iter().rev() {
            self.pending.push_front(tok);
        }
    }
}

fn push_call_site(span: &Span, call_site: &Span, source_db: &SourceDb) -> Span {
    let (line, column) = source_db.get_file(call_site.file).line_col(call_site.start);
    let frame = OriginFrame::new(call_site.file, line, column);
    let mut origin = span.origin.clone();
    origin.push(frame);
    origin.extend(call_site.origin.iter().cloned());
    Span {
        file: span.file,
        start: span.start,
        end: span.end,
        origin,
    }
}

struct Preprocessor<'a> {
    source_db: &'a mut SourceDb,
    include_dirs: Vec<PathBuf>,
    definitions: HashMap<String, Definition>,
}

impl<'a> Preprocessor<'a> {
    fn preprocess_block(
        &mut self,
        cursor: &mut Cursor,
        kind: BlockKind,
    ) -> Result<BlockResult, PreprocessError> {
        let mut out = Vec::new();
        let mut paren_depth: i32 = 0;

        loop {
            let Some(tok) = cursor.next() else {
                return Ok(BlockResult {
                    tokens: out,
                    terminator: None,
                });
            };

            let name = match &tok.kind {
                VaToken::Directive(name) => name.clone(),
                VaToken::LParen => {
                    paren_depth += 1;
                    out.push(tok);
                    continue;
                }
                VaToken::Newline => continue,
                VaToken::RParen => {
                    if matches!(kind, BlockKind::Parentheses) && paren_depth == 0 {
                        // Put the terminator back so the caller (which
                        // expects to consume it itself) sees it.
                        cursor.pending.push_front(tok);
                        return Ok(BlockResult {
                            tokens: out,
                            terminator: Some(")".to_string()),
                        });
                    }
                    paren_depth -= 1;
                    out.push(tok);
                    continue;
                }
                _ => {
                    out.push(tok);
                    continue;
                }
            };

            match name.as_str() {
                "define" => self.consume_definition(cursor)?,
                "ifdef" => {
                    let nested = self.process_ifdef(cursor, &tok.span)?;
                    out.extend(nested);
                }
                "else" | "endif" => {
                    if matches!(kind, BlockKind::If) {
                        return Ok(BlockResult {
                            tokens: out,
                            terminator: Some(name),
                        });
                    }
                    return Err(PreprocessError::StrayDirective {
                        directive: name,
                        span: tok.span,
                    });
                }
                "include" => self.process_include(cursor, &tok.span)?,
                _ if self.definitions.contains_key(&name) => {
                    let expanded = self.evaluate_macro(cursor, &name, &tok.span)?;
                    out.extend(expanded);
                }
                _ => {
                    return Err(PreprocessError::UndefinedMacro {
                        name,
                        span: tok.span,
                    })
                }
            }
        }
    }

    /// Consumes `NAME body...` or `NAME(p1,...) body...` up to (not
    /// including) the next unescaped newline, per §4.2 and §9.1.
    fn consume_definition(&mut self, cursor: &mut Cursor) -> Result<(), PreprocessError> {
        let name_tok = cursor.next().ok_or_else(|| PreprocessError::UnterminatedMacroArgs {
            name: "define".to_string(),
            span: Span::DUMMY,
        })?;
        let name = match name_tok.kind {
            VaToken::Identifier(n) => n,
            _ => {
                return Err(PreprocessError::UndefinedMacro {
                    name: "<malformed define>".to_string(),
                    span: name_tok.span,
                })
            }
        };

        let mut body = Vec::new();
        loop {
            let Some(tok) = cursor.next() else { break };
            match tok.kind {
                VaToken::Continuation => continue,
                VaToken::Newline => break,
                _ => body.push(tok),
            }
        }

        if body.first().map(|t| matches!(t.kind, VaToken::LParen)) == Some(true) {
            body.remove(0);
            let mut parameters = Vec::new();
            loop {
                if body.is_empty() {
                    break;
                }
                let first = body.remove(0);
                match first.kind {
                    VaToken::Identifier(p) => parameters.push(p),
                    _ => break,
                }
                if body.is_empty() {
                    break;
                }
                match body[0].kind {
                    VaToken::RParen => {
                        body.remove(0);
                        break;
                    }
                    VaToken::Comma => {
                        body.remove(0);
                    }
                    _ => break,
                }
            }
            self.definitions
                .insert(name, Definition::Function(Macro { parameters, body }));
        } else {
            self.definitions.insert(name, Definition::Object(body));
        }
        Ok(())
    }

    /// Expands the macro call starting at `name`/`call_span` and feeds the
    /// result back through [`Self::preprocess_block`] before returning it,
    /// so that directives and nested macro calls inside the expansion
    /// resolve (§4.2 "the expansion is itself preprocessed"), matching the
    /// original implementation's `macrocall()` wrapping the expansion in a
    /// fresh preprocessor pass.
    fn evaluate_macro(
        &mut self,
        cursor: &mut Cursor,
        name: &str,
        call_span: &Span,
    ) -> Result<Vec<Token>, PreprocessError> {
        let raw = match self.definitions.get(name).unwrap() {
            Definition::Object(body) => {
                let body = body.clone();
                body.into_iter()
                    .map(|t| {
                        let span = push_call_site(&t.span, call_span, self.source_db);
                        Token::new(t.kind, span)
                    })
                    .collect()
            }
            Definition::Function(mac) => {
                let mac = mac.clone();
                match cursor.next() {
                    Some(t) if matches!(t.kind, VaToken::LParen) => {}
                    _ => {
                        return Err(PreprocessError::UnterminatedMacroArgs {
                            name: name.to_string(),
                            span: call_span.clone(),
                        })
                    }
                }
                let block = self.preprocess_block(cursor, BlockKind::Parentheses)?;
                // Consume the terminating ')'.
                match cursor.next() {
                    Some(t) if matches!(t.kind, VaToken::RParen) => {}
                    _ => {
                        return Err(PreprocessError::UnterminatedMacroArgs {
                            name: name.to_string(),
                            span: call_span.clone(),
                        })
                    }
                }
                let arguments = split_on_top_level_comma(block.tokens);
                if arguments.len() != mac.parameters.len() {
                    return Err(PreprocessError::WrongMacroArity {
                        name: name.to_string(),
                        expected: mac.parameters.len(),
                        got: arguments.len(),
                        span: call_span.clone(),
                    });
                }
                let expanded = mac.substitute(&arguments);
                expanded
                    .into_iter()
                    .map(|t| {
                        let span = push_call_site(&t.span, call_span, self.source_db);
                        Token::new(t.kind, span)
                    })
                    .collect()
            }
        };

        let mut sub_cursor = Cursor::new(raw);
        let reexpanded = self.preprocess_block(&mut sub_cursor, BlockKind::Outer)?;
        Ok(reexpanded.tokens)
    }

    fn process_ifdef(
        &mut self,
        cursor: &mut Cursor,
        directive_span: &Span,
    ) -> Result<Vec<Token>, PreprocessError> {
        let query_tok = cursor.next().ok_or_else(|| PreprocessError::UnterminatedIfdef {
            span: directive_span.clone(),
        })?;
        let query = match query_tok.kind {
            VaToken::Identifier(n) => n,
            _ => {
                return Err(PreprocessError::UnterminatedIfdef {
                    span: directive_span.clone(),
                })
            }
        };
        let found = self.definitions.contains_key(&query);

        if found {
            let block = self.preprocess_block(cursor, BlockKind::If)?;
            match block.terminator.as_deref() {
                Some("endif") => Ok(block.tokens),
                Some("else") => {
                    self.skip_ifblock(cursor, directive_span)?;
                    Ok(block.tokens)
                }
                _ => Err(PreprocessError::UnterminatedIfdef {
                    span: directive_span.clone(),
                }),
            }
        } else {
            let terminator = self.skip_ifblock(cursor, directive_span)?;
            if terminator == "endif" {
                Ok(Vec::new())
            } else {
                let block = self.preprocess_block(cursor, BlockKind::If)?;
                Ok(block.tokens)
            }
        }
    }

    /// Skips tokens (counting nested `ifdef`/`endif`) until a bare
    /// `` `else`` or `` `endif`` at this nesting level, returning which one.
    fn skip_ifblock(&mut self, cursor: &mut Cursor, start_span: &Span) -> Result<String, PreprocessError> {
        let mut depth = 0;
        loop {
            let Some(tok) = cursor.next() else {
                return Err(PreprocessError::UnterminatedIfdef {
                    span: start_span.clone(),
                });
            };
            if let VaToken::Directive(name) = &tok.kind {
                match name.as_str() {
                    "ifdef" => depth += 1,
                    "endif" if depth > 0 => depth -= 1,
                    "endif" => return Ok("endif".to_string()),
                    "else" if depth == 0 => return Ok("else".to_string()),
                    _ => {}
                }
            }
        }
    }

    fn process_include(&mut self, cursor: &mut Cursor, directive_span: &Span) -> Result<(), PreprocessError> {
        let filename_tok = cursor.next().ok_or_else(|| PreprocessError::IncludeNotFound {
            filename: String::new(),
            span: directive_span.clone(),
        })?;
        let filename = match filename_tok.kind {
            VaToken::StringLiteral(s) => s,
            _ => {
                return Err(PreprocessError::IncludeNotFound {
                    filename: String::new(),
                    span: directive_span.clone(),
                })
            }
        };

        let candidate = self.resolve_include_path(&filename, directive_span)?;
        let file_id = self
            .source_db
            .load_file(&candidate)
            .map_err(|_| PreprocessError::IncludeNotFound {
                filename: filename.clone(),
                span: directive_span.clone(),
            })?;
        let content = self.source_db.get_file(file_id).content().to_string();
        let included_tokens = lexer::lex(&content, file_id)?;
        // Drop the Eof sentinel from the included file; the parent stream
        // supplies its own.
        let included_tokens: Vec<Token> = included_tokens
            .into_iter()
            .filter(|t| !matches!(t.kind, VaToken::Eof))
            .map(|t| {
                let span = push_call_site(&t.span, directive_span, self.source_db);
                Token::new(t.kind, span)
            })
            .collect();
        cursor.prepend(included_tokens);
        Ok(())
    }

    fn resolve_include_path(&self, filename: &str, directive_span: &Span) -> Result<PathBuf, PreprocessError> {
        let path = Path::new(filename);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let current_dir = self
            .source_db
            .get_file(directive_span.file)
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let candidate = current_dir.join(filename);
        if candidate.exists() {
            return Ok(candidate);
        }
        for dir in &self.include_dirs {
            let candidate = dir.join(filename);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(PreprocessError::IncludeNotFound {
            filename: filename.to_string(),
            span: directive_span.clone(),
        })
    }
}

/// Splits a token sequence on top-level (parenthesis-depth-0) commas, used
/// to separate a function-like macro call's arguments.
fn split_on_top_level_comma(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0i32;
    for tok in tokens {
        match &tok.kind {
            VaToken::LParen => {
                depth += 1;
                current.push(tok);
            }
            VaToken::RParen => {
                depth -= 1;
                current.push(tok);
            }
            VaToken::Comma if depth == 0 => {
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(tok),
        }
    }
    groups.push(current);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_source::FileId;

    fn kinds_of(tokens: &[Token]) -> Vec<VaToken> {
        tokens.iter().map(|t| t.kind.clone()).collect()
    }

    fn run(src: &str) -> Vec<VaToken> {
        let mut db = SourceDb::new();
        let id = db.add_source("t.va", src.to_string());
        let tokens = lexer::lex(src, id).unwrap();
        let expanded = preprocess(tokens, &mut db, &[]).unwrap();
        kinds_of(&expanded)
            .into_iter()
            .filter(|k| !matches!(k, VaToken::Newline | VaToken::Eof))
            .collect()
    }

    #[test]
    fn object_like_macro_expansion() {
        let toks = run("`define TWO 2\n`TWO");
        assert_eq!(toks, vec![VaToken::IntLiteral(2)]);
    }

    #[test]
    fn function_like_macro_expansion_matches_testable_property() {
        // `define ADD(y,x) x+y\n`ADD(2*3, 4*5)` => `4 * 5 + 2 * 3`
        let toks = run("`define ADD(y,x) x+y\n`ADD(2*3, 4*5)");
        assert_eq!(
            toks,
            vec![
                VaToken::IntLiteral(4),
                VaToken::Star,
                VaToken::IntLiteral(5),
                VaToken::Plus,
                VaToken::IntLiteral(2),
                VaToken::Star,
                VaToken::IntLiteral(3),
            ]
        );
    }

    #[test]
    fn macro_call_inside_macro_body_is_reexpanded() {
        // `define` bodies may themselves reference other macros (§4.2);
        // the inner call must resolve before the outer expansion is
        // spliced into the surrounding stream.
        let toks = run("`define TWO 2\n`define DOUBLE(x) x*`TWO\n`DOUBLE(5)");
        assert_eq!(
            toks,
            vec![VaToken::IntLiteral(5), VaToken::Star, VaToken::IntLiteral(2)]
        );
    }

    #[test]
    fn wrong_arity_errors() {
        let mut db = SourceDb::new();
        let src = "`define ADD(y,x) x+y\n`ADD(1)";
        let id = db.add_source("t.va", src.to_string());
        let tokens = lexer::lex(src, id).unwrap();
        let err = preprocess(tokens, &mut db, &[]).unwrap_err();
        assert!(matches!(err, PreprocessError::WrongMacroArity { .. }));
    }

    #[test]
    fn undefined_macro_errors() {
        let mut db = SourceDb::new();
        let src = "`NOPE";
        let id = db.add_source("t.va", src.to_string());
        let tokens = lexer::lex(src, id).unwrap();
        let err = preprocess(tokens, &mut db, &[]).unwrap_err();
        assert!(matches!(err, PreprocessError::UndefinedMacro { .. }));
    }

    #[test]
    fn ifdef_true_branch() {
        let toks = run("`define FOO\n`ifdef FOO\n1\n`else\n2\n`endif");
        assert_eq!(toks, vec![VaToken::IntLiteral(1)]);
    }

    #[test]
    fn ifdef_false_branch() {
        let toks = run("`ifdef FOO\n1\n`else\n2\n`endif");
        assert_eq!(toks, vec![VaToken::IntLiteral(2)]);
    }

    #[test]
    fn ifdef_no_else() {
        let toks = run("`ifdef FOO\n1\n`endif\n2");
        assert_eq!(toks, vec![VaToken::IntLiteral(2)]);
    }

    #[test]
    fn nested_ifdef_skipping() {
        let toks = run("`ifdef OUTER\n`ifdef INNER\n1\n`endif\n`else\n2\n`endif");
        assert_eq!(toks, vec![VaToken::IntLiteral(2)]);
    }

    #[test]
    fn stray_endif_errors() {
        let mut db = SourceDb::new();
        let src = "`endif";
        let id = db.add_source("t.va", src.to_string());
        let tokens = lexer::lex(src, id).unwrap();
        let err = preprocess(tokens, &mut db, &[]).unwrap_err();
        assert!(matches!(err, PreprocessError::StrayDirective { .. }));
    }

    #[test]
    fn macro_expansion_preserves_call_site_in_origin() {
        let mut db = SourceDb::new();
        let src = "`define ONE 1\n`ONE";
        let id = db.add_source("t.va", src.to_string());
        let tokens = lexer::lex(src, id).unwrap();
        let expanded = preprocess(tokens, &mut db, &[]).unwrap();
        let one = expanded
            .iter()
            .find(|t| matches!(t.kind, VaToken::IntLiteral(1)))
            .unwrap();
        assert!(!one.span.origin.is_empty(), "expanded token should carry a call-site frame");
    }

    #[test]
    fn include_inlines_file_contents() {
        let dir = std::env::temp_dir().join(format!("va_pp_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let included_path = dir.join("inc.va");
        std::fs::write(&included_path, "42").unwrap();

        let mut db = SourceDb::new();
        let main_path = dir.join("main.va");
        let src = "`include \"inc.va\"".to_string();
        std::fs::write(&main_path, &src).unwrap();
        let id = db.load_file(&main_path).unwrap();
        let tokens = lexer::lex(&src, id).unwrap();
        let expanded = preprocess(tokens, &mut db, &[]).unwrap();
        let kinds: Vec<_> = expanded
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, VaToken::Newline | VaToken::Eof))
            .collect();
        assert_eq!(kinds, vec![VaToken::IntLiteral(42)]);

        std::fs::remove_file(&included_path).unwrap();
        std::fs::remove_file(&main_path).unwrap();
        std::fs::remove_dir(&dir).unwrap();
    }

    #[test]
    fn include_not_found_errors() {
        let mut db = SourceDb::new();
        let id = db.add_source("main.va", "`include \"nope.va\"".to_string());
        let tokens = lexer::lex("`include \"nope.va\"", id).unwrap();
        let err = preprocess(tokens, &mut db, &[]).unwrap_err();
        assert!(matches!(err, PreprocessError::IncludeNotFound { .. }));
    }
}
