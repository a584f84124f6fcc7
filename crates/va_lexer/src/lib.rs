//! Lexing and macro preprocessing for the Verilog-A analog subset.
//!
//! The lexer (§4.1) turns source bytes into a token stream carrying
//! `(file, line, column)` origin; the preprocessor (§4.2) consumes that
//! stream and resolves `` `define``/`` `ifdef``/`` `include`` directives
//! and macro calls into an expanded token stream with origin chains
//! unwound back through every expansion site.

#![warn(missing_docs)]

pub mod errors;
pub mod lexer;
pub mod preprocessor;
pub mod token;

pub use errors::{LexError, PreprocessError};
pub use lexer::{lex, Lexer};
pub use preprocessor::{preprocess, Macro};
pub use token::{Token, VaToken};
