//! Cuppa3 source code parser
//!
//! This module transforms Cuppa3 source text (or a ready-made token stream)
//! into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), with statement and expression
//!   productions split into their own files
//! - [`ast`]: AST node definitions and their tuple/JSON renderings
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary
//! operators. The first syntax error aborts the parse; there is no recovery
//! and no partial tree.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use ast::{BinOp, Child, Node, SliceSpec, SourceLocation};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parse::{ParseError, Parser};

/// Tokenize and parse a whole program, returning its statement list.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    Parser::new(source)?.parse_program()
}
