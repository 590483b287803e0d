//! # Introduction
//!
//! `cuppa3` is the syntax front end of Cuppa3, a small imperative teaching
//! language. It turns source text, or a token stream built by another lexer,
//! into a tagged Abstract Syntax Tree for a downstream interpreter or
//! compiler, and ships a terminal viewer for exploring that tree with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → (tuple / JSON output | TUI)
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds the AST; [`parser::parse`]
//!    is the one-call entry point.
//! 2. [`ui`]: ratatui-based AST viewer; not part of the stable library API.
//!
//! ## Language summary
//!
//! Statements: `declare` (variables and functions), assignment (including
//! list literals), `get`, `put`, calls, `return`, `while`, `if/else`, blocks.
//! Expressions: integers, identifiers, calls, point and range indexing,
//! `+ - * / == <=`, unary `-` and `not`. Semicolons are optional.
//!
//! ```
//! let ast = cuppa3::parser::parse("declare x = 1 + 2 * 3;").unwrap();
//! assert_eq!(
//!     ast.to_string(),
//!     "('seq', ('declare', 'x', ('+', ('integer', 1), ('*', ('integer', 2), ('integer', 3)))), ('nil',))"
//! );
//! ```

pub mod parser;
pub mod ui;
