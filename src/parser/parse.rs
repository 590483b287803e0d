//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: statement productions and the optional fragments they use
//! - `expressions`: expressions, with precedence climbing for binary operators
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token at `location` matches no continuation of the grammar.
    #[error(
        "Syntax error at '{token}' (line {}, column {}): expected {expected}",
        .location.line,
        .location.column
    )]
    Syntax {
        token: String,
        expected: String,
        location: SourceLocation,
    },

    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    /// Literal text of the offending token, if this is a syntax error
    pub fn token(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { token, .. } => Some(token),
            ParseError::Lex(_) => None,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Syntax { location, .. } => *location,
            ParseError::Lex(err) => err.location,
        }
    }
}

/// Recursive descent parser for Cuppa3
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    /// Tokenize `source` with the bundled lexer and prepare to parse it.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Parse a token stream produced elsewhere. An end-of-input token is
    /// appended when the stream does not already end with one. Tokens after
    /// an earlier end-of-input token are reported by [`Parser::parse_program`].
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let location = tokens.last().map(|t| t.location).unwrap_or(SourceLocation::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, location));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the entire program: `program := stmtList`.
    ///
    /// Returns the statement list as a `seq` chain (`nil` for an empty program).
    pub fn parse_program(&mut self) -> Result<Node, ParseError> {
        tracing::debug!(tokens = self.tokens.len(), "parsing program");

        let program = self.parse_statement_list()?;

        if !self.is_at_end() {
            return Err(self.syntax_error("a statement or end of input"));
        }

        if let Some(stray) = self.tokens.get(self.position + 1) {
            return Err(ParseError::Syntax {
                token: stray.lexeme(),
                expected: "no tokens after end of input".to_string(),
                location: stray.location,
            });
        }

        tracing::debug!(statements = program.seq_items().count(), "parsed program");
        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    /// Error pointing at the current token
    pub(crate) fn syntax_error(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::Syntax {
            token: token.lexeme(),
            expected: expected.to_string(),
            location: token.location,
        }
    }

    pub(crate) fn expect_token(&mut self, kind: &TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.match_token(kind) {
            Ok(())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.syntax_error("an identifier"))
        }
    }

    pub(crate) fn expect_integer(&mut self) -> Result<i64, ParseError> {
        if let TokenKind::Integer(value) = self.peek().kind {
            self.advance();
            Ok(value)
        } else {
            Err(self.syntax_error("an integer"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(column: usize) -> SourceLocation {
        SourceLocation::new(1, column)
    }

    #[test]
    fn test_parse_empty_program() {
        let mut parser = Parser::new("").unwrap();
        assert_eq!(parser.parse_program().unwrap(), Node::Nil);
    }

    #[test]
    fn test_from_tokens_without_eof() {
        let tokens = vec![
            Token::new(TokenKind::Get, loc(1)),
            Token::new(TokenKind::Ident("x".to_string()), loc(5)),
        ];
        let mut parser = Parser::from_tokens(tokens);
        let program = parser.parse_program().unwrap();
        assert_eq!(program.to_string(), "('seq', ('get', 'x'), ('nil',))");
    }

    #[test]
    fn test_from_empty_token_stream() {
        let mut parser = Parser::from_tokens(Vec::new());
        assert_eq!(parser.parse_program().unwrap(), Node::Nil);
    }

    #[test]
    fn test_trailing_token_is_reported() {
        let mut parser = Parser::new("put 1 )").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.token(), Some(")"));
        assert_eq!(err.location(), loc(7));
    }

    #[test]
    fn test_lex_errors_surface_from_new() {
        let err = Parser::new("put 1 & 2").err().unwrap();
        assert!(matches!(err, ParseError::Lex(_)));
        assert_eq!(err.token(), None);
    }

    #[test]
    fn test_error_message() {
        let err = Parser::new("x + 1").unwrap().parse_program().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error at '+' (line 1, column 3): expected '=' or '(' after identifier"
        );
    }

    #[test]
    fn test_tokens_after_inner_eof_are_reported() {
        let tokens = vec![
            Token::new(TokenKind::Get, loc(1)),
            Token::new(TokenKind::Ident("x".to_string()), loc(5)),
            Token::new(TokenKind::Eof, loc(6)),
            Token::new(TokenKind::Put, loc(7)),
            Token::new(TokenKind::Integer(1), loc(11)),
        ];
        let err = Parser::from_tokens(tokens).parse_program().unwrap_err();
        assert_eq!(err.token(), Some("put"));
        assert_eq!(err.location(), loc(7));
    }

    #[test]
    fn test_error_reports_integer_as_written() {
        let err = Parser::new("put 1 007").unwrap().parse_program().unwrap_err();
        assert_eq!(err.token(), Some("007"));
    }
}
