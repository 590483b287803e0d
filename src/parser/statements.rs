//! Statement parsing implementation
//!
//! This module handles parsing of all Cuppa3 statement types:
//!
//! - Declarations: `declare x = 1;`, `declare f(a, b) { ... }`
//! - Assignments: `x = e;`, `x = [e1, e2];`
//! - I/O: `get x;`, `put e;`
//! - Calls and returns: `f(a);`, `return e;`
//! - Control flow: `while`, `if`/`else`
//! - Compound statements: `{ ... }`
//!
//! # Grammar
//!
//! ```text
//! stmtList ::= stmt stmtList | ε
//! stmt     ::= 'declare' ID '(' optFormalArgs ')' stmt
//!            | 'declare' ID optInit optSemi
//!            | ID '=' exp optSemi
//!            | ID '=' '[' optContents ']' optSemi
//!            | 'get' ID optSemi
//!            | 'put' exp optSemi
//!            | ID '(' optActualArgs ')' optSemi
//!            | 'return' optExp optSemi
//!            | 'while' '(' exp ')' stmt
//!            | 'if' '(' exp ')' stmt optElse
//!            | '{' stmtList '}'
//! ```
//!
//! Trailing semicolons are optional everywhere they appear and never reach
//! the AST.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse statements until the next token cannot start one.
    /// The result is a `seq` chain ending in `nil`.
    pub(crate) fn parse_statement_list(&mut self) -> Result<Node, ParseError> {
        let mut statements = Vec::new();

        while self.starts_statement() {
            statements.push(self.parse_statement()?);
        }

        Ok(Node::sequence(statements))
    }

    fn starts_statement(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Declare
                | TokenKind::Ident(_)
                | TokenKind::Get
                | TokenKind::Put
                | TokenKind::Return
                | TokenKind::While
                | TokenKind::If
                | TokenKind::LBrace
        )
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match self.peek().kind {
            TokenKind::Declare => {
                self.advance();
                self.parse_declaration()
            }
            TokenKind::Ident(_) => self.parse_assignment_or_call(),
            TokenKind::Get => {
                self.advance();
                let name = self.expect_identifier()?;
                self.skip_optional_semicolon();
                Ok(Node::Get(name))
            }
            TokenKind::Put => {
                self.advance();
                let expr = self.parse_expression()?;
                self.skip_optional_semicolon();
                Ok(Node::Put(Box::new(expr)))
            }
            TokenKind::Return => {
                self.advance();
                self.parse_return_statement()
            }
            TokenKind::While => {
                self.advance();
                self.parse_while_statement()
            }
            TokenKind::If => {
                self.advance();
                self.parse_if_statement()
            }
            TokenKind::LBrace => {
                self.advance();
                let statements = self.parse_statement_list()?;
                self.expect_token(&TokenKind::RBrace, "'}' after block")?;
                Ok(Node::Block(Box::new(statements)))
            }
            _ => Err(self.syntax_error("a statement")),
        }
    }

    /// `declare` has already been consumed. A `(` right after the name makes
    /// this a function declaration.
    fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        let name = self.expect_identifier()?;

        if self.match_token(&TokenKind::LParen) {
            let formal_args = self.parse_formal_args()?;
            self.expect_token(&TokenKind::RParen, "')' after formal arguments")?;
            let body = self.parse_statement()?;
            return Ok(Node::FunDecl {
                name,
                formal_args: Box::new(formal_args),
                body: Box::new(body),
            });
        }

        let init = if self.match_token(&TokenKind::Eq) {
            self.parse_expression()?
        } else {
            Node::Nil
        };
        self.skip_optional_semicolon();

        Ok(Node::Declare {
            name,
            init: Box::new(init),
        })
    }

    /// `ID '=' ...` or `ID '(' ... ')'`
    fn parse_assignment_or_call(&mut self) -> Result<Node, ParseError> {
        let name = self.expect_identifier()?;

        if self.match_token(&TokenKind::Eq) {
            let value = self.parse_assigned_value()?;
            self.skip_optional_semicolon();
            return Ok(Node::Assign {
                name,
                value: Box::new(value),
            });
        }

        if self.match_token(&TokenKind::LParen) {
            let args = self.parse_actual_args()?;
            self.expect_token(&TokenKind::RParen, "')' after arguments")?;
            self.skip_optional_semicolon();
            return Ok(Node::CallStmt {
                name,
                args: Box::new(args),
            });
        }

        Err(self.syntax_error("'=' or '(' after identifier"))
    }

    /// Right-hand side of an assignment.
    ///
    /// `[]` and `[e1, e2, ...]` are list literals. A single bracketed element
    /// `[e]` is the bracket expression instead, and may go on as the left
    /// operand of a binary operator (`x = [1] + y`).
    ///
    /// List contents are a `seq`/`nil` chain inside the `list` node, like
    /// every other sequence, rather than nested pairs of elements.
    fn parse_assigned_value(&mut self) -> Result<Node, ParseError> {
        if !self.match_token(&TokenKind::LBracket) {
            return self.parse_expression();
        }

        if self.match_token(&TokenKind::RBracket) {
            return Ok(Node::List(Box::new(Node::Nil)));
        }

        let first = self.parse_expression()?;

        if self.match_token(&TokenKind::RBracket) {
            return self.parse_binary_rhs(Node::Bracket(Box::new(first)), 0);
        }

        if !self.check(&TokenKind::Comma) {
            return Err(self.syntax_error("',' or ']' in list"));
        }

        let mut contents = vec![first];
        while self.match_token(&TokenKind::Comma) {
            contents.push(self.parse_expression()?);
        }
        self.expect_token(&TokenKind::RBracket, "']' after list contents")?;

        Ok(Node::List(Box::new(Node::sequence(contents))))
    }

    /// `return` has already been consumed. The value is `nil` unless the
    /// next token can start an expression.
    fn parse_return_statement(&mut self) -> Result<Node, ParseError> {
        let expr = if self.starts_expression() {
            self.parse_expression()?
        } else {
            Node::Nil
        };
        self.skip_optional_semicolon();

        Ok(Node::Return(Box::new(expr)))
    }

    fn parse_while_statement(&mut self) -> Result<Node, ParseError> {
        let condition = self.parse_condition("while")?;
        let body = self.parse_statement()?;

        Ok(Node::While {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    /// The `else` clause, when present, belongs to the innermost `if`.
    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        let condition = self.parse_condition("if")?;
        let then_branch = self.parse_statement()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            self.parse_statement()?
        } else {
            Node::Nil
        };

        Ok(Node::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    /// `'(' exp ')'` after `while` or `if`
    fn parse_condition(&mut self, keyword: &str) -> Result<Node, ParseError> {
        self.expect_token(&TokenKind::LParen, &format!("'(' after '{keyword}'"))?;
        let condition = self.parse_expression()?;
        self.expect_token(&TokenKind::RParen, &format!("')' after {keyword} condition"))?;
        Ok(condition)
    }

    /// `optFormalArgs`: identifiers separated by commas, as `seq` of `id`
    fn parse_formal_args(&mut self) -> Result<Node, ParseError> {
        if !matches!(self.peek().kind, TokenKind::Ident(_)) {
            return Ok(Node::Nil);
        }

        let mut args = Vec::new();
        loop {
            args.push(Node::Id(self.expect_identifier()?));

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Node::sequence(args))
    }

    fn skip_optional_semicolon(&mut self) {
        self.match_token(&TokenKind::Semicolon);
    }
}
