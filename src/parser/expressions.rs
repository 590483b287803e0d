//! Expression parsing implementation
//!
//! This module handles parsing of Cuppa3 expressions using precedence climbing
//! for binary operators and recursive descent for other expression forms.
//!
//! # Supported Expressions
//!
//! - Literals: integers, optionally indexed or sliced (`5[1]`, `5[0:2]`)
//! - Identifiers, indexed or sliced variables (`x[1]`, `x[1:3]`)
//! - Function calls: `f(a, b)`
//! - Grouping: `(e)` and bracketed `[e]`
//! - Binary operators: `+ - * / == <=`
//! - Unary operators: `-` and `not`
//!
//! # Precedence
//!
//! Lowest to highest: `== <=`, then `+ -`, then `* /`, then the unary
//! prefixes. Binary operators are left-associative and are resolved from the
//! single table in [`BinOp::precedence`] rather than one method per level.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl BinOp {
    fn from_token(kind: &TokenKind) -> Option<BinOp> {
        match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::Le => Some(BinOp::Le),
            _ => None,
        }
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let lhs = self.parse_unary()?;
        self.parse_binary_rhs(lhs, 0)
    }

    /// Whether the current token can begin an expression
    pub(crate) fn starts_expression(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Integer(_)
                | TokenKind::Ident(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Minus
                | TokenKind::Not
        )
    }

    /// Precedence climbing: fold binary operators binding at least as tightly
    /// as `min_precedence` onto `lhs`.
    pub(crate) fn parse_binary_rhs(&mut self, mut lhs: Node, min_precedence: u8) -> Result<Node, ParseError> {
        while let Some(op) = BinOp::from_token(&self.peek().kind) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();

            let mut rhs = self.parse_unary()?;

            // Only strictly tighter operators may take `rhs` as their left
            // operand; equal precedence folds left on the next iteration.
            while let Some(next) = BinOp::from_token(&self.peek().kind) {
                if next.precedence() <= precedence {
                    break;
                }
                rhs = self.parse_binary_rhs(rhs, precedence + 1)?;
            }

            lhs = Node::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parse unary (`-` and `not`), right-associative and tighter than any
    /// binary operator.
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if self.match_token(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Node::UMinus(Box::new(operand)));
        }

        if self.match_token(&TokenKind::Not) {
            let operand = self.parse_unary()?;
            return Ok(Node::Not(Box::new(operand)));
        }

        self.parse_primary()
    }

    /// Parse primary (literals, variables, calls, grouped expressions)
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Integer(value) => {
                self.advance();
                if self.match_token(&TokenKind::LBracket) {
                    let slice = self.parse_slice()?;
                    return Ok(Node::IntIndex { value, slice });
                }
                Ok(Node::Integer(value))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.match_token(&TokenKind::LParen) {
                    let args = self.parse_actual_args()?;
                    self.expect_token(&TokenKind::RParen, "')' after arguments")?;
                    return Ok(Node::CallExp {
                        name,
                        args: Box::new(args),
                    });
                }
                if self.match_token(&TokenKind::LBracket) {
                    let slice = self.parse_slice()?;
                    return Ok(Node::Index { name, slice });
                }
                Ok(Node::Id(name))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(&TokenKind::RParen, "')' after expression")?;
                Ok(Node::Paren(Box::new(expr)))
            }
            TokenKind::LBracket => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(&TokenKind::RBracket, "']' after expression")?;
                Ok(Node::Bracket(Box::new(expr)))
            }
            _ => Err(self.syntax_error("an expression")),
        }
    }

    /// `INTEGER ':' INTEGER ']'` or `INTEGER ']'`, after the opening `[`.
    /// Index bounds are integer literals only.
    fn parse_slice(&mut self) -> Result<SliceSpec, ParseError> {
        let start = self.expect_integer()?;

        let slice = if self.match_token(&TokenKind::Colon) {
            let end = self.expect_integer()?;
            SliceSpec::Range(start, end)
        } else {
            SliceSpec::Point(start)
        };

        self.expect_token(&TokenKind::RBracket, "']' after index")?;
        Ok(slice)
    }

    /// `optActualArgs`: expressions separated by commas, as a `seq` chain
    pub(crate) fn parse_actual_args(&mut self) -> Result<Node, ParseError> {
        if !self.starts_expression() {
            return Ok(Node::Nil);
        }

        let mut args = Vec::new();
        loop {
            args.push(self.parse_expression()?);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Node::sequence(args))
    }
}
