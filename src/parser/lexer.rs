//! Lexer (tokenizer) for Cuppa3 source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Keywords are classified here, so the parser never sees a keyword as an
//! identifier, and integer literals are converted to `i64` up front.

use super::ast::SourceLocation;
use thiserror::Error;

/// Token kinds of the Cuppa3 vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer(i64),

    // Identifiers
    Ident(String),

    // Keywords
    Declare,
    Get,
    Put,
    Return,
    While,
    If,
    Else,
    Not,

    // Operators
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /
    EqEq,  // ==
    Le,    // <=
    Eq,    // =

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :

    // End of input
    Eof,
}

impl TokenKind {
    /// Canonical text of this token kind. Integers print their value, so
    /// `007` comes out as `7`; [`Token::lexeme`] keeps the source spelling.
    pub fn lexeme(&self) -> String {
        match self {
            TokenKind::Integer(n) => n.to_string(),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Declare => "declare".to_string(),
            TokenKind::Get => "get".to_string(),
            TokenKind::Put => "put".to_string(),
            TokenKind::Return => "return".to_string(),
            TokenKind::While => "while".to_string(),
            TokenKind::If => "if".to_string(),
            TokenKind::Else => "else".to_string(),
            TokenKind::Not => "not".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::EqEq => "==".to_string(),
            TokenKind::Le => "<=".to_string(),
            TokenKind::Eq => "=".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::LBrace => "{".to_string(),
            TokenKind::RBrace => "}".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Semicolon => ";".to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }

    fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "declare" => TokenKind::Declare,
            "get" => TokenKind::Get,
            "put" => TokenKind::Put,
            "return" => TokenKind::Return,
            "while" => TokenKind::While,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "not" => TokenKind::Not,
            _ => return None,
        };
        Some(kind)
    }
}

/// A token together with where it starts in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
    /// Source spelling, when it differs from [`TokenKind::lexeme`]
    pub text: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            text: None,
        }
    }

    pub fn with_text(kind: TokenKind, location: SourceLocation, text: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            text: Some(text.into()),
        }
    }

    /// The token as written in the source, as reported in syntax errors.
    pub fn lexeme(&self) -> String {
        self.text.clone().unwrap_or_else(|| self.kind.lexeme())
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for Cuppa3 source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        tracing::trace!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            location: loc,
        })?;

        let kind = match ch {
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, loc)),

            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else {
                    return Err(LexError {
                        message: "Unexpected character: '<' (only '<=' is supported)"
                            .to_string(),
                        location: loc,
                    });
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    location: loc,
                })
            }
        };

        Ok(Token::new(kind, loc))
    }

    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = num_str.parse::<i64>().map_err(|_| LexError {
            message: format!("Invalid integer literal: {}", num_str),
            location: loc,
        })?;

        Ok(Token::with_text(TokenKind::Integer(value), loc, num_str))
    }

    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = TokenKind::keyword(&ident).unwrap_or(TokenKind::Ident(ident));
        Token::new(kind, loc)
    }

    /// Skip whitespace and `//` line comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        assert_eq!(
            kinds("declare x = 42;"),
            vec![
                TokenKind::Declare,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eq,
                TokenKind::Integer(42),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / == <= = not"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::EqEq,
                TokenKind::Le,
                TokenKind::Eq,
                TokenKind::Not,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        let tokens = kinds("while whilex _if");
        assert_eq!(tokens[0], TokenKind::While);
        assert_eq!(tokens[1], TokenKind::Ident("whilex".to_string()));
        assert_eq!(tokens[2], TokenKind::Ident("_if".to_string()));
    }

    #[test]
    fn test_comments() {
        let tokens = kinds("get x // read x\nput x");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Get,
                TokenKind::Ident("x".to_string()),
                TokenKind::Put,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("put 1\n  put 2").tokenize().unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 3));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("put 1 < 2").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 7));

        let err = Lexer::new("x = 1 % 2").tokenize().unwrap_err();
        assert!(err.message.contains('%'));
    }

    #[test]
    fn test_integer_overflow() {
        let err = Lexer::new("99999999999999999999").tokenize().unwrap_err();
        assert!(err.message.contains("Invalid integer literal"));
    }

    #[test]
    fn test_integer_keeps_source_spelling() {
        let tokens = Lexer::new("007").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer(7));
        assert_eq!(tokens[0].lexeme(), "007");
        assert_eq!(tokens[1].lexeme(), "end of input");
    }
}
