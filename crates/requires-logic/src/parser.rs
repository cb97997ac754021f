// crates/requires-logic/src/parser.rs
// ============================================================================
// Module: Requirement Expression Parser
// Description: Lexer and recursive-descent parser for `@requires` text.
// Purpose: Turn author-written expressions into an `Expr` tree.
// Dependencies: crate::{error, expr, number}
// ============================================================================

//! ## Overview
//! The parser accepts the boolean language used by `@requires` and keyword
//! selections.
//!
//! ### Grammar (informal, lowest precedence first)
//! - `or      := and ('|' and)*`
//! - `and     := compare ('&' compare)*`
//! - `compare := additive (('==' | '!=' | '<' | '<=' | '>' | '>=') additive)?`
//! - `additive := multiplicative (('+' | '-') multiplicative)*`
//! - `multiplicative := unary (('*' | '/' | '%') unary)*`
//! - `unary   := ('!' | '-') unary | primary`
//! - `primary := name | number | "string" | true | false | '(' or ')'`
//!
//! Names are dotted identifiers (`os.family`, `vm.opt.UseCompressedOops`).
//! Numbers accept a `k`/`m`/`g`/`t` suffix.

use crate::error::ExprError;
use crate::expr::BinaryOp;
use crate::expr::Expr;
use crate::number::parse_number;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed expression input size in bytes.
const MAX_EXPR_INPUT_BYTES: usize = 64 * 1024;
/// Maximum supported nesting depth.
const MAX_EXPR_NESTING: usize = 32;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Parses expression text into an [`Expr`].
///
/// # Errors
/// Returns [`ExprError`] for syntax issues, invalid numbers, unterminated
/// strings, trailing input, or inputs beyond the size and nesting limits.
pub fn parse_expr(input: &str) -> Result<Expr, ExprError> {
    if input.len() > MAX_EXPR_INPUT_BYTES {
        return Err(ExprError::InputTooLarge {
            max_bytes: MAX_EXPR_INPUT_BYTES,
            actual_bytes: input.len(),
        });
    }
    let tokens = Lexer::new(input).lex()?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_or()?;
    parser.expect_eof()?;
    Ok(expr)
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer token produced from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Dotted identifier.
    Ident(&'a str),
    /// Numeric literal including any suffix.
    Number(&'a str),
    /// Quoted string literal with escapes resolved.
    Text(String),
    /// `&`
    And,
    /// `|`
    Or,
    /// `!`
    Not,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// End-of-input marker.
    Eof,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone)]
struct SpannedToken<'a> {
    /// Token value.
    token: Token<'a>,
    /// Byte offset into the input.
    position: usize,
}

/// Lexer for requirement expressions.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(&mut self) -> Result<Vec<SpannedToken<'a>>, ExprError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while self.offset < bytes.len() {
            let ch = bytes[self.offset];
            let start = self.offset;
            let token = match ch {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                    continue;
                }
                b'(' => self.single(Token::LParen),
                b')' => self.single(Token::RParen),
                b'&' => self.single(Token::And),
                b'|' => self.single(Token::Or),
                b'+' => self.single(Token::Plus),
                b'-' => self.single(Token::Minus),
                b'*' => self.single(Token::Star),
                b'/' => self.single(Token::Slash),
                b'%' => self.single(Token::Percent),
                b'!' => self.with_equals(bytes, Token::Ne, Token::Not),
                b'<' => self.with_equals(bytes, Token::Le, Token::Lt),
                b'>' => self.with_equals(bytes, Token::Ge, Token::Gt),
                b'=' => {
                    if self.peek_char(bytes) == Some(b'=') {
                        self.offset += 2;
                        Token::Eq
                    } else {
                        return Err(ExprError::UnexpectedToken {
                            expected: "==",
                            found: "=".to_string(),
                            position: start,
                        });
                    }
                }
                b'"' => Token::Text(self.string_literal(bytes)?),
                b'0' ..= b'9' => {
                    self.consume_while(bytes, |b| b.is_ascii_alphanumeric() || b == b'.');
                    Token::Number(&self.input[start .. self.offset])
                }
                b'a' ..= b'z' | b'A' ..= b'Z' | b'_' => {
                    self.consume_while(bytes, |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
                    Token::Ident(&self.input[start .. self.offset])
                }
                _ => {
                    let found = self.input[start ..].chars().next().map_or_else(String::new, String::from);
                    return Err(ExprError::UnexpectedToken {
                        expected: "name, literal, or operator",
                        found,
                        position: start,
                    });
                }
            };
            tokens.push(SpannedToken {
                token,
                position: start,
            });
        }

        if tokens.is_empty() {
            return Err(ExprError::EmptyInput);
        }

        tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(tokens)
    }

    /// Consumes one byte and returns the token.
    fn single(&mut self, token: Token<'a>) -> Token<'a> {
        self.offset += 1;
        token
    }

    /// Returns `paired` when the next byte is `=`, otherwise `alone`.
    fn with_equals(&mut self, bytes: &[u8], paired: Token<'a>, alone: Token<'a>) -> Token<'a> {
        if self.peek_char(bytes) == Some(b'=') {
            self.offset += 2;
            paired
        } else {
            self.offset += 1;
            alone
        }
    }

    /// Reads a double-quoted literal, resolving `\"` and `\\`.
    fn string_literal(&mut self, bytes: &[u8]) -> Result<String, ExprError> {
        let start = self.offset;
        self.offset += 1;
        let mut text = String::new();
        let mut chunk_start = self.offset;
        while let Some(&b) = bytes.get(self.offset) {
            match b {
                b'"' => {
                    text.push_str(&self.input[chunk_start .. self.offset]);
                    self.offset += 1;
                    return Ok(text);
                }
                b'\\' if matches!(bytes.get(self.offset + 1), Some(b'"' | b'\\')) => {
                    text.push_str(&self.input[chunk_start .. self.offset]);
                    text.push(char::from(bytes[self.offset + 1]));
                    self.offset += 2;
                    chunk_start = self.offset;
                }
                _ => self.offset += 1,
            }
        }
        Err(ExprError::UnterminatedString {
            position: start,
        })
    }

    /// Returns the next byte without advancing.
    fn peek_char(&self, bytes: &[u8]) -> Option<u8> {
        bytes.get(self.offset + 1).copied()
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, bytes: &[u8], condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = bytes.get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser over the token stream.
struct Parser<'input> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'input>>,
    /// Current token index.
    index: usize,
    /// Current nesting depth for parenthesized and unary expressions.
    nesting: usize,
}

impl<'input> Parser<'input> {
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'input>>) -> Self {
        Self {
            tokens,
            index: 0,
            nesting: 0,
        }
    }

    /// Parses OR expressions.
    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_and()?;
        while self.matches(&Token::Or) {
            let rhs = self.parse_and()?;
            expr = Expr::binary(BinaryOp::Or, expr, rhs);
        }
        Ok(expr)
    }

    /// Parses AND expressions.
    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_compare()?;
        while self.matches(&Token::And) {
            let rhs = self.parse_compare()?;
            expr = Expr::binary(BinaryOp::And, expr, rhs);
        }
        Ok(expr)
    }

    /// Parses a single optional comparison.
    fn parse_compare(&mut self) -> Result<Expr, ExprError> {
        let lhs = self.parse_additive()?;
        let op = match self.current().token {
            Token::Eq => BinaryOp::Eq,
            Token::Ne => BinaryOp::Ne,
            Token::Lt => BinaryOp::Lt,
            Token::Le => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::Ge => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(Expr::binary(op, lhs, rhs))
    }

    /// Parses `+` and `-` chains.
    fn parse_additive(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.current().token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(expr),
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            expr = Expr::binary(op, expr, rhs);
        }
    }

    /// Parses `*`, `/`, and `%` chains.
    fn parse_multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.current().token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                _ => return Ok(expr),
            };
            self.advance();
            let rhs = self.parse_unary()?;
            expr = Expr::binary(op, expr, rhs);
        }
    }

    /// Parses unary expressions.
    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let position = self.current().position;
        if self.matches(&Token::Not) {
            return self.with_nesting(position, |parser| {
                Ok(Expr::Not(Box::new(parser.parse_unary()?)))
            });
        }
        if self.matches(&Token::Minus) {
            return self.with_nesting(position, |parser| {
                Ok(Expr::Neg(Box::new(parser.parse_unary()?)))
            });
        }
        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let SpannedToken {
            token,
            position,
        } = self.current().clone();
        match token {
            Token::Ident("true") => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Token::Ident("false") => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Token::Ident(name) => {
                if name.ends_with('.') || name.contains("..") {
                    return Err(ExprError::UnexpectedToken {
                        expected: "property name",
                        found: name.to_string(),
                        position,
                    });
                }
                self.advance();
                Ok(Expr::Name(name.to_string()))
            }
            Token::Number(raw) => {
                self.advance();
                parse_number(raw).map(Expr::Number).ok_or_else(|| ExprError::InvalidNumber {
                    raw: raw.to_string(),
                    position,
                })
            }
            Token::Text(text) => {
                self.advance();
                Ok(Expr::Text(text))
            }
            Token::LParen => {
                self.advance();
                self.with_nesting(position, |parser| {
                    let expr = parser.parse_or()?;
                    parser.expect(&Token::RParen, "`)`")?;
                    Ok(expr)
                })
            }
            _ => Err(ExprError::UnexpectedToken {
                expected: "name, literal, or `(`",
                found: self.describe_current(),
                position,
            }),
        }
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_EXPR_NESTING {
            return Err(ExprError::NestingTooDeep {
                max_depth: MAX_EXPR_NESTING,
                actual_depth: next_depth,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Consumes the expected token or returns an error.
    fn expect(&mut self, token: &Token<'_>, expected: &'static str) -> Result<(), ExprError> {
        if self.matches(token) {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken {
                expected,
                found: self.describe_current(),
                position: self.current().position,
            })
        }
    }

    /// Ensures the parser is at end-of-input.
    fn expect_eof(&self) -> Result<(), ExprError> {
        if matches!(self.current().token, Token::Eof) {
            Ok(())
        } else {
            Err(ExprError::TrailingInput {
                position: self.current().position,
            })
        }
    }

    /// Consumes the token if it matches the expected kind.
    fn matches(&mut self, kind: &Token<'_>) -> bool {
        if std::mem::discriminant(&self.current().token) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token.
    fn current(&self) -> &SpannedToken<'input> {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    /// Advances to the next token.
    const fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Formats the current token for diagnostics.
    fn describe_current(&self) -> String {
        match &self.current().token {
            Token::Ident(raw) | Token::Number(raw) => (*raw).to_string(),
            Token::Text(text) => format!("\"{text}\""),
            Token::And => "&".to_string(),
            Token::Or => "|".to_string(),
            Token::Not => "!".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Eq => "==".to_string(),
            Token::Ne => "!=".to_string(),
            Token::Lt => "<".to_string(),
            Token::Le => "<=".to_string(),
            Token::Gt => ">".to_string(),
            Token::Ge => ">=".to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
