//! Expression parser
//!
//! Recursive descent over a small call-and-access subset of CEL syntax:
//!
//! ```text
//! expr    := member (("==" | "!=") member)*
//! member  := primary ("." ident | "[" expr "]")*
//! primary := literal | ident | ident "(" args ")" | "[" args "]" | "(" expr ")"
//! ```

use phf::phf_map;
use thiserror::Error;

use super::ast::{BinaryOp, Expr};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
    #[error("invalid number at offset {0}")]
    InvalidNumber(usize),
    #[error("unclosed string starting at offset {0}")]
    UnclosedString(usize),
    #[error("unexpected trailing input at offset {0}")]
    TrailingInput(usize),
    #[error("expression nested too deeply at offset {0}")]
    NestingTooDeep(usize),
}

/// Deepest expression tree the parser will build
pub const MAX_DEPTH: usize = 250;

#[derive(Debug, Clone, Copy)]
enum Keyword {
    True,
    False,
    Null,
}

const KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "true" => Keyword::True,
    "false" => Keyword::False,
    "null" => Keyword::Null,
};

/// Parse an expression
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    ExprParser::parse(input)
}

pub struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> ExprParser<'a> {
    pub fn parse(input: &'a str) -> Result<Expr, ParseError> {
        let mut parser = Self {
            input,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_expr()?;
        parser.skip_whitespace();
        if !parser.is_at_end() {
            return Err(ParseError::TrailingInput(parser.pos));
        }
        Ok(expr)
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut lhs = self.parse_member()?;
        loop {
            self.skip_whitespace();
            let op = if self.peek_str("==") {
                BinaryOp::Equal
            } else if self.peek_str("!=") {
                BinaryOp::NotEqual
            } else {
                break;
            };
            self.enter()?;
            self.advance_by(2);
            let rhs = self.parse_member()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn parse_member(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('.') => {
                    self.enter()?;
                    self.advance();
                    self.skip_whitespace();
                    let field = self.parse_identifier()?;
                    expr = Expr::Select {
                        operand: Box::new(expr),
                        field,
                    };
                }
                Some('[') => {
                    self.enter()?;
                    self.advance();
                    let index = self.parse_expr()?;
                    self.skip_whitespace();
                    self.expect(']')?;
                    expr = Expr::Index {
                        operand: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }
        self.depth = depth;
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some('\'') | Some('"') => self.parse_string().map(Expr::String),
            Some('-') | Some('0'..='9') => self.parse_number().map(Expr::Number),
            Some('[') => {
                self.enter()?;
                self.advance();
                let items = self.parse_args(']')?;
                self.leave();
                Ok(Expr::List(items))
            }
            Some('(') => {
                self.enter()?;
                self.advance();
                let expr = self.parse_expr()?;
                self.skip_whitespace();
                self.expect(')')?;
                self.leave();
                Ok(expr)
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let name = self.parse_identifier()?;
                self.skip_whitespace();
                if self.peek() == Some('(') {
                    self.enter()?;
                    self.advance();
                    let args = self.parse_args(')')?;
                    self.leave();
                    return Ok(Expr::Call {
                        function: name,
                        args,
                    });
                }
                Ok(match KEYWORDS.get(name.as_str()) {
                    Some(Keyword::True) => Expr::Bool(true),
                    Some(Keyword::False) => Expr::Bool(false),
                    Some(Keyword::Null) => Expr::Null,
                    None => Expr::Ident(name),
                })
            }
            Some(ch) => Err(ParseError::UnexpectedChar {
                ch,
                offset: self.pos,
            }),
        }
    }

    /// One level deeper into the tree. `pos` should be at the opening token.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::NestingTooDeep(self.pos));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Comma separated expressions up to `close`; the opening bracket is consumed
    fn parse_args(&mut self, close: char) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(close) {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some(c) if c == close => {
                    self.advance();
                    return Ok(args);
                }
                Some(ch) => {
                    return Err(ParseError::UnexpectedChar {
                        ch,
                        offset: self.pos,
                    })
                }
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.advance(),
            Some(ch) => return Err(ParseError::UnexpectedChar { ch, offset: start }),
            None => return Err(ParseError::UnexpectedEnd),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(q) => q,
            None => return Err(ParseError::UnexpectedEnd),
        };
        self.advance();

        let mut result = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedString(start)),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_at = self.pos;
                    self.advance();
                    match self.peek() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('\\') => result.push('\\'),
                        Some('\'') => result.push('\''),
                        Some('"') => result.push('"'),
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape(escape_at)?);
                            continue;
                        }
                        _ => return Err(ParseError::InvalidEscape(escape_at)),
                    }
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
        Ok(result)
    }

    /// The four hex digits after `\u`
    fn parse_unicode_escape(&mut self, escape_at: usize) -> Result<char, ParseError> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .filter(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or(ParseError::InvalidEscape(escape_at))?;
        let ch = u32::from_str_radix(digits, 16)
            .ok()
            .and_then(std::char::from_u32)
            .ok_or(ParseError::InvalidEscape(escape_at))?;
        self.advance_by(4);
        Ok(ch)
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;

        if self.peek() == Some('-') {
            self.advance();
        }
        if !matches!(self.peek(), Some('0'..='9')) {
            return Err(ParseError::InvalidNumber(start));
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        if self.peek() == Some('.') {
            self.advance();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber(start));
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseError::InvalidNumber(start));
            }
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        self.input[start..self.pos]
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber(start))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Skip `n` bytes of ASCII input
    fn advance_by(&mut self, n: usize) {
        self.pos = usize::min(self.pos + n, self.input.len());
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError::UnexpectedChar {
                ch,
                offset: self.pos,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}
