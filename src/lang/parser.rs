//! Recursive-descent parser for the reference runtime.
//!
//! Besides the statement list, the parser remembers the last identifier or
//! property access it finished. When that node ends exactly at end of input it
//! becomes the completion subject reported to the session.

use crate::lang::lexer::{tokenize, Token, TokenKind};
use crate::runtime::{CompletionSubject, ParseOutcome};

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Ident(String),
    Array(Vec<Expr>),
    Hash(Vec<(String, Expr)>),
    Assign {
        name: String,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Neg(Box<Expr>),
    Property {
        subject: Box<Expr>,
        name: String,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    MethodCall {
        subject: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed program plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Program {
    pub(crate) statements: Vec<Expr>,
    pub(crate) errors: Vec<String>,
    pub(crate) subject: Option<CompletionSubject<Expr>>,
}

impl Program {
    pub(crate) fn into_outcome(self) -> ParseOutcome<Expr> {
        ParseOutcome {
            errors: self.errors,
            subject: self.subject,
        }
    }
}

/// Parse `source` into a program. Never panics on malformed input.
pub(crate) fn parse_program(source: &str) -> Program {
    let (tokens, lex_errors) = tokenize(source);
    let mut errors: Vec<String> = lex_errors
        .iter()
        .map(|e| format_error(source, &e.message, e.offset))
        .collect();

    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        tail: None,
    };
    let mut statements = Vec::new();
    if errors.is_empty() {
        match parser.statements() {
            Ok(list) => statements = list,
            Err(err) => errors.push(format_error(source, &err.message, err.offset)),
        }
    }

    let subject = match parser.tail.take() {
        Some((end, subject)) if errors.is_empty() && end == source.len() => Some(subject),
        Some(_) | None if errors.is_empty() && !statements.is_empty() => {
            Some(CompletionSubject::Other)
        }
        _ => None,
    };

    Program {
        statements,
        errors,
        subject,
    }
}

/// Render a two-line caret diagnostic under the offending source line.
fn format_error(source: &str, message: &str, offset: usize) -> String {
    let line_start = source[..offset.min(source.len())]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());
    let line = &source[line_start..line_end];
    let column = source[line_start..offset.min(source.len())].chars().count();
    format!("{message}\n    {line}\n    {}^", " ".repeat(column))
}

struct ParseError {
    message: String,
    offset: usize,
}

type ParseResult<T> = Result<T, ParseError>;

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    tail: Option<(usize, CompletionSubject<Expr>)>,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind_at(&self, ahead: usize) -> &TokenKind {
        let idx = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.at(&kind) {
            return Ok(self.advance());
        }
        Err(self.unexpected(&format!("expected {}", kind.describe())))
    }

    fn unexpected(&self, context: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            message: format!("{context}, got {}", token.kind.describe()),
            offset: token.start.min(self.source.len()),
        }
    }

    fn statements(&mut self) -> ParseResult<Vec<Expr>> {
        let mut out = Vec::new();
        loop {
            while self.at(&TokenKind::Semicolon) {
                self.advance();
            }
            if self.at(&TokenKind::Eof) {
                return Ok(out);
            }
            out.push(self.statement()?);
            if !self.at(&TokenKind::Semicolon) && !self.at(&TokenKind::Eof) {
                return Err(self.unexpected("expected `;` or end of input"));
            }
        }
    }

    fn statement(&mut self) -> ParseResult<Expr> {
        if let (TokenKind::Ident(name), TokenKind::Assign) =
            (self.peek_kind_at(0).clone(), self.peek_kind_at(1))
        {
            self.advance();
            self.advance();
            let value = self.expression()?;
            return Ok(Expr::Assign {
                name,
                value: Box::new(value),
            });
        }
        self.expression()
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.at(&TokenKind::Minus) {
            self.advance();
            let inner = self.unary()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        while self.at(&TokenKind::Dot) {
            self.advance();
            let TokenKind::Ident(name) = self.peek().kind.clone() else {
                return Err(self.unexpected("expected property name after `.`"));
            };
            let token = self.advance();
            if self.at(&TokenKind::LParen) {
                let args = self.call_args()?;
                expr = Expr::MethodCall {
                    subject: Box::new(expr),
                    name,
                    args,
                };
            } else {
                self.tail = Some((
                    token.end,
                    CompletionSubject::Property {
                        subject: expr.clone(),
                        partial: name.clone(),
                    },
                ));
                expr = Expr::Property {
                    subject: Box::new(expr),
                    name,
                };
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(
            self.peek().kind,
            TokenKind::RParen
                | TokenKind::RBrace
                | TokenKind::RBracket
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::Dot
                | TokenKind::Assign
                | TokenKind::Plus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Semicolon
                | TokenKind::Eof
                | TokenKind::Minus
        ) {
            return Err(self.unexpected("expected an expression"));
        }
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::True => Ok(Expr::Bool(true)),
            TokenKind::False => Ok(Expr::Bool(false)),
            TokenKind::Null => Ok(Expr::Null),
            TokenKind::Ident(name) => {
                if self.at(&TokenKind::LParen) {
                    let args = self.call_args()?;
                    return Ok(Expr::Call { name, args });
                }
                self.tail = Some((token.end, CompletionSubject::Identifier(name.clone())));
                Ok(Expr::Ident(name))
            }
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                let items = self.list(TokenKind::RBracket, Self::expression)?;
                Ok(Expr::Array(items))
            }
            TokenKind::LBrace => {
                let pairs = self.list(TokenKind::RBrace, Self::hash_pair)?;
                Ok(Expr::Hash(pairs))
            }
            _ => Err(ParseError {
                message: format!("expected an expression, got {}", token.kind.describe()),
                offset: token.start,
            }),
        }
    }

    fn hash_pair(&mut self) -> ParseResult<(String, Expr)> {
        let key = match self.peek().kind.clone() {
            TokenKind::Ident(name) => name,
            TokenKind::Str(s) => s,
            _ => return Err(self.unexpected("expected a hash key")),
        };
        self.advance();
        self.expect(TokenKind::Colon)?;
        let value = self.expression()?;
        Ok((key, value))
    }

    fn call_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::LParen)?;
        self.list(TokenKind::RParen, Self::expression)
    }

    /// Parse a comma-separated list up to and including `close`.
    fn list<T>(
        &mut self,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut out = Vec::new();
        if self.at(&close) {
            self.advance();
            return Ok(out);
        }
        loop {
            out.push(item(self)?);
            if self.at(&TokenKind::Comma) {
                self.advance();
                if self.at(&close) {
                    self.advance();
                    return Ok(out);
                }
                continue;
            }
            self.expect(close.clone())?;
            return Ok(out);
        }
    }
}
