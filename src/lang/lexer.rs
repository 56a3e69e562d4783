//! Tokenizer for the reference runtime.

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Semicolon,
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {}", crate::runtime::format_number(*n)),
            Self::Str(_) => "string".to_string(),
            Self::Ident(name) => format!("identifier `{name}`"),
            Self::True => "`true`".to_string(),
            Self::False => "`false`".to_string(),
            Self::Null => "`null`".to_string(),
            Self::LParen => "`(`".to_string(),
            Self::RParen => "`)`".to_string(),
            Self::LBrace => "`{`".to_string(),
            Self::RBrace => "`}`".to_string(),
            Self::LBracket => "`[`".to_string(),
            Self::RBracket => "`]`".to_string(),
            Self::Comma => "`,`".to_string(),
            Self::Colon => "`:`".to_string(),
            Self::Dot => "`.`".to_string(),
            Self::Assign => "`=`".to_string(),
            Self::Plus => "`+`".to_string(),
            Self::Minus => "`-`".to_string(),
            Self::Star => "`*`".to_string(),
            Self::Slash => "`/`".to_string(),
            Self::Semicolon => "`;`".to_string(),
            Self::Eof => "end of input".to_string(),
        }
    }
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Lexing problem with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LexError {
    pub(crate) message: String,
    pub(crate) offset: usize,
}

/// Split `source` into tokens. Always ends with an `Eof` token.
pub(crate) fn tokenize(source: &str) -> (Vec<Token>, Vec<LexError>) {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut i = 0usize;

    let offset_at = |idx: usize| chars.get(idx).map(|(o, _)| *o).unwrap_or(source.len());

    while i < chars.len() {
        let (start, ch) = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        if ch == '#' {
            // Comment runs to end of line.
            while i < chars.len() && chars[i].1 != '\n' {
                i += 1;
            }
            continue;
        }

        if ch.is_ascii_digit() {
            let mut j = i;
            while j < chars.len() && (chars[j].1.is_ascii_digit() || chars[j].1 == '.') {
                // Stop before `1.method` so property access on literals works.
                if chars[j].1 == '.'
                    && !chars.get(j + 1).is_some_and(|(_, c)| c.is_ascii_digit())
                {
                    break;
                }
                j += 1;
            }
            let end = offset_at(j);
            let text = &source[start..end];
            match text.parse::<f64>() {
                Ok(n) => tokens.push(Token {
                    kind: TokenKind::Number(n),
                    start,
                    end,
                }),
                Err(_) => errors.push(LexError {
                    message: format!("invalid number `{text}`"),
                    offset: start,
                }),
            }
            i = j;
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            let mut j = i;
            while j < chars.len() && (chars[j].1.is_alphanumeric() || chars[j].1 == '_') {
                j += 1;
            }
            let end = offset_at(j);
            let word = &source[start..end];
            let kind = match word {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                "null" => TokenKind::Null,
                _ => TokenKind::Ident(word.to_string()),
            };
            tokens.push(Token { kind, start, end });
            i = j;
            continue;
        }

        if ch == '"' || ch == '\'' {
            let quote = ch;
            let mut j = i + 1;
            let mut text = String::new();
            let mut closed = false;
            while j < chars.len() {
                let c = chars[j].1;
                if c == quote {
                    closed = true;
                    j += 1;
                    break;
                }
                if c == '\\' && j + 1 < chars.len() {
                    let escaped = chars[j + 1].1;
                    text.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                    j += 2;
                    continue;
                }
                text.push(c);
                j += 1;
            }
            if !closed {
                errors.push(LexError {
                    message: "unterminated string".to_string(),
                    offset: start,
                });
            }
            tokens.push(Token {
                kind: TokenKind::Str(text),
                start,
                end: offset_at(j),
            });
            i = j;
            continue;
        }

        let kind = match ch {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            '.' => Some(TokenKind::Dot),
            '=' => Some(TokenKind::Assign),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        };
        match kind {
            Some(kind) => tokens.push(Token {
                kind,
                start,
                end: start + ch.len_utf8(),
            }),
            None => errors.push(LexError {
                message: format!("unexpected character `{ch}`"),
                offset: start,
            }),
        }
        i += 1;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        start: source.len(),
        end: source.len(),
    });
    (tokens, errors)
}
