//! Tokenizer for Weft scripts.
//!
//! Produces one [`Token`] at a time. The parser peeks by reading a token and
//! handing it back through [`Lexer::push_back`]. Pushed tokens form a
//! stack, so they come back in reverse order of pushing.
//!
//! Double-quoted strings may embed `${ ... }`. The embedded code is scanned
//! by a nested lexer that stops at the first unbalanced `}`, so nested string
//! literals and brace pairs inside the interpolation are handled. The string
//! token records only the code's source range; the parser re-lexes it.

mod error;

pub use error::LexError;

use std::mem;

use weft_ir::{Name, Span, StrLiteral, StrPart, Token, TokenKind};

/// Streaming tokenizer over a source range.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    end: usize,
    line: u32,
    pushed: Vec<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            pos: 0,
            end: source.len(),
            line: 1,
            pushed: Vec::new(),
        }
    }

    /// Lex only `range` of `source`, keeping absolute spans.
    ///
    /// `line` is the line number at `range.start`.
    pub fn with_range(source: &'src str, range: Span, line: u32) -> Self {
        let end = (range.end as usize).min(source.len());
        Lexer {
            source,
            pos: (range.start as usize).min(end),
            end,
            line,
            pushed: Vec::new(),
        }
    }

    /// Tokenize a whole source, including the trailing `Eof`.
    pub fn tokenize(source: &'src str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Line of the next unread character.
    pub fn line(&self) -> u32 {
        self.pushed.last().map_or(self.line, |t| t.line)
    }

    /// Return `token` to the stream; the next `next_token` yields it again.
    pub fn push_back(&mut self, token: Token) {
        self.pushed.push(token);
    }

    /// Read the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token, LexError> {
        let token = match self.pushed.pop() {
            Some(token) => token,
            None => self.scan_token()?,
        };
        let top = self.pushed.len();
        self.pushed.push(token);
        Ok(&self.pushed[top])
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.pushed.pop() {
            Some(token) => Ok(token),
            None => self.scan_token(),
        }
    }

    // Character cursor

    fn rest(&self) -> &'src str {
        self.source.get(self.pos..self.end).unwrap_or("")
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.pos)
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek_char(), self.peek_char_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    let line = self.line;
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.eat('/') => break,
                            Some(_) => {}
                            None => {
                                return Err(LexError::UnterminatedComment {
                                    span: self.span_from(start),
                                    line,
                                })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let start = self.pos;
        let line = self.line;
        let Some(c) = self.bump() else {
            return Ok(Token::new(TokenKind::Eof, self.span_from(start), line));
        };

        let kind = match c {
            c if is_ident_start(c) => self.scan_ident(start),
            '0'..='9' => self.scan_number(start),
            '"' | '\'' => TokenKind::Str(self.scan_string(c, start, line)?),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '+' if self.eat('+') => TokenKind::PlusPlus,
            '+' => TokenKind::Plus,
            '-' if self.eat('-') => TokenKind::MinusMinus,
            '-' if self.eat('>') => TokenKind::Arrow,
            '-' => TokenKind::Minus,
            '!' if self.eat('=') => TokenKind::NotEq,
            '!' => TokenKind::Bang,
            '<' if self.eat('=') => TokenKind::LtEq,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::GtEq,
            '>' => TokenKind::Gt,
            '=' if self.eat('=') => TokenKind::EqEq,
            '=' => TokenKind::Eq,
            '&' if self.eat('&') => TokenKind::AmpAmp,
            '|' if self.eat('|') => TokenKind::PipePipe,
            other => {
                return Err(LexError::IllegalCharacter {
                    ch: other,
                    span: self.span_from(start),
                    line,
                })
            }
        };
        Ok(Token::new(kind, self.span_from(start), line))
    }

    fn scan_ident(&mut self, start: usize) -> TokenKind {
        while self.peek_char().is_some_and(is_ident_continue) {
            self.bump();
        }
        let text = self.source.get(start..self.pos).unwrap_or("");
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(Name::new(text)))
    }

    fn scan_number(&mut self, start: usize) -> TokenKind {
        self.eat_digits();
        if self.peek_char() == Some('.') && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.bump();
            self.eat_digits();
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let signed = matches!(self.peek_char_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_char_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.bump();
                }
                self.eat_digits();
            }
        }
        TokenKind::Number(Name::new(self.source.get(start..self.pos).unwrap_or("0")))
    }

    fn eat_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn scan_string(&mut self, quote: char, start: usize, line: u32) -> Result<StrLiteral, LexError> {
        let interpolates = quote == '"';
        let mut parts = Vec::new();
        let mut text = String::new();
        loop {
            let Some(c) = self.peek_char() else {
                return Err(LexError::UnterminatedString {
                    span: self.span_from(start),
                    line,
                });
            };
            if c == quote {
                self.bump();
                break;
            }
            if c == '\\' {
                self.bump();
                text.push(self.scan_escape()?);
            } else if interpolates && c == '$' && self.peek_char_at(1) == Some('{') {
                let open = self.pos;
                let open_line = self.line;
                self.bump();
                self.bump();
                if !text.is_empty() {
                    parts.push(StrPart::Text(mem::take(&mut text)));
                }
                parts.push(StrPart::Code(self.scan_interpolation(open, open_line)?));
            } else {
                self.bump();
                text.push(c);
            }
        }
        if !text.is_empty() || parts.is_empty() {
            parts.push(StrPart::Text(text));
        }
        Ok(StrLiteral { parts })
    }

    fn scan_escape(&mut self) -> Result<char, LexError> {
        let start = self.pos.saturating_sub(1);
        let line = self.line;
        let Some(c) = self.bump() else {
            return Err(LexError::UnterminatedEscape {
                span: self.span_from(start),
                line,
            });
        };
        Ok(match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            '$' => '$',
            'u' => {
                let mut digits = String::with_capacity(4);
                for _ in 0..4 {
                    match self.peek_char() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            self.bump();
                            digits.push(d);
                        }
                        Some(_) => break,
                        None => {
                            return Err(LexError::UnterminatedEscape {
                                span: self.span_from(start),
                                line,
                            })
                        }
                    }
                }
                let decoded = if digits.len() == 4 {
                    u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(ch) => ch,
                    None => {
                        return Err(LexError::InvalidUnicodeEscape {
                            digits,
                            span: self.span_from(start),
                            line,
                        })
                    }
                }
            }
            other => {
                return Err(LexError::InvalidEscape {
                    ch: other,
                    span: self.span_from(start),
                    line,
                })
            }
        })
    }

    /// Scan the code of a `${...}` whose `${` started at `open`.
    ///
    /// Leaves the cursor after the closing `}` and returns the code range.
    fn scan_interpolation(&mut self, open: usize, open_line: u32) -> Result<Span, LexError> {
        let code_start = self.pos;
        let mut inner = Lexer {
            source: self.source,
            pos: self.pos,
            end: self.end,
            line: self.line,
            pushed: Vec::new(),
        };
        let mut depth = 0usize;
        loop {
            // A string left open inside `${` runs into the outer closing quote.
            let token = inner.next_token().map_err(|err| match err {
                LexError::UnterminatedString { .. } => LexError::UnterminatedInterpolation {
                    span: Span::from_range(open..self.end),
                    line: open_line,
                },
                other => other,
            })?;
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => {
                    self.pos = inner.pos;
                    self.line = inner.line;
                    return Ok(Span::from_range(code_start..token.span.start as usize));
                }
                TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => {
                    return Err(LexError::UnterminatedInterpolation {
                        span: Span::from_range(open..self.end),
                        line: open_line,
                    })
                }
                _ => {}
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests;
