//! Hand-rolled character scanner. Maximal-munch, single-pass, no
//! backtracking: at every position there is at most one legal token
//! shape, so a one-character lookahead always suffices.

use crate::error::LexError;
use crate::token::{Terminal, Token};
use crate::util::{Code, Log, Position};

/// Two-character operators, tried before their one-character prefixes so
/// `==`, `>=`, `<=`, `!=`, `->`, and `..` never split into two tokens.
const TWO_CHAR_OPERATORS: &[(char, char, Terminal)] = &[
    ('=', '=', Terminal::EqEq),
    ('>', '=', Terminal::Gte),
    ('<', '=', Terminal::Lte),
    ('!', '=', Terminal::Ne),
    ('-', '>', Terminal::Arrow),
    ('.', '.', Terminal::DotDot),
];

struct Lexer<'c> {
    code: Code<'c>,
    source: &'c str,
    pos: usize,
}

impl<'c> Lexer<'c> {
    fn new(source: &'c str) -> Self {
        Self {
            code: Code::from(source),
            source,
            pos: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn position_at(&self, pos: usize) -> Position {
        self.code.obtain_position(pos)
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.current() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Single-line `//` and non-nested block `/* */` comments. Returns
    /// `Ok(true)` if a comment was consumed, `Ok(false)` if the current
    /// position is not a comment opener at all.
    ///
    /// Deliberately reports [`LexError::UnterminatedBlockComment`] at the
    /// comment's *opening* position rather than the end-of-input position
    /// the original reference scanner used: the opening position is the
    /// only one a caller can actually point a cursor at.
    fn skip_comment(&mut self) -> Result<bool, LexError> {
        if self.current() != Some('/') {
            return Ok(false);
        }
        match self.peek() {
            Some('/') => {
                self.skip_while(|c| c != '\n');
                Ok(true)
            }
            Some('*') => {
                let opened_at = self.position_at(self.pos);
                self.advance_by(2); // consume `/*` so `/*/` isn't mistaken for a closer
                loop {
                    match self.current() {
                        None => return Err(LexError::UnterminatedBlockComment { opened_at }),
                        Some('*') if self.peek() == Some('/') => {
                            self.advance_by(2);
                            break;
                        }
                        Some(_) => self.advance(),
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn make_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        while let Some(c) = self.current() {
            if c.is_alphabetic() {
                return Err(LexError::MalformedNumber {
                    at: self.position_at(self.pos),
                    character: c,
                });
            }
            if !c.is_ascii_digit() {
                break;
            }
            self.advance();
        }
        Ok(Token::new(Terminal::Num, &self.source[start..self.pos], start, self.pos))
    }

    fn make_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let lexeme = &self.source[start..self.pos];
        let kind = Terminal::keyword(lexeme).unwrap_or(Terminal::Id);
        Token::new(kind, lexeme, start, self.pos)
    }

    fn try_two_char_operator(&mut self) -> Option<Token> {
        let first = self.current()?;
        let second = self.peek();
        let &(_, _, kind) = TWO_CHAR_OPERATORS
            .iter()
            .find(|&&(a, b, _)| first == a && second == Some(b))?;
        let start = self.pos;
        self.advance_by(2);
        Some(Token::new(kind, &self.source[start..self.pos], start, self.pos))
    }

    fn try_single_char_operator(&mut self, current: char) -> Option<Token> {
        let kind = match current {
            '=' => Terminal::Equal,
            '+' => Terminal::Plus,
            '-' => Terminal::Minus,
            '*' => Terminal::Star,
            '/' => Terminal::Slash,
            '>' => Terminal::Gt,
            '<' => Terminal::Lt,
            '(' => Terminal::LParen,
            ')' => Terminal::RParen,
            '{' => Terminal::LBrace,
            '}' => Terminal::RBrace,
            '[' => Terminal::LBracket,
            ']' => Terminal::RBracket,
            ';' => Terminal::Semicolon,
            ':' => Terminal::Colon,
            ',' => Terminal::Comma,
            '.' => Terminal::Dot,
            _ => return None,
        };
        let start = self.pos;
        self.advance();
        Some(Token::new(kind, &self.source[start..self.pos], start, self.pos))
    }

    fn tokenize(mut self, trace: Log<&'static str>) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let Some(current) = self.current() else {
                break;
            };

            if current.is_whitespace() {
                self.skip_while(|c| c.is_whitespace());
                continue;
            }

            if self.skip_comment()? {
                continue;
            }

            let token = if current.is_ascii_digit() {
                self.make_number()?
            } else if current.is_alphabetic() || current == '_' {
                self.make_identifier_or_keyword()
            } else if let Some(token) = self.try_two_char_operator() {
                token
            } else if let Some(token) = self.try_single_char_operator(current) {
                token
            } else {
                return Err(LexError::UnknownCharacter {
                    at: self.position_at(self.pos),
                    character: current,
                });
            };
            trace.trace(Log::Verbose(()), token.start, &self.code, &token);
            tokens.push(token);
        }
        let eof = Token::eof(self.pos);
        trace.trace(Log::Verbose(()), self.pos, &self.code, &eof);
        tokens.push(eof);
        Ok(tokens)
    }
}

/// Scan `source` into a token stream ending with exactly one
/// [`Terminal::Eof`] token.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize(Log::None)
}

/// Scan `source`, emitting a trace line for every token produced when
/// `trace`'s level is at least [`Log::Verbose`] (gated under
/// `cfg(debug_assertions)`).
pub fn lex_traced(source: &str, trace: Log<&'static str>) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize(trace)
}
