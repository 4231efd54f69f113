//! Error taxonomy. Every phase fails fast with a plain,
//! hand-written error type; no partial result ever escapes a failed phase.

use crate::token::Terminal;
use crate::util::Position;
use std::fmt::{Display, Formatter};

/// Raised by the [lexer](crate::lexer::Lexer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnknownCharacter { at: Position, character: char },
    UnterminatedBlockComment { opened_at: Position },
    MalformedNumber { at: Position, character: char },
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnknownCharacter { at, character } => {
                write!(f, "unknown character `{}` at {}", character, at)
            }
            LexError::UnterminatedBlockComment { opened_at } => {
                write!(f, "unterminated block comment at {}", opened_at)
            }
            LexError::MalformedNumber { at, character } => {
                write!(f, "unexpected `{}` in number at {}", character, at)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Raised while resolving a grammar symbol by name.
///
/// The fixed grammar this crate builds (`Grammar::rust_subset`) is a Rust
/// literal, not loaded from a name table at runtime, so this variant has
/// no live construction site today. It stays part of the taxonomy for a
/// grammar loaded from an external declaration, where a name could fail
/// to resolve to a known terminal/non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    pub symbol: String,
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown grammar symbol `{}`", self.symbol)
    }
}

impl std::error::Error for GrammarError {}

/// Raised by the LR(1) table builder on a shift/reduce or reduce/reduce
/// conflict. No precedence declarations exist to break the tie; the
/// grammar must be unambiguously LR(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableError {
    pub state: usize,
    pub symbol: Terminal,
    pub existing: String,
    pub attempted: String,
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "grammar conflict in state {} on `{}`: {} vs {}",
            self.state, self.symbol, self.existing, self.attempted
        )
    }
}

impl std::error::Error for TableError {}

/// Raised by the parser driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// No ACTION entry for (state, token).
    ParseError { state: usize, token: String },
    /// No GOTO entry after a reduction; indicates a bug in the table, not
    /// in the input.
    InternalTableInconsistency { state: usize, non_terminal: String },
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::ParseError { state, token } => {
                write!(f, "parse error at {} in state {}", token, state)
            }
            SyntaxError::InternalTableInconsistency {
                state,
                non_terminal,
            } => write!(
                f,
                "internal error: no GOTO entry for state {} and {}",
                state, non_terminal
            ),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// The union of every failure this crate's front end can produce, so a
/// caller driving `lex` then `parse` can propagate either with a single
/// `?` (see `src/bin/rlitec.rs`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Lex(LexError),
    Grammar(GrammarError),
    Table(TableError),
    Syntax(SyntaxError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Lex(e) => write!(f, "{}", e),
            Error::Grammar(e) => write!(f, "{}", e),
            Error::Table(e) => write!(f, "{}", e),
            Error::Syntax(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<LexError> for Error {
    fn from(value: LexError) -> Self {
        Error::Lex(value)
    }
}
impl From<GrammarError> for Error {
    fn from(value: GrammarError) -> Self {
        Error::Grammar(value)
    }
}
impl From<TableError> for Error {
    fn from(value: TableError) -> Self {
        Error::Table(value)
    }
}
impl From<SyntaxError> for Error {
    fn from(value: SyntaxError) -> Self {
        Error::Syntax(value)
    }
}
