//! The shift/reduce driver and the `Parser` façade that bundles a fixed
//! [`Grammar`]/[`Table`] pair behind `tokenize`/`parse`.

use crate::cst::CstNode;
use crate::error::{Error, SyntaxError};
use crate::grammar::Grammar;
use crate::lexer;
use crate::table::{Action, Table, TableBuilder};
use crate::token::Token;
use crate::util::Log;

/// A single parallel stack of `(state, node)` pairs: the bottom
/// entry `(0, None)` carries no node because nothing has been shifted or
/// reduced onto it yet, and is never popped: every reduction's arity
/// counts only the symbols actually produced, so the stack never
/// underflows into it.
fn drive(
    grammar: &Grammar,
    table: &Table,
    tokens: &[Token],
    trace: Log<&'static str>,
) -> Result<CstNode, Error> {
    let mut stack: Vec<(usize, Option<CstNode>)> = vec![(0, None)];
    let mut pos = 0;

    loop {
        let state = stack.last().expect("stack is never emptied").0;
        let token = tokens.get(pos).expect("token stream must end with Eof");

        match table.action(state, token.kind) {
            Some(Action::Shift(next_state)) => {
                trace.log(Log::Verbose(()), format!("state {}: shift {} -> {}", state, token, next_state));
                stack.push((next_state, Some(CstNode::leaf(token.clone()))));
                pos += 1;
            }
            Some(Action::Reduce(production_idx)) => {
                let production = &grammar.productions[production_idx];
                trace.log(Log::Verbose(()), format!("state {}: reduce by {}", state, production));
                let children = pop_children(&mut stack, production.len());
                let node = CstNode::node(production_idx, production, children);
                let from_state = stack.last().expect("stack is never emptied").0;
                let goto_state = table.goto(from_state, production.left).ok_or_else(|| {
                    SyntaxError::InternalTableInconsistency {
                        state: from_state,
                        non_terminal: production.left.to_string(),
                    }
                })?;
                stack.push((goto_state, Some(node)));
            }
            Some(Action::Accept(production_idx)) => {
                trace.log(Log::Success(()), "accept");
                let production = &grammar.productions[production_idx];
                let children = pop_children(&mut stack, production.len());
                return Ok(CstNode::node(production_idx, production, children));
            }
            None => {
                return Err(SyntaxError::ParseError {
                    state,
                    token: token.to_string(),
                }
                .into());
            }
        }
    }
}

fn pop_children(stack: &mut Vec<(usize, Option<CstNode>)>, arity: usize) -> Vec<CstNode> {
    let mut children = Vec::with_capacity(arity);
    for _ in 0..arity {
        let (_, node) = stack.pop().expect("reduction arity exceeds the stack depth");
        children.push(node.expect("a shifted or reduced stack entry always carries a node"));
    }
    children.reverse();
    children
}

/// Bundles the fixed Rust-subset grammar and its LR(1) table, built once,
/// behind the `tokenize`/`parse` entry points the CLI drives. Carries an
/// optional [`Log`] trace label, consulted only in debug builds, letting a
/// caller opt into tracing (the CLI's `--trace` flag) without touching
/// library internals.
pub struct Parser {
    grammar: Grammar,
    table: Table,
    trace: Log<&'static str>,
}

impl Parser {
    /// Build the grammar and its LR(1) table with no trace output. Fails
    /// only if the grammar itself is ambiguous, which would be a bug in
    /// this crate rather than in any particular input program.
    pub fn new() -> Result<Self, Error> {
        Self::with_trace(Log::None)
    }

    /// Build the grammar and its LR(1) table, printing a state-discovery
    /// trace at build time and a shift/reduce trace at parse time, both
    /// gated by `trace`'s level.
    pub fn with_trace(trace: Log<&'static str>) -> Result<Self, Error> {
        let grammar = Grammar::rust_subset();
        let table = TableBuilder::build_traced(&grammar, trace)?;
        Ok(Self { grammar, table, trace })
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, Error> {
        Ok(lexer::lex_traced(source, self.trace)?)
    }

    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<CstNode, Error> {
        drive(&self.grammar, &self.table, tokens, self.trace)
    }

    pub fn parse(&self, source: &str) -> Result<CstNode, Error> {
        let tokens = self.tokenize(source)?;
        self.parse_tokens(&tokens)
    }

    pub fn tokenize_and_parse(&self, source: &str) -> Result<(Vec<Token>, CstNode), Error> {
        let tokens = self.tokenize(source)?;
        let tree = self.parse_tokens(&tokens)?;
        Ok((tokens, tree))
    }

    pub fn state_count(&self) -> usize {
        self.table.state_count()
    }
}
