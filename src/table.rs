//! Canonical LR(1) table builder: item-set closure, GOTO transitions,
//! canonical-state enumeration, and ACTION/GOTO emission with conflict
//! detection.
//!
//! Item-set hashing canonicalizes a state's items with the same
//! `(production, dot)` into one item with a unioned lookahead set, rather
//! than keeping lookahead-distinct items around. That canonical map is
//! exactly what's hashed/compared for state deduplication, so it doubles
//! as the item-set representation itself.

use crate::error::TableError;
use crate::grammar::Grammar;
use crate::token::{NonTerminal, Symbol, Terminal};
use crate::util::Log;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

/// `(production index, dot position) -> unioned lookahead set`, the
/// canonical representation of an LR(1) item set.
type ItemSet = BTreeMap<(usize, usize), BTreeSet<Terminal>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct State {
    items: ItemSet,
}

/// Closure of an item set under the LR(1) rules: for every
/// item `[A -> a . B beta, lookahead]` with `B` a non-terminal, add
/// `[B -> . gamma, FIRST(beta lookahead)]` for every production of `B`,
/// iterating to a fixed point.
fn closure(grammar: &Grammar, mut items: ItemSet) -> ItemSet {
    loop {
        let mut additions: Vec<((usize, usize), BTreeSet<Terminal>)> = Vec::new();
        for (&(production_idx, dot), lookahead) in items.iter() {
            let production = &grammar.productions[production_idx];
            if let Some(Symbol::NonTerminal(b)) = production.symbol_at(dot) {
                let beta = &production.right[dot + 1..];
                let first_beta_lookahead = grammar.first_of_sequence(beta, lookahead);
                for (idx, candidate) in grammar.productions.iter().enumerate() {
                    if candidate.left == b {
                        additions.push(((idx, 0), first_beta_lookahead.clone()));
                    }
                }
            }
        }

        let mut changed = false;
        for (key, new_lookaheads) in additions {
            let entry = items.entry(key).or_default();
            let before = entry.len();
            entry.extend(new_lookaheads);
            if entry.len() != before {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    items
}

/// `GOTO(I, X)`: the closure of every item in `I` with the dot advanced
/// past `X`. `None` if no item in `I` has `X` after its dot.
fn goto(grammar: &Grammar, state: &State, symbol: Symbol) -> Option<State> {
    let mut next: ItemSet = BTreeMap::new();
    for (&(production_idx, dot), lookahead) in state.items.iter() {
        let production = &grammar.productions[production_idx];
        if production.symbol_at(dot) == Some(symbol) {
            next.entry((production_idx, dot + 1))
                .or_default()
                .extend(lookahead.iter().copied());
        }
    }
    if next.is_empty() {
        None
    } else {
        Some(State {
            items: closure(grammar, next),
        })
    }
}

/// The driver's decision at a given (state, terminal) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept(usize),
}

impl Action {
    fn describe(&self) -> String {
        match self {
            Action::Shift(s) => format!("shift to state {}", s),
            Action::Reduce(p) => format!("reduce by production {}", p),
            Action::Accept(p) => format!("accept via production {}", p),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// ACTION/GOTO tables over the canonical LR(1) state collection. Built
/// once at startup and read-only thereafter.
pub struct Table {
    action: HashMap<(usize, Terminal), Action>,
    goto: HashMap<(usize, NonTerminal), usize>,
    state_count: usize,
}

impl Table {
    pub fn action(&self, state: usize, terminal: Terminal) -> Option<Action> {
        self.action.get(&(state, terminal)).copied()
    }

    pub fn goto(&self, state: usize, non_terminal: NonTerminal) -> Option<usize> {
        self.goto.get(&(state, non_terminal)).copied()
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }
}

fn insert_action(
    action: &mut HashMap<(usize, Terminal), Action>,
    state: usize,
    terminal: Terminal,
    candidate: Action,
) -> Result<(), TableError> {
    match action.entry((state, terminal)) {
        Entry::Occupied(existing) => {
            if *existing.get() == candidate {
                Ok(())
            } else {
                Err(TableError {
                    state,
                    symbol: terminal,
                    existing: existing.get().describe(),
                    attempted: candidate.describe(),
                })
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(candidate);
            Ok(())
        }
    }
}

fn intern_state(
    states: &mut Vec<State>,
    state_ids: &mut HashMap<State, usize>,
    worklist: &mut Vec<usize>,
    state: State,
) -> usize {
    if let Some(&id) = state_ids.get(&state) {
        return id;
    }
    let id = states.len();
    state_ids.insert(state.clone(), id);
    states.push(state);
    worklist.push(id);
    id
}

/// Builds the canonical LR(1) collection and the ACTION/GOTO tables for a
/// [`Grammar`].
pub struct TableBuilder;

impl TableBuilder {
    /// Build the table with no trace output. Fails fast with [`TableError`]
    /// at the first shift/shift, shift/reduce, or reduce/reduce conflict
    /// encountered; there are no precedence declarations to break a tie,
    /// so the grammar must be unambiguously LR(1).
    pub fn build(grammar: &Grammar) -> Result<Table, TableError> {
        Self::build_traced(grammar, Log::None)
    }

    /// Build the table, printing a state-discovery trace gated by
    /// `trace`'s level (debug builds only; see [`Log::log`]).
    pub fn build_traced(grammar: &Grammar, trace: Log<&'static str>) -> Result<Table, TableError> {
        let initial_items: ItemSet = {
            let mut seed = BTreeMap::new();
            seed.insert((0usize, 0usize), [Terminal::Eof].into_iter().collect());
            closure(grammar, seed)
        };

        let mut states = vec![State { items: initial_items.clone() }];
        let mut state_ids = HashMap::new();
        state_ids.insert(State { items: initial_items }, 0usize);

        let mut action = HashMap::new();
        let mut goto_table = HashMap::new();
        let mut worklist = vec![0usize];

        while let Some(state_id) = worklist.pop() {
            let current = states[state_id].clone();
            trace.log(
                Log::Default(()),
                format!("processing state {}, {} items", state_id, current.items.len()),
            );

            // Reduce (and accept) actions, one per reducible item's
            // lookahead set.
            for (&(production_idx, dot), lookaheads) in current.items.iter() {
                let production = &grammar.productions[production_idx];
                if dot != production.len() {
                    continue;
                }
                for &lookahead in lookaheads {
                    let candidate = if production.left == grammar.start && lookahead == Terminal::Eof {
                        Action::Accept(production_idx)
                    } else {
                        Action::Reduce(production_idx)
                    };
                    insert_action(&mut action, state_id, lookahead, candidate)?;
                }
            }

            // Shifts: terminals in declaration order, for deterministic
            // table construction.
            for &terminal in Terminal::ALL.iter() {
                if let Some(next_state) = goto(grammar, &current, Symbol::Terminal(terminal)) {
                    let next_id = intern_state(&mut states, &mut state_ids, &mut worklist, next_state);
                    insert_action(&mut action, state_id, terminal, Action::Shift(next_id))?;
                }
            }

            // GOTOs: non-terminals in declaration order, after terminals.
            for &non_terminal in NonTerminal::ALL.iter() {
                if let Some(next_state) = goto(grammar, &current, Symbol::NonTerminal(non_terminal)) {
                    let next_id = intern_state(&mut states, &mut state_ids, &mut worklist, next_state);
                    goto_table.insert((state_id, non_terminal), next_id);
                }
            }
        }

        trace.log(Log::Success(()), format!("built {} states", states.len()));
        Ok(Table {
            action,
            goto: goto_table,
            state_count: states.len(),
        })
    }
}
