//! Grammar model: productions over terminal/non-terminal symbols, plus
//! FIRST-set and nullability computation.

use crate::token::{NonTerminal, Symbol, Terminal};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::{Display, Formatter};

/// An ordered pair `(left, right)`: a production's left-hand non-terminal
/// and its right-hand symbol sequence. Indexed by position in the
/// grammar's declaration order; that index is used everywhere in the
/// table builder and driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub left: NonTerminal,
    pub right: Vec<Symbol>,
}

impl Production {
    pub fn new(left: NonTerminal, right: Vec<Symbol>) -> Self {
        Self { left, right }
    }

    /// True when the right-hand side is the sole `Empty` marker, i.e. this
    /// production rewrites `left` to nothing.
    pub fn is_epsilon(&self) -> bool {
        matches!(
            self.right.as_slice(),
            [Symbol::NonTerminal(NonTerminal::Empty)]
        )
    }

    /// Right-hand-side length for table-building and driver purposes:
    /// zero for an epsilon production, `right.len()` otherwise. Treating
    /// `Empty` as contributing zero real symbols (here and in every place
    /// the table builder reads the rhs) keeps a production like
    /// `DeclareList -> Empty` reducible the moment its item is created
    /// instead of needing a closure transition across a symbol that never
    /// appears as real input.
    pub fn len(&self) -> usize {
        if self.is_epsilon() {
            0
        } else {
            self.right.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The symbol at dot position `dot`, or `None` once the dot has
    /// reached the end (always `None` for an epsilon production).
    pub fn symbol_at(&self, dot: usize) -> Option<Symbol> {
        if self.is_epsilon() {
            None
        } else {
            self.right.get(dot).copied()
        }
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_epsilon() {
            return write!(f, "[{} -> Empty]", self.left);
        }
        let rhs = self
            .right
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "[{} -> {}]", self.left, rhs)
    }
}

/// An immutable collection of productions plus the designated start
/// symbol, with derived FIRST sets and nullability computed once at
/// construction.
pub struct Grammar {
    pub productions: Vec<Production>,
    pub start: NonTerminal,
    first_sets: HashMap<NonTerminal, HashSet<Terminal>>,
    nullable: HashSet<NonTerminal>,
}

impl Grammar {
    /// Build a grammar and compute its FIRST sets / nullable set to a
    /// fixed point. `productions[0]` must have `start` on its left, the
    /// canonical augmented-start invariant the table builder relies on.
    pub fn new(productions: Vec<Production>, start: NonTerminal) -> Self {
        debug_assert_eq!(
            productions[0].left, start,
            "production 0 must have the start symbol on its left"
        );
        let mut grammar = Self {
            productions,
            start,
            first_sets: NonTerminal::ALL.iter().map(|nt| (*nt, HashSet::new())).collect(),
            nullable: HashSet::new(),
        };
        grammar.compute_first_sets();
        grammar
    }

    fn compute_first_sets(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                if production.is_epsilon() {
                    if self.nullable.insert(production.left) {
                        changed = true;
                    }
                    continue;
                }
                for symbol in &production.right {
                    match symbol {
                        Symbol::Terminal(terminal) => {
                            if self.first_sets.get_mut(&production.left).unwrap().insert(*terminal) {
                                changed = true;
                            }
                            break;
                        }
                        Symbol::NonTerminal(nt) => {
                            let additions: Vec<Terminal> =
                                self.first_sets[nt].iter().copied().collect();
                            for terminal in additions {
                                if self.first_sets.get_mut(&production.left).unwrap().insert(terminal) {
                                    changed = true;
                                }
                            }
                            if !self.nullable.contains(nt) {
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn is_nullable(&self, non_terminal: NonTerminal) -> bool {
        self.nullable.contains(&non_terminal)
    }

    pub fn first_of(&self, non_terminal: NonTerminal) -> &HashSet<Terminal> {
        &self.first_sets[&non_terminal]
    }

    /// FIRST(βa) for the closure step: scan `beta` left-to-right unioning
    /// FIRST of each symbol, stopping at the first non-nullable symbol; if
    /// every symbol in `beta` is nullable, union in the lookahead set `a`
    /// too.
    pub fn first_of_sequence(
        &self,
        beta: &[Symbol],
        lookahead: &BTreeSet<Terminal>,
    ) -> BTreeSet<Terminal> {
        let mut result = BTreeSet::new();
        let mut beta_is_nullable = true;
        for symbol in beta {
            match symbol {
                Symbol::Terminal(terminal) => {
                    result.insert(*terminal);
                    beta_is_nullable = false;
                    break;
                }
                Symbol::NonTerminal(nt) => {
                    result.extend(self.first_sets[nt].iter().copied());
                    if !self.nullable.contains(nt) {
                        beta_is_nullable = false;
                        break;
                    }
                }
            }
        }
        if beta_is_nullable {
            result.extend(lookahead.iter().copied());
        }
        result
    }

    /// The fixed grammar for the Rust-flavored subset this crate parses,
    /// with the `Factor -> Factor` typo in the source production list
    /// resolved to `Factor -> Element` (see DESIGN.md).
    pub fn rust_subset() -> Grammar {
        use NonTerminal as N;
        use Terminal as T;

        fn t(terminal: Terminal) -> Symbol {
            Symbol::Terminal(terminal)
        }
        fn n(non_terminal: NonTerminal) -> Symbol {
            Symbol::NonTerminal(non_terminal)
        }
        fn empty() -> Symbol {
            Symbol::NonTerminal(NonTerminal::Empty)
        }

        let productions = vec![
            // 1.1
            Production::new(N::Program, vec![n(N::DeclareList)]),
            Production::new(N::DeclareList, vec![empty()]),
            Production::new(N::DeclareList, vec![n(N::Declare), n(N::DeclareList)]),
            Production::new(N::Declare, vec![n(N::FunctionDeclare)]),
            Production::new(
                N::FunctionDeclare,
                vec![n(N::FunctionHeaderDeclare), n(N::SentenceBlock)],
            ),
            Production::new(
                N::FunctionHeaderDeclare,
                vec![t(T::Fn), t(T::Id), t(T::LParen), n(N::ParameterList), t(T::RParen)],
            ),
            Production::new(N::ParameterList, vec![empty()]),
            Production::new(
                N::SentenceBlock,
                vec![t(T::LBrace), n(N::SentenceList), t(T::RBrace)],
            ),
            Production::new(N::SentenceList, vec![empty()]),
            // 1.2
            Production::new(N::SentenceList, vec![n(N::Sentence), n(N::SentenceList)]),
            Production::new(N::Sentence, vec![t(T::Semicolon)]),
            // 1.3
            Production::new(N::Sentence, vec![n(N::ReturnSentence)]),
            Production::new(N::ReturnSentence, vec![t(T::Return), t(T::Semicolon)]),
            // 1.4
            Production::new(N::ParameterList, vec![n(N::Parameter)]),
            Production::new(
                N::ParameterList,
                vec![n(N::Parameter), t(T::Comma), n(N::ParameterList)],
            ),
            Production::new(
                N::Parameter,
                vec![n(N::VarDeclareInner), t(T::Colon), n(N::Type)],
            ),
            // 1.5
            Production::new(
                N::FunctionHeaderDeclare,
                vec![
                    t(T::Fn),
                    t(T::Id),
                    t(T::LParen),
                    n(N::ParameterList),
                    t(T::RParen),
                    t(T::Arrow),
                    n(N::Type),
                ],
            ),
            Production::new(
                N::ReturnSentence,
                vec![t(T::Return), n(N::Expression), t(T::Semicolon)],
            ),
            // 2.1
            Production::new(N::Sentence, vec![n(N::VarDeclareSentence)]),
            Production::new(
                N::VarDeclareSentence,
                vec![t(T::Let), n(N::VarDeclareInner), t(T::Colon), n(N::Type), t(T::Semicolon)],
            ),
            Production::new(
                N::VarDeclareSentence,
                vec![t(T::Let), n(N::VarDeclareInner), t(T::Semicolon)],
            ),
            // 2.2
            Production::new(N::Sentence, vec![n(N::AssignSentence)]),
            Production::new(
                N::AssignSentence,
                vec![n(N::AssignableItem), t(T::Equal), n(N::Expression), t(T::Semicolon)],
            ),
            // 2.3
            Production::new(N::Sentence, vec![n(N::VarDeclareAndAssignSentence)]),
            Production::new(
                N::VarDeclareAndAssignSentence,
                vec![
                    t(T::Let),
                    n(N::VarDeclareInner),
                    t(T::Colon),
                    n(N::Type),
                    t(T::Equal),
                    n(N::Expression),
                    t(T::Semicolon),
                ],
            ),
            Production::new(
                N::VarDeclareAndAssignSentence,
                vec![t(T::Let), n(N::VarDeclareInner), t(T::Equal), n(N::Expression), t(T::Semicolon)],
            ),
            // 3.1
            Production::new(N::Sentence, vec![n(N::Expression), t(T::Semicolon)]),
            Production::new(N::Expression, vec![n(N::AddExpression)]),
            Production::new(N::AddExpression, vec![n(N::Item)]),
            Production::new(N::Item, vec![n(N::Factor)]),
            Production::new(N::Factor, vec![n(N::Element)]),
            Production::new(N::Element, vec![t(T::Num)]),
            Production::new(N::Element, vec![n(N::AssignableItem)]),
            Production::new(N::Element, vec![t(T::LParen), n(N::Expression), t(T::RParen)]),
            // 3.2
            Production::new(
                N::Expression,
                vec![n(N::Expression), n(N::CompareOperator), n(N::AddExpression)],
            ),
            Production::new(
                N::AddExpression,
                vec![n(N::AddExpression), n(N::AddSubOperator), n(N::Item)],
            ),
            Production::new(N::Item, vec![n(N::Item), n(N::MulDivOperator), n(N::Factor)]),
            Production::new(N::CompareOperator, vec![t(T::Lt)]),
            Production::new(N::CompareOperator, vec![t(T::Gt)]),
            Production::new(N::CompareOperator, vec![t(T::Gte)]),
            Production::new(N::CompareOperator, vec![t(T::Lte)]),
            Production::new(N::CompareOperator, vec![t(T::EqEq)]),
            Production::new(N::CompareOperator, vec![t(T::Ne)]),
            Production::new(N::AddSubOperator, vec![t(T::Plus)]),
            Production::new(N::AddSubOperator, vec![t(T::Minus)]),
            Production::new(N::MulDivOperator, vec![t(T::Star)]),
            Production::new(N::MulDivOperator, vec![t(T::Slash)]),
            // 3.3
            Production::new(
                N::Element,
                vec![t(T::Id), t(T::LParen), n(N::ArgumentList), t(T::RParen)],
            ),
            Production::new(N::ArgumentList, vec![empty()]),
            Production::new(N::ArgumentList, vec![n(N::Expression)]),
            Production::new(
                N::ArgumentList,
                vec![n(N::Expression), t(T::Comma), n(N::ArgumentList)],
            ),
            // 4.1
            Production::new(N::Sentence, vec![n(N::IfSentence)]),
            Production::new(
                N::IfSentence,
                vec![t(T::If), n(N::Expression), n(N::SentenceBlock), n(N::ElsePart)],
            ),
            Production::new(N::ElsePart, vec![empty()]),
            Production::new(N::ElsePart, vec![t(T::Else), n(N::SentenceBlock)]),
            // 5.1
            Production::new(N::Sentence, vec![n(N::LoopSentence)]),
            Production::new(N::LoopSentence, vec![n(N::WhileSentence)]),
            Production::new(
                N::WhileSentence,
                vec![t(T::While), n(N::Expression), n(N::SentenceBlock)],
            ),
            // 0.1
            Production::new(N::VarDeclareInner, vec![t(T::Mut), t(T::Id)]),
            // 0.2
            Production::new(N::Type, vec![t(T::I32)]),
            // 0.3
            Production::new(N::AssignableItem, vec![t(T::Id)]),
        ];

        Grammar::new(productions, N::Program)
    }
}
