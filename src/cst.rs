//! Concrete-syntax tree nodes produced by the parser driver: every
//! reduction builds one internal node whose children are
//! exactly the symbols on the right-hand side of the production used (zero
//! children for an epsilon production), and every shift pushes one leaf
//! holding the shifted [`Token`].

use crate::grammar::Production;
use crate::token::{NonTerminal, Symbol, Token};
use ptree::{Style, TreeItem};
use std::borrow::Cow;
use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CstNode {
    /// A shifted token, a tree leaf.
    Leaf(Token),
    /// A reduction's result: the non-terminal reduced to, the production
    /// index used (for debugging/printing), and its children in
    /// right-hand-side order.
    Node {
        symbol: NonTerminal,
        production: usize,
        children: Vec<CstNode>,
    },
}

impl CstNode {
    pub fn leaf(token: Token) -> Self {
        CstNode::Leaf(token)
    }

    /// Build an internal node, asserting the invariant that its child
    /// count matches the production's effective right-hand-side length
    /// (zero for an epsilon production; see
    /// [`Production::len`](crate::grammar::Production::len)).
    pub fn node(production_idx: usize, production: &Production, children: Vec<CstNode>) -> Self {
        debug_assert_eq!(
            children.len(),
            production.len(),
            "reduction by production {} produced {} children, expected {}",
            production_idx,
            children.len(),
            production.len()
        );
        CstNode::Node {
            symbol: production.left,
            production: production_idx,
            children,
        }
    }

    pub fn symbol(&self) -> Symbol {
        match self {
            CstNode::Leaf(token) => Symbol::Terminal(token.kind),
            CstNode::Node { symbol, .. } => Symbol::NonTerminal(*symbol),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, CstNode::Leaf(_))
    }

    pub fn children(&self) -> &[CstNode] {
        match self {
            CstNode::Leaf(_) => &[],
            CstNode::Node { children, .. } => children,
        }
    }

    /// The byte span this node covers: a leaf's own token span, or the
    /// span from its first child's start to its last child's end (`0..0`
    /// for a childless epsilon reduction, which carries no source text).
    pub fn span(&self) -> (usize, usize) {
        match self {
            CstNode::Leaf(token) => (token.start, token.end),
            CstNode::Node { children, .. } => match (children.first(), children.last()) {
                (Some(first), Some(last)) => (first.span().0, last.span().1),
                _ => (0, 0),
            },
        }
    }

    /// Depth-first search for the first node carrying `symbol`.
    pub fn find_tree(&self, symbol: Symbol) -> Option<&CstNode> {
        if self.symbol() == symbol {
            Some(self)
        } else {
            self.children().iter().find_map(|child| child.find_tree(symbol))
        }
    }

    /// Every node carrying `symbol`, in depth-first order.
    pub fn list_tree(&self, symbol: Symbol) -> Vec<&CstNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.symbol() == symbol {
                found.push(node);
            }
        });
        found
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.find_tree(symbol).is_some()
    }

    fn walk<'a, F: FnMut(&'a CstNode)>(&'a self, visit: &mut F) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// The token sequence this tree yields, read left to right: the
    /// lexer's token stream with interior nodes erased. Used to check
    /// that a parse tree reproduces exactly the input it was built from.
    pub fn yield_tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.walk(&mut |node| {
            if let CstNode::Leaf(token) = node {
                tokens.push(token);
            }
        });
        tokens
    }
}

impl TreeItem for CstNode {
    type Child = CstNode;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &Style) -> std::io::Result<()> {
        match self {
            CstNode::Leaf(token) => write!(f, "{}", token),
            CstNode::Node { symbol, production, .. } => write!(f, "{} (production {})", symbol, production),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(CstNode::children(self))
    }
}

impl CstNode {
    /// Render the tree to `stdout` as an indented text tree.
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }

    /// Render the tree into a caller-supplied writer, used by the CLI to
    /// write `output/ast.txt`.
    pub fn write_tree<W: std::io::Write>(&self, writer: W) -> std::io::Result<()> {
        ptree::write_tree(self, writer)
    }
}

impl std::fmt::Display for CstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CstNode::Leaf(token) => write!(f, "{}", token),
            CstNode::Node { symbol, children, .. } => {
                let rendered: Vec<String> = children.iter().map(|c| c.to_string()).collect();
                f.debug_struct("")
                    .field("symbol", symbol)
                    .field("children", &rendered)
                    .finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::token::Terminal;

    #[test]
    fn leaf_span_is_its_token_span() {
        let leaf = CstNode::leaf(Token::new(Terminal::Id, "x", 3, 4));
        assert_eq!(leaf.span(), (3, 4));
    }

    #[test]
    fn node_child_count_must_match_production_length() {
        let grammar = Grammar::rust_subset();
        let production_idx = grammar
            .productions
            .iter()
            .position(|p| p.left == NonTerminal::AssignableItem)
            .unwrap();
        let production = &grammar.productions[production_idx];
        let leaf = CstNode::leaf(Token::new(Terminal::Id, "x", 0, 1));
        let node = CstNode::node(production_idx, production, vec![leaf]);
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn epsilon_reduction_has_no_children() {
        let grammar = Grammar::rust_subset();
        let production_idx = grammar
            .productions
            .iter()
            .position(|p| p.left == NonTerminal::DeclareList && p.is_epsilon())
            .unwrap();
        let production = &grammar.productions[production_idx];
        let node = CstNode::node(production_idx, production, Vec::new());
        assert_eq!(node.span(), (0, 0));
        assert!(node.children().is_empty());
    }

    #[test]
    fn yield_tokens_reads_leaves_left_to_right() {
        let a = CstNode::leaf(Token::new(Terminal::Id, "a", 0, 1));
        let b = CstNode::leaf(Token::new(Terminal::Semicolon, ";", 1, 2));
        let grammar = Grammar::rust_subset();
        let production_idx = grammar
            .productions
            .iter()
            .position(|p| p.left == NonTerminal::Sentence && p.right.len() == 1)
            .unwrap();
        let production = &grammar.productions[production_idx];
        // Borrow a two-child shape loosely just to exercise yield order;
        // production child-count isn't asserted here since we're reusing
        // an arbitrary single-child production's symbol only.
        let node = CstNode::Node {
            symbol: production.left,
            production: production_idx,
            children: vec![a, b],
        };
        let tokens: Vec<&str> = node.yield_tokens().iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(tokens, vec!["a", ";"]);
    }
}
