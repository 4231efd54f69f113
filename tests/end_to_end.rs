//! Black-box end-to-end scenarios, exercised only through the public
//! `Parser` facade rather than reaching into table/grammar internals.

use lang_lr1::error::{Error, LexError, SyntaxError};
use lang_lr1::token::{NonTerminal, Symbol, Terminal};
use lang_lr1::Parser;

fn kinds(tokens: &[lang_lr1::token::Token]) -> Vec<Terminal> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn scenario_1_return_only_function() {
    let parser = Parser::new().unwrap();
    let (tokens, tree) = parser.tokenize_and_parse("fn main() { return; }").unwrap();
    assert_eq!(
        kinds(&tokens),
        vec![
            Terminal::Fn,
            Terminal::Id,
            Terminal::LParen,
            Terminal::RParen,
            Terminal::LBrace,
            Terminal::Return,
            Terminal::Semicolon,
            Terminal::RBrace,
            Terminal::Eof,
        ]
    );
    assert_eq!(tree.symbol(), Symbol::NonTerminal(NonTerminal::Program));
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::Declare)));
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::FunctionDeclare)));
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::FunctionHeaderDeclare)));
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::SentenceBlock)));
    let return_sentence = tree
        .find_tree(Symbol::NonTerminal(NonTerminal::ReturnSentence))
        .expect("a return sentence node");
    assert!(return_sentence
        .yield_tokens()
        .iter()
        .any(|t| t.kind == Terminal::Return));
}

#[test]
fn scenario_2_typed_parameter_and_return_expression() {
    let parser = Parser::new().unwrap();
    let tree = parser
        .parse("fn f(mut x: i32) -> i32 { return x + 1; }")
        .unwrap();

    let parameter_list = tree
        .find_tree(Symbol::NonTerminal(NonTerminal::ParameterList))
        .expect("a parameter list");
    let parameters = parameter_list.list_tree(Symbol::NonTerminal(NonTerminal::Parameter));
    assert_eq!(parameters.len(), 1);
    assert!(parameters[0].contains(Symbol::NonTerminal(NonTerminal::VarDeclareInner)));

    let add_expression = tree
        .find_tree(Symbol::NonTerminal(NonTerminal::AddExpression))
        .expect("an add expression");
    assert!(add_expression.contains(Symbol::Terminal(Terminal::Id)));
    assert!(add_expression.contains(Symbol::Terminal(Terminal::Num)));
    assert!(add_expression.contains(Symbol::NonTerminal(NonTerminal::AddSubOperator)));
}

#[test]
fn scenario_3_while_loop_with_assignment() {
    let parser = Parser::new().unwrap();
    let tree = parser
        .parse("fn g() { let mut i: i32 = 0; while i < 10 { i = i + 1; } }")
        .unwrap();

    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::VarDeclareAndAssignSentence)));
    let while_sentence = tree
        .find_tree(Symbol::NonTerminal(NonTerminal::WhileSentence))
        .expect("a while sentence");
    let assigns = while_sentence.list_tree(Symbol::NonTerminal(NonTerminal::AssignSentence));
    assert_eq!(assigns.len(), 1);
}

#[test]
fn scenario_4_dangling_expression_is_a_parse_error() {
    let parser = Parser::new().unwrap();
    let err = parser.parse("fn h() { 1 + }").unwrap_err();
    match err {
        Error::Syntax(SyntaxError::ParseError { token, .. }) => {
            assert!(token.contains('}'));
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn scenario_5_unterminated_block_comment_reports_opening_position() {
    let parser = Parser::new().unwrap();
    let err = parser.tokenize("fn i() { /* unterminated").unwrap_err();
    match err {
        Error::Lex(LexError::UnterminatedBlockComment { opened_at }) => {
            assert_eq!(opened_at.column, 10);
        }
        other => panic!("expected an unterminated block comment error, got {:?}", other),
    }
}

#[test]
fn scenario_6_letter_adjacent_to_digit_run_is_a_lex_error() {
    let parser = Parser::new().unwrap();
    let err = parser.tokenize("fn j() { 1a; }").unwrap_err();
    assert!(matches!(err, Error::Lex(LexError::MalformedNumber { .. })));
}

#[test]
fn empty_program_parses_successfully() {
    let parser = Parser::new().unwrap();
    let tree = parser.parse("").unwrap();
    assert_eq!(tree.symbol(), Symbol::NonTerminal(NonTerminal::Program));
}

#[test]
fn comment_only_program_behaves_like_empty_program() {
    let parser = Parser::new().unwrap();
    let empty = parser.parse("").unwrap();
    let commented = parser.parse("// just a comment\n/* and another */").unwrap();
    assert_eq!(empty, commented);
}

#[test]
fn two_char_operators_never_split_into_one_char_tokens() {
    let parser = Parser::new().unwrap();
    let tokens = parser
        .tokenize("fn k() -> i32 { return 1 == 1; }")
        .unwrap();
    assert!(kinds(&tokens).contains(&Terminal::EqEq));
    assert!(kinds(&tokens).contains(&Terminal::Arrow));
}

#[test]
fn lexeme_preservation_round_trip() {
    let parser = Parser::new().unwrap();
    let source = "fn main ( ) { return 0 ; }";
    let tokens = parser.tokenize(source).unwrap();
    let without_eof: String = tokens
        .iter()
        .filter(|t| t.kind != Terminal::Eof)
        .map(|t| t.lexeme.as_str())
        .collect::<Vec<_>>()
        .join("");
    let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(without_eof, stripped);
}

#[test]
fn tree_yield_matches_non_eof_token_sequence() {
    let parser = Parser::new().unwrap();
    let source = "fn main() { let mut x: i32 = 1; return x; }";
    let (tokens, tree) = parser.tokenize_and_parse(source).unwrap();
    let expected: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind != Terminal::Eof)
        .map(|t| t.lexeme.as_str())
        .collect();
    let actual: Vec<&str> = tree.yield_tokens().iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn pipeline_is_deterministic_across_repeated_runs() {
    let parser = Parser::new().unwrap();
    let source = "fn main() { if 1 < 2 { return 1; } else { return 0; } }";
    let (tokens1, tree1) = parser.tokenize_and_parse(source).unwrap();
    let (tokens2, tree2) = parser.tokenize_and_parse(source).unwrap();
    assert_eq!(tokens1, tokens2);
    assert_eq!(tree1, tree2);
}

#[test]
fn if_else_and_nested_function_calls_parse() {
    let parser = Parser::new().unwrap();
    let tree = parser
        .parse("fn main() { if f(1, 2) < 3 { return 1; } else { return 0; } }")
        .unwrap();
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::IfSentence)));
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::ElsePart)));
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::ArgumentList)));
}

#[test]
fn loop_sentence_wraps_a_while_sentence() {
    // The grammar's `LoopSentence` has a single alternative, `WhileSentence`
    // (`break`/`continue`/`for` are reserved lexer keywords but have no
    // production in the grammar, so they lex but cannot start a `Sentence`).
    let parser = Parser::new().unwrap();
    let tree = parser
        .parse("fn main() { while 1 < 2 { return 0; } }")
        .unwrap();
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::LoopSentence)));
    assert!(tree.contains(Symbol::NonTerminal(NonTerminal::WhileSentence)));
}

#[test]
fn break_keyword_lexes_but_cannot_start_a_sentence() {
    let parser = Parser::new().unwrap();
    let tokens = parser.tokenize("break").unwrap();
    assert_eq!(kinds(&tokens), vec![Terminal::Break, Terminal::Eof]);
    let err = parser.parse("fn main() { break; }").unwrap_err();
    assert!(matches!(err, Error::Syntax(SyntaxError::ParseError { .. })));
}
