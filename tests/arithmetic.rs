//! End-to-end tests wiring the engine to a small arithmetic grammar.

use lltable::{Grammar, GrammarDefError, Lexer, ParseError, Parser, StreamError, Symbol, TokenRules};

fn init_tracing() {
    use tracing::Level;
    let _ = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn token_rules() -> TokenRules {
    TokenRules::compile(&[
        (r"\d+", "NUMBER"),
        (r"\+", "PLUS"),
        (r"-", "MINUS"),
        (r"/", "DIVIDE"),
        (r"\*", "TIMES"),
        (r"\(", "LEFT_PAREN"),
        (r"\)", "RIGHT_PAREN"),
        (r"\s+", "SPACE"),
    ])
    .unwrap()
}

// expr   := term (('+' | '-') expr)?
// term   := factor (('*' | '/') term)?
// factor := NUMBER | '(' expr ')'
//
// left-factored with numbered alternatives and epsilon rules
fn grammar() -> Grammar {
    use Symbol as S;
    Grammar::define(|g| {
        g.rule("expr", [S::nonterminal("term"), S::nonterminal("expr_rest")])?;
        g.rule("expr_rest_plus", [S::terminal("PLUS"), S::nonterminal("expr")])?;
        g.rule("expr_rest_minus", [S::terminal("MINUS"), S::nonterminal("expr")])?;
        g.rule("expr_rest_empty", [S::empty()])?;
        g.rule("term", [S::nonterminal("factor"), S::nonterminal("term_rest")])?;
        g.rule("term_rest_times", [S::terminal("TIMES"), S::nonterminal("term")])?;
        g.rule("term_rest_div", [S::terminal("DIVIDE"), S::nonterminal("term")])?;
        g.rule("term_rest_empty", [S::empty()])?;
        g.rule("factor_number", [S::terminal("NUMBER")])?;
        g.rule(
            "factor_paren",
            [
                S::terminal("LEFT_PAREN"),
                S::nonterminal("expr"),
                S::terminal("RIGHT_PAREN"),
            ],
        )?;

        // the EOF entries make truncated input descend and fail at
        // `factor', which has no alternative for EOF
        for tag in ["NUMBER", "LEFT_PAREN", "EOF"] {
            g.entry("expr", tag, "expr")?;
            g.entry("term", tag, "term")?;
        }
        g.entry("factor", "NUMBER", "factor_number")?;
        g.entry("factor", "LEFT_PAREN", "factor_paren")?;

        g.entry("expr_rest", "PLUS", "expr_rest_plus")?;
        g.entry("expr_rest", "MINUS", "expr_rest_minus")?;
        for tag in ["RIGHT_PAREN", "EOF"] {
            g.entry("expr_rest", tag, "expr_rest_empty")?;
        }

        g.entry("term_rest", "TIMES", "term_rest_times")?;
        g.entry("term_rest", "DIVIDE", "term_rest_div")?;
        for tag in ["PLUS", "MINUS", "RIGHT_PAREN", "EOF"] {
            g.entry("term_rest", tag, "term_rest_empty")?;
        }

        Ok(())
    })
    .unwrap()
}

fn parse(input: &str) -> Result<lltable::CstNode, ParseError> {
    let rules = token_rules();
    let grammar = grammar();
    let parser = Parser::new(Lexer::new(input, &rules), &grammar, "expr", &["SPACE"]);
    parser.parse()
}

#[test]
fn parses_a_nested_expression() {
    init_tracing();

    let root = parse("3 + 2 * (3 + 1)").unwrap();
    let leaves: Vec<String> = root
        .leaves()
        .iter()
        .filter(|leaf| !leaf.label.is_empty())
        .map(|leaf| format!("{}({})", leaf.label, leaf.value.as_deref().unwrap_or("")))
        .collect();
    assert_eq!(
        leaves,
        vec![
            "NUMBER(3)",
            "PLUS(+)",
            "NUMBER(2)",
            "TIMES(*)",
            "LEFT_PAREN(()",
            "NUMBER(3)",
            "PLUS(+)",
            "NUMBER(1)",
            "RIGHT_PAREN())",
        ]
    );
}

#[test]
fn skipped_tokens_never_reach_the_tree() {
    let root = parse("3 + 2").unwrap();
    let mut stack = vec![&root];
    while let Some(node) = stack.pop() {
        assert_ne!(node.label, "SPACE");
        stack.extend(node.children.iter());
    }
}

#[test]
fn truncated_input_is_a_syntax_error() {
    // after `3 +' the parser reaches `factor' with EOF as lookahead, and
    // the table has no entry for that pair
    match parse("3 +") {
        Err(ParseError::NoAlternative { nonterminal, token }) => {
            assert_eq!(nonterminal, "factor");
            assert!(token.is_eof());
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn stray_character_is_a_lexical_error() {
    match parse("3 & 2") {
        Err(ParseError::Stream(StreamError::Lex(err))) => {
            assert!(err.to_string().contains("position 2"));
        }
        other => panic!("expected lexical error, got {:?}", other),
    }
}

#[test]
fn simple_number_has_the_expected_shape() {
    use lltable::{CstNode, NodeKind};

    let root = parse("41").unwrap();
    assert_eq!(root.kind, NodeKind::Nonterminal);
    assert_eq!(root.label, "expr");
    assert_eq!(root.children.len(), 2);

    // expr -> term -> factor -> NUMBER leaf
    let term = &root.children[0];
    let factor = &term.children[0];
    assert_eq!(
        factor.children,
        vec![CstNode::terminal("NUMBER", Some("41".to_owned()))]
    );

    // both `rest' nonterminals took their epsilon alternative
    assert_eq!(term.children[1].children, vec![CstNode::terminal("", None)]);
    assert_eq!(root.children[1].children, vec![CstNode::terminal("", None)]);
}

#[test]
fn conflicting_epsilon_alternative_is_rejected() {
    // an epsilon and a non-epsilon alternative under the same lookahead is
    // a declared LL(1) conflict, not a silent overwrite
    let err = Grammar::define(|g| {
        g.rule("rest_plus", [Symbol::terminal("PLUS")])?;
        g.rule("rest_empty", [Symbol::empty()])?;
        g.entry("rest", "PLUS", "rest_plus")?;
        g.entry("rest", "PLUS", "rest_empty")?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, GrammarDefError::TableConflict { .. }));
}
