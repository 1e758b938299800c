//! A table-driven LL(1) parser engine.
//!
//! Input text is tokenized by a [`Lexer`] according to an ordered list of
//! pattern/tag rules, buffered through a [`TokenStream`] with one token of
//! lookahead, and parsed by a [`Parser`] against a user-authored [`Grammar`]
//! (a rule set plus an LL(1) parse table) into a concrete syntax tree of
//! [`CstNode`]s.
//!
//! The engine itself is grammar-agnostic: pattern lists, rule sets and parse
//! tables are supplied by the caller as immutable configuration. Grammars
//! must already be left-factored to LL(1) form; the engine performs no
//! backtracking.

pub mod cst;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;

pub use crate::{
    cst::{CstNode, NodeKind},
    grammar::{Grammar, GrammarDef, GrammarDefError, Symbol},
    lexer::{LexError, Lexer, TokenRules},
    parser::{ParseError, Parser},
    token::{StreamError, Token, TokenStream, EOF_TAG},
};
