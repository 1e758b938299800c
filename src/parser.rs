//! The table-driven LL(1) parser engine.
//!
//! Recursive descent is simulated with two explicit stacks: a symbol stack
//! holding the work remaining and a CST stack holding the tree nodes under
//! construction. Each nonterminal expansion opens one CST node and pushes
//! the chosen rule body (reversed, with a trailing end-of-rule marker); the
//! marker closes the node once every body symbol has been processed.

use crate::{
    cst::CstNode,
    grammar::{Grammar, Symbol},
    lexer::{LexError, Lexer},
    token::{StreamError, Token, TokenStream, EOF_TAG},
};

/// Work items on the parser's symbol stack.
///
/// `RuleEnd` never appears in grammar data; it only marks where an expanded
/// rule body ends.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StackSymbol {
    Terminal(String),
    Nonterminal(String),
    RuleEnd,
}

impl From<&Symbol> for StackSymbol {
    fn from(symbol: &Symbol) -> Self {
        match symbol {
            Symbol::Terminal(tag) => Self::Terminal(tag.clone()),
            Symbol::Nonterminal(name) => Self::Nonterminal(name.clone()),
        }
    }
}

/// A single-use LL(1) parse session.
#[derive(Debug)]
pub struct Parser<'g, I> {
    grammar: &'g Grammar,
    tokens: TokenStream<I>,
    symbol_stack: Vec<StackSymbol>,
    cst_stack: Vec<CstNode>,
}

impl<'g, 't> Parser<'g, Lexer<'t>> {
    /// Create a parser reading from `lexer`, starting at the rule named
    /// `start_rule` and dropping tokens whose tag is in `skip`.
    pub fn new(lexer: Lexer<'t>, grammar: &'g Grammar, start_rule: &str, skip: &[&str]) -> Self {
        Self::from_tokens(lexer, grammar, start_rule, skip)
    }
}

impl<'g, I> Parser<'g, I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    /// Like [`Parser::new`], but reading from an arbitrary token source.
    pub fn from_tokens(tokens: I, grammar: &'g Grammar, start_rule: &str, skip: &[&str]) -> Self {
        Self {
            grammar,
            tokens: TokenStream::new(tokens, skip),
            // EOF sits at the bottom so the start rule is processed first
            symbol_stack: vec![
                StackSymbol::Terminal(EOF_TAG.to_owned()),
                StackSymbol::Nonterminal(start_rule.to_owned()),
            ],
            cst_stack: vec![],
        }
    }

    /// Run the parse to completion, returning the root CST node.
    ///
    /// Any lexical or syntax error aborts immediately; the partially built
    /// tree is discarded with the parser.
    pub fn parse(mut self) -> Result<CstNode, ParseError> {
        let span = tracing::trace_span!("parse");
        let _entered = span.enter();

        loop {
            let symbol = self
                .symbol_stack
                .pop()
                .ok_or(ParseError::EmptySymbolStack)?;
            tracing::trace!(?symbol, "pop");

            match symbol {
                StackSymbol::RuleEnd => self.finish_rule()?,
                StackSymbol::Terminal(tag) => {
                    if let Some(root) = self.match_terminal(&tag)? {
                        return Ok(root);
                    }
                }
                StackSymbol::Nonterminal(name) => self.expand_rule(&name)?,
            }
        }
    }

    /// Close the CST node opened by the matching nonterminal expansion and
    /// attach it to its parent. The outermost rule has no parent; its node
    /// is put back as the future root.
    fn finish_rule(&mut self) -> Result<(), ParseError> {
        let node = self.cst_stack.pop().ok_or(ParseError::EmptyCstStack)?;
        match self.cst_stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.cst_stack.push(node),
        }
        Ok(())
    }

    /// Match one terminal symbol. Returns the root node once the
    /// end-of-input terminal has been matched, which is the only successful
    /// termination path.
    fn match_terminal(&mut self, tag: &str) -> Result<Option<CstNode>, ParseError> {
        if tag.is_empty() {
            // empty match: a valueless leaf, no token consumed
            let parent = self.cst_stack.last_mut().ok_or(ParseError::EmptyCstStack)?;
            parent.children.push(CstNode::terminal("", None));
            return Ok(None);
        }

        if tag == EOF_TAG {
            self.tokens.expect(EOF_TAG)?;
            let root = self.cst_stack.pop().ok_or(ParseError::EmptyCstStack)?;
            debug_assert!(self.cst_stack.is_empty(), "dangling CST nodes after EOF");
            return Ok(Some(root));
        }

        let token = self.tokens.expect(tag)?;
        let parent = self.cst_stack.last_mut().ok_or(ParseError::EmptyCstStack)?;
        parent
            .children
            .push(CstNode::terminal(token.tag, Some(token.value)));
        Ok(None)
    }

    /// Expand a nonterminal: open its CST node, choose an alternative from
    /// the parse table with the lookahead tag, and push the rule body in
    /// reverse so its first symbol is processed next. The lookahead is
    /// never consumed here.
    fn expand_rule(&mut self, name: &str) -> Result<(), ParseError> {
        self.cst_stack.push(CstNode::nonterminal(name));

        let grammar = self.grammar;
        let lookahead = self.tokens.peek()?.clone();
        let (rule, body) =
            grammar
                .expand(name, &lookahead.tag)
                .ok_or_else(|| ParseError::NoAlternative {
                    nonterminal: name.to_owned(),
                    token: lookahead,
                })?;
        tracing::trace!(nonterminal = name, rule, "expand");

        self.symbol_stack.push(StackSymbol::RuleEnd);
        for symbol in body.iter().rev() {
            self.symbol_stack.push(symbol.into());
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("unexpected token `{}' while expanding nonterminal `{}'", token, nonterminal)]
    NoAlternative { nonterminal: String, token: Token },

    #[error("empty symbol stack")]
    EmptySymbolStack,

    #[error("empty CST stack")]
    EmptyCstStack,
}
