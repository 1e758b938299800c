//! Token type and the buffered stream that feeds the parser.

use crate::lexer::LexError;
use indexmap::IndexSet;
use std::fmt;

/// Reserved tag for the synthetic end-of-input token.
pub const EOF_TAG: &str = "EOF";

/// A single tagged lexeme. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical category, e.g. `NUMBER` or `LEFT_PAREN`. The tag `EOF` is
    /// reserved for the end of input.
    pub tag: String,
    /// The matched text.
    pub value: String,
}

impl Token {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// The token representing the end of input.
    pub fn eof() -> Self {
        Self::new(EOF_TAG, "")
    }

    pub fn is_eof(&self) -> bool {
        self.tag == EOF_TAG
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.tag, self.value)
    }
}

/// One-token-lookahead buffer over a fallible token source.
///
/// Tokens whose tag is in the skip set are dropped transparently; they are
/// never observable through [`peek`](Self::peek) or [`eat`](Self::eat).
/// When the underlying source runs out, a single [`Token::eof`] is
/// synthesized; reading past it is a [`StreamError::Exhausted`].
#[derive(Debug)]
pub struct TokenStream<I> {
    tokens: I,
    skip: IndexSet<String>,
    lookahead: Option<Token>,
    exhausted: bool,
}

impl<I> TokenStream<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    pub fn new(tokens: I, skip: &[&str]) -> Self {
        Self {
            tokens,
            skip: skip.iter().map(|tag| (*tag).to_owned()).collect(),
            lookahead: None,
            exhausted: false,
        }
    }

    /// Return the current token without consuming it.
    pub fn peek(&mut self) -> Result<&Token, StreamError> {
        self.fill()?;
        match self.lookahead.as_ref() {
            Some(token) => Ok(token),
            None => Err(StreamError::Exhausted),
        }
    }

    /// Consume and return the current token.
    pub fn eat(&mut self) -> Result<Token, StreamError> {
        self.fill()?;
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => return Err(StreamError::Exhausted),
        };
        // EOF is the last token this stream ever yields
        if token.is_eof() {
            self.exhausted = true;
        }
        Ok(token)
    }

    /// Consume the current token if its tag is `tag`, otherwise fail
    /// without consuming anything.
    pub fn expect(&mut self, tag: &str) -> Result<Token, StreamError> {
        let current = self.peek()?;
        if current.tag != tag {
            return Err(StreamError::UnexpectedToken {
                expected: tag.to_owned(),
                actual: current.clone(),
            });
        }
        self.eat()
    }

    fn fill(&mut self) -> Result<(), StreamError> {
        if self.lookahead.is_some() {
            return Ok(());
        }
        if self.exhausted {
            return Err(StreamError::Exhausted);
        }
        loop {
            match self.tokens.next().transpose()? {
                Some(token) if self.skip.contains(token.tag.as_str()) => continue,
                Some(token) => self.lookahead = Some(token),
                None => self.lookahead = Some(Token::eof()),
            }
            return Ok(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected token `{}', expected `{}'", actual, expected)]
    UnexpectedToken { expected: String, actual: Token },

    #[error("attempted to read past the end-of-input token")]
    Exhausted,
}
