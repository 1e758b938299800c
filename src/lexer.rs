//! Regex-driven tokenizer.

use crate::token::Token;
use regex::Regex;

/// An ordered pattern/tag rule list, compiled once and shared by any number
/// of lexers.
///
/// Declaration order is match order: at every input position the first
/// pattern that matches wins, so more specific patterns must be listed
/// before the ones they overlap with.
#[derive(Debug, Clone)]
pub struct TokenRules {
    rules: Vec<(Regex, String)>,
}

impl TokenRules {
    /// Compile an ordered list of `(pattern, tag)` pairs.
    pub fn compile(rules: &[(&str, &str)]) -> Result<Self, LexError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (pattern, tag) in rules {
            let regex = Regex::new(pattern).map_err(|source| LexError::Pattern {
                pattern: (*pattern).to_owned(),
                source,
            })?;
            compiled.push((regex, (*tag).to_owned()));
        }
        Ok(Self { rules: compiled })
    }
}

/// A lazy, forward-only tokenizer over a single input text.
///
/// Tokens are produced one pull at a time through the `Iterator` impl; the
/// sequence is not restartable. A position where no rule matches yields a
/// [`LexError::NoMatch`] and ends the sequence.
#[derive(Debug)]
pub struct Lexer<'t> {
    text: &'t str,
    pos: usize,
    rules: &'t TokenRules,
}

impl<'t> Lexer<'t> {
    pub fn new(text: &'t str, rules: &'t TokenRules) -> Self {
        Self {
            text,
            pos: 0,
            rules,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }

        for (regex, tag) in &self.rules.rules {
            // The match must start exactly at the current position.
            let matched = match regex.find_at(self.text, self.pos) {
                Some(m) if m.start() == self.pos => m,
                _ => continue,
            };
            self.pos = matched.end();
            return Some(Ok(Token::new(tag.clone(), matched.as_str())));
        }

        let err = LexError::NoMatch {
            pos: self.pos,
            rest: self.text[self.pos..].to_owned(),
        };
        // fuse the sequence after a lexical error
        self.pos = self.text.len();
        Some(Err(err))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("invalid token pattern `{}': {}", pattern, source)]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no token rule matches at position {}: `{}'", pos, rest)]
    NoMatch { pos: usize, rest: String },
}
