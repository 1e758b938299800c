//! Grammar tables: the rule set and the LL(1) parse table.
//!
//! Both tables are user-authored, passive data. The engine never derives a
//! parse table from the rules; callers supply one that is already LL(1)
//! (left-factored, one alternative per lookahead).

use crate::token::EOF_TAG;
use indexmap::IndexMap;
use std::fmt;

/// A grammar symbol occurring on the right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Matched directly against a token tag. The empty tag is the
    /// empty-match (epsilon) terminal; [`EOF_TAG`] is the end-of-input
    /// terminal.
    Terminal(String),
    /// Expanded through the parse table into another rule.
    Nonterminal(String),
}

impl Symbol {
    pub fn terminal(tag: impl Into<String>) -> Self {
        Self::Terminal(tag.into())
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Self::Nonterminal(name.into())
    }

    /// The empty-match terminal used for epsilon alternatives.
    pub fn empty() -> Self {
        Self::Terminal(String::new())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(tag) if tag.is_empty() => f.write_str("''"),
            Self::Terminal(tag) => f.write_str(tag),
            Self::Nonterminal(name) => write!(f, "<{}>", name),
        }
    }
}

/// The immutable grammar description consulted by the parser.
///
/// `rules` maps a rule name to its right-hand side; `table` maps a
/// nonterminal and a lookahead tag to the rule chosen for that lookahead.
/// Rule names and nonterminal names share one namespace: a nonterminal
/// `expr` may expand to a rule also named `expr`, or to a numbered
/// alternative such as `expr_1`.
#[derive(Debug)]
pub struct Grammar {
    rules: IndexMap<String, Vec<Symbol>>,
    table: IndexMap<String, IndexMap<String, String>>,
}

impl Grammar {
    /// Define a grammar using the specified function.
    ///
    /// The definition is validated before the `Grammar` is returned; see
    /// [`GrammarDefError`] for the rejected shapes.
    pub fn define<F>(f: F) -> Result<Self, GrammarDefError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>,
    {
        let mut def = GrammarDef {
            rules: IndexMap::new(),
            table: IndexMap::new(),
        };
        f(&mut def)?;
        def.end()
    }

    /// Resolve the alternative for `nonterminal` under `lookahead`,
    /// returning the chosen rule name and its body.
    pub(crate) fn expand(&self, nonterminal: &str, lookahead: &str) -> Option<(&str, &[Symbol])> {
        let rule = self.table.get(nonterminal)?.get(lookahead)?;
        let body = self.rules.get(rule)?;
        Some((rule.as_str(), &body[..]))
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## rules:")?;
        for (name, body) in &self.rules {
            write!(f, "{} :=", name)?;
            for symbol in body {
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## table:")?;
        for (nonterminal, row) in &self.table {
            for (lookahead, rule) in row {
                writeln!(f, "({}, {}) -> {}", nonterminal, lookahead, rule)?;
            }
        }

        Ok(())
    }
}

/// The contextual values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef {
    rules: IndexMap<String, Vec<Symbol>>,
    table: IndexMap<String, IndexMap<String, String>>,
}

impl GrammarDef {
    /// Declare a production rule.
    pub fn rule<I>(&mut self, name: &str, body: I) -> Result<(), GrammarDefError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        if self.rules.contains_key(name) {
            return Err(GrammarDefError::DuplicateRule {
                rule: name.to_owned(),
            });
        }
        self.rules.insert(name.to_owned(), body.into_iter().collect());
        Ok(())
    }

    /// Declare a parse table entry: expanding `nonterminal` when the
    /// lookahead token is tagged `lookahead` chooses `rule`.
    pub fn entry(
        &mut self,
        nonterminal: &str,
        lookahead: &str,
        rule: &str,
    ) -> Result<(), GrammarDefError> {
        let row = self.table.entry(nonterminal.to_owned()).or_default();
        if row.contains_key(lookahead) {
            // one alternative per lookahead, never silently overwritten
            return Err(GrammarDefError::TableConflict {
                nonterminal: nonterminal.to_owned(),
                lookahead: lookahead.to_owned(),
            });
        }
        row.insert(lookahead.to_owned(), rule.to_owned());
        Ok(())
    }

    fn end(self) -> Result<Grammar, GrammarDefError> {
        // Every table entry must point at a defined rule.
        for (nonterminal, row) in &self.table {
            for (lookahead, rule) in row {
                if !self.rules.contains_key(rule) {
                    return Err(GrammarDefError::UndefinedRule {
                        nonterminal: nonterminal.clone(),
                        lookahead: lookahead.clone(),
                        rule: rule.clone(),
                    });
                }
            }
        }

        // Every nonterminal occurring in a rule body needs a table row,
        // otherwise it can never be expanded.
        for (name, body) in &self.rules {
            for symbol in body {
                match symbol {
                    Symbol::Nonterminal(n) if !self.table.contains_key(n) => {
                        return Err(GrammarDefError::UndefinedNonterminal {
                            rule: name.clone(),
                            nonterminal: n.clone(),
                        });
                    }
                    Symbol::Terminal(tag) if tag == EOF_TAG => {
                        // the engine matches EOF itself, at the bottom of
                        // the symbol stack
                        return Err(GrammarDefError::ReservedTag {
                            rule: name.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }

        tracing::trace!(
            rules = self.rules.len(),
            entries = self.table.values().map(|row| row.len()).sum::<usize>(),
            "grammar validated"
        );

        Ok(Grammar {
            rules: self.rules,
            table: self.table,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarDefError {
    #[error("the rule `{}' has already been defined", rule)]
    DuplicateRule { rule: String },

    #[error(
        "LL(1) conflict: nonterminal `{}' already has an alternative for lookahead `{}'",
        nonterminal,
        lookahead
    )]
    TableConflict {
        nonterminal: String,
        lookahead: String,
    },

    #[error(
        "table entry ({}, {}) refers to undefined rule `{}'",
        nonterminal,
        lookahead,
        rule
    )]
    UndefinedRule {
        nonterminal: String,
        lookahead: String,
        rule: String,
    },

    #[error(
        "rule `{}' references nonterminal `{}' which has no parse table row",
        rule,
        nonterminal
    )]
    UndefinedNonterminal { rule: String, nonterminal: String },

    #[error("rule `{}' uses the reserved end-of-input tag", rule)]
    ReservedTag { rule: String },
}
