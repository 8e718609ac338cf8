//! Argument arity lookup.
//!
//! The engine never hard-codes command grammar. It asks an [`ArityTable`]
//! how many arguments the statement accumulated so far still needs. The
//! stock implementation, [`CommandTable`], evaluates a small rule grammar
//! that can be built in code or loaded from JSON.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Completion state of a statement prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// This many more argument words are required. `Remaining(0)` means
    /// the statement is complete.
    Remaining(usize),
    /// The last word introduces a nested statement body.
    NestedBody,
    /// Free text; never completes on its own.
    Unbounded,
}

impl Arity {
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Remaining(0))
    }

    /// True when a sigil at a word boundary can only open a trailing
    /// comment: nothing is missing, or the next thing is a nested body.
    #[must_use]
    pub const fn accepts_comment(self) -> bool {
        matches!(self, Self::Remaining(0) | Self::NestedBody)
    }
}

/// The table has no entry for the word at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityMiss {
    pub index: usize,
}

/// Maps the leading words of a statement to its completion state.
pub trait ArityTable {
    /// Evaluate the words of a statement prefix.
    ///
    /// # Errors
    ///
    /// Returns `ArityMiss` when a keyword is unknown to the table.
    fn arity(&self, words: &[&str]) -> Result<Arity, ArityMiss>;
}

impl<F> ArityTable for F
where
    F: Fn(&[&str]) -> Result<Arity, ArityMiss>,
{
    fn arity(&self, words: &[&str]) -> Result<Arity, ArityMiss> {
        self(words)
    }
}

/// One node of the arity grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Exactly this many argument words.
    Args(usize),
    /// Free text up to the end of the statement.
    Unbounded,
    /// A nested statement follows.
    Nested,
    /// Rules applied one after another.
    Seq(Vec<Rule>),
    /// The next word selects a sub-rule.
    Branch(Branch),
    /// Repeatable clauses, each selected by a keyword.
    Chain(Chain),
}

/// Keyword dispatch with an optional fallback for non-keyword words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub keywords: BTreeMap<String, Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<Box<Rule>>,
}

/// A sequence of clauses such as the `execute` sub-command chain.
///
/// The chain is complete once its last clause is one of the `terminal`
/// clauses; any other trailing clause still expects more.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub clauses: BTreeMap<String, Rule>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub terminal: BTreeSet<String>,
}

/// Data-driven arity table keyed by command name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTable {
    pub commands: BTreeMap<String, Rule>,
}

/// Error loading a command table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be deserialized.
    #[error("invalid command table: {0}")]
    Json(#[from] serde_json::Error),
    /// A keyword is empty or contains whitespace.
    #[error("invalid keyword {0:?}")]
    InvalidKeyword(String),
    /// A chain names a terminal clause it does not define.
    #[error("terminal clause {0:?} is not a clause of its chain")]
    UnknownTerminal(String),
}

/// Result of walking one rule over a slice of words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Done(usize),
    Short(usize),
    Nested(usize),
    Unbounded,
    Miss(usize),
}

impl CommandTable {
    /// Deserialize a table from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on malformed JSON or invalid keywords.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Check every keyword and chain in the table.
    ///
    /// # Errors
    ///
    /// Returns the first invalid keyword or dangling terminal clause.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.commands.iter().try_for_each(|(name, rule)| {
            check_keyword(name)?;
            rule.validate()
        })
    }

    fn walk_commands(&self, words: &[&str], offset: usize) -> Walk {
        let Some(first) = words.first() else {
            return Walk::Short(1);
        };
        match self.commands.get(*first) {
            Some(rule) => rule.walk(&words[1..], offset + 1).consumed(1),
            None => Walk::Miss(offset),
        }
    }
}

impl ArityTable for CommandTable {
    fn arity(&self, words: &[&str]) -> Result<Arity, ArityMiss> {
        let mut offset = 0;
        loop {
            let rest = &words[offset..];
            match self.walk_commands(rest, offset) {
                Walk::Done(_) => return Ok(Arity::Remaining(0)),
                Walk::Short(remaining) => return Ok(Arity::Remaining(remaining)),
                Walk::Unbounded => return Ok(Arity::Unbounded),
                Walk::Miss(index) => return Err(ArityMiss { index }),
                Walk::Nested(consumed) if consumed >= rest.len() => {
                    return Ok(Arity::NestedBody);
                }
                Walk::Nested(consumed) => offset += consumed,
            }
        }
    }
}

impl Walk {
    /// Account for `n` words consumed before this walk started.
    const fn consumed(self, n: usize) -> Self {
        match self {
            Self::Done(c) => Self::Done(c + n),
            Self::Nested(c) => Self::Nested(c + n),
            other => other,
        }
    }
}

impl Rule {
    fn walk(&self, words: &[&str], offset: usize) -> Walk {
        match self {
            Self::Args(count) => {
                if words.len() < *count {
                    Walk::Short(count - words.len())
                } else {
                    Walk::Done(*count)
                }
            }
            Self::Unbounded => Walk::Unbounded,
            Self::Nested => Walk::Nested(0),
            Self::Seq(rules) => {
                let mut consumed = 0;
                for rule in rules {
                    match rule.walk(&words[consumed..], offset + consumed) {
                        Walk::Done(c) => consumed += c,
                        other => return other.consumed(consumed),
                    }
                }
                Walk::Done(consumed)
            }
            Self::Branch(branch) => branch.walk(words, offset),
            Self::Chain(chain) => chain.walk(words, offset),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Args(_) | Self::Unbounded | Self::Nested => Ok(()),
            Self::Seq(rules) => rules.iter().try_for_each(Self::validate),
            Self::Branch(branch) => {
                branch.keywords.iter().try_for_each(|(keyword, rule)| {
                    check_keyword(keyword)?;
                    rule.validate()
                })?;
                branch.otherwise.as_deref().map_or(Ok(()), Self::validate)
            }
            Self::Chain(chain) => {
                if let Some(missing) = chain
                    .terminal
                    .iter()
                    .find(|name| !chain.clauses.contains_key(*name))
                {
                    return Err(ConfigError::UnknownTerminal(missing.clone()));
                }
                chain.clauses.iter().try_for_each(|(keyword, rule)| {
                    check_keyword(keyword)?;
                    rule.validate()
                })
            }
        }
    }
}

impl Branch {
    fn walk(&self, words: &[&str], offset: usize) -> Walk {
        let Some(first) = words.first() else {
            return Walk::Short(1);
        };
        if let Some(rule) = self.keywords.get(*first) {
            return rule.walk(&words[1..], offset + 1).consumed(1);
        }
        match &self.otherwise {
            Some(rule) => rule.walk(words, offset),
            None => Walk::Miss(offset),
        }
    }
}

impl Chain {
    fn walk(&self, words: &[&str], offset: usize) -> Walk {
        let mut consumed = 0;
        let mut last: Option<&str> = None;

        loop {
            let rest = &words[consumed..];
            let Some(keyword) = rest.first() else {
                return match last {
                    Some(clause) if self.terminal.contains(clause) => Walk::Done(consumed),
                    _ => Walk::Short(1),
                };
            };
            let Some((name, rule)) = self.clauses.get_key_value(*keyword) else {
                return if last.is_some() {
                    Walk::Done(consumed)
                } else {
                    Walk::Miss(offset + consumed)
                };
            };
            match rule.walk(&rest[1..], offset + consumed + 1) {
                Walk::Done(c) => {
                    consumed += c + 1;
                    last = Some(name.as_str());
                }
                other => return other.consumed(consumed + 1),
            }
        }
    }
}

fn check_keyword(keyword: &str) -> Result<(), ConfigError> {
    if keyword.is_empty() || keyword.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidKeyword(keyword.to_string()));
    }
    Ok(())
}
