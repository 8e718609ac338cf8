//! Reflow output: canonical statements plus the diagnostics met on the way.

use std::fmt;

use crate::diagnostic::Diagnostic;
use crate::token::Span;

/// One fully joined logical command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub words: Vec<String>,
    /// Position of the statement's first own word in the source.
    pub span: Span,
}

impl Statement {
    #[must_use]
    pub const fn new(words: Vec<String>, span: Span) -> Self {
        Self { words, span }
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The leading command keyword.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
        }
        Ok(())
    }
}

/// Everything one reflow pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reflow {
    pub statements: Vec<Statement>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Reflow {
    /// Canonical statement strings in source order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.statements.iter().map(ToString::to_string).collect()
    }

    /// Serialize the statements, one per line.
    #[must_use]
    pub fn to_source(&self) -> String {
        format(&self.statements)
    }

    /// True when no error-level diagnostic was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// One statement per line, each newline-terminated.
#[must_use]
pub fn format(statements: &[Statement]) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    for statement in statements {
        let _ = writeln!(out, "{statement}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    fn statement(text: &str) -> Statement {
        Statement::new(
            text.split(' ').map(str::to_string).collect(),
            Span::new(1, 1),
        )
    }

    #[test]
    fn display_joins_words() {
        assert_eq!(statement("say hello world").to_string(), "say hello world");
        assert_eq!(statement("say hello").keyword(), Some("say"));
    }

    #[test]
    fn format_trailing_newline() {
        let out = format(&[statement("kill @s"), statement("say hi")]);
        assert_eq!(out, "kill @s\nsay hi\n");
    }

    #[test]
    fn format_empty() {
        assert_eq!(format(&[]), "");
    }

    #[test]
    fn clean_ignores_warnings() {
        let reflow = Reflow {
            statements: vec![statement("frob")],
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::ArityTableMiss {
                    keyword: "frob".to_string(),
                },
                Span::new(1, 1),
            )],
        };
        assert!(reflow.is_clean());
        assert_eq!(reflow.warnings().count(), 1);
        assert_eq!(reflow.errors().count(), 0);
        assert_eq!(reflow.lines(), vec!["frob".to_string()]);
    }
}
