use std::fmt;

use crate::token::{Bracket, Span};

/// Classifies a reflow diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Input ended inside a quoted string.
    UnterminatedQuote { quote: char },
    /// Input ended with at least one bracket still open.
    UnterminatedBracket { open: Bracket },
    /// A closing bracket did not match the innermost open bracket.
    MismatchedBracket {
        expected: Option<Bracket>,
        found: Bracket,
    },
    /// The arity table has no entry for the statement's keyword.
    ArityTableMiss { keyword: String },
}

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::ArityTableMiss { .. } => Severity::Warning,
            Self::UnterminatedQuote { .. }
            | Self::UnterminatedBracket { .. }
            | Self::MismatchedBracket { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedQuote { quote } => {
                write!(f, "unterminated quoted string, expected closing {quote}")
            }
            Self::UnterminatedBracket { open } => {
                write!(
                    f,
                    "unterminated '{}', expected closing '{}'",
                    open.open(),
                    open.close()
                )
            }
            Self::MismatchedBracket {
                expected: Some(expected),
                found,
            } => {
                write!(
                    f,
                    "mismatched bracket, expected '{}', got '{}'",
                    expected.close(),
                    found.close()
                )
            }
            Self::MismatchedBracket {
                expected: None,
                found,
            } => {
                write!(f, "unexpected closing '{}'", found.close())
            }
            Self::ArityTableMiss { keyword } => {
                write!(f, "unknown command keyword: {keyword}")
            }
        }
    }
}

/// Positioned diagnostic yielded alongside reflowed statements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
}

impl Diagnostic {
    #[must_use]
    pub const fn new(kind: DiagnosticKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity(), Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::MismatchedBracket {
                expected: Some(Bracket::Square),
                found: Bracket::Brace,
            },
            Span::new(4, 12),
        );
        assert_eq!(
            diagnostic.to_string(),
            "mismatched bracket, expected ']', got '}' at line 4, column 12"
        );
    }

    #[test]
    fn stray_close_message() {
        let kind = DiagnosticKind::MismatchedBracket {
            expected: None,
            found: Bracket::Paren,
        };
        assert_eq!(kind.to_string(), "unexpected closing ')'");
    }

    #[test]
    fn arity_miss_is_warning() {
        let miss = DiagnosticKind::ArityTableMiss {
            keyword: "frobnicate".to_string(),
        };
        assert_eq!(miss.severity(), Severity::Warning);
        let quote = DiagnosticKind::UnterminatedQuote { quote: '"' };
        assert_eq!(quote.severity(), Severity::Error);
    }
}
