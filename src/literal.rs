//! Quote and bracket nesting state.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::token::{Bracket, Span, Token, TokenKind};

/// Tracks whether the assembler is inside a quoted string or a bracket
/// literal. Every bracket flavour shares one depth for the purpose of
/// suppressing statement boundaries.
#[derive(Debug, Default, Clone)]
pub struct LiteralTracker {
    quote: Option<char>,
    brackets: Vec<(Bracket, Span)>,
}

impl LiteralTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            quote: None,
            brackets: Vec::new(),
        }
    }

    /// True while a quote is open or any bracket is unclosed.
    #[must_use]
    pub const fn inside_literal(&self) -> bool {
        self.quote.is_some() || !self.brackets.is_empty()
    }

    #[must_use]
    pub const fn in_quote(&self) -> bool {
        self.quote.is_some()
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.brackets.len()
    }

    /// Update the context with the next token.
    ///
    /// # Errors
    ///
    /// Returns `MismatchedBracket` when a closing bracket does not match
    /// the innermost open one. The context is left unchanged.
    pub fn observe(&mut self, token: &Token) -> Result<(), Diagnostic> {
        match token.kind {
            TokenKind::QuoteOpen => {
                self.quote = token.text.chars().next();
            }
            TokenKind::QuoteClose => {
                self.quote = None;
            }
            TokenKind::BracketOpen(bracket) if self.quote.is_none() => {
                self.brackets.push((bracket, token.span));
            }
            TokenKind::BracketClose(found) if self.quote.is_none() => {
                let expected = self.brackets.last().map(|(open, _)| *open);
                if expected != Some(found) {
                    return Err(Diagnostic::new(
                        DiagnosticKind::MismatchedBracket { expected, found },
                        token.span,
                    ));
                }
                self.brackets.pop();
            }
            _ => {}
        }
        Ok(())
    }

    /// Report the outermost bracket still open at end of input.
    #[must_use]
    pub fn unterminated(&self) -> Option<Diagnostic> {
        self.brackets.first().map(|(open, span)| {
            Diagnostic::new(DiagnosticKind::UnterminatedBracket { open: *open }, *span)
        })
    }

    /// Forget all open literals, used after discarding a malformed statement.
    pub fn reset(&mut self) {
        self.quote = None;
        self.brackets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ReflowOptions;
    use crate::scanner::Scanner;

    fn track(input: &str) -> (LiteralTracker, Result<(), Diagnostic>) {
        let options = ReflowOptions::default();
        let mut tracker = LiteralTracker::new();
        for token in Scanner::new(input, &options).filter_map(Result::ok) {
            if let Err(err) = tracker.observe(&token) {
                return (tracker, Err(err));
            }
        }
        (tracker, Ok(()))
    }

    #[test]
    fn balanced_brackets_close() {
        let (tracker, result) = track("{a:[1,2],b:(3)}");
        assert!(result.is_ok());
        assert!(!tracker.inside_literal());
    }

    #[test]
    fn open_bracket_is_literal() {
        let (tracker, _) = track("Attributes[{");
        assert!(tracker.inside_literal());
        assert_eq!(tracker.depth(), 2);
    }

    #[test]
    fn open_quote_is_literal() {
        let (tracker, _) = track("say \"abc");
        assert!(tracker.in_quote());
        assert!(tracker.inside_literal());
    }

    #[test]
    fn mismatched_close() {
        let (tracker, result) = track("[{]");
        let err = result.unwrap_err();
        assert_eq!(
            err.kind,
            DiagnosticKind::MismatchedBracket {
                expected: Some(Bracket::Brace),
                found: Bracket::Square,
            }
        );
        assert_eq!(err.span, Span::new(1, 3));
        assert_eq!(tracker.depth(), 2);
    }

    #[test]
    fn stray_close() {
        let (_, result) = track("a)");
        assert_eq!(
            result.unwrap_err().kind,
            DiagnosticKind::MismatchedBracket {
                expected: None,
                found: Bracket::Paren,
            }
        );
    }

    #[test]
    fn unterminated_reports_outermost() {
        let (tracker, _) = track("x\n [ {\n");
        let diagnostic = tracker.unterminated().expect("open bracket");
        assert_eq!(
            diagnostic.kind,
            DiagnosticKind::UnterminatedBracket {
                open: Bracket::Square
            }
        );
        assert_eq!(diagnostic.span, Span::new(2, 2));
    }

    #[test]
    fn reset_clears_state() {
        let (mut tracker, _) = track("[\"");
        tracker.reset();
        assert!(!tracker.inside_literal());
        assert!(tracker.unterminated().is_none());
    }
}
