//! Decides whether a sigil opens a comment or prefixes a token.
//!
//! The decision is re-derived at every candidate sigil from where the
//! sigil sits on its line and whether the statement accumulated so far is
//! already complete. Nothing is remembered between calls.

/// Where a sigil sits on its physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SigilPosition {
    /// Only whitespace precedes the sigil on its line.
    pub first_on_line: bool,
    /// The sigil starts a new word (whitespace precedes it).
    pub word_start: bool,
    /// Only whitespace follows the sigil on its line.
    pub last_on_line: bool,
}

/// Outcome of classifying a sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigilRole {
    /// Whole-line comment; the line contributes nothing.
    LineComment,
    /// Comment after statement content, up to the end of the line.
    TrailingComment,
    /// Ordinary token content such as a `#tag` reference.
    Content,
}

impl SigilRole {
    #[must_use]
    pub const fn is_comment(self) -> bool {
        !matches!(self, Self::Content)
    }
}

/// Classify a sigil found outside any literal.
///
/// `completed` reports whether the statement accumulated so far can take a
/// trailing comment: it has all its required arguments or it ends in a
/// nested-body keyword. It is only consulted for a sigil at a word boundary
/// that is not the first thing on its line.
#[must_use]
pub fn classify(position: SigilPosition, completed: impl FnOnce() -> bool) -> SigilRole {
    if position.first_on_line {
        return SigilRole::LineComment;
    }
    if !position.word_start {
        return SigilRole::Content;
    }
    if completed() || position.last_on_line {
        SigilRole::TrailingComment
    } else {
        SigilRole::Content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MID_LINE: SigilPosition = SigilPosition {
        first_on_line: false,
        word_start: true,
        last_on_line: false,
    };

    #[test]
    fn line_start_always_comments() {
        let position = SigilPosition {
            first_on_line: true,
            word_start: true,
            last_on_line: false,
        };
        assert_eq!(classify(position, || false), SigilRole::LineComment);
        assert_eq!(classify(position, || true), SigilRole::LineComment);
    }

    #[test]
    fn completed_statement_comments() {
        assert_eq!(classify(MID_LINE, || true), SigilRole::TrailingComment);
    }

    #[test]
    fn incomplete_statement_keeps_tag() {
        assert_eq!(classify(MID_LINE, || false), SigilRole::Content);
    }

    #[test]
    fn bare_sigil_at_line_end_comments() {
        let position = SigilPosition {
            last_on_line: true,
            ..MID_LINE
        };
        assert_eq!(classify(position, || false), SigilRole::TrailingComment);
    }

    #[test]
    fn inside_word_is_content() {
        let position = SigilPosition {
            word_start: false,
            last_on_line: true,
            ..MID_LINE
        };
        let role = classify(position, || panic!("arity must not be consulted"));
        assert_eq!(role, SigilRole::Content);
        assert!(!role.is_comment());
    }
}
