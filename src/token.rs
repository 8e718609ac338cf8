use std::fmt;

/// Source location for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Bracket flavours tracked by the literal tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    /// `{ }` compound.
    Brace,
    /// `[ ]` list or selector arguments.
    Square,
    /// `( )` group.
    Paren,
}

impl Bracket {
    /// Classify an opening bracket character.
    #[must_use]
    pub const fn from_open(ch: char) -> Option<Self> {
        match ch {
            '{' => Some(Self::Brace),
            '[' => Some(Self::Square),
            '(' => Some(Self::Paren),
            _ => None,
        }
    }

    /// Classify a closing bracket character.
    #[must_use]
    pub const fn from_close(ch: char) -> Option<Self> {
        match ch {
            '}' => Some(Self::Brace),
            ']' => Some(Self::Square),
            ')' => Some(Self::Paren),
            _ => None,
        }
    }

    #[must_use]
    pub const fn open(self) -> char {
        match self {
            Self::Brace => '{',
            Self::Square => '[',
            Self::Paren => '(',
        }
    }

    #[must_use]
    pub const fn close(self) -> char {
        match self {
            Self::Brace => '}',
            Self::Square => ']',
            Self::Paren => ')',
        }
    }
}

/// Token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Run of ordinary characters. Inside a quote this also covers
    /// brackets, sigils and folded escape sequences.
    Word,
    /// Run of spaces or tabs.
    Whitespace,
    /// The comment/tag sigil outside a quote.
    Sigil,
    /// Opening quote delimiter.
    QuoteOpen,
    /// Closing quote delimiter.
    QuoteClose,
    /// Opening bracket.
    BracketOpen(Bracket),
    /// Closing bracket.
    BracketClose(Bracket),
    /// Physical line separator (`\n` or `\r\n`).
    LineBreak,
    /// Comment text up to the end of its physical line.
    Comment,
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, text: String, span: Span) -> Self {
        Self { kind, text, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_pairs() {
        for ch in ['{', '[', '('] {
            let bracket = Bracket::from_open(ch).expect("opening bracket");
            assert_eq!(bracket.open(), ch);
            assert_eq!(Bracket::from_close(bracket.close()), Some(bracket));
        }
        assert_eq!(Bracket::from_open('}'), None);
        assert_eq!(Bracket::from_close('a'), None);
    }

    #[test]
    fn span_display() {
        assert_eq!(Span::new(3, 14).to_string(), "3:14");
    }
}
