//! Lexical knobs for the reflow engine.

use serde::Deserialize;

/// Characters the scanner and assembler treat specially.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReflowOptions {
    /// The ambiguous comment/tag sigil.
    pub sigil: char,
    /// Characters that glue a continuation line onto the previous word
    /// when they start it (structured path continuation).
    pub attach_chars: Vec<char>,
    /// Characters that open and close quoted strings.
    pub quote_chars: Vec<char>,
}

impl ReflowOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn sigil(mut self, sigil: char) -> Self {
        self.sigil = sigil;
        self
    }

    #[must_use]
    pub fn attach_chars(mut self, chars: &[char]) -> Self {
        self.attach_chars = chars.to_vec();
        self
    }

    #[must_use]
    pub fn quote_chars(mut self, chars: &[char]) -> Self {
        self.quote_chars = chars.to_vec();
        self
    }

    pub(crate) fn is_quote(&self, ch: char) -> bool {
        self.quote_chars.contains(&ch)
    }

    pub(crate) fn attaches(&self, word: &str) -> bool {
        word.chars()
            .next()
            .is_some_and(|ch| self.attach_chars.contains(&ch))
    }
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self {
            sigil: '#',
            attach_chars: vec!['.'],
            quote_chars: vec!['"', '\''],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ReflowOptions::default();
        assert_eq!(options.sigil, '#');
        assert!(options.attaches(".Modifiers"));
        assert!(!options.attaches("Modifiers"));
        assert!(options.is_quote('\''));
    }

    #[test]
    fn setters_replace_sets() {
        let options = ReflowOptions::new().sigil('%').attach_chars(&['.', ':']);
        assert_eq!(options.sigil, '%');
        assert!(options.attaches(":key"));
        assert!(!options.attaches(""));
    }

    #[test]
    fn deserializes_partial_json() {
        let options: ReflowOptions =
            serde_json::from_str(r#"{"attach_chars": [".", "["]}"#).expect("valid options");
        assert_eq!(options.sigil, '#');
        assert_eq!(options.attach_chars, vec!['.', '[']);
    }
}
