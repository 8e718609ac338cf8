use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::options::ReflowOptions;
use crate::token::{Bracket, Span, Token, TokenKind};

/// Characters after which a quote character opens a quoted string.
/// Anywhere else (`don't`) the quote is word content.
const QUOTE_LEADERS: &[char] = &['{', '[', '(', ',', ':', '='];

const fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Tokenize a whole source buffer with default options.
///
/// Collects every token; a trailing `UnterminatedQuote` is returned as
/// the error.
///
/// # Errors
///
/// Returns a `Diagnostic` when the input ends inside a quoted string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Diagnostic> {
    let options = ReflowOptions::default();
    Scanner::new(input, &options).collect()
}

/// Single forward pass over a source buffer, yielding classified spans.
///
/// Whitespace runs that only precede a line end are not reported. Comments
/// are not recognized here: the assembler decides whether a `Sigil` opens
/// one and then calls [`Scanner::skip_comment`].
pub struct Scanner<'a> {
    input: &'a str,
    options: &'a ReflowOptions,
    pos: usize,
    line: usize,
    col: usize,
    prev: Option<char>,
    quote: Option<(char, Span)>,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(input: &'a str, options: &'a ReflowOptions) -> Self {
        let start = if input.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        Self {
            input,
            options,
            pos: start,
            line: 1,
            col: 1,
            prev: None,
            quote: None,
        }
    }

    /// True while the scanner is between an opening and closing quote.
    #[must_use]
    pub const fn in_quote(&self) -> bool {
        self.quote.is_some()
    }

    /// True if only whitespace remains before the end of the current
    /// physical line.
    #[must_use]
    pub fn at_line_end(&self) -> bool {
        self.rest()
            .chars()
            .find(|ch| !matches!(ch, ' ' | '\t'))
            .is_none_or(|ch| matches!(ch, '\n' | '\r'))
    }

    /// Indentation of the physical line starting at the current position,
    /// or `None` when that line is blank or input is exhausted.
    #[must_use]
    pub fn line_indent(&self) -> Option<usize> {
        let rest = self.rest();
        let indent = rest.chars().take_while(|ch| matches!(ch, ' ' | '\t')).count();
        rest[indent..]
            .chars()
            .next()
            .filter(|ch| !matches!(ch, '\n' | '\r'))
            .map(|_| indent)
    }

    /// Abandon the open quote, returning its character and opening span.
    /// Scanning continues in normal mode from the current position.
    pub const fn close_quote(&mut self) -> Option<(char, Span)> {
        self.quote.take()
    }

    /// Consume the rest of the physical line as a comment opened by `sigil`.
    /// The line break itself is left for the next call to `next`.
    pub fn skip_comment(&mut self, sigil: &Token) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if matches!(ch, '\n' | '\r') {
                break;
            }
            self.advance(ch);
        }
        let mut text = sigil.text.clone();
        text.push_str(&self.input[start..self.pos]);
        Token::new(TokenKind::Comment, text, sigil.span)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    const fn span(&self) -> Span {
        Span::new(self.line, self.col)
    }

    fn advance(&mut self, ch: char) {
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.prev = Some(ch);
    }

    fn quote_allowed(&self) -> bool {
        self.prev
            .is_none_or(|prev| prev.is_whitespace() || QUOTE_LEADERS.contains(&prev))
    }

    fn single(&mut self, kind: TokenKind, ch: char) -> Token {
        let span = self.span();
        self.advance(ch);
        Token::new(kind, ch.to_string(), span)
    }

    fn read_line_break(&mut self, ch: char) -> Token {
        let span = self.span();
        if ch == '\r' {
            self.pos += 1;
            if self.peek() == Some('\n') {
                self.pos += 1;
            }
            self.line += 1;
            self.col = 1;
            self.prev = Some('\n');
        } else {
            self.advance(ch);
        }
        Token::new(TokenKind::LineBreak, "\n".to_string(), span)
    }

    /// Read a whitespace run. Returns `None` when the run is trailing.
    fn read_whitespace(&mut self) -> Option<Token> {
        let span = self.span();
        let start = self.pos;
        while let Some(ch @ (' ' | '\t')) = self.peek() {
            self.advance(ch);
        }
        if self.peek().is_none_or(|ch| matches!(ch, '\n' | '\r')) {
            return None;
        }
        Some(Token::new(
            TokenKind::Whitespace,
            self.input[start..self.pos].to_string(),
            span,
        ))
    }

    fn read_word(&mut self) -> Token {
        let span = self.span();
        let start = self.pos;

        while let Some(ch) = self.peek() {
            if is_blank(ch)
                || Bracket::from_open(ch).is_some()
                || Bracket::from_close(ch).is_some()
                || (self.options.is_quote(ch) && self.quote_allowed())
            {
                break;
            }
            self.advance(ch);
        }

        Token::new(
            TokenKind::Word,
            self.input[start..self.pos].to_string(),
            span,
        )
    }

    /// Read quoted content up to whitespace, a line break or the closing
    /// quote. Escaped quotes and backslashes stay verbatim in the text.
    fn read_quoted(&mut self, quote: char) -> Token {
        let span = self.span();
        let start = self.pos;

        while let Some(ch) = self.peek() {
            if ch == quote || is_blank(ch) {
                break;
            }
            if ch == '\\' && matches!(self.peek_second(), Some(next) if next == quote || next == '\\')
            {
                self.advance(ch);
                if let Some(escaped) = self.peek() {
                    self.advance(escaped);
                }
                continue;
            }
            self.advance(ch);
        }

        Token::new(
            TokenKind::Word,
            self.input[start..self.pos].to_string(),
            span,
        )
    }

    fn next_in_quote(&mut self, quote: char) -> Option<Token> {
        loop {
            let ch = self.peek()?;
            let token = match ch {
                '\n' | '\r' => self.read_line_break(ch),
                ' ' | '\t' => match self.read_whitespace() {
                    Some(token) => token,
                    None => continue,
                },
                _ if ch == quote => {
                    self.quote = None;
                    self.single(TokenKind::QuoteClose, ch)
                }
                _ => self.read_quoted(quote),
            };
            return Some(token);
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            let ch = self.peek()?;
            let token = match ch {
                '\n' | '\r' => self.read_line_break(ch),
                ' ' | '\t' => match self.read_whitespace() {
                    Some(token) => token,
                    None => continue,
                },
                _ if ch == self.options.sigil => self.single(TokenKind::Sigil, ch),
                _ if self.options.is_quote(ch) && self.quote_allowed() => {
                    let token = self.single(TokenKind::QuoteOpen, ch);
                    self.quote = Some((ch, token.span));
                    token
                }
                _ => {
                    if let Some(bracket) = Bracket::from_open(ch) {
                        self.single(TokenKind::BracketOpen(bracket), ch)
                    } else if let Some(bracket) = Bracket::from_close(ch) {
                        self.single(TokenKind::BracketClose(bracket), ch)
                    } else {
                        self.read_word()
                    }
                }
            };
            return Some(token);
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = match self.quote {
            Some((quote, _)) => self.next_in_quote(quote),
            None => self.next_token(),
        };
        match token {
            Some(token) => Some(Ok(token)),
            None => self.quote.take().map(|(quote, span)| {
                Err(Diagnostic::new(
                    DiagnosticKind::UnterminatedQuote { quote },
                    span,
                ))
            }),
        }
    }
}
