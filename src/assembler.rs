//! Statement assembler: joins classified tokens into canonical statements.
//!
//! Frames live on an explicit stack. Each physical line at bracket depth 0
//! is compared against the stack: frames at or right of the line's
//! indentation are popped and flushed, then the line either continues the
//! top frame, starts a sibling statement, or becomes a child of a body
//! header (`execute ... run`).

use std::sync::LazyLock;

use crate::arity::{Arity, ArityTable, CommandTable};
use crate::comment::{self, SigilPosition};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::literal::LiteralTracker;
use crate::options::ReflowOptions;
use crate::scanner::Scanner;
use crate::statement::{Reflow, Statement};
use crate::token::{Span, Token, TokenKind};

static BUILTIN: LazyLock<CommandTable> = LazyLock::new(CommandTable::builtin);

/// Reflow a source buffer with the builtin command table.
#[must_use]
pub fn reflow(input: &str) -> Reflow {
    Reflower::new(&*BUILTIN).reflow(input)
}

/// Reflow a source buffer with a caller-supplied arity table and options.
#[must_use]
pub fn reflow_with(input: &str, table: &dyn ArityTable, options: &ReflowOptions) -> Reflow {
    Assembler::new(input, table, options).run()
}

/// Reusable reflow configuration. Holds the arity table and options
/// read-only, so one instance can serve many buffers.
pub struct Reflower<'t> {
    table: &'t dyn ArityTable,
    options: ReflowOptions,
}

impl<'t> Reflower<'t> {
    #[must_use]
    pub fn new(table: &'t dyn ArityTable) -> Self {
        Self {
            table,
            options: ReflowOptions::default(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: ReflowOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn reflow(&self, input: &str) -> Reflow {
        reflow_with(input, self.table, &self.options)
    }
}

/// Coarse assembler state, derived from the frame stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingStatement,
    AccumulatingStatement,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Accumulates its own statement.
    Statement,
    /// Ends in a nested-body keyword; more-indented lines become children
    /// emitted with this frame's words as their prefix.
    Header,
}

#[derive(Debug)]
struct Frame {
    base_column: usize,
    role: Role,
    prefix: Vec<String>,
    words: Vec<String>,
    span: Span,
    poisoned: bool,
    missed: bool,
}

impl Frame {
    const fn new(base_column: usize, prefix: Vec<String>, span: Span) -> Self {
        Self {
            base_column,
            role: Role::Statement,
            prefix,
            words: Vec::new(),
            span,
            poisoned: false,
            missed: false,
        }
    }

    fn is_empty_statement(&self) -> bool {
        self.role == Role::Statement && self.words.is_empty()
    }

    /// Words a child of this frame inherits.
    fn child_prefix(&self) -> Vec<String> {
        self.prefix.iter().chain(&self.words).cloned().collect()
    }
}

#[derive(Debug)]
struct Word {
    text: String,
    span: Span,
}

/// Per physical line bookkeeping at depth 0.
#[derive(Debug)]
struct Line {
    /// No content has been seen on this line yet.
    fresh: bool,
    /// The line held a whole-line comment.
    commented: bool,
}

impl Line {
    const fn new() -> Self {
        Self {
            fresh: true,
            commented: false,
        }
    }
}

struct Assembler<'a> {
    scanner: Scanner<'a>,
    options: &'a ReflowOptions,
    table: &'a dyn ArityTable,
    literals: LiteralTracker,
    frames: Vec<Frame>,
    line: Line,
    word: Option<Word>,
    skip_indent: bool,
    done: bool,
    statements: Vec<Statement>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Assembler<'a> {
    fn new(input: &'a str, table: &'a dyn ArityTable, options: &'a ReflowOptions) -> Self {
        Self {
            scanner: Scanner::new(input, options),
            options,
            table,
            literals: LiteralTracker::new(),
            frames: Vec::new(),
            line: Line::new(),
            word: None,
            skip_indent: false,
            done: false,
            statements: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn state(&self) -> State {
        if self.done {
            State::Done
        } else if self.frames.is_empty() {
            State::AwaitingStatement
        } else {
            State::AccumulatingStatement
        }
    }

    fn run(mut self) -> Reflow {
        while let Some(item) = self.scanner.next() {
            match item {
                Ok(token) => self.token(&token),
                Err(diagnostic) => self.fail(diagnostic),
            }
        }
        self.finish();
        debug_assert_eq!(self.state(), State::Done);

        Reflow {
            statements: self.statements,
            diagnostics: self.diagnostics,
        }
    }

    fn token(&mut self, token: &Token) {
        match token.kind {
            TokenKind::LineBreak => self.line_break(),
            TokenKind::Whitespace => self.whitespace(token),
            TokenKind::Sigil if !self.literals.inside_literal() => self.sigil(token),
            TokenKind::Comment => self.comment(token),
            _ => self.content(token),
        }
    }

    fn line_break(&mut self) {
        if self.literals.in_quote() && self.literals.depth() == 0 && self.quote_abandoned() {
            self.recover_quote();
        }
        if self.literals.inside_literal() {
            if let Some(word) = &mut self.word {
                let trimmed = word.text.trim_end().len();
                word.text.truncate(trimmed);
                word.text.push(' ');
            }
            self.skip_indent = true;
            return;
        }

        self.end_word();
        if self.line.fresh && !self.line.commented {
            self.blank_line();
        }
        self.line = Line::new();
    }

    fn whitespace(&mut self, token: &Token) {
        if self.literals.inside_literal() {
            if !self.skip_indent {
                self.push_text(token);
            }
            return;
        }
        // Leading indentation is read off the first content token's column.
        if !self.line.fresh {
            self.end_word();
        }
    }

    fn sigil(&mut self, token: &Token) {
        let position = SigilPosition {
            first_on_line: self.line.fresh,
            word_start: self.word.is_none(),
            last_on_line: self.scanner.at_line_end(),
        };
        let role = comment::classify(position, || self.top_arity().accepts_comment());

        if role.is_comment() {
            let comment = self.scanner.skip_comment(token);
            self.token(&comment);
        } else {
            self.content(token);
        }
    }

    fn comment(&mut self, token: &Token) {
        tracing::trace!(
            line = token.span.line,
            whole_line = self.line.fresh,
            "skip comment"
        );
        if self.line.fresh {
            self.line.commented = true;
        }
    }

    /// A quote opened outside any bracket is given up on when the next
    /// physical line is blank or not indented past the statement.
    fn quote_abandoned(&self) -> bool {
        match self.scanner.line_indent() {
            None => true,
            Some(indent) => self
                .frames
                .last()
                .is_none_or(|frame| indent <= frame.base_column),
        }
    }

    /// Report the open quote against the current statement and go back to
    /// depth-0 scanning at the line break.
    fn recover_quote(&mut self) {
        if let Some((quote, span)) = self.scanner.close_quote() {
            self.fail(Diagnostic::new(
                DiagnosticKind::UnterminatedQuote { quote },
                span,
            ));
        }
        self.literals.reset();
    }

    fn content(&mut self, token: &Token) {
        if self.line.fresh {
            self.begin_line(token);
        }
        self.skip_indent = false;
        self.push_text(token);

        if let Err(diagnostic) = self.literals.observe(token) {
            self.fail(diagnostic);
        }
    }

    fn push_text(&mut self, token: &Token) {
        self.word
            .get_or_insert_with(|| Word {
                text: String::new(),
                span: token.span,
            })
            .text
            .push_str(&token.text);
    }

    fn end_word(&mut self) {
        let Some(word) = self.word.take() else {
            return;
        };
        if self.frames.is_empty() {
            self.push_frame(word.span.column - 1, Vec::new(), word.span);
        }
        if let Some(frame) = self.frames.last_mut() {
            if frame.words.is_empty() {
                frame.span = word.span;
            }
            frame.words.push(word.text);
        }
    }

    /// Decide where the first content of a depth-0 physical line goes.
    fn begin_line(&mut self, token: &Token) {
        let indent = token.span.column - 1;
        self.line.fresh = false;

        while self.frames.last().is_some_and(|f| f.base_column >= indent) {
            self.pop_frame();
        }
        // A frame emptied by a blank line does not capture what follows.
        while self.frames.last().is_some_and(Frame::is_empty_statement) {
            self.frames.pop();
        }

        let Some(top) = self.frames.len().checked_sub(1) else {
            self.push_frame(indent, Vec::new(), token.span);
            return;
        };

        if self.frames[top].role == Role::Header {
            let prefix = self.frames[top].child_prefix();
            self.push_frame(indent, prefix, token.span);
            return;
        }

        // A leading attach character never starts a command, so the line
        // continues the previous word even after the statement completed.
        if self.options.attaches(&token.text) {
            let frame = &mut self.frames[top];
            if let Some(text) = frame.words.pop() {
                let span = if frame.words.is_empty() {
                    frame.span
                } else {
                    token.span
                };
                self.word = Some(Word { text, span });
            }
            return;
        }

        let arity = if self.frames[top].poisoned {
            Arity::Unbounded
        } else {
            self.arity_at(top)
        };

        match arity {
            Arity::NestedBody => {
                tracing::trace!(line = token.span.line, "frame becomes body header");
                self.frames[top].role = Role::Header;
                let prefix = self.frames[top].child_prefix();
                self.push_frame(indent, prefix, token.span);
            }
            Arity::Remaining(0) => {
                // Complete parent: the deeper line is an independent sibling.
                let prefix = self.frames[top].prefix.clone();
                self.pop_frame();
                self.push_frame(indent, prefix, token.span);
            }
            Arity::Remaining(_) | Arity::Unbounded => {}
        }
    }

    fn push_frame(&mut self, base_column: usize, prefix: Vec<String>, span: Span) {
        tracing::trace!(base_column, depth = self.frames.len(), "push frame");
        self.frames.push(Frame::new(base_column, prefix, span));
    }

    fn pop_frame(&mut self) {
        if let Some(mut frame) = self.frames.pop() {
            tracing::trace!(
                base_column = frame.base_column,
                depth = self.frames.len(),
                "pop frame"
            );
            self.flush(&mut frame);
        }
    }

    /// A whitespace-only line at depth 0 finalizes the top statement.
    fn blank_line(&mut self) {
        if let Some(mut frame) = self.frames.pop() {
            if frame.role == Role::Statement {
                self.flush(&mut frame);
            }
            self.frames.push(frame);
        }
    }

    /// Emit the frame's statement, leaving the frame empty.
    fn flush(&mut self, frame: &mut Frame) {
        if frame.role == Role::Header {
            return;
        }
        let words = std::mem::take(&mut frame.words);
        let poisoned = std::mem::replace(&mut frame.poisoned, false);
        if words.is_empty() {
            return;
        }
        if poisoned {
            tracing::debug!(line = frame.span.line, "discarding malformed statement");
            return;
        }

        if !frame.missed {
            check_arity(self.table, &words, frame.span, &mut self.diagnostics);
        }
        frame.missed = false;

        let mut full = frame.prefix.clone();
        full.extend(words);
        self.statements.push(Statement::new(full, frame.span));
    }

    /// Arity of the top frame, or `Remaining(1)` with nothing to evaluate.
    fn top_arity(&mut self) -> Arity {
        match self.frames.len().checked_sub(1) {
            Some(top) if !self.frames[top].poisoned => self.arity_at(top),
            _ => Arity::Remaining(1),
        }
    }

    fn arity_at(&mut self, index: usize) -> Arity {
        let frame = &mut self.frames[index];
        let words: Vec<&str> = frame.words.iter().map(String::as_str).collect();
        match self.table.arity(&words) {
            Ok(arity) => arity,
            Err(miss) => {
                if !frame.missed {
                    frame.missed = true;
                    report_miss(&words, miss.index, frame.span, &mut self.diagnostics);
                }
                Arity::Unbounded
            }
        }
    }

    /// Report a diagnostic against the statement in progress, which is
    /// then discarded.
    fn fail(&mut self, diagnostic: Diagnostic) {
        let poisoned = self.frames.last().is_some_and(|f| f.poisoned);
        self.literals.reset();
        if poisoned && matches!(diagnostic.kind, DiagnosticKind::MismatchedBracket { .. }) {
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.poisoned = true;
        }
        self.diagnostics.push(diagnostic);
    }

    fn finish(&mut self) {
        self.end_word();
        if let Some(diagnostic) = self.literals.unterminated() {
            self.fail(diagnostic);
        }
        while !self.frames.is_empty() {
            self.pop_frame();
        }
        self.done = true;
    }
}

fn check_arity(
    table: &dyn ArityTable,
    words: &[String],
    span: Span,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let words: Vec<&str> = words.iter().map(String::as_str).collect();
    if let Err(miss) = table.arity(&words) {
        report_miss(&words, miss.index, span, diagnostics);
    }
}

fn report_miss(words: &[&str], index: usize, span: Span, diagnostics: &mut Vec<Diagnostic>) {
    let keyword = words.get(index).copied().unwrap_or_default().to_string();
    tracing::warn!(
        keyword = %keyword,
        line = span.line,
        "unknown command keyword, treating as unbounded"
    );
    diagnostics.push(Diagnostic::new(
        DiagnosticKind::ArityTableMiss { keyword },
        span,
    ));
}
