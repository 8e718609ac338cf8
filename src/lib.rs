//! Statement reflow for indented, multi-line command scripts.
//!
//! Source files may split one command over several physical lines using
//! indentation, open brackets or quotes. Reflow joins those lines back into
//! one canonical statement per line and strips comments, without knowing
//! command grammar beyond an injected arity table.
//!
//! # Quick start
//!
//! ## Reflow with the builtin command table
//!
//! ```
//! use mcreflow::reflow;
//!
//! let input = "execute as @a run\n    say hello\n    kill @s #cleanup\n";
//! let result = reflow(input);
//! assert_eq!(
//!     result.lines(),
//!     vec!["execute as @a run say hello", "execute as @a run kill @s"]
//! );
//! assert!(result.diagnostics.is_empty());
//! ```
//!
//! ## Plug in a custom table
//!
//! ```
//! use mcreflow::{CommandTable, ReflowOptions, Rule, reflow_with};
//!
//! let table = CommandTable::new()
//!     .command("greet", Rule::args(1))
//!     .command("log", Rule::Unbounded);
//!
//! let result = reflow_with("greet\n  bob # hi\n", &table, &ReflowOptions::default());
//! assert_eq!(result.lines(), vec!["greet bob"]);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod arity;
pub mod assembler;
pub mod builder;
pub mod comment;
pub mod diagnostic;
pub mod literal;
pub mod options;
pub mod scanner;
pub mod statement;
pub mod token;

pub use arity::{Arity, ArityMiss, ArityTable, Branch, Chain, CommandTable, ConfigError, Rule};
pub use assembler::{Reflower, reflow, reflow_with};
pub use comment::{SigilPosition, SigilRole, classify};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use literal::LiteralTracker;
pub use options::ReflowOptions;
pub use scanner::{Scanner, tokenize};
pub use statement::{Reflow, Statement, format};
pub use token::{Bracket, Span, Token, TokenKind};

/// Unified error type covering table configuration and reflow failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command table could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// The source contained a malformed literal.
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
}

/// Reflow with the builtin table, failing on the first error-level
/// diagnostic. Arity table misses are not errors.
pub fn reflow_str(input: &str) -> Result<Vec<String>, Error> {
    let result = reflow(input);
    if let Some(diagnostic) = result.errors().next() {
        return Err(diagnostic.clone().into());
    }
    Ok(result.lines())
}

/// Load a JSON command table and reflow `input` against it.
pub fn reflow_with_json(input: &str, table_json: &str) -> Result<Reflow, Error> {
    let table = CommandTable::from_json(table_json)?;
    Ok(reflow_with(input, &table, &ReflowOptions::default()))
}
