//! Demonstrate diagnostics for malformed function files.

use mcreflow::{Error, Severity};

fn main() {
    // Mismatched bracket: the broken statement is dropped, the rest survive.
    let result = mcreflow::reflow("say before\ndata merge storage a:b {list:[1}\nsay after\n");
    for statement in &result.statements {
        println!("Kept: {statement}");
    }
    for diagnostic in &result.diagnostics {
        println!("Diagnostic: {diagnostic}");
        println!("  Kind: {:?}", diagnostic.kind);
        println!(
            "  Location: line {}, column {}",
            diagnostic.span.line, diagnostic.span.column
        );
    }

    println!();

    // Unknown commands only warn.
    let result = mcreflow::reflow("frobnicate\n    all the things\n");
    for diagnostic in &result.diagnostics {
        let level = match diagnostic.severity() {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        println!("{level}: {diagnostic}");
    }
    println!("Output: {}", result.to_source().trim_end());

    println!();

    // The strict entry point turns the first error into `Err`.
    match mcreflow::reflow_str("tellraw @a {\"text\": \"unclosed\n") {
        Ok(lines) => println!("Reflowed OK (unexpected): {lines:?}"),
        Err(Error::Diagnostic(e)) => println!("Reflow error: {e}"),
        Err(Error::Config(e)) => println!("Config error: {e}"),
    }
}
