//! Reflow with a JSON command table layered over the builtin one.

use mcreflow::{CommandTable, ReflowOptions, Reflower};

fn main() -> Result<(), mcreflow::Error> {
    let extra = CommandTable::from_json(
        r#"{
            "commands": {
                "cutscene": {"chain": {
                    "clauses": {
                        "camera": {"args": 1},
                        "wait": {"args": 1},
                        "then": "nested"
                    },
                    "terminal": ["wait"]
                }}
            }
        }"#,
    )?;
    let table = CommandTable::builtin().merge(extra);

    let reflower = Reflower::new(&table).options(ReflowOptions::new().sigil('%'));
    let input = "\
% intro sequence
cutscene camera orbit wait 40 then
    say #1 fan favourite
    title @a title
        {\"text\": \"Chapter 1\"} % shown for five seconds
";

    let result = reflower.reflow(input);
    print!("{}", result.to_source());
    for diagnostic in &result.diagnostics {
        eprintln!("{diagnostic}");
    }
    Ok(())
}
