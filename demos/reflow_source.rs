//! Reflow a multi-line function file into one command per line.

fn main() {
    let input = "\
# Give every player near spawn a welcome kit
execute as @a[distance=..16] at @s run
    give @s bread 8 # snacks
    tellraw @s [
        {\"text\": \"Welcome to \", \"color\": \"gray\"},
        {\"text\": \"#spawn\", \"color\": \"gold\"}
    ]

data modify storage demo:state players
    .count set value 0
";

    let result = mcreflow::reflow(input);

    println!("Statements: {}", result.statements.len());
    for statement in &result.statements {
        println!("  {}: {}", statement.span, statement);
    }

    println!("\nCanonical output:\n{}", result.to_source());
}
