use crate::arity::{Branch, Chain, CommandTable, Rule};

impl CommandTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: std::collections::BTreeMap::new(),
        }
    }

    /// Add or replace a command.
    #[must_use]
    pub fn command(mut self, name: &str, rule: impl Into<Rule>) -> Self {
        self.commands.insert(name.to_string(), rule.into());
        self
    }

    /// Register `alias` with the same rule as `name`. Does nothing if
    /// `name` is unknown.
    #[must_use]
    pub fn alias(mut self, alias: &str, name: &str) -> Self {
        if let Some(rule) = self.commands.get(name).cloned() {
            self.commands.insert(alias.to_string(), rule);
        }
        self
    }

    /// Add every command of `other`, replacing existing entries.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.commands.extend(other.commands);
        self
    }

    /// The stock vocabulary for datapack function files.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .command("say", Rule::Unbounded)
            .command("me", Rule::Unbounded)
            .command("teammsg", Rule::Unbounded)
            .alias("tm", "teammsg")
            .command("msg", Rule::args(1).then(Rule::Unbounded))
            .alias("tell", "msg")
            .alias("w", "msg")
            .command("tellraw", Rule::args(2))
            .command("title", title())
            .command("function", Rule::args(1))
            .command("schedule", schedule())
            .command("return", return_rule())
            .command("execute", execute())
            .command("data", data())
            .command("scoreboard", scoreboard())
            .command("tag", Rule::args(1).then(tag()))
            .command("team", team())
            .command("trigger", Rule::args(1))
            .command("kill", Rule::args(0))
            .command("clear", Rule::args(0))
            .command("give", Rule::args(2))
            .command("enchant", Rule::args(2))
            .command(
                "effect",
                Branch::new()
                    .keyword("give", Rule::args(2))
                    .keyword("clear", Rule::args(0)),
            )
            .command("item", item())
            .command("loot", Rule::args(2))
            .command("setblock", Rule::args(4))
            .command("fill", Rule::args(7))
            .command("clone", Rule::args(9))
            .command("fillbiome", Rule::args(7))
            .command("place", Rule::args(2))
            .command("summon", Rule::args(1))
            .command("tp", Rule::args(1))
            .alias("teleport", "tp")
            .command("spreadplayers", Rule::args(6))
            .command("ride", Rule::args(2))
            .command("damage", Rule::args(2))
            .command("attribute", Rule::args(3))
            .command("particle", Rule::args(1))
            .command("playsound", Rule::args(3))
            .command("stopsound", Rule::args(1))
            .command("advancement", Rule::args(3))
            .command("recipe", Rule::args(3))
            .command("experience", experience())
            .alias("xp", "experience")
            .command("gamemode", Rule::args(1))
            .command("defaultgamemode", Rule::args(1))
            .command("difficulty", Rule::args(0))
            .command("gamerule", Rule::args(1))
            .command("time", time())
            .command("weather", Rule::args(1))
            .command("worldborder", Rule::args(1))
            .command("forceload", Rule::args(1))
            .command("spawnpoint", Rule::args(0))
            .command("setworldspawn", Rule::args(0))
            .command("bossbar", Rule::args(2))
            .command("random", Rule::args(2))
            .command("locate", Rule::args(2))
            .command("reload", Rule::args(0))
            .command("seed", Rule::args(0))
            .command("list", Rule::args(0))
            .command("help", Rule::Unbounded)
    }
}

impl Rule {
    /// Exactly `count` argument words.
    #[must_use]
    pub const fn args(count: usize) -> Self {
        Self::Args(count)
    }

    /// Follow this rule with `next`, flattening nested sequences.
    #[must_use]
    pub fn then(self, next: impl Into<Self>) -> Self {
        let mut rules = match self {
            Self::Seq(rules) => rules,
            other => vec![other],
        };
        rules.push(next.into());
        Self::Seq(rules)
    }
}

impl Branch {
    /// Create a branch with no keywords.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keywords: std::collections::BTreeMap::new(),
            otherwise: None,
        }
    }

    /// Dispatch `keyword` to `rule`.
    #[must_use]
    pub fn keyword(mut self, keyword: &str, rule: impl Into<Rule>) -> Self {
        self.keywords.insert(keyword.to_string(), rule.into());
        self
    }

    /// Rule applied when the next word is not a keyword.
    #[must_use]
    pub fn otherwise(mut self, rule: impl Into<Rule>) -> Self {
        self.otherwise = Some(Box::new(rule.into()));
        self
    }
}

impl Chain {
    /// Create a chain with no clauses.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: std::collections::BTreeMap::new(),
            terminal: std::collections::BTreeSet::new(),
        }
    }

    /// Add a clause that leaves the chain expecting more.
    #[must_use]
    pub fn clause(mut self, keyword: &str, rule: impl Into<Rule>) -> Self {
        self.clauses.insert(keyword.to_string(), rule.into());
        self
    }

    /// Add a clause after which the chain may end.
    #[must_use]
    pub fn terminal(mut self, keyword: &str, rule: impl Into<Rule>) -> Self {
        self.terminal.insert(keyword.to_string());
        self.clause(keyword, rule)
    }
}

impl From<Branch> for Rule {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

impl From<Chain> for Rule {
    fn from(chain: Chain) -> Self {
        Self::Chain(chain)
    }
}

/// `block <x> <y> <z>`, `entity <target>` or `storage <id>`.
fn data_target() -> Branch {
    Branch::new()
        .keyword("block", Rule::args(3))
        .keyword("entity", Rule::args(1))
        .keyword("storage", Rule::args(1))
}

fn data_source() -> Branch {
    Branch::new()
        .keyword("from", data_target())
        .keyword("string", data_target())
        .keyword("value", Rule::args(1))
}

fn data() -> Branch {
    let modify = Rule::from(data_target()).then(Rule::args(1)).then(
        Branch::new()
            .keyword("append", data_source())
            .keyword("prepend", data_source())
            .keyword("merge", data_source())
            .keyword("set", data_source())
            .keyword("insert", Rule::args(1).then(data_source())),
    );

    Branch::new()
        .keyword("get", data_target())
        .keyword("merge", Rule::from(data_target()).then(Rule::args(1)))
        .keyword("remove", Rule::from(data_target()).then(Rule::args(1)))
        .keyword("modify", modify)
}

fn condition() -> Branch {
    Branch::new()
        .keyword("block", Rule::args(4))
        .keyword("blocks", Rule::args(10))
        .keyword("entity", Rule::args(1))
        .keyword("predicate", Rule::args(1))
        .keyword("function", Rule::args(1))
        .keyword("biome", Rule::args(4))
        .keyword("dimension", Rule::args(1))
        .keyword("loaded", Rule::args(3))
        .keyword("data", Rule::from(data_target()).then(Rule::args(1)))
        .keyword(
            "score",
            Rule::args(2).then(
                Branch::new()
                    .keyword("matches", Rule::args(1))
                    .otherwise(Rule::args(3)),
            ),
        )
}

fn execute() -> Chain {
    let store_target = Branch::new()
        .keyword("score", Rule::args(2))
        .keyword("entity", Rule::args(4))
        .keyword("storage", Rule::args(4))
        .keyword("block", Rule::args(6))
        .keyword("bossbar", Rule::args(2));

    Chain::new()
        .clause("as", Rule::args(1))
        .clause("at", Rule::args(1))
        .clause("on", Rule::args(1))
        .clause("in", Rule::args(1))
        .clause("align", Rule::args(1))
        .clause("anchored", Rule::args(1))
        .clause("summon", Rule::args(1))
        .clause(
            "positioned",
            Branch::new()
                .keyword("as", Rule::args(1))
                .keyword("over", Rule::args(1))
                .otherwise(Rule::args(3)),
        )
        .clause(
            "rotated",
            Branch::new()
                .keyword("as", Rule::args(1))
                .otherwise(Rule::args(2)),
        )
        .clause(
            "facing",
            Branch::new()
                .keyword("entity", Rule::args(2))
                .otherwise(Rule::args(3)),
        )
        .clause("store", Rule::args(1).then(store_target))
        .terminal("if", condition())
        .terminal("unless", condition())
        .clause("run", Rule::Nested)
}

fn scoreboard() -> Branch {
    let objectives = Branch::new()
        .keyword("add", Rule::args(2))
        .keyword("remove", Rule::args(1))
        .keyword("list", Rule::args(0))
        .keyword("setdisplay", Rule::args(1))
        .keyword("modify", Rule::args(3));

    let players = Branch::new()
        .keyword("set", Rule::args(3))
        .keyword("add", Rule::args(3))
        .keyword("remove", Rule::args(3))
        .keyword("get", Rule::args(2))
        .keyword("reset", Rule::args(1))
        .keyword("list", Rule::args(0))
        .keyword("enable", Rule::args(2))
        .keyword("display", Rule::args(3))
        .keyword("operation", Rule::args(5));

    Branch::new()
        .keyword("objectives", objectives)
        .keyword("players", players)
}

fn tag() -> Branch {
    Branch::new()
        .keyword("add", Rule::args(1))
        .keyword("remove", Rule::args(1))
        .keyword("list", Rule::args(0))
}

fn team() -> Branch {
    Branch::new()
        .keyword("add", Rule::args(1))
        .keyword("remove", Rule::args(1))
        .keyword("empty", Rule::args(1))
        .keyword("join", Rule::args(1))
        .keyword("leave", Rule::args(1))
        .keyword("modify", Rule::args(3))
        .keyword("list", Rule::args(0))
}

fn title() -> Rule {
    Rule::args(1).then(
        Branch::new()
            .keyword("clear", Rule::args(0))
            .keyword("reset", Rule::args(0))
            .keyword("title", Rule::args(1))
            .keyword("subtitle", Rule::args(1))
            .keyword("actionbar", Rule::args(1))
            .keyword("times", Rule::args(3)),
    )
}

fn schedule() -> Branch {
    Branch::new()
        .keyword("function", Rule::args(2))
        .keyword("clear", Rule::args(1))
}

fn return_rule() -> Branch {
    Branch::new()
        .keyword("run", Rule::Nested)
        .keyword("fail", Rule::args(0))
        .otherwise(Rule::args(1))
}

fn item() -> Branch {
    let target = Branch::new()
        .keyword("block", Rule::args(4))
        .keyword("entity", Rule::args(2));
    let source = Branch::new()
        .keyword("with", Rule::args(1))
        .keyword("from", Rule::from(target.clone()).then(Rule::args(0)));

    Branch::new()
        .keyword("replace", Rule::from(target.clone()).then(source))
        .keyword("modify", Rule::from(target).then(Rule::args(1)))
}

fn experience() -> Branch {
    Branch::new()
        .keyword("add", Rule::args(2))
        .keyword("set", Rule::args(2))
        .keyword("query", Rule::args(2))
}

fn time() -> Branch {
    Branch::new()
        .keyword("set", Rule::args(1))
        .keyword("add", Rule::args(1))
        .keyword("query", Rule::args(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arity::{Arity, ArityMiss, ArityTable};

    fn arity(input: &str) -> Result<Arity, ArityMiss> {
        let words: Vec<&str> = input.split_whitespace().collect();
        CommandTable::builtin().arity(&words)
    }

    #[test]
    fn builtin_is_valid() {
        CommandTable::builtin().validate().expect("valid builtin table");
    }

    #[test]
    fn builtin_execute_if_block() {
        assert_eq!(arity("execute if block 0 0 0"), Ok(Arity::Remaining(1)));
        assert_eq!(arity("execute if block 0 0 0 #wool"), Ok(Arity::Remaining(0)));
    }

    #[test]
    fn builtin_execute_run_body() {
        assert_eq!(arity("execute as @a at @s run"), Ok(Arity::NestedBody));
        assert_eq!(
            arity("execute positioned as @s run say hi"),
            Ok(Arity::Unbounded)
        );
    }

    #[test]
    fn builtin_data_modify() {
        assert_eq!(
            arity("data modify entity @s Attributes[{}].Modifiers append from storage"),
            Ok(Arity::Remaining(1))
        );
        assert_eq!(
            arity("data modify entity @s Attributes[{}].Modifiers append from storage demo:foo bar"),
            Ok(Arity::Remaining(0))
        );
    }

    #[test]
    fn builtin_score_conditions() {
        assert_eq!(
            arity("execute if score @s a matches 1.."),
            Ok(Arity::Remaining(0))
        );
        assert_eq!(
            arity("execute if score @s a = @s"),
            Ok(Arity::Remaining(1))
        );
    }

    #[test]
    fn aliases_share_rules() {
        assert_eq!(arity("tell @a"), Ok(Arity::Unbounded));
        assert_eq!(arity("xp add @s"), Ok(Arity::Remaining(1)));
    }

    #[test]
    fn alias_of_unknown_is_ignored() {
        let table = CommandTable::new().alias("x", "missing");
        assert!(table.commands.is_empty());
    }

    #[test]
    fn then_flattens() {
        let rule = Rule::args(1).then(Rule::args(2)).then(Rule::Unbounded);
        assert_eq!(
            rule,
            Rule::Seq(vec![Rule::Args(1), Rule::Args(2), Rule::Unbounded])
        );
    }

    #[test]
    fn merge_overrides() {
        let table = CommandTable::builtin().merge(CommandTable::new().command("say", Rule::args(1)));
        assert_eq!(table.commands.get("say"), Some(&Rule::Args(1)));
        assert!(table.commands.contains_key("execute"));
    }

    #[test]
    fn builtin_survives_json() {
        let json = serde_json::to_string(&CommandTable::builtin()).expect("serialize");
        let table = CommandTable::from_json(&json).expect("reload");
        assert_eq!(table, CommandTable::builtin());
    }
}
