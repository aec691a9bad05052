use super::vocabulary::Vocabulary;
use crate::command::CommandBuilder;
use crate::errors::ModelError;
use crate::explain::{default_explain, lookup, Localizer};
use crate::model::Model;
use crate::resolve::ResolvedArgument;
use crate::types::Operator;

pub const MODEL_ID: &str = "hearthstone";

const CARD_TYPES: &[&str] = &["minion", "spell", "weapon", "hero", "location"];
const RARITIES: &[&str] = &["free", "common", "rare", "epic", "legendary"];

/// Hearthstone. Cards look like `{"name", "text", "cost", "attack",
/// "health", "classes": [..], "runes": ["blood", "blood"], "type",
/// "keywords": [..], "rarity"}`.
pub fn model(vocabulary: &dyn Vocabulary) -> Result<Model, ModelError> {
    Model::builder(MODEL_ID)
        .raw("raw")
        .command(CommandBuilder::unrestricted("raw", &["name", "text"]).build()?)?
        .command(CommandBuilder::text("name").alias("n").build()?)?
        .command(CommandBuilder::text("text").alias("o").build()?)?
        .command(CommandBuilder::number("cost").alias("mana").build()?)?
        .command(CommandBuilder::number("attack").alias("atk").build()?)?
        .command(CommandBuilder::number("health").alias("hp").build()?)?
        .command(
            CommandBuilder::pattern("stats", &["{{attack}}/{{health}}"])
                .explain_with(explain_stats)
                .build()?,
        )?
        .command(
            CommandBuilder::set("class")
                .alias("cls")
                .key("classes")
                .value_map(vocabulary.entries("hearthstone.class"))
                .build()?,
        )?
        .command(
            CommandBuilder::set("rune")
                .key("runes")
                .value_map(vocabulary.entries("hearthstone.rune"))
                .count_duplicates()
                .build()?,
        )?
        .command(
            CommandBuilder::set("type")
                .alias("t")
                .values(CARD_TYPES)
                .build()?,
        )?
        .command(
            CommandBuilder::set("keyword")
                .alias("kw")
                .key("keywords")
                .build()?,
        )?
        .command(
            CommandBuilder::set("rarity")
                .alias("r")
                .values(RARITIES)
                .build()?,
        )?
        .command(
            CommandBuilder::order("order")
                .alias("sort")
                .sort_key("name", "name")
                .sort_key("cost", "cost")
                .sort_key("attack", "attack")
                .sort_key("health", "health")
                .build()?,
        )?
        .build()
}

/// `stats:3/4` reads as "3 attack and 4 health"; comparisons use the
/// per-part default.
fn explain_stats(arg: &ResolvedArgument<'_>, i18n: &dyn Localizer) -> Option<String> {
    if !matches!(arg.operator, Operator::Match | Operator::Eq) {
        return default_explain(arg, i18n);
    }
    let fields = arg.pattern_fields.as_ref()?;
    let attack = fields.get("attack")?;
    let health = fields.get("health")?;
    let summary = lookup(
        i18n,
        "stats.summary",
        &[("attack", attack.as_str()), ("health", health.as_str())],
    )
    .unwrap_or_else(|| format!("{} attack and {} health", attack, health));
    if arg.negated() {
        Some(
            lookup(i18n, "stats.not-summary", &[("value", summary.as_str())])
                .unwrap_or_else(|| format!("not {}", summary)),
        )
    } else {
        Some(summary)
    }
}
