use super::vocabulary::Vocabulary;
use crate::command::CommandBuilder;
use crate::errors::ModelError;
use crate::model::Model;

pub const MODEL_ID: &str = "magic";

/// Magic: The Gathering. Cards are documents shaped like
/// `{"name", "type", "text", "printed_text", "flavor", "color": <WUBRG mask>,
/// "identity": <mask>, "cmc", "power": "2", "toughness": "*", "loyalty",
/// "rarity", "keywords": [..], "formats": [..], "set", "year",
/// "prices": {"usd"}}`.
pub fn model(vocabulary: &dyn Vocabulary) -> Result<Model, ModelError> {
    let colors = vocabulary.entries("magic.color");

    Model::builder(MODEL_ID)
        .raw("raw")
        .command(CommandBuilder::unrestricted("raw", &["name"]).build()?)?
        .command(CommandBuilder::text("name").alias("n").build()?)?
        .command(CommandBuilder::text("type").aliases(&["t", "types"]).build()?)?
        .command(
            CommandBuilder::text("text")
                .aliases(&["o", "oracle"])
                .modifier("unified", "u", "text")
                .modifier("printed", "p", "printed_text")
                .build()?,
        )?
        .command(CommandBuilder::text("flavor").alias("ft").build()?)?
        .command(
            CommandBuilder::bitset("color", "WUBRG")
                .aliases(&["c", "colors"])
                .words(colors.clone())
                .build()?,
        )?
        .command(
            CommandBuilder::bitset("identity", "WUBRG")
                .aliases(&["id", "ci"])
                .words(colors)
                .build()?,
        )?
        .command(
            CommandBuilder::number("cmc")
                .aliases(&["mv", "manavalue"])
                .allow_float()
                .build()?,
        )?
        .command(CommandBuilder::half_number("power").alias("pow").build()?)?
        .command(CommandBuilder::half_number("toughness").alias("tou").build()?)?
        .command(CommandBuilder::half_number("loyalty").alias("loy").build()?)?
        .command(
            CommandBuilder::pattern("pt", &["{{power}}/{{toughness}}"])
                .alias("powtou")
                .build()?,
        )?
        .command(
            CommandBuilder::set("rarity")
                .alias("r")
                .value_map(vocabulary.entries("magic.rarity"))
                .build()?,
        )?
        .command(
            CommandBuilder::set("keyword")
                .alias("kw")
                .key("keywords")
                .build()?,
        )?
        .command(
            CommandBuilder::set("format")
                .aliases(&["f", "legal"])
                .key("formats")
                .value_map(vocabulary.entries("magic.format"))
                .build()?,
        )?
        .command(
            CommandBuilder::set("set")
                .aliases(&["s", "e", "edition"])
                .build()?,
        )?
        .command(CommandBuilder::number("year").build()?)?
        .command(
            CommandBuilder::order("order")
                .alias("sort")
                .sort_key("name", "name")
                .sort_key("cmc", "cmc")
                .sort_key("price", "prices.usd")
                .sort_key("year", "year")
                .build()?,
        )?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use crate::games::StaticVocabulary;

    #[test]
    fn test_model_builds() {
        let model = model(&StaticVocabulary::default()).unwrap();
        assert_eq!(model.id(), "magic");
        assert_eq!(model.raw_command().id(), "raw");
        assert_eq!(model.get("mv").unwrap().id(), "cmc");
        assert_eq!(model.get("ci").unwrap().id(), "identity");
        assert_eq!(model.get("kw").unwrap().key(), "keywords");
    }

    #[test]
    fn test_vocabulary_feeds_value_maps() {
        let model = model(&StaticVocabulary::default()).unwrap();
        match model.get("r").unwrap().kind() {
            CommandKind::Set(options) => assert_eq!(options.canonical("M"), "mythic"),
            other => panic!("Expected set kind, got {:?}", other),
        }
        match model.get("c").unwrap().kind() {
            CommandKind::Bitset(options) => {
                assert_eq!(options.words.get("izzet").map(String::as_str), Some("UR"))
            }
            other => panic!("Expected bitset kind, got {:?}", other),
        }
    }
}
