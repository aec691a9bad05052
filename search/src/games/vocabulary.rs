use std::collections::HashMap;

/// Static per-game word lists consulted while models are built
pub trait Vocabulary {
    /// `(short or long form, canonical value)` pairs of a named list;
    /// empty when the list is unknown
    fn entries(&self, list: &str) -> Vec<(String, String)>;
}

#[derive(Debug, Clone)]
pub struct StaticVocabulary {
    lists: HashMap<&'static str, &'static [(&'static str, &'static str)]>,
}

const MAGIC_RARITIES: &[(&str, &str)] = &[
    ("c", "common"),
    ("u", "uncommon"),
    ("r", "rare"),
    ("m", "mythic"),
    ("s", "special"),
    ("b", "bonus"),
];

/// Colour names, guilds, shards and wedges to WUBRG letters
const MAGIC_COLORS: &[(&str, &str)] = &[
    ("white", "W"),
    ("blue", "U"),
    ("black", "B"),
    ("red", "R"),
    ("green", "G"),
    ("colorless", ""),
    ("azorius", "WU"),
    ("dimir", "UB"),
    ("rakdos", "BR"),
    ("gruul", "RG"),
    ("selesnya", "GW"),
    ("orzhov", "WB"),
    ("izzet", "UR"),
    ("golgari", "BG"),
    ("boros", "RW"),
    ("simic", "GU"),
    ("bant", "GWU"),
    ("esper", "WUB"),
    ("grixis", "UBR"),
    ("jund", "BRG"),
    ("naya", "RGW"),
    ("abzan", "WBG"),
    ("jeskai", "URW"),
    ("sultai", "BGU"),
    ("mardu", "RWB"),
    ("temur", "GUR"),
];

const MAGIC_FORMATS: &[(&str, &str)] = &[
    ("std", "standard"),
    ("pio", "pioneer"),
    ("mod", "modern"),
    ("leg", "legacy"),
    ("vin", "vintage"),
    ("edh", "commander"),
    ("pau", "pauper"),
];

const HEARTHSTONE_CLASSES: &[(&str, &str)] = &[
    ("dh", "demonhunter"),
    ("dk", "deathknight"),
    ("dr", "druid"),
    ("hu", "hunter"),
    ("ma", "mage"),
    ("pa", "paladin"),
    ("pr", "priest"),
    ("ro", "rogue"),
    ("sh", "shaman"),
    ("wl", "warlock"),
    ("wa", "warrior"),
    ("ne", "neutral"),
];

const HEARTHSTONE_RUNES: &[(&str, &str)] = &[("b", "blood"), ("f", "frost"), ("u", "unholy")];

impl Default for StaticVocabulary {
    fn default() -> Self {
        let mut lists: HashMap<&'static str, &'static [(&'static str, &'static str)]> =
            HashMap::new();
        lists.insert("magic.rarity", MAGIC_RARITIES);
        lists.insert("magic.color", MAGIC_COLORS);
        lists.insert("magic.format", MAGIC_FORMATS);
        lists.insert("hearthstone.class", HEARTHSTONE_CLASSES);
        lists.insert("hearthstone.rune", HEARTHSTONE_RUNES);
        Self { lists }
    }
}

impl Vocabulary for StaticVocabulary {
    fn entries(&self, list: &str) -> Vec<(String, String)> {
        self.lists
            .get(list)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(short, canonical)| (short.to_string(), canonical.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
