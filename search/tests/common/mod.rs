//! Shared fixtures for the tcg-search integration tests

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tcg_search::config::{EmptyQueryPolicy, SearchConfig};
use tcg_search::games::builtin_registry;
use tcg_search::{CardStore, Catalog, MemoryStore, PageRequest, PageResult, Predicate, SearchEngine};

/// Colour masks, bit order WUBRG
pub const W: u64 = 1;
pub const U: u64 = 2;
pub const B: u64 = 4;
pub const R: u64 = 8;
pub const G: u64 = 16;

pub fn magic_cards() -> Vec<Value> {
    vec![
        json!({
            "name": "Shivan Dragon",
            "type": "Creature — Dragon",
            "text": "Flying\n{R}: Shivan Dragon gets +1/+0 until end of turn.",
            "color": R, "identity": R, "cmc": 6,
            "power": "5", "toughness": "5",
            "rarity": "rare", "keywords": ["Flying"],
            "formats": ["legacy", "vintage", "commander"],
            "set": "lea", "year": 1993, "prices": {"usd": 2.5}
        }),
        json!({
            "name": "Niv-Mizzet, Parun",
            "type": "Legendary Creature — Dragon Wizard",
            "text": "Flying\nWhenever you draw a card, Niv-Mizzet deals 1 damage to any target.",
            "color": U | R, "identity": U | R, "cmc": 6,
            "power": "5", "toughness": "5",
            "rarity": "rare", "keywords": ["Flying"],
            "formats": ["modern", "legacy", "vintage", "commander"],
            "set": "grn", "year": 2018, "prices": {"usd": 1.0}
        }),
        json!({
            "name": "Dragonlord Atarka",
            "type": "Legendary Creature — Elder Dragon",
            "text": "Flying, trample",
            "color": R | G, "identity": R | G, "cmc": 7,
            "power": "8", "toughness": "8",
            "rarity": "mythic", "keywords": ["Flying", "Trample"],
            "formats": ["modern", "legacy", "vintage", "commander"],
            "set": "dtk", "year": 2015, "prices": {"usd": 4.0}
        }),
        json!({
            "name": "Azorius Charm",
            "type": "Instant",
            "text": "Choose one — You gain life equal to...",
            "color": W | U, "identity": W | U, "cmc": 2,
            "rarity": "uncommon", "keywords": [],
            "formats": ["modern", "pioneer", "legacy", "vintage", "commander"],
            "set": "rtr", "year": 2012, "prices": {"usd": 0.25}
        }),
        json!({
            "name": "Sphinx of the Steel Wind",
            "type": "Artifact Creature — Sphinx",
            "text": "Flying, first strike, vigilance, lifelink, protection from red and from green",
            "color": W | U | B, "identity": W | U | B, "cmc": 8,
            "power": "6", "toughness": "6",
            "rarity": "mythic", "keywords": ["Flying", "First strike", "Vigilance", "Lifelink"],
            "formats": ["modern", "legacy", "vintage", "commander"],
            "set": "alara", "year": 2009, "prices": {"usd": 0.5}
        }),
        json!({
            "name": "Tarmogoyf",
            "type": "Creature — Lhurgoyf",
            "color": G, "identity": G, "cmc": 2,
            "power": "*", "toughness": "*",
            "rarity": "mythic", "keywords": [],
            "formats": ["modern", "legacy", "vintage", "commander"],
            "set": "fut", "year": 2007, "prices": {"usd": 12.0}
        }),
        json!({
            "name": "Little Girl",
            "type": "Creature — Human Child",
            "color": W, "identity": W, "cmc": 0.5,
            "power": "0.5", "toughness": "0.5",
            "rarity": "common", "keywords": [],
            "formats": [],
            "set": "unh", "year": 2004
        }),
        json!({
            "name": "Emrakul, the Aeons Torn",
            "type": "Legendary Creature — Eldrazi",
            "text": "This spell can't be countered.",
            "color": 0, "identity": 0, "cmc": 15,
            "power": "15", "toughness": "15",
            "rarity": "mythic", "keywords": ["Flying", "Protection", "Annihilator"],
            "formats": ["legacy", "vintage"],
            "set": "roe", "year": 2010, "prices": {"usd": 20.0}
        }),
        json!({
            "name": "Infinity Elemental",
            "type": "Creature — Elemental",
            "color": R, "identity": R, "cmc": 7,
            "power": "∞", "toughness": "5",
            "rarity": "mythic", "keywords": [],
            "formats": [],
            "set": "ust", "year": 2017
        }),
    ]
}

pub fn hearthstone_cards() -> Vec<Value> {
    vec![
        json!({
            "name": "Blood Boil", "text": "Lifesteal. Infect all enemy minions.",
            "cost": 2, "type": "spell", "classes": ["deathknight"],
            "runes": ["blood"], "rarity": "rare", "keywords": ["Lifesteal"]
        }),
        json!({
            "name": "Vampiric Blood", "text": "Give your hero +5 Health.",
            "cost": 4, "type": "spell", "classes": ["deathknight"],
            "runes": ["blood", "blood"], "rarity": "common", "keywords": []
        }),
        json!({
            "name": "Frost Strike", "text": "Deal 3 damage to a minion.",
            "cost": 2, "type": "spell", "classes": ["deathknight"],
            "runes": ["frost"], "rarity": "common", "keywords": []
        }),
        json!({
            "name": "Chillwind Yeti", "cost": 4, "attack": 4, "health": 5,
            "type": "minion", "classes": ["neutral"], "rarity": "common", "keywords": []
        }),
        json!({
            "name": "Harvest Golem", "text": "Deathrattle: Summon a 2/1 Damaged Golem.",
            "cost": 3, "attack": 2, "health": 3,
            "type": "minion", "classes": ["neutral"], "rarity": "common", "keywords": ["Deathrattle"]
        }),
        json!({
            "name": "Spider Tank", "cost": 3, "attack": 3, "health": 4,
            "type": "minion", "classes": ["neutral"], "rarity": "common", "keywords": []
        }),
    ]
}

pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
        .with_cards("magic", magic_cards())
        .with_cards("hearthstone", hearthstone_cards())
}

pub fn engine_with(store: Arc<dyn CardStore>, config: SearchConfig) -> SearchEngine {
    SearchEngine::new(
        Arc::new(builtin_registry().unwrap()),
        store,
        Arc::new(Catalog::english().unwrap()),
        config,
    )
}

pub fn engine() -> SearchEngine {
    engine_with(Arc::new(memory_store()), SearchConfig::default())
}

pub fn engine_with_policy(policy: EmptyQueryPolicy) -> SearchEngine {
    let config = SearchConfig {
        empty_query: policy,
        ..SearchConfig::default()
    };
    engine_with(Arc::new(memory_store()), config)
}

/// Store whose backend is always down
pub struct UnavailableStore;

#[async_trait]
impl CardStore for UnavailableStore {
    async fn fetch(&self, _: &str, _: &Predicate, _: &PageRequest) -> Result<PageResult> {
        bail!("connection refused")
    }
}

pub fn names(result: &PageResult) -> Vec<&str> {
    result
        .rows
        .iter()
        .filter_map(|row| row.get("name").and_then(Value::as_str))
        .collect()
}
