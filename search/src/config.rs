use crate::explain::Catalog;
use crate::store::{CardStore, MemoryStore, SqliteStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
}

/// What a query without a single usable predicate returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyQueryPolicy {
    #[default]
    MatchAll,
    NoPredicates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub empty_query: EmptyQueryPolicy,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            empty_query: EmptyQueryPolicy::default(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    #[serde(flatten)]
    pub config: StoreVariant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreVariant {
    pub memory: Option<MemoryConfig>,
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Deserialize)]
pub struct MemoryConfig {
    /// JSON object of model id to card array
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct SqliteConfig {
    pub url: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_data_column")]
    pub data_column: String,
    #[serde(default = "default_model_column")]
    pub model_column: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleConfig {
    /// Catalog overlaid on the built-in English messages
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn get_memory(&self) -> Option<&MemoryConfig> {
        match self.store_type {
            StoreType::Memory => self.config.memory.as_ref(),
            _ => None,
        }
    }

    pub fn get_sqlite(&self) -> Option<&SqliteConfig> {
        match self.store_type {
            StoreType::Sqlite => self.config.sqlite.as_ref(),
            _ => None,
        }
    }

    pub async fn open(&self) -> Result<Arc<dyn CardStore>> {
        match self.store_type {
            StoreType::Memory => {
                let store = match self.get_memory().and_then(|m| m.path.as_deref()) {
                    Some(path) => MemoryStore::from_json_file(path)?,
                    None => MemoryStore::new(),
                };
                Ok(Arc::new(store))
            }
            StoreType::Sqlite => {
                let sqlite = self
                    .get_sqlite()
                    .context("Store type is sqlite but [store.sqlite] is missing")?;
                let store = SqliteStore::connect(
                    &sqlite.url,
                    &sqlite.table,
                    &sqlite.data_column,
                    &sqlite.model_column,
                )
                .await?;
                store.ensure_schema().await?;
                Ok(Arc::new(store))
            }
        }
    }
}

impl LocaleConfig {
    pub fn catalog(&self) -> Result<Catalog> {
        let english = Catalog::english()?;
        match &self.path {
            Some(path) => Ok(english.merge(Catalog::load(path)?)),
            None => Ok(english),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_table() -> String {
    "cards".to_string()
}

fn default_data_column() -> String {
    "data".to_string()
}

fn default_model_column() -> String {
    "game".to_string()
}
