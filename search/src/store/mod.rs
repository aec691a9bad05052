//! Storage collaborators. A store receives the conjoined predicate of one
//! query together with pagination and returns one page of card documents.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::compile::{Predicate, SortKey};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub sort: Option<SortKey>,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub rows: Vec<Value>,
    /// Matches across all pages
    pub total: u64,
    pub elapsed_ms: u64,
}

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn fetch(
        &self,
        model_id: &str,
        predicate: &Predicate,
        page: &PageRequest,
    ) -> Result<PageResult>;
}

/// Dotted-path lookup into a card document. `null` counts as absent.
pub(crate) fn lookup<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = document;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_offset() {
        let page = |page, page_size| PageRequest {
            page,
            page_size,
            sort: None,
        };
        assert_eq!(page(1, 20).offset(), 0);
        assert_eq!(page(3, 20).offset(), 40);
        assert_eq!(page(0, 20).offset(), 0);
    }

    #[test]
    fn test_lookup_dotted() {
        let card = json!({"prices": {"usd": 1.5}, "flavor": null});
        assert_eq!(lookup(&card, "prices.usd"), Some(&json!(1.5)));
        assert_eq!(lookup(&card, "prices.eur"), None);
        assert_eq!(lookup(&card, "flavor"), None);
    }

    #[test]
    fn test_page_result_serializes_camel_case() {
        let result = PageResult {
            rows: vec![],
            total: 3,
            elapsed_ms: 7,
        };
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            json!({"rows": [], "total": 3, "elapsedMs": 7})
        );
    }
}
