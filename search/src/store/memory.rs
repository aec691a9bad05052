use super::{lookup, CardStore, PageRequest, PageResult};
use crate::compile::{Comparison, Predicate, Scalar, SortKey};
use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Card documents held in memory, grouped by model id
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cards: HashMap<String, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(mut self, model_id: &str, cards: Vec<Value>) -> Self {
        self.cards.entry(model_id.to_string()).or_default().extend(cards);
        self
    }

    pub fn insert(&mut self, model_id: &str, card: Value) {
        self.cards.entry(model_id.to_string()).or_default().push(card);
    }

    /// Loads `{"<model id>": [card, ...], ...}`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)?;
        let cards: HashMap<String, Vec<Value>> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cards from {}", path.display()))?;
        Ok(Self { cards })
    }

    pub fn len(&self, model_id: &str) -> usize {
        self.cards.get(model_id).map_or(0, Vec::len)
    }

    /// Every matching card of a model, unpaginated
    pub fn matching(&self, model_id: &str, predicate: &Predicate) -> Result<Vec<&Value>> {
        let matcher = Matcher::compile(predicate)?;
        Ok(self
            .cards
            .get(model_id)
            .map(|cards| cards.iter().filter(|c| matcher.matches(c)).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn fetch(
        &self,
        model_id: &str,
        predicate: &Predicate,
        page: &PageRequest,
    ) -> Result<PageResult> {
        let started = Instant::now();
        let mut hits = self.matching(model_id, predicate)?;
        if let Some(sort) = &page.sort {
            sort_cards(&mut hits, sort);
        }

        let total = hits.len() as u64;
        let rows = hits
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .cloned()
            .collect();
        Ok(PageResult {
            rows,
            total,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

/// Predicate with its regexes compiled once per query
enum Matcher<'p> {
    All,
    Contains(&'p str, String),
    Regex(&'p str, Regex),
    TextEquals(&'p str, String),
    Compare(&'p str, Comparison, &'p Scalar),
    InList(&'p str, &'p [Scalar]),
    Present(&'p str),
    HasElement(&'p str, String),
    SoleElement(&'p str, String, bool),
    BitsAllSet(&'p str, u64),
    BitsAllClear(&'p str, u64),
    Not(Box<Matcher<'p>>),
    And(Vec<Matcher<'p>>),
    Or(Vec<Matcher<'p>>),
}

impl<'p> Matcher<'p> {
    fn compile(predicate: &'p Predicate) -> Result<Self> {
        let matcher = match predicate {
            Predicate::All => Matcher::All,
            Predicate::Contains { key, needle } => Matcher::Contains(key, needle.to_lowercase()),
            Predicate::Regex { key, pattern } => Matcher::Regex(
                key,
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("Invalid regular expression {}", pattern))?,
            ),
            Predicate::TextEquals { key, value } => Matcher::TextEquals(key, value.to_lowercase()),
            Predicate::Compare { key, cmp, value } => Matcher::Compare(key, *cmp, value),
            Predicate::InList { key, values } => Matcher::InList(key, values),
            Predicate::Present { key } => Matcher::Present(key),
            Predicate::HasElement { key, value } => Matcher::HasElement(key, value.to_lowercase()),
            Predicate::SoleElement {
                key,
                value,
                distinct,
            } => Matcher::SoleElement(key, value.to_lowercase(), *distinct),
            Predicate::BitsAllSet { key, mask } => Matcher::BitsAllSet(key, *mask),
            Predicate::BitsAllClear { key, mask } => Matcher::BitsAllClear(key, *mask),
            Predicate::Not(inner) => Matcher::Not(Box::new(Matcher::compile(inner)?)),
            Predicate::And(nodes) => Matcher::And(
                nodes
                    .iter()
                    .map(Matcher::compile)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Predicate::Or(nodes) => Matcher::Or(
                nodes
                    .iter()
                    .map(Matcher::compile)
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        Ok(matcher)
    }

    fn matches(&self, card: &Value) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Contains(key, needle) => {
                texts(card, key).any(|t| t.to_lowercase().contains(needle.as_str()))
            }
            Matcher::Regex(key, re) => texts(card, key).any(|t| re.is_match(&t)),
            Matcher::TextEquals(key, value) => {
                texts(card, key).any(|t| t.to_lowercase() == *value)
            }
            Matcher::Compare(key, cmp, value) => lookup(card, key)
                .and_then(|stored| compare(stored, value))
                .is_some_and(|ordering| cmp.holds(ordering)),
            Matcher::InList(key, values) => lookup(card, key).is_some_and(|stored| {
                values
                    .iter()
                    .any(|v| compare(stored, v) == Some(Ordering::Equal))
            }),
            Matcher::Present(key) => lookup(card, key).is_some(),
            Matcher::HasElement(key, value) => {
                texts(card, key).any(|t| t.to_lowercase() == *value)
            }
            Matcher::SoleElement(key, value, distinct) => {
                let elements: Vec<String> = texts(card, key).map(|t| t.to_lowercase()).collect();
                let only_value = elements.iter().all(|e| e == value);
                if *distinct {
                    !elements.is_empty() && only_value
                } else {
                    elements.len() == 1 && only_value
                }
            }
            Matcher::BitsAllSet(key, mask) => {
                bits(card, key).is_some_and(|stored| stored & mask == *mask)
            }
            Matcher::BitsAllClear(key, mask) => {
                bits(card, key).is_some_and(|stored| stored & mask == 0)
            }
            Matcher::Not(inner) => !inner.matches(card),
            Matcher::And(nodes) => nodes.iter().all(|n| n.matches(card)),
            Matcher::Or(nodes) => nodes.iter().any(|n| n.matches(card)),
        }
    }
}

/// Text forms of a stored value; lists yield each element
fn texts<'a>(card: &'a Value, key: &str) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a> {
    match lookup(card, key) {
        Some(Value::Array(items)) => Box::new(items.iter().filter_map(text)),
        Some(value) => Box::new(text(value).into_iter()),
        None => Box::new(std::iter::empty()),
    }
}

fn text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn bits(card: &Value, key: &str) -> Option<u64> {
    lookup(card, key).and_then(Value::as_u64)
}

/// Orders a stored value against a literal; mismatched types do not compare
fn compare(stored: &Value, value: &Scalar) -> Option<Ordering> {
    match (stored, value) {
        (Value::Number(n), Scalar::Integer(i)) => match n.as_i64() {
            Some(stored) => Some(stored.cmp(i)),
            None => n.as_f64()?.partial_cmp(&(*i as f64)),
        },
        (Value::Number(n), Scalar::Float(x)) => n.as_f64()?.partial_cmp(x),
        (Value::String(s), Scalar::Text(t)) => Some(s.as_str().cmp(t.as_str())),
        _ => None,
    }
}

fn sort_cards(cards: &mut [&Value], sort: &SortKey) {
    cards.sort_by(|a, b| {
        match (lookup(a, &sort.key), lookup(b, &sort.key)) {
            (Some(x), Some(y)) => {
                let ordering = compare_values(x, y);
                if sort.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            // missing values sort last in both directions
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn store() -> MemoryStore {
        MemoryStore::new().with_cards(
            "magic",
            vec![
                json!({"name": "Shivan Dragon", "color": 8, "power": "5", "keywords": ["Flying"], "cmc": 6}),
                json!({"name": "Llanowar Elves", "color": 16, "power": "1", "keywords": [], "cmc": 1}),
                json!({"name": "Tarmogoyf", "color": 16, "power": "*", "cmc": 2}),
                json!({"name": "Azorius Signet", "color": 0, "cmc": 2}),
            ],
        )
    }

    fn names(store: &MemoryStore, predicate: &Predicate) -> Vec<String> {
        store
            .matching("magic", predicate)
            .unwrap()
            .into_iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let predicate = Predicate::Contains {
            key: "name".to_string(),
            needle: "DRAGON".to_string(),
        };
        assert_eq!(names(&store(), &predicate), vec!["Shivan Dragon"]);
    }

    #[test]
    fn test_regex() {
        let predicate = Predicate::Regex {
            key: "name".to_string(),
            pattern: "^(?:tarmo.*)$".to_string(),
        };
        assert_eq!(names(&store(), &predicate), vec!["Tarmogoyf"]);
    }

    #[test]
    fn test_negation_includes_missing_fields() {
        let predicate = Predicate::HasElement {
            key: "keywords".to_string(),
            value: "flying".to_string(),
        }
        .negate();
        assert_eq!(
            names(&store(), &predicate),
            vec!["Llanowar Elves", "Tarmogoyf", "Azorius Signet"]
        );
    }

    #[test]
    fn test_bits_and_numbers() {
        let green = Predicate::BitsAllSet {
            key: "color".to_string(),
            mask: 16,
        };
        assert_eq!(names(&store(), &green), vec!["Llanowar Elves", "Tarmogoyf"]);

        let cheap = Predicate::Compare {
            key: "cmc".to_string(),
            cmp: Comparison::Le,
            value: Scalar::Integer(2),
        };
        assert_eq!(
            names(&store(), &cheap),
            vec!["Llanowar Elves", "Tarmogoyf", "Azorius Signet"]
        );
    }

    #[test]
    fn test_in_list_is_exact() {
        let predicate = Predicate::InList {
            key: "power".to_string(),
            values: vec![Scalar::Text("5".to_string()), Scalar::Text("1".to_string())],
        };
        assert_eq!(
            names(&store(), &predicate),
            vec!["Shivan Dragon", "Llanowar Elves"]
        );
    }

    #[test]
    fn test_empty_or_matches_nothing() {
        assert!(names(&store(), &Predicate::Or(vec![])).is_empty());
    }

    #[test]
    fn test_sole_element() {
        let store = MemoryStore::new().with_cards(
            "hearthstone",
            vec![
                json!({"name": "a", "runes": ["blood", "blood"]}),
                json!({"name": "b", "runes": ["blood"]}),
                json!({"name": "c", "runes": ["blood", "frost"]}),
                json!({"name": "d", "runes": []}),
            ],
        );
        let sole = |distinct| Predicate::SoleElement {
            key: "runes".to_string(),
            value: "Blood".to_string(),
            distinct,
        };
        let hits = |p: &Predicate| -> Vec<String> {
            store
                .matching("hearthstone", p)
                .unwrap()
                .into_iter()
                .map(|c| c["name"].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(hits(&sole(true)), vec!["a", "b"]);
        assert_eq!(hits(&sole(false)), vec!["b"]);
    }

    #[tokio::test]
    async fn test_fetch_sorts_and_paginates() {
        let page = PageRequest {
            page: 2,
            page_size: 2,
            sort: Some(SortKey {
                key: "cmc".to_string(),
                descending: true,
            }),
        };
        let result = store().fetch("magic", &Predicate::All, &page).await.unwrap();
        assert_eq!(result.total, 4);
        let names: Vec<&str> = result
            .rows
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        // 6, 2, 2, 1 descending; the two cmc 2 cards keep their input order
        assert_eq!(names, vec!["Azorius Signet", "Llanowar Elves"]);
    }

    #[tokio::test]
    async fn test_unknown_model_is_empty() {
        let page = PageRequest {
            page: 1,
            page_size: 10,
            sort: None,
        };
        let result = store().fetch("lorcana", &Predicate::All, &page).await.unwrap();
        assert_eq!(result.total, 0);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"magic": [{{"name": "Opt"}}]}}"#).unwrap();
        let store = MemoryStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len("magic"), 1);
        assert_eq!(store.len("hearthstone"), 0);
    }
}
