//! Mongo-style filter documents for document stores.

use crate::compile::{Comparison, Predicate, Scalar, SortKey};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTranslator;

impl DocumentTranslator {
    pub fn translate(&self, predicate: &Predicate) -> Value {
        match predicate {
            Predicate::All => json!({}),
            Predicate::Contains { key, needle } => field(
                key,
                json!({"$regex": regex::escape(needle), "$options": "i"}),
            ),
            Predicate::Regex { key, pattern } => {
                field(key, json!({"$regex": pattern, "$options": "i"}))
            }
            Predicate::TextEquals { key, value } => field(key, exact_text(value)),
            Predicate::Compare { key, cmp, value } => match cmp {
                Comparison::Eq => field(key, scalar(value)),
                other => field(key, field(operator(*other), scalar(value))),
            },
            Predicate::InList { key, values } => field(
                key,
                json!({"$in": values.iter().map(scalar).collect::<Vec<_>>()}),
            ),
            Predicate::Present { key } => field(key, json!({"$exists": true, "$ne": null})),
            Predicate::HasElement { key, value } => {
                field(key, json!({"$elemMatch": exact_text(value)}))
            }
            Predicate::SoleElement {
                key,
                value,
                distinct,
            } => {
                let only_value = field(
                    key,
                    json!({"$not": {"$elemMatch": {"$not": exact_text(value)}}}),
                );
                let size = if *distinct {
                    field(key, json!({"$exists": true, "$ne": []}))
                } else {
                    field(key, json!({"$size": 1}))
                };
                json!({"$and": [size, only_value]})
            }
            Predicate::BitsAllSet { key, mask } => field(key, json!({"$bitsAllSet": mask})),
            Predicate::BitsAllClear { key, mask } => field(key, json!({"$bitsAllClear": mask})),
            Predicate::Not(inner) => json!({"$nor": [self.translate(inner)]}),
            Predicate::And(nodes) => match nodes.len() {
                0 => json!({}),
                1 => self.translate(&nodes[0]),
                _ => json!({"$and": nodes.iter().map(|n| self.translate(n)).collect::<Vec<_>>()}),
            },
            // `{"$nor": [{}]}` matches nothing
            Predicate::Or(nodes) => match nodes.len() {
                0 => json!({"$nor": [{}]}),
                1 => self.translate(&nodes[0]),
                _ => json!({"$or": nodes.iter().map(|n| self.translate(n)).collect::<Vec<_>>()}),
            },
        }
    }

    pub fn sort(&self, sort: &SortKey) -> Value {
        field(&sort.key, json!(if sort.descending { -1 } else { 1 }))
    }
}

fn field(key: &str, condition: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), condition);
    Value::Object(map)
}

fn exact_text(value: &str) -> Value {
    json!({"$regex": format!("^{}$", regex::escape(value)), "$options": "i"})
}

fn scalar(value: &Scalar) -> Value {
    match value {
        Scalar::Integer(i) => json!(i),
        Scalar::Float(x) => json!(x),
        Scalar::Text(s) => json!(s),
    }
}

fn operator(cmp: Comparison) -> &'static str {
    match cmp {
        Comparison::Eq => "$eq",
        Comparison::Lt => "$lt",
        Comparison::Le => "$lte",
        Comparison::Gt => "$gt",
        Comparison::Ge => "$gte",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_escapes_regex() {
        let filter = DocumentTranslator.translate(&Predicate::Contains {
            key: "name".to_string(),
            needle: "a.b".to_string(),
        });
        assert_eq!(filter, json!({"name": {"$regex": "a\\.b", "$options": "i"}}));
    }

    #[test]
    fn test_comparisons() {
        let eq = DocumentTranslator.translate(&Predicate::Compare {
            key: "cmc".to_string(),
            cmp: Comparison::Eq,
            value: Scalar::Integer(3),
        });
        assert_eq!(eq, json!({"cmc": 3}));

        let ge = DocumentTranslator.translate(&Predicate::Compare {
            key: "cmc".to_string(),
            cmp: Comparison::Ge,
            value: Scalar::Float(2.5),
        });
        assert_eq!(ge, json!({"cmc": {"$gte": 2.5}}));
    }

    #[test]
    fn test_boolean_structure() {
        let predicate = Predicate::And(vec![
            Predicate::BitsAllSet {
                key: "color".to_string(),
                mask: 24,
            },
            Predicate::InList {
                key: "power".to_string(),
                values: vec![Scalar::Text("1".to_string())],
            }
            .negate(),
        ]);
        assert_eq!(
            DocumentTranslator.translate(&predicate),
            json!({"$and": [
                {"color": {"$bitsAllSet": 24}},
                {"$nor": [{"power": {"$in": ["1"]}}]}
            ]})
        );
    }

    #[test]
    fn test_empty_groups() {
        assert_eq!(DocumentTranslator.translate(&Predicate::All), json!({}));
        assert_eq!(
            DocumentTranslator.translate(&Predicate::Or(vec![])),
            json!({"$nor": [{}]})
        );
    }

    #[test]
    fn test_sort() {
        let sort = SortKey {
            key: "name".to_string(),
            descending: true,
        };
        assert_eq!(DocumentTranslator.sort(&sort), json!({"name": -1}));
    }
}
