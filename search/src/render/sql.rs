//! SQLite rendering of predicates over a JSON document column.
//!
//! ```sql
//! json_extract(data, '$.type') REGEXP ?                         -- contains
//! json_extract(data, '$.name') REGEXP ?                         -- regex
//! json_extract(data, '$.power') IN (?, ?, ?)                    -- ladder
//! (json_extract(data, '$.color') & ?) = ?                       -- superset
//! EXISTS (SELECT 1 FROM json_each(data, '$.rune') AS e WHERE …) -- membership
//! ```

use crate::compile::{Comparison, Predicate, Scalar, SortKey};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// WHERE clause without the keyword, with `?` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

#[derive(Debug, Clone)]
pub struct SqlTranslator {
    data_column: String,
}

impl SqlTranslator {
    /// `data_column` must be a plain identifier; callers validate it.
    pub fn new(data_column: &str) -> Self {
        Self {
            data_column: data_column.to_string(),
        }
    }

    pub fn translate(&self, predicate: &Predicate) -> SqlFragment {
        let mut params = Vec::new();
        let clause = self.node(predicate, &mut params);
        SqlFragment { clause, params }
    }

    /// Inlines the parameters for display. Never execute the result.
    pub fn translate_inline(&self, predicate: &Predicate) -> String {
        let fragment = self.translate(predicate);
        let mut result = String::with_capacity(fragment.clause.len());
        let mut params = fragment.params.into_iter().peekable();
        for ch in fragment.clause.chars() {
            match (ch, params.next_if(|_| ch == '?')) {
                (_, Some(param)) => result.push_str(&inline(&param)),
                (ch, None) => result.push(ch),
            }
        }
        result
    }

    pub fn order_by(&self, sort: &SortKey) -> String {
        format!(
            "ORDER BY {} {}",
            self.extract(&sort.key),
            if sort.descending { "DESC" } else { "ASC" }
        )
    }

    fn extract(&self, key: &str) -> String {
        format!("json_extract({}, '{}')", self.data_column, json_path(key))
    }

    fn node(&self, predicate: &Predicate, params: &mut Vec<SqlParam>) -> String {
        match predicate {
            Predicate::All => "1 = 1".to_string(),
            // SQLite's LOWER() only folds ASCII, so literal text is matched
            // through REGEXP with a Unicode case-insensitive pattern
            Predicate::Contains { key, needle } => {
                params.push(SqlParam::Text(format!("(?i){}", regex::escape(needle))));
                format!("{} REGEXP ?", self.extract(key))
            }
            Predicate::Regex { key, pattern } => {
                params.push(SqlParam::Text(format!("(?i){}", pattern)));
                format!("{} REGEXP ?", self.extract(key))
            }
            Predicate::TextEquals { key, value } => {
                params.push(SqlParam::Text(whole_text(value)));
                format!("{} REGEXP ?", self.extract(key))
            }
            Predicate::Compare { key, cmp, value } => {
                params.push(param(value));
                format!("{} {} ?", self.extract(key), sql_operator(*cmp))
            }
            Predicate::InList { key, values } => {
                if values.is_empty() {
                    return "1 = 0".to_string();
                }
                let placeholders = vec!["?"; values.len()].join(", ");
                params.extend(values.iter().map(param));
                format!("{} IN ({})", self.extract(key), placeholders)
            }
            Predicate::Present { key } => format!("{} IS NOT NULL", self.extract(key)),
            Predicate::HasElement { key, value } => {
                params.push(SqlParam::Text(whole_text(value)));
                format!(
                    "EXISTS (SELECT 1 FROM json_each({}, '{}') AS e WHERE e.value REGEXP ?)",
                    self.data_column,
                    json_path(key)
                )
            }
            Predicate::SoleElement {
                key,
                value,
                distinct,
            } => {
                params.push(SqlParam::Text(whole_text(value)));
                // a scalar counts as a one element list
                let kind = format!("json_type({}, '{}')", self.data_column, json_path(key));
                let length = format!(
                    "(CASE WHEN {kind} = 'array' THEN json_array_length({col}, '{path}') \
                     WHEN {kind} IN ('text', 'integer', 'real') THEN 1 ELSE 0 END)",
                    kind = kind,
                    col = self.data_column,
                    path = json_path(key)
                );
                let others = format!(
                    "NOT EXISTS (SELECT 1 FROM json_each({}, '{}') AS e WHERE NOT COALESCE(e.value REGEXP ?, 0))",
                    self.data_column,
                    json_path(key)
                );
                if *distinct {
                    format!("({} > 0 AND {})", length, others)
                } else {
                    format!("({} = 1 AND {})", length, others)
                }
            }
            Predicate::BitsAllSet { key, mask } => {
                params.push(SqlParam::Integer(*mask as i64));
                params.push(SqlParam::Integer(*mask as i64));
                format!("({} & ?) = ?", self.extract(key))
            }
            Predicate::BitsAllClear { key, mask } => {
                params.push(SqlParam::Integer(*mask as i64));
                format!("({} & ?) = 0", self.extract(key))
            }
            // NULL comparisons must count as false before negating
            Predicate::Not(inner) => format!("NOT COALESCE(({}), 0)", self.node(inner, params)),
            Predicate::And(nodes) => self.join(nodes, " AND ", "1 = 1", params),
            Predicate::Or(nodes) => self.join(nodes, " OR ", "1 = 0", params),
        }
    }

    fn join(
        &self,
        nodes: &[Predicate],
        separator: &str,
        empty: &str,
        params: &mut Vec<SqlParam>,
    ) -> String {
        let parts: Vec<String> = nodes.iter().map(|n| self.node(n, params)).collect();
        match parts.len() {
            0 => empty.to_string(),
            1 => parts[0].clone(),
            _ => format!("({})", parts.join(separator)),
        }
    }
}

fn json_path(key: &str) -> String {
    format!("$.{}", key)
}

fn sql_operator(cmp: Comparison) -> &'static str {
    match cmp {
        Comparison::Eq => "=",
        Comparison::Lt => "<",
        Comparison::Le => "<=",
        Comparison::Gt => ">",
        Comparison::Ge => ">=",
    }
}

fn param(value: &Scalar) -> SqlParam {
    match value {
        Scalar::Integer(i) => SqlParam::Integer(*i),
        Scalar::Float(x) => SqlParam::Float(*x),
        Scalar::Text(s) => SqlParam::Text(s.clone()),
    }
}

/// Anchored, escaped, case-insensitive pattern matching `value` exactly
fn whole_text(value: &str) -> String {
    format!("(?i)^{}$", regex::escape(value))
}

fn inline(param: &SqlParam) -> String {
    match param {
        SqlParam::Text(s) => format!("'{}'", s.replace('\'', "''")),
        SqlParam::Integer(i) => i.to_string(),
        SqlParam::Float(x) => x.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> SqlTranslator {
        SqlTranslator::new("data")
    }

    #[test]
    fn test_contains_escapes_regex_syntax() {
        let fragment = translator().translate(&Predicate::Contains {
            key: "name".to_string(),
            needle: "100%_Fire (x+1)".to_string(),
        });
        assert_eq!(fragment.clause, "json_extract(data, '$.name') REGEXP ?");
        assert_eq!(
            fragment.params,
            vec![SqlParam::Text("(?i)100%_Fire \\(x\\+1\\)".to_string())]
        );
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        let fragment = translator().translate(&Predicate::Regex {
            key: "name".to_string(),
            pattern: "^fire".to_string(),
        });
        assert_eq!(fragment.clause, "json_extract(data, '$.name') REGEXP ?");
        assert_eq!(fragment.params, vec![SqlParam::Text("(?i)^fire".to_string())]);
    }

    #[test]
    fn test_in_list() {
        let fragment = translator().translate(&Predicate::InList {
            key: "power".to_string(),
            values: vec![Scalar::Text("1".to_string()), Scalar::Text("+1".to_string())],
        });
        assert_eq!(fragment.clause, "json_extract(data, '$.power') IN (?, ?)");
        assert_eq!(fragment.params.len(), 2);

        let empty = translator().translate(&Predicate::InList {
            key: "power".to_string(),
            values: vec![],
        });
        assert_eq!(empty.clause, "1 = 0");
        assert!(empty.params.is_empty());
    }

    #[test]
    fn test_bits_and_negation() {
        let predicate = Predicate::And(vec![
            Predicate::BitsAllSet {
                key: "color".to_string(),
                mask: 3,
            },
            Predicate::Compare {
                key: "color".to_string(),
                cmp: Comparison::Eq,
                value: Scalar::Integer(3),
            }
            .negate(),
        ]);
        let fragment = translator().translate(&predicate);
        assert_eq!(
            fragment.clause,
            "((json_extract(data, '$.color') & ?) = ? AND NOT COALESCE((json_extract(data, '$.color') = ?), 0))"
        );
        assert_eq!(
            fragment.params,
            vec![
                SqlParam::Integer(3),
                SqlParam::Integer(3),
                SqlParam::Integer(3)
            ]
        );
    }

    #[test]
    fn test_membership_uses_json_each() {
        let fragment = translator().translate(&Predicate::HasElement {
            key: "rune".to_string(),
            value: "blood".to_string(),
        });
        assert_eq!(
            fragment.clause,
            "EXISTS (SELECT 1 FROM json_each(data, '$.rune') AS e WHERE e.value REGEXP ?)"
        );
        assert_eq!(fragment.params, vec![SqlParam::Text("(?i)^blood$".to_string())]);
    }

    #[test]
    fn test_sole_element_counts_scalars() {
        let fragment = translator().translate(&Predicate::SoleElement {
            key: "rarity".to_string(),
            value: "rare".to_string(),
            distinct: false,
        });
        assert!(fragment.clause.starts_with(
            "((CASE WHEN json_type(data, '$.rarity') = 'array' THEN json_array_length(data, '$.rarity') \
             WHEN json_type(data, '$.rarity') IN ('text', 'integer', 'real') THEN 1 ELSE 0 END) = 1 AND NOT EXISTS"
        ));
        assert_eq!(fragment.params, vec![SqlParam::Text("(?i)^rare$".to_string())]);
    }

    #[test]
    fn test_empty_groups() {
        assert_eq!(translator().translate(&Predicate::All).clause, "1 = 1");
        assert_eq!(translator().translate(&Predicate::Or(vec![])).clause, "1 = 0");
    }

    #[test]
    fn test_translate_inline() {
        let inline = translator().translate_inline(&Predicate::TextEquals {
            key: "name".to_string(),
            value: "Urza's Saga".to_string(),
        });
        assert_eq!(
            inline,
            "json_extract(data, '$.name') REGEXP '(?i)^Urza''s Saga$'"
        );
    }

    #[test]
    fn test_order_by() {
        let sort = SortKey {
            key: "prices.usd".to_string(),
            descending: true,
        };
        assert_eq!(
            translator().order_by(&sort),
            "ORDER BY json_extract(data, '$.prices.usd') DESC"
        );
    }
}
