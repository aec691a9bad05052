use serde::{Deserialize, Serialize};

/// Literal operand of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Comparison::Eq => ordering == Equal,
            Comparison::Lt => ordering == Less,
            Comparison::Le => ordering != Greater,
            Comparison::Gt => ordering == Greater,
            Comparison::Ge => ordering != Less,
        }
    }
}

/// Store-neutral boolean expression over one card document.
///
/// Keys are dotted paths into the document. Text matching is
/// case-insensitive throughout; regex sources are stored without flags and
/// every renderer applies case-insensitivity itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "kebab-case")]
pub enum Predicate {
    /// Matches every document
    All,
    Contains {
        key: String,
        needle: String,
    },
    Regex {
        key: String,
        pattern: String,
    },
    TextEquals {
        key: String,
        value: String,
    },
    Compare {
        key: String,
        cmp: Comparison,
        value: Scalar,
    },
    /// Stored value equals one of `values`; an empty list matches nothing
    InList {
        key: String,
        values: Vec<Scalar>,
    },
    /// Key exists and is not null
    Present {
        key: String,
    },
    /// Stored list contains `value`
    HasElement {
        key: String,
        value: String,
    },
    /// Stored list is non-empty and holds nothing but `value`. Unless
    /// `distinct`, the list must also hold exactly one element.
    SoleElement {
        key: String,
        value: String,
        distinct: bool,
    },
    BitsAllSet {
        key: String,
        mask: u64,
    },
    BitsAllClear {
        key: String,
        mask: u64,
    },
    Not(Box<Predicate>),
    And(Vec<Predicate>),
    /// An empty disjunction matches nothing
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn negate(self) -> Predicate {
        match self {
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }

    /// Conjunction, flattening nested `And`s and dropping `All`
    pub fn and(predicates: Vec<Predicate>) -> Predicate {
        let mut flat = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            match predicate {
                Predicate::All => {}
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Predicate::All,
            1 => flat.remove(0),
            _ => Predicate::And(flat),
        }
    }

    pub fn or(mut predicates: Vec<Predicate>) -> Predicate {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        Predicate::Or(predicates)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }
}
