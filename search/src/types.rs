/// Token types for the search query language
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Operator {
    #[strum(to_string = ":")]
    #[serde(rename = ":")]
    Match, // field:value
    #[strum(to_string = "=")]
    #[serde(rename = "=")]
    Eq, // field=value
    #[strum(to_string = "<")]
    #[serde(rename = "<")]
    Lt, // field<value
    #[strum(to_string = "<=")]
    #[serde(rename = "<=")]
    Lte, // field<=value
    #[strum(to_string = ">")]
    #[serde(rename = ">")]
    Gt, // field>value
    #[strum(to_string = ">=")]
    #[serde(rename = ">=")]
    Gte, // field>=value
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Match,
        Operator::Eq,
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
    ];

    /// `<`, `<=`, `>` and `>=`
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Qualifier {
    #[strum(to_string = "!")]
    #[serde(rename = "!")]
    Not,
}

/// A literal string or the source of a `/regex/` literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "lowercase")]
pub enum TokenValue {
    Text(String),
    Regex(String),
}

impl TokenValue {
    pub fn as_str(&self) -> &str {
        match self {
            TokenValue::Text(s) | TokenValue::Regex(s) => s,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, TokenValue::Regex(_))
    }
}

impl std::fmt::Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Text(s) => write!(f, "{}", s),
            TokenValue::Regex(s) => write!(f, "/{}/", s),
        }
    }
}

/// Character offsets of a token in the query text, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedToken {
    pub qualifiers: Vec<Qualifier>,
    /// `None` for the raw/default search
    pub field: Option<String>,
    pub modifier: Option<String>,
    pub operator: Option<Operator>,
    pub value: TokenValue,
    pub span: Span,
}

impl ParsedToken {
    pub fn is_raw(&self) -> bool {
        self.field.is_none()
    }

    pub fn negated(&self) -> bool {
        self.qualifiers.contains(&Qualifier::Not)
    }
}
