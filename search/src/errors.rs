use serde::{Deserialize, Serialize};

/// Per-token failure. One bad token never aborts the rest of the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SearchError {
    SyntaxError {
        message: String,
        start: usize,
        end: usize,
    },
    UnknownCommand {
        value: String,
    },
    InvalidQuery {
        field: String,
        value: String,
        reason: String,
    },
    RegexDisabled {
        field: String,
        value: String,
    },
    OperatorUnsupported {
        field: String,
        operator: String,
    },
}

impl SearchError {
    pub fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        SearchError::InvalidQuery {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::SyntaxError { .. } => "syntax-error",
            SearchError::UnknownCommand { .. } => "unknown-command",
            SearchError::InvalidQuery { .. } => "invalid-query",
            SearchError::RegexDisabled { .. } => "regex-disabled",
            SearchError::OperatorUnsupported { .. } => "operator-unsupported",
        }
    }

    /// Command id the error is attributed to, when one was resolved
    pub fn field(&self) -> Option<&str> {
        match self {
            SearchError::InvalidQuery { field, .. }
            | SearchError::RegexDisabled { field, .. }
            | SearchError::OperatorUnsupported { field, .. } => Some(field),
            SearchError::SyntaxError { .. } | SearchError::UnknownCommand { .. } => None,
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::SyntaxError {
                message,
                start,
                end,
            } => write!(f, "Syntax error at {}..{}: {}", start, end, message),
            SearchError::UnknownCommand { value } => write!(f, "Unknown command: {}", value),
            SearchError::InvalidQuery {
                field,
                value,
                reason,
            } => write!(f, "Invalid query for {} ({}): {}", field, value, reason),
            SearchError::RegexDisabled { field, value } => {
                write!(f, "Regular expressions are not allowed for {}: {}", field, value)
            }
            SearchError::OperatorUnsupported { field, operator } => {
                write!(f, "Operator {} is not supported by {}", operator, field)
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Query-level failure, distinct from per-token errors
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFailure {
    UnknownModel(String),
    StoreUnavailable(String),
}

impl std::fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchFailure::UnknownModel(id) => write!(f, "Unknown model: {}", id),
            SearchFailure::StoreUnavailable(err) => write!(f, "Store unavailable: {}", err),
        }
    }
}

impl std::error::Error for SearchFailure {}

/// Errors raised while building commands and models at startup
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    EmptyId,
    InvalidKey(String),
    InvalidPattern { command: String, reason: String },
    DuplicateName {
        model: String,
        name: String,
        existing: String,
    },
    DuplicateModel(String),
    MissingRawCommand(String),
    UnknownPatternPart { command: String, part: String },
    BitsetTooWide {
        command: String,
        letters: usize,
        max: usize,
    },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyId => write!(f, "Command id must not be empty"),
            ModelError::InvalidKey(key) => write!(f, "Invalid storage key: {}", key),
            ModelError::InvalidPattern { command, reason } => {
                write!(f, "Invalid pattern for {}: {}", command, reason)
            }
            ModelError::DuplicateName {
                model,
                name,
                existing,
            } => write!(
                f,
                "Name {} in model {} is already used by command {}",
                name, model, existing
            ),
            ModelError::DuplicateModel(id) => write!(f, "Model already registered: {}", id),
            ModelError::MissingRawCommand(id) => {
                write!(f, "Raw command {} is not part of the model", id)
            }
            ModelError::UnknownPatternPart { command, part } => write!(
                f,
                "Pattern of {} references unknown command {}",
                command, part
            ),
            ModelError::BitsetTooWide {
                command,
                letters,
                max,
            } => write!(
                f,
                "Bitset {} has {} letters, at most {} are supported",
                command, letters, max
            ),
        }
    }
}

impl std::error::Error for ModelError {}
