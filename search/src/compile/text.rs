use super::{comparison, Predicate, Scalar};
use crate::errors::SearchError;
use crate::resolve::ResolvedArgument;
use crate::types::{Operator, TokenValue};

/// Text semantics against a single storage key
pub(super) fn compile(arg: &ResolvedArgument<'_>, key: &str) -> Result<Predicate, SearchError> {
    let key = key.to_string();
    let predicate = match (&arg.value, arg.operator) {
        (TokenValue::Text(value), Operator::Match) => Predicate::Contains {
            key,
            needle: value.clone(),
        },
        (TokenValue::Regex(source), Operator::Match) => Predicate::Regex {
            key,
            pattern: source.clone(),
        },
        (TokenValue::Text(value), Operator::Eq) => Predicate::TextEquals {
            key,
            value: value.clone(),
        },
        (TokenValue::Regex(source), Operator::Eq) => Predicate::Regex {
            key,
            pattern: format!("^(?:{})$", source),
        },
        (TokenValue::Text(value), op) => Predicate::Compare {
            key,
            cmp: comparison(op),
            value: Scalar::Text(value.clone()),
        },
        (TokenValue::Regex(source), op) => {
            return Err(SearchError::invalid(
                arg.command.id(),
                source,
                format!("regular expressions cannot be used with {}", op),
            ))
        }
    };
    Ok(predicate)
}
