use super::{literal, Predicate};
use crate::command::SetOptions;
use crate::errors::SearchError;
use crate::resolve::ResolvedArgument;
use crate::types::Operator;

pub(super) fn compile(
    arg: &ResolvedArgument<'_>,
    options: &SetOptions,
) -> Result<Predicate, SearchError> {
    let raw = literal(arg)?;
    if raw.is_empty() {
        return Err(SearchError::invalid(arg.command.id(), raw, "expected a value"));
    }
    let value = options.canonical(raw);
    if !options.accepts(&value) {
        return Err(SearchError::invalid(
            arg.command.id(),
            raw,
            format!("unknown value {}", value),
        ));
    }

    let key = arg.key().to_string();
    match arg.operator {
        Operator::Match => Ok(Predicate::HasElement { key, value }),
        Operator::Eq => Ok(Predicate::SoleElement {
            key,
            value,
            distinct: !options.count_duplicates,
        }),
        op => Err(SearchError::OperatorUnsupported {
            field: arg.command.id().to_string(),
            operator: op.to_string(),
        }),
    }
}
