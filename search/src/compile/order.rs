use super::{literal, SortKey};
use crate::command::OrderOptions;
use crate::errors::SearchError;
use crate::resolve::ResolvedArgument;

/// `name`, `name+` or `name-`
pub(super) fn compile(
    arg: &ResolvedArgument<'_>,
    options: &OrderOptions,
) -> Result<SortKey, SearchError> {
    let raw = literal(arg)?;
    let (name, descending) = split_direction(raw);
    let key = options.keys.get(&name.to_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = options.keys.keys().map(String::as_str).collect();
        SearchError::invalid(
            arg.command.id(),
            raw,
            format!("expected one of {}", known.join(", ")),
        )
    })?;
    Ok(SortKey {
        key: key.clone(),
        descending,
    })
}

pub(crate) fn split_direction(raw: &str) -> (&str, bool) {
    if let Some(name) = raw.strip_suffix('-') {
        (name, true)
    } else if let Some(name) = raw.strip_suffix('+') {
        (name, false)
    } else {
        (raw, false)
    }
}
