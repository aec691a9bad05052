use super::{comparison, literal, Predicate, Scalar};
use crate::command::NumberOptions;
use crate::errors::SearchError;
use crate::resolve::ResolvedArgument;

pub(super) fn compile(
    arg: &ResolvedArgument<'_>,
    options: &NumberOptions,
) -> Result<Predicate, SearchError> {
    let raw = literal(arg)?;
    let value = parse(raw, options.allow_float)
        .ok_or_else(|| SearchError::invalid(arg.command.id(), raw, "expected a number"))?;
    Ok(Predicate::Compare {
        key: arg.key().to_string(),
        cmp: comparison(arg.operator),
        value,
    })
}

fn parse(raw: &str, allow_float: bool) -> Option<Scalar> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Scalar::Integer(i));
    }
    if allow_float {
        return raw
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(Scalar::Float);
    }
    None
}
