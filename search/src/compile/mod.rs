//! Turns resolved arguments into store-neutral predicates.
//!
//! One adapter per command kind; negation is applied here, once, after the
//! adapter has built the positive predicate.

mod bitset;
mod half_number;
mod number;
mod order;
mod predicate;
mod set;
mod text;

pub use predicate::{Comparison, Predicate, Scalar};
pub(crate) use order::split_direction;

use crate::command::CommandKind;
use crate::errors::SearchError;
use crate::resolve::ResolvedArgument;
use crate::types::Operator;
use serde::{Deserialize, Serialize};

/// Sort directive produced by an order command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub key: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    Filter(Predicate),
    Sort(SortKey),
}

pub fn compile(arg: &ResolvedArgument<'_>) -> Result<Compiled, SearchError> {
    if let CommandKind::Order(options) = arg.meta() {
        return order::compile(arg, options).map(Compiled::Sort);
    }
    let predicate = compile_predicate(arg)?;
    if arg.negated() {
        Ok(Compiled::Filter(predicate.negate()))
    } else {
        Ok(Compiled::Filter(predicate))
    }
}

fn compile_predicate(arg: &ResolvedArgument<'_>) -> Result<Predicate, SearchError> {
    match arg.meta() {
        CommandKind::Text => text::compile(arg, arg.key()),
        CommandKind::Number(options) => number::compile(arg, options),
        CommandKind::Set(options) => set::compile(arg, options),
        CommandKind::Bitset(options) => bitset::compile(arg, options),
        CommandKind::HalfNumber(options) => half_number::compile(arg, options),
        CommandKind::Pattern(_) => {
            let parts = arg
                .parts
                .iter()
                .map(compile_predicate)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Predicate::and(parts))
        }
        CommandKind::Unrestricted(options) => {
            let targets = options
                .targets
                .iter()
                .map(|target| text::compile(arg, target))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Predicate::or(targets))
        }
        CommandKind::Order(_) => Err(SearchError::invalid(
            arg.command.id(),
            arg.value.as_str(),
            "sort directives cannot be combined",
        )),
    }
}

pub(crate) fn comparison(operator: Operator) -> Comparison {
    match operator {
        Operator::Match | Operator::Eq => Comparison::Eq,
        Operator::Lt => Comparison::Lt,
        Operator::Lte => Comparison::Le,
        Operator::Gt => Comparison::Gt,
        Operator::Gte => Comparison::Ge,
    }
}

/// Rejects regex values for kinds that only compare literals
pub(crate) fn literal<'a>(arg: &'a ResolvedArgument<'_>) -> Result<&'a str, SearchError> {
    if arg.value.is_regex() {
        return Err(SearchError::RegexDisabled {
            field: arg.command.id().to_string(),
            value: arg.value.as_str().to_string(),
        });
    }
    Ok(arg.value.as_str().trim())
}
