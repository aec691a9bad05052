//! Renders resolved arguments as localized, human readable phrases.

mod catalog;

pub use catalog::Catalog;

use crate::command::CommandKind;
use crate::compile::split_direction;
use crate::resolve::ResolvedArgument;
use crate::types::Operator;

/// Translation collaborator. Returns `key` unchanged when it has no message.
pub trait Localizer: Send + Sync {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// Explains one argument, preferring the command's own explain function.
/// `None` means the command is deliberately silent.
pub fn explain(arg: &ResolvedArgument<'_>, i18n: &dyn Localizer) -> Option<String> {
    match arg.command.explain_fn() {
        Some(custom) => custom(arg, i18n),
        None => default_explain(arg, i18n),
    }
}

pub fn default_explain(arg: &ResolvedArgument<'_>, i18n: &dyn Localizer) -> Option<String> {
    match arg.meta() {
        CommandKind::Unrestricted(_) => None,
        CommandKind::Order(_) => Some(explain_order(arg, i18n)),
        CommandKind::Pattern(_) => {
            let parts: Vec<String> = arg.parts.iter().filter_map(|p| explain(p, i18n)).collect();
            let joined = join_all(&parts, i18n)?;
            if arg.negated() {
                Some(
                    lookup(i18n, "operator.not-all", &[("value", joined.as_str())])
                        .unwrap_or_else(|| format!("not ({})", joined)),
                )
            } else {
                Some(joined)
            }
        }
        _ => Some(phrase(arg, &parameter(arg, i18n), &display_value(arg), i18n)),
    }
}

/// Message key suffix for an operator, e.g. `not-include` for `!t:dragon`
pub fn operator_key(kind: &CommandKind, operator: Operator, negated: bool, regex: bool) -> String {
    let base = match operator {
        Operator::Eq if regex => "match-exactly",
        Operator::Eq => "is",
        Operator::Match if regex => "match",
        Operator::Match if compares_by_equality(kind) => "is",
        Operator::Match => "include",
        Operator::Lt => "less-than",
        Operator::Lte => "less-than-or-equal",
        Operator::Gt => "greater-than",
        Operator::Gte => "greater-than-or-equal",
    };
    match (negated, base) {
        (false, base) => base.to_string(),
        (true, "is") => "is-not".to_string(),
        (true, base) => format!("not-{}", base),
    }
}

/// Localized field name, with the modifier when one was used
pub fn parameter(arg: &ResolvedArgument<'_>, i18n: &dyn Localizer) -> String {
    let id = arg.command.id();
    let name = lookup(i18n, &format!("field.{}", id), &[]).unwrap_or_else(|| id.to_string());
    match arg.modifier {
        Some(modifier) => {
            let label = lookup(i18n, &format!("modifier.{}", modifier.name), &[])
                .unwrap_or_else(|| modifier.name.clone());
            format!("{} ({})", name, label)
        }
        None => name,
    }
}

/// `{parameter} <operator phrase> {value}`, falling back to the raw operator
pub fn phrase(
    arg: &ResolvedArgument<'_>,
    parameter: &str,
    value: &str,
    i18n: &dyn Localizer,
) -> String {
    let key = operator_key(arg.meta(), arg.operator, arg.negated(), arg.value.is_regex());
    let params = [("parameter", parameter), ("value", value)];
    lookup(i18n, &format!("operator.{}", key), &params).unwrap_or_else(|| {
        let negation = if arg.negated() { "!" } else { "" };
        format!("{} {}{} {}", parameter, negation, arg.operator, value)
    })
}

fn compares_by_equality(kind: &CommandKind) -> bool {
    matches!(kind, CommandKind::Number(_) | CommandKind::HalfNumber(_))
}

fn display_value(arg: &ResolvedArgument<'_>) -> String {
    match (arg.meta(), arg.value.is_regex()) {
        (_, true) => arg.value.to_string(),
        (CommandKind::Set(options), false) => options.canonical(arg.value.as_str().trim()),
        _ => arg.value.as_str().to_string(),
    }
}

fn explain_order(arg: &ResolvedArgument<'_>, i18n: &dyn Localizer) -> String {
    let (name, descending) = split_direction(arg.value.as_str().trim());
    let parameter = lookup(i18n, &format!("field.{}", name.to_lowercase()), &[])
        .unwrap_or_else(|| name.to_string());
    let (direction_key, direction_default) = if descending {
        ("order.descending", "descending")
    } else {
        ("order.ascending", "ascending")
    };
    let direction =
        lookup(i18n, direction_key, &[]).unwrap_or_else(|| direction_default.to_string());
    lookup(
        i18n,
        "order.sorted-by",
        &[("parameter", parameter.as_str()), ("direction", direction.as_str())],
    )
    .unwrap_or_else(|| format!("sorted by {}, {}", parameter, direction))
}

/// `a`, `a and b`, `a, b and c`
pub fn join_all(items: &[String], i18n: &dyn Localizer) -> Option<String> {
    let (last, rest) = items.split_last()?;
    if rest.is_empty() {
        return Some(last.clone());
    }
    let and = lookup(i18n, "conjunction.and", &[]).unwrap_or_else(|| "and".to_string());
    Some(format!("{} {} {}", rest.join(", "), and, last))
}

/// Translation, or `None` when the localizer has no message for `key`
pub fn lookup(i18n: &dyn Localizer, key: &str, params: &[(&str, &str)]) -> Option<String> {
    let message = i18n.translate(key, params);
    if message == key {
        None
    } else {
        Some(message)
    }
}
