//! Argument resolution: matches parsed tokens against a model.

use crate::command::{CommandKind, CommandSpec, Modifier};
use crate::errors::SearchError;
use crate::model::Model;
use crate::types::{Operator, ParsedToken, Qualifier, Span, TokenValue};
use indexmap::IndexMap;
use regex::Regex;

/// A token validated against its command. Borrowed from the model, so it
/// lives no longer than the query that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedArgument<'m> {
    pub command: &'m CommandSpec,
    pub modifier: Option<&'m Modifier>,
    pub value: TokenValue,
    pub operator: Operator,
    pub qualifiers: Vec<Qualifier>,
    /// Captures of a composite pattern, keyed by part id
    pub pattern_fields: Option<IndexMap<String, String>>,
    /// One argument per captured part, in template order
    pub parts: Vec<ResolvedArgument<'m>>,
    pub span: Span,
}

impl<'m> ResolvedArgument<'m> {
    pub fn negated(&self) -> bool {
        self.qualifiers.contains(&Qualifier::Not)
    }

    pub fn meta(&self) -> &'m CommandKind {
        self.command.kind()
    }

    /// Storage key, honouring the modifier
    pub fn key(&self) -> &'m str {
        match self.modifier {
            Some(modifier) => &modifier.key,
            None => self.command.key(),
        }
    }
}

pub fn resolve<'m>(
    model: &'m Model,
    token: &ParsedToken,
) -> Result<ResolvedArgument<'m>, SearchError> {
    let command = match &token.field {
        Some(field) => model.get(field).ok_or_else(|| SearchError::UnknownCommand {
            value: field.clone(),
        })?,
        None => model.raw_command(),
    };
    let id = command.id();
    let raw_value = token.value.as_str();

    let modifier = match &token.modifier {
        Some(name) => Some(command.modifier(name).ok_or_else(|| {
            SearchError::invalid(id, raw_value, format!("unknown modifier {}", name))
        })?),
        None => None,
    };

    let operator = token.operator.unwrap_or(Operator::Match);
    if !command.supports(operator) {
        return Err(SearchError::OperatorUnsupported {
            field: id.to_string(),
            operator: operator.to_string(),
        });
    }

    if let TokenValue::Regex(source) = &token.value {
        if !command.allow_regex() {
            return Err(SearchError::RegexDisabled {
                field: id.to_string(),
                value: source.clone(),
            });
        }
        Regex::new(source).map_err(|e| SearchError::invalid(id, source, e.to_string()))?;
    }

    for qualifier in &token.qualifiers {
        if !command.allows_qualifier(*qualifier, operator) {
            return Err(SearchError::invalid(
                id,
                raw_value,
                format!("qualifier {} is not allowed with {}", qualifier, operator),
            ));
        }
    }

    let (pattern_fields, parts) = match command.kind() {
        CommandKind::Pattern(options) => {
            let fields = options.captures(raw_value).ok_or_else(|| {
                SearchError::invalid(
                    id,
                    raw_value,
                    format!("expected {}", options.templates.join(" or ")),
                )
            })?;
            let parts = fields
                .iter()
                .map(|(part, value)| resolve_part(model, command, part, value, operator, token.span))
                .collect::<Result<Vec<_>, _>>()?;
            (Some(fields), parts)
        }
        _ => (None, Vec::new()),
    };

    Ok(ResolvedArgument {
        command,
        modifier,
        value: token.value.clone(),
        operator,
        qualifiers: token.qualifiers.clone(),
        pattern_fields,
        parts,
        span: token.span,
    })
}

/// Resolves one capture of a composite value against the command it names.
/// `:` falls back to `=` for parts that only compare.
fn resolve_part<'m>(
    model: &'m Model,
    parent: &CommandSpec,
    part: &str,
    value: &str,
    operator: Operator,
    span: Span,
) -> Result<ResolvedArgument<'m>, SearchError> {
    let command = model
        .command(part)
        .ok_or_else(|| SearchError::invalid(parent.id(), value, format!("unknown part {}", part)))?;
    let operator = if command.supports(operator) {
        operator
    } else if operator == Operator::Match && command.supports(Operator::Eq) {
        Operator::Eq
    } else {
        return Err(SearchError::OperatorUnsupported {
            field: part.to_string(),
            operator: operator.to_string(),
        });
    };
    Ok(ResolvedArgument {
        command,
        modifier: None,
        value: TokenValue::Text(value.to_string()),
        operator,
        qualifiers: Vec::new(),
        pattern_fields: None,
        parts: Vec::new(),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandBuilder;
    use crate::parser::parse_query;

    fn model() -> Model {
        Model::builder("test")
            .raw("name")
            .command(CommandBuilder::text("name").alias("n").build().unwrap())
            .unwrap()
            .command(
                CommandBuilder::text("text")
                    .alias("o")
                    .modifier("printed", "p", "printed_text")
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .command(CommandBuilder::number("cmc").build().unwrap())
            .unwrap()
            .command(CommandBuilder::half_number("a").build().unwrap())
            .unwrap()
            .command(CommandBuilder::half_number("b").build().unwrap())
            .unwrap()
            .command(
                CommandBuilder::pattern("ab", &["{{a}}/{{b}}"])
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .build()
            .unwrap()
    }

    fn resolve_one<'m>(model: &'m Model, query: &str) -> Result<ResolvedArgument<'m>, SearchError> {
        let token = parse_query(query).remove(0).unwrap();
        resolve(model, &token)
    }

    #[test]
    fn test_resolve_by_alias() {
        let model = model();
        let arg = resolve_one(&model, "n:bolt").unwrap();
        assert_eq!(arg.command.id(), "name");
        assert_eq!(arg.operator, Operator::Match);
        assert_eq!(arg.key(), "name");
    }

    #[test]
    fn test_raw_token_resolves_to_raw_command() {
        let model = model();
        let arg = resolve_one(&model, "bolt").unwrap();
        assert_eq!(arg.command.id(), "name");
        assert_eq!(arg.operator, Operator::Match);
    }

    #[test]
    fn test_unknown_command() {
        let model = model();
        assert_eq!(
            resolve_one(&model, "foo:bar").unwrap_err(),
            SearchError::UnknownCommand {
                value: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_modifier_carried_forward() {
        let model = model();
        let arg = resolve_one(&model, "o:p:fire").unwrap();
        assert_eq!(arg.modifier.unwrap().name, "printed");
        assert_eq!(arg.key(), "printed_text");
    }

    #[test]
    fn test_unknown_modifier() {
        let model = model();
        let err = resolve_one(&model, "o:flavor:fire").unwrap_err();
        assert_eq!(err.kind(), "invalid-query");
        assert_eq!(err.field(), Some("text"));
    }

    #[test]
    fn test_operator_unsupported() {
        let model = model();
        assert_eq!(
            resolve_one(&model, "name>bolt").unwrap_err(),
            SearchError::OperatorUnsupported {
                field: "name".to_string(),
                operator: ">".to_string(),
            }
        );
    }

    #[test]
    fn test_regex_disabled() {
        let model = model();
        let err = resolve_one(&model, "cmc=/3/").unwrap_err();
        assert_eq!(
            err,
            SearchError::RegexDisabled {
                field: "cmc".to_string(),
                value: "3".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_regex() {
        let model = model();
        let err = resolve_one(&model, "o:/(unclosed/").unwrap_err();
        assert_eq!(err.kind(), "invalid-query");
    }

    #[test]
    fn test_negation_only_with_equality_for_numbers() {
        let model = model();
        assert!(resolve_one(&model, "!cmc=3").unwrap().negated());
        let err = resolve_one(&model, "!cmc>3").unwrap_err();
        assert_eq!(err.kind(), "invalid-query");
    }

    #[test]
    fn test_pattern_fields() {
        let model = model();
        let arg = resolve_one(&model, "ab:3/4").unwrap();
        let fields = arg.pattern_fields.unwrap();
        assert_eq!(fields.get("a").map(String::as_str), Some("3"));
        assert_eq!(fields.get("b").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_pattern_parts_resolved() {
        let model = model();
        let arg = resolve_one(&model, "ab>=3/4").unwrap();
        let ids: Vec<&str> = arg.parts.iter().map(|p| p.command.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(arg.parts[1].value.as_str(), "4");
        assert_eq!(arg.parts[1].operator, Operator::Gte);
    }

    #[test]
    fn test_pattern_mismatch_is_invalid_query() {
        let model = model();
        let err = resolve_one(&model, "ab:3").unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidQuery {
                field: "ab".to_string(),
                value: "3".to_string(),
                reason: "expected {{a}}/{{b}}".to_string(),
            }
        );
    }
}
