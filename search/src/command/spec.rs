use super::kind::CommandKind;
use crate::explain::Localizer;
use crate::resolve::ResolvedArgument;
use crate::types::{Operator, Qualifier};

/// Bespoke explanation for one field, replacing the per-kind default
pub type ExplainFn = fn(&ResolvedArgument<'_>, &dyn Localizer) -> Option<String>;

/// Alternate sub-target of a field, e.g. printed vs. unified rules text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    /// Short token users may type instead of the name
    pub alias: String,
    /// Storage key searched when the modifier is used
    pub key: String,
}

impl Modifier {
    pub fn matches(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token) || self.alias.eq_ignore_ascii_case(token)
    }
}

/// Immutable description of one searchable field. Built once with
/// [`CommandBuilder`](super::CommandBuilder) and owned by a model.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub(super) id: String,
    pub(super) key: String,
    pub(super) aliases: Vec<String>,
    pub(super) operators: Vec<Operator>,
    pub(super) qualifiers: Vec<Qualifier>,
    /// Operators the `!` qualifier may be combined with, `None` for all
    pub(super) negatable: Option<Vec<Operator>>,
    pub(super) allow_regex: bool,
    pub(super) modifiers: Vec<Modifier>,
    pub(super) kind: CommandKind,
    pub(super) explain: Option<ExplainFn>,
}

impl CommandSpec {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Storage key (document field / JSON path) the command targets
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Id followed by aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    pub fn allow_regex(&self) -> bool {
        self.allow_regex
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn modifier(&self, token: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.matches(token))
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn pattern(&self) -> Option<&[String]> {
        match &self.kind {
            CommandKind::Pattern(options) => Some(&options.templates),
            _ => None,
        }
    }

    pub fn explain_fn(&self) -> Option<ExplainFn> {
        self.explain
    }

    pub fn supports(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    pub fn allows_qualifier(&self, qualifier: Qualifier, operator: Operator) -> bool {
        if !self.qualifiers.contains(&qualifier) {
            return false;
        }
        match (&self.negatable, qualifier) {
            (Some(operators), Qualifier::Not) => operators.contains(&operator),
            (None, _) => true,
        }
    }
}
