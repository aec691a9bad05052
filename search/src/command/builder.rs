use super::kind::{
    BitsetOptions, CommandKind, HalfNumberOptions, NumberOptions, OrderOptions, PatternOptions,
    SetOptions, UnrestrictedOptions, MAX_BITSET_LETTERS,
};
use super::spec::{CommandSpec, ExplainFn, Modifier};
use crate::errors::ModelError;
use crate::types::{Operator, Qualifier};

const ALL_OPERATORS: &[Operator] = &Operator::ALL;
const MATCH_OPERATORS: &[Operator] = &[Operator::Match, Operator::Eq];
const NUMBER_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Lt,
    Operator::Lte,
    Operator::Gt,
    Operator::Gte,
];

/// Fluent constructor for [`CommandSpec`] with per-kind defaults.
///
/// ```
/// use tcg_search::command::CommandBuilder;
///
/// let color = CommandBuilder::bitset("color", "WUBRG")
///     .alias("c")
///     .word("azorius", "WU")
///     .build()
///     .unwrap();
/// assert_eq!(color.id(), "color");
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    id: String,
    key: Option<String>,
    aliases: Vec<String>,
    operators: Vec<Operator>,
    qualifiers: Vec<Qualifier>,
    negatable: Option<Vec<Operator>>,
    allow_regex: bool,
    modifiers: Vec<Modifier>,
    kind: CommandKind,
    explain: Option<ExplainFn>,
    pattern_error: Option<String>,
}

impl CommandBuilder {
    fn with_kind(id: &str, kind: CommandKind, operators: &[Operator], allow_regex: bool) -> Self {
        Self {
            id: id.to_string(),
            key: None,
            aliases: Vec::new(),
            operators: operators.to_vec(),
            qualifiers: vec![Qualifier::Not],
            negatable: None,
            allow_regex,
            modifiers: Vec::new(),
            kind,
            explain: None,
            pattern_error: None,
        }
    }

    /// `:` contains, `=` equals, regex allowed
    pub fn text(id: &str) -> Self {
        Self::with_kind(id, CommandKind::Text, MATCH_OPERATORS, true)
    }

    /// Integer comparisons; `!` only combines with `=`
    pub fn number(id: &str) -> Self {
        let mut builder = Self::with_kind(
            id,
            CommandKind::Number(NumberOptions::default()),
            NUMBER_OPERATORS,
            false,
        );
        builder.negatable = Some(vec![Operator::Eq]);
        builder
    }

    /// Membership in a stored list of values
    pub fn set(id: &str) -> Self {
        Self::with_kind(
            id,
            CommandKind::Set(SetOptions::default()),
            MATCH_OPERATORS,
            false,
        )
    }

    pub fn bitset(id: &str, alphabet: &str) -> Self {
        Self::with_kind(
            id,
            CommandKind::Bitset(BitsetOptions::new(alphabet)),
            ALL_OPERATORS,
            false,
        )
    }

    pub fn half_number(id: &str) -> Self {
        Self::with_kind(
            id,
            CommandKind::HalfNumber(HalfNumberOptions::default()),
            ALL_OPERATORS,
            false,
        )
    }

    /// Composite field; every `{{name}}` placeholder names another command
    pub fn pattern(id: &str, templates: &[&str]) -> Self {
        let (kind, pattern_error) = match PatternOptions::new(templates) {
            Ok(options) => (CommandKind::Pattern(options), None),
            Err(reason) => (CommandKind::Text, Some(reason)),
        };
        let mut builder = Self::with_kind(id, kind, ALL_OPERATORS, false);
        builder.pattern_error = pattern_error;
        builder
    }

    /// Accepts every operator and regex, searching all `targets`
    pub fn unrestricted(id: &str, targets: &[&str]) -> Self {
        Self::with_kind(
            id,
            CommandKind::Unrestricted(UnrestrictedOptions {
                targets: targets.iter().map(|t| t.to_string()).collect(),
            }),
            ALL_OPERATORS,
            true,
        )
    }

    /// Sort directive, `order:name+` / `order:price-`
    pub fn order(id: &str) -> Self {
        let mut builder = Self::with_kind(
            id,
            CommandKind::Order(OrderOptions::default()),
            MATCH_OPERATORS,
            false,
        );
        builder.qualifiers.clear();
        builder
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    /// Storage key, defaults to the id
    pub fn key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn modifier(mut self, name: &str, alias: &str, key: &str) -> Self {
        self.modifiers.push(Modifier {
            name: name.to_string(),
            alias: alias.to_string(),
            key: key.to_string(),
        });
        self
    }

    pub fn operators(mut self, operators: &[Operator]) -> Self {
        self.operators = operators.to_vec();
        self
    }

    pub fn regex(mut self, allow: bool) -> Self {
        self.allow_regex = allow;
        self
    }

    pub fn explain_with(mut self, explain: ExplainFn) -> Self {
        self.explain = Some(explain);
        self
    }

    pub fn allow_float(mut self) -> Self {
        if let CommandKind::Number(options) = &mut self.kind {
            options.allow_float = true;
        }
        self
    }

    pub fn value_map<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        if let CommandKind::Set(options) = &mut self.kind {
            for (short, canonical) in entries {
                options
                    .value_map
                    .insert(short.as_ref().to_lowercase(), canonical.into());
            }
        }
        self
    }

    pub fn count_duplicates(mut self) -> Self {
        if let CommandKind::Set(options) = &mut self.kind {
            options.count_duplicates = true;
        }
        self
    }

    /// Restricts a set to a closed vocabulary
    pub fn values(mut self, values: &[&str]) -> Self {
        if let CommandKind::Set(options) = &mut self.kind {
            options.values = Some(values.iter().map(|v| v.to_string()).collect());
        }
        self
    }

    pub fn word(mut self, word: &str, letters: &str) -> Self {
        if let CommandKind::Bitset(options) = &mut self.kind {
            options
                .words
                .insert(word.to_lowercase(), letters.to_string());
        }
        self
    }

    pub fn words<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        if let CommandKind::Bitset(options) = &mut self.kind {
            for (word, letters) in entries {
                options
                    .words
                    .insert(word.as_ref().to_lowercase(), letters.into());
            }
        }
        self
    }

    /// Half-number ladder bounds, inclusive
    pub fn ladder(mut self, min: i32, max: i32) -> Self {
        if let CommandKind::HalfNumber(options) = &mut self.kind {
            let sentinels = std::mem::take(&mut options.sentinels);
            *options = HalfNumberOptions::new(min, max);
            options.sentinels = sentinels;
        }
        self
    }

    pub fn sentinel(mut self, value: &str) -> Self {
        if let CommandKind::HalfNumber(options) = &mut self.kind {
            options.sentinels.push(value.to_string());
        }
        self
    }

    pub fn sort_key(mut self, name: &str, key: &str) -> Self {
        if let CommandKind::Order(options) = &mut self.kind {
            options.keys.insert(name.to_lowercase(), key.to_string());
        }
        self
    }

    pub fn build(self) -> Result<CommandSpec, ModelError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        if let Some(reason) = self.pattern_error {
            return Err(ModelError::InvalidPattern {
                command: id,
                reason,
            });
        }

        if let CommandKind::Bitset(options) = &self.kind {
            if options.values.len() > MAX_BITSET_LETTERS {
                return Err(ModelError::BitsetTooWide {
                    command: id,
                    letters: options.values.len(),
                    max: MAX_BITSET_LETTERS,
                });
            }
        }

        let key = self.key.unwrap_or_else(|| id.clone());
        let mut keys: Vec<&str> = vec![key.as_str()];
        keys.extend(self.modifiers.iter().map(|m| m.key.as_str()));
        match &self.kind {
            CommandKind::Unrestricted(options) => {
                keys.extend(options.targets.iter().map(String::as_str))
            }
            CommandKind::Order(options) => keys.extend(options.keys.values().map(String::as_str)),
            _ => {}
        }
        if let Some(bad) = keys.into_iter().find(|k| !is_valid_key(k)) {
            return Err(ModelError::InvalidKey(bad.to_string()));
        }

        Ok(CommandSpec {
            id,
            key,
            aliases: self.aliases,
            operators: self.operators,
            qualifiers: self.qualifiers,
            negatable: self.negatable,
            allow_regex: self.allow_regex,
            modifiers: self.modifiers,
            kind: self.kind,
            explain: self.explain,
        })
    }
}

/// Keys end up inside SQL JSON paths, so only plain dotted identifiers pass
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}
