use super::Localizer;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

const ENGLISH: &str = include_str!("../../locales/en.toml");

/// Flat `section.key -> template` message catalog read from TOML.
///
/// Templates interpolate `{name}` placeholders from the call's parameters.
/// Unknown keys translate to themselves.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Built-in English messages
    pub fn english() -> Result<Self> {
        Self::parse(ENGLISH).context("Failed to parse built-in English catalog")
    }

    pub fn parse(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let mut messages = HashMap::new();
        flatten("", &table, &mut messages);
        Ok(Self { messages })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))
    }

    /// Overlays `other` on top of this catalog
    pub fn merge(mut self, other: Catalog) -> Self {
        self.messages.extend(other.messages);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(nested) => flatten(&path, nested, out),
            toml::Value::String(s) => {
                out.insert(path, s.clone());
            }
            other => {
                out.insert(path, other.to_string());
            }
        }
    }
}

impl Localizer for Catalog {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.get(key) else {
            return key.to_string();
        };
        interpolate(template, params)
    }
}

/// Replaces `{name}` placeholders in one pass; substituted values are never
/// rescanned and unknown placeholders stay as written
fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        message.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                message.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                message.push('{');
                rest = after;
            }
        }
    }
    message.push_str(rest);
    message
}
