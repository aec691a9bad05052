use crate::command::{CommandKind, CommandSpec};
use crate::errors::ModelError;
use std::collections::HashMap;

/// The complete set of commands for one game. Immutable once built.
#[derive(Debug, Clone)]
pub struct Model {
    id: String,
    commands: Vec<CommandSpec>,
    // lowercase id/alias -> index into commands
    names: HashMap<String, usize>,
    raw: usize,
}

impl Model {
    pub fn builder(id: &str) -> ModelBuilder {
        ModelBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Looks a command up by id or alias, case-insensitively
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.names
            .get(&name.to_lowercase())
            .map(|&index| &self.commands[index])
    }

    /// Exact id lookup, used for pattern parts
    pub fn command(&self, id: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.id() == id)
    }

    /// Command used for tokens without a field name
    pub fn raw_command(&self) -> &CommandSpec {
        &self.commands[self.raw]
    }
}

pub struct ModelBuilder {
    id: String,
    commands: Vec<CommandSpec>,
    names: HashMap<String, usize>,
    raw: Option<String>,
}

impl ModelBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            commands: Vec::new(),
            names: HashMap::new(),
            raw: None,
        }
    }

    /// Id of the command raw tokens resolve to
    pub fn raw(mut self, command_id: &str) -> Self {
        self.raw = Some(command_id.to_string());
        self
    }

    /// Registers a command. Fails if its id or any alias is already taken.
    pub fn command(mut self, spec: CommandSpec) -> Result<Self, ModelError> {
        let index = self.commands.len();
        let mut incoming: Vec<String> = Vec::new();
        for name in spec.names() {
            let lowered = name.to_lowercase();
            let existing = match self.names.get(&lowered) {
                Some(&other) => Some(self.commands[other].id().to_string()),
                None if incoming.contains(&lowered) => Some(spec.id().to_string()),
                None => None,
            };
            if let Some(existing) = existing {
                return Err(ModelError::DuplicateName {
                    model: self.id.clone(),
                    name: name.to_string(),
                    existing,
                });
            }
            incoming.push(lowered);
        }

        for name in incoming {
            self.names.insert(name, index);
        }
        self.commands.push(spec);
        Ok(self)
    }

    pub fn build(self) -> Result<Model, ModelError> {
        let raw_id = self
            .raw
            .clone()
            .ok_or_else(|| ModelError::MissingRawCommand(String::new()))?;
        let raw = self
            .commands
            .iter()
            .position(|c| c.id() == raw_id)
            .ok_or(ModelError::MissingRawCommand(raw_id))?;

        for spec in &self.commands {
            if let CommandKind::Pattern(options) = spec.kind() {
                for part in &options.parts {
                    let known = self
                        .commands
                        .iter()
                        .any(|c| c.id() == part && !matches!(c.kind(), CommandKind::Pattern(_)));
                    if !known {
                        return Err(ModelError::UnknownPatternPart {
                            command: spec.id().to_string(),
                            part: part.clone(),
                        });
                    }
                }
            }
        }

        Ok(Model {
            id: self.id,
            commands: self.commands,
            names: self.names,
            raw,
        })
    }
}

/// All models, addressed by id. Built at startup and shared read-only.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Model>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: Model) -> Result<(), ModelError> {
        if self.models.contains_key(model.id()) {
            return Err(ModelError::DuplicateModel(model.id().to_string()));
        }
        self.models.insert(model.id().to_string(), model);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Model> {
        self.models.get(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandBuilder;

    fn text(id: &str, aliases: &[&str]) -> CommandSpec {
        CommandBuilder::text(id).aliases(aliases).build().unwrap()
    }

    #[test]
    fn test_lookup_by_id_and_alias() {
        let model = Model::builder("magic")
            .raw("name")
            .command(text("name", &["n"]))
            .unwrap()
            .command(text("type", &["t"]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(model.get("type").unwrap().id(), "type");
        assert_eq!(model.get("t").unwrap().id(), "type");
        assert_eq!(model.get("T").unwrap().id(), "type");
        assert!(model.get("foo").is_none());
        assert_eq!(model.raw_command().id(), "name");
    }

    #[test]
    fn test_alias_collision_fails_at_registration() {
        let err = Model::builder("magic")
            .command(text("type", &["t"]))
            .unwrap()
            .command(text("toughness", &["t"]))
            .err()
            .unwrap();
        assert_eq!(
            err,
            ModelError::DuplicateName {
                model: "magic".to_string(),
                name: "t".to_string(),
                existing: "type".to_string(),
            }
        );
    }

    #[test]
    fn test_alias_colliding_with_id_fails() {
        let result = Model::builder("magic")
            .command(text("t", &[]))
            .unwrap()
            .command(text("type", &["T"]));
        assert!(matches!(result, Err(ModelError::DuplicateName { .. })));
    }

    #[test]
    fn test_alias_repeating_own_id_fails() {
        let result = Model::builder("magic").command(text("name", &["name"]));
        assert!(matches!(result, Err(ModelError::DuplicateName { .. })));
    }

    #[test]
    fn test_missing_raw_command() {
        let result = Model::builder("magic")
            .raw("raw")
            .command(text("name", &[]))
            .unwrap()
            .build();
        assert_eq!(
            result.err(),
            Some(ModelError::MissingRawCommand("raw".to_string()))
        );
    }

    #[test]
    fn test_pattern_parts_must_exist() {
        let pt = CommandBuilder::pattern("pt", &["{{power}}/{{toughness}}"])
            .build()
            .unwrap();
        let result = Model::builder("magic")
            .raw("name")
            .command(text("name", &[]))
            .unwrap()
            .command(CommandBuilder::half_number("power").build().unwrap())
            .unwrap()
            .command(pt)
            .unwrap()
            .build();
        assert_eq!(
            result.err(),
            Some(ModelError::UnknownPatternPart {
                command: "pt".to_string(),
                part: "toughness".to_string(),
            })
        );
    }

    #[test]
    fn test_registry_rejects_duplicate_models() {
        let build = || {
            Model::builder("magic")
                .raw("name")
                .command(text("name", &[]))
                .unwrap()
                .build()
                .unwrap()
        };
        let mut registry = ModelRegistry::new();
        registry.register(build()).unwrap();
        assert_eq!(
            registry.register(build()),
            Err(ModelError::DuplicateModel("magic".to_string()))
        );
        assert_eq!(registry.ids(), vec!["magic"]);
        assert!(registry.get("hearthstone").is_none());
    }
}
