//! Built-in game models.

pub mod hearthstone;
pub mod magic;
mod vocabulary;

pub use vocabulary::{StaticVocabulary, Vocabulary};

use crate::errors::ModelError;
use crate::model::ModelRegistry;

/// Registry holding every built-in model, fed by the static vocabulary
pub fn builtin_registry() -> Result<ModelRegistry, ModelError> {
    registry_with(&StaticVocabulary::default())
}

pub fn registry_with(vocabulary: &dyn Vocabulary) -> Result<ModelRegistry, ModelError> {
    let mut registry = ModelRegistry::new();
    registry.register(magic::model(vocabulary)?)?;
    registry.register(hearthstone::model(vocabulary)?)?;
    Ok(registry)
}
