use crate::argparse::ModelsArgs;
use anyhow::{Context, Result};
use tcg_search::ModelRegistry;

pub fn handle_models_command(registry: &ModelRegistry, args: ModelsArgs) -> Result<()> {
    let Some(model_id) = args.model else {
        for id in registry.ids() {
            println!("{}", id);
        }
        return Ok(());
    };

    let model = registry
        .get(&model_id)
        .with_context(|| format!("Unknown model {}", model_id))?;
    for command in model.commands() {
        let operators: Vec<String> = command.operators().iter().map(|op| op.to_string()).collect();
        let raw = if command.id() == model.raw_command().id() {
            " (raw)"
        } else {
            ""
        };
        println!(
            "{:<12} {:<14} {:<18} {}{}",
            command.id(),
            command.kind().name(),
            command.aliases().join(","),
            operators.join(" "),
            raw
        );
    }
    Ok(())
}
