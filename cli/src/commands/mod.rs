mod compile;
mod models;
mod search;

use crate::argparse::{Cli, Commands};
use anyhow::{Context, Result};
use std::sync::Arc;
use tcg_search::games::builtin_registry;
use tcg_search::{CardStore, Config, MemoryStore, SearchEngine};
use tracing::info;

pub use compile::handle_compile_command;
pub use models::handle_models_command;
pub use search::handle_search_command;

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Search(args) => {
            let store = open_store(&config, cli.cards.as_deref()).await?;
            let engine = build_engine(&config, store)?;
            handle_search_command(&engine, args).await
        }
        Commands::Explain(args) => {
            let engine = build_engine(&config, Arc::new(MemoryStore::new()))?;
            match engine.explain(&args.model, &args.command)? {
                Some(explanation) => println!("{}", explanation),
                None => println!("(no explanation for {})", args.command),
            }
            Ok(())
        }
        Commands::Compile(args) => {
            let engine = build_engine(&config, Arc::new(MemoryStore::new()))?;
            handle_compile_command(&engine, &config, args)
        }
        Commands::Models(args) => {
            let registry = builtin_registry()?;
            handle_models_command(&registry, args)
        }
    }
}

async fn open_store(
    config: &Config,
    cards: Option<&std::path::Path>,
) -> Result<Arc<dyn CardStore>> {
    match cards {
        Some(path) => {
            info!("Loading cards from {}", path.display());
            Ok(Arc::new(MemoryStore::from_json_file(path)?))
        }
        None => config.store.open().await.context("Failed to open card store"),
    }
}

fn build_engine(config: &Config, store: Arc<dyn CardStore>) -> Result<SearchEngine> {
    let registry = builtin_registry().context("Failed to build game models")?;
    let catalog = config.locale.catalog()?;
    Ok(SearchEngine::new(
        Arc::new(registry),
        store,
        Arc::new(catalog),
        config.search.clone(),
    ))
}
