use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tcgs",
    about = "Search trading card collections with a free-text query language",
    version = "0.1.0",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// JSON file of cards per model, overriding the configured store
    #[arg(long, global = true)]
    pub cards: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a query against the store
    Search(SearchArgs),
    /// Explain a single command, e.g. `t:dragon`
    Explain(ExplainArgs),
    /// Print the store filters a query compiles to
    Compile(QueryArgs),
    /// List models, or the commands of one model
    Models(ModelsArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Model id, e.g. magic or hearthstone
    pub model: String,

    /// Query words, joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl QueryArgs {
    pub fn text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// Print the full response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    pub model: String,
    pub command: String,
}

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Show the commands of this model
    pub model: Option<String>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
