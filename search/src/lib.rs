//! Per-game card search: a declarative command registry, a free-text query
//! grammar, typed query compilation and localized explanations.
//!
//! ```
//! use tcg_search::games::builtin_registry;
//! use tcg_search::parser::parse_query;
//! use tcg_search::resolve::resolve;
//!
//! let registry = builtin_registry().unwrap();
//! let magic = registry.get("magic").unwrap();
//! let token = parse_query("t:dragon").remove(0).unwrap();
//! let arg = resolve(magic, &token).unwrap();
//! assert_eq!(arg.command.id(), "type");
//! ```

pub mod command;
pub mod compile;
pub mod config;
pub mod engine;
pub mod errors;
pub mod explain;
pub mod games;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolve;
pub mod store;
pub mod types;

pub use command::{CommandBuilder, CommandKind, CommandSpec};
pub use compile::{compile, Compiled, Predicate, SortKey};
pub use config::Config;
pub use engine::{QueryPlan, SearchEngine, SearchOptions, SearchResponse};
pub use errors::{ModelError, SearchError, SearchFailure};
pub use explain::{Catalog, Localizer};
pub use model::{Model, ModelRegistry};
pub use store::{CardStore, MemoryStore, PageRequest, PageResult, SqliteStore};
pub use types::{Operator, ParsedToken, Qualifier, TokenValue};
