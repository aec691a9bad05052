use crate::argparse::QueryArgs;
use anyhow::Result;
use tcg_search::config::{Config, StoreType};
use tcg_search::render::{DocumentTranslator, SqlTranslator};
use tcg_search::SearchEngine;

pub fn handle_compile_command(engine: &SearchEngine, config: &Config, args: QueryArgs) -> Result<()> {
    let plan = engine.plan(&args.model, &args.text())?;
    for error in &plan.errors {
        println!("error: {}", error);
    }

    let Some(predicate) = &plan.predicate else {
        println!("No predicates; the query returns nothing");
        return Ok(());
    };

    let data_column = match (config.store.store_type, config.store.get_sqlite()) {
        (StoreType::Sqlite, Some(sqlite)) => sqlite.data_column.as_str(),
        _ => "data",
    };
    let sql = SqlTranslator::new(data_column);
    let documents = DocumentTranslator;

    println!("SQL:      {}", sql.translate_inline(predicate));
    println!("Document: {}", serde_json::to_string(&documents.translate(predicate))?);
    if let Some(sort) = &plan.sort {
        println!("Sort:     {}", sql.order_by(sort));
        println!("          {}", serde_json::to_string(&documents.sort(sort))?);
    }
    Ok(())
}
