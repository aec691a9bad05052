use crate::argparse::SearchArgs;
use anyhow::Result;
use serde_json::Value;
use tcg_search::{SearchEngine, SearchOptions};

pub async fn handle_search_command(engine: &SearchEngine, args: SearchArgs) -> Result<()> {
    let options = SearchOptions {
        page: args.page,
        page_size: args.page_size,
    };
    let response = engine
        .search(&args.query.model, &args.query.text(), &options)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    for command in &response.commands {
        match (&command.explanation, command.failed_at) {
            (_, Some(stage)) => println!("  {:<24} failed while {:?}", command.text, stage),
            (Some(explanation), None) => println!("  {:<24} {}", command.text, explanation),
            (None, None) => println!("  {}", command.text),
        }
    }
    for error in &response.errors {
        println!("error: {}", error);
    }

    if let Some(result) = &response.result {
        println!(
            "{} card(s) in {} ms, showing {}",
            result.total,
            result.elapsed_ms,
            result.rows.len()
        );
        for row in &result.rows {
            println!("{}", row.get("name").and_then(Value::as_str).unwrap_or("?"));
        }
    }
    Ok(())
}
