//! Entry point: parse CLI, load the league and print JSON results.

use anyhow::Context;
use clap::Parser;
use serde_json::{json, Value};
use sleeper_ffl::{
    cli::{Commands, LoadArgs, Sleeper},
    tools, SleeperClient, SleeperConfig, SleeperLeagueData,
};
use tracing_subscriber::EnvFilter;

async fn load(args: LoadArgs) -> anyhow::Result<SleeperLeagueData<SleeperClient>> {
    let config = SleeperConfig::resolve(args.league_id, args.week)?;
    let client = SleeperClient::new(config.league_id.clone(), args.refresh)?;
    let mut data = SleeperLeagueData::new(config, client);
    data.load().await?;
    Ok(data)
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = Sleeper::parse();

    match app.command {
        Commands::Load { load: args, export } => {
            let data = load(args).await?;
            let db = data.database()?;
            let mut counts = serde_json::Map::new();
            for table in sleeper_ffl::storage::schema::TABLES {
                counts.insert(table.name.to_string(), json!(db.row_count(table.name)?));
            }
            let mut summary = json!({
                "league_id": data.config().league_id,
                "effective_week": data.effective_week()?,
                "row_counts": counts,
            });
            if let Some(path) = export {
                let path = data.export(&path)?;
                summary["exported_to"] = json!(path.display().to_string());
            }
            print_json(&summary)?;
        }

        Commands::Query {
            load: args,
            tool,
            args: raw_args,
        } => {
            let tool_args: Value = match raw_args {
                Some(raw) => serde_json::from_str(&raw).context("--args must be a JSON object")?,
                None => Value::Null,
            };
            let data = load(args).await?;
            print_json(&tools::dispatch(&data, &tool, &tool_args)?)?;
        }

        Commands::Sql {
            load: args,
            query,
            limit,
        } => {
            let data = load(args).await?;
            print_json(&data.run_sql(&query, &[], limit)?)?;
        }

        Commands::Tools => print_json(&json!(tools::tool_schemas()))?,
    }

    Ok(())
}
