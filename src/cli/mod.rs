//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{LeagueId, Week};

/// Arguments shared by every command that loads the league
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// League ID (or set `SLEEPER_LEAGUE_ID` env var).
    #[clap(long, short)]
    pub league_id: Option<LeagueId>,

    /// Week queries default to (or set `SLEEPER_WEEK_OVERRIDE`); defaults to the current NFL week.
    #[clap(long, short)]
    pub week: Option<Week>,

    /// Force refresh from the Sleeper API, overwriting the cache.
    #[clap(long)]
    pub refresh: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load the league and print a summary of what was stored.
    Load {
        #[clap(flatten)]
        load: LoadArgs,

        /// Also write the loaded database to this SQLite file.
        #[clap(long)]
        export: Option<PathBuf>,
    },

    /// Load the league and run one query tool.
    ///
    /// Run `sleeper-ffl tools` to list tool names and their arguments.
    Query {
        #[clap(flatten)]
        load: LoadArgs,

        /// Tool name, e.g. `get_standings`.
        tool: String,

        /// Tool arguments as a JSON object, e.g. '{"roster_key": "Team Taco"}'.
        #[clap(long)]
        args: Option<String>,
    },

    /// Load the league and run a read-only SELECT.
    Sql {
        #[clap(flatten)]
        load: LoadArgs,

        /// The SELECT statement.
        query: String,

        /// Maximum rows to return.
        #[clap(long)]
        limit: Option<u32>,
    },

    /// Print every tool schema in function-calling format.
    Tools,
}

#[derive(Debug, Parser)]
#[clap(name = "sleeper-ffl", about = "Sleeper fantasy football league data CLI")]
pub struct Sleeper {
    #[clap(subcommand)]
    pub command: Commands,
}
