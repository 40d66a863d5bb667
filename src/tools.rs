//! Function-calling tool definitions for the league queries
//!
//! [`TOOLS`] is the single hand-maintained table of every query exposed to
//! an agent. [`tool_schemas`] renders it in the OpenAI function-calling
//! format and [`dispatch`] validates a call against it before invoking the
//! matching [`SleeperLeagueData`] method.

use crate::{
    error::{Result, SleeperError},
    storage::BracketType,
    SleeperLeagueData, Week,
};
use serde_json::{json, Map, Value};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    String,
    Array,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Integer => "integer",
            ParamType::String => "string",
            ParamType::Array => "array",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::Integer => value.is_u64(),
            ParamType::String => value.is_string(),
            ParamType::Array => value.is_array(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToolParam {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ToolParam],
}

const fn param(
    name: &'static str,
    kind: ParamType,
    description: &'static str,
    required: bool,
) -> ToolParam {
    ToolParam {
        name,
        kind,
        description,
        required,
    }
}

const ROSTER_KEY: ToolParam = param(
    "roster_key",
    ParamType::String,
    "Team identifier: team name, manager name, or roster_id as a string.",
    true,
);
const PLAYER_KEY: ToolParam = param(
    "player_key",
    ParamType::String,
    "Player name (e.g. 'Patrick Mahomes') or player_id.",
    true,
);
const WEEK: ToolParam = param(
    "week",
    ParamType::Integer,
    "Week number (1-18). Omit for the current week.",
    false,
);
const WEEK_FROM: ToolParam = param(
    "week_from",
    ParamType::Integer,
    "Starting week (inclusive).",
    false,
);
const WEEK_TO: ToolParam = param(
    "week_to",
    ParamType::Integer,
    "Ending week (inclusive). Omit for the current week.",
    false,
);

pub static TOOLS: &[Tool] = &[
    Tool {
        name: "get_league_snapshot",
        description: "Get a snapshot of the league for one week: standings, every game result and \
            that week's transactions. Use this for a high-level view of league state.",
        params: &[WEEK],
    },
    Tool {
        name: "get_standings",
        description: "Get the standings table as of a week: record, points for and against, rank \
            and current streak for every team.",
        params: &[WEEK],
    },
    Tool {
        name: "get_week_games",
        description: "Get every head-to-head game of a week with scores and winners.",
        params: &[WEEK],
    },
    Tool {
        name: "get_week_games_with_players",
        description: "Get every game of a week with a player-by-player breakdown of both lineups. \
            Use this to analyze individual contributions.",
        params: &[WEEK],
    },
    Tool {
        name: "get_team_game",
        description: "Get one team's game for a week: opponent, scores and winner.",
        params: &[ROSTER_KEY, WEEK],
    },
    Tool {
        name: "get_team_game_with_players",
        description: "Get one team's game for a week with both lineups broken down by player.",
        params: &[ROSTER_KEY, WEEK],
    },
    Tool {
        name: "get_week_player_leaderboard",
        description: "Get the top-scoring players of a week across all fantasy teams, ranked by \
            points. Use this to find standout performances.",
        params: &[
            WEEK,
            param(
                "limit",
                ParamType::Integer,
                "Maximum players to return. Default is 10.",
                false,
            ),
        ],
    },
    Tool {
        name: "get_bench_analysis",
        description: "Get points left on the bench in a week. Without a team, lists every team by \
            bench points; with a team, lists that team's bench players.",
        params: &[
            param(
                "roster_key",
                ParamType::String,
                "Optional team identifier: team name, manager name, or roster_id as a string.",
                false,
            ),
            WEEK,
        ],
    },
    Tool {
        name: "get_team_dossier",
        description: "Get a team profile: standings, record, streak and the last 5 games. Use \
            this to understand a team's situation and recent trajectory.",
        params: &[ROSTER_KEY, WEEK],
    },
    Tool {
        name: "get_team_schedule",
        description: "Get a team's full season schedule with opponent, scores, result (W/L/T) and \
            the record after each regular-season week.",
        params: &[ROSTER_KEY],
    },
    Tool {
        name: "get_roster_current",
        description: "Get a team's current roster organized by role and position, plus the draft \
            picks it owns.",
        params: &[ROSTER_KEY],
    },
    Tool {
        name: "get_roster_snapshot",
        description: "Get a team's roster as it was in a given week, with each player's points. \
            Use this for historical lineup analysis.",
        params: &[
            ROSTER_KEY,
            param("week", ParamType::Integer, "Week number (1-18) to query.", true),
        ],
    },
    Tool {
        name: "get_player_summary",
        description: "Get basic metadata about an NFL player: position, NFL team, status and \
            injury information.",
        params: &[PLAYER_KEY],
    },
    Tool {
        name: "get_player_weekly_log",
        description: "Get a player's week-by-week fantasy points, role and fantasy team, with \
            totals and averages. Optionally bounded to a week range.",
        params: &[PLAYER_KEY, WEEK_FROM, WEEK_TO],
    },
    Tool {
        name: "get_transactions",
        description: "Get all trades, waiver claims and free-agent moves in a week range, grouped \
            by transaction with what each team sent and received.",
        params: &[WEEK_FROM, WEEK_TO],
    },
    Tool {
        name: "get_week_transactions",
        description: "Get all transactions of a single week, grouped by transaction.",
        params: &[WEEK],
    },
    Tool {
        name: "get_team_transactions",
        description: "Get one team's transactions in a week range.",
        params: &[ROSTER_KEY, WEEK_FROM, WEEK_TO],
    },
    Tool {
        name: "get_playoff_bracket",
        description: "Get the playoff bracket by round, with results, placements and the champion \
            once decided.",
        params: &[param(
            "bracket_type",
            ParamType::String,
            "'winners' or 'losers'. Omit for both.",
            false,
        )],
    },
    Tool {
        name: "get_team_playoff_path",
        description: "Get a team's route through the playoffs: each round's opponent and result, \
            final placement and elimination status.",
        params: &[ROSTER_KEY],
    },
    Tool {
        name: "resolve_player",
        description: "Resolve a player name or id to a player. Returns the candidates when a name \
            is ambiguous.",
        params: &[PLAYER_KEY],
    },
    Tool {
        name: "resolve_roster",
        description: "Resolve a team name, manager name or roster id to a team. Returns the \
            candidates when a name is ambiguous.",
        params: &[ROSTER_KEY],
    },
    Tool {
        name: "run_sql",
        description: "Execute a custom read-only SELECT for analysis the other tools do not \
            cover. Write statements are rejected.",
        params: &[
            param(
                "query",
                ParamType::String,
                "A single SELECT statement. Tables: leagues, season_context, users, \
                    team_profiles, rosters, roster_players, players, matchups, \
                    player_performances, games, standings, transactions, transaction_moves, \
                    draft_picks, playoff_matchups.",
                true,
            ),
            param(
                "params",
                ParamType::Array,
                "Positional values bound to ?1, ?2, ... in the query.",
                false,
            ),
            param(
                "limit",
                ParamType::Integer,
                "Maximum rows to return. Default is 200.",
                false,
            ),
        ],
    },
];

/// Look up a tool by name.
pub fn tool(name: &str) -> Option<&'static Tool> {
    TOOLS.iter().find(|t| t.name == name)
}

impl Tool {
    /// The tool in OpenAI function-calling format.
    pub fn schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                let mut prop = json!({ "type": p.kind.as_str(), "description": p.description });
                if p.kind == ParamType::Array {
                    prop["items"] = json!({});
                }
                (p.name.to_string(), prop)
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }

    /// Check `args` against the parameter table.
    fn validate<'a>(&self, args: &'a Value) -> Result<Args<'a>> {
        let invalid = |message: String| SleeperError::InvalidToolArguments {
            tool: self.name.to_string(),
            message,
        };

        let fields = match args {
            Value::Null => None,
            Value::Object(fields) => Some(fields),
            other => {
                return Err(invalid(format!(
                    "arguments must be an object, got {}",
                    other
                )))
            }
        };

        if let Some(fields) = fields {
            for (key, value) in fields {
                let Some(spec) = self.params.iter().find(|p| p.name == key.as_str()) else {
                    return Err(invalid(format!("unexpected argument `{}`", key)));
                };
                if !value.is_null() && !spec.kind.accepts(value) {
                    return Err(invalid(format!(
                        "`{}` must be a non-negative {}",
                        key,
                        spec.kind.as_str()
                    )));
                }
            }
        }
        for spec in self.params.iter().filter(|p| p.required) {
            let present = fields
                .and_then(|f| f.get(spec.name))
                .is_some_and(|v| !v.is_null());
            if !present {
                return Err(invalid(format!("missing required argument `{}`", spec.name)));
            }
        }

        Ok(Args {
            tool: self.name,
            fields,
        })
    }
}

/// Every tool in OpenAI function-calling format.
pub fn tool_schemas() -> Vec<Value> {
    TOOLS.iter().map(Tool::schema).collect()
}

/// Validated arguments of one call.
struct Args<'a> {
    tool: &'static str,
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Args<'a> {
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.fields.and_then(|f| f.get(name)).filter(|v| !v.is_null())
    }

    fn invalid(&self, message: String) -> SleeperError {
        SleeperError::InvalidToolArguments {
            tool: self.tool.to_string(),
            message,
        }
    }

    fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Required string; presence is checked by validation.
    fn key(&self, name: &str) -> Result<&'a str> {
        self.str(name)
            .ok_or_else(|| self.invalid(format!("missing required argument `{}`", name)))
    }

    fn u32(&self, name: &str) -> Result<Option<u32>> {
        self.get(name)
            .and_then(Value::as_u64)
            .map(|n| {
                u32::try_from(n).map_err(|_| self.invalid(format!("`{}` is out of range", name)))
            })
            .transpose()
    }

    fn week(&self, name: &str) -> Result<Option<Week>> {
        self.get(name)
            .and_then(Value::as_u64)
            .map(|n| {
                u16::try_from(n)
                    .map(Week::new)
                    .map_err(|_| self.invalid(format!("`{}` is not a valid week", name)))
            })
            .transpose()
    }

    fn bracket_type(&self, name: &str) -> Result<Option<BracketType>> {
        self.str(name)
            .map(|s| s.parse::<BracketType>().map_err(|e| self.invalid(e)))
            .transpose()
    }

    fn values(&self, name: &str) -> &'a [Value] {
        self.get(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Validate a tool call and run it against `data`.
pub fn dispatch<S>(data: &SleeperLeagueData<S>, name: &str, args: &Value) -> Result<Value> {
    let tool = tool(name).ok_or_else(|| SleeperError::UnknownTool {
        name: name.to_string(),
    })?;
    let args = tool.validate(args)?;

    let result = match tool.name {
        "get_league_snapshot" => data.get_league_snapshot(args.week("week")?)?,
        "get_standings" => data.get_standings(args.week("week")?)?,
        "get_week_games" => json!(data.get_week_games(args.week("week")?)?),
        "get_week_games_with_players" => {
            json!(data.get_week_games_with_players(args.week("week")?)?)
        }
        "get_team_game" => data.get_team_game(args.key("roster_key")?, args.week("week")?)?,
        "get_team_game_with_players" => {
            data.get_team_game_with_players(args.key("roster_key")?, args.week("week")?)?
        }
        "get_week_player_leaderboard" => json!(
            data.get_week_player_leaderboard(args.week("week")?, args.u32("limit")?)?
        ),
        "get_bench_analysis" => {
            data.get_bench_analysis(args.str("roster_key"), args.week("week")?)?
        }
        "get_team_dossier" => data.get_team_dossier(args.key("roster_key")?, args.week("week")?)?,
        "get_team_schedule" => data.get_team_schedule(args.key("roster_key")?)?,
        "get_roster_current" => data.get_roster_current(args.key("roster_key")?)?,
        "get_roster_snapshot" => {
            data.get_roster_snapshot(args.key("roster_key")?, args.week("week")?)?
        }
        "get_player_summary" => data.get_player_summary(args.key("player_key")?)?,
        "get_player_weekly_log" => data.get_player_weekly_log(
            args.key("player_key")?,
            args.week("week_from")?,
            args.week("week_to")?,
        )?,
        "get_transactions" => json!(
            data.get_transactions(args.week("week_from")?, args.week("week_to")?)?
        ),
        "get_week_transactions" => json!(data.get_week_transactions(args.week("week")?)?),
        "get_team_transactions" => data.get_team_transactions(
            args.key("roster_key")?,
            args.week("week_from")?,
            args.week("week_to")?,
        )?,
        "get_playoff_bracket" => data.get_playoff_bracket(args.bracket_type("bracket_type")?)?,
        "get_team_playoff_path" => data.get_team_playoff_path(args.key("roster_key")?)?,
        "resolve_player" => {
            let key = args.key("player_key")?;
            data.resolve_player(key)?.to_json("player_key", key)
        }
        "resolve_roster" => {
            let key = args.key("roster_key")?;
            data.resolve_roster(key)?.to_json("roster_key", key)
        }
        "run_sql" => data.run_sql(
            args.key("query")?,
            args.values("params"),
            args.u32("limit")?,
        )?,
        other => {
            return Err(SleeperError::UnknownTool {
                name: other.to_string(),
            })
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LeagueId, SleeperConfig};
    use std::collections::HashSet;

    fn unloaded() -> SleeperLeagueData<()> {
        SleeperLeagueData::new(SleeperConfig::new(LeagueId::new("L1"), None), ())
    }

    #[test]
    fn test_tool_names_unique() {
        let names: HashSet<_> = TOOLS.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), TOOLS.len());
    }

    #[test]
    fn test_schema_format() {
        let schema = tool("get_team_game").unwrap().schema();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "get_team_game");
        assert_eq!(
            schema["function"]["parameters"]["properties"]["week"]["type"],
            "integer"
        );
        assert_eq!(schema["function"]["parameters"]["required"], json!(["roster_key"]));

        let sql = tool("run_sql").unwrap().schema();
        assert_eq!(
            sql["function"]["parameters"]["properties"]["params"]["type"],
            "array"
        );
        assert_eq!(tool_schemas().len(), TOOLS.len());
    }

    #[test]
    fn test_unknown_tool() {
        let err = dispatch(&unloaded(), "get_weather", &json!({})).unwrap_err();
        assert!(matches!(err, SleeperError::UnknownTool { name } if name == "get_weather"));
    }

    #[test]
    fn test_argument_validation() {
        let data = unloaded();

        let err = dispatch(&data, "get_team_game", &json!({ "week": 3 })).unwrap_err();
        assert!(matches!(
            &err,
            SleeperError::InvalidToolArguments { message, .. } if message.contains("roster_key")
        ));

        let err = dispatch(&data, "get_standings", &json!({ "week": "three" })).unwrap_err();
        assert!(matches!(err, SleeperError::InvalidToolArguments { .. }));

        let err = dispatch(&data, "get_standings", &json!({ "wek": 3 })).unwrap_err();
        assert!(matches!(
            &err,
            SleeperError::InvalidToolArguments { message, .. } if message.contains("wek")
        ));

        let err = dispatch(&data, "get_standings", &json!({ "week": 70000 })).unwrap_err();
        assert!(matches!(err, SleeperError::InvalidToolArguments { .. }));

        let err = dispatch(&data, "get_playoff_bracket", &json!({ "bracket_type": "consolation" }))
            .unwrap_err();
        assert!(matches!(err, SleeperError::InvalidToolArguments { .. }));

        let err = dispatch(&data, "get_standings", &json!([3])).unwrap_err();
        assert!(matches!(err, SleeperError::InvalidToolArguments { .. }));
    }

    #[test]
    fn test_valid_call_before_load() {
        let data = unloaded();
        let err = dispatch(&data, "get_standings", &Value::Null).unwrap_err();
        assert!(matches!(err, SleeperError::NotLoaded));

        let err = dispatch(&data, "resolve_player", &json!({ "player_key": "Josh Allen" }))
            .unwrap_err();
        assert!(matches!(err, SleeperError::NotLoaded));
    }
}
