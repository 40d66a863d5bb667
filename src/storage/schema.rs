//! Declarative table registry for the league database
//!
//! Every table the loader writes is described once here; `CREATE TABLE`
//! statements, index statements and the insert column lists used by
//! [`bulk_insert`](super::LeagueDatabase::bulk_insert) are all rendered from
//! these definitions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub col_type: &'static str,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeySpec {
    pub columns: &'static [&'static str],
    pub ref_table: &'static str,
    pub ref_columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub unique: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKeySpec],
    pub indexes: &'static [IndexSpec],
}

const fn req(name: &'static str, col_type: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        col_type,
        nullable: false,
    }
}

const fn opt(name: &'static str, col_type: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        col_type,
        nullable: true,
    }
}

const fn index(name: &'static str, columns: &'static [&'static str]) -> IndexSpec {
    IndexSpec {
        name,
        columns,
        unique: false,
    }
}

impl ColumnSpec {
    fn sql(&self) -> String {
        if self.nullable {
            format!("{} {}", self.name, self.col_type)
        } else {
            format!("{} {} NOT NULL", self.name, self.col_type)
        }
    }
}

impl TableSpec {
    /// Render the `CREATE TABLE IF NOT EXISTS` statement for this table.
    pub fn create_table_sql(&self) -> String {
        let mut defs: Vec<String> = self.columns.iter().map(ColumnSpec::sql).collect();

        if !self.primary_key.is_empty() {
            defs.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        for fk in self.foreign_keys {
            defs.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                fk.columns.join(", "),
                fk.ref_table,
                fk.ref_columns.join(", ")
            ));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            defs.join(", ")
        )
    }

    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|idx| {
                format!(
                    "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
                    if idx.unique { "UNIQUE " } else { "" },
                    idx.name,
                    self.name,
                    idx.columns.join(", ")
                )
            })
            .collect()
    }

    /// Parameterised insert covering every column in declaration order.
    pub fn insert_sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name).collect();
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            names.join(", "),
            placeholders.join(", ")
        )
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

pub const LEAGUES: TableSpec = TableSpec {
    name: "leagues",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("name", "TEXT"),
        req("sport", "TEXT"),
        opt("scoring_settings_json", "TEXT"),
        opt("roster_positions_json", "TEXT"),
        opt("playoff_week_start", "INTEGER"),
        opt("playoff_teams", "INTEGER"),
        req("league_average_match", "INTEGER"),
        req("draft_rounds", "INTEGER"),
    ],
    primary_key: &["league_id"],
    foreign_keys: &[],
    indexes: &[],
};

pub const SEASON_CONTEXT: TableSpec = TableSpec {
    name: "season_context",
    columns: &[
        req("league_id", "TEXT"),
        req("computed_week", "INTEGER"),
        opt("override_week", "INTEGER"),
        req("effective_week", "INTEGER"),
        req("generated_at", "TEXT"),
    ],
    primary_key: &["league_id"],
    foreign_keys: &[ForeignKeySpec {
        columns: &["league_id"],
        ref_table: "leagues",
        ref_columns: &["league_id"],
    }],
    indexes: &[],
};

pub const USERS: TableSpec = TableSpec {
    name: "users",
    columns: &[
        req("user_id", "TEXT"),
        req("display_name", "TEXT"),
        opt("username", "TEXT"),
        opt("avatar", "TEXT"),
        opt("metadata_json", "TEXT"),
    ],
    primary_key: &["user_id"],
    foreign_keys: &[],
    indexes: &[],
};

pub const ROSTERS: TableSpec = TableSpec {
    name: "rosters",
    columns: &[
        req("league_id", "TEXT"),
        req("roster_id", "INTEGER"),
        opt("owner_user_id", "TEXT"),
        opt("settings_json", "TEXT"),
        opt("metadata_json", "TEXT"),
        opt("record_string", "TEXT"),
    ],
    primary_key: &["league_id", "roster_id"],
    foreign_keys: &[ForeignKeySpec {
        columns: &["league_id"],
        ref_table: "leagues",
        ref_columns: &["league_id"],
    }],
    indexes: &[index("idx_rosters_owner", &["owner_user_id"])],
};

pub const ROSTER_PLAYERS: TableSpec = TableSpec {
    name: "roster_players",
    columns: &[
        req("league_id", "TEXT"),
        req("roster_id", "INTEGER"),
        req("player_id", "TEXT"),
        req("role", "TEXT"),
    ],
    primary_key: &["league_id", "roster_id", "player_id"],
    foreign_keys: &[ForeignKeySpec {
        columns: &["league_id", "roster_id"],
        ref_table: "rosters",
        ref_columns: &["league_id", "roster_id"],
    }],
    indexes: &[
        index("idx_roster_players_league_roster", &["league_id", "roster_id"]),
        index("idx_roster_players_player", &["player_id"]),
    ],
};

pub const TEAM_PROFILES: TableSpec = TableSpec {
    name: "team_profiles",
    columns: &[
        req("league_id", "TEXT"),
        req("roster_id", "INTEGER"),
        opt("team_name", "TEXT"),
        opt("manager_name", "TEXT"),
        opt("avatar_url", "TEXT"),
    ],
    primary_key: &["league_id", "roster_id"],
    foreign_keys: &[ForeignKeySpec {
        columns: &["league_id", "roster_id"],
        ref_table: "rosters",
        ref_columns: &["league_id", "roster_id"],
    }],
    indexes: &[
        index("idx_team_profiles_team_name", &["team_name"]),
        index("idx_team_profiles_manager_name", &["manager_name"]),
    ],
};

pub const DRAFT_PICKS: TableSpec = TableSpec {
    name: "draft_picks",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("round", "INTEGER"),
        req("original_roster_id", "INTEGER"),
        req("current_roster_id", "INTEGER"),
        opt("pick_id", "TEXT"),
        opt("source", "TEXT"),
    ],
    primary_key: &["league_id", "season", "round", "original_roster_id"],
    foreign_keys: &[
        ForeignKeySpec {
            columns: &["league_id", "original_roster_id"],
            ref_table: "rosters",
            ref_columns: &["league_id", "roster_id"],
        },
        ForeignKeySpec {
            columns: &["league_id", "current_roster_id"],
            ref_table: "rosters",
            ref_columns: &["league_id", "roster_id"],
        },
    ],
    indexes: &[
        index("idx_draft_picks_current", &["league_id", "current_roster_id"]),
        index("idx_draft_picks_season_round", &["league_id", "season", "round"]),
    ],
};

pub const PLAYERS: TableSpec = TableSpec {
    name: "players",
    columns: &[
        req("player_id", "TEXT"),
        opt("full_name", "TEXT"),
        opt("position", "TEXT"),
        opt("nfl_team", "TEXT"),
        opt("status", "TEXT"),
        opt("injury_status", "TEXT"),
        opt("age", "INTEGER"),
        opt("years_exp", "INTEGER"),
        opt("metadata_json", "TEXT"),
    ],
    primary_key: &["player_id"],
    foreign_keys: &[],
    indexes: &[index("idx_players_full_name", &["full_name"])],
};

pub const MATCHUPS: TableSpec = TableSpec {
    name: "matchups",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("week", "INTEGER"),
        req("matchup_id", "INTEGER"),
        req("roster_id", "INTEGER"),
        req("points", "REAL"),
        opt("starters_json", "TEXT"),
        opt("players_json", "TEXT"),
        opt("players_points_json", "TEXT"),
    ],
    primary_key: &["league_id", "week", "matchup_id", "roster_id"],
    foreign_keys: &[ForeignKeySpec {
        columns: &["league_id", "roster_id"],
        ref_table: "rosters",
        ref_columns: &["league_id", "roster_id"],
    }],
    indexes: &[
        index("idx_matchups_league_season_week", &["league_id", "season", "week"]),
        index("idx_matchups_week_matchup", &["week", "matchup_id"]),
    ],
};

pub const PLAYER_PERFORMANCES: TableSpec = TableSpec {
    name: "player_performances",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("week", "INTEGER"),
        req("player_id", "TEXT"),
        req("roster_id", "INTEGER"),
        req("matchup_id", "INTEGER"),
        req("points", "REAL"),
        req("role", "TEXT"),
    ],
    primary_key: &["league_id", "season", "week", "player_id", "roster_id"],
    foreign_keys: &[],
    indexes: &[
        index("idx_player_perf_league_week", &["league_id", "week"]),
        index("idx_player_perf_player_week", &["player_id", "season", "week"]),
        index("idx_player_perf_roster_week", &["league_id", "roster_id", "week"]),
    ],
};

pub const GAMES: TableSpec = TableSpec {
    name: "games",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("week", "INTEGER"),
        req("matchup_id", "INTEGER"),
        req("roster_id_a", "INTEGER"),
        req("roster_id_b", "INTEGER"),
        req("points_a", "REAL"),
        req("points_b", "REAL"),
        opt("winner_roster_id", "INTEGER"),
        req("is_playoffs", "INTEGER"),
    ],
    primary_key: &["league_id", "week", "matchup_id"],
    foreign_keys: &[
        ForeignKeySpec {
            columns: &["league_id", "roster_id_a"],
            ref_table: "rosters",
            ref_columns: &["league_id", "roster_id"],
        },
        ForeignKeySpec {
            columns: &["league_id", "roster_id_b"],
            ref_table: "rosters",
            ref_columns: &["league_id", "roster_id"],
        },
    ],
    indexes: &[index(
        "idx_games_league_season_week",
        &["league_id", "season", "week"],
    )],
};

pub const STANDINGS: TableSpec = TableSpec {
    name: "standings",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("week", "INTEGER"),
        req("roster_id", "INTEGER"),
        req("wins", "INTEGER"),
        req("losses", "INTEGER"),
        req("ties", "INTEGER"),
        req("points_for", "REAL"),
        req("points_against", "REAL"),
        opt("rank", "INTEGER"),
        opt("streak_type", "TEXT"),
        opt("streak_len", "INTEGER"),
    ],
    primary_key: &["league_id", "week", "roster_id"],
    foreign_keys: &[ForeignKeySpec {
        columns: &["league_id", "roster_id"],
        ref_table: "rosters",
        ref_columns: &["league_id", "roster_id"],
    }],
    indexes: &[index("idx_standings_league_week", &["league_id", "week"])],
};

pub const TRANSACTIONS: TableSpec = TableSpec {
    name: "transactions",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("week", "INTEGER"),
        req("transaction_id", "TEXT"),
        req("type", "TEXT"),
        opt("status", "TEXT"),
        opt("created_ts", "INTEGER"),
        opt("settings_json", "TEXT"),
        opt("metadata_json", "TEXT"),
    ],
    primary_key: &["transaction_id"],
    foreign_keys: &[ForeignKeySpec {
        columns: &["league_id"],
        ref_table: "leagues",
        ref_columns: &["league_id"],
    }],
    indexes: &[index(
        "idx_transactions_league_season_week",
        &["league_id", "season", "week"],
    )],
};

pub const TRANSACTION_MOVES: TableSpec = TableSpec {
    name: "transaction_moves",
    columns: &[
        req("transaction_id", "TEXT"),
        opt("roster_id", "INTEGER"),
        opt("player_id", "TEXT"),
        req("asset_type", "TEXT"),
        req("direction", "TEXT"),
        opt("bid_amount", "INTEGER"),
        opt("from_roster_id", "INTEGER"),
        opt("to_roster_id", "INTEGER"),
        opt("pick_season", "TEXT"),
        opt("pick_round", "INTEGER"),
        opt("pick_original_roster_id", "INTEGER"),
        opt("pick_id", "TEXT"),
    ],
    primary_key: &[],
    foreign_keys: &[ForeignKeySpec {
        columns: &["transaction_id"],
        ref_table: "transactions",
        ref_columns: &["transaction_id"],
    }],
    indexes: &[
        index("idx_transaction_moves_tx", &["transaction_id"]),
        index("idx_transaction_moves_roster", &["roster_id"]),
    ],
};

pub const PLAYOFF_MATCHUPS: TableSpec = TableSpec {
    name: "playoff_matchups",
    columns: &[
        req("league_id", "TEXT"),
        req("season", "TEXT"),
        req("bracket_type", "TEXT"),
        req("round", "INTEGER"),
        req("matchup_id", "INTEGER"),
        opt("t1_roster_id", "INTEGER"),
        opt("t2_roster_id", "INTEGER"),
        opt("t1_from_matchup_id", "INTEGER"),
        opt("t1_from_outcome", "TEXT"),
        opt("t2_from_matchup_id", "INTEGER"),
        opt("t2_from_outcome", "TEXT"),
        opt("winner_roster_id", "INTEGER"),
        opt("loser_roster_id", "INTEGER"),
        opt("placement", "INTEGER"),
    ],
    primary_key: &["league_id", "season", "bracket_type", "matchup_id"],
    foreign_keys: &[],
    indexes: &[index(
        "idx_playoff_matchups_bracket_round",
        &["league_id", "season", "bracket_type", "round"],
    )],
};

/// All tables in creation order (parents before children).
pub const TABLES: &[TableSpec] = &[
    LEAGUES,
    USERS,
    ROSTERS,
    TEAM_PROFILES,
    ROSTER_PLAYERS,
    DRAFT_PICKS,
    PLAYERS,
    SEASON_CONTEXT,
    MATCHUPS,
    PLAYER_PERFORMANCES,
    GAMES,
    STANDINGS,
    TRANSACTIONS,
    TRANSACTION_MOVES,
    PLAYOFF_MATCHUPS,
];

/// Look up a table definition by name.
pub fn table(name: &str) -> Option<&'static TableSpec> {
    TABLES.iter().find(|t| t.name == name)
}
