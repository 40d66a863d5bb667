//! Guarded free-form SQL
//!
//! The only path that runs caller-authored SQL. Statements must be a single
//! read-only SELECT and are always row-bounded: a `LIMIT` is appended when
//! the query has none, and rows past the limit are never read either way.

use crate::{
    error::{Result, SleeperError},
    storage::LeagueDatabase,
};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::params_from_iter;
use serde_json::{json, Value};
use tracing::debug;

pub const DEFAULT_SQL_LIMIT: u32 = 200;

/// Keywords that may not appear anywhere in a guarded query.
const FORBIDDEN_KEYWORDS: [&str; 10] = [
    "pragma", "attach", "detach", "insert", "update", "delete", "drop", "alter", "create",
    "replace",
];

fn words(sql: &str) -> impl Iterator<Item = String> + '_ {
    sql.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Validate `query` and return the statement to execute, with a `LIMIT`
/// appended when the query has none.
///
/// A `limit` word anywhere in the text (a subquery, a string literal) skips
/// the append, so this alone does not bound the result; `run_sql` stops
/// reading at the limit regardless.
pub fn guard_query(query: &str, limit: u32) -> Result<String> {
    let trimmed = query.trim();
    let body = trimmed.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if body.is_empty() {
        return Err(SleeperError::rejected("query is empty"));
    }

    let head = body.trim_start_matches(|c: char| c == '(' || c.is_whitespace());
    if !words(head).next().is_some_and(|w| w == "select") {
        return Err(SleeperError::rejected("only SELECT statements are allowed"));
    }
    if body.contains(';') {
        return Err(SleeperError::rejected("multiple statements are not allowed"));
    }
    if let Some(keyword) = words(body).find(|w| FORBIDDEN_KEYWORDS.contains(&w.as_str())) {
        return Err(SleeperError::rejected(format!(
            "forbidden keyword: {}",
            keyword.to_ascii_uppercase()
        )));
    }

    if words(body).any(|w| w == "limit") {
        Ok(body.to_string())
    } else {
        Ok(format!("{} LIMIT {}", body, limit))
    }
}

fn bind_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn cell_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => json!(i),
        ValueRef::Real(f) => json!(f),
        ValueRef::Text(bytes) => json!(String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => json!(format!("<{} byte blob>", bytes.len())),
    }
}

impl LeagueDatabase {
    /// Run a caller-authored SELECT with positional `params`.
    ///
    /// Returns `{columns, rows, row_count}` with columns in projection order
    /// and at most `limit` rows.
    /// Anything that is not a single read-only SELECT is rejected before
    /// execution; execution failures are reported as rejections too.
    pub fn run_sql(&self, query: &str, params: &[Value], limit: Option<u32>) -> Result<Value> {
        let limit = limit.unwrap_or(DEFAULT_SQL_LIMIT);
        let sql = guard_query(query, limit)?;
        debug!(sql = %sql, "Running guarded query");

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| SleeperError::rejected(e.to_string()))?;
        if !stmt.readonly() {
            return Err(SleeperError::rejected("statement is not read-only"));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt
            .query(params_from_iter(params.iter().map(bind_value)))
            .map_err(|e| SleeperError::rejected(e.to_string()))?;

        let cap = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut out = Vec::new();
        while out.len() < cap {
            let Some(row) = rows.next().map_err(|e| SleeperError::rejected(e.to_string()))? else {
                break;
            };
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(cell_value))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            out.push(Value::Array(values));
        }

        Ok(json!({
            "columns": columns,
            "row_count": out.len(),
            "rows": out,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<String>) -> String {
        match result {
            Err(SleeperError::SqlRejected { reason }) => reason,
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_appends_limit_when_missing() {
        assert_eq!(
            guard_query("SELECT * FROM games;", 200).unwrap(),
            "SELECT * FROM games LIMIT 200"
        );
        assert_eq!(
            guard_query("select * from games limit 5", 200).unwrap(),
            "select * from games limit 5"
        );
        assert_eq!(
            guard_query("  (SELECT 1)  ", 10).unwrap(),
            "(SELECT 1) LIMIT 10"
        );
    }

    #[test]
    fn test_rejects_non_select() {
        assert!(reason(guard_query("DELETE FROM games", 200)).contains("SELECT"));
        assert!(reason(guard_query("PRAGMA table_info(games)", 200)).contains("SELECT"));
        assert!(reason(guard_query("   ", 200)).contains("empty"));
    }

    #[test]
    fn test_rejects_forbidden_keywords_on_word_boundaries() {
        let r = reason(guard_query(
            "SELECT * FROM games WHERE 1 = 1; DROP TABLE games",
            200,
        ));
        assert!(r.contains("multiple"));

        let r = reason(guard_query(
            "SELECT * FROM (SELECT 1) WHERE EXISTS (SELECT replace('a','b','c'))",
            200,
        ));
        assert!(r.contains("REPLACE"));

        // Column names merely containing a keyword are fine
        assert!(guard_query("SELECT updated_at, created_ts FROM transactions", 200).is_ok());
    }

    #[test]
    fn test_run_sql_projects_columns_in_order() {
        let db = LeagueDatabase::open_in_memory().unwrap();
        let result = db
            .run_sql("SELECT 2 AS b, 'x' AS a, NULL AS c, 1.5 AS d", &[], None)
            .unwrap();
        assert_eq!(result["columns"], json!(["b", "a", "c", "d"]));
        assert_eq!(result["rows"], json!([[2, "x", null, 1.5]]));
        assert_eq!(result["row_count"], 1);
    }

    #[test]
    fn test_run_sql_binds_params_and_limits() {
        let db = LeagueDatabase::open_in_memory().unwrap();
        let result = db
            .run_sql(
                "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < 50)
                 SELECT x FROM n WHERE x > ?1",
                &[json!(10)],
                Some(5),
            )
            .unwrap_err();
        // WITH is not a SELECT head
        assert!(matches!(result, SleeperError::SqlRejected { .. }));

        let result = db
            .run_sql("SELECT ?1 + 1 AS next, ?2 AS label", &[json!(41), json!("q")], Some(5))
            .unwrap();
        assert_eq!(result["rows"], json!([[42, "q"]]));
    }

    #[test]
    fn test_row_cap_holds_when_limit_word_appears_elsewhere() {
        let db = LeagueDatabase::open_in_memory().unwrap();
        let values = "(VALUES (1), (2), (3), (4), (5), (6))";

        // Subquery LIMIT larger than the cap
        let result = db
            .run_sql(
                &format!("SELECT column1 FROM (SELECT column1 FROM {} LIMIT 6)", values),
                &[],
                Some(2),
            )
            .unwrap();
        assert_eq!(result["rows"], json!([[1], [2]]));
        assert_eq!(result["row_count"], 2);

        // `limit` only inside a string literal
        let result = db
            .run_sql(
                &format!("SELECT column1 FROM {} WHERE 'limit' != ''", values),
                &[],
                Some(3),
            )
            .unwrap();
        assert_eq!(result["row_count"], 3);

        // Caller's own LIMIT above the cap
        let result = db
            .run_sql(&format!("SELECT column1 FROM {} LIMIT 100", values), &[], Some(4))
            .unwrap();
        assert_eq!(result["row_count"], 4);
    }

    #[test]
    fn test_execution_errors_are_rejections() {
        let db = LeagueDatabase::open_in_memory().unwrap();
        let err = db.run_sql("SELECT * FROM no_such_table", &[], None).unwrap_err();
        assert!(matches!(err, SleeperError::SqlRejected { .. }));
    }
}
