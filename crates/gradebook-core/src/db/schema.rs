//! SQLite layout of a roster table
//!
//! Column names match the tables the grading tool has always exported, so a
//! second tutor's database can be merged without conversion.

use rusqlite::{Connection, Result};

use crate::error::GradebookError;

pub const FIRST_NAME: &str = r#""First Name""#;
pub const LAST_NAME: &str = r#""Last Name""#;
pub const TEAM: &str = r#""Team""#;
pub const GRADE: &str = r#""Grade""#;

/// SQL expression for the team key of a row: the team, or `s<rowid>`.
///
/// Strips the same characters as [`crate::roster::TEAM_PADDING`].
pub const TEAM_KEY: &str =
    r#"COALESCE(NULLIF(TRIM(CAST("Team" AS TEXT), ' ' || char(9, 10, 13)), ''), 's' || rowid)"#;

/// Quote a table name as an SQL identifier.
///
/// Only ASCII letters, digits and underscores are accepted.
pub fn quote_table(table: &str) -> crate::error::Result<String> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(GradebookError::invalid_value("table name", table));
    }
    Ok(format!("\"{}\"", table))
}

/// Drop and recreate a roster table.
pub fn recreate_table(conn: &Connection, quoted: &str) -> Result<()> {
    conn.execute_batch(&format!(
        r#"
DROP TABLE IF EXISTS {table};
CREATE TABLE {table} (
    id INTEGER PRIMARY KEY,
    {first} TEXT NOT NULL,
    {last} TEXT NOT NULL,
    {team} TEXT,
    {grade} TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS {index} ON {table}({team});
"#,
        table = quoted,
        index = format!("\"idx_{}_team\"", quoted.trim_matches('"')),
        first = FIRST_NAME,
        last = LAST_NAME,
        team = TEAM,
        grade = GRADE,
    ))
}

/// Whether `table` exists in the database.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
}
