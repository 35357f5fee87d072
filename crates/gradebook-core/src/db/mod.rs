//! SQLite roster storage
//!
//! A [`RosterStore`] is opened once per command and passed to whatever needs
//! it. Every read-modify-write of a ledger runs inside an immediate
//! transaction, so two processes saving the same team serialize on the write
//! lock instead of losing an update.

pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::annotation::Annotation;
use crate::error::{GradebookError, Result};
use crate::ledger::{TaskId, TeamLedger};
use crate::map_db_err;
use crate::merge::{merge_with_outcome, TeamKey};
use crate::roster::{group_teams, NewStudent, RosterRow, Team};
use crate::trace_time;

use schema::{quote_table, FIRST_NAME, GRADE, LAST_NAME, TEAM, TEAM_KEY};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Changes a merge made to one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMerge {
    pub team: TeamKey,
    pub added: Vec<TaskId>,
    pub overwritten: Vec<TaskId>,
}

/// Summary of merging another tutor's roster table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Teams whose ledger changed
    pub merged: Vec<TeamMerge>,
    /// Teams in the other table that do not exist locally
    pub unknown_teams: Vec<TeamKey>,
    /// Teams whose ledger blob could not be decoded, on either side
    pub unreadable: Vec<TeamKey>,
}

/// Handle on a roster database.
#[derive(Debug)]
pub struct RosterStore {
    conn: Connection,
    path: PathBuf,
}

impl RosterStore {
    /// Open or create the roster database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            GradebookError::Other(format!(
                "failed to open database at {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::configure(conn, path)
    }

    /// Open an existing roster database without write access.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GradebookError::not_found(
                "database",
                path.display(),
            ));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            GradebookError::Other(format!(
                "failed to open database at {} read-only: {}",
                path.display(),
                e
            ))
        })?;
        Self::configure(conn, path)
    }

    fn configure(conn: Connection, path: &Path) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| map_db_err!("set busy timeout", e))?;
        debug!(path = %path.display(), "opened roster database");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_table(&self, table: &str) -> Result<bool> {
        schema::table_exists(&self.conn, table).map_err(|e| map_db_err!("look up table", e))
    }

    fn require_table(&self, table: &str) -> Result<String> {
        let quoted = quote_table(table)?;
        if !self.has_table(table)? {
            return Err(GradebookError::not_found(
                "roster table",
                format!("{} in {}", table, self.path.display()),
            ));
        }
        Ok(quoted)
    }

    fn immediate(&self) -> Result<Transaction<'_>> {
        Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|e| map_db_err!("start transaction", e))
    }

    /// Replace a roster table with freshly imported students.
    ///
    /// Every existing ledger in the table is discarded.
    pub fn replace_roster(&self, table: &str, students: &[NewStudent]) -> Result<usize> {
        let quoted = quote_table(table)?;
        let tx = self.immediate()?;
        schema::recreate_table(&tx, &quoted).map_err(|e| map_db_err!("create roster table", e))?;
        {
            let mut insert = tx
                .prepare(&format!(
                    "INSERT INTO {} ({}, {}, {}, {}) VALUES (?1, ?2, ?3, '')",
                    quoted, FIRST_NAME, LAST_NAME, TEAM, GRADE
                ))
                .map_err(|e| map_db_err!("prepare roster insert", e))?;
            for student in students {
                insert
                    .execute(params![student.first_name, student.last_name, student.team])
                    .map_err(|e| map_db_err!("insert student", e))?;
            }
        }
        tx.commit().map_err(|e| map_db_err!("commit roster import", e))?;
        info!(table, students = students.len(), "imported roster");
        Ok(students.len())
    }

    /// All rows of a roster table in storage order.
    pub fn rows(&self, table: &str) -> Result<Vec<RosterRow>> {
        let quoted = self.require_table(table)?;
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT rowid, COALESCE(CAST({first} AS TEXT), ''), COALESCE(CAST({last} AS TEXT), ''), \
                 CAST({team} AS TEXT), COALESCE(CAST({grade} AS TEXT), '') FROM {table} ORDER BY rowid",
                first = FIRST_NAME,
                last = LAST_NAME,
                team = TEAM,
                grade = GRADE,
                table = quoted,
            ))
            .map_err(|e| map_db_err!("prepare roster query", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RosterRow {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    team: row.get(3)?,
                    grade: row.get(4)?,
                })
            })
            .map_err(|e| map_db_err!("query roster", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read roster row", e))?;
        Ok(rows)
    }

    /// Teams of a roster table, in order of first appearance.
    pub fn teams(&self, table: &str) -> Result<Vec<Team>> {
        Ok(group_teams(self.rows(table)?))
    }

    /// One team by key.
    pub fn team(&self, table: &str, team: &str) -> Result<Team> {
        self.teams(table)?
            .into_iter()
            .find(|candidate| candidate.key == team)
            .ok_or_else(|| GradebookError::not_found("team", team))
    }

    /// The authoritative ledger of a team.
    pub fn load_ledger(&self, table: &str, team: &str) -> Result<TeamLedger> {
        let quoted = self.require_table(table)?;
        let blob = first_grade(&self.conn, &quoted, team)?
            .ok_or_else(|| GradebookError::not_found("team", team))?;
        Ok(TeamLedger::deserialize(&blob))
    }

    /// Store `ledger` on every row of a team.
    pub fn save_ledger(&self, table: &str, team: &str, ledger: &TeamLedger) -> Result<usize> {
        let quoted = self.require_table(table)?;
        let tx = self.immediate()?;
        let updated = write_grade(&tx, &quoted, team, ledger)?;
        tx.commit().map_err(|e| map_db_err!("commit ledger", e))?;
        Ok(updated)
    }

    /// Replace one task's annotations for a team, keeping its other tasks.
    pub fn set_task_annotations(
        &self,
        table: &str,
        team: &str,
        task: TaskId,
        annotations: Vec<Annotation>,
    ) -> Result<TeamLedger> {
        let quoted = self.require_table(table)?;
        let tx = self.immediate()?;
        let blob = first_grade(&tx, &quoted, team)?
            .ok_or_else(|| GradebookError::not_found("team", team))?;
        let mut ledger = TeamLedger::deserialize(&blob);
        ledger.set_task_annotations(task, annotations);
        write_grade(&tx, &quoted, team, &ledger)?;
        tx.commit().map_err(|e| map_db_err!("commit ledger", e))?;
        debug!(table, team, task, "saved task annotations");
        Ok(ledger)
    }

    /// Ledger blob of every team, decoded.
    ///
    /// Teams whose blob cannot be decoded get an empty ledger and are listed
    /// in the second return value.
    fn ledgers(conn: &Connection, quoted: &str) -> Result<(BTreeMap<TeamKey, TeamLedger>, Vec<TeamKey>)> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {key}, COALESCE(CAST({grade} AS TEXT), '') FROM {table} ORDER BY rowid",
                key = TEAM_KEY,
                grade = GRADE,
                table = quoted,
            ))
            .map_err(|e| map_db_err!("prepare ledger query", e))?;
        let blobs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| map_db_err!("query ledgers", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read ledger row", e))?;

        let mut ledgers = BTreeMap::new();
        let mut unreadable = Vec::new();
        for (team, blob) in blobs {
            if ledgers.contains_key(&team) {
                continue;
            }
            let ledger = match TeamLedger::try_deserialize(&blob) {
                Ok(ledger) => ledger,
                Err(e) => {
                    warn!(team = %team, error = %e, "unreadable ledger, treating as ungraded");
                    unreadable.push(team.clone());
                    TeamLedger::new()
                }
            };
            ledgers.insert(team, ledger);
        }
        Ok((ledgers, unreadable))
    }

    /// Merge the same table from another tutor's database into this one.
    ///
    /// Teams are matched by key. For each team the other tutor's graded tasks
    /// replace the local ones; everything is written in one transaction.
    pub fn merge_from(&self, table: &str, other: &Path) -> Result<MergeReport> {
        let start = Instant::now();
        let quoted = self.require_table(table)?;
        let other = RosterStore::open_read_only(other)?;
        let other_quoted = other.require_table(table)?;
        let (incoming, mut unreadable) = Self::ledgers(&other.conn, &other_quoted)?;

        let tx = self.immediate()?;
        let (local, local_unreadable) = Self::ledgers(&tx, &quoted)?;
        unreadable.extend(local_unreadable);

        let mut report = MergeReport {
            unreadable,
            ..Default::default()
        };
        for (team, ledger) in &incoming {
            let Some(existing) = local.get(team) else {
                warn!(team = %team, "team from other database not in local roster, skipping");
                report.unknown_teams.push(team.clone());
                continue;
            };
            let outcome = merge_with_outcome(existing, ledger);
            if outcome.added.is_empty() && outcome.overwritten.is_empty() {
                continue;
            }
            if !outcome.overwritten.is_empty() {
                warn!(
                    team = %team,
                    tasks = ?outcome.overwritten,
                    "local annotations overwritten by merge"
                );
            }
            write_grade(&tx, &quoted, team, &outcome.ledger)?;
            report.merged.push(TeamMerge {
                team: team.clone(),
                added: outcome.added,
                overwritten: outcome.overwritten,
            });
        }
        tx.commit().map_err(|e| map_db_err!("commit merge", e))?;

        info!(
            table,
            other = %other.path().display(),
            merged = report.merged.len(),
            unknown = report.unknown_teams.len(),
            "merged roster"
        );
        trace_time!(start, "merge_from");
        Ok(report)
    }
}

fn first_grade(conn: &Connection, quoted: &str, team: &str) -> Result<Option<String>> {
    conn.query_row(
        &format!(
            "SELECT COALESCE(CAST({grade} AS TEXT), '') FROM {table} WHERE {key} = ?1 ORDER BY rowid LIMIT 1",
            grade = GRADE,
            table = quoted,
            key = TEAM_KEY,
        ),
        [team],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| map_db_err!("read ledger", e))
}

fn write_grade(conn: &Connection, quoted: &str, team: &str, ledger: &TeamLedger) -> Result<usize> {
    let updated = conn
        .execute(
            &format!(
                "UPDATE {table} SET {grade} = ?1 WHERE {key} = ?2",
                table = quoted,
                grade = GRADE,
                key = TEAM_KEY,
            ),
            params![ledger.serialize(), team],
        )
        .map_err(|e| map_db_err!("write ledger", e))?;
    if updated == 0 {
        return Err(GradebookError::not_found("team", team));
    }
    Ok(updated)
}

#[cfg(test)]
mod tests;
