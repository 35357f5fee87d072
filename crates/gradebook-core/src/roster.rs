//! Roster rows, team grouping and roster file import
//!
//! A roster table holds one row per student. Students sharing a `Team` value
//! are graded together; a student without a team forms a team of one keyed
//! `s<id>`. Only the first row of a team (in row order) carries the
//! authoritative ledger.

use std::path::Path;

use crate::error::{GradebookError, Result};
use crate::grading_file::{check_field_counts, lines, split_fields};
use crate::ledger::TeamLedger;
use crate::merge::TeamKey;

/// Characters stripped from both ends of a team value.
pub const TEAM_PADDING: &[char] = &[' ', '\t', '\n', '\r'];

/// One student row as stored in a roster table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub team: Option<String>,
    /// Serialized [`TeamLedger`], empty when ungraded
    pub grade: String,
}

impl RosterRow {
    /// Key of the team this student belongs to.
    pub fn team_key(&self) -> TeamKey {
        match self.team.as_deref().map(|team| team.trim_matches(TEAM_PADDING)) {
            Some(team) if !team.is_empty() => team.to_string(),
            _ => format!("s{}", self.id),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Students graded together.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub key: TeamKey,
    /// Rows in storage order; the first one owns the ledger
    pub members: Vec<RosterRow>,
}

impl Team {
    /// The authoritative ledger, read from the first row.
    pub fn ledger(&self) -> TeamLedger {
        self.members
            .first()
            .map(|row| TeamLedger::deserialize(&row.grade))
            .unwrap_or_default()
    }

    /// Members ordered by last name, then first name.
    pub fn sorted_members(&self) -> Vec<&RosterRow> {
        let mut members: Vec<&RosterRow> = self.members.iter().collect();
        members.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        members
    }

    pub fn member_names(&self) -> Vec<String> {
        self.sorted_members()
            .into_iter()
            .map(RosterRow::full_name)
            .collect()
    }

    pub fn last_names(&self) -> Vec<&str> {
        self.sorted_members()
            .into_iter()
            .map(|row| row.last_name.as_str())
            .collect()
    }
}

/// Group rows into teams, keeping the order in which teams first appear.
pub fn group_teams(rows: Vec<RosterRow>) -> Vec<Team> {
    let mut teams: Vec<Team> = Vec::new();
    for row in rows {
        let key = row.team_key();
        match teams.iter_mut().find(|team| team.key == key) {
            Some(team) => team.members.push(row),
            None => teams.push(Team {
                key,
                members: vec![row],
            }),
        }
    }
    teams
}

/// A student read from a roster file, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub team: Option<String>,
}

struct RosterColumns {
    first_name: usize,
    last_name: usize,
    team: Option<usize>,
}

fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|field| names.iter().any(|name| field.trim().eq_ignore_ascii_case(name)))
}

/// Parse a roster file with a `First Name,Last Name,Team` header.
///
/// The German `Vorname`/`Nachname`/`Gruppe` headers are accepted too. Column
/// order is free and extra columns are ignored.
pub fn parse_roster(text: &str, path: &Path) -> Result<Vec<NewStudent>> {
    let mut content = lines(text).filter(|(_, line)| !line.trim().is_empty());
    let Some((_, header_line)) = content.next() else {
        return Err(GradebookError::config_mismatch(path, "roster file is empty"));
    };
    let header = split_fields(header_line);
    check_field_counts(text, header.len(), path)?;

    let columns = RosterColumns {
        first_name: find_column(&header, &["first name", "firstname", "vorname"])
            .ok_or_else(|| GradebookError::config_mismatch(path, "roster has no first name column"))?,
        last_name: find_column(&header, &["last name", "lastname", "nachname"])
            .ok_or_else(|| GradebookError::config_mismatch(path, "roster has no last name column"))?,
        team: find_column(&header, &["team", "gruppe"]),
    };

    let students = content
        .map(|(_, line)| {
            let fields = split_fields(line);
            let field = |index: usize| fields[index].trim().to_string();
            NewStudent {
                first_name: field(columns.first_name),
                last_name: field(columns.last_name),
                team: columns
                    .team
                    .map(field)
                    .filter(|team| !team.is_empty()),
            }
        })
        .collect();
    Ok(students)
}

/// Read and parse a roster file from disk.
pub fn load_roster(path: &Path) -> Result<Vec<NewStudent>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| GradebookError::io_operation("read roster", path.display(), e))?;
    parse_roster(&text, path)
}
