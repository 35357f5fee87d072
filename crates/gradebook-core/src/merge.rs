//! Merging ledgers from independent tutors
//!
//! Merging is per-task replace: every task the incoming ledger graded (a
//! non-empty annotation list) overwrites the local list for that task, and
//! every other task is left as it was. The engine never reconciles inside a
//! task's list, so merging is not commutative when both sides touched the
//! same task. Callers merge one tutor at a time.

use std::collections::BTreeMap;

use crate::ledger::{TaskId, TeamLedger};

/// Key of a team in a roster table.
pub type TeamKey = String;

/// Result of merging one team, with what changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub ledger: TeamLedger,
    /// Tasks taken from the incoming ledger that the local ledger lacked.
    pub added: Vec<TaskId>,
    /// Tasks whose differing local annotations were overwritten.
    pub overwritten: Vec<TaskId>,
}

/// Merge `incoming` into `local`, reporting which tasks changed.
pub fn merge_with_outcome(local: &TeamLedger, incoming: &TeamLedger) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        ledger: local.clone(),
        ..Default::default()
    };

    for (task, annotations) in incoming.iter() {
        if annotations.is_empty() {
            continue;
        }
        let existing = local.get_task_annotations(task);
        if existing == annotations {
            continue;
        }
        if existing.is_empty() {
            outcome.added.push(task);
        } else {
            outcome.overwritten.push(task);
        }
        outcome
            .ledger
            .set_task_annotations(task, annotations.to_vec());
    }

    outcome
}

/// Merge `incoming` into `local` with per-task replace semantics.
pub fn merge(local: &TeamLedger, incoming: &TeamLedger) -> TeamLedger {
    merge_with_outcome(local, incoming).ledger
}

/// Merge a whole table of ledgers.
///
/// Teams only in `local` pass through, teams in both are merged, teams only in
/// `incoming` are inserted as-is.
pub fn merge_all(
    mut local: BTreeMap<TeamKey, TeamLedger>,
    incoming: &BTreeMap<TeamKey, TeamLedger>,
) -> BTreeMap<TeamKey, TeamLedger> {
    for (team, ledger) in incoming {
        let merged = match local.get(team) {
            Some(existing) => merge(existing, ledger),
            None => ledger.clone(),
        };
        local.insert(team.clone(), merged);
    }
    local
}
