//! Structured per-team report

use crate::annotation::Annotation;
use crate::config::AssignmentSpec;
use crate::ledger::{TaskId, TeamLedger};
use crate::points::Points;
use crate::score::TaskScore;

const FULL_MARKS: &str = "Full marks, well done!";

/// Report for one team on one assignment.
#[derive(Debug, Clone)]
pub struct TeamReport<'a> {
    assignment: &'a AssignmentSpec,
    team: &'a str,
    members: Vec<String>,
    ledger: &'a TeamLedger,
}

impl<'a> TeamReport<'a> {
    pub fn new(
        assignment: &'a AssignmentSpec,
        team: &'a str,
        members: Vec<String>,
        ledger: &'a TeamLedger,
    ) -> Self {
        Self {
            assignment,
            team,
            members,
            ledger,
        }
    }

    /// Score of every task the assignment defines, in task order.
    pub fn task_scores(&self) -> Vec<TaskScore> {
        self.assignment
            .tasks()
            .map(|(task, max)| TaskScore::compute(task, max, self.ledger.get_task_annotations(task)))
            .collect()
    }

    /// Sum of the task scores.
    pub fn overall(&self) -> Points {
        self.task_scores().iter().map(|score| score.reached).sum()
    }

    /// Ledger tasks the assignment does not define.
    pub fn unknown_tasks(&self) -> Vec<TaskId> {
        self.ledger
            .unknown_tasks(|task| self.assignment.contains_task(task))
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "# Assignment {}, Team {}\n\n",
            self.assignment.number, self.team
        ));
        if !self.members.is_empty() {
            output.push_str(&format!("**Members:** {}\n\n", self.members.join(", ")));
        }

        for score in self.task_scores() {
            output.push_str(&format!("## Task {}\n\n", score.task));
            let lines: Vec<String> = self
                .ledger
                .get_task_annotations(score.task)
                .iter()
                .filter(|annotation| !annotation.is_inert())
                .map(penalty_line)
                .collect();
            if !lines.is_empty() {
                output.push_str(&lines.join("\n"));
                output.push_str("\n\n");
            }
            output.push_str(&format!(
                "Points reached: **{}/{}**.\n\n",
                score.reached, score.max
            ));
            if lines.is_empty() && score.is_full_marks() {
                output.push_str(FULL_MARKS);
                output.push_str("\n\n");
            }
        }

        output.push_str(&format!(
            "Overall Score: **{}/{}**\n",
            self.overall(),
            self.assignment.total()
        ));
        output
    }
}

/// One bullet of the penalty list.
///
/// Continuation lines of a multi-line comment are indented under the bullet.
fn penalty_line(annotation: &Annotation) -> String {
    let comment = annotation
        .comment
        .as_deref()
        .map(|comment| comment.trim().replace('\n', "\n  "));
    match (annotation.penalty, comment) {
        (Some(_), Some(comment)) => {
            format!("- {} points: {}", annotation.deduction(), comment)
        }
        (Some(_), None) => format!("- {} points", annotation.deduction()),
        (None, Some(comment)) => format!("- {}", comment),
        (None, None) => String::new(),
    }
}
