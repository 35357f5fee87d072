//! Rendering ledgers into feedback documents
//!
//! Two shapes are produced: a structured per-team report built from a stored
//! ledger, and a flat scored table built from a delimited grading file (or a
//! ledger) with completeness guards applied before it is written.

mod report;
mod scored;

pub use report::TeamReport;
pub use scored::{ScoredRow, ScoredTable};

/// File-name-safe form of a team key or name.
pub fn file_slug(text: &str) -> String {
    let slug = slug::slugify(text);
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}
