//! Quote-aware field counting
//!
//! A `"` toggles a quoted span; commas inside a span are not delimiters.
//! There is no escaped-quote handling.

use std::path::Path;

use crate::error::{GradebookError, Result};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Number of fields on one line: unquoted delimiters plus one.
pub fn count_fields(line: &str) -> usize {
    let mut quoted = false;
    let mut delimiters = 0;
    for c in line.chars() {
        match c {
            QUOTE => quoted = !quoted,
            DELIMITER if !quoted => delimiters += 1,
            _ => {}
        }
    }
    delimiters + 1
}

/// Split one line on unquoted delimiters, dropping the quote characters.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut quoted = false;
    let mut fields = Vec::new();
    let mut current = String::new();
    for c in line.chars() {
        match c {
            QUOTE => quoted = !quoted,
            DELIMITER if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Verify every non-blank line of `text` has exactly `expected` fields.
///
/// Line numbers in the error are 1-based and count blank lines. `path` names
/// the file in the error.
pub fn check_field_counts(text: &str, expected: usize, path: &Path) -> Result<()> {
    for (index, line) in lines(text) {
        if line.trim().is_empty() {
            continue;
        }
        let found = count_fields(line);
        if found != expected {
            return Err(GradebookError::MalformedRow {
                path: path.to_path_buf(),
                line: index + 1,
                found,
                expected,
                fields: line.split(DELIMITER).map(str::to_string).collect(),
            });
        }
    }
    Ok(())
}

/// Lines with their 0-based index, tolerant of CRLF endings.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_commas_are_not_delimiters() {
        assert_eq!(count_fields(r#"a,"b,c",d"#), 3);
        assert!(check_field_counts(r#"a,"b,c",d"#, 3, Path::new("x.csv")).is_ok());
    }

    #[test]
    fn test_wrong_count_reports_line_number() {
        let err = check_field_counts(r#"a,"b,c",d"#, 4, Path::new("ass2.csv")).unwrap_err();
        match err {
            GradebookError::MalformedRow {
                path,
                line,
                found,
                expected,
                fields,
            } => {
                assert_eq!(path, Path::new("ass2.csv"));
                assert_eq!(line, 1);
                assert_eq!(found, 3);
                assert_eq!(expected, 4);
                assert_eq!(fields, vec!["a", "\"b", "c\"", "d"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped_but_counted() {
        let text = "a,b\n\nc,d\ne,f,g\n";
        let err = check_field_counts(text, 2, Path::new("x.csv")).unwrap_err();
        assert!(matches!(err, GradebookError::MalformedRow { line: 4, .. }));
    }

    #[test]
    fn test_crlf_lines() {
        assert!(check_field_counts("a,b\r\nc,d\r\n", 2, Path::new("x.csv")).is_ok());
    }

    #[test]
    fn test_unterminated_quote_swallows_rest_of_line() {
        assert_eq!(count_fields(r#"a,"b,c,d"#), 2);
    }

    #[test]
    fn test_split_fields_drops_quotes() {
        assert_eq!(
            split_fields(r#""Ada,Grace","8:good, mostly",5"#),
            vec!["Ada,Grace", "8:good, mostly", "5"]
        );
        assert_eq!(split_fields(""), vec![""]);
    }
}
