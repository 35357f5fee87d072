//! A single penalty/comment entry within a task

use serde::{Deserialize, Serialize};

use crate::points::Points;

/// Wire shape of an annotation: a two-element `[penalty, comment]` array.
type AnnotationPair = (Option<Points>, Option<String>);

/// One penalty/comment pair for one task.
///
/// Both fields may be absent: such a blank line only reserves space in the
/// grading form and is skipped everywhere else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnnotationPair", into = "AnnotationPair")]
pub struct Annotation {
    pub penalty: Option<Points>,
    pub comment: Option<String>,
}

impl Annotation {
    pub fn new(penalty: Option<Points>, comment: Option<String>) -> Self {
        Self { penalty, comment }
    }

    /// Penalty with a comment.
    pub fn penalty(points: impl Into<Points>, comment: impl Into<String>) -> Self {
        Self::new(Some(points.into()), Some(comment.into()))
    }

    /// Zero-point remark.
    pub fn remark(comment: impl Into<String>) -> Self {
        Self::new(None, Some(comment.into()))
    }

    /// Blank placeholder line.
    pub fn blank() -> Self {
        Self::default()
    }

    /// True when neither a penalty nor a comment is present.
    pub fn is_inert(&self) -> bool {
        self.penalty.is_none() && self.comment.is_none()
    }

    /// The signed amount this annotation changes a task score by.
    ///
    /// Inert annotations contribute nothing, a remark without a penalty counts
    /// as zero, and any entered number is deducted by magnitude.
    pub fn deduction(&self) -> Points {
        if self.is_inert() {
            return Points::ZERO;
        }
        self.penalty.unwrap_or(Points::ZERO).as_deduction()
    }

    /// Parse the CLI shorthand `[penalty][:comment]`.
    ///
    /// `-3:missing edge case`, `2`, `:nice work` and the empty string (blank)
    /// are all accepted.
    pub fn parse_shorthand(input: &str) -> crate::error::Result<Self> {
        let (penalty, comment) = match input.split_once(':') {
            Some((p, c)) => (p.trim(), Some(c.trim())),
            None => (input.trim(), None),
        };
        let penalty = if penalty.is_empty() {
            None
        } else {
            Some(penalty.parse::<Points>()?)
        };
        let comment = comment.filter(|c| !c.is_empty()).map(str::to_string);
        Ok(Self::new(penalty, comment))
    }
}

impl From<AnnotationPair> for Annotation {
    fn from((penalty, comment): AnnotationPair) -> Self {
        Self { penalty, comment }
    }
}

impl From<Annotation> for AnnotationPair {
    fn from(annotation: Annotation) -> Self {
        (annotation.penalty, annotation.comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_pair() {
        let a = Annotation::penalty(-3, "missing edge case");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"[-3,"missing edge case"]"#
        );
        assert_eq!(
            serde_json::to_string(&Annotation::blank()).unwrap(),
            "[null,null]"
        );
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(serde_json::from_str::<Annotation>(r#"{"penalty": 1}"#).is_err());
        assert!(serde_json::from_str::<Annotation>(r#"[1]"#).is_err());
        assert!(serde_json::from_str::<Annotation>(r#"["1", "x"]"#).is_err());
    }

    #[test]
    fn test_deduction_rules() {
        assert_eq!(Annotation::blank().deduction(), Points::ZERO);
        assert_eq!(Annotation::remark("ok").deduction(), Points::ZERO);
        assert_eq!(Annotation::penalty(2, "x").deduction(), Points::new(-2.0));
        assert_eq!(Annotation::penalty(-2, "x").deduction(), Points::new(-2.0));
    }

    #[test]
    fn test_parse_shorthand() {
        let a = Annotation::parse_shorthand("-3:missing edge case").unwrap();
        assert_eq!(a, Annotation::penalty(-3, "missing edge case"));

        let a = Annotation::parse_shorthand(":well structured").unwrap();
        assert_eq!(a, Annotation::remark("well structured"));

        let a = Annotation::parse_shorthand("1.5").unwrap();
        assert_eq!(a, Annotation::new(Some(Points::new(1.5)), None));

        assert!(Annotation::parse_shorthand("").unwrap().is_inert());
        assert!(Annotation::parse_shorthand("x:y").is_err());
    }
}
