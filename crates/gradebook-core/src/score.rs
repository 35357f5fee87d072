//! Score calculation for a single task
//!
//! A task starts at its maximum and every annotation deducts the magnitude of
//! its penalty. The result is clamped into `[0, max_points]`, so a negative
//! "penalty" entered as a bonus can never lift a task above its maximum.

use crate::annotation::Annotation;
use crate::points::Points;

/// Remaining points for a task after applying all annotations.
pub fn remaining_points<'a, I>(max_points: Points, annotations: I) -> Points
where
    I: IntoIterator<Item = &'a Annotation>,
{
    let remaining = annotations
        .into_iter()
        .fold(max_points, |acc, annotation| acc + annotation.deduction());
    remaining.clamp_to(max_points)
}

/// Score of one task, with the data it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskScore {
    pub task: u32,
    pub reached: Points,
    pub max: Points,
}

impl TaskScore {
    pub fn compute(task: u32, max: Points, annotations: &[Annotation]) -> Self {
        Self {
            task,
            reached: remaining_points(max, annotations),
            max,
        }
    }

    pub fn is_full_marks(&self) -> bool {
        self.reached == self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max(v: f64) -> Points {
        Points::new(v)
    }

    #[test]
    fn test_empty_list_is_full_marks() {
        assert_eq!(remaining_points(max(10.0), &[]), max(10.0));
    }

    #[test]
    fn test_penalties_are_deducted_by_magnitude() {
        let annotations = vec![
            Annotation::penalty(-3, "missing edge case"),
            Annotation::penalty(2, "typo"),
        ];
        assert_eq!(remaining_points(max(10.0), &annotations), max(5.0));
    }

    #[test]
    fn test_inert_and_remarks_do_not_change_score() {
        let annotations = vec![Annotation::blank(), Annotation::remark("nice")];
        assert_eq!(remaining_points(max(5.0), &annotations), max(5.0));
    }

    #[test]
    fn test_clamped_at_zero() {
        let annotations = vec![
            Annotation::penalty(-8, "a"),
            Annotation::penalty(-8, "b"),
        ];
        assert_eq!(remaining_points(max(10.0), &annotations), Points::ZERO);
    }

    #[test]
    fn test_bonus_never_exceeds_max() {
        // A negative deduction cannot occur after normalisation, so the only
        // way to exceed max is through the clamp itself; feed it directly.
        assert_eq!(max(12.0).clamp_to(max(10.0)), max(10.0));
        let annotations = vec![Annotation::penalty(-1, "a"), Annotation::penalty(1, "b")];
        assert_eq!(remaining_points(max(10.0), &annotations), max(8.0));
    }

    #[test]
    fn test_fractional_result_keeps_precision() {
        let annotations = vec![Annotation::penalty(-0.5, "rounding")];
        let remaining = remaining_points(max(4.0), &annotations);
        assert_eq!(remaining, Points::new(3.5));
        assert_eq!(remaining.to_string(), "3.5");
    }

    #[test]
    fn test_order_independent() {
        let a = vec![
            Annotation::penalty(-1.25, "a"),
            Annotation::blank(),
            Annotation::penalty(-2, "b"),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(
            remaining_points(max(6.0), &a),
            remaining_points(max(6.0), &b)
        );
    }

    #[test]
    fn test_clamp_invariant_over_many_lists() {
        let penalties = [-7.5, -3.0, 0.0, 2.0, 11.0, -0.25];
        for max_points in [0.5, 1.0, 5.0, 10.0] {
            for n in 0..penalties.len() {
                let annotations: Vec<Annotation> = penalties[..=n]
                    .iter()
                    .map(|p| Annotation::penalty(*p, "x"))
                    .collect();
                let r = remaining_points(max(max_points), &annotations);
                assert!(r >= Points::ZERO && r <= max(max_points));
            }
        }
    }

    #[test]
    fn test_task_score_full_marks() {
        let score = TaskScore::compute(2, max(5.0), &[]);
        assert!(score.is_full_marks());
        let score = TaskScore::compute(1, max(10.0), &[Annotation::penalty(-3, "x")]);
        assert_eq!(score.reached, max(7.0));
        assert!(!score.is_full_marks());
    }
}
