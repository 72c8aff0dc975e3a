//! Verdict classification
//!
//! Grades a student's value against the expected value by relative error.
//! Two thresholds partition the error range: at most `tolerance` is
//! [`Verdict::Correct`], at most `tolerance_close` is [`Verdict::Close`],
//! anything beyond is [`Verdict::Incorrect`].

use labcheck_core::Verdict;

/// Absolute bound used when the expected value is exactly zero
const ZERO_TOLERANCE: f64 = 1e-10;

/// Relative error of a student value against a non-zero expected value
pub fn relative_error(student: f64, expected: f64) -> f64 {
    (student - expected).abs() / expected.abs()
}

/// Classify a student value against an expected value.
///
/// Returns `None` when either side is absent. A zero expected value cannot
/// anchor a relative error, so it is graded by absolute comparison instead
/// and never yields [`Verdict::Close`].
pub fn classify(
    student: Option<f64>,
    expected: Option<f64>,
    tolerance: f64,
    tolerance_close: f64,
) -> Option<Verdict> {
    let (student, expected) = match (student, expected) {
        (Some(s), Some(e)) => (s, e),
        _ => return None,
    };

    if expected == 0.0 {
        let verdict = if student.abs() < ZERO_TOLERANCE {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        return Some(verdict);
    }

    let error = relative_error(student, expected);
    let verdict = if error <= tolerance {
        Verdict::Correct
    } else if error <= tolerance_close {
        Verdict::Close
    } else {
        Verdict::Incorrect
    };
    Some(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use labcheck_core::{DEFAULT_TOLERANCE, DEFAULT_TOLERANCE_CLOSE};

    fn grade(student: f64, expected: f64) -> Option<Verdict> {
        classify(
            Some(student),
            Some(expected),
            DEFAULT_TOLERANCE,
            DEFAULT_TOLERANCE_CLOSE,
        )
    }

    #[test]
    fn test_absent_values_are_ungraded() {
        assert_eq!(classify(None, Some(1.0), 0.10, 0.15), None);
        assert_eq!(classify(Some(1.0), None, 0.10, 0.15), None);
        assert_eq!(classify(None, None, 0.10, 0.15), None);
    }

    #[test]
    fn test_boundary_exactly_on_tolerance_is_correct() {
        // 10% relative error sits on the correct boundary
        assert_eq!(grade(110.0, 100.0), Some(Verdict::Correct));
        assert_eq!(grade(90.0, 100.0), Some(Verdict::Correct));
    }

    #[test]
    fn test_just_past_tolerance_is_close() {
        assert_eq!(grade(110.0001, 100.0), Some(Verdict::Close));
        assert_eq!(grade(115.0, 100.0), Some(Verdict::Close));
    }

    #[test]
    fn test_past_close_tolerance_is_incorrect() {
        assert_eq!(grade(116.0, 100.0), Some(Verdict::Incorrect));
        assert_eq!(grade(0.0, 100.0), Some(Verdict::Incorrect));
    }

    #[test]
    fn test_negative_expected_uses_magnitude() {
        assert_eq!(grade(-95.0, -100.0), Some(Verdict::Correct));
        assert_eq!(grade(-113.0, -100.0), Some(Verdict::Close));
        assert_eq!(grade(95.0, -100.0), Some(Verdict::Incorrect));
    }

    #[test]
    fn test_zero_expected_is_graded_absolutely() {
        assert_eq!(grade(1e-11, 0.0), Some(Verdict::Correct));
        assert_eq!(grade(0.0, 0.0), Some(Verdict::Correct));
        assert_eq!(grade(1e-5, 0.0), Some(Verdict::Incorrect));
        // No close band when the expected value is zero
        assert_eq!(grade(1e-10, 0.0), Some(Verdict::Incorrect));
    }

    #[test]
    fn test_custom_tolerances() {
        assert_eq!(
            classify(Some(104.0), Some(100.0), 0.05, 0.08),
            Some(Verdict::Correct)
        );
        assert_eq!(
            classify(Some(107.0), Some(100.0), 0.05, 0.08),
            Some(Verdict::Close)
        );
        assert_eq!(
            classify(Some(109.0), Some(100.0), 0.05, 0.08),
            Some(Verdict::Incorrect)
        );
    }

    #[test]
    fn test_relative_error() {
        assert_eq!(relative_error(110.0, 100.0), 0.1);
        assert_eq!(relative_error(90.0, -100.0), 1.9);
    }
}
