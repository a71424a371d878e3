//! Score arithmetic: the single authoritative total-score computation.
//!
//! The total is the unweighted mean of the eight category scores. Whatever
//! overall figure the evaluation collaborator reports is never consulted.

use serde::Serialize;

use crate::models::category::CategoryScores;

/// Unweighted arithmetic mean of the eight category scores.
pub fn total_score(scores: &CategoryScores) -> f64 {
    let entries = scores.entries();
    let sum: f64 = entries.iter().map(|(_, v)| v).sum();
    sum / entries.len() as f64
}

/// Letter grade bands, as shown with results and analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub fn for_score(score: f64) -> Grade {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::E
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "A (Excellent)",
            Grade::B => "B (Very Good)",
            Grade::C => "C (Good)",
            Grade::D => "D (Fair)",
            Grade::E => "E (Needs Improvement)",
        }
    }
}

/// Derived result summary: total, pass flag, and grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub total_score: f64,
    pub passed: bool,
    pub grade: Grade,
}

/// Computes the summary once; callers pass these values down unchanged.
/// A total exactly at the threshold passes.
pub fn summarize(scores: &CategoryScores, passing_score: f64) -> ScoreSummary {
    let total = total_score(scores);
    ScoreSummary {
        total_score: total,
        passed: total >= passing_score,
        grade: Grade::for_score(total),
    }
}

/// `"3m 25s"`-style rendering of a duration.
pub fn format_duration(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [f64; 8]) -> CategoryScores {
        CategoryScores {
            communication: values[0],
            problem_solving: values[1],
            leadership: values[2],
            teamwork: values[3],
            technical_knowledge: values[4],
            adaptability: values[5],
            creativity: values[6],
            critical_thinking: values[7],
        }
    }

    #[test]
    fn test_total_is_mean_of_eight() {
        let s = scores([85.0, 78.0, 82.0, 88.0, 75.0, 80.0, 77.0, 81.0]);
        let expected = (85.0 + 78.0 + 82.0 + 88.0 + 75.0 + 80.0 + 77.0 + 81.0) / 8.0;
        assert!((total_score(&s) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_uniform_scores_mean_is_identity() {
        let s = scores([70.0; 8]);
        assert!((total_score(&s) - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_threshold_passes() {
        let s = scores([70.0; 8]);
        let summary = summarize(&s, 70.0);
        assert!((summary.total_score - 70.0).abs() < f64::EPSILON);
        assert!(summary.passed);
        assert_eq!(summary.grade, Grade::C);
    }

    #[test]
    fn test_just_below_threshold_fails() {
        let s = scores([69.9; 8]);
        let summary = summarize(&s, 70.0);
        assert!(!summary.passed);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::for_score(95.0), Grade::A);
        assert_eq!(Grade::for_score(90.0), Grade::A);
        assert_eq!(Grade::for_score(89.9), Grade::B);
        assert_eq!(Grade::for_score(80.0), Grade::B);
        assert_eq!(Grade::for_score(70.0), Grade::C);
        assert_eq!(Grade::for_score(60.0), Grade::D);
        assert_eq!(Grade::for_score(59.9), Grade::E);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(59), "0m 59s");
        assert_eq!(format_duration(205), "3m 25s");
    }
}
