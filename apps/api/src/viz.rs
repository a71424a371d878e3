//! Chart specifications for the frontend. Pure functions from score data to
//! a declarative description; nothing here touches state or the network.

use serde::Serialize;

use crate::models::category::CategoryScores;
use crate::models::result::InterviewResultRow;

/// Fixed reference overlay drawn on the radar chart.
pub const BENCHMARK_SCORE: f64 = 75.0;

const COLOR_POOR: &str = "#ef4444";
const COLOR_FAIR: &str = "#f59e0b";
const COLOR_GOOD: &str = "#10b981";
const COLOR_PRIMARY: &str = "#3b82f6";

/// Score bands used by the bar colors and the gauge background.
const BAND_FAIR_FROM: f64 = 60.0;
const BAND_GOOD_FROM: f64 = 75.0;

#[derive(Debug, Clone, Serialize)]
pub struct RadarSpec {
    pub title: String,
    pub categories: Vec<&'static str>,
    pub values: Vec<f64>,
    pub benchmark: f64,
    pub range: [f64; 2],
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarSpec {
    pub title: String,
    pub categories: Vec<&'static str>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
    pub range: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeBand {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeSpec {
    pub title: String,
    pub value: f64,
    pub threshold: f64,
    pub bands: [GaugeBand; 3],
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelinePoint {
    pub date: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineSpec {
    pub title: String,
    pub points: Vec<TimelinePoint>,
    pub passing_line: f64,
    pub range: [f64; 2],
    pub color: &'static str,
}

fn score_color(value: f64) -> &'static str {
    if value < BAND_FAIR_FROM {
        COLOR_POOR
    } else if value < BAND_GOOD_FROM {
        COLOR_FAIR
    } else {
        COLOR_GOOD
    }
}

pub fn radar_chart(scores: &CategoryScores) -> RadarSpec {
    let entries = scores.entries();
    RadarSpec {
        title: "Interview Scores".to_string(),
        categories: entries.iter().map(|(c, _)| c.label()).collect(),
        values: entries.iter().map(|(_, v)| *v).collect(),
        benchmark: BENCHMARK_SCORE,
        range: [0.0, 100.0],
        color: COLOR_PRIMARY,
    }
}

pub fn bar_chart(scores: &CategoryScores, title: &str) -> BarSpec {
    let entries = scores.entries();
    BarSpec {
        title: title.to_string(),
        categories: entries.iter().map(|(c, _)| c.label()).collect(),
        values: entries.iter().map(|(_, v)| *v).collect(),
        colors: entries.iter().map(|(_, v)| score_color(*v)).collect(),
        range: [0.0, 110.0],
    }
}

pub fn gauge_chart(total_score: f64, passing_score: f64) -> GaugeSpec {
    GaugeSpec {
        title: "Overall Score".to_string(),
        value: total_score,
        threshold: passing_score,
        bands: [
            GaugeBand {
                from: 0.0,
                to: BAND_FAIR_FROM,
                color: "#fee2e2",
            },
            GaugeBand {
                from: BAND_FAIR_FROM,
                to: BAND_GOOD_FROM,
                color: "#fef3c7",
            },
            GaugeBand {
                from: BAND_GOOD_FROM,
                to: 100.0,
                color: "#d1fae5",
            },
        ],
        color: COLOR_PRIMARY,
    }
}

/// Score trajectory over past results. Accepts history rows newest-first
/// (as the store returns them) and renders oldest-first.
pub fn progress_timeline(history: &[InterviewResultRow], passing_score: f64) -> TimelineSpec {
    TimelineSpec {
        title: "Score Progress Over Time".to_string(),
        points: history
            .iter()
            .rev()
            .map(|row| TimelinePoint {
                date: row.created_at.clone(),
                score: row.total_score,
            })
            .collect(),
        passing_line: passing_score,
        range: [0.0, 100.0],
        color: COLOR_PRIMARY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> CategoryScores {
        CategoryScores {
            communication: 85.0,
            problem_solving: 59.9,
            leadership: 60.0,
            teamwork: 74.9,
            technical_knowledge: 75.0,
            adaptability: 80.0,
            creativity: 77.0,
            critical_thinking: 81.0,
        }
    }

    #[test]
    fn test_radar_spec_preserves_category_order() {
        let spec = radar_chart(&scores());
        assert_eq!(spec.categories.len(), 8);
        assert_eq!(spec.categories[0], "Communication");
        assert_eq!(spec.values[0], 85.0);
        assert_eq!(spec.benchmark, BENCHMARK_SCORE);
    }

    #[test]
    fn test_bar_colors_follow_thresholds() {
        let spec = bar_chart(&scores(), "Category Breakdown");
        // 59.9 → poor, 60.0 → fair, 74.9 → fair, 75.0 → good
        assert_eq!(spec.colors[1], COLOR_POOR);
        assert_eq!(spec.colors[2], COLOR_FAIR);
        assert_eq!(spec.colors[3], COLOR_FAIR);
        assert_eq!(spec.colors[4], COLOR_GOOD);
    }

    #[test]
    fn test_gauge_threshold_tracks_passing_score() {
        let spec = gauge_chart(82.5, 70.0);
        assert_eq!(spec.value, 82.5);
        assert_eq!(spec.threshold, 70.0);
        assert_eq!(spec.bands[0].from, 0.0);
        assert_eq!(spec.bands[2].to, 100.0);
    }

    #[test]
    fn test_timeline_reverses_newest_first_input() {
        let row = |session: &str, score: f64, date: &str| InterviewResultRow {
            id: 0,
            user_id: "u".to_string(),
            session_id: session.to_string(),
            job_title: String::new(),
            difficulty_level: None,
            communication: 0.0,
            problem_solving: 0.0,
            leadership: 0.0,
            teamwork: 0.0,
            technical_knowledge: 0.0,
            adaptability: 0.0,
            creativity: 0.0,
            critical_thinking: 0.0,
            total_score: score,
            pass_status: false,
            interview_duration: 0,
            questions_answered: 0,
            interview_transcript: None,
            detailed_feedback: None,
            recommendations: None,
            created_at: date.to_string(),
        };
        let history = vec![
            row("sess_2", 75.0, "2025-02-01 10:00:00"),
            row("sess_1", 50.0, "2025-01-01 10:00:00"),
        ];
        let spec = progress_timeline(&history, 70.0);
        assert_eq!(spec.points[0].score, 50.0);
        assert_eq!(spec.points[1].score, 75.0);
        assert_eq!(spec.passing_line, 70.0);
    }
}
