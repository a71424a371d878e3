//! Aggregate metrics over a user's persisted results: counts, averages,
//! improvement rate, and strongest/weakest category.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::category::{Category, CategoryScores};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub category: Category,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub total_interviews: i64,
    pub average_score: f64,
    /// Percent change from the earliest to the latest result.
    pub improvement_rate: f64,
    pub category_averages: CategoryScores,
    pub strongest: Option<CategoryAverage>,
    pub weakest: Option<CategoryAverage>,
}

/// Coarse reading of the improvement rate, used to pick a coaching hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBand {
    Declining,
    Steady,
    Improving,
}

impl ProgressBand {
    pub fn for_rate(rate: f64) -> ProgressBand {
        if rate < 0.0 {
            ProgressBand::Declining
        } else if rate > 10.0 {
            ProgressBand::Improving
        } else {
            ProgressBand::Steady
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            ProgressBand::Declining => {
                "Your scores are declining. Review feedback from previous interviews, \
                 focus on your weakest areas, and practice at an easier difficulty first."
            }
            ProgressBand::Improving => {
                "Great progress! Try a higher difficulty level or explore different \
                 job positions."
            }
            ProgressBand::Steady => {
                "Steady progress. Review feedback carefully, practice consistently, \
                 and focus on your weakest categories."
            }
        }
    }
}

/// Percent change from the first to the last score in chronological order.
/// Zero when there are fewer than two results or the first score is zero.
pub fn improvement_rate(chronological: &[f64]) -> f64 {
    if chronological.len() < 2 {
        return 0.0;
    }
    let first = chronological[0];
    let last = chronological[chronological.len() - 1];
    if first <= 0.0 {
        return 0.0;
    }
    (last - first) / first * 100.0
}

/// Strongest and weakest category by average. Ties resolve to the first
/// category in declaration order.
pub fn extremes(averages: &CategoryScores) -> (CategoryAverage, CategoryAverage) {
    let entries = averages.entries();
    let mut strongest = entries[0];
    let mut weakest = entries[0];
    for &(category, value) in &entries[1..] {
        if value > strongest.1 {
            strongest = (category, value);
        }
        if value < weakest.1 {
            weakest = (category, value);
        }
    }
    (
        CategoryAverage {
            category: strongest.0,
            average: strongest.1,
        },
        CategoryAverage {
            category: weakest.0,
            average: weakest.1,
        },
    )
}

/// Computes the full analytics aggregate for one user.
pub async fn fetch_analytics(pool: &SqlitePool, user_id: &str) -> Result<AnalyticsReport, sqlx::Error> {
    let total_interviews: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM interview_results WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let average_score: f64 = sqlx::query_scalar(
        "SELECT COALESCE(AVG(total_score), 0.0) FROM interview_results WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let chronological: Vec<f64> = sqlx::query_scalar(
        "SELECT total_score FROM interview_results WHERE user_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let averages: (f64, f64, f64, f64, f64, f64, f64, f64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(AVG(communication), 0.0),
            COALESCE(AVG(problem_solving), 0.0),
            COALESCE(AVG(leadership), 0.0),
            COALESCE(AVG(teamwork), 0.0),
            COALESCE(AVG(technical_knowledge), 0.0),
            COALESCE(AVG(adaptability), 0.0),
            COALESCE(AVG(creativity), 0.0),
            COALESCE(AVG(critical_thinking), 0.0)
        FROM interview_results WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let category_averages = CategoryScores {
        communication: averages.0,
        problem_solving: averages.1,
        leadership: averages.2,
        teamwork: averages.3,
        technical_knowledge: averages.4,
        adaptability: averages.5,
        creativity: averages.6,
        critical_thinking: averages.7,
    };

    let (strongest, weakest) = if total_interviews > 0 {
        let (s, w) = extremes(&category_averages);
        (Some(s), Some(w))
    } else {
        (None, None)
    };

    Ok(AnalyticsReport {
        total_interviews,
        average_score,
        improvement_rate: improvement_rate(&chronological),
        category_averages,
        strongest,
        weakest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{sample_result, test_pool};
    use crate::store::insert_result;

    #[test]
    fn test_improvement_rate_needs_two_results() {
        assert_eq!(improvement_rate(&[]), 0.0);
        assert_eq!(improvement_rate(&[80.0]), 0.0);
    }

    #[test]
    fn test_improvement_rate_fifty_to_seventy_five_is_plus_fifty() {
        assert!((improvement_rate(&[50.0, 75.0]) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_improvement_rate_zero_first_score_is_zero() {
        assert_eq!(improvement_rate(&[0.0, 75.0]), 0.0);
    }

    #[test]
    fn test_improvement_rate_uses_endpoints_only() {
        // Middle results do not smooth the rate.
        assert!((improvement_rate(&[50.0, 95.0, 10.0, 75.0]) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_extremes_pick_max_and_min() {
        let averages = CategoryScores {
            communication: 80.0,
            problem_solving: 55.0,
            leadership: 60.0,
            teamwork: 70.0,
            technical_knowledge: 40.0,
            adaptability: 65.0,
            creativity: 62.0,
            critical_thinking: 58.0,
        };
        let (strongest, weakest) = extremes(&averages);
        assert_eq!(strongest.category, Category::Communication);
        assert_eq!(weakest.category, Category::TechnicalKnowledge);
    }

    #[test]
    fn test_extremes_tie_resolves_to_declaration_order() {
        let averages = CategoryScores {
            communication: 70.0,
            problem_solving: 70.0,
            leadership: 70.0,
            teamwork: 70.0,
            technical_knowledge: 70.0,
            adaptability: 70.0,
            creativity: 70.0,
            critical_thinking: 70.0,
        };
        let (strongest, weakest) = extremes(&averages);
        assert_eq!(strongest.category, Category::Communication);
        assert_eq!(weakest.category, Category::Communication);
    }

    #[test]
    fn test_progress_bands() {
        assert_eq!(ProgressBand::for_rate(-0.1), ProgressBand::Declining);
        assert_eq!(ProgressBand::for_rate(0.0), ProgressBand::Steady);
        assert_eq!(ProgressBand::for_rate(10.0), ProgressBand::Steady);
        assert_eq!(ProgressBand::for_rate(10.1), ProgressBand::Improving);
    }

    #[tokio::test]
    async fn test_fetch_analytics_empty_user() {
        let pool = test_pool().await;
        let report = fetch_analytics(&pool, "nobody").await.unwrap();
        assert_eq!(report.total_interviews, 0);
        assert_eq!(report.average_score, 0.0);
        assert_eq!(report.improvement_rate, 0.0);
        assert!(report.strongest.is_none());
        assert!(report.weakest.is_none());
    }

    #[tokio::test]
    async fn test_fetch_analytics_aggregates_two_results() {
        let pool = test_pool().await;
        insert_result(&pool, &sample_result("user_1", "sess_1", 50.0))
            .await
            .unwrap();
        insert_result(&pool, &sample_result("user_1", "sess_2", 75.0))
            .await
            .unwrap();

        let report = fetch_analytics(&pool, "user_1").await.unwrap();
        assert_eq!(report.total_interviews, 2);
        assert!((report.average_score - 62.5).abs() < f64::EPSILON);
        assert!((report.improvement_rate - 50.0).abs() < f64::EPSILON);
        // Uniform per-category averages: the tie-break lands on communication.
        assert_eq!(
            report.strongest.unwrap().category,
            Category::Communication
        );
    }
}
