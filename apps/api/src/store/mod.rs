//! Persistence layer: parameterized queries over the SQLite store.
//!
//! Writes return plain `sqlx::Error`; callers in the interview flow catch
//! them, log a warning, and carry on; the in-memory session remains the
//! source of truth, so no flow invariant depends on a write landing.
//! Total score and pass flag arrive precomputed from the session core and
//! are stored as-is.

pub mod analytics;

use sqlx::SqlitePool;

use crate::models::profile::CandidateProfile;
use crate::models::result::{JobMarketRow, NewInterviewResult, NewQaEntry};

/// Creates or overwrites the profile keyed by `user_id`. `created_at`
/// survives an overwrite; `updated_at` is refreshed.
pub async fn upsert_profile(pool: &SqlitePool, profile: &CandidateProfile) -> Result<(), sqlx::Error> {
    let skills = serde_json::to_string(&profile.skills).unwrap_or_else(|_| "[]".to_string());
    let preferences =
        serde_json::to_string(&profile.preferences).unwrap_or_else(|_| "{}".to_string());

    sqlx::query(
        r#"
        INSERT INTO user_profiles
            (user_id, email, full_name, cv_text, cv_hash, target_job, job_category,
             experience_years, education_level, skills, preferences)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            email = excluded.email,
            full_name = excluded.full_name,
            cv_text = excluded.cv_text,
            cv_hash = excluded.cv_hash,
            target_job = excluded.target_job,
            job_category = excluded.job_category,
            experience_years = excluded.experience_years,
            education_level = excluded.education_level,
            skills = excluded.skills,
            preferences = excluded.preferences,
            updated_at = datetime('now')
        "#,
    )
    .bind(&profile.user_id)
    .bind(&profile.email)
    .bind(&profile.full_name)
    .bind(&profile.cv_text)
    .bind(&profile.cv_hash)
    .bind(&profile.target_job)
    .bind(&profile.job_category)
    .bind(profile.experience_years)
    .bind(&profile.education_level)
    .bind(skills)
    .bind(preferences)
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts the one result row a completed session produces.
pub async fn insert_result(pool: &SqlitePool, result: &NewInterviewResult) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO interview_results
            (user_id, session_id, job_title, difficulty_level,
             communication, problem_solving, leadership, teamwork,
             technical_knowledge, adaptability, creativity, critical_thinking,
             total_score, pass_status, interview_duration, questions_answered,
             interview_transcript, detailed_feedback, recommendations)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&result.user_id)
    .bind(&result.session_id)
    .bind(&result.job_title)
    .bind(&result.difficulty_level)
    .bind(result.scores.communication)
    .bind(result.scores.problem_solving)
    .bind(result.scores.leadership)
    .bind(result.scores.teamwork)
    .bind(result.scores.technical_knowledge)
    .bind(result.scores.adaptability)
    .bind(result.scores.creativity)
    .bind(result.scores.critical_thinking)
    .bind(result.total_score)
    .bind(result.pass_status)
    .bind(result.interview_duration)
    .bind(result.questions_answered)
    .bind(&result.interview_transcript)
    .bind(&result.detailed_feedback)
    .bind(&result.recommendations)
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts one answered-question row.
pub async fn insert_qa_entry(pool: &SqlitePool, entry: &NewQaEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO qa_history
            (user_id, session_id, question_id, category, question, answer,
             answer_length, response_time, score, feedback)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.user_id)
    .bind(&entry.session_id)
    .bind(entry.question_id)
    .bind(entry.category.as_str())
    .bind(&entry.question)
    .bind(&entry.answer)
    .bind(entry.answer_length)
    .bind(entry.response_time)
    .bind(entry.score)
    .bind(&entry.feedback)
    .execute(pool)
    .await?;

    Ok(())
}

/// Interview history for a user, newest first. The id tie-break keeps the
/// order stable for results created within the same second.
pub async fn fetch_history(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<crate::models::result::InterviewResultRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM interview_results
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// All job-market reference rows.
pub async fn fetch_job_market(pool: &SqlitePool) -> Result<Vec<JobMarketRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM job_market ORDER BY id")
        .fetch_all(pool)
        .await
}

const JOB_MARKET_SEED: [(&str, &str, i64, i64, &str, &str, &str); 10] = [
    ("Software Engineer", "Technology", 12_000_000, 25_000_000, "High",
     "Python,Java,JavaScript,SQL,Git", "Builds and maintains software applications"),
    ("Data Scientist", "Technology", 15_000_000, 30_000_000, "Very High",
     "Python,R,SQL,Machine Learning,Statistics", "Data analysis and machine learning"),
    ("Product Manager", "Management", 15_000_000, 35_000_000, "High",
     "Product Strategy,Agile,Communication,Analytics", "Owns the product lifecycle"),
    ("UX Designer", "Creative", 10_000_000, 20_000_000, "Medium",
     "Figma,Adobe XD,User Research,Prototyping", "Designs user experiences"),
    ("Digital Marketing", "Marketing", 8_000_000, 18_000_000, "High",
     "SEO,SEM,Social Media,Content Marketing,Analytics", "Digital marketing strategy"),
    ("Business Analyst", "Operations", 10_000_000, 22_000_000, "High",
     "SQL,Excel,Data Analysis,Business Intelligence", "Business and requirements analysis"),
    ("DevOps Engineer", "Technology", 14_000_000, 28_000_000, "Very High",
     "Docker,Kubernetes,AWS,CI/CD,Linux", "Automation and infrastructure"),
    ("HR Manager", "HR", 12_000_000, 25_000_000, "Medium",
     "Recruitment,Employee Relations,HRIS,Labor Law", "Human resources management"),
    ("Sales Manager", "Sales", 10_000_000, 30_000_000, "High",
     "Negotiation,CRM,Sales Strategy,Communication", "Leads the sales team"),
    ("Financial Analyst", "Finance", 10_000_000, 22_000_000, "Medium",
     "Financial Modeling,Excel,Accounting,Analysis", "Corporate financial analysis"),
];

/// Seeds the job-market table on first initialization. A non-empty table is
/// left untouched.
pub async fn seed_job_market(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_market")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    for (title, category, salary_min, salary_max, demand, skills, description) in JOB_MARKET_SEED {
        sqlx::query(
            r#"
            INSERT INTO job_market
                (job_title, category, avg_salary_min, avg_salary_max,
                 demand_level, required_skills, description)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(category)
        .bind(salary_min)
        .bind(salary_max)
        .bind(demand)
        .bind(skills)
        .bind(description)
        .execute(pool)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db;
    use crate::models::category::{Category, CategoryScores};
    use sqlx::sqlite::SqlitePoolOptions;

    /// Fresh in-memory database with the full schema. One connection so the
    /// in-memory store is shared across queries.
    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        pool
    }

    pub(crate) fn sample_profile(user_id: &str) -> CandidateProfile {
        CandidateProfile {
            user_id: user_id.to_string(),
            email: Some("jane@example.com".to_string()),
            full_name: Some("Jane Doe".to_string()),
            cv_text: "Ten years of experience across backend and data work.".to_string(),
            cv_hash: format!("{:x}", md5::compute(b"cv")),
            target_job: "Software Engineer".to_string(),
            job_category: Some("Technology".to_string()),
            experience_years: 10,
            education_level: Some("MSc".to_string()),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            preferences: serde_json::json!({"remote": true}),
            difficulty: Default::default(),
        }
    }

    pub(crate) fn sample_result(user_id: &str, session_id: &str, total: f64) -> NewInterviewResult {
        NewInterviewResult {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            job_title: "Software Engineer".to_string(),
            difficulty_level: "medium".to_string(),
            scores: CategoryScores {
                communication: total,
                problem_solving: total,
                leadership: total,
                teamwork: total,
                technical_knowledge: total,
                adaptability: total,
                creativity: total,
                critical_thinking: total,
            },
            total_score: total,
            pass_status: total >= 70.0,
            interview_duration: 300,
            questions_answered: 8,
            interview_transcript: "[]".to_string(),
            detailed_feedback: "{}".to_string(),
            recommendations: "{}".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_profile_overwrites_by_user_id() {
        let pool = test_pool().await;

        store_profile(&pool, "user_1", "Software Engineer").await;
        store_profile(&pool, "user_1", "Data Scientist").await;

        let (count, target_job): (i64, String) = sqlx::query_as(
            "SELECT COUNT(*), MAX(target_job) FROM user_profiles WHERE user_id = 'user_1'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(target_job, "Data Scientist");
    }

    async fn store_profile(pool: &SqlitePool, user_id: &str, target_job: &str) {
        let mut profile = sample_profile(user_id);
        profile.target_job = target_job.to_string();
        upsert_profile(pool, &profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_result_and_fetch_history_newest_first() {
        let pool = test_pool().await;

        insert_result(&pool, &sample_result("user_1", "sess_1", 50.0))
            .await
            .unwrap();
        insert_result(&pool, &sample_result("user_1", "sess_2", 75.0))
            .await
            .unwrap();
        insert_result(&pool, &sample_result("someone_else", "sess_3", 90.0))
            .await
            .unwrap();

        let history = fetch_history(&pool, "user_1", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].session_id, "sess_2");
        assert_eq!(history[1].session_id, "sess_1");
        assert!(history[0].pass_status);
        assert!(!history[1].pass_status);
        assert_eq!(history[0].scores().teamwork, 75.0);

        let limited = fetch_history(&pool, "user_1", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_session_id_is_rejected() {
        let pool = test_pool().await;
        insert_result(&pool, &sample_result("user_1", "sess_1", 70.0))
            .await
            .unwrap();
        let second = insert_result(&pool, &sample_result("user_1", "sess_1", 80.0)).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_insert_qa_entry_round_trip() {
        let pool = test_pool().await;
        let entry = NewQaEntry {
            user_id: "user_1".to_string(),
            session_id: "sess_1".to_string(),
            question_id: 0,
            category: Category::Teamwork,
            question: "Tell me about a team.".to_string(),
            answer: "We shipped it together.".to_string(),
            answer_length: 23,
            response_time: 41,
            score: None,
            feedback: None,
        };
        insert_qa_entry(&pool, &entry).await.unwrap();

        let rows: Vec<crate::models::result::QaHistoryRow> =
            sqlx::query_as("SELECT * FROM qa_history WHERE session_id = 'sess_1'")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category.as_deref(), Some("teamwork"));
        assert_eq!(rows[0].answer_length, 23);
        assert!(rows[0].score.is_none());
    }

    #[tokio::test]
    async fn test_seed_job_market_is_idempotent() {
        let pool = test_pool().await;
        seed_job_market(&pool).await.unwrap();
        seed_job_market(&pool).await.unwrap();

        let jobs = fetch_job_market(&pool).await.unwrap();
        assert_eq!(jobs.len(), 10);
        assert_eq!(jobs[0].job_title, "Software Engineer");
        assert_eq!(jobs[0].avg_salary_max, 25_000_000);
    }
}
