use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Creates the SQLite pool, creating the database file on first run.
pub async fn create_pool(database_path: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_path}...");

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Schema, one statement per entry. All statements are idempotent.
const SCHEMA: [&str; 8] = [
    r#"
    CREATE TABLE IF NOT EXISTS user_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT UNIQUE NOT NULL,
        email TEXT,
        full_name TEXT,
        cv_text TEXT NOT NULL,
        cv_hash TEXT,
        target_job TEXT NOT NULL,
        job_category TEXT,
        experience_years INTEGER NOT NULL DEFAULT 0,
        education_level TEXT,
        skills TEXT,
        preferences TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS interview_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        session_id TEXT UNIQUE NOT NULL,
        job_title TEXT NOT NULL,
        difficulty_level TEXT,
        communication REAL NOT NULL DEFAULT 0,
        problem_solving REAL NOT NULL DEFAULT 0,
        leadership REAL NOT NULL DEFAULT 0,
        teamwork REAL NOT NULL DEFAULT 0,
        technical_knowledge REAL NOT NULL DEFAULT 0,
        adaptability REAL NOT NULL DEFAULT 0,
        creativity REAL NOT NULL DEFAULT 0,
        critical_thinking REAL NOT NULL DEFAULT 0,
        total_score REAL NOT NULL DEFAULT 0,
        pass_status INTEGER NOT NULL DEFAULT 0,
        interview_duration INTEGER NOT NULL DEFAULT 0,
        questions_answered INTEGER NOT NULL DEFAULT 0,
        interview_transcript TEXT,
        detailed_feedback TEXT,
        recommendations TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY (user_id) REFERENCES user_profiles(user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS qa_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        session_id TEXT NOT NULL,
        question_id INTEGER NOT NULL DEFAULT 0,
        category TEXT,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        answer_length INTEGER NOT NULL DEFAULT 0,
        response_time INTEGER NOT NULL DEFAULT 0,
        score REAL,
        feedback TEXT,
        timestamp TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY (session_id) REFERENCES interview_results(session_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_progress (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        metric_name TEXT NOT NULL,
        metric_value REAL,
        improvement_rate REAL,
        recorded_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_market (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        job_title TEXT NOT NULL,
        category TEXT,
        avg_salary_min INTEGER NOT NULL DEFAULT 0,
        avg_salary_max INTEGER NOT NULL DEFAULT 0,
        demand_level TEXT,
        required_skills TEXT,
        description TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_user_id ON interview_results(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_session_id ON qa_history(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_created_at ON interview_results(created_at)",
];

/// Creates all tables and indexes if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_creates_file_and_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview_test.db");
        let pool = create_pool(path.to_str().unwrap()).await.unwrap();

        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        assert!(path.exists());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM interview_results")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
        pool.close().await;
    }
}
