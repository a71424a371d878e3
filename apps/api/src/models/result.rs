#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::category::{Category, CategoryScores};

/// A finished interview as handed to the store. Total score and pass flag
/// arrive precomputed from the session core; the store never re-derives them.
#[derive(Debug, Clone)]
pub struct NewInterviewResult {
    pub user_id: String,
    pub session_id: String,
    pub job_title: String,
    pub difficulty_level: String,
    pub scores: CategoryScores,
    pub total_score: f64,
    pub pass_status: bool,
    pub interview_duration: i64,
    pub questions_answered: i64,
    /// JSON array of (question, answer) pairs.
    pub interview_transcript: String,
    /// Full serialized evaluation payload.
    pub detailed_feedback: String,
    /// Serialized hiring recommendation.
    pub recommendations: String,
}

/// `interview_results` row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewResultRow {
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    pub job_title: String,
    pub difficulty_level: Option<String>,
    pub communication: f64,
    pub problem_solving: f64,
    pub leadership: f64,
    pub teamwork: f64,
    pub technical_knowledge: f64,
    pub adaptability: f64,
    pub creativity: f64,
    pub critical_thinking: f64,
    pub total_score: f64,
    pub pass_status: bool,
    pub interview_duration: i64,
    pub questions_answered: i64,
    pub interview_transcript: Option<String>,
    pub detailed_feedback: Option<String>,
    pub recommendations: Option<String>,
    pub created_at: String,
}

impl InterviewResultRow {
    pub fn scores(&self) -> CategoryScores {
        CategoryScores {
            communication: self.communication,
            problem_solving: self.problem_solving,
            leadership: self.leadership,
            teamwork: self.teamwork,
            technical_knowledge: self.technical_knowledge,
            adaptability: self.adaptability,
            creativity: self.creativity,
            critical_thinking: self.critical_thinking,
        }
    }
}

/// One answered (non-skipped) question, as handed to the store.
#[derive(Debug, Clone)]
pub struct NewQaEntry {
    pub user_id: String,
    pub session_id: String,
    pub question_id: i64,
    pub category: Category,
    pub question: String,
    pub answer: String,
    pub answer_length: i64,
    pub response_time: i64,
    pub score: Option<f64>,
    pub feedback: Option<String>,
}

/// `qa_history` row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QaHistoryRow {
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    pub question_id: i64,
    pub category: Option<String>,
    pub question: String,
    pub answer: String,
    pub answer_length: i64,
    pub response_time: i64,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub timestamp: String,
}

/// `job_market` reference row. Seeded once, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMarketRow {
    pub id: i64,
    pub job_title: String,
    pub category: Option<String>,
    pub avg_salary_min: i64,
    pub avg_salary_max: i64,
    pub demand_level: Option<String>,
    /// Comma-separated skill list, as seeded.
    pub required_skills: Option<String>,
    pub description: Option<String>,
    pub updated_at: String,
}
