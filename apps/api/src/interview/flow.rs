//! Interview flow orchestration.
//!
//! Intake: validate → persist profile → generate questions (fallback on
//! failure) → hand a fresh session to the registry.
//! Finish: evaluate (fallback on failure) → summarize once → persist result
//! and Q&A history → complete the machine into Results.
//!
//! Persistence failures are warnings: the response carries a saved flag and
//! the in-memory session keeps the data, so nothing the user typed is lost.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client;
use crate::models::category::{CategoryScores, Difficulty};
use crate::models::evaluation::{
    BannerTone, CvAnalysis, InterviewEvaluation, JobRecommendation, Question,
};
use crate::models::profile::CandidateProfile;
use crate::models::result::{NewInterviewResult, NewQaEntry};
use crate::session::scoring::{self, ScoreSummary};
use crate::session::validation::validate_intake;
use crate::session::{
    AnswerMeta, EvaluationOutcome, InterviewSession, Stage, UserSession, SKIPPED_SENTINEL,
};
use crate::state::AppState;
use crate::store;
use crate::viz;

#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub cv_text: String,
    pub target_job: String,
    #[serde(default)]
    pub job_category: Option<String>,
    #[serde(default)]
    pub experience_years: i64,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferences: serde_json::Value,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// The question currently in front of the user, with everything the client
/// needs to render the answer form.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub position: usize,
    pub total: usize,
    pub question: Question,
    /// Previously stored answer when revisiting; empty otherwise.
    pub prefilled_answer: String,
    pub min_answer_length: usize,
    /// Advisory only; the server never cuts an answer off.
    pub time_limit_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub session_id: String,
    pub user_id: String,
    pub stage: Stage,
    pub profile_saved: bool,
    pub analysis: CvAnalysis,
    pub question_count: usize,
    pub current_question: Option<QuestionView>,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub total_score: f64,
    pub passed: bool,
    pub grade: &'static str,
    pub duration_secs: u64,
    pub duration_formatted: String,
    pub questions_answered: usize,
    pub questions_total: usize,
}

#[derive(Debug, Serialize)]
pub struct ResultCharts {
    pub radar: viz::RadarSpec,
    pub gauge: viz::GaugeSpec,
    pub bar: viz::BarSpec,
}

#[derive(Debug, Serialize)]
pub struct FinishResponse {
    pub session_id: String,
    pub stage: Stage,
    pub summary: SummaryView,
    pub scores: CategoryScores,
    pub decision_banner: BannerTone,
    pub evaluation: InterviewEvaluation,
    pub job_recommendations: Vec<JobRecommendation>,
    pub charts: ResultCharts,
    /// False when the result row did not reach storage; the session still
    /// holds everything and the report stays exportable.
    pub saved: bool,
}

pub fn question_view(interview: &InterviewSession, config: &Config) -> Option<QuestionView> {
    interview.current_question().map(|question| QuestionView {
        position: interview.position(),
        total: interview.total(),
        question: question.clone(),
        prefilled_answer: interview.prefilled_answer().to_string(),
        min_answer_length: config.min_answer_length,
        time_limit_secs: config.question_time_limit_secs,
    })
}

fn new_session_id() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("sess_{timestamp}_{}", &suffix[..8])
}

/// Intake → Interviewing. Validation rejections return before anything is
/// created; collaborator failure degrades to the fallback question set.
pub async fn start_interview(state: &AppState, req: IntakeRequest) -> Result<IntakeResponse, AppError> {
    validate_intake(&req.cv_text, &req.target_job)?;

    let user_id = req
        .user_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("user_{}", Uuid::new_v4().simple()));

    let profile = CandidateProfile {
        user_id: user_id.clone(),
        email: req.email,
        full_name: req.full_name,
        cv_hash: format!("{:x}", md5::compute(req.cv_text.as_bytes())),
        cv_text: req.cv_text,
        target_job: req.target_job,
        job_category: req.job_category,
        experience_years: req.experience_years,
        education_level: req.education_level,
        skills: req.skills,
        preferences: req.preferences,
        difficulty: req.difficulty,
    };

    let profile_saved = match store::upsert_profile(&state.db, &profile).await {
        Ok(()) => true,
        Err(e) => {
            warn!("failed to save profile for {user_id}: {e}");
            false
        }
    };

    let generated = llm_client::generate_questions(
        &state.llm,
        &profile.cv_text,
        &profile.target_job,
        req.difficulty,
        state.config.max_questions,
    )
    .await;
    let question_count = generated.questions.len();
    info!("starting interview for {user_id}: {question_count} questions");

    let session_id = new_session_id();
    let mut session = UserSession::new(user_id.clone());
    session.begin_interview(
        profile,
        InterviewSession::new(session_id.clone(), generated.questions, req.difficulty),
    )?;

    let current_question = session
        .interview()
        .and_then(|i| question_view(i, &state.config));

    state.lock_sessions().insert(session_id.clone(), session);

    Ok(IntakeResponse {
        session_id,
        user_id,
        stage: Stage::Interviewing,
        profile_saved,
        analysis: generated.analysis,
        question_count,
        current_question,
    })
}

/// Everything finish needs, copied out so the registry lock is not held
/// across the evaluation call.
struct FinishSnapshot {
    user_id: String,
    questions: Vec<Question>,
    answers: Vec<String>,
    metadata: Vec<AnswerMeta>,
    transcript: Vec<(String, String)>,
    duration_secs: u64,
    answered: usize,
    difficulty: Difficulty,
    cv_text: String,
    target_job: String,
}

/// Evaluating → Results. The evaluation always yields a usable payload; the
/// machine transition cannot be blocked by a broken backend.
pub async fn finish_interview(state: &AppState, session_id: &str) -> Result<FinishResponse, AppError> {
    let snapshot = {
        let sessions = state.lock_sessions();
        let session = sessions
            .get(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
        if session.stage() != Stage::Evaluating {
            return Err(AppError::Conflict(
                "interview is not ready for evaluation".to_string(),
            ));
        }
        let interview = session
            .interview()
            .ok_or_else(|| AppError::Conflict("no interview on this session".to_string()))?;
        let profile = session
            .profile()
            .ok_or_else(|| AppError::Conflict("no profile on this session".to_string()))?;
        FinishSnapshot {
            user_id: session.user_id.clone(),
            questions: interview.questions().to_vec(),
            answers: interview.answers().to_vec(),
            metadata: interview.metadata().to_vec(),
            transcript: interview.transcript_pairs(),
            duration_secs: interview.elapsed_secs(),
            answered: interview.answered_count(),
            difficulty: interview.difficulty,
            cv_text: profile.cv_text.clone(),
            target_job: profile.target_job.clone(),
        }
    };

    let evaluation = llm_client::evaluate_interview(
        &state.llm,
        &snapshot.questions,
        &snapshot.answers,
        &snapshot.cv_text,
        &snapshot.target_job,
    )
    .await;

    // The one authoritative total/pass computation; stored and returned as-is.
    let summary = scoring::summarize(&evaluation.scores, state.config.passing_score);

    let result = NewInterviewResult {
        user_id: snapshot.user_id.clone(),
        session_id: session_id.to_string(),
        job_title: snapshot.target_job.clone(),
        difficulty_level: snapshot.difficulty.to_string(),
        scores: evaluation.scores,
        total_score: summary.total_score,
        pass_status: summary.passed,
        interview_duration: snapshot.duration_secs as i64,
        questions_answered: snapshot.answered as i64,
        interview_transcript: serde_json::to_string(&snapshot.transcript)
            .unwrap_or_else(|_| "[]".to_string()),
        detailed_feedback: serde_json::to_string(&evaluation).unwrap_or_else(|_| "{}".to_string()),
        recommendations: serde_json::to_string(&evaluation.recommendation)
            .unwrap_or_else(|_| "{}".to_string()),
    };

    let saved = match store::insert_result(&state.db, &result).await {
        Ok(()) => true,
        Err(e) => {
            warn!("failed to save result for session {session_id}: {e}");
            false
        }
    };

    for entry in qa_entries(
        &snapshot.user_id,
        session_id,
        &snapshot.questions,
        &snapshot.answers,
        &snapshot.metadata,
    ) {
        if let Err(e) = store::insert_qa_entry(&state.db, &entry).await {
            warn!(
                "failed to save Q&A entry {} for session {session_id}: {e}",
                entry.question_id
            );
        }
    }

    let job_market = match store::fetch_job_market(&state.db).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("failed to load job market: {e}");
            Vec::new()
        }
    };
    let job_recommendations = if job_market.is_empty() {
        Vec::new()
    } else {
        llm_client::recommend_jobs(&state.llm, &snapshot.cv_text, &evaluation.scores, &job_market)
            .await
    };

    let outcome = EvaluationOutcome {
        evaluation: evaluation.clone(),
        summary,
        duration_secs: snapshot.duration_secs,
        questions_answered: snapshot.answered,
        persisted: saved,
    };
    {
        let mut sessions = state.lock_sessions();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
        session.complete_evaluation(outcome)?;
    }

    info!(
        "session {session_id} evaluated: total {:.1}, passed: {}",
        summary.total_score, summary.passed
    );

    Ok(FinishResponse {
        session_id: session_id.to_string(),
        stage: Stage::Results,
        summary: summary_view(&summary, &snapshot),
        scores: evaluation.scores,
        decision_banner: evaluation.recommendation.decision.banner(),
        charts: ResultCharts {
            radar: viz::radar_chart(&evaluation.scores),
            gauge: viz::gauge_chart(summary.total_score, state.config.passing_score),
            bar: viz::bar_chart(&evaluation.scores, "Category Breakdown"),
        },
        evaluation,
        job_recommendations,
        saved,
    })
}

fn summary_view(summary: &ScoreSummary, snapshot: &FinishSnapshot) -> SummaryView {
    SummaryView {
        total_score: summary.total_score,
        passed: summary.passed,
        grade: summary.grade.label(),
        duration_secs: snapshot.duration_secs,
        duration_formatted: scoring::format_duration(snapshot.duration_secs),
        questions_answered: snapshot.answered,
        questions_total: snapshot.questions.len(),
    }
}

/// One history entry per answered, non-skipped question.
fn qa_entries(
    user_id: &str,
    session_id: &str,
    questions: &[Question],
    answers: &[String],
    metadata: &[AnswerMeta],
) -> Vec<NewQaEntry> {
    questions
        .iter()
        .zip(answers)
        .enumerate()
        .filter(|(_, (_, answer))| answer.as_str() != SKIPPED_SENTINEL)
        .map(|(i, (question, answer))| NewQaEntry {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            question_id: i as i64,
            category: question.category,
            question: question.question.clone(),
            answer: answer.clone(),
            answer_length: answer.len() as i64,
            response_time: metadata
                .get(i)
                .map(|m| m.response_time_secs as i64)
                .unwrap_or(0),
            score: None,
            feedback: None,
        })
        .collect()
}
