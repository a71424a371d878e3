//! HTTP handlers: one canonical handler per stage operation, all thin
//! wrappers over the session machine, the flow orchestration, and the store.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::interview::flow::{self, FinishResponse, IntakeRequest, IntakeResponse, QuestionView};
use crate::interview::report;
use crate::models::result::{InterviewResultRow, JobMarketRow};
use crate::pdf;
use crate::session::scoring::Grade;
use crate::session::{AnswerProgress, SideTarget, Stage};
use crate::state::AppState;
use crate::store::{self, analytics};
use crate::viz;

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions (intake submission)
pub async fn handle_intake(
    State(state): State<AppState>,
    Json(req): Json<IntakeRequest>,
) -> Result<Json<IntakeResponse>, AppError> {
    let response = flow::start_interview(&state, req).await?;
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub user_id: String,
    pub stage: Stage,
    pub elapsed_secs: Option<u64>,
    pub answered: Option<usize>,
    pub current_question: Option<QuestionView>,
    /// Present once the session has reached Results.
    pub result: Option<ResultBrief>,
}

#[derive(Serialize)]
pub struct ResultBrief {
    pub total_score: f64,
    pub passed: bool,
    pub grade: &'static str,
    pub duration_secs: u64,
    pub questions_answered: usize,
    pub saved: bool,
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let sessions = state.lock_sessions();
    let session = sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    let interview = session.interview();
    let result = session.outcome().map(|outcome| ResultBrief {
        total_score: outcome.summary.total_score,
        passed: outcome.summary.passed,
        grade: outcome.summary.grade.label(),
        duration_secs: outcome.duration_secs,
        questions_answered: outcome.questions_answered,
        saved: outcome.persisted,
    });
    Ok(Json(SessionView {
        session_id: id,
        user_id: session.user_id.clone(),
        stage: session.stage(),
        elapsed_secs: interview.map(|i| i.elapsed_secs()),
        answered: interview.map(|i| i.answered_count()),
        current_question: interview.and_then(|i| flow::question_view(i, &state.config)),
        result,
    }))
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Serialize)]
pub struct StepResponse {
    #[serde(flatten)]
    pub progress: AnswerProgress,
    pub current_question: Option<QuestionView>,
}

/// POST /api/v1/sessions/:id/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<StepResponse>, AppError> {
    step_session(&state, &id, |session| {
        session.submit_answer(&req.answer, state.config.min_answer_length)
    })
}

/// POST /api/v1/sessions/:id/skip
pub async fn handle_skip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StepResponse>, AppError> {
    step_session(&state, &id, |session| session.skip())
}

/// POST /api/v1/sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StepResponse>, AppError> {
    step_session(&state, &id, |session| session.go_back())
}

fn step_session(
    state: &AppState,
    id: &str,
    step: impl FnOnce(&mut crate::session::UserSession) -> Result<AnswerProgress, crate::session::FlowError>,
) -> Result<Json<StepResponse>, AppError> {
    let mut sessions = state.lock_sessions();
    let session = sessions
        .get_mut(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    let progress = step(session)?;
    let current_question = session
        .interview()
        .and_then(|i| flow::question_view(i, &state.config));
    Ok(Json(StepResponse {
        progress,
        current_question,
    }))
}

/// POST /api/v1/sessions/:id/finish (evaluation and persistence)
pub async fn handle_finish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FinishResponse>, AppError> {
    let response = flow::finish_interview(&state, &id).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigateTarget {
    History,
    Analytics,
    Back,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub target: NavigateTarget,
}

#[derive(Serialize)]
pub struct NavigateResponse {
    pub stage: Stage,
}

/// POST /api/v1/sessions/:id/navigate (side-state navigation)
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, AppError> {
    let mut sessions = state.lock_sessions();
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    match req.target {
        NavigateTarget::History => session.navigate_to(SideTarget::History),
        NavigateTarget::Analytics => session.navigate_to(SideTarget::Analytics),
        NavigateTarget::Back => session.navigate_back(),
    }
    Ok(Json(NavigateResponse {
        stage: session.stage(),
    }))
}

/// GET /api/v1/sessions/:id/report (export document download)
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let rendered = {
        let sessions = state.lock_sessions();
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        let export = report::build_report(session).ok_or_else(|| {
            AppError::Conflict("no results to export for this session".to_string())
        })?;
        report::render_report(&export)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to render report: {e}")))?
    };

    let headers = [
        (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"interview_report_{id}.json\""),
        ),
    ];
    Ok((headers, rendered).into_response())
}

/// DELETE /api/v1/sessions/:id (start new: discard the session)
pub async fn handle_discard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.lock_sessions().remove(&id);
    if removed.is_none() {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// History / analytics / reference data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub user_id: String,
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    10
}

#[derive(Serialize)]
pub struct HistorySummary {
    pub total: usize,
    pub average_score: f64,
    pub passed: usize,
    pub pass_rate: f64,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub summary: HistorySummary,
    pub results: Vec<InterviewResultRow>,
}

/// GET /api/v1/history?user_id=&limit=
pub async fn handle_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let results = store::fetch_history(&state.db, &query.user_id, query.limit).await?;
    Ok(Json(HistoryResponse {
        summary: summarize_history(&results),
        results,
    }))
}

fn summarize_history(results: &[InterviewResultRow]) -> HistorySummary {
    let total = results.len();
    let passed = results.iter().filter(|r| r.pass_status).count();
    let average_score = if total > 0 {
        results.iter().map(|r| r.total_score).sum::<f64>() / total as f64
    } else {
        0.0
    };
    let pass_rate = if total > 0 {
        passed as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    HistorySummary {
        total,
        average_score,
        passed,
        pass_rate,
    }
}

#[derive(Deserialize)]
pub struct AnalyticsQuery {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct AnalyticsCharts {
    pub category_bar: viz::BarSpec,
    pub timeline: viz::TimelineSpec,
}

#[derive(Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub report: analytics::AnalyticsReport,
    pub grade: &'static str,
    pub progress_band: analytics::ProgressBand,
    pub advice: &'static str,
    pub charts: AnalyticsCharts,
}

/// GET /api/v1/analytics?user_id=
pub async fn handle_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    if !state.config.enable_analytics {
        return Err(AppError::FeatureUnavailable(
            "analytics are disabled".to_string(),
        ));
    }

    let report = analytics::fetch_analytics(&state.db, &query.user_id).await?;
    let history = store::fetch_history(&state.db, &query.user_id, 20).await?;
    let band = analytics::ProgressBand::for_rate(report.improvement_rate);

    Ok(Json(AnalyticsResponse {
        grade: Grade::for_score(report.average_score).label(),
        progress_band: band,
        advice: band.advice(),
        charts: AnalyticsCharts {
            category_bar: viz::bar_chart(&report.category_averages, "Average Score by Category"),
            timeline: viz::progress_timeline(&history, state.config.passing_score),
        },
        report,
    }))
}

/// GET /api/v1/jobs (job-market reference rows)
pub async fn handle_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobMarketRow>>, AppError> {
    let jobs = store::fetch_job_market(&state.db).await?;
    Ok(Json(jobs))
}

// ────────────────────────────────────────────────────────────────────────────
// Degradable features: PDF extraction, narration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CvExtractResponse {
    pub cv_text: String,
    pub characters: usize,
}

/// POST /api/v1/cv/extract (multipart PDF upload to CV text)
pub async fn handle_cv_extract(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CvExtractResponse>, AppError> {
    if !pdf::is_available() {
        return Err(pdf::PdfError::Unavailable.into());
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        let cv_text = pdf::extract_text(&data)?;
        return Ok(Json(CvExtractResponse {
            characters: cv_text.len(),
            cv_text,
        }));
    }

    Err(AppError::Validation(
        "missing 'file' field in upload".to_string(),
    ))
}

#[derive(Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// POST /api/v1/speech (question narration as MP3)
pub async fn handle_speech(
    State(state): State<AppState>,
    Json(req): Json<SpeechRequest>,
) -> Result<Response, AppError> {
    let audio = state.narrator.narrate(&req.text).await.map_err(|e| {
        warn!("narration failed: {e}");
        AppError::from(e)
    })?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}
