//! The interview session core: a stage machine over an in-memory session.
//!
//! Stages run `Intake → Interviewing → Evaluating → Results`, with `History`
//! and `Analytics` reachable from anywhere and returning to their origin.
//! `Interviewing` carries a position counter rather than sub-states.
//!
//! The machine is availability-first: collaborator failures upstream are
//! resolved to fallback payloads before they reach these transitions, so no
//! transition here can stall on a broken AI backend. The in-memory session
//! is the source of truth until the final commit; it is handed to the store
//! exactly once, at the Results transition.

pub mod scoring;
pub mod validation;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::category::Difficulty;
use crate::models::evaluation::{InterviewEvaluation, Question};
use crate::models::profile::CandidateProfile;
use crate::session::scoring::ScoreSummary;

/// Stored in place of an answer when the user skips a question.
pub const SKIPPED_SENTINEL: &str = "[Skipped]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Intake,
    Interviewing,
    Evaluating,
    Results,
    History,
    Analytics,
}

/// Side states reachable from any stage via explicit navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideTarget {
    History,
    Analytics,
}

/// Rejected transitions. Guard failures do not advance the machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("answer is too short (minimum {min} characters)")]
    AnswerTooShort { min: usize },
    #[error("no interview is in progress")]
    NotInterviewing,
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("interview is not ready for evaluation")]
    NotEvaluating,
    #[error("an interview is already in progress")]
    AlreadyStarted,
}

/// Per-answer metadata kept parallel to the answer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerMeta {
    pub response_time_secs: u64,
    pub skipped: bool,
}

/// Where the machine landed after an answer/skip/back transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerProgress {
    pub position: usize,
    pub total: usize,
    pub stage: Stage,
}

/// One interview attempt, held in memory only. Created when question
/// generation succeeds, discarded when the session is reset or dropped.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub id: String,
    pub difficulty: Difficulty,
    questions: Vec<Question>,
    answers: Vec<String>,
    metadata: Vec<AnswerMeta>,
    position: usize,
    started_at: Instant,
    question_started_at: Instant,
}

impl InterviewSession {
    pub fn new(id: String, questions: Vec<Question>, difficulty: Difficulty) -> Self {
        let now = Instant::now();
        Self {
            id,
            difficulty,
            questions,
            answers: Vec::new(),
            metadata: Vec::new(),
            position: 0,
            started_at: now,
            question_started_at: now,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_complete(&self) -> bool {
        self.position == self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn metadata(&self) -> &[AnswerMeta] {
        &self.metadata
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    /// Previously stored answer at the current position, for pre-filling the
    /// input after navigating back. The skip sentinel is cleared to empty.
    pub fn prefilled_answer(&self) -> &str {
        match self.answers.get(self.position) {
            Some(a) if a != SKIPPED_SENTINEL => a,
            _ => "",
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Answers that are present and not the skip sentinel.
    pub fn answered_count(&self) -> usize {
        self.metadata.iter().filter(|m| !m.skipped).count()
    }

    /// Ordered (question, answer) pairs for the transcript. Questions without
    /// a stored answer (abandoned mid-flight) are omitted.
    pub fn transcript_pairs(&self) -> Vec<(String, String)> {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(q, a)| (q.question.clone(), a.clone()))
            .collect()
    }

    fn store_at_position(&mut self, answer: String, meta: AnswerMeta) {
        if self.position < self.answers.len() {
            self.answers[self.position] = answer;
            self.metadata[self.position] = meta;
        } else {
            self.answers.push(answer);
            self.metadata.push(meta);
        }
        self.position += 1;
        self.question_started_at = Instant::now();
    }

    fn record_answer(&mut self, answer: String) {
        let meta = AnswerMeta {
            response_time_secs: self.question_started_at.elapsed().as_secs(),
            skipped: false,
        };
        self.store_at_position(answer, meta);
    }

    fn record_skip(&mut self) {
        let meta = AnswerMeta {
            response_time_secs: 0,
            skipped: true,
        };
        self.store_at_position(SKIPPED_SENTINEL.to_string(), meta);
    }

    fn step_back(&mut self) -> Result<(), FlowError> {
        if self.position == 0 {
            return Err(FlowError::AtFirstQuestion);
        }
        self.position -= 1;
        self.question_started_at = Instant::now();
        Ok(())
    }
}

/// Result of a completed evaluation, kept on the session so the report stays
/// exportable even when the database write was lost.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub evaluation: InterviewEvaluation,
    pub summary: ScoreSummary,
    pub duration_secs: u64,
    pub questions_answered: usize,
    /// Whether the result row made it to storage. Informational only.
    pub persisted: bool,
}

/// One user's place in the interview flow. Constructed at session start,
/// handed explicitly to each stage handler, destroyed at session end.
#[derive(Debug)]
pub struct UserSession {
    pub user_id: String,
    stage: Stage,
    origin: Option<Stage>,
    profile: Option<CandidateProfile>,
    interview: Option<InterviewSession>,
    outcome: Option<EvaluationOutcome>,
}

impl UserSession {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            stage: Stage::Intake,
            origin: None,
            profile: None,
            interview: None,
            outcome: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn profile(&self) -> Option<&CandidateProfile> {
        self.profile.as_ref()
    }

    pub fn interview(&self) -> Option<&InterviewSession> {
        self.interview.as_ref()
    }

    pub fn outcome(&self) -> Option<&EvaluationOutcome> {
        self.outcome.as_ref()
    }

    /// Intake → Interviewing. The caller has already validated the intake
    /// form and obtained questions (live or fallback).
    pub fn begin_interview(
        &mut self,
        profile: CandidateProfile,
        interview: InterviewSession,
    ) -> Result<(), FlowError> {
        if self.stage != Stage::Intake {
            return Err(FlowError::AlreadyStarted);
        }
        self.profile = Some(profile);
        self.interview = Some(interview);
        self.stage = Stage::Interviewing;
        Ok(())
    }

    /// Interviewing → Interviewing(position+1), or Evaluating at the end.
    pub fn submit_answer(&mut self, answer: &str, min_length: usize) -> Result<AnswerProgress, FlowError> {
        if self.stage != Stage::Interviewing {
            return Err(FlowError::NotInterviewing);
        }
        if answer.len() < min_length {
            return Err(FlowError::AnswerTooShort { min: min_length });
        }
        let interview = self.interview.as_mut().ok_or(FlowError::NotInterviewing)?;
        interview.record_answer(answer.to_string());
        let (position, total, complete) =
            (interview.position(), interview.total(), interview.is_complete());
        if complete {
            self.stage = Stage::Evaluating;
        }
        Ok(AnswerProgress {
            position,
            total,
            stage: self.stage,
        })
    }

    /// Interviewing → Interviewing(position+1) or Evaluating, no length guard.
    pub fn skip(&mut self) -> Result<AnswerProgress, FlowError> {
        if self.stage != Stage::Interviewing {
            return Err(FlowError::NotInterviewing);
        }
        let interview = self.interview.as_mut().ok_or(FlowError::NotInterviewing)?;
        interview.record_skip();
        let (position, total, complete) =
            (interview.position(), interview.total(), interview.is_complete());
        if complete {
            self.stage = Stage::Evaluating;
        }
        Ok(AnswerProgress {
            position,
            total,
            stage: self.stage,
        })
    }

    /// Interviewing → Interviewing(position-1).
    pub fn go_back(&mut self) -> Result<AnswerProgress, FlowError> {
        if self.stage != Stage::Interviewing {
            return Err(FlowError::NotInterviewing);
        }
        let interview = self.interview.as_mut().ok_or(FlowError::NotInterviewing)?;
        interview.step_back()?;
        Ok(AnswerProgress {
            position: interview.position(),
            total: interview.total(),
            stage: self.stage,
        })
    }

    /// Evaluating → Results. The outcome always exists by this point; a
    /// failed evaluation arrives here as the fallback payload.
    pub fn complete_evaluation(&mut self, outcome: EvaluationOutcome) -> Result<(), FlowError> {
        if self.stage != Stage::Evaluating {
            return Err(FlowError::NotEvaluating);
        }
        self.outcome = Some(outcome);
        self.stage = Stage::Results;
        Ok(())
    }

    /// Back to Intake, discarding the in-progress interview and any results.
    /// The profile survives; the user identity does not change.
    pub fn start_new(&mut self) {
        self.stage = Stage::Intake;
        self.origin = None;
        self.interview = None;
        self.outcome = None;
    }

    /// Any stage → History/Analytics. The origin is recorded once; hopping
    /// between the two side states keeps the original origin.
    pub fn navigate_to(&mut self, target: SideTarget) {
        if !matches!(self.stage, Stage::History | Stage::Analytics) {
            self.origin = Some(self.stage);
        }
        self.stage = match target {
            SideTarget::History => Stage::History,
            SideTarget::Analytics => Stage::Analytics,
        };
    }

    /// Leave a side state: back to the recorded origin, or Intake when there
    /// is none. No-op outside History/Analytics.
    pub fn navigate_back(&mut self) {
        if matches!(self.stage, Stage::History | Stage::Analytics) {
            self.stage = self.origin.take().unwrap_or(Stage::Intake);
        }
    }
}
