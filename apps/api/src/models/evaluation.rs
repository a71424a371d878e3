//! Typed payloads of the external evaluation collaborator.
//!
//! The LLM returns JSON matching these shapes; a response that fails to parse
//! into them is treated as a collaborator failure and replaced by the static
//! fallback of the same shape. No duck typing survives past the parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::category::{Category, CategoryScores};

/// One generated interview question. Owned by the in-memory session; never
/// persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub category: Category,
    pub question: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub expected_answer_points: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
}

/// The résumé analysis returned alongside generated questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvAnalysis {
    pub overall_fit: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

/// Full question-generation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestions {
    pub analysis: CvAnalysis,
    pub questions: Vec<Question>,
}

/// Hiring decision as a closed enum. The serialized forms match the strings
/// the evaluation prompt asks for; anything else fails the parse and falls
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiringDecision {
    Hire,
    Maybe,
    #[serde(rename = "Don't Hire", alias = "Don't hire", alias = "DontHire")]
    DontHire,
}

/// Display treatment for a decision banner. Selected by a match on the
/// decision, one treatment per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerTone {
    Success,
    Warning,
    Danger,
}

impl HiringDecision {
    pub fn banner(&self) -> BannerTone {
        match self {
            HiringDecision::Hire => BannerTone::Success,
            HiringDecision::Maybe => BannerTone::Warning,
            HiringDecision::DontHire => BannerTone::Danger,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiringRecommendation {
    pub decision: HiringDecision,
    #[serde(default)]
    pub confidence: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevelopmentPlan {
    #[serde(default)]
    pub priority_areas: Vec<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub timeline: String,
}

/// Full-interview evaluation payload. `scores` is the only part the core
/// does arithmetic on; the rest is carried through to storage and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewEvaluation {
    pub scores: CategoryScores,
    #[serde(default)]
    pub category_feedback: BTreeMap<String, String>,
    #[serde(default)]
    pub overall_assessment: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    pub recommendation: HiringRecommendation,
    #[serde(default)]
    pub development_plan: DevelopmentPlan,
}

/// One AI job-match suggestion. Response-only; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub job_title: String,
    pub match_percentage: u32,
    #[serde(default)]
    pub match_reasons: Vec<String>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub growth_potential: String,
    #[serde(default)]
    pub difficulty_to_get: String,
}

/// Parse wrapper for the job-matching call.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRecommendations {
    pub recommendations: Vec<JobRecommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_serde_round_trip() {
        assert_eq!(
            serde_json::to_string(&HiringDecision::DontHire).unwrap(),
            r#""Don't Hire""#
        );
        let d: HiringDecision = serde_json::from_str(r#""Hire""#).unwrap();
        assert_eq!(d, HiringDecision::Hire);
    }

    #[test]
    fn test_decision_banner_mapping_is_total() {
        assert_eq!(HiringDecision::Hire.banner(), BannerTone::Success);
        assert_eq!(HiringDecision::Maybe.banner(), BannerTone::Warning);
        assert_eq!(HiringDecision::DontHire.banner(), BannerTone::Danger);
    }

    #[test]
    fn test_unknown_decision_fails_parse() {
        let result = serde_json::from_str::<HiringDecision>(r#""Strong Hire""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluation_deserializes_with_sparse_optionals() {
        let json = r#"{
            "scores": {
                "communication": 75, "problem_solving": 72, "leadership": 70,
                "teamwork": 78, "technical_knowledge": 68, "adaptability": 74,
                "creativity": 71, "critical_thinking": 73
            },
            "overall_assessment": "Solid overall",
            "recommendation": {"decision": "Maybe"}
        }"#;
        let eval: InterviewEvaluation = serde_json::from_str(json).unwrap();
        assert_eq!(eval.scores.teamwork, 78.0);
        assert_eq!(eval.recommendation.decision, HiringDecision::Maybe);
        assert!(eval.red_flags.is_empty());
        assert!(eval.development_plan.priority_areas.is_empty());
    }

    #[test]
    fn test_question_requires_known_category() {
        let json = r#"{"id": 1, "category": "charisma", "question": "Hi?"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());

        let json = r#"{"id": 1, "category": "teamwork", "question": "Tell me about a team."}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.category, Category::Teamwork);
        assert!(q.expected_answer_points.is_empty());
    }
}
