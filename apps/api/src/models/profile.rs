use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::category::Difficulty;

/// Candidate profile as submitted at intake. Upserted wholesale, keyed by
/// `user_id`; the résumé text is guaranteed non-empty by intake validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub cv_text: String,
    /// MD5 hex digest of `cv_text`, for change detection.
    pub cv_hash: String,
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
    pub preferences: Value,
    #[serde(default)]
    pub difficulty: Difficulty,
}
