//! On-demand report export for a finished session: the full evaluation plus
//! the ordered transcript, rendered as indented UTF-8 JSON with non-ASCII
//! characters preserved literally.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::category::CategoryScores;
use crate::models::evaluation::InterviewEvaluation;
use crate::session::UserSession;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub session_id: String,
    pub generated_at: String,
    pub job_title: String,
    pub scores: CategoryScores,
    pub evaluation: InterviewEvaluation,
    /// Ordered (question, answer) pairs, skip sentinel included.
    pub qa_pairs: Vec<(String, String)>,
}

/// Builds the export document from a session that reached Results.
/// Returns None before the evaluation has completed.
pub fn build_report(session: &UserSession) -> Option<ExportReport> {
    let interview = session.interview()?;
    let outcome = session.outcome()?;
    let job_title = session
        .profile()
        .map(|p| p.target_job.clone())
        .unwrap_or_default();

    Some(ExportReport {
        session_id: interview.id.clone(),
        generated_at: Utc::now().to_rfc3339(),
        job_title,
        scores: outcome.evaluation.scores,
        evaluation: outcome.evaluation.clone(),
        qa_pairs: interview.transcript_pairs(),
    })
}

/// Indented serialization. `serde_json` writes UTF-8 without escaping
/// non-ASCII, which is exactly the contract for the download.
pub fn render_report(report: &ExportReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fallback;

    fn sample_report() -> ExportReport {
        let evaluation = fallback::fallback_evaluation();
        ExportReport {
            session_id: "sess_20250101120000_ab12cd34".to_string(),
            generated_at: "2025-01-01T12:30:00+00:00".to_string(),
            job_title: "Ingénieur Logiciel".to_string(),
            scores: evaluation.scores,
            evaluation,
            qa_pairs: vec![
                (
                    "Tell me about a deployment that went wrong.".to_string(),
                    "Déployé à 100% après un rollback surprise — touché.".to_string(),
                ),
                ("Second question?".to_string(), "[Skipped]".to_string()),
            ],
        }
    }

    #[test]
    fn test_report_round_trips_exactly() {
        let report = sample_report();
        let rendered = render_report(&report).unwrap();
        let parsed: ExportReport = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed.session_id, report.session_id);
        assert_eq!(parsed.scores, report.scores);
        assert_eq!(parsed.qa_pairs, report.qa_pairs);
        assert_eq!(parsed.job_title, report.job_title);
    }

    #[test]
    fn test_rendered_report_is_indented_and_keeps_non_ascii() {
        let rendered = render_report(&sample_report()).unwrap();
        assert!(rendered.contains("\n  "));
        // Non-ASCII stays literal, not \u-escaped.
        assert!(rendered.contains("Déployé"));
        assert!(!rendered.contains("\\u00e9"));
    }
}
