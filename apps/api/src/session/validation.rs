//! Intake validation guards. A rejection here means the Intake stage does
//! not advance; the message is shown to the user as-is.
//!
//! Lengths are counted on the raw text (`str::len`), the language-native
//! length operation. The tests stick to ASCII input on purpose.

use thiserror::Error;

pub const CV_MIN_CHARS: usize = 100;
pub const CV_MAX_CHARS: usize = 10_000;

/// A CV must mention at least one of these to be worth interviewing on.
const EXPERIENCE_KEYWORDS: [&str; 4] = ["experience", "work", "employment", "career"];
const SKILL_KEYWORDS: [&str; 4] = ["skill", "competen", "proficien", "expertise"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("CV is too short (minimum 100 characters)")]
    CvTooShort,
    #[error("CV is too long (maximum 10,000 characters)")]
    CvTooLong,
    #[error("CV must mention experience or skills")]
    CvMissingSubstance,
    #[error("Target job must not be empty")]
    MissingTargetJob,
}

/// Validates the résumé text alone.
pub fn validate_cv(cv_text: &str) -> Result<(), IntakeError> {
    if cv_text.trim().len() < CV_MIN_CHARS {
        return Err(IntakeError::CvTooShort);
    }
    if cv_text.len() > CV_MAX_CHARS {
        return Err(IntakeError::CvTooLong);
    }

    let lowered = cv_text.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));
    if !mentions(&EXPERIENCE_KEYWORDS) && !mentions(&SKILL_KEYWORDS) {
        return Err(IntakeError::CvMissingSubstance);
    }

    Ok(())
}

/// Validates the whole intake form: résumé plus target job.
pub fn validate_intake(cv_text: &str, target_job: &str) -> Result<(), IntakeError> {
    validate_cv(cv_text)?;
    if target_job.trim().is_empty() {
        return Err(IntakeError::MissingTargetJob);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `len`-character ASCII CV that passes the keyword check.
    fn cv_of_len(len: usize) -> String {
        let prefix = "experience ";
        assert!(len >= prefix.len());
        format!("{prefix}{}", "x".repeat(len - prefix.len()))
    }

    #[test]
    fn test_cv_length_boundaries() {
        assert_eq!(validate_cv(&cv_of_len(99)), Err(IntakeError::CvTooShort));
        assert_eq!(validate_cv(&cv_of_len(100)), Ok(()));
        assert_eq!(validate_cv(&cv_of_len(10_000)), Ok(()));
        assert_eq!(validate_cv(&cv_of_len(10_001)), Err(IntakeError::CvTooLong));
    }

    #[test]
    fn test_whitespace_does_not_count_toward_minimum() {
        let padded = format!("   {}   ", cv_of_len(99));
        assert_eq!(validate_cv(&padded), Err(IntakeError::CvTooShort));
    }

    #[test]
    fn test_cv_without_substance_keywords_is_rejected() {
        let bland = "y".repeat(200);
        assert_eq!(validate_cv(&bland), Err(IntakeError::CvMissingSubstance));

        let skills_only = format!("skilled in many things {}", "y".repeat(180));
        assert_eq!(validate_cv(&skills_only), Ok(()));
    }

    #[test]
    fn test_keyword_check_is_case_insensitive() {
        let shouty = format!("EXPERIENCE {}", "y".repeat(150));
        assert_eq!(validate_cv(&shouty), Ok(()));
    }

    #[test]
    fn test_target_job_required() {
        let cv = cv_of_len(150);
        assert_eq!(
            validate_intake(&cv, "   "),
            Err(IntakeError::MissingTargetJob)
        );
        assert_eq!(validate_intake(&cv, "Software Engineer"), Ok(()));
    }
}
