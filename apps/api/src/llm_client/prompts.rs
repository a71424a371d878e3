//! Prompt templates for the three collaborator calls. Templates are const
//! strings with `{placeholder}` slots filled by the builders below; every
//! prompt pins the exact JSON shape the typed parse expects.

use std::fmt::Write as _;

use crate::models::category::{CategoryScores, Difficulty};
use crate::models::evaluation::Question;
use crate::models::result::JobMarketRow;

/// How much résumé context each call gets. Long résumés are cut to keep the
/// prompt inside the token budget.
const CV_CHARS_FOR_GENERATION: usize = 1500;
const CV_CHARS_FOR_EVALUATION: usize = 500;
const CV_CHARS_FOR_JOB_MATCH: usize = 800;

/// At most this many reference jobs are offered to the matcher.
const JOB_MARKET_LIMIT: usize = 15;

const GENERATION_TEMPLATE: &str = r#"You are an HR expert with 15+ years of recruitment and interview experience.

**TASK**: Analyze the candidate's CV and produce deep, relevant interview questions.

**CANDIDATE CV**:
{cv_text}

**TARGET POSITION**: {target_job}
**DIFFICULTY**: {difficulty}

**INSTRUCTIONS**:
1. Assess how well the candidate fits the position
2. Identify strengths and gaps in the CV
3. Write 8-10 questions that are specific to this candidate's experience,
   probe both technical and soft skills, match the requested difficulty,
   and invite detailed, reflective answers

**QUESTION CATEGORIES** (use these exact tags):
communication, problem_solving, leadership, teamwork, technical_knowledge,
adaptability, creativity, critical_thinking

**OUTPUT FORMAT (JSON only, no markdown fences, no commentary)**:
{
    "analysis": {
        "overall_fit": "percentage and short explanation",
        "strengths": ["strength 1", "strength 2"],
        "gaps": ["gap 1", "gap 2"],
        "recommendation": "short recommendation"
    },
    "questions": [
        {
            "id": 1,
            "category": "communication",
            "question": "specific question...",
            "context": "why this question matters",
            "expected_answer_points": ["point 1", "point 2"],
            "difficulty": "medium"
        }
    ]
}"#;

const EVALUATION_TEMPLATE: &str = r#"As a senior HR evaluator, assess this interview comprehensively.

**TARGET POSITION**: {target_job}
**CV**: {cv_text}

**INTERVIEW TRANSCRIPT**:
{transcript}

Score each category 0-100 based on relevance, depth, structure, and concrete
examples. Decision must be exactly one of "Hire", "Maybe", "Don't Hire".

**OUTPUT FORMAT (JSON only, no markdown fences, no commentary)**:
{
    "scores": {
        "communication": 85,
        "problem_solving": 78,
        "leadership": 82,
        "teamwork": 88,
        "technical_knowledge": 75,
        "adaptability": 80,
        "creativity": 77,
        "critical_thinking": 81
    },
    "category_feedback": {
        "communication": "specific feedback..."
    },
    "overall_assessment": "overall evaluation...",
    "strengths": ["key strength 1"],
    "weaknesses": ["area to improve 1"],
    "red_flags": [],
    "recommendation": {
        "decision": "Maybe",
        "confidence": "70%",
        "reasoning": "reason for the decision...",
        "next_steps": ["step 1", "step 2"]
    },
    "development_plan": {
        "priority_areas": ["area 1"],
        "suggested_actions": ["action 1"],
        "timeline": "3-6 months"
    }
}"#;

const JOB_MATCH_TEMPLATE: &str = r#"As an AI career advisor, analyze the candidate profile and recommend the best-fitting jobs.

**CANDIDATE CV**:
{cv_text}

**INTERVIEW SCORES**:
{scores}

**AVAILABLE JOBS**:
{job_list}

Recommend the 5-7 best matches with a match percentage, the reasons, and the
skill gaps to close.

**OUTPUT FORMAT (JSON only, no markdown fences, no commentary)**:
{
    "recommendations": [
        {
            "job_title": "Software Engineer",
            "match_percentage": 85,
            "match_reasons": ["reason 1", "reason 2"],
            "skill_gaps": ["gap 1", "gap 2"],
            "salary_range": "12,000,000 - 25,000,000",
            "growth_potential": "High",
            "difficulty_to_get": "Medium"
        }
    ]
}"#;

pub fn build_generation_prompt(cv_text: &str, target_job: &str, difficulty: Difficulty) -> String {
    GENERATION_TEMPLATE
        .replace("{cv_text}", truncate_chars(cv_text, CV_CHARS_FOR_GENERATION))
        .replace("{target_job}", target_job)
        .replace("{difficulty}", difficulty.as_str())
}

pub fn build_evaluation_prompt(
    questions: &[Question],
    answers: &[String],
    cv_text: &str,
    target_job: &str,
) -> String {
    EVALUATION_TEMPLATE
        .replace("{target_job}", target_job)
        .replace("{cv_text}", truncate_chars(cv_text, CV_CHARS_FOR_EVALUATION))
        .replace("{transcript}", &render_transcript(questions, answers))
}

pub fn build_job_match_prompt(
    cv_text: &str,
    scores: &CategoryScores,
    job_market: &[JobMarketRow],
) -> String {
    let mut job_list = String::new();
    for job in job_market.iter().take(JOB_MARKET_LIMIT) {
        let _ = writeln!(
            job_list,
            "- {}: {} (Skills: {})",
            job.job_title,
            job.description.as_deref().unwrap_or(""),
            job.required_skills.as_deref().unwrap_or("")
        );
    }

    let scores_json =
        serde_json::to_string_pretty(scores).unwrap_or_else(|_| "{}".to_string());

    JOB_MATCH_TEMPLATE
        .replace("{cv_text}", truncate_chars(cv_text, CV_CHARS_FOR_JOB_MATCH))
        .replace("{scores}", &scores_json)
        .replace("{job_list}", job_list.trim_end())
}

/// `Q1 [category]: ...` / `A1: ...` pairs, one block per question.
fn render_transcript(questions: &[Question], answers: &[String]) -> String {
    questions
        .iter()
        .zip(answers)
        .enumerate()
        .map(|(i, (q, a))| format!("Q{n} [{cat}]: {q}\nA{n}: {a}", n = i + 1, cat = q.category, q = q.question))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Cuts at a char boundary so multi-byte résumés cannot panic the slicer.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte input must not split a code point.
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_generation_prompt_fills_placeholders() {
        let prompt = build_generation_prompt("my cv", "Data Scientist", Difficulty::Hard);
        assert!(prompt.contains("my cv"));
        assert!(prompt.contains("Data Scientist"));
        assert!(prompt.contains("**DIFFICULTY**: hard"));
        assert!(!prompt.contains("{cv_text}"));
    }

    #[test]
    fn test_transcript_renders_numbered_pairs() {
        let questions = vec![Question {
            id: 1,
            category: Category::Teamwork,
            question: "Tell me about a team conflict.".to_string(),
            context: String::new(),
            expected_answer_points: vec![],
            difficulty: String::new(),
        }];
        let answers = vec!["We talked it through.".to_string()];
        let transcript = render_transcript(&questions, &answers);
        assert_eq!(
            transcript,
            "Q1 [teamwork]: Tell me about a team conflict.\nA1: We talked it through."
        );
    }

    #[test]
    fn test_job_match_prompt_limits_job_list() {
        let jobs: Vec<JobMarketRow> = (0..20)
            .map(|i| JobMarketRow {
                id: i,
                job_title: format!("Job {i}"),
                category: None,
                avg_salary_min: 0,
                avg_salary_max: 0,
                demand_level: None,
                required_skills: Some("SQL".to_string()),
                description: Some("desc".to_string()),
                updated_at: String::new(),
            })
            .collect();
        let scores = CategoryScores {
            communication: 80.0,
            problem_solving: 80.0,
            leadership: 80.0,
            teamwork: 80.0,
            technical_knowledge: 80.0,
            adaptability: 80.0,
            creativity: 80.0,
            critical_thinking: 80.0,
        };
        let prompt = build_job_match_prompt("cv", &scores, &jobs);
        assert!(prompt.contains("Job 14"));
        assert!(!prompt.contains("Job 15"));
    }
}
