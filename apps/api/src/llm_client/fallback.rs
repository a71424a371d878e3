//! Static fallback payloads. These are the values the flow advances with
//! when the LLM is unreachable or returns something unparsable; they must
//! always be well-formed and are never allowed to fail themselves.

use crate::models::category::{Category, CategoryScores};
use crate::models::evaluation::{
    CvAnalysis, DevelopmentPlan, GeneratedQuestions, HiringDecision, HiringRecommendation,
    InterviewEvaluation, Question,
};

/// Generic eight-question set, one question per competency category. Two
/// questions weave in the target job so the session still feels addressed.
pub fn fallback_questions(target_job: &str) -> GeneratedQuestions {
    let questions = vec![
        Question {
            id: 1,
            category: Category::Communication,
            question: "Tell me about a time you presented a complex idea to non-technical stakeholders.".to_string(),
            context: "Measures effective communication".to_string(),
            expected_answer_points: vec![
                "Specific situation".to_string(),
                "Approach used".to_string(),
                "Outcome".to_string(),
            ],
            difficulty: "medium".to_string(),
        },
        Question {
            id: 2,
            category: Category::ProblemSolving,
            question: "Describe the hardest technical problem you have faced and how you solved it.".to_string(),
            context: "Tests analytical and problem-solving skills".to_string(),
            expected_answer_points: vec![
                "Problem complexity".to_string(),
                "Analysis process".to_string(),
                "Solution".to_string(),
                "Lessons learned".to_string(),
            ],
            difficulty: "hard".to_string(),
        },
        Question {
            id: 3,
            category: Category::Leadership,
            question: format!(
                "For a {target_job} position, how would you lead a team through a tight deadline?"
            ),
            context: "Tests leadership style and pressure handling".to_string(),
            expected_answer_points: vec![
                "Leadership approach".to_string(),
                "Prioritization".to_string(),
                "Team motivation".to_string(),
            ],
            difficulty: "medium".to_string(),
        },
        Question {
            id: 4,
            category: Category::Teamwork,
            question: "Tell me about working with a difficult teammate. How did you handle it?".to_string(),
            context: "Measures interpersonal skills and conflict resolution".to_string(),
            expected_answer_points: vec![
                "Situation".to_string(),
                "Approach".to_string(),
                "Resolution".to_string(),
                "Lessons learned".to_string(),
            ],
            difficulty: "medium".to_string(),
        },
        Question {
            id: 5,
            category: Category::TechnicalKnowledge,
            question: format!(
                "Explain a current technology or methodology relevant to {target_job} and how you have applied it."
            ),
            context: "Tests technical knowledge and up-to-date awareness".to_string(),
            expected_answer_points: vec![
                "Technology understanding".to_string(),
                "Implementation experience".to_string(),
                "Best practices".to_string(),
            ],
            difficulty: "hard".to_string(),
        },
        Question {
            id: 6,
            category: Category::Adaptability,
            question: "Tell me about a time you had to learn a new skill quickly. What was your strategy?".to_string(),
            context: "Measures learning agility".to_string(),
            expected_answer_points: vec![
                "Learning approach".to_string(),
                "Resources used".to_string(),
                "Application".to_string(),
                "Outcome".to_string(),
            ],
            difficulty: "medium".to_string(),
        },
        Question {
            id: 7,
            category: Category::Creativity,
            question: "Describe an innovative idea you proposed or implemented. What was its impact?".to_string(),
            context: "Tests creative thinking and innovation".to_string(),
            expected_answer_points: vec![
                "Idea".to_string(),
                "Implementation".to_string(),
                "Challenges".to_string(),
                "Impact".to_string(),
            ],
            difficulty: "medium".to_string(),
        },
        Question {
            id: 8,
            category: Category::CriticalThinking,
            question: "How do you make important decisions when the available data is limited or ambiguous?".to_string(),
            context: "Tests decision making under uncertainty".to_string(),
            expected_answer_points: vec![
                "Decision framework".to_string(),
                "Risk assessment".to_string(),
                "Validation".to_string(),
                "Lessons learned".to_string(),
            ],
            difficulty: "hard".to_string(),
        },
    ];

    GeneratedQuestions {
        analysis: CvAnalysis {
            overall_fit: "75% - profile is a reasonable match for the position".to_string(),
            strengths: vec![
                "Relevant experience".to_string(),
                "Adequate skill set".to_string(),
            ],
            gaps: vec!["Needs more detail on specific projects".to_string()],
            recommendation: "Candidate worth considering".to_string(),
        },
        questions,
    }
}

/// Mid-range evaluation used when scoring fails. Every category carries a
/// plausible non-zero score so downstream arithmetic and charts stay valid.
pub fn fallback_evaluation() -> InterviewEvaluation {
    let feedback = [
        (Category::Communication, "Communication is reasonably clear, could be more structured"),
        (Category::ProblemSolving, "Shows sound analytical ability"),
        (Category::Leadership, "Leadership potential visible, needs more examples"),
        (Category::Teamwork, "Collaboration skills come across well"),
        (Category::TechnicalKnowledge, "Technical knowledge needs deepening"),
        (Category::Adaptability, "Shows adequate flexibility"),
        (Category::Creativity, "Ideas are reasonably innovative"),
        (Category::CriticalThinking, "Analytical thinking is adequate"),
    ];

    InterviewEvaluation {
        scores: CategoryScores {
            communication: 75.0,
            problem_solving: 72.0,
            leadership: 70.0,
            teamwork: 78.0,
            technical_knowledge: 68.0,
            adaptability: 74.0,
            creativity: 71.0,
            critical_thinking: 73.0,
        },
        category_feedback: feedback
            .into_iter()
            .map(|(c, text)| (c.as_str().to_string(), text.to_string()))
            .collect(),
        overall_assessment: "The candidate performed reasonably well with room to grow. \
            Several areas need improvement before a confident decision."
            .to_string(),
        strengths: vec![
            "Good communication".to_string(),
            "Teamwork ability".to_string(),
            "Adaptability".to_string(),
        ],
        weaknesses: vec![
            "Technical knowledge needs deepening".to_string(),
            "Leadership presence could be stronger".to_string(),
        ],
        red_flags: vec![],
        recommendation: HiringRecommendation {
            decision: HiringDecision::Maybe,
            confidence: "65%".to_string(),
            reasoning: "Promising candidate, but the technical side needs further evaluation"
                .to_string(),
            next_steps: vec![
                "Technical deep-dive".to_string(),
                "Meet the team".to_string(),
                "Case study".to_string(),
            ],
        },
        development_plan: DevelopmentPlan {
            priority_areas: vec![
                "Technical knowledge".to_string(),
                "Leadership skills".to_string(),
            ],
            suggested_actions: vec![
                "Take technical training or certification".to_string(),
                "Take a leadership role in a project".to_string(),
                "Study industry best practices".to_string(),
            ],
            timeline: "3-6 months".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_question_count_within_contract_bounds() {
        let generated = fallback_questions("Software Engineer");
        assert!((8..=10).contains(&generated.questions.len()));
    }

    #[test]
    fn test_fallback_questions_cover_all_categories() {
        let generated = fallback_questions("Software Engineer");
        let covered: HashSet<Category> =
            generated.questions.iter().map(|q| q.category).collect();
        assert_eq!(covered.len(), Category::ALL.len());
    }

    #[test]
    fn test_fallback_questions_mention_target_job() {
        let generated = fallback_questions("Product Manager");
        assert!(generated
            .questions
            .iter()
            .any(|q| q.question.contains("Product Manager")));
    }

    #[test]
    fn test_fallback_evaluation_populates_every_category() {
        let evaluation = fallback_evaluation();
        for (category, score) in evaluation.scores.entries() {
            assert!(score > 0.0, "{category} score missing");
            assert!(
                evaluation.category_feedback.contains_key(category.as_str()),
                "{category} feedback missing"
            );
        }
        assert_eq!(evaluation.recommendation.decision, HiringDecision::Maybe);
    }

    #[test]
    fn test_fallback_evaluation_serializes_into_contract_shape() {
        let value = serde_json::to_value(fallback_evaluation()).unwrap();
        assert!(value["scores"]["critical_thinking"].is_number());
        assert_eq!(value["recommendation"]["decision"], "Maybe");
    }
}
