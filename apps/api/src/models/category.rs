//! The eight fixed competency categories every interview is scored against,
//! and the per-category score mapping used throughout the app.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of competency categories. The declaration order is load-bearing:
/// it defines the column order in `interview_results` and the documented
/// tie-break for strongest/weakest selection (first declared wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Communication,
    ProblemSolving,
    Leadership,
    Teamwork,
    TechnicalKnowledge,
    Adaptability,
    Creativity,
    CriticalThinking,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Communication,
        Category::ProblemSolving,
        Category::Leadership,
        Category::Teamwork,
        Category::TechnicalKnowledge,
        Category::Adaptability,
        Category::Creativity,
        Category::CriticalThinking,
    ];

    /// Snake-case tag used in the database and the LLM contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Communication => "communication",
            Category::ProblemSolving => "problem_solving",
            Category::Leadership => "leadership",
            Category::Teamwork => "teamwork",
            Category::TechnicalKnowledge => "technical_knowledge",
            Category::Adaptability => "adaptability",
            Category::Creativity => "creativity",
            Category::CriticalThinking => "critical_thinking",
        }
    }

    /// Human-readable label for charts and transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Communication => "Communication",
            Category::ProblemSolving => "Problem Solving",
            Category::Leadership => "Leadership",
            Category::Teamwork => "Teamwork",
            Category::TechnicalKnowledge => "Technical Knowledge",
            Category::Adaptability => "Adaptability",
            Category::Creativity => "Creativity",
            Category::CriticalThinking => "Critical Thinking",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One numeric score (nominally 0-100) per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub communication: f64,
    pub problem_solving: f64,
    pub leadership: f64,
    pub teamwork: f64,
    pub technical_knowledge: f64,
    pub adaptability: f64,
    pub creativity: f64,
    pub critical_thinking: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Communication => self.communication,
            Category::ProblemSolving => self.problem_solving,
            Category::Leadership => self.leadership,
            Category::Teamwork => self.teamwork,
            Category::TechnicalKnowledge => self.technical_knowledge,
            Category::Adaptability => self.adaptability,
            Category::Creativity => self.creativity,
            Category::CriticalThinking => self.critical_thinking,
        }
    }

    /// (category, score) pairs in declaration order.
    pub fn entries(&self) -> [(Category, f64); 8] {
        let mut out = [(Category::Communication, 0.0); 8];
        for (slot, category) in out.iter_mut().zip(Category::ALL) {
            *slot = (category, self.get(category));
        }
        out
    }
}

/// Interview difficulty selected at intake. Passed through to the question
/// generator and stored with the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_is_snake_case() {
        let json = serde_json::to_string(&Category::TechnicalKnowledge).unwrap();
        assert_eq!(json, r#""technical_knowledge""#);
        let back: Category = serde_json::from_str(r#""critical_thinking""#).unwrap();
        assert_eq!(back, Category::CriticalThinking);
    }

    #[test]
    fn test_entries_follow_declaration_order() {
        let scores = CategoryScores {
            communication: 1.0,
            problem_solving: 2.0,
            leadership: 3.0,
            teamwork: 4.0,
            technical_knowledge: 5.0,
            adaptability: 6.0,
            creativity: 7.0,
            critical_thinking: 8.0,
        };
        let entries = scores.entries();
        assert_eq!(entries[0], (Category::Communication, 1.0));
        assert_eq!(entries[4], (Category::TechnicalKnowledge, 5.0));
        assert_eq!(entries[7], (Category::CriticalThinking, 8.0));
    }

    #[test]
    fn test_scores_deserialize_from_llm_shape() {
        let json = r#"{
            "communication": 85,
            "problem_solving": 78,
            "leadership": 82,
            "teamwork": 88,
            "technical_knowledge": 75,
            "adaptability": 80,
            "creativity": 77,
            "critical_thinking": 81
        }"#;
        let scores: CategoryScores = serde_json::from_str(json).unwrap();
        assert_eq!(scores.teamwork, 88.0);
    }

    #[test]
    fn test_difficulty_default_is_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        let d: Difficulty = serde_json::from_str(r#""expert""#).unwrap();
        assert_eq!(d, Difficulty::Expert);
    }
}
