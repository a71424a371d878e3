//! LLM Client: the single point of entry for all language-model calls.
//!
//! ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
//! All LLM interactions MUST go through this module.
//!
//! Every high-level call resolves to a usable value: on transport errors,
//! timeouts, or unparsable output the typed fallback of the same shape is
//! substituted and the interview flow advances regardless.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod fallback;
pub mod prompts;

use crate::models::category::{CategoryScores, Difficulty};
use crate::models::evaluation::{
    GeneratedQuestions, InterviewEvaluation, JobRecommendation, JobRecommendations, Question,
};
use crate::models::result::JobMarketRow;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 2000;
const MAX_RETRIES: u32 = 3;
/// Bounded call timeout. A hung request becomes a fallback, never a stall.
const REQUEST_TIMEOUT_SECS: u64 = 60;

const QUESTION_TEMPERATURE: f32 = 0.8;
const EVALUATION_TEMPERATURE: f32 = 0.6;
const JOB_MATCH_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// The single LLM client used by the whole service. Wraps the chat
/// completions API with retry logic and typed JSON parsing.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw call, returning the assistant text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens: MAX_TOKENS,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OpenAiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return chat_response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<T, LlmError> {
        let text = self.call(prompt, temperature).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Generates tailored interview questions for a résumé and target job.
/// Never fails: any error resolves to the static question set. The question
/// list is never empty and never longer than `max_questions`.
pub async fn generate_questions(
    llm: &LlmClient,
    cv_text: &str,
    target_job: &str,
    difficulty: Difficulty,
    max_questions: usize,
) -> GeneratedQuestions {
    let prompt = prompts::build_generation_prompt(cv_text, target_job, difficulty);

    let mut generated = match llm
        .call_json::<GeneratedQuestions>(&prompt, QUESTION_TEMPERATURE)
        .await
    {
        Ok(g) if !g.questions.is_empty() => g,
        Ok(_) => {
            warn!("question generation returned an empty list, using fallback");
            fallback::fallback_questions(target_job)
        }
        Err(e) => {
            warn!("question generation failed ({e}), using fallback");
            fallback::fallback_questions(target_job)
        }
    };

    generated.questions.truncate(max_questions);
    generated
}

/// Scores and critiques a finished transcript.
/// Never fails: any error resolves to the static mid-range evaluation.
pub async fn evaluate_interview(
    llm: &LlmClient,
    questions: &[Question],
    answers: &[String],
    cv_text: &str,
    target_job: &str,
) -> InterviewEvaluation {
    let prompt = prompts::build_evaluation_prompt(questions, answers, cv_text, target_job);

    match llm
        .call_json::<InterviewEvaluation>(&prompt, EVALUATION_TEMPERATURE)
        .await
    {
        Ok(evaluation) => evaluation,
        Err(e) => {
            warn!("interview evaluation failed ({e}), using fallback");
            fallback::fallback_evaluation()
        }
    }
}

/// Matches the candidate against the seeded job market.
/// Never fails: any error resolves to an empty recommendation list.
pub async fn recommend_jobs(
    llm: &LlmClient,
    cv_text: &str,
    scores: &CategoryScores,
    job_market: &[JobMarketRow],
) -> Vec<JobRecommendation> {
    let prompt = prompts::build_job_match_prompt(cv_text, scores, job_market);

    match llm
        .call_json::<JobRecommendations>(&prompt, JOB_MATCH_TEMPERATURE)
        .await
    {
        Ok(parsed) => parsed.recommendations,
        Err(e) => {
            warn!("job matching failed ({e}), returning no recommendations");
            Vec::new()
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    /// Client that cannot complete a call: invalid key, and a timeout short
    /// enough that even a reachable network fails fast.
    fn broken_client() -> LlmClient {
        LlmClient {
            client: Client::builder()
                .timeout(std::time::Duration::from_millis(200))
                .build()
                .unwrap(),
            api_key: "invalid-key".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generation_falls_back_when_call_fails() {
        let generated = generate_questions(
            &broken_client(),
            "cv text",
            "Software Engineer",
            Difficulty::Medium,
            10,
        )
        .await;
        assert!(!generated.questions.is_empty());
        assert!(generated.questions.len() <= 10);
    }

    #[tokio::test]
    async fn test_evaluation_falls_back_when_call_fails() {
        let evaluation = evaluate_interview(&broken_client(), &[], &[], "cv text", "Engineer").await;
        // All eight categories populated from the fallback payload.
        for (_, score) in evaluation.scores.entries() {
            assert!(score > 0.0);
        }
    }
}
