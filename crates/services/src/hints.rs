use std::env;
use std::fmt::Write as _;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::HintServiceError;

#[derive(Clone, Debug)]
pub struct HintConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl HintConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("QUIZ_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Generates one hint per quiz question through an OpenAI-compatible
/// chat-completions endpoint.
///
/// The service never retries; a failed call is surfaced as-is and the
/// caller decides what to do with it.
#[derive(Clone)]
pub struct HintService {
    client: Client,
    config: Option<HintConfig>,
}

impl HintService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(HintConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<HintConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Generate one hint per question, in the same order.
    ///
    /// # Errors
    ///
    /// Returns `HintServiceError` when the service is disabled, the input
    /// is empty or contains blank questions, the request fails, or the
    /// response does not carry exactly one hint per question. Partial
    /// results are never returned.
    pub async fn generate_hints(
        &self,
        questions: &[String],
    ) -> Result<Vec<String>, HintServiceError> {
        let config = self.config.as_ref().ok_or(HintServiceError::Disabled)?;
        validate_questions(questions)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(questions),
            }],
            temperature: 0.2,
        };

        tracing::debug!(count = questions.len(), "requesting quiz hints");

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HintServiceError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(HintServiceError::EmptyResponse)?;

        let parsed: HintsPayload = serde_json::from_str(content.trim())?;
        if parsed.hints.len() != questions.len() {
            return Err(HintServiceError::CountMismatch {
                expected: questions.len(),
                got: parsed.hints.len(),
            });
        }

        Ok(parsed.hints)
    }
}

fn validate_questions(questions: &[String]) -> Result<(), HintServiceError> {
    if questions.is_empty() {
        return Err(HintServiceError::NoQuestions);
    }
    for (index, question) in questions.iter().enumerate() {
        if question.trim().is_empty() {
            return Err(HintServiceError::EmptyQuestion { index });
        }
    }
    Ok(())
}

fn build_prompt(questions: &[String]) -> String {
    let mut prompt = String::from(
        "You are an AI quiz assistant that is helping create quizzes.\n\n\
         You are provided a list of quiz questions. For each question, \
         generate a hint that can help the user answer the question without \
         giving away the answer.\n\nHere are the questions:\n\n",
    );
    for (index, question) in questions.iter().enumerate() {
        let _ = writeln!(prompt, "Question {index}: {question}");
    }
    prompt.push_str(
        "\nReturn the hints in the same order as the questions were provided.\n\
         Ensure the hints are helpful but not too obvious.\n\n\
         Respond with JSON only, in this format:\n\
         {\"hints\": [\"hint 1\", \"hint 2\"]}\n",
    );
    prompt
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HintsPayload {
    hints: Vec<String>,
}
