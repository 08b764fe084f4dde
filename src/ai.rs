//! AI prescription passthrough.
//!
//! Thin client over an OpenAI-compatible chat-completions endpoint. Two
//! operations: draft a prescription from symptom/history text, and ask the
//! same model to judge a prescription's safety. The judgment is reduced to a
//! boolean by `reply_indicates_valid`, a substring heuristic kept exactly as
//! the office system defined it (see the function's doc for its known false
//! positive).

use serde::{Deserialize, Serialize};

const GENERATE_SYSTEM_PROMPT: &str = "You are a medical assistant helping doctors draft \
    prescriptions. Given a patient's symptoms and medical history, suggest a prescription \
    with medicine names, dosages, and durations. The draft will be reviewed by a licensed \
    doctor before use.";

const VALIDATE_SYSTEM_PROMPT: &str = "You are a medical safety reviewer. Assess whether \
    the following prescription is valid and safe for a patient. Answer briefly.";

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Cannot reach AI endpoint at {0}")]
    Connection(String),
    #[error("AI request failed in transit: {0}")]
    Transport(String),
    #[error("AI endpoint returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Failed to parse AI response: {0}")]
    ResponseParsing(String),
    #[error("AI reply contained no choices")]
    EmptyReply,
}

/// Client for an OpenAI-compatible chat-completions API.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiClient {
    /// Create a client against the given endpoint.
    ///
    /// Only a connect timeout is set. Completion requests carry no request
    /// timeout: a slow upstream blocks the calling handler for its full
    /// duration.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Draft a prescription from symptom and history text.
    ///
    /// Returns the first completion's text verbatim.
    pub async fn generate_prescription(
        &self,
        symptoms: &str,
        medical_history: Option<&str>,
    ) -> Result<String, AiError> {
        let user_prompt = match medical_history {
            Some(history) => {
                format!("Symptoms: {symptoms}\n\nMedical history: {history}")
            }
            None => format!("Symptoms: {symptoms}"),
        };
        self.chat(GENERATE_SYSTEM_PROMPT, &user_prompt).await
    }

    /// Ask the model to judge a prescription, reduced to a boolean by
    /// `reply_indicates_valid`.
    pub async fn validate_prescription(&self, prescription_text: &str) -> Result<bool, AiError> {
        let user_prompt = format!("Prescription to review:\n{prescription_text}");
        let reply = self.chat(VALIDATE_SYSTEM_PROMPT, &user_prompt).await?;
        Ok(reply_indicates_valid(&reply))
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, AiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AiError::Connection(self.base_url.clone())
                } else {
                    // Timeout or a connection dropped mid-request — no
                    // response was received, so it is not a parse failure.
                    AiError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AiError::EmptyReply)
    }
}

/// Case-insensitive substring check for "valid" or "safe" in the reviewer
/// reply.
///
/// Known defect, kept deliberately: a reply containing "not valid" still
/// matches "valid" and reads as approval. This is the office system's entire
/// validation mechanism — no structured output is requested from the model —
/// and it is pinned by a regression test rather than fixed here.
pub fn reply_indicates_valid(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    lower.contains("valid") || lower.contains("safe")
}
