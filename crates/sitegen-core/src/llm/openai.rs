use crate::constants::endpoints;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible Chat Completions adapter.
pub struct OpenAITransport {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAITransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: endpoints::OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for OpenAITransport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<ConversationTurn>,
    max_tokens: u32,
}

#[async_trait::async_trait]
impl GenerationTransport for OpenAITransport {
    async fn send(&self, request: &GenerationRequest, api_key: &str) -> GenerationResult {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request_body = OpenAIRequest {
            model: &request.model,
            messages: vec![ConversationTurn::user(request.prompt.as_str())],
            max_tokens: request.max_output_tokens,
        };

        let response = match self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request_body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return GenerationResult::failure(FailureKind::Network, e.to_string()),
        };

        let status = response.status();
        let response_text = match response.text().await {
            Ok(t) => t,
            Err(e) => return GenerationResult::failure(FailureKind::Network, e.to_string()),
        };

        if !status.is_success() {
            // OpenAI signals overload with 429/503 rather than 529
            let kind = if status.as_u16() == 429 && !response_text.contains("insufficient_quota") {
                FailureKind::TransientServiceError
            } else {
                classify_status(status, &response_text)
            };
            return GenerationResult::failure(
                kind,
                format!("OpenAI API error ({}): {}", status, response_text),
            );
        }

        let api_response: OpenAIResponse = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                return GenerationResult::failure(
                    FailureKind::EmptyResponse,
                    format!("Failed to parse response: {e}"),
                )
            }
        };

        match api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
        {
            Some(text) if !text.trim().is_empty() => GenerationResult::Success(text),
            _ => GenerationResult::failure(FailureKind::EmptyResponse, "No response from API"),
        }
    }
}
