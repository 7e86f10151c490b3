use crate::constants::endpoints;
use crate::llm::traits::*;
use serde::Deserialize;
use serde_json::Value;

/// Anthropic Messages API adapter.
pub struct ClaudeTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ClaudeTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: endpoints::CLAUDE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request_body(&self, request: &GenerationRequest) -> Value {
        serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_output_tokens,
            "messages": [ConversationTurn::user(request.prompt.as_str())],
        })
    }
}

impl Default for ClaudeTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ClaudeApiResponse {
    #[serde(default)]
    content: Vec<ClaudeContent>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[async_trait::async_trait]
impl GenerationTransport for ClaudeTransport {
    async fn send(&self, request: &GenerationRequest, api_key: &str) -> GenerationResult {
        let url = format!("{}/v1/messages", self.base_url);
        let request_body = self.build_request_body(request);

        let response = match self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", endpoints::ANTHROPIC_VERSION)
            .header("content-type", "application/json")
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
            return GenerationResult::failure(
                classify_status(status, &response_text),
                format!("Claude API error ({}): {}", status, response_text),
            );
        }

        let api_response: ClaudeApiResponse = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                return GenerationResult::failure(
                    FailureKind::EmptyResponse,
                    format!("Failed to parse response: {e}"),
                )
            }
        };

        match api_response
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
        {
            Some(text) if !text.trim().is_empty() => GenerationResult::Success(text),
            _ => GenerationResult::failure(FailureKind::EmptyResponse, "Claude returned no text content"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let transport = ClaudeTransport::new();
        let request = GenerationRequest::new("build a site", "claude-2.1", 2000);
        let body = transport.build_request_body(&request);

        assert_eq!(body["model"], "claude-2.1");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "build a site");
    }
}
