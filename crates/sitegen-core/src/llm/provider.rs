use crate::constants::{endpoints, models};
use crate::llm::{ClaudeTransport, GenerationTransport, OpenAITransport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifies which vendor endpoint a generation request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Claude,
    OpenAI,
}

impl ProviderId {
    pub fn name(&self) -> &str {
        match self {
            Self::Claude => "Claude (Anthropic)",
            Self::OpenAI => "OpenAI",
        }
    }

    pub fn default_base_url(&self) -> &str {
        match self {
            Self::Claude => endpoints::CLAUDE_BASE_URL,
            Self::OpenAI => endpoints::OPENAI_BASE_URL,
        }
    }

    pub fn default_api_key_env(&self) -> &str {
        match self {
            Self::Claude => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &str {
        match self {
            Self::Claude => models::DEFAULT_CLAUDE_MODEL,
            Self::OpenAI => models::DEFAULT_OPENAI_MODEL,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "claude" | "anthropic" => Some(Self::Claude),
            "openai" | "gpt" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Builds the transport for this provider, optionally against a custom base URL.
    pub fn build_transport(&self, base_url: Option<&str>) -> Arc<dyn GenerationTransport> {
        let url = base_url.unwrap_or_else(|| self.default_base_url()).to_string();
        match self {
            Self::Claude => Arc::new(ClaudeTransport::new().with_base_url(url)),
            Self::OpenAI => Arc::new(OpenAITransport::new().with_base_url(url)),
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!(ProviderId::parse("Claude"), Some(ProviderId::Claude));
        assert_eq!(ProviderId::parse("openai"), Some(ProviderId::OpenAI));
        assert_eq!(ProviderId::parse("ollama"), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ProviderId::Claude.default_api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderId::OpenAI.default_model(), "gpt-4o");
    }
}
