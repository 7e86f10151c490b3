use crate::llm::FailureKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitegenError {
    #[error("Generation failed ({kind}): {message}")]
    Generation { kind: FailureKind, message: String },

    #[error("Prompt too large: {prompt_tokens} tokens leaves no room in a {budget}-token context")]
    PromptTooLarge { prompt_tokens: usize, budget: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SitegenError {
    pub fn generation(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Generation {
            kind,
            message: message.into(),
        }
    }

    /// True for failures the caller may reasonably retry later by hand.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Generation {
                kind: FailureKind::TransientServiceError | FailureKind::Network,
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, SitegenError>;
