use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One entry of a conversation. `System` turns are informational only and
/// never reach the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// A single call to the generation API. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub max_output_tokens: u32,
    /// Identifier of the artifact being edited, when this is an incremental edit.
    pub prior_artifact_id: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_output_tokens,
            prior_artifact_id: None,
        }
    }

    pub fn with_prior_artifact(mut self, id: impl Into<String>) -> Self {
        self.prior_artifact_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The service reported itself overloaded; worth retrying.
    TransientServiceError,
    AuthError,
    EmptyResponse,
    InvalidRequest,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TransientServiceError => "service overloaded",
            Self::AuthError => "authentication",
            Self::EmptyResponse => "empty response",
            Self::InvalidRequest => "invalid request",
            Self::Network => "network",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success(String),
    Failure { kind: FailureKind, message: String },
}

impl GenerationResult {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn into_result(self) -> crate::error::Result<String> {
        match self {
            Self::Success(text) => Ok(text),
            Self::Failure { kind, message } => {
                Err(crate::error::SitegenError::generation(kind, message))
            }
        }
    }
}

/// A vendor adapter that performs exactly one request against the remote API.
/// Retrying is the caller's business (see `GenerationClient`).
#[async_trait::async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn send(&self, request: &GenerationRequest, api_key: &str) -> GenerationResult;
}

/// Maps an HTTP status and error body to a failure kind.
pub(crate) fn classify_status(status: reqwest::StatusCode, body: &str) -> FailureKind {
    match status.as_u16() {
        401 | 403 => FailureKind::AuthError,
        503 | 529 => FailureKind::TransientServiceError,
        _ if body.contains("overloaded_error") => FailureKind::TransientServiceError,
        _ => FailureKind::InvalidRequest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::UNAUTHORIZED, ""), FailureKind::AuthError);
        assert_eq!(classify_status(StatusCode::FORBIDDEN, ""), FailureKind::AuthError);
        assert_eq!(
            classify_status(StatusCode::from_u16(529).unwrap(), ""),
            FailureKind::TransientServiceError
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":{"type":"overloaded_error"}}"#),
            FailureKind::TransientServiceError
        );
        assert_eq!(classify_status(StatusCode::BAD_REQUEST, "bad"), FailureKind::InvalidRequest);
    }

    #[test]
    fn test_result_accessors() {
        let ok = GenerationResult::Success("<html></html>".into());
        assert!(ok.is_success());
        assert_eq!(ok.failure_kind(), None);

        let failed = GenerationResult::failure(FailureKind::EmptyResponse, "nothing");
        assert!(!failed.is_success());
        assert_eq!(failed.failure_kind(), Some(FailureKind::EmptyResponse));
    }

    #[test]
    fn test_failure_into_result() {
        let err = GenerationResult::failure(FailureKind::AuthError, "nope")
            .into_result()
            .unwrap_err();
        assert!(err.to_string().contains("authentication"));
        assert!(!err.is_transient());
    }
}
