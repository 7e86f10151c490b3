use crate::artifact::WebsiteArtifact;
use crate::context::ConversationStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The company a website is being built for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl CompanyProfile {
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.industry.is_empty() && self.color.is_none()
    }
}

/// All state for one user conversation. One per active conversation; never
/// shared between conversations.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    profile: CompanyProfile,
    conversation: ConversationStore,
    artifact: Option<WebsiteArtifact>,
    artifact_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            profile: CompanyProfile::default(),
            conversation: ConversationStore::new(),
            artifact: None,
            artifact_id: None,
        }
    }

    pub fn with_profile(profile: CompanyProfile) -> Self {
        let mut session = Self::new();
        session.profile = profile;
        session
    }

    /// Records the company details and notes the start in the history.
    pub fn start_conversation(&mut self, profile: CompanyProfile) {
        self.conversation.add_system(format!(
            "A new conversation about {} in the {} industry has started.",
            profile.name, profile.industry
        ));
        self.profile = profile;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut ConversationStore {
        &mut self.conversation
    }

    pub fn artifact(&self) -> Option<&WebsiteArtifact> {
        self.artifact.as_ref()
    }

    /// Identifier of the last delimited artifact, used for incremental edits.
    pub fn artifact_id(&self) -> Option<&str> {
        self.artifact_id.as_deref()
    }

    /// Replaces the current artifact. The identifier is kept when the new
    /// response did not carry one.
    pub fn set_artifact(&mut self, artifact: WebsiteArtifact, identifier: Option<String>) {
        self.artifact = Some(artifact);
        if identifier.is_some() {
            self.artifact_id = identifier;
        }
    }

    /// Discards everything: turns, artifact, identifier and company profile.
    pub fn reset(&mut self) {
        tracing::info!(session = %self.id, "session reset");
        *self = Self::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ExtractionStatus;

    #[test]
    fn test_start_conversation_adds_system_turn() {
        let mut session = Session::new();
        session.start_conversation(CompanyProfile::new("Acme", "retail"));

        assert_eq!(session.profile().name, "Acme");
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation().flatten(), "");
    }

    #[test]
    fn test_set_artifact_keeps_identifier() {
        let mut session = Session::new();
        let artifact = WebsiteArtifact::placeholder(ExtractionStatus::Malformed);
        session.set_artifact(artifact.clone(), Some("acme".into()));
        session.set_artifact(artifact, None);
        assert_eq!(session.artifact_id(), Some("acme"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::with_profile(CompanyProfile::new("Acme", "retail").with_color("red"));
        let old_id = session.id();
        let old_start = session.started_at();
        session.conversation_mut().add_user("hello");
        session.set_artifact(WebsiteArtifact::placeholder(ExtractionStatus::NotFound), Some("x".into()));

        session.reset();

        assert!(session.conversation().is_empty());
        assert!(session.artifact().is_none());
        assert!(session.artifact_id().is_none());
        assert!(session.profile().is_empty());
        assert_ne!(session.id(), old_id);
        assert!(session.started_at() >= old_start);
    }
}
