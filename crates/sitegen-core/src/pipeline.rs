use crate::artifact::{ArtifactExtractor, WebsiteArtifact};
use crate::constants::{artifact, defaults};
use crate::context::{OutputMode, PromptBuilder, TokenBudgeter};
use crate::error::{Result, SitegenError};
use crate::images::ImageReconciler;
use crate::llm::{GenerationClient, GenerationRequest};
use crate::session::Session;

/// Runs prompt building, generation, extraction and image reconciliation for
/// one session at a time. Each call completes before the next should start.
pub struct WebsiteGenerator {
    client: GenerationClient,
    budgeter: TokenBudgeter,
    extractor: ArtifactExtractor,
    images: Option<ImageReconciler>,
    image_result_count: usize,
    api_key: String,
    model: String,
    mode: OutputMode,
    history_token_limit: usize,
    max_output_tokens: u32,
}

impl WebsiteGenerator {
    pub fn new(client: GenerationClient, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            budgeter: TokenBudgeter::new(),
            extractor: ArtifactExtractor::new(),
            images: None,
            image_result_count: defaults::IMAGE_RESULT_COUNT,
            api_key: api_key.into(),
            model: model.into(),
            mode: OutputMode::default(),
            history_token_limit: defaults::HISTORY_TOKEN_LIMIT,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
        }
    }

    pub fn with_images(mut self, reconciler: ImageReconciler) -> Self {
        self.images = Some(reconciler);
        self
    }

    /// Caps how many fallback images are requested from search.
    pub fn with_image_result_count(mut self, count: usize) -> Self {
        self.image_result_count = count;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_history_token_limit(mut self, limit: usize) -> Self {
        self.history_token_limit = limit;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Plain chat turn: records the user's message, sends it on its own and
    /// records the reply. On failure only the user turn remains.
    pub async fn respond(&self, session: &mut Session, user_text: &str) -> Result<String> {
        session.conversation_mut().add_user(user_text);

        let budget = self.budgeter.budget(&self.model);
        let prompt_tokens = self.budgeter.estimate(user_text, &self.model);
        if prompt_tokens + artifact::SAFETY_MARGIN_TOKENS >= budget {
            return Err(SitegenError::PromptTooLarge {
                prompt_tokens,
                budget,
            });
        }
        let room = u32::try_from(budget - prompt_tokens).unwrap_or(u32::MAX);

        let reply = self
            .client
            .generate(user_text, &self.api_key, &self.model, self.max_output_tokens.min(room))
            .await
            .into_result()?;

        session.conversation_mut().add_assistant(reply.clone());
        Ok(reply)
    }

    /// Generates a website from the session's current conversation and stores
    /// it on the session, replacing any previous artifact.
    ///
    /// Budget, auth and transport problems are returned as errors, before any
    /// request in the budget case. A response without a usable document is
    /// not an error: the artifact's status says so.
    pub async fn generate(&self, session: &mut Session) -> Result<WebsiteArtifact> {
        let prior_id = session.artifact_id().map(str::to_string);

        let built = PromptBuilder::new(session.profile().clone())
            .with_history(session.conversation().flatten())
            .with_mode(self.mode)
            .with_prior_artifact(prior_id.clone())
            .with_history_token_limit(self.history_token_limit)
            .with_max_output_tokens(self.max_output_tokens)
            .build(&self.budgeter, &self.model)?;

        let mut request = GenerationRequest::new(built.text, self.model.as_str(), built.max_output_tokens);
        if let Some(id) = prior_id {
            request = request.with_prior_artifact(id);
        }

        tracing::info!(
            session = %session.id(),
            model = %self.model,
            prompt_tokens = built.prompt_tokens,
            "generating website"
        );
        let raw = self
            .client
            .generate_request(&request, &self.api_key)
            .await
            .into_result()?;

        let marker = self.extractor.marker(&raw);
        let mut website = self.extractor.extract(&raw);

        if website.is_ok() {
            if let Some(ref images) = self.images {
                website.html = self.reconcile_images(images, session, &website.html).await;
            }
        }

        tracing::info!(session = %session.id(), status = ?website.status, "website artifact ready");
        // A failed extraction produced nothing the model could later update
        let identifier = if website.is_ok() {
            marker.and_then(|m| m.identifier)
        } else {
            None
        };
        session.set_artifact(website.clone(), identifier);
        Ok(website)
    }

    async fn reconcile_images(&self, images: &ImageReconciler, session: &Session, html: &str) -> String {
        let referenced = images.image_urls(html).len();
        if referenced == 0 {
            return html.to_string();
        }

        let profile = session.profile();
        let query = format!("{} {}", profile.industry, profile.name);
        let count = referenced.min(self.image_result_count);
        let candidate = images.candidates(query.trim(), count).await;
        images.reconcile(html, &candidate.urls).await
    }
}
