use crate::constants::{artifact, defaults};
use crate::context::TokenBudgeter;
use crate::error::{Result, SitegenError};
use crate::session::CompanyProfile;
use serde::{Deserialize, Serialize};

/// Structural, style and accessibility rules every generated site must follow.
pub const DEFAULT_REQUIREMENTS: &[&str] = &[
    "The response must be a complete HTML5 document that starts with <!DOCTYPE html> and contains <html>, <head> and <body> tags.",
    "Put the CSS in a <style> tag inside <head> and add media queries so the layout is responsive on phones, tablets and desktops.",
    "Include a navigation menu, a header and a footer.",
    "Use icons (for example Font Awesome from a CDN) where they help the reader.",
    "Add SEO tags in <head>: <title>, meta description, meta viewport and Open Graph tags.",
    "Add accessibility attributes: alt text on every image, aria-label on navigation and landmark regions, and enough color contrast.",
    "Use absolute https URLs for every <img src> and describe the picture in its alt text.",
    "Write real content that fits the company and the requirements; no lorem ipsum.",
];

/// How the model is asked to frame its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Wrap the document in `<artifact ...>` / `</artifact>` markers.
    #[default]
    Delimited,
    /// Answer with nothing but the document, starting at the doctype.
    Bare,
}

/// An assembled prompt, sized for a specific model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub text: String,
    pub prompt_tokens: usize,
    /// Output allowance: the configured maximum, clamped to what the context
    /// window has left after the prompt.
    pub max_output_tokens: u32,
}

/// Builds the website-generation prompt from a company profile and the
/// flattened conversation.
pub struct PromptBuilder {
    profile: CompanyProfile,
    history: String,
    requirements: Vec<String>,
    mode: OutputMode,
    prior_artifact_id: Option<String>,
    history_token_limit: usize,
    max_output_tokens: u32,
}

impl PromptBuilder {
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            history: String::new(),
            requirements: DEFAULT_REQUIREMENTS.iter().map(|r| r.to_string()).collect(),
            mode: OutputMode::default(),
            prior_artifact_id: None,
            history_token_limit: defaults::HISTORY_TOKEN_LIMIT,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
        }
    }

    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }

    pub fn add_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_prior_artifact(mut self, id: Option<String>) -> Self {
        self.prior_artifact_id = id;
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

    /// Assembles the prompt and checks it against `model`'s context window.
    ///
    /// The history is cut to its most recent `history_token_limit` tokens
    /// first. Fails with `PromptTooLarge` when the result leaves no more than
    /// the safety margin free.
    pub fn build(self, budgeter: &TokenBudgeter, model: &str) -> Result<BuiltPrompt> {
        let history = budgeter.truncate(&self.history, model, self.history_token_limit);
        let text = self.render(&history);

        let budget = budgeter.budget(model);
        let prompt_tokens = budgeter.estimate(&text, model);
        if prompt_tokens + artifact::SAFETY_MARGIN_TOKENS >= budget {
            return Err(SitegenError::PromptTooLarge {
                prompt_tokens,
                budget,
            });
        }

        let room = u32::try_from(budget - prompt_tokens).unwrap_or(u32::MAX);
        tracing::debug!(model, prompt_tokens, budget, "prompt assembled");

        Ok(BuiltPrompt {
            text,
            prompt_tokens,
            max_output_tokens: self.max_output_tokens.min(room),
        })
    }

    fn render(&self, history: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "You are an expert web developer. Build a complete HTML website for {}, a company in the {} industry.\n\n",
            self.profile.name, self.profile.industry
        ));

        if let Some(ref color) = self.profile.color {
            prompt.push_str(&format!(
                "Use {} as the primary brand color throughout the design.\n\n",
                color
            ));
        }

        if !history.trim().is_empty() {
            prompt.push_str("## Requirements from the conversation:\n");
            prompt.push_str(history.trim());
            prompt.push_str("\n\n");
        }

        prompt.push_str("## You must follow these rules:\n");
        for (i, requirement) in self.requirements.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, requirement));
        }
        prompt.push('\n');

        match self.mode {
            OutputMode::Delimited => {
                let identifier = self
                    .prior_artifact_id
                    .as_deref()
                    .unwrap_or(artifact::DEFAULT_IDENTIFIER);
                if self.prior_artifact_id.is_some() {
                    prompt.push_str(&format!(
                        "This is an update of the existing artifact \"{}\". Keep the same identifier.\n",
                        identifier
                    ));
                }
                prompt.push_str(&format!(
                    "Wrap the whole HTML document in an artifact block exactly like this:\n\
                     {} identifier=\"{}\" type=\"{}\" title=\"{}\">\n\
                     <!DOCTYPE html>\n...\n</html>\n\
                     {}\n\
                     Put nothing but the HTML document inside the block.",
                    artifact::OPEN_MARKER,
                    identifier,
                    artifact::CONTENT_TYPE,
                    escape_attribute(&format!("{} website", self.profile.name)),
                    artifact::CLOSE_MARKER,
                ));
            }
            OutputMode::Bare => {
                prompt.push_str(
                    "Reply with the HTML code only, starting with <!DOCTYPE html>. \
                     Do not add explanations or comments before or after it.",
                );
            }
        }

        prompt
    }
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
