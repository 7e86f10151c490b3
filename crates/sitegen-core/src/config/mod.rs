use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{defaults, endpoints, paths};
use crate::context::OutputMode;
use crate::error::{Result, SitegenError};
use crate::images::{HttpProbe, ImageReconciler, ImageSearch, PexelsSearch, StaticSearch};
use crate::llm::{GenerationClient, GenerationTransport, ProviderId, RetryPolicy};
use crate::pipeline::WebsiteGenerator;

/// Every section and key is optional in the file; anything missing takes its
/// default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generation: GenerationSettings,
    pub retry: RetrySettings,
    pub images: ImageSettings,
    pub deploy: DeploySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub provider: ProviderId,
    pub model: String,
    pub api_key_env: String,
    pub base_url: Option<String>,
    pub max_output_tokens: u32,
    pub history_token_limit: usize,
    pub output_mode: OutputMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub enabled: bool,
    pub search_api_key_env: String,
    pub search_base_url: Option<String>,
    pub placeholder_url: String,
    /// Upper bound on fallback images requested per generation.
    pub result_count: usize,
    pub probe_timeout_secs: u64,
}

/// Names of environment variables holding deployment credentials. The values
/// are passed through untouched to whatever deploys the site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    pub token_envs: Vec<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let provider = ProviderId::Claude;
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key_env: provider.default_api_key_env().to_string(),
            base_url: None,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
            history_token_limit: defaults::HISTORY_TOKEN_LIMIT,
            output_mode: OutputMode::Delimited,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RETRY_MAX_ATTEMPTS,
            base_delay_ms: defaults::RETRY_BASE_DELAY_MS,
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            search_api_key_env: "PEXELS_API_KEY".to_string(),
            search_base_url: None,
            placeholder_url: endpoints::PLACEHOLDER_IMAGE_URL.to_string(),
            result_count: defaults::IMAGE_RESULT_COUNT,
            probe_timeout_secs: defaults::PROBE_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults"),
                },
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "unreadable config, using defaults"),
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| SitegenError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generation API key from the environment variable named in settings.
    pub fn api_key(&self) -> Option<String> {
        env_value(&self.generation.api_key_env)
    }

    /// Deployment credentials that are actually set, keyed by variable name.
    pub fn deploy_tokens(&self) -> BTreeMap<String, String> {
        self.deploy
            .token_envs
            .iter()
            .filter_map(|name| env_value(name).map(|v| (name.clone(), v)))
            .collect()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
        }
    }

    pub fn build_transport(&self) -> Arc<dyn GenerationTransport> {
        self.generation
            .provider
            .build_transport(self.generation.base_url.as_deref())
    }

    fn build_image_search(&self) -> Result<Arc<dyn ImageSearch>> {
        let images = &self.images;
        match env_value(&images.search_api_key_env) {
            Some(key) => {
                let mut search = PexelsSearch::new(key)?.with_placeholder(images.placeholder_url.as_str());
                if let Some(ref url) = images.search_base_url {
                    search = search.with_base_url(url.as_str());
                }
                Ok(Arc::new(search))
            }
            None => Ok(Arc::new(StaticSearch::placeholder(images.placeholder_url.as_str()))),
        }
    }

    /// Wires up the full pipeline from these settings.
    pub fn build_generator(&self, api_key: impl Into<String>) -> Result<WebsiteGenerator> {
        let client = GenerationClient::new(self.build_transport()).with_policy(self.retry_policy());

        let mut generator = WebsiteGenerator::new(client, api_key, self.generation.model.as_str())
            .with_mode(self.generation.output_mode)
            .with_history_token_limit(self.generation.history_token_limit)
            .with_max_output_tokens(self.generation.max_output_tokens);

        if self.images.enabled {
            let probe = HttpProbe::new(Duration::from_secs(self.images.probe_timeout_secs))?;
            let reconciler = ImageReconciler::new(Arc::new(probe), self.build_image_search()?);
            generator = generator
                .with_images(reconciler)
                .with_image_result_count(self.images.result_count);
        }

        Ok(generator)
    }
}

fn env_value(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
