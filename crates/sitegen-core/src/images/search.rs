use crate::constants::{defaults, endpoints};
use crate::error::{Result, SitegenError};
use crate::images::ImageSearch;
use serde::Deserialize;
use std::time::Duration;

/// Pexels-style stock photo search.
pub struct PexelsSearch {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    placeholder_url: String,
}

impl PexelsSearch {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::SEARCH_TIMEOUT_SECS))
            .user_agent(defaults::USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: endpoints::IMAGE_SEARCH_BASE_URL.to_string(),
            placeholder_url: endpoints::PLACEHOLDER_IMAGE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_placeholder(mut self, url: impl Into<String>) -> Self {
        self.placeholder_url = url.into();
        self
    }

    async fn try_search(&self, query: &str, count: usize) -> Result<Vec<String>> {
        let url = format!(
            "{}/v1/search?query={}&per_page={}",
            self.base_url,
            urlencoding::encode(query),
            count
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitegenError::Other(format!("image search returned {status}")));
        }

        let body: SearchResponse = response.json().await?;
        let urls: Vec<String> = body
            .photos
            .into_iter()
            .filter_map(|p| p.src.large.or(p.src.original))
            .take(count)
            .collect();

        if urls.is_empty() {
            return Err(SitegenError::Other(format!("no images for \"{query}\"")));
        }
        Ok(urls)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    large: Option<String>,
    original: Option<String>,
}

#[async_trait::async_trait]
impl ImageSearch for PexelsSearch {
    async fn search(&self, query: &str, count: usize) -> Vec<String> {
        match self.try_search(query, count).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!(query, error = %e, "image search failed, using placeholders");
                vec![self.placeholder_url.clone(); count]
            }
        }
    }
}

/// Fixed result list; used when no search key is configured.
pub struct StaticSearch {
    urls: Vec<String>,
}

impl StaticSearch {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Always answers with the placeholder image.
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self::new(vec![url.into()])
    }
}

#[async_trait::async_trait]
impl ImageSearch for StaticSearch {
    async fn search(&self, _query: &str, count: usize) -> Vec<String> {
        self.urls.iter().cycle().take(count).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_search_cycles() {
        let search = StaticSearch::new(vec!["a".into(), "b".into()]);
        assert_eq!(search.search("x", 3).await, vec!["a", "b", "a"]);
        assert!(StaticSearch::new(Vec::new()).search("x", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_pexels_failure_yields_placeholders() {
        let search = PexelsSearch::new("key")
            .unwrap()
            .with_base_url("http://127.0.0.1:9")
            .with_placeholder("https://example.com/placeholder.png");
        let urls = search.search("bakery", 2).await;
        assert_eq!(urls, vec!["https://example.com/placeholder.png"; 2]);
    }
}
