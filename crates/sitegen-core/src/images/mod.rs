mod probe;
mod reconciler;
mod search;

pub use probe::HttpProbe;
pub use reconciler::ImageReconciler;
pub use search::{PexelsSearch, StaticSearch};

/// Search results for one query, best match first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub query: String,
    pub urls: Vec<String>,
}

/// Checks that a URL currently serves an image.
#[async_trait::async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}

/// Image-search collaborator. Never fails: on any error it hands back a
/// placeholder URL repeated `count` times.
#[async_trait::async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Vec<String>;
}
