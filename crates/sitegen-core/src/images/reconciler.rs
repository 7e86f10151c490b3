use crate::images::{ImageCandidate, ImageSearch, ReachabilityProbe};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Swaps dead `<img src>` URLs for search results.
pub struct ImageReconciler {
    probe: Arc<dyn ReachabilityProbe>,
    search: Arc<dyn ImageSearch>,
    img_src_re: Regex,
}

impl ImageReconciler {
    pub fn new(probe: Arc<dyn ReachabilityProbe>, search: Arc<dyn ImageSearch>) -> Self {
        Self {
            probe,
            search,
            img_src_re: Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
                .expect("valid img src pattern"),
        }
    }

    /// `src` values of every `<img>` tag, in document order, duplicates kept.
    pub fn image_urls(&self, html: &str) -> Vec<String> {
        self.img_src_re
            .captures_iter(html)
            .filter_map(|c| src_value(&c))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub async fn candidates(&self, query: &str, count: usize) -> ImageCandidate {
        ImageCandidate {
            query: query.to_string(),
            urls: self.search.search(query, count).await,
        }
    }

    /// Replaces each unreachable image URL, in order, with the next unused
    /// fallback. Once the fallbacks run out the remaining URLs stay as they are.
    /// Everything outside replaced URLs is left byte-identical.
    pub async fn reconcile(&self, html: &str, fallback_candidates: &[String]) -> String {
        let mut reachable: HashMap<String, bool> = HashMap::new();
        let mut fallbacks = fallback_candidates.iter();
        let mut output = String::with_capacity(html.len());
        let mut last = 0;

        for caps in self.img_src_re.captures_iter(html) {
            let Some(url) = src_value(&caps) else { continue };

            let ok = match reachable.get(url.as_str()) {
                Some(ok) => *ok,
                None => {
                    let ok = self.check(url.as_str()).await;
                    reachable.insert(url.as_str().to_string(), ok);
                    ok
                }
            };
            if ok {
                continue;
            }

            match fallbacks.next() {
                Some(replacement) => {
                    tracing::warn!(url = url.as_str(), %replacement, "replacing unreachable image");
                    output.push_str(&html[last..url.start()]);
                    output.push_str(replacement);
                    last = url.end();
                }
                None => {
                    tracing::warn!(url = url.as_str(), "unreachable image kept, no fallbacks left");
                }
            }
        }

        output.push_str(&html[last..]);
        output
    }

    async fn check(&self, url: &str) -> bool {
        // Inline images need no network
        if url.starts_with("data:image/") {
            return true;
        }
        if url.trim().is_empty() {
            return false;
        }
        self.probe.is_reachable(url).await
    }
}

/// The attribute value, whichever quoting style it used.
fn src_value<'h>(caps: &regex::Captures<'h>) -> Option<regex::Match<'h>> {
    caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))
}
