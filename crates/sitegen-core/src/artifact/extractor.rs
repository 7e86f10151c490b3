use crate::artifact::{ArtifactMarker, ExtractionStatus, WebsiteArtifact};
use crate::constants::artifact;
use regex::Regex;

/// One way of locating the document inside a model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Content between `<artifact ...>` and `</artifact>`, markers stripped.
    Delimiter,
    /// First doctype through the first `</html>` outside script and style blocks.
    DocumentAnchor,
    /// Body of the first ``` fenced block.
    FencedBlock,
}

pub const DEFAULT_STRATEGIES: &[Strategy] =
    &[Strategy::Delimiter, Strategy::DocumentAnchor, Strategy::FencedBlock];

/// Pulls a single HTML document out of raw model output.
///
/// Strategies run in order and the first candidate that starts with the
/// doctype and ends with `</html>` wins. Failing all of them is a normal
/// outcome: the artifact comes back `Malformed` with an inert placeholder.
pub struct ArtifactExtractor {
    strategies: Vec<Strategy>,
    delimiter_re: Regex,
    attribute_re: Regex,
    doctype_re: Regex,
    fence_re: Regex,
}

impl ArtifactExtractor {
    pub fn new() -> Self {
        Self::with_strategies(DEFAULT_STRATEGIES.to_vec())
    }

    pub fn with_strategies(strategies: Vec<Strategy>) -> Self {
        Self {
            strategies,
            delimiter_re: Regex::new(r"(?is)<artifact\b([^>]*)>(.*?)</artifact>")
                .expect("valid delimiter pattern"),
            attribute_re: Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#)
                .expect("valid attribute pattern"),
            doctype_re: Regex::new(r"(?i)<!doctype\s+html[^>]*>").expect("valid doctype pattern"),
            fence_re: Regex::new(r"(?s)```[\w-]*[ \t]*\r?\n(.*?)```").expect("valid fence pattern"),
        }
    }

    pub fn extract(&self, raw: &str) -> WebsiteArtifact {
        if raw.trim().is_empty() {
            return WebsiteArtifact::placeholder(ExtractionStatus::NotFound);
        }

        for strategy in &self.strategies {
            if let Some(candidate) = self.candidate(*strategy, raw) {
                if is_complete_document(candidate) {
                    tracing::debug!(?strategy, bytes = candidate.len(), "extracted html document");
                    return WebsiteArtifact {
                        html: candidate.to_string(),
                        status: ExtractionStatus::Ok,
                    };
                }
            }
        }

        tracing::info!("no complete html document in model output");
        WebsiteArtifact::placeholder(ExtractionStatus::Malformed)
    }

    /// Attributes of the first delimiter start marker, if the response has one.
    pub fn marker(&self, raw: &str) -> Option<ArtifactMarker> {
        let caps = self.delimiter_re.captures(raw)?;
        let attrs = caps.get(1)?.as_str();

        let mut marker = ArtifactMarker::default();
        for attr in self.attribute_re.captures_iter(attrs) {
            let value = attr[2].to_string();
            match &attr[1] {
                "identifier" => marker.identifier = Some(value),
                "type" => marker.kind = Some(value),
                "title" => marker.title = Some(value),
                _ => {}
            }
        }
        Some(marker)
    }

    fn candidate<'a>(&self, strategy: Strategy, raw: &'a str) -> Option<&'a str> {
        match strategy {
            Strategy::Delimiter => self
                .delimiter_re
                .captures(raw)
                .and_then(|c| c.get(2))
                .map(|m| m.as_str().trim()),
            Strategy::DocumentAnchor => {
                let start = self.doctype_re.find(raw)?.start();
                // ASCII lowering keeps byte offsets intact
                let end = root_close(&raw[start..].to_ascii_lowercase())?;
                Some(&raw[start..start + end + artifact::ROOT_CLOSE.len()])
            }
            Strategy::FencedBlock => self
                .fence_re
                .captures(raw)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim()),
        }
    }
}

impl Default for ArtifactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset of the `</html>` that closes the document in already-lowercased
/// `html`. Raw-text `<script>` and `<style>` bodies are skipped so string
/// literals there don't end it early.
fn root_close(html: &str) -> Option<usize> {
    const RAW_TEXT: [(&str, &str); 2] = [("<script", "</script"), ("<style", "</style")];

    let mut pos = 0;
    loop {
        let close = pos + html[pos..].find(artifact::ROOT_CLOSE)?;
        let opener = RAW_TEXT
            .iter()
            .filter_map(|(open, end)| html[pos..close].find(open).map(|i| (pos + i, *end)))
            .min_by_key(|(i, _)| *i);

        match opener {
            Some((at, end_tag)) => pos = at + html[at..].find(end_tag)? + end_tag.len(),
            None => return Some(close),
        }
    }
}

fn is_complete_document(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    lower.starts_with("<!doctype html") && lower.ends_with(artifact::ROOT_CLOSE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<!DOCTYPE html><html><body>hi</body></html>";

    #[test]
    fn test_anchor_strips_commentary() {
        let extractor = ArtifactExtractor::new();
        let artifact = extractor.extract("blah blah <!DOCTYPE html><html><body>hi</body></html> trailing junk");
        assert_eq!(artifact.status, ExtractionStatus::Ok);
        assert_eq!(artifact.html, DOC);
    }

    #[test]
    fn test_delimiter_strips_markers() {
        let extractor = ArtifactExtractor::new();
        let raw = format!(
            "Here you go:\n<artifact identifier=\"acme\" type=\"text/html\" title=\"Acme\">\n{DOC}\n</artifact>\nEnjoy!"
        );
        let artifact = extractor.extract(&raw);
        assert_eq!(artifact.status, ExtractionStatus::Ok);
        assert_eq!(artifact.html, DOC);
    }

    #[test]
    fn test_fenced_block() {
        let extractor = ArtifactExtractor::with_strategies(vec![Strategy::FencedBlock]);
        let raw = format!("```html\n{DOC}\n```");
        let artifact = extractor.extract(&raw);
        assert_eq!(artifact.status, ExtractionStatus::Ok);
        assert_eq!(artifact.html, DOC);
    }

    #[test]
    fn test_lowercase_doctype_accepted() {
        let extractor = ArtifactExtractor::new();
        let artifact = extractor.extract("<!doctype html>\n<HTML><body></body></HTML>");
        assert_eq!(artifact.status, ExtractionStatus::Ok);
        assert_eq!(artifact.html, "<!doctype html>\n<HTML><body></body></HTML>");
    }

    #[test]
    fn test_no_document_is_malformed() {
        let extractor = ArtifactExtractor::new();
        let artifact = extractor.extract("Sorry, I can only describe the site: a bakery with three pages.");
        assert_eq!(artifact.status, ExtractionStatus::Malformed);
        assert_eq!(artifact.html, artifact::PLACEHOLDER);
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let extractor = ArtifactExtractor::new();
        let artifact = extractor.extract("<!DOCTYPE html><html><body>cut off mid");
        assert_eq!(artifact.status, ExtractionStatus::Malformed);
    }

    #[test]
    fn test_blank_input_not_found() {
        let extractor = ArtifactExtractor::new();
        assert_eq!(extractor.extract("  \n ").status, ExtractionStatus::NotFound);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = ArtifactExtractor::new();
        let inputs = [
            format!("intro {DOC} outro"),
            format!("<artifact identifier=\"x\">{DOC}</artifact>"),
            format!("```\n{DOC}\n```"),
            "nothing useful".to_string(),
        ];
        for raw in inputs {
            let first = extractor.extract(&raw);
            let second = extractor.extract(&first.html);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_anchor_drops_commentary_mentioning_root_tag() {
        let extractor = ArtifactExtractor::new();
        let artifact = extractor.extract(
            "Here it is:\n<!DOCTYPE html><html><body>hi</body></html>\n\nEverything sits inside <html>...</html> as requested.",
        );
        assert_eq!(artifact.status, ExtractionStatus::Ok);
        assert_eq!(artifact.html, DOC);
    }

    #[test]
    fn test_anchor_skips_root_tag_inside_script() {
        let extractor = ArtifactExtractor::new();
        let doc = "<!DOCTYPE html><html><head><script>const tail = \"</html>\";</script>\
                   <style>p::after { content: \"</html>\"; }</style></head><body>hi</body></html>";
        let artifact = extractor.extract(&format!("Sure!\n{doc}\nDone, see </html> above."));
        assert_eq!(artifact.status, ExtractionStatus::Ok);
        assert_eq!(artifact.html, doc);
    }

    #[test]
    fn test_marker_attributes() {
        let extractor = ArtifactExtractor::new();
        let marker = extractor
            .marker("<artifact identifier=\"acme-site\" type=\"text/html\" title=\"Acme &amp; Co\">x</artifact>")
            .unwrap();
        assert_eq!(marker.identifier.as_deref(), Some("acme-site"));
        assert_eq!(marker.kind.as_deref(), Some("text/html"));
        assert_eq!(marker.title.as_deref(), Some("Acme &amp; Co"));
        assert!(extractor.marker(DOC).is_none());
    }
}
