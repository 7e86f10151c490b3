mod extractor;

pub use extractor::{ArtifactExtractor, Strategy, DEFAULT_STRATEGIES};

use crate::constants::artifact;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Ok,
    NotFound,
    Malformed,
}

/// The generated HTML document for one conversation snapshot.
///
/// When `status` is `Ok`, `html` starts with the doctype and ends with
/// `</html>`. Otherwise it holds an inert HTML comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteArtifact {
    pub html: String,
    pub status: ExtractionStatus,
}

impl WebsiteArtifact {
    pub fn placeholder(status: ExtractionStatus) -> Self {
        Self {
            html: artifact::PLACEHOLDER.to_string(),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ExtractionStatus::Ok
    }
}

/// Attributes carried by an `<artifact ...>` start marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactMarker {
    pub identifier: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
}
